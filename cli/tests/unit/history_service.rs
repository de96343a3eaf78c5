//! Tests for the update history use-case.
//!
//! Verifies session lifecycle, record ordering and normalization, and that a
//! failing machine never stops the others.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use wuwrap_cli::application::services::history::{query_history, query_history_batch};
use wuwrap_cli::domain::error::UpdateError;
use wuwrap_common::UpdateHistoryRecord;

use crate::helpers::history_entry;
use crate::mocks::{FakeAgent, FixedHost, MachineScript};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

fn two_entry_agent(machine: &str) -> FakeAgent {
    FakeAgent::new().machine(
        machine,
        MachineScript::with_history(vec![
            history_entry("2024-03 Cumulative Update (KB5035845)", 1, 2),
            history_entry("Security Update KB123456 for Windows", 2, 4),
        ]),
    )
}

// ── query_history ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_query_history_emits_normalized_records_in_agent_order() {
    let agent = two_entry_agent("SRV01");
    let mut seen: Vec<(String, UpdateHistoryRecord)> = Vec::new();

    let n = query_history(&agent, "SRV01", &mut |m: &str, r: UpdateHistoryRecord| seen.push((m.to_string(), r)))
        .await
        .expect("history");

    assert_eq!(n, 2);
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].0, "SRV01");
    assert_eq!(seen[0].1.kb(), "KB5035845");
    assert_eq!(seen[0].1.operation(), "Installed");
    assert_eq!(seen[0].1.status(), "Succeeded");
    assert_eq!(seen[1].1.kb(), "KB123456");
    assert_eq!(seen[1].1.operation(), "Uninstalled");
    assert_eq!(seen[1].1.status(), "Failed");
    assert_eq!(seen[1].1.date(), "2024-03-12 17:05:09 UTC");
}

#[tokio::test]
async fn test_query_history_requests_the_full_range() {
    let agent = two_entry_agent("SRV01");
    query_history(&agent, "SRV01", &mut |_: &str, _: UpdateHistoryRecord| {})
        .await
        .expect("history");
    assert_eq!(agent.history_queries(), vec![("SRV01".to_string(), 0, 2)]);
}

#[tokio::test]
async fn test_query_history_empty_history_skips_the_query() {
    let agent = FakeAgent::new().machine("SRV01", MachineScript::default());
    let mut emitted = 0;

    let n = query_history(&agent, "SRV01", &mut |_: &str, _: UpdateHistoryRecord| emitted += 1)
        .await
        .expect("history");

    assert_eq!(n, 0);
    assert_eq!(emitted, 0);
    assert!(agent.history_queries().is_empty());
}

#[tokio::test]
async fn test_query_history_unreachable_machine_is_session_creation() {
    let agent = FakeAgent::new();
    let mut emitted = 0;

    let err = query_history(&agent, "GHOST", &mut |_: &str, _: UpdateHistoryRecord| emitted += 1)
        .await
        .unwrap_err();

    assert!(matches!(err, UpdateError::SessionCreation { ref machine, .. } if machine == "GHOST"));
    assert_eq!(emitted, 0);
}

#[tokio::test]
async fn test_query_history_count_failure_is_query_error() {
    let agent = FakeAgent::new().machine(
        "SRV01",
        MachineScript {
            count_error: Some("0x8024001E".to_string()),
            ..MachineScript::default()
        },
    );
    let err = query_history(&agent, "SRV01", &mut |_: &str, _: UpdateHistoryRecord| {})
        .await
        .unwrap_err();
    assert_eq!(err.code(), "QUERY");
    assert!(err.to_string().contains("SRV01"));
}

#[tokio::test]
async fn test_query_history_query_failure_is_query_error() {
    let mut script = MachineScript::with_history(vec![history_entry("KB1", 1, 2)]);
    script.query_error = Some("access denied".to_string());
    let agent = FakeAgent::new().machine("SRV01", script);

    let err = query_history(&agent, "SRV01", &mut |_: &str, _: UpdateHistoryRecord| {})
        .await
        .unwrap_err();
    assert!(matches!(err, UpdateError::Query { .. }));
}

// ── query_history_batch ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_batch_without_names_queries_the_local_machine() {
    let agent = two_entry_agent("WS-042");
    let mut machines = Vec::new();

    let report = query_history_batch(&agent, &FixedHost("WS-042"), &[], None, &mut |_: usize, m: &str, _: UpdateHistoryRecord| {
        machines.push(m.to_string());
    })
    .await;

    assert!(report.is_success());
    assert_eq!(agent.opened(), vec!["WS-042"]);
    assert_eq!(machines, vec!["WS-042", "WS-042"]);
    assert_eq!(report.total_items(), 2);
}

#[tokio::test]
async fn test_batch_empty_name_means_local_machine() {
    let agent = two_entry_agent("WS-042");
    let report = query_history_batch(&agent, &FixedHost("WS-042"), &names(&[""]), None, &mut |_: usize, _: &str, _: UpdateHistoryRecord| {}).await;

    assert!(report.is_success());
    assert_eq!(report.outcomes[0].machine, "WS-042");
}

#[tokio::test]
async fn test_batch_continues_after_unreachable_machine() {
    let agent = two_entry_agent("SRV01").machine(
        "SRV03",
        MachineScript::with_history(vec![history_entry("Definition Update KB2267602", 1, 2)]),
    );
    let mut seen = Vec::new();

    let report = query_history_batch(
        &agent,
        &FixedHost("WS-042"),
        &names(&["SRV01", "SRV02", "SRV03"]),
        None,
        &mut |_: usize, m: &str, r: UpdateHistoryRecord| seen.push(format!("{m}:{}", r.kb())),
    )
    .await;

    assert!(!report.is_success());
    assert_eq!(agent.opened(), vec!["SRV01", "SRV02", "SRV03"]);
    assert_eq!(seen, vec!["SRV01:KB5035845", "SRV01:KB123456", "SRV03:KB2267602"]);

    let failed: Vec<_> = report.failures().map(|o| o.machine.as_str()).collect();
    assert_eq!(failed, vec!["SRV02"]);
    let err = report.outcomes[1].error.as_ref().expect("error");
    assert_eq!(err.code(), "SESSION_CREATION");
}

#[tokio::test]
async fn test_batch_repeated_machine_gets_a_group_per_position() {
    let agent = two_entry_agent("SRV01");
    let mut seen = Vec::new();

    let report = query_history_batch(
        &agent,
        &FixedHost("WS-042"),
        &names(&["SRV01", "SRV01"]),
        None,
        &mut |i: usize, m: &str, r: UpdateHistoryRecord| seen.push((i, m.to_string(), r.kb().to_string())),
    )
    .await;

    assert!(report.is_success());
    assert_eq!(agent.opened(), vec!["SRV01", "SRV01"]);
    let indices: Vec<usize> = seen.iter().map(|(i, _, _)| *i).collect();
    assert_eq!(indices, vec![0, 0, 1, 1]);
    assert!(seen.iter().all(|(_, m, _)| m == "SRV01"));
    assert_eq!(report.total_items(), 4);
}

#[tokio::test]
async fn test_batch_index_skips_past_failed_targets() {
    let agent = two_entry_agent("SRV01").machine(
        "SRV03",
        MachineScript::with_history(vec![history_entry("Definition Update KB2267602", 1, 2)]),
    );
    let mut indices = Vec::new();

    query_history_batch(
        &agent,
        &FixedHost("WS-042"),
        &names(&["SRV01", "SRV02", "SRV03"]),
        None,
        &mut |i: usize, _: &str, _: UpdateHistoryRecord| indices.push(i),
    )
    .await;

    assert_eq!(indices, vec![0, 0, 2]);
}

#[tokio::test]
async fn test_batch_reports_outcomes_in_input_order() {
    let agent = two_entry_agent("B").machine("A", MachineScript::default());
    let report = query_history_batch(&agent, &FixedHost("L"), &names(&["B", "A"]), None, &mut |_: usize, _: &str, _: UpdateHistoryRecord| {}).await;

    let order: Vec<_> = report.outcomes.iter().map(|o| (o.machine.as_str(), o.items)).collect();
    assert_eq!(order, vec![("B", 2), ("A", 0)]);
}

#[tokio::test]
async fn test_batch_invalid_name_fails_without_opening_a_session() {
    let agent = two_entry_agent("SRV01");
    let report = query_history_batch(
        &agent,
        &FixedHost("WS-042"),
        &names(&["bad\u{7}name", "SRV01"]),
        None,
        &mut |_: usize, _: &str, _: UpdateHistoryRecord| {},
    )
    .await;

    assert_eq!(agent.opened(), vec!["SRV01"]);
    let err = report.outcomes[0].error.as_ref().expect("error");
    assert_eq!(err.code(), "INVALID_PARAMETER");
    assert!(report.outcomes[1].error.is_none());
}

#[tokio::test]
async fn test_batch_find_update_does_not_filter() {
    let agent = two_entry_agent("SRV01");
    let report = query_history_batch(
        &agent,
        &FixedHost("WS-042"),
        &names(&["SRV01"]),
        Some("KB999"),
        &mut |_: usize, _: &str, _: UpdateHistoryRecord| {},
    )
    .await;

    assert_eq!(report.total_items(), 2);
}

#[tokio::test]
async fn test_batch_unreachable_machine_delivers_nothing() {
    let agent = FakeAgent::new();
    let report = query_history_batch(&agent, &FixedHost("WS-042"), &names(&["X"]), None, &mut |_: usize, _: &str, _: UpdateHistoryRecord| {}).await;
    assert_eq!(report.outcomes[0].items, 0);
    assert_eq!(report.total_items(), 0);
}
