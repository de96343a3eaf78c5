//! Selecting available updates by a user-supplied name.

use std::sync::LazyLock;

use regex::Regex;
use wuwrap_common::AvailableUpdate;

/// A filter that names a KB article, with or without the `KB` prefix.
static KB_FILTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^(?i:KB)?(\d+)$").expect("valid regex")
});

/// Whether `update` is named by `filter`.
///
/// An empty filter matches everything. A KB-shaped filter (`KB5035845` or
/// `5035845`) matches the update's KB article ids exactly; any filter also
/// matches when it occurs in the title, ignoring case.
#[must_use]
pub fn matches_update(update: &AvailableUpdate, filter: &str) -> bool {
    let filter = filter.trim();
    if filter.is_empty() {
        return true;
    }
    if let Some(caps) = KB_FILTER_RE.captures(filter) {
        let digits = &caps[1];
        if update.kb_article_ids.iter().any(|id| id == digits) {
            return true;
        }
    }
    update
        .title
        .to_lowercase()
        .contains(&filter.to_lowercase())
}

/// Updates named by `filter`, in search order.
#[must_use]
pub fn select_updates<'a>(updates: &'a [AvailableUpdate], filter: &str) -> Vec<&'a AvailableUpdate> {
    updates.iter().filter(|u| matches_update(u, filter)).collect()
}
