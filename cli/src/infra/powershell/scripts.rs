//! PowerShell script generation for the Windows Update Agent.
//!
//! Every script opens its own `Microsoft.Update.Session` through
//! `GetTypeFromProgID`, so remote machines are reached over DCOM the same
//! way local ones are. Scripts exit with [`EXIT_SESSION`] when the session
//! cannot be created and [`EXIT_OPERATION`] when the operation itself fails,
//! writing the exception message to stderr. Results go to stdout as JSON.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use wuwrap_common::FetchMode;

/// Exit code for a failed session activation.
pub const EXIT_SESSION: i32 = 10;

/// Exit code for a failed count, query, search, download or install.
pub const EXIT_OPERATION: i32 = 20;

const PROG_ID: &str = "Microsoft.Update.Session";

/// Characters the PowerShell tokenizer accepts as a single-quote delimiter.
const SINGLE_QUOTES: [char; 5] = ['\'', '\u{2018}', '\u{2019}', '\u{201A}', '\u{201B}'];

/// Quote `value` as a PowerShell single-quoted string literal.
///
/// Every quote character, curly ones included, is doubled so the value can
/// never end the literal.
#[must_use]
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if SINGLE_QUOTES.contains(&c) {
            quoted.push(c);
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

/// Encode a script for `-EncodedCommand` (base64 of UTF-16LE).
#[must_use]
pub fn encode_command(script: &str) -> String {
    let bytes: Vec<u8> = script.encode_utf16().flat_map(u16::to_le_bytes).collect();
    STANDARD.encode(bytes)
}

/// Wrap `body` with session activation and error-to-exit-code handling.
fn with_session(machine: &str, body: &str) -> String {
    format!(
        "$ErrorActionPreference = 'Stop'
$ProgressPreference = 'SilentlyContinue'
[Console]::OutputEncoding = [System.Text.Encoding]::UTF8
try {{
    $type = [type]::GetTypeFromProgID({prog_id}, {machine}, $true)
    $session = [activator]::CreateInstance($type)
}} catch {{
    [Console]::Error.WriteLine($_.Exception.Message)
    exit {EXIT_SESSION}
}}
try {{
{body}
}} catch {{
    [Console]::Error.WriteLine($_.Exception.Message)
    exit {EXIT_OPERATION}
}}
exit 0
",
        prog_id = quote(PROG_ID),
        machine = quote(machine),
    )
}

/// Activate a session and do nothing else.
#[must_use]
pub fn session_check(machine: &str) -> String {
    with_session(machine, "    [void]$session.CreateUpdateSearcher()")
}

/// Print the total history count.
#[must_use]
pub fn history_count(machine: &str) -> String {
    with_session(
        machine,
        "    $session.CreateUpdateSearcher().GetTotalHistoryCount()",
    )
}

/// Print history entries `start .. start + count` as a JSON array.
#[must_use]
pub fn query_history(machine: &str, start: u32, count: u32) -> String {
    let body = format!(
        "    $searcher = $session.CreateUpdateSearcher()
    $entries = foreach ($e in $searcher.QueryHistory({start}, {count})) {{
        [pscustomobject]@{{
            title = [string]$e.Title
            operation = [int]$e.Operation
            result = [int]$e.ResultCode
            description = [string]$e.Description
            date = [datetime]::SpecifyKind($e.Date, 'Utc').ToString('o')
        }}
    }}
    ConvertTo-Json -Compress -Depth 3 -InputObject @($entries)"
    );
    with_session(machine, &body)
}

const UPDATE_ROW: &str = "[pscustomobject]@{
            id = [string]$u.Identity.UpdateID
            title = [string]$u.Title
            description = [string]$u.Description
            kb_article_ids = @(foreach ($kb in $u.KBArticleIDs) { [string]$kb })
            is_downloaded = [bool]$u.IsDownloaded
        }";

/// Print updates matching `criteria` as a JSON array.
#[must_use]
pub fn search(machine: &str, criteria: &str) -> String {
    let body = format!(
        "    $found = $session.CreateUpdateSearcher().Search({criteria})
    $updates = foreach ($u in $found.Updates) {{
        {UPDATE_ROW}
    }}
    ConvertTo-Json -Compress -Depth 4 -InputObject @($updates)",
        criteria = quote(criteria),
    );
    with_session(machine, &body)
}

/// Download (and install unless `mode` is download-only) the updates with
/// the given ids, printing the result as one JSON object.
#[must_use]
pub fn fetch(machine: &str, criteria: &str, ids: &[String], mode: FetchMode) -> String {
    let wanted = ids.iter().map(|id| quote(id)).collect::<Vec<_>>().join(", ");
    let install = matches!(mode, FetchMode::Install);
    let body = format!(
        "    $wanted = @({wanted})
    $found = $session.CreateUpdateSearcher().Search({criteria})
    $selected = New-Object -ComObject 'Microsoft.Update.UpdateColl'
    foreach ($u in $found.Updates) {{
        if ($wanted -contains [string]$u.Identity.UpdateID) {{
            if (-not $u.EulaAccepted) {{ $u.AcceptEula() }}
            [void]$selected.Add($u)
        }}
    }}
    $downloader = $session.CreateUpdateDownloader()
    $downloader.Updates = $selected
    $run = $downloader.Download()
    $mode = 'download_only'
    $reboot = $false
    if (${install}) {{
        $installer = $session.CreateUpdateInstaller()
        $installer.Updates = $selected
        $run = $installer.Install()
        $mode = 'install'
        $reboot = [bool]$run.RebootRequired
    }}
    $rows = for ($i = 0; $i -lt $selected.Count; $i++) {{
        $r = $run.GetUpdateResult($i)
        [pscustomobject]@{{
            id = [string]$selected.Item($i).Identity.UpdateID
            title = [string]$selected.Item($i).Title
            result_code = [int]$r.ResultCode
            hresult = [int]$r.HResult
        }}
    }}
    $result = [pscustomobject]@{{
        mode = $mode
        result_code = [int]$run.ResultCode
        reboot_required = $reboot
        hresult = [int]$run.HResult
        updates = @($rows)
    }}
    ConvertTo-Json -Compress -Depth 4 -InputObject $result",
        criteria = quote(criteria),
    );
    with_session(machine, &body)
}
