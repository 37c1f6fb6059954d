// ── Auto-start list ───────────────────────────────────────────────────────────
//
// Windows keeps the assistive technologies to launch at logon in a single
// comma-separated `Configuration` string.  This module only edits that list;
// reading and writing it is the registrar's job.

/// Name of the value holding the list.
pub const CONFIGURATION_VALUE: &str = "Configuration";

/// Split a raw `Configuration` value into its entries.
///
/// An empty string is an empty list, not a list holding one empty entry.
pub fn parse(raw: &str) -> Vec<String> {
    let mut entries: Vec<String> = raw.split(',').map(str::to_owned).collect();
    if entries.first().is_some_and(|first| first.is_empty()) {
        entries.remove(0);
    }
    entries
}

pub fn join(entries: &[String]) -> String {
    entries.join(",")
}

pub fn contains(raw: &str, id: &str) -> bool {
    raw.split(',').any(|entry| entry == id)
}

/// Add or remove `id` in `entries`.
///
/// Enabling appends `id` when absent; disabling drops its first occurrence.
/// Returns whether the list changed, so callers can skip the write.
pub fn set_membership(entries: &mut Vec<String>, id: &str, enable: bool) -> bool {
    let position = entries.iter().position(|entry| entry == id);
    match (enable, position) {
        (true, None) => {
            entries.push(id.to_owned());
            true
        }
        (false, Some(i)) => {
            entries.remove(i);
            true
        }
        _ => false,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
