//! Store Module
//!
//! Flat-file persistence: the aggregate statistics snapshot, per-exchange
//! conversation records, the user credential table, and the login activity
//! log. Everything lives under the configured data directory; writes are
//! single-process, no durability guarantees beyond that.

pub mod activity;
pub mod conversation;
pub mod stats;
pub mod users;

pub use activity::{LoginEntry, LoginLog, LoginStats};
pub use conversation::{ConversationRecord, ConversationStore, ExportDocument};
pub use stats::StatsStore;
pub use users::{UserStore, DEMO_USERS};

/// Join fields into one CSV line, quoting only where needed.
pub(crate) fn format_row(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|f| {
            if f.contains(',') || f.contains('"') || f.contains('\n') {
                format!("\"{}\"", f.replace('"', "\"\""))
            } else {
                f.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Split one CSV line into fields, honoring double-quoted values.
pub(crate) fn parse_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}
