//! Remark history entries

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A timestamped, authored note appended to a record's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemarkEntry {
    pub text: String,
    pub timestamp: String,
    pub author: String,
}

impl RemarkEntry {
    /// Create an entry stamped with the given local time
    pub fn new(text: impl Into<String>, author: impl Into<String>, now: DateTime<Local>) -> Self {
        Self {
            text: text.into(),
            timestamp: format_timestamp(now),
            author: author.into(),
        }
    }
}

/// Human-readable local timestamp, e.g. `3/14/2024, 9:05:00 AM`
pub fn format_timestamp(now: DateTime<Local>) -> String {
    now.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Append a trimmed remark to a history when it has any content
///
/// Returns true when an entry was appended.
pub fn append_remark(
    history: &mut Vec<RemarkEntry>,
    text: &str,
    author: &str,
    now: DateTime<Local>,
) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }
    history.push(RemarkEntry::new(trimmed, author, now));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 14, h, m, 0).unwrap()
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(at(9, 5)), "3/14/2024, 9:05:00 AM");
        assert_eq!(format_timestamp(at(21, 30)), "3/14/2024, 9:30:00 PM");
    }

    #[test]
    fn test_append_remark_skips_blank() {
        let mut history = Vec::new();
        assert!(!append_remark(&mut history, "   ", "alice", at(9, 0)));
        assert!(history.is_empty());

        assert!(append_remark(&mut history, "  called back  ", "alice", at(9, 0)));
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].text, "called back");
        assert_eq!(history[0].author, "alice");
    }
}
