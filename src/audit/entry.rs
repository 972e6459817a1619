//! Member log data structures
//!
//! Defines the log type, the member log entry, and the per-field rows owned
//! by each entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{MemberId, MemberLogFieldId, MemberLogId, UserId};

/// Kind of mutation a member log records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogType {
    /// Member was created
    Insert,
    /// Member fields were changed
    Update,
    /// Member was marked for deletion
    Delete,
}

impl LogType {
    /// Parse a log type name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "INSERT" => Some(Self::Insert),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogType::Insert => write!(f, "INSERT"),
            LogType::Update => write!(f, "UPDATE"),
            LogType::Delete => write!(f, "DELETE"),
        }
    }
}

/// A single member log entry
///
/// Immutable once written. Ids are handed out in increasing order, so sorting
/// by id sorts by time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberLog {
    pub id: MemberLogId,

    /// The admin who performed the mutation
    pub user: UserId,

    /// The member that was mutated
    pub member: MemberId,

    pub log_type: LogType,

    /// When the mutation was committed (UTC)
    pub timestamp: DateTime<Utc>,
}

/// One changed field owned by a member log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberLogField {
    pub id: MemberLogFieldId,

    pub member_log: MemberLogId,

    pub field: String,

    /// Value before the mutation; always `None` for an insert
    pub old_value: Option<String>,

    pub new_value: Option<String>,
}

impl MemberLog {
    /// Format the entry and its fields for human-readable output
    pub fn format_human_readable(&self, fields: &[MemberLogField]) -> String {
        let mut output = format!(
            "[{}] #{} {} member {} by {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.id,
            self.log_type,
            self.member,
            self.user
        );

        for field in fields.iter().filter(|f| f.member_log == self.id) {
            output.push_str(&format!(
                "\n  {}: {} -> {}",
                field.field,
                field.old_value.as_deref().unwrap_or("(none)"),
                field.new_value.as_deref().unwrap_or("(none)")
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_log(log_type: LogType) -> MemberLog {
        MemberLog {
            id: MemberLogId::new(7),
            user: UserId::new(),
            member: MemberId::new(3),
            log_type,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_log_type_display_and_parse() {
        assert_eq!(LogType::Insert.to_string(), "INSERT");
        assert_eq!(LogType::Update.to_string(), "UPDATE");
        assert_eq!(LogType::Delete.to_string(), "DELETE");
        assert_eq!(LogType::parse("delete"), Some(LogType::Delete));
        assert_eq!(LogType::parse("upsert"), None);
    }

    #[test]
    fn test_log_type_serializes_uppercase() {
        let json = serde_json::to_string(&LogType::Update).unwrap();
        assert_eq!(json, "\"UPDATE\"");
    }

    #[test]
    fn test_human_readable_format() {
        let log = sample_log(LogType::Update);
        let fields = vec![
            MemberLogField {
                id: MemberLogFieldId::new(1),
                member_log: log.id,
                field: "first_name".into(),
                old_value: Some("Fantasy".into()),
                new_value: Some("NewFirstName".into()),
            },
            MemberLogField {
                id: MemberLogFieldId::new(2),
                member_log: MemberLogId::new(99),
                field: "city".into(),
                old_value: None,
                new_value: Some("Eindhoven".into()),
            },
        ];

        let formatted = log.format_human_readable(&fields);
        assert!(formatted.contains("#7 UPDATE member 3"));
        assert!(formatted.contains("first_name: Fantasy -> NewFirstName"));
        // rows of other logs are not shown
        assert!(!formatted.contains("city"));
    }
}
