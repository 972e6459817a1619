//! Member log display formatting

use std::collections::HashMap;

use crate::models::UserId;
use crate::services::LogRecord;

/// Format logs as a table, one row per log
pub fn format_log_list(records: &[LogRecord], usernames: &HashMap<UserId, String>) -> String {
    if records.is_empty() {
        return "No member logs found.".to_string();
    }

    let user_width = records
        .iter()
        .map(|r| username(usernames, r.log.user).len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:>6}  {:<19}  {:<6}  {:>6}  {:<user_width$}  {}\n",
        "ID",
        "Timestamp",
        "Type",
        "Member",
        "User",
        "Fields",
        user_width = user_width,
    ));
    output.push_str(&format!(
        "{:->6}  {:-<19}  {:-<6}  {:->6}  {:-<user_width$}  {:-<20}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        user_width = user_width,
    ));

    for record in records {
        let fields: Vec<&str> = record.fields.iter().map(|f| f.field.as_str()).collect();
        output.push_str(&format!(
            "{:>6}  {:<19}  {:<6}  {:>6}  {:<user_width$}  {}\n",
            record.log.id.to_string(),
            record.log.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            record.log.log_type.to_string(),
            record.log.member.to_string(),
            username(usernames, record.log.user),
            fields.join(", "),
            user_width = user_width,
        ));
    }

    output
}

fn username(usernames: &HashMap<UserId, String>, id: UserId) -> String {
    usernames
        .get(&id)
        .cloned()
        .unwrap_or_else(|| id.to_string())
}

/// Format one log with all of its field rows
pub fn format_log_details(record: &LogRecord) -> String {
    let mut output = record.log.format_human_readable(&record.fields);
    if record.fields.is_empty() {
        output.push_str("\n  (no fields)");
    }
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{LogType, MemberLog, MemberLogField};
    use crate::models::{MemberId, MemberLogFieldId, MemberLogId};
    use chrono::Utc;

    fn record(log_type: LogType, fields: &[&str]) -> LogRecord {
        let log = MemberLog {
            id: MemberLogId::new(1),
            user: UserId::new(),
            member: MemberId::new(4),
            log_type,
            timestamp: Utc::now(),
        };
        let fields = fields
            .iter()
            .enumerate()
            .map(|(i, name)| MemberLogField {
                id: MemberLogFieldId::new(i as u64 + 1),
                member_log: log.id,
                field: name.to_string(),
                old_value: None,
                new_value: Some("x".into()),
            })
            .collect();
        LogRecord { log, fields }
    }

    #[test]
    fn test_list_uses_usernames() {
        let rec = record(LogType::Update, &["city", "street"]);
        let mut usernames = HashMap::new();
        usernames.insert(rec.log.user, "board".to_string());

        let output = format_log_list(&[rec], &usernames);
        assert!(output.contains("board"));
        assert!(output.contains("city, street"));
    }

    #[test]
    fn test_delete_details() {
        let output = format_log_details(&record(LogType::Delete, &[]));
        assert!(output.contains("DELETE member 4"));
        assert!(output.contains("(no fields)"));
    }
}
