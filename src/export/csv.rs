//! CSV Export functionality
//!
//! Exports the member audit log to CSV, one row per changed field.

use std::io::Write;

use crate::error::{MemberfileError, MemberfileResult};
use crate::export::json::AuditExport;
use crate::models::MemberId;
use crate::storage::Storage;

const HEADER: [&str; 9] = [
    "Log ID",
    "Timestamp",
    "Log Type",
    "Member",
    "User",
    "Username",
    "Field",
    "Old Value",
    "New Value",
];

/// Export the audit log to CSV
///
/// A log without fields (every DELETE log) still gets one row, with the field
/// columns left empty.
pub fn export_logs_csv<W: Write>(
    storage: &Storage,
    writer: W,
    member: Option<MemberId>,
) -> MemberfileResult<()> {
    let export = AuditExport::from_storage(storage, member)?;
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(HEADER)
        .map_err(|e| MemberfileError::Export(e.to_string()))?;

    for log in &export.logs {
        let id = log.id.to_string();
        let timestamp = log.timestamp.to_rfc3339();
        let log_type = log.log_type.to_string();
        let member = log.member.to_string();
        let user = log.user.as_uuid().to_string();
        let username = log.username.clone().unwrap_or_default();
        let prefix = [id, timestamp, log_type, member, user, username];

        if log.fields.is_empty() {
            csv_writer
                .write_record(prefix.iter().map(String::as_str).chain(["", "", ""]))
                .map_err(|e| MemberfileError::Export(e.to_string()))?;
            continue;
        }

        for field in &log.fields {
            csv_writer
                .write_record(prefix.iter().map(String::as_str).chain([
                    field.field.as_str(),
                    field.old_value.as_deref().unwrap_or(""),
                    field.new_value.as_deref().unwrap_or(""),
                ]))
                .map_err(|e| MemberfileError::Export(e.to_string()))?;
        }
    }

    csv_writer
        .flush()
        .map_err(|e| MemberfileError::Export(e.to_string()))?;

    Ok(())
}
