//! JSON Export functionality
//!
//! Exports the member audit log to JSON format with schema versioning.

use std::collections::{HashMap, HashSet};
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audit::LogType;
use crate::error::{MemberfileError, MemberfileResult};
use crate::models::{MemberId, MemberLogId, UserId};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Audit log export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// Exported logs, oldest first
    pub logs: Vec<ExportedLog>,

    pub metadata: ExportMetadata,
}

/// A member log with its fields, denormalized for reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedLog {
    pub id: MemberLogId,
    pub timestamp: DateTime<Utc>,
    pub log_type: LogType,
    pub member: MemberId,
    pub user: UserId,
    /// Username of `user`, if the user still exists
    pub username: Option<String>,
    pub fields: Vec<ExportedField>,
}

/// One changed field of an exported log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedField {
    pub field: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub log_count: usize,
    pub field_count: usize,
    /// Number of distinct members the exported logs refer to
    pub member_count: usize,
    /// Restricted to one member, if any
    pub member_filter: Option<MemberId>,
}

impl AuditExport {
    /// Build an export from storage, optionally restricted to one member
    pub fn from_storage(storage: &Storage, member: Option<MemberId>) -> MemberfileResult<Self> {
        let logs = match member {
            Some(id) => storage.registry.logs_for_member(id)?,
            None => storage.registry.get_all_logs()?,
        };

        let usernames: HashMap<UserId, String> = storage
            .users
            .get_all()?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        let mut exported = Vec::with_capacity(logs.len());
        for log in logs {
            let fields = storage
                .registry
                .fields_for_log(log.id)?
                .into_iter()
                .map(|f| ExportedField {
                    field: f.field,
                    old_value: f.old_value,
                    new_value: f.new_value,
                })
                .collect();

            exported.push(ExportedLog {
                id: log.id,
                timestamp: log.timestamp,
                log_type: log.log_type,
                member: log.member,
                user: log.user,
                username: usernames.get(&log.user).cloned(),
                fields,
            });
        }

        let members: HashSet<MemberId> = exported.iter().map(|l| l.member).collect();
        let metadata = ExportMetadata {
            log_count: exported.len(),
            field_count: exported.iter().map(|l| l.fields.len()).sum(),
            member_count: members.len(),
            member_filter: member,
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            logs: exported,
            metadata,
        })
    }
}

/// Export the audit log to JSON
pub fn export_logs_json<W: Write>(
    storage: &Storage,
    writer: &mut W,
    member: Option<MemberId>,
    pretty: bool,
) -> MemberfileResult<()> {
    let export = AuditExport::from_storage(storage, member)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| MemberfileError::Export(e.to_string()))?;

    Ok(())
}
