//! Member registry repository for JSON storage
//!
//! Members, member logs and member log fields are kept together in
//! registry.json. Every mutation goes through [`RegistryRepository::transaction`]:
//! the closure works on a staged copy, and the copy only replaces the live
//! state after it has been written to disk.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::audit::{LogType, MemberLog, MemberLogField};
use crate::error::{MemberfileError, MemberfileResult};
use crate::models::{Member, MemberId, MemberLogFieldId, MemberLogId, UserId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable registry data structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RegistryData {
    #[serde(default)]
    last_member_id: u64,
    #[serde(default)]
    last_log_id: u64,
    #[serde(default)]
    last_log_field_id: u64,
    #[serde(default)]
    members: Vec<Member>,
    #[serde(default)]
    logs: Vec<MemberLog>,
    #[serde(default)]
    log_fields: Vec<MemberLogField>,
}

#[derive(Debug, Clone, Default)]
struct RegistryState {
    last_member_id: u64,
    last_log_id: u64,
    last_log_field_id: u64,
    members: BTreeMap<MemberId, Member>,
    logs: BTreeMap<MemberLogId, MemberLog>,
    log_fields: BTreeMap<MemberLogFieldId, MemberLogField>,
}

impl From<RegistryData> for RegistryState {
    fn from(data: RegistryData) -> Self {
        Self {
            last_member_id: data.last_member_id,
            last_log_id: data.last_log_id,
            last_log_field_id: data.last_log_field_id,
            members: data.members.into_iter().map(|m| (m.id, m)).collect(),
            logs: data.logs.into_iter().map(|l| (l.id, l)).collect(),
            log_fields: data.log_fields.into_iter().map(|f| (f.id, f)).collect(),
        }
    }
}

impl From<&RegistryState> for RegistryData {
    fn from(state: &RegistryState) -> Self {
        Self {
            last_member_id: state.last_member_id,
            last_log_id: state.last_log_id,
            last_log_field_id: state.last_log_field_id,
            members: state.members.values().cloned().collect(),
            logs: state.logs.values().cloned().collect(),
            log_fields: state.log_fields.values().cloned().collect(),
        }
    }
}

/// Staged changes to the registry
///
/// Constraint checks (unique email, referential integrity) run here, so a
/// violation aborts the whole transaction.
pub struct Transaction {
    state: RegistryState,
}

impl Transaction {
    /// Reserve the next member id
    pub fn allocate_member_id(&mut self) -> MemberId {
        self.state.last_member_id += 1;
        MemberId::new(self.state.last_member_id)
    }

    pub fn get_member(&self, id: MemberId) -> Option<&Member> {
        self.state.members.get(&id)
    }

    /// Whether another member already uses `email` (case-insensitive)
    pub fn email_taken(&self, email: &str, exclude: Option<MemberId>) -> bool {
        let email_lower = email.to_lowercase();
        self.state
            .members
            .values()
            .any(|m| m.details.email.to_lowercase() == email_lower && Some(m.id) != exclude)
    }

    /// Insert a new member
    pub fn insert_member(&mut self, member: Member) -> MemberfileResult<()> {
        if self.state.members.contains_key(&member.id) {
            return Err(MemberfileError::Duplicate {
                entity_type: "Member",
                identifier: member.id.to_string(),
            });
        }
        if self.email_taken(&member.details.email, None) {
            return Err(MemberfileError::Duplicate {
                entity_type: "Member",
                identifier: member.details.email.clone(),
            });
        }
        self.state.last_member_id = self.state.last_member_id.max(member.id.value());
        self.state.members.insert(member.id, member);
        Ok(())
    }

    /// Replace an existing member
    pub fn update_member(&mut self, member: Member) -> MemberfileResult<()> {
        if !self.state.members.contains_key(&member.id) {
            return Err(MemberfileError::member_not_found(member.id.to_string()));
        }
        if self.email_taken(&member.details.email, Some(member.id)) {
            return Err(MemberfileError::Duplicate {
                entity_type: "Member",
                identifier: member.details.email.clone(),
            });
        }
        self.state.members.insert(member.id, member);
        Ok(())
    }

    /// Remove a member together with its logs and their fields
    pub fn delete_member(&mut self, id: MemberId) -> MemberfileResult<Member> {
        let member = self
            .state
            .members
            .remove(&id)
            .ok_or_else(|| MemberfileError::member_not_found(id.to_string()))?;

        let log_ids: Vec<MemberLogId> = self
            .state
            .logs
            .values()
            .filter(|l| l.member == id)
            .map(|l| l.id)
            .collect();
        for log_id in log_ids {
            self.remove_log(log_id);
        }

        Ok(member)
    }

    /// Append a member log; ids strictly increase
    pub fn insert_log(
        &mut self,
        user: UserId,
        member: MemberId,
        log_type: LogType,
    ) -> MemberfileResult<MemberLogId> {
        if !self.state.members.contains_key(&member) {
            return Err(MemberfileError::member_not_found(member.to_string()));
        }

        self.state.last_log_id += 1;
        let id = MemberLogId::new(self.state.last_log_id);
        self.state.logs.insert(
            id,
            MemberLog {
                id,
                user,
                member,
                log_type,
                timestamp: Utc::now(),
            },
        );
        Ok(id)
    }

    /// Append a field row to an existing log
    pub fn insert_log_field(
        &mut self,
        member_log: MemberLogId,
        field: impl Into<String>,
        old_value: Option<String>,
        new_value: Option<String>,
    ) -> MemberfileResult<MemberLogFieldId> {
        if !self.state.logs.contains_key(&member_log) {
            return Err(MemberfileError::log_not_found(member_log.to_string()));
        }

        self.state.last_log_field_id += 1;
        let id = MemberLogFieldId::new(self.state.last_log_field_id);
        self.state.log_fields.insert(
            id,
            MemberLogField {
                id,
                member_log,
                field: field.into(),
                old_value,
                new_value,
            },
        );
        Ok(id)
    }

    /// Remove a log and its fields; the member is left alone
    pub fn delete_log(&mut self, id: MemberLogId) -> MemberfileResult<MemberLog> {
        self.remove_log(id)
            .ok_or_else(|| MemberfileError::log_not_found(id.to_string()))
    }

    fn remove_log(&mut self, id: MemberLogId) -> Option<MemberLog> {
        let log = self.state.logs.remove(&id)?;
        self.state.log_fields.retain(|_, f| f.member_log != id);
        Some(log)
    }
}

/// Repository for the member registry
pub struct RegistryRepository {
    path: PathBuf,
    state: RwLock<RegistryState>,
}

impl RegistryRepository {
    /// Create a new registry repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            state: RwLock::new(RegistryState::default()),
        }
    }

    fn read(&self) -> MemberfileResult<std::sync::RwLockReadGuard<'_, RegistryState>> {
        self.state
            .read()
            .map_err(|e| MemberfileError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    /// Load the registry from disk
    pub fn load(&self) -> MemberfileResult<()> {
        let file_data: RegistryData = read_json(&self.path)?;

        let mut state = self
            .state
            .write()
            .map_err(|e| MemberfileError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *state = file_data.into();

        Ok(())
    }

    /// Save the registry to disk
    pub fn save(&self) -> MemberfileResult<()> {
        let state = self.read()?;
        write_json_atomic(&self.path, &RegistryData::from(&*state))
    }

    /// Run `f` against a staged copy of the registry and commit it
    ///
    /// The write lock is held for the whole call, so transactions are
    /// serialized. If `f` fails, or the staged registry cannot be written to
    /// disk, nothing changes.
    pub fn transaction<T, F>(&self, f: F) -> MemberfileResult<T>
    where
        F: FnOnce(&mut Transaction) -> MemberfileResult<T>,
    {
        let mut state = self
            .state
            .write()
            .map_err(|e| MemberfileError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let mut tx = Transaction {
            state: state.clone(),
        };
        let value = f(&mut tx)?;

        write_json_atomic(&self.path, &RegistryData::from(&tx.state))?;
        *state = tx.state;
        debug!(path = %self.path.display(), "registry transaction committed");

        Ok(value)
    }

    /// Get a member by ID
    pub fn get_member(&self, id: MemberId) -> MemberfileResult<Option<Member>> {
        Ok(self.read()?.members.get(&id).cloned())
    }

    /// Get all members, ordered by id
    pub fn get_all_members(&self) -> MemberfileResult<Vec<Member>> {
        Ok(self.read()?.members.values().cloned().collect())
    }

    /// Get a member by email (case-insensitive)
    pub fn get_member_by_email(&self, email: &str) -> MemberfileResult<Option<Member>> {
        let email_lower = email.to_lowercase();
        Ok(self
            .read()?
            .members
            .values()
            .find(|m| m.details.email.to_lowercase() == email_lower)
            .cloned())
    }

    /// Count members
    pub fn member_count(&self) -> MemberfileResult<usize> {
        Ok(self.read()?.members.len())
    }

    /// Get a log by ID
    pub fn get_log(&self, id: MemberLogId) -> MemberfileResult<Option<MemberLog>> {
        Ok(self.read()?.logs.get(&id).cloned())
    }

    /// Get all logs in write order
    pub fn get_all_logs(&self) -> MemberfileResult<Vec<MemberLog>> {
        Ok(self.read()?.logs.values().cloned().collect())
    }

    /// Get the logs of one member in write order
    pub fn logs_for_member(&self, member: MemberId) -> MemberfileResult<Vec<MemberLog>> {
        Ok(self
            .read()?
            .logs
            .values()
            .filter(|l| l.member == member)
            .cloned()
            .collect())
    }

    /// Get the field rows of one log
    pub fn fields_for_log(&self, log: MemberLogId) -> MemberfileResult<Vec<MemberLogField>> {
        Ok(self
            .read()?
            .log_fields
            .values()
            .filter(|f| f.member_log == log)
            .cloned()
            .collect())
    }

    /// Get every field row
    pub fn get_all_log_fields(&self) -> MemberfileResult<Vec<MemberLogField>> {
        Ok(self.read()?.log_fields.values().cloned().collect())
    }

    /// Count logs
    pub fn log_count(&self) -> MemberfileResult<usize> {
        Ok(self.read()?.logs.len())
    }

    /// Count field rows
    pub fn log_field_count(&self) -> MemberfileResult<usize> {
        Ok(self.read()?.log_fields.len())
    }
}
