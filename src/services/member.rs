//! Member admin service
//!
//! The admin mutation boundary of the member registry. Every save runs the
//! field differ, the log writer and the deletion rules inside one registry
//! transaction, with the acting admin passed in explicitly.

use chrono::Utc;
use tracing::{info, warn};

use crate::audit::{
    authorize_hard_delete, log_save, resolve_marked_edit, transition, MarkedEdit, MemberLog,
    MemberLogField, Transition,
};
use crate::config::{MarkedRecordPolicy, Settings};
use crate::error::{FieldErrors, MemberfileError, MemberfileResult};
use crate::models::{Member, MemberForm, MemberId, MemberLogId, User, UserId};
use crate::storage::Storage;

/// A member log together with the field rows it owns
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub log: MemberLog,
    pub fields: Vec<MemberLogField>,
}

/// Service for administering members
pub struct MemberAdminService<'a> {
    storage: &'a Storage,
    policy: MarkedRecordPolicy,
}

impl<'a> MemberAdminService<'a> {
    /// Create a new member admin service
    pub fn new(storage: &'a Storage, settings: &Settings) -> Self {
        Self {
            storage,
            policy: settings.marked_record_policy,
        }
    }

    /// Use a specific policy for edits to marked members
    pub fn with_policy(storage: &'a Storage, policy: MarkedRecordPolicy) -> Self {
        Self { storage, policy }
    }

    fn require_admin(&self, actor: UserId) -> MemberfileResult<User> {
        let user = self
            .storage
            .users
            .get(actor)?
            .ok_or_else(|| MemberfileError::user_not_found(actor.to_string()))?;

        if !user.is_admin {
            warn!(user = %user.username, "non-admin attempted a registry mutation");
            return Err(MemberfileError::Forbidden(format!(
                "user '{}' is not an admin",
                user.username
            )));
        }

        Ok(user)
    }

    /// Reject an email already used by another member, as a field error
    fn check_email_unique(&self, email: &str) -> MemberfileResult<()> {
        if self.storage.registry.get_member_by_email(email)?.is_some() {
            return duplicate_email();
        }
        Ok(())
    }

    /// Create a member from a submitted form
    ///
    /// Writes an INSERT log, followed by a DELETE log when the form arrives
    /// already marked for deletion.
    pub fn create(&self, actor: UserId, form: &MemberForm) -> MemberfileResult<Member> {
        self.require_admin(actor)?;
        let details = form.clean().map_err(MemberfileError::FieldValidation)?;
        self.check_email_unique(&details.email)?;

        let (member, logs) = self.storage.registry.transaction(|tx| {
            let mut member = Member::new(tx.allocate_member_id(), details, Some(actor));
            member.marked_for_deletion = form.marked_for_deletion;

            tx.insert_member(member.clone())?;
            let logs = log_save(tx, actor, None, &member)?;
            Ok((member, logs))
        })?;

        info!(member = %member.id, %actor, logs = logs.len(), "member created");
        Ok(member)
    }

    /// Save a submitted form over an existing member
    ///
    /// The form's `marked_for_deletion` value drives the deletion state:
    /// setting it marks the member, clearing it unmarks. Edits to a member
    /// that stays marked are never logged and are handled by the configured
    /// [`MarkedRecordPolicy`].
    pub fn update(&self, actor: UserId, id: MemberId, form: &MemberForm) -> MemberfileResult<Member> {
        self.require_admin(actor)?;
        let details = form.clean().map_err(MemberfileError::FieldValidation)?;

        let policy = self.policy;
        let (member, logs) = self.storage.registry.transaction(|tx| {
            let before = tx
                .get_member(id)
                .cloned()
                .ok_or_else(|| MemberfileError::member_not_found(id.to_string()))?;
            let mut after = before.clone();

            match transition(Some(&before), form.marked_for_deletion) {
                Transition::Unchanged if before.marked_for_deletion => {
                    // last_updated_by keeps pointing at the marker
                    if details != before.details
                        && resolve_marked_edit(policy, &before)? == MarkedEdit::Persist
                    {
                        after.details = details;
                    }
                }
                Transition::Unchanged | Transition::Mark | Transition::Unmark => {
                    after.details = details;
                    after.last_updated_by = Some(actor);
                }
            }
            after.marked_for_deletion = form.marked_for_deletion;

            if after == before {
                return Ok((after, Vec::new()));
            }
            // Only details that are about to be stored must have a unique email
            if tx.email_taken(&after.details.email, Some(id)) {
                return duplicate_email();
            }
            after.updated_at = Utc::now();

            tx.update_member(after.clone())?;
            let logs = log_save(tx, actor, Some(&before), &after)?;
            Ok((after, logs))
        })?;

        info!(member = %member.id, %actor, logs = logs.len(), "member saved");
        Ok(member)
    }

    /// Mark a member for deletion without changing anything else
    pub fn mark_for_deletion(&self, actor: UserId, id: MemberId) -> MemberfileResult<Member> {
        let member = self.get_required(id)?;
        let mut form = MemberForm::from_member(&member);
        form.marked_for_deletion = true;
        self.update(actor, id, &form)
    }

    /// Clear the deletion mark of a member
    pub fn unmark(&self, actor: UserId, id: MemberId) -> MemberfileResult<Member> {
        let member = self.get_required(id)?;
        let mut form = MemberForm::from_member(&member);
        form.marked_for_deletion = false;
        self.update(actor, id, &form)
    }

    /// Remove a marked member for good
    ///
    /// Only an admin other than the one who marked the member may do this.
    /// The member's logs and log fields are removed with it.
    pub fn delete(&self, actor: UserId, id: MemberId) -> MemberfileResult<Member> {
        self.require_admin(actor)?;

        let result = self.storage.registry.transaction(|tx| {
            let member = tx
                .get_member(id)
                .cloned()
                .ok_or_else(|| MemberfileError::member_not_found(id.to_string()))?;
            authorize_hard_delete(&member, actor)?;
            tx.delete_member(id)
        });

        match result {
            Ok(member) => {
                info!(member = %id, %actor, "member deleted");
                Ok(member)
            }
            Err(e) => {
                if e.is_forbidden() {
                    warn!(member = %id, %actor, "hard delete refused: {}", e);
                }
                Err(e)
            }
        }
    }

    /// Remove a single log and its fields; the member is kept
    pub fn delete_log(&self, actor: UserId, id: MemberLogId) -> MemberfileResult<MemberLog> {
        self.require_admin(actor)?;
        let log = self.storage.registry.transaction(|tx| tx.delete_log(id))?;
        info!(log = %id, member = %log.member, %actor, "member log deleted");
        Ok(log)
    }

    /// Get a member by ID
    pub fn get(&self, id: MemberId) -> MemberfileResult<Option<Member>> {
        self.storage.registry.get_member(id)
    }

    fn get_required(&self, id: MemberId) -> MemberfileResult<Member> {
        self.get(id)?
            .ok_or_else(|| MemberfileError::member_not_found(id.to_string()))
    }

    /// Find a member by ID or email
    pub fn find(&self, identifier: &str) -> MemberfileResult<Option<Member>> {
        if let Ok(id) = identifier.parse::<MemberId>() {
            return self.get(id);
        }
        self.storage.registry.get_member_by_email(identifier)
    }

    /// List members, optionally hiding those marked for deletion
    pub fn list(&self, include_marked: bool) -> MemberfileResult<Vec<Member>> {
        let members = self.storage.registry.get_all_members()?;
        Ok(members
            .into_iter()
            .filter(|m| include_marked || !m.marked_for_deletion)
            .collect())
    }

    /// Logs of one member with their fields, oldest first
    pub fn history(&self, id: MemberId) -> MemberfileResult<Vec<LogRecord>> {
        self.storage
            .registry
            .logs_for_member(id)?
            .into_iter()
            .map(|log| self.with_fields(log))
            .collect()
    }

    /// All logs with their fields, oldest first
    pub fn all_logs(&self) -> MemberfileResult<Vec<LogRecord>> {
        self.storage
            .registry
            .get_all_logs()?
            .into_iter()
            .map(|log| self.with_fields(log))
            .collect()
    }

    /// A single log with its fields
    pub fn get_log(&self, id: MemberLogId) -> MemberfileResult<LogRecord> {
        let log = self
            .storage
            .registry
            .get_log(id)?
            .ok_or_else(|| MemberfileError::log_not_found(id.to_string()))?;
        self.with_fields(log)
    }

    fn with_fields(&self, log: MemberLog) -> MemberfileResult<LogRecord> {
        let fields = self.storage.registry.fields_for_log(log.id)?;
        Ok(LogRecord { log, fields })
    }
}

fn duplicate_email<T>() -> MemberfileResult<T> {
    let mut errors = FieldErrors::new();
    errors.add("email", "Member with this Email already exists.");
    Err(MemberfileError::FieldValidation(errors))
}
