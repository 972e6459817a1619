//! Member log writer
//!
//! Writes member logs and their field rows into an open registry
//! transaction. Nothing written here is visible until the transaction
//! commits, and a failed commit discards the logs together with the member
//! mutation that caused them.

use tracing::debug;

use super::diff::{diff_member, FieldChange};
use super::entry::LogType;
use crate::error::{MemberfileError, MemberfileResult};
use crate::models::{Member, MemberId, MemberLogId, UserId};
use crate::storage::Transaction;

/// Write one member log and one field row per change
///
/// DELETE logs never carry fields and UPDATE logs always carry at least one;
/// both rules are enforced here.
pub fn write_log(
    tx: &mut Transaction,
    user: UserId,
    member: MemberId,
    log_type: LogType,
    changes: &[FieldChange],
) -> MemberfileResult<MemberLogId> {
    match log_type {
        LogType::Delete if !changes.is_empty() => {
            return Err(MemberfileError::Validation(
                "A DELETE log cannot carry field changes".into(),
            ));
        }
        LogType::Update if changes.is_empty() => {
            return Err(MemberfileError::Validation(
                "An UPDATE log needs at least one changed field".into(),
            ));
        }
        _ => {}
    }

    let log_id = tx.insert_log(user, member, log_type)?;
    for change in changes {
        tx.insert_log_field(
            log_id,
            change.field,
            change.old_value.clone(),
            change.new_value.clone(),
        )?;
    }

    debug!(log = %log_id, %member, %log_type, fields = changes.len(), "member log staged");
    Ok(log_id)
}

/// Write the logs that saving `after` over `before` calls for
///
/// - create: one INSERT log;
/// - update: one UPDATE log if any logged field changed;
/// - newly marked for deletion: a DELETE log after the above;
/// - record already marked and still marked: nothing.
///
/// Returns the written log ids in write order.
pub fn log_save(
    tx: &mut Transaction,
    user: UserId,
    before: Option<&Member>,
    after: &Member,
) -> MemberfileResult<Vec<MemberLogId>> {
    let was_marked = before.is_some_and(|b| b.marked_for_deletion);
    if was_marked && after.marked_for_deletion {
        return Ok(Vec::new());
    }

    let mut written = Vec::new();
    let changes = diff_member(before, after);

    match before {
        None => written.push(write_log(tx, user, after.id, LogType::Insert, &changes)?),
        Some(_) if !changes.is_empty() => {
            written.push(write_log(tx, user, after.id, LogType::Update, &changes)?)
        }
        Some(_) => {}
    }

    if after.marked_for_deletion && !was_marked {
        written.push(write_log(tx, user, after.id, LogType::Delete, &[])?);
    }

    Ok(written)
}
