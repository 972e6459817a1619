//! Member audit log
//!
//! Records every create, update and deletion mark performed through the admin
//! interface, and decides who may remove a member.
//!
//! # Architecture
//!
//! - `MemberLog` / `MemberLogField`: an immutable log entry and the changed
//!   fields it owns.
//! - `MEMBER_FIELDS` / `diff_member`: the static table of logged fields and
//!   the differ that walks it.
//! - `write_log` / `log_save`: write logs into an open registry transaction.
//! - `DeletionState` / `authorize_hard_delete`: the two-party deletion rules.
//!
//! # Example
//!
//! ```rust,ignore
//! use memberfile::audit::{log_save, authorize_hard_delete};
//!
//! storage.registry.transaction(|tx| {
//!     tx.update_member(after.clone())?;
//!     log_save(tx, admin_id, Some(&before), &after)
//! })?;
//! ```

mod deletion;
mod diff;
mod entry;
mod fields;
mod writer;

pub use deletion::{
    authorize_hard_delete, resolve_marked_edit, transition, DeletionState, MarkedEdit, Transition,
};
pub use diff::{diff_member, summarize, FieldChange};
pub use entry::{LogType, MemberLog, MemberLogField};
pub use fields::{field_by_name, FieldAccessor, FieldDescriptor, MEMBER_FIELDS};
pub use writer::{log_save, write_log};
