//! Two-party deletion workflow
//!
//! A member is deleted in two steps: one admin marks it for deletion, then a
//! different admin removes it. The state lives on the member itself
//! (`marked_for_deletion` plus `last_updated_by`); this module evaluates it.

use crate::config::MarkedRecordPolicy;
use crate::error::{MemberfileError, MemberfileResult};
use crate::models::{Member, UserId};

/// Deletion state of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionState {
    Active,
    /// `marked_by` is `None` when the record was marked without an editor
    MarkedForDeletion { marked_by: Option<UserId> },
}

impl DeletionState {
    /// Derive the state from a member's columns
    pub fn of(member: &Member) -> Self {
        if member.marked_for_deletion {
            Self::MarkedForDeletion {
                marked_by: member.last_updated_by,
            }
        } else {
            Self::Active
        }
    }

    pub fn is_marked(&self) -> bool {
        matches!(self, Self::MarkedForDeletion { .. })
    }
}

/// Change of deletion state requested by a save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Flag unchanged
    Unchanged,
    /// Active -> marked (also a create that arrives marked)
    Mark,
    /// Marked -> active
    Unmark,
}

/// Work out the transition a save performs
pub fn transition(before: Option<&Member>, mark_requested: bool) -> Transition {
    let was_marked = before.is_some_and(|m| m.marked_for_deletion);
    match (was_marked, mark_requested) {
        (false, true) => Transition::Mark,
        (true, false) => Transition::Unmark,
        _ => Transition::Unchanged,
    }
}

/// Check whether `requestor` may remove `member` for good
///
/// Allowed only for a marked member and only by someone other than the
/// marker.
pub fn authorize_hard_delete(member: &Member, requestor: UserId) -> MemberfileResult<()> {
    match DeletionState::of(member) {
        DeletionState::Active => Err(MemberfileError::Forbidden(format!(
            "member {} must be marked for deletion before it can be deleted",
            member.id
        ))),
        DeletionState::MarkedForDeletion {
            marked_by: Some(marker),
        } if marker == requestor => Err(MemberfileError::Forbidden(format!(
            "member {} was marked for deletion by the same user; another admin must delete it",
            member.id
        ))),
        DeletionState::MarkedForDeletion { .. } => Ok(()),
    }
}

/// What to do with field changes submitted for a member that stays marked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkedEdit {
    /// Store the submitted values
    Persist,
    /// Keep the stored values
    Discard,
}

/// Apply the configured policy to an edit of a member that stays marked
pub fn resolve_marked_edit(
    policy: MarkedRecordPolicy,
    member: &Member,
) -> MemberfileResult<MarkedEdit> {
    match policy {
        MarkedRecordPolicy::Accept => Ok(MarkedEdit::Persist),
        MarkedRecordPolicy::Ignore => Ok(MarkedEdit::Discard),
        MarkedRecordPolicy::Reject => Err(MemberfileError::Forbidden(format!(
            "member {} is marked for deletion and read-only until it is unmarked",
            member.id
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MemberId;
    use crate::test_support::sample_member;

    fn marked_by(user: Option<UserId>) -> Member {
        let mut member = sample_member(MemberId::new(1));
        member.marked_for_deletion = true;
        member.last_updated_by = user;
        member
    }

    #[test]
    fn test_state_of_member() {
        let admin = UserId::new();
        assert_eq!(
            DeletionState::of(&sample_member(MemberId::new(1))),
            DeletionState::Active
        );
        assert_eq!(
            DeletionState::of(&marked_by(Some(admin))),
            DeletionState::MarkedForDeletion {
                marked_by: Some(admin)
            }
        );
    }

    #[test]
    fn test_active_member_cannot_be_deleted() {
        let member = sample_member(MemberId::new(1));
        let err = authorize_hard_delete(&member, UserId::new()).unwrap_err();
        assert!(err.is_forbidden());
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn test_marker_cannot_delete() {
        let admin = UserId::new();
        let member = marked_by(Some(admin));
        assert!(authorize_hard_delete(&member, admin).unwrap_err().is_forbidden());
    }

    #[test]
    fn test_other_admin_can_delete() {
        let member = marked_by(Some(UserId::new()));
        assert!(authorize_hard_delete(&member, UserId::new()).is_ok());
    }

    #[test]
    fn test_unknown_marker_allows_delete() {
        let member = marked_by(None);
        assert!(authorize_hard_delete(&member, UserId::new()).is_ok());
    }

    #[test]
    fn test_transitions() {
        let active = sample_member(MemberId::new(1));
        let marked = marked_by(None);

        assert_eq!(transition(None, true), Transition::Mark);
        assert_eq!(transition(None, false), Transition::Unchanged);
        assert_eq!(transition(Some(&active), true), Transition::Mark);
        assert_eq!(transition(Some(&marked), false), Transition::Unmark);
        assert_eq!(transition(Some(&marked), true), Transition::Unchanged);
    }

    #[test]
    fn test_marked_edit_policies() {
        let member = marked_by(None);
        assert_eq!(
            resolve_marked_edit(MarkedRecordPolicy::Accept, &member).unwrap(),
            MarkedEdit::Persist
        );
        assert_eq!(
            resolve_marked_edit(MarkedRecordPolicy::Ignore, &member).unwrap(),
            MarkedEdit::Discard
        );
        assert!(resolve_marked_edit(MarkedRecordPolicy::Reject, &member)
            .unwrap_err()
            .is_forbidden());
    }
}
