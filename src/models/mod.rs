//! Core data models for memberfile
//!
//! This module contains the data structures of the registry domain: members,
//! users and calendar activities. Member logs live in `audit`.

pub mod activity;
pub mod ids;
pub mod member;
pub mod user;

pub use activity::{Activity, Frequency, Recurrence, RecurrenceRule};
pub use ids::{ActivityId, MemberId, MemberLogFieldId, MemberLogId, UserId};
pub use member::{Member, MemberDetails, MemberForm, FORM_FIELDS};
pub use user::User;
