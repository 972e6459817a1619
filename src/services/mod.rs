//! Service layer for memberfile
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, permissions, and audit logging.

pub mod activity;
pub mod member;
pub mod user;

pub use activity::{ActivityService, NewActivity};
pub use member::{LogRecord, MemberAdminService};
pub use user::{RegisterForm, UserService, ERROR_INVALID_LOGIN};
