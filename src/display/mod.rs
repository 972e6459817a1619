//! Display formatting for terminal output
//!
//! Provides utilities for formatting data models for terminal display,
//! as plain aligned tables and detail views.

pub mod activity;
pub mod log;
pub mod member;

pub use activity::{format_activity_list, format_user_list};
pub use log::{format_log_details, format_log_list};
pub use member::{format_member_details, format_member_list};
