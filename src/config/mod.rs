//! Configuration module for memberfile
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Settings persistence
//! - Admin write-path preferences

pub mod paths;
pub mod settings;

pub use paths::MemberfilePaths;
pub use settings::{format_date, validate_date_format, MarkedRecordPolicy, Settings};
