//! memberfile - Member registry with a two-admin deletion workflow
//!
//! This library keeps the member records of an association together with a
//! field-level audit log of every change an admin makes to them. Deleting a
//! member takes two distinct admins: one marks the record, another confirms.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (members, users, activities)
//! - `storage`: JSON file storage layer with transactional registry writes
//! - `audit`: Member logs, field diffs and the deletion state machine
//! - `services`: Business logic layer
//! - `calendar`: Recurrence expansion and the activity feed
//! - `export`: CSV, JSON and YAML export of member logs
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use memberfile::config::{MemberfilePaths, Settings};
//! use memberfile::storage::Storage;
//!
//! let paths = MemberfilePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut storage = Storage::new(paths)?;
//! storage.load_all()?;
//! ```

pub mod audit;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

#[cfg(test)]
mod test_support;

pub use error::{MemberfileError, MemberfileResult};
