//! User settings for memberfile
//!
//! Manages preferences that change how the admin write path and the calendar
//! feed behave.

use std::fmt::{self, Write};
use std::str::FromStr;

use chrono::NaiveDate;

use serde::{Deserialize, Serialize};

use super::paths::MemberfilePaths;
use crate::error::MemberfileError;

/// What happens to field changes submitted for a member that is marked for
/// deletion. No audit log is written in any of these modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MarkedRecordPolicy {
    /// Persist the changes without logging them
    #[default]
    Accept,
    /// Drop the changes and report success (read-only record)
    Ignore,
    /// Refuse the request with a permission error
    Reject,
}

impl MarkedRecordPolicy {
    /// Parse a policy name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "accept" => Some(Self::Accept),
            "ignore" => Some(Self::Ignore),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }
}

impl fmt::Display for MarkedRecordPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accept => write!(f, "accept"),
            Self::Ignore => write!(f, "ignore"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

impl FromStr for MarkedRecordPolicy {
    type Err = MemberfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            MemberfileError::Config(format!(
                "Invalid marked record policy: '{}'. Valid policies: accept, ignore, reject",
                s
            ))
        })
    }
}

/// User settings for memberfile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Handling of edits to members that are marked for deletion
    #[serde(default)]
    pub marked_record_policy: MarkedRecordPolicy,

    /// Largest window (in days) the calendar feed serves
    #[serde(default = "default_calendar_max_window_days")]
    pub calendar_max_window_days: i64,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_calendar_max_window_days() -> i64 {
    42
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            marked_record_policy: MarkedRecordPolicy::default(),
            calendar_max_window_days: default_calendar_max_window_days(),
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &MemberfilePaths) -> Result<Self, MemberfileError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                MemberfileError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                MemberfileError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &MemberfilePaths) -> Result<(), MemberfileError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            MemberfileError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents).map_err(|e| {
            MemberfileError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}

/// Format `date` with a strftime format, or `None` when the format does not
/// apply to a plain date (unknown specifiers, time or zone fields).
pub fn format_date(date: NaiveDate, date_format: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(date_format)).ok()?;
    Some(out)
}

/// Check that a strftime format can print calendar dates
pub fn validate_date_format(date_format: &str) -> Result<(), MemberfileError> {
    let reference_date = NaiveDate::from_ymd_opt(2000, 1, 1)
        .ok_or_else(|| MemberfileError::Config("invalid reference date".into()))?;
    match format_date(reference_date, date_format) {
        Some(_) => Ok(()),
        None => Err(MemberfileError::Validation(format!(
            "Invalid date format '{}': only date specifiers such as %Y, %m and %d are allowed",
            date_format
        ))),
    }
}
