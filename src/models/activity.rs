//! Activity model
//!
//! Calendar activities, optionally repeating according to a set of simple
//! recurrence rules.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ActivityId;

/// How often a recurrence rule repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// Parse a frequency name
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Some(Self::Daily),
            "weekly" | "week" => Some(Self::Weekly),
            "monthly" | "month" => Some(Self::Monthly),
            _ => None,
        }
    }

    fn unit(&self) -> &'static str {
        match self {
            Self::Daily => "day",
            Self::Weekly => "week",
            Self::Monthly => "month",
        }
    }
}

/// A single repeating rule, anchored at the activity's start date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    /// Repeat every `interval` units (at least 1)
    #[serde(default = "default_interval")]
    pub interval: u32,
    /// Stop after this many occurrences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    /// Last date on which an occurrence may fall
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<NaiveDate>,
}

fn default_interval() -> u32 {
    1
}

impl RecurrenceRule {
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: 1,
            count: None,
            until: None,
        }
    }

    /// Human-readable description, e.g. "every 2 weeks, 5 times"
    pub fn to_text(&self) -> String {
        let mut text = match (self.frequency, self.interval) {
            (Frequency::Daily, 0 | 1) => "daily".to_string(),
            (Frequency::Weekly, 0 | 1) => "weekly".to_string(),
            (Frequency::Monthly, 0 | 1) => "monthly".to_string(),
            (freq, n) => format!("every {} {}s", n, freq.unit()),
        };
        if let Some(count) = self.count {
            text.push_str(&format!(", {} times", count));
        }
        if let Some(until) = self.until {
            text.push_str(&format!(", until {}", until.format("%Y-%m-%d")));
        }
        text
    }
}

/// Recurrence information of an activity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    #[serde(default)]
    pub rrules: Vec<RecurrenceRule>,
    #[serde(default)]
    pub exrules: Vec<RecurrenceRule>,
    /// Extra dates on which the activity takes place
    #[serde(default)]
    pub rdates: Vec<NaiveDate>,
    /// Dates on which it does not
    #[serde(default)]
    pub exdates: Vec<NaiveDate>,
}

impl Recurrence {
    /// An empty recurrence means a one-off activity
    pub fn is_empty(&self) -> bool {
        self.rrules.is_empty() && self.rdates.is_empty()
    }
}

/// A calendar activity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// The activity is hidden from the feed until this moment
    pub published_date: DateTime<Utc>,
    #[serde(default)]
    pub recurrence: Recurrence,
}

impl Activity {
    pub fn new(title: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            id: ActivityId::new(),
            title: title.into(),
            description: String::new(),
            location: String::new(),
            start,
            end,
            published_date: Utc::now(),
            recurrence: Recurrence::default(),
        }
    }

    pub fn is_recurring(&self) -> bool {
        !self.recurrence.is_empty()
    }

    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        self.published_date <= now
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.start.format("%Y-%m-%d %H:%M"))
    }
}
