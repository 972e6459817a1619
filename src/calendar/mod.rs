//! Activity calendar
//!
//! Recurrence expansion and the bounded calendar feed.

pub mod feed;
pub mod recurrence;

pub use feed::{
    build_feed, parse_datetime, Feed, FeedEntry, FeedWindow, RecurrenceInfo, MAX_WINDOW_DAYS,
};
pub use recurrence::{occurrence_dates, occurrences_between, rule_dates};
