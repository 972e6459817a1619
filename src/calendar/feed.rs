//! Calendar feed
//!
//! Serves the published activities of a bounded window as the JSON document
//! consumed by the calendar front end.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::Serialize;

use super::recurrence::occurrences_between;
use crate::error::{MemberfileError, MemberfileResult};
use crate::models::{Activity, ActivityId};

/// Default largest window the feed serves, in days
pub const MAX_WINDOW_DAYS: i64 = 42;

/// A validated feed window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl FeedWindow {
    /// Validate raw `start`/`end` request parameters
    ///
    /// Both bounds are required and must be ISO-8601 date-times; a bound
    /// without an offset is taken as UTC. The window may span at most
    /// `max_days` whole days.
    pub fn parse(start: Option<&str>, end: Option<&str>, max_days: i64) -> MemberfileResult<Self> {
        let (Some(start), Some(end)) = (start, end) else {
            return Err(MemberfileError::BadRequest(
                "start and end date must be provided".into(),
            ));
        };

        let (Some(start), Some(end)) = (parse_datetime(start), parse_datetime(end)) else {
            return Err(MemberfileError::BadRequest(
                "start and end date must be in yyyy-mm-ddThh:mm:ss+hh:mm format".into(),
            ));
        };

        if (end - start).num_days() > max_days {
            return Err(MemberfileError::BadRequest(format!(
                "start and end date cannot differ more than {} days",
                max_days
            )));
        }
        if end < start {
            return Err(MemberfileError::BadRequest(
                "start date must not be after end date".into(),
            ));
        }

        Ok(Self { start, end })
    }
}

/// Parse an RFC 3339 timestamp; naive date-times and plain dates are taken as UTC
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Recurrence description attached to every entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecurrenceInfo {
    pub rrules: Vec<String>,
    pub exrules: Vec<String>,
    pub rdates: Vec<String>,
    pub exdates: Vec<String>,
}

/// One calendar entry: a one-off activity or one occurrence of a recurring one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    pub group_id: ActivityId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub recurrence_info: RecurrenceInfo,
    pub start: String,
    pub end: String,
    pub all_day: bool,
}

impl FeedEntry {
    fn new(activity: &Activity, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let recurrence = &activity.recurrence;
        let iso_date = |d: &NaiveDate| d.format("%Y-%m-%d").to_string();
        Self {
            group_id: activity.id,
            title: activity.title.clone(),
            description: activity.description.clone(),
            location: activity.location.clone(),
            recurrence_info: RecurrenceInfo {
                rrules: recurrence.rrules.iter().map(|r| r.to_text()).collect(),
                exrules: recurrence.exrules.iter().map(|r| r.to_text()).collect(),
                rdates: recurrence.rdates.iter().map(iso_date).collect(),
                exdates: recurrence.exdates.iter().map(iso_date).collect(),
            },
            start: start.to_rfc3339_opts(SecondsFormat::Secs, false),
            end: end.to_rfc3339_opts(SecondsFormat::Secs, false),
            all_day: false,
        }
    }
}

/// The feed document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Feed {
    pub activities: Vec<FeedEntry>,
}

/// Build the feed for `window` as seen at `now`
///
/// Unpublished activities are skipped. One-off activities appear once when
/// they overlap the window. Recurring activities appear once per occurrence
/// starting inside the window, each keeping the original start and end time
/// of day and the number of days between them.
pub fn build_feed(activities: &[Activity], window: &FeedWindow, now: DateTime<Utc>) -> Feed {
    let mut entries = Vec::new();

    for activity in activities.iter().filter(|a| a.is_published(now)) {
        if !activity.is_recurring() {
            if activity.start <= window.end && activity.end >= window.start {
                entries.push(FeedEntry::new(activity, activity.start, activity.end));
            }
            continue;
        }

        let span_days = (activity.end.date_naive() - activity.start.date_naive()).num_days();
        let end_time = activity.end.time();
        for start in occurrences_between(activity, window.start, window.end) {
            let end_date = start.date_naive() + Duration::days(span_days);
            let end = end_date.and_time(end_time).and_utc();
            entries.push(FeedEntry::new(activity, start, end));
        }
    }

    Feed { activities: entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frequency, RecurrenceRule};
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn window(start: DateTime<Utc>, end: DateTime<Utc>) -> FeedWindow {
        FeedWindow { start, end }
    }

    fn published(title: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Activity {
        let mut activity = Activity::new(title, start, end);
        activity.published_date = utc(2000, 1, 1, 0);
        activity
    }

    #[test]
    fn test_missing_bound_rejected() {
        let err = FeedWindow::parse(Some("2024-01-01T00:00:00+00:00"), None, 42).unwrap_err();
        assert_eq!(err.to_string(), "Bad request: start and end date must be provided");
        assert_eq!(err.status_code(), 400);

        assert!(FeedWindow::parse(None, Some("2024-01-01"), 42).is_err());
    }

    #[test]
    fn test_malformed_bound_rejected() {
        let err = FeedWindow::parse(Some("yesterday"), Some("2024-01-01"), 42).unwrap_err();
        assert!(err.to_string().contains("yyyy-mm-ddThh:mm:ss+hh:mm"));
    }

    #[test]
    fn test_window_too_wide_rejected() {
        let err = FeedWindow::parse(
            Some("2024-01-01T00:00:00+00:00"),
            Some("2024-02-13T00:00:00+00:00"),
            42,
        )
        .unwrap_err();
        assert!(err.to_string().contains("cannot differ more than 42 days"));

        // 42 whole days plus a few hours still fits
        assert!(FeedWindow::parse(
            Some("2024-01-01T00:00:00+00:00"),
            Some("2024-02-12T05:00:00+00:00"),
            42
        )
        .is_ok());
    }

    #[test]
    fn test_offsets_are_normalized_to_utc() {
        let parsed = FeedWindow::parse(
            Some("2024-01-01T01:00:00+01:00"),
            Some("2024-01-08T00:00:00"),
            42,
        )
        .unwrap();
        assert_eq!(parsed.start, utc(2024, 1, 1, 0));
        assert_eq!(parsed.end, utc(2024, 1, 8, 0));
    }

    #[test]
    fn test_non_recurring_overlap() {
        let activities = vec![
            published("Inside", utc(2024, 1, 3, 20), utc(2024, 1, 3, 23)),
            published("Straddles", utc(2023, 12, 31, 20), utc(2024, 1, 1, 2)),
            published("Before", utc(2023, 12, 1, 20), utc(2023, 12, 1, 23)),
            published("After", utc(2024, 2, 1, 20), utc(2024, 2, 1, 23)),
        ];

        let feed = build_feed(
            &activities,
            &window(utc(2024, 1, 1, 0), utc(2024, 1, 8, 0)),
            utc(2024, 1, 1, 0),
        );

        let titles: Vec<_> = feed.activities.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Inside", "Straddles"]);
    }

    #[test]
    fn test_unpublished_activities_hidden() {
        let mut activity = published("Secret", utc(2024, 1, 3, 20), utc(2024, 1, 3, 23));
        activity.published_date = utc(2024, 6, 1, 0);

        let feed = build_feed(
            &[activity],
            &window(utc(2024, 1, 1, 0), utc(2024, 1, 8, 0)),
            utc(2024, 1, 1, 0),
        );
        assert!(feed.activities.is_empty());
    }

    #[test]
    fn test_recurring_occurrences_keep_times_and_span() {
        // Weekly weekend camp, Saturday 10:00 to Sunday 16:00
        let mut activity = published("Weekend", utc(2024, 1, 6, 10), utc(2024, 1, 7, 16));
        activity
            .recurrence
            .rrules
            .push(RecurrenceRule::new(Frequency::Weekly));

        let feed = build_feed(
            &[activity],
            &window(utc(2024, 1, 10, 0), utc(2024, 1, 24, 0)),
            utc(2024, 1, 1, 0),
        );

        assert_eq!(feed.activities.len(), 2);
        assert_eq!(feed.activities[0].start, "2024-01-13T10:00:00+00:00");
        assert_eq!(feed.activities[0].end, "2024-01-14T16:00:00+00:00");
        assert_eq!(feed.activities[1].start, "2024-01-20T10:00:00+00:00");
        assert_eq!(feed.activities[0].recurrence_info.rrules, vec!["weekly"]);
    }

    #[test]
    fn test_entry_json_shape() {
        let activity = published("Borrel", utc(2024, 1, 3, 20), utc(2024, 1, 3, 23));
        let feed = build_feed(
            &[activity],
            &window(utc(2024, 1, 1, 0), utc(2024, 1, 8, 0)),
            utc(2024, 1, 1, 0),
        );

        let json = serde_json::to_value(&feed).unwrap();
        let entry = &json["activities"][0];
        assert!(entry["groupId"].is_string());
        assert_eq!(entry["allDay"], false);
        assert_eq!(entry["start"], "2024-01-03T20:00:00+00:00");
        assert!(entry["recurrenceInfo"]["exdates"].as_array().unwrap().is_empty());
    }
}
