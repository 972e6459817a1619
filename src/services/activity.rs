//! Activity service
//!
//! Provides activity management and the calendar feed.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::calendar::{build_feed, Feed, FeedWindow};
use crate::config::Settings;
use crate::error::{MemberfileError, MemberfileResult};
use crate::models::{Activity, ActivityId, Recurrence};
use crate::storage::Storage;

/// Input for a new activity
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub title: String,
    pub description: String,
    pub location: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Defaults to now
    pub published_date: Option<DateTime<Utc>>,
    pub recurrence: Recurrence,
}

/// Service for calendar activities
pub struct ActivityService<'a> {
    storage: &'a Storage,
    max_window_days: i64,
}

impl<'a> ActivityService<'a> {
    /// Create a new activity service
    pub fn new(storage: &'a Storage, settings: &Settings) -> Self {
        Self {
            storage,
            max_window_days: settings.calendar_max_window_days,
        }
    }

    /// Create a new activity
    pub fn create(&self, input: NewActivity) -> MemberfileResult<Activity> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(MemberfileError::Validation(
                "Activity title cannot be empty".into(),
            ));
        }
        if input.end < input.start {
            return Err(MemberfileError::Validation(
                "Activity cannot end before it starts".into(),
            ));
        }

        let mut activity = Activity::new(title, input.start, input.end);
        activity.description = input.description;
        activity.location = input.location;
        activity.recurrence = input.recurrence;
        if let Some(published) = input.published_date {
            activity.published_date = published;
        }

        self.storage.activities.upsert(activity.clone())?;
        self.storage.activities.save()?;

        info!(activity = %activity.id, title = %activity.title, "activity created");
        Ok(activity)
    }

    /// Get an activity by ID
    pub fn get(&self, id: ActivityId) -> MemberfileResult<Option<Activity>> {
        self.storage.activities.get(id)
    }

    /// List all activities
    pub fn list(&self) -> MemberfileResult<Vec<Activity>> {
        self.storage.activities.get_all()
    }

    /// Delete an activity
    pub fn delete(&self, id: ActivityId) -> MemberfileResult<()> {
        if !self.storage.activities.delete(id)? {
            return Err(MemberfileError::activity_not_found(id.to_string()));
        }
        self.storage.activities.save()?;
        info!(activity = %id, "activity deleted");
        Ok(())
    }

    /// The calendar feed for raw `start`/`end` request parameters
    pub fn feed(&self, start: Option<&str>, end: Option<&str>) -> MemberfileResult<Feed> {
        self.feed_at(start, end, Utc::now())
    }

    /// The calendar feed as seen at `now`
    pub fn feed_at(
        &self,
        start: Option<&str>,
        end: Option<&str>,
        now: DateTime<Utc>,
    ) -> MemberfileResult<Feed> {
        let window = FeedWindow::parse(start, end, self.max_window_days)?;
        let activities = self.storage.activities.get_all()?;
        Ok(build_feed(&activities, &window, now))
    }
}
