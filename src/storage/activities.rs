//! Activity repository for JSON storage
//!
//! Manages loading and saving calendar activities to activities.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{MemberfileError, MemberfileResult};
use crate::models::{Activity, ActivityId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable activity data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ActivityData {
    #[serde(default)]
    activities: Vec<Activity>,
}

/// Repository for activity persistence
pub struct ActivityRepository {
    path: PathBuf,
    data: RwLock<HashMap<ActivityId, Activity>>,
}

impl ActivityRepository {
    /// Create a new activity repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load activities from disk
    pub fn load(&self) -> MemberfileResult<()> {
        let file_data: ActivityData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            MemberfileError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for activity in file_data.activities {
            data.insert(activity.id, activity);
        }

        Ok(())
    }

    /// Save activities to disk
    pub fn save(&self) -> MemberfileResult<()> {
        let activities = self.get_all()?;
        write_json_atomic(&self.path, &ActivityData { activities })
    }

    /// Get an activity by ID
    pub fn get(&self, id: ActivityId) -> MemberfileResult<Option<Activity>> {
        let data = self.data.read().map_err(|e| {
            MemberfileError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// Get all activities, ordered by start
    pub fn get_all(&self) -> MemberfileResult<Vec<Activity>> {
        let data = self.data.read().map_err(|e| {
            MemberfileError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut activities: Vec<_> = data.values().cloned().collect();
        activities.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.title.cmp(&b.title)));
        Ok(activities)
    }

    /// Insert or update an activity
    pub fn upsert(&self, activity: Activity) -> MemberfileResult<()> {
        let mut data = self.data.write().map_err(|e| {
            MemberfileError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(activity.id, activity);
        Ok(())
    }

    /// Delete an activity
    pub fn delete(&self, id: ActivityId) -> MemberfileResult<bool> {
        let mut data = self.data.write().map_err(|e| {
            MemberfileError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&id).is_some())
    }

    /// Count activities
    pub fn count(&self) -> MemberfileResult<usize> {
        let data = self.data.read().map_err(|e| {
            MemberfileError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, ActivityRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("activities.json");
        let repo = ActivityRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_upsert_get_delete() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let now = Utc::now();
        let activity = Activity::new("Borrel", now, now + Duration::hours(3));
        let id = activity.id;
        repo.upsert(activity).unwrap();

        assert_eq!(repo.get(id).unwrap().unwrap().title, "Borrel");
        assert!(repo.delete(id).unwrap());
        assert!(!repo.delete(id).unwrap());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_get_all_sorted_by_start() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let now = Utc::now();
        repo.upsert(Activity::new("Later", now + Duration::days(2), now + Duration::days(2)))
            .unwrap();
        repo.upsert(Activity::new("Sooner", now, now)).unwrap();

        let titles: Vec<_> = repo.get_all().unwrap().into_iter().map(|a| a.title).collect();
        assert_eq!(titles, vec!["Sooner", "Later"]);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let now = Utc::now();
        let activity = Activity::new("ALV", now, now + Duration::hours(2));
        let id = activity.id;
        repo.upsert(activity).unwrap();
        repo.save().unwrap();

        let repo2 = ActivityRepository::new(temp_dir.path().join("activities.json"));
        repo2.load().unwrap();
        assert!(repo2.get(id).unwrap().is_some());
    }
}
