//! User repository for JSON storage
//!
//! Manages loading and saving users to users.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{MemberfileError, MemberfileResult};
use crate::models::{User, UserId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable user data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct UserData {
    #[serde(default)]
    users: Vec<User>,
}

/// Repository for user persistence
pub struct UserRepository {
    path: PathBuf,
    data: RwLock<HashMap<UserId, User>>,
    /// Index: lowercase username -> user_id
    by_username: RwLock<HashMap<String, UserId>>,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_username: RwLock::new(HashMap::new()),
        }
    }

    /// Load users from disk
    pub fn load(&self) -> MemberfileResult<()> {
        let file_data: UserData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            MemberfileError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_username = self.by_username.write().map_err(|e| {
            MemberfileError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        by_username.clear();

        for user in file_data.users {
            by_username.insert(user.username.to_lowercase(), user.id);
            data.insert(user.id, user);
        }

        Ok(())
    }

    /// Save users to disk
    pub fn save(&self) -> MemberfileResult<()> {
        let data = self.data.read().map_err(|e| {
            MemberfileError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        let file_data = UserData { users };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a user by ID
    pub fn get(&self, id: UserId) -> MemberfileResult<Option<User>> {
        let data = self.data.read().map_err(|e| {
            MemberfileError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// Get all users, oldest first
    pub fn get_all(&self) -> MemberfileResult<Vec<User>> {
        let data = self.data.read().map_err(|e| {
            MemberfileError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    /// Get a user by username (case-insensitive)
    pub fn get_by_username(&self, username: &str) -> MemberfileResult<Option<User>> {
        let data = self.data.read().map_err(|e| {
            MemberfileError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        let by_username = self.by_username.read().map_err(|e| {
            MemberfileError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(by_username
            .get(&username.to_lowercase())
            .and_then(|id| data.get(id))
            .cloned())
    }

    /// Get a user by email (case-insensitive)
    pub fn get_by_email(&self, email: &str) -> MemberfileResult<Option<User>> {
        let data = self.data.read().map_err(|e| {
            MemberfileError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let email_lower = email.to_lowercase();
        Ok(data
            .values()
            .find(|u| u.email.to_lowercase() == email_lower)
            .cloned())
    }

    /// Insert or update a user
    pub fn upsert(&self, user: User) -> MemberfileResult<()> {
        let mut data = self.data.write().map_err(|e| {
            MemberfileError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_username = self.by_username.write().map_err(|e| {
            MemberfileError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if let Some(old) = data.get(&user.id) {
            by_username.remove(&old.username.to_lowercase());
        }

        by_username.insert(user.username.to_lowercase(), user.id);
        data.insert(user.id, user);
        Ok(())
    }

    /// Count users
    pub fn count(&self) -> MemberfileResult<usize> {
        let data = self.data.read().map_err(|e| {
            MemberfileError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }
}
