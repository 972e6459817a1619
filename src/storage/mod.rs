//! Storage layer for memberfile
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation. The member registry is transactional; users and activities are
//! plain repositories saved after each change.

pub mod activities;
pub mod file_io;
pub mod init;
pub mod registry;
pub mod users;

pub use activities::ActivityRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use registry::{RegistryRepository, Transaction};
pub use users::UserRepository;

use crate::config::paths::MemberfilePaths;
use crate::error::MemberfileError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: MemberfilePaths,
    pub registry: RegistryRepository,
    pub users: UserRepository,
    pub activities: ActivityRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: MemberfilePaths) -> Result<Self, MemberfileError> {
        paths.ensure_directories()?;

        Ok(Self {
            registry: RegistryRepository::new(paths.registry_file()),
            users: UserRepository::new(paths.users_file()),
            activities: ActivityRepository::new(paths.activities_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &MemberfilePaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), MemberfileError> {
        self.registry.load()?;
        self.users.load()?;
        self.activities.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), MemberfileError> {
        self.registry.save()?;
        self.users.save()?;
        self.activities.save()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.settings_file().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MemberfilePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_save_all_writes_every_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MemberfilePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths.clone()).unwrap();
        storage.load_all().unwrap();
        storage.save_all().unwrap();

        assert!(paths.registry_file().exists());
        assert!(paths.users_file().exists());
        assert!(paths.activities_file().exists());
    }
}
