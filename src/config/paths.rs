//! Path management for memberfile
//!
//! Provides XDG-compliant path resolution for configuration and data.
//!
//! ## Path Resolution Order
//!
//! 1. `MEMBERFILE_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/memberfile` or `~/.config/memberfile`
//! 3. Windows: `%APPDATA%\memberfile`

use std::path::PathBuf;

use crate::error::MemberfileError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "MEMBERFILE_DATA_DIR";

/// Manages all paths used by memberfile
#[derive(Debug, Clone)]
pub struct MemberfilePaths {
    /// Base directory for all memberfile data
    base_dir: PathBuf,
}

impl MemberfilePaths {
    /// Create a new MemberfilePaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, MemberfileError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create MemberfilePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/memberfile/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/memberfile/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Members, member logs and log fields share one file so that a commit
    /// replaces all three at once.
    pub fn registry_file(&self) -> PathBuf {
        self.data_dir().join("registry.json")
    }

    /// Get the path to users.json
    pub fn users_file(&self) -> PathBuf {
        self.data_dir().join("users.json")
    }

    /// Get the path to activities.json
    pub fn activities_file(&self) -> PathBuf {
        self.data_dir().join("activities.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), MemberfileError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| MemberfileError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| MemberfileError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if memberfile has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, MemberfileError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME").map_err(|_| {
                MemberfileError::Config("HOME environment variable not set".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("memberfile"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, MemberfileError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| MemberfileError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("memberfile"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MemberfilePaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();
        let custom_path = temp_dir.path().to_str().unwrap();

        env::set_var(DATA_DIR_ENV, custom_path);

        let paths = MemberfilePaths::new().unwrap();
        assert_eq!(paths.base_dir(), temp_dir.path());

        env::remove_var(DATA_DIR_ENV);
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MemberfilePaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MemberfilePaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(
            paths.registry_file(),
            temp_dir.path().join("data").join("registry.json")
        );
        assert_eq!(
            paths.users_file(),
            temp_dir.path().join("data").join("users.json")
        );
    }
}
