//! Storage initialization
//!
//! Handles first-run setup: directories and empty data files

use crate::config::paths::MemberfilePaths;
use crate::error::MemberfileError;

use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Existing data files are left untouched.
pub fn initialize_storage(paths: &MemberfilePaths) -> Result<(), MemberfileError> {
    paths.ensure_directories()?;

    let empty = serde_json::json!({});
    for file in [
        paths.registry_file(),
        paths.users_file(),
        paths.activities_file(),
    ] {
        if !file.exists() {
            write_json_atomic(&file, &empty)?;
        }
    }

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &MemberfilePaths) -> bool {
    !paths.registry_file().exists()
}
