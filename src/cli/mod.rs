//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod activity;
pub mod calendar;
pub mod log;
pub mod member;
pub mod user;

pub use activity::{handle_activity_command, ActivityCommands};
pub use calendar::{handle_calendar_command, CalendarCommands};
pub use log::{handle_log_command, ExportFormat, LogCommands};
pub use member::{handle_member_command, MemberCommands};
pub use user::{handle_user_command, UserCommands};

use crate::error::{MemberfileError, MemberfileResult};
use crate::models::UserId;
use crate::services::UserService;
use crate::storage::Storage;

/// Parse a `name=value` pair for a form field
pub fn parse_field(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in '{}'", s));
    }
    Ok((name.to_string(), value.to_string()))
}

/// Prompt for a password (hidden input)
pub(crate) fn prompt_password(prompt: &str) -> MemberfileResult<String> {
    rpassword::prompt_password(prompt)
        .map_err(|e| MemberfileError::Io(format!("Failed to read password: {}", e)))
}

/// The user named with `--as`, together with the password proving it
#[derive(Debug, Clone, Default)]
pub struct ActingUser {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ActingUser {
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Self { username, password }
    }

    /// Authenticate the acting user, if one was named
    ///
    /// The password is prompted for when it was not given.
    pub fn authenticate(&self, storage: &Storage) -> MemberfileResult<Option<UserId>> {
        let Some(username) = self.username.as_deref() else {
            return Ok(None);
        };
        let password = match &self.password {
            Some(password) => password.clone(),
            None => prompt_password(&format!("Password for {}: ", username))?,
        };
        let user = UserService::new(storage).authenticate(username, &password)?;
        Ok(Some(user.id))
    }

    /// Authenticate the acting user, failing when none was named
    pub fn require(&self, storage: &Storage) -> MemberfileResult<UserId> {
        self.authenticate(storage)?.ok_or_else(|| {
            MemberfileError::Validation(
                "This command changes the registry; name the acting admin with --as <username>"
                    .into(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::user::hash_password;
    use crate::test_support::{add_admin, create_test_storage};

    #[test]
    fn test_parse_field() {
        assert_eq!(
            parse_field("first_name=Ada").unwrap(),
            ("first_name".to_string(), "Ada".to_string())
        );
        assert_eq!(
            parse_field("phone_number=").unwrap(),
            ("phone_number".to_string(), String::new())
        );
        assert_eq!(
            parse_field("street=Het Eeuwige Veld=5").unwrap().1,
            "Het Eeuwige Veld=5"
        );
        assert!(parse_field("first_name").is_err());
        assert!(parse_field("=Ada").is_err());
    }

    #[test]
    fn test_acting_user_is_authenticated() {
        let (_temp, storage) = create_test_storage();
        let mut admin = add_admin(&storage, "board");
        admin.password_hash = hash_password("board-secret").unwrap();
        storage.users.upsert(admin.clone()).unwrap();

        let acting = ActingUser::new(Some("BOARD".into()), Some("board-secret".into()));
        assert_eq!(acting.require(&storage).unwrap(), admin.id);

        let wrong = ActingUser::new(Some("board".into()), Some("guessed".into()));
        assert_eq!(wrong.require(&storage).unwrap_err().status_code(), 401);

        let ghost = ActingUser::new(Some("ghost".into()), Some("board-secret".into()));
        assert_eq!(ghost.require(&storage).unwrap_err().status_code(), 401);

        let nobody = ActingUser::default();
        assert_eq!(nobody.authenticate(&storage).unwrap(), None);
        assert!(nobody.require(&storage).unwrap_err().is_validation());
    }
}
