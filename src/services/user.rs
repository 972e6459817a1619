//! User service
//!
//! Registration and credential checks for the users who act on the registry.
//! Passwords are stored as Argon2id PHC strings.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::{info, warn};

use crate::error::{FieldErrors, MemberfileError, MemberfileResult};
use crate::models::{User, UserId};
use crate::storage::Storage;

const REQUIRED: &str = "This field is required.";
const MIN_PASSWORD_LENGTH: usize = 8;
const COMMON_PASSWORDS: &[&str] = &[
    "password", "password1", "12345678", "123456789", "qwertyui", "iloveyou", "welcome1",
];

/// Error code of a failed login
pub const ERROR_INVALID_LOGIN: &str = "ERROR_INVALID_LOGIN";

/// Data submitted to register a new user
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub username: String,
    pub password1: String,
    pub password2: String,
    pub email: String,
    /// Optional display name
    pub nickname: String,
}

/// Service for user accounts
pub struct UserService<'a> {
    storage: &'a Storage,
}

impl<'a> UserService<'a> {
    /// Create a new user service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Validate a registration form, reporting every offending field
    pub fn validate(&self, form: &RegisterForm) -> MemberfileResult<()> {
        let mut errors = FieldErrors::new();

        let username = form.username.trim();
        if username.is_empty() {
            errors.add("username", REQUIRED);
        } else if self.storage.users.get_by_username(username)?.is_some() {
            errors.add("username", "A user with that username already exists.");
        }

        let email = form.email.trim();
        if email.is_empty() {
            errors.add("email", REQUIRED);
        } else if !email.contains('@') {
            errors.add("email", "Enter a valid email address.");
        } else if self.storage.users.get_by_email(email)?.is_some() {
            errors.add("email", "A user with that email address already exists.");
        }

        if form.password1.is_empty() {
            errors.add("password1", REQUIRED);
        }
        if form.password2.is_empty() {
            errors.add("password2", REQUIRED);
        } else if !form.password1.is_empty() {
            if form.password1 != form.password2 {
                errors.add("password2", "The two password fields didn't match.");
            } else if let Some(problem) = password_problem(&form.password2) {
                errors.add("password2", problem);
            }
        }

        errors.into_result()
    }

    /// Whether at least one admin is registered
    pub fn has_admin(&self) -> MemberfileResult<bool> {
        Ok(self.storage.users.get_all()?.iter().any(|u| u.is_admin))
    }

    /// Only an admin may change admin rights. The very first admin is the
    /// exception: while no admin exists, anyone may create one.
    fn require_admin_grant(&self, actor: Option<UserId>) -> MemberfileResult<()> {
        if !self.has_admin()? {
            return Ok(());
        }

        let acting = match actor {
            Some(id) => self.storage.users.get(id)?,
            None => None,
        };
        match acting {
            Some(user) if user.is_admin => Ok(()),
            Some(user) => {
                warn!(user = %user.username, "non-admin attempted to change admin rights");
                Err(MemberfileError::Forbidden(format!(
                    "user '{}' is not an admin",
                    user.username
                )))
            }
            None => {
                warn!("admin rights change without an acting admin");
                Err(MemberfileError::Forbidden(
                    "changing admin rights requires an acting admin".into(),
                ))
            }
        }
    }

    /// Register a new user
    ///
    /// Registering an admin needs `actor` to be an admin, unless no admin
    /// exists yet.
    pub fn register(
        &self,
        actor: Option<UserId>,
        form: &RegisterForm,
        is_admin: bool,
    ) -> MemberfileResult<User> {
        if is_admin {
            self.require_admin_grant(actor)?;
        }
        self.validate(form)?;

        let mut user = User::new(
            form.username.trim(),
            form.email.trim(),
            form.nickname.trim(),
            hash_password(&form.password1)?,
        );
        user.is_admin = is_admin;

        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;

        info!(user = %user.username, admin = is_admin, "user registered");
        Ok(user)
    }

    /// Check a username/password pair
    ///
    /// An unknown user and a wrong password fail the same way.
    pub fn authenticate(&self, username: &str, password: &str) -> MemberfileResult<User> {
        let mut errors = FieldErrors::new();
        if username.trim().is_empty() {
            errors.add("username", REQUIRED);
        }
        if password.is_empty() {
            errors.add("password", REQUIRED);
        }
        errors.into_result()?;

        match self.storage.users.get_by_username(username.trim())? {
            Some(user) if verify_password(password, &user.password_hash) => Ok(user),
            _ => {
                warn!(user = %username, "failed login");
                Err(MemberfileError::Authentication(ERROR_INVALID_LOGIN))
            }
        }
    }

    /// Grant or revoke admin rights on behalf of `actor`
    pub fn set_admin(
        &self,
        actor: Option<UserId>,
        username: &str,
        is_admin: bool,
    ) -> MemberfileResult<User> {
        self.require_admin_grant(actor)?;
        let mut user = self.find_required(username)?;
        user.is_admin = is_admin;

        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;

        info!(user = %user.username, admin = is_admin, "admin flag changed");
        Ok(user)
    }

    /// Look up a user by username, failing if absent
    pub fn find_required(&self, username: &str) -> MemberfileResult<User> {
        self.storage
            .users
            .get_by_username(username)?
            .ok_or_else(|| MemberfileError::user_not_found(username))
    }

    /// List all users
    pub fn list(&self) -> MemberfileResult<Vec<User>> {
        self.storage.users.get_all()
    }
}

fn password_problem(password: &str) -> Option<&'static str> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        Some("This password is too short. It must contain at least 8 characters.")
    } else if COMMON_PASSWORDS.contains(&password.to_lowercase().as_str()) {
        Some("This password is too common.")
    } else if password.chars().all(|c| c.is_ascii_digit()) {
        Some("This password is entirely numeric.")
    } else {
        None
    }
}

/// Hash a password with Argon2id and a random salt
pub fn hash_password(password: &str) -> MemberfileResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| MemberfileError::Storage(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a stored PHC string
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_storage;

    fn form(username: &str, password1: &str, password2: &str, email: &str) -> RegisterForm {
        RegisterForm {
            username: username.into(),
            password1: password1.into(),
            password2: password2.into(),
            email: email.into(),
            nickname: "wijbestaanniet".into(),
        }
    }

    fn valid_form(username: &str, email: &str) -> RegisterForm {
        form(username, "long-enough-pw", "long-enough-pw", email)
    }

    fn field_errors(err: MemberfileError) -> FieldErrors {
        match err {
            MemberfileError::FieldValidation(errors) => errors,
            other => panic!("expected field errors, got {:?}", other),
        }
    }

    #[test]
    fn test_register_and_authenticate() {
        let (_temp, storage) = create_test_storage();
        let service = UserService::new(&storage);

        let user = service
            .register(
                None,
                &form("schaduwkandi", "bestaatookniet", "bestaatookniet", "kandi@example.com"),
                false,
            )
            .unwrap();

        assert_eq!(user.email, "kandi@example.com");
        assert_eq!(user.nickname, "wijbestaanniet");
        assert_ne!(user.password_hash, "bestaatookniet");
        assert_eq!(
            service.authenticate("schaduwkandi", "bestaatookniet").unwrap().id,
            user.id
        );
    }

    #[test]
    fn test_missing_fields_one_error_each() {
        let (_temp, storage) = create_test_storage();
        let service = UserService::new(&storage);

        let errors = field_errors(service.validate(&RegisterForm::default()).unwrap_err());

        assert_eq!(errors.len(), 4);
        for field in ["username", "password1", "password2", "email"] {
            assert_eq!(errors.get(field).len(), 1, "{}", field);
        }
    }

    #[test]
    fn test_nonmatching_passwords() {
        let (_temp, storage) = create_test_storage();
        let service = UserService::new(&storage);

        let errors = field_errors(
            service
                .validate(&form("kandi", "bestaatookniet", "nomatch", "kandi@example.com"))
                .unwrap_err(),
        );

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("password2").len(), 1);
    }

    #[test]
    fn test_duplicate_username_and_email() {
        let (_temp, storage) = create_test_storage();
        let service = UserService::new(&storage);
        service
            .register(
                None,
                &form("schaduwbestuur", "bestaatniet", "bestaatniet", "rva@example.com"),
                false,
            )
            .unwrap();

        let errors = field_errors(
            service
                .validate(&form("schaduwbestuur", "secret", "secret", "rva@example.com"))
                .unwrap_err(),
        );

        assert_eq!(errors.get("username").len(), 1);
        assert_eq!(errors.get("email").len(), 1);
    }

    #[test]
    fn test_weak_password_rejected() {
        let (_temp, storage) = create_test_storage();
        let service = UserService::new(&storage);

        let result = service.register(
            None,
            &form("username", "password", "password", "email@example.com"),
            false,
        );

        assert!(field_errors(result.unwrap_err()).has_error("password2"));
        assert_eq!(storage.users.count().unwrap(), 0);
    }

    #[test]
    fn test_wrong_password_is_invalid_login() {
        let (_temp, storage) = create_test_storage();
        let service = UserService::new(&storage);
        service
            .register(
                None,
                &form("its-a-me", "mario-kart", "mario-kart", "mario@example.com"),
                false,
            )
            .unwrap();

        let err = service.authenticate("its-a-me", "luigi").unwrap_err();
        assert!(matches!(
            err,
            MemberfileError::Authentication(ERROR_INVALID_LOGIN)
        ));

        let err = service.authenticate("nobody", "luigi").unwrap_err();
        assert!(matches!(err, MemberfileError::Authentication(_)));
    }

    #[test]
    fn test_login_without_username() {
        let (_temp, storage) = create_test_storage();
        let service = UserService::new(&storage);

        let errors = field_errors(service.authenticate("", "wario").unwrap_err());
        assert_eq!(errors.len(), 1);
        assert!(errors.has_error("username"));
    }

    #[test]
    fn test_first_admin_bootstraps_then_admins_promote() {
        let (_temp, storage) = create_test_storage();
        let service = UserService::new(&storage);

        let first = service
            .register(None, &valid_form("board", "b@example.com"), true)
            .unwrap();
        assert!(first.is_admin);
        assert!(service.has_admin().unwrap());

        service
            .register(None, &valid_form("member", "m@example.com"), false)
            .unwrap();
        let user = service.set_admin(Some(first.id), "MEMBER", true).unwrap();
        assert!(user.is_admin);
        assert!(service.find_required("member").unwrap().is_admin);

        let user = service.set_admin(Some(first.id), "member", false).unwrap();
        assert!(!user.is_admin);
    }

    #[test]
    fn test_admin_rights_need_an_acting_admin() {
        let (_temp, storage) = create_test_storage();
        let service = UserService::new(&storage);
        let board = service
            .register(None, &valid_form("board", "b@example.com"), true)
            .unwrap();
        let guest = service
            .register(None, &valid_form("guest", "g@example.com"), false)
            .unwrap();

        let err = service.set_admin(Some(guest.id), "guest", true).unwrap_err();
        assert_eq!(err.status_code(), 403);
        let err = service.set_admin(None, "guest", true).unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert!(!service.find_required("guest").unwrap().is_admin);

        let second = form("second", "long-enough-pw", "long-enough-pw", "s@example.com");
        assert!(service.register(None, &second, true).unwrap_err().is_forbidden());
        assert!(service
            .register(Some(guest.id), &second, true)
            .unwrap_err()
            .is_forbidden());
        assert_eq!(storage.users.count().unwrap(), 2);

        assert!(service.register(Some(board.id), &second, true).unwrap().is_admin);
    }

    #[test]
    fn test_verify_password_rejects_garbage_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }
}
