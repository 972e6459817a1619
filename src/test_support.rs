//! Shared fixtures for unit tests

use chrono::NaiveDate;
use tempfile::TempDir;

use crate::config::MemberfilePaths;
use crate::models::{Member, MemberDetails, MemberForm, MemberId, User};
use crate::storage::Storage;

/// A valid member form with eleven filled fields
pub(crate) fn sample_form() -> MemberForm {
    MemberForm::from_pairs([
        ("initials", "F.C."),
        ("first_name", "Fantasy"),
        ("last_name", "Court"),
        ("date_of_birth", "1970-01-01"),
        ("email", "info@example.com"),
        ("street", "Veld"),
        ("house_number", "5"),
        ("city", "Eindhoven"),
        ("country", "The Netherlands"),
        ("member_since", "1970-01-01"),
        ("educational_institution", "TU/e"),
    ])
    .unwrap()
}

pub(crate) fn sample_details() -> MemberDetails {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    MemberDetails {
        initials: Some("F.C.".into()),
        first_name: "Fantasy".into(),
        tussenvoegsel: None,
        last_name: "Court".into(),
        tue_card_number: None,
        external_card_number: None,
        external_card_digits: None,
        external_card_cluster: None,
        date_of_birth: epoch,
        email: "info@example.com".into(),
        phone_number: None,
        street: "Veld".into(),
        house_number: 5,
        house_number_addition: None,
        postal_code: None,
        city: "Eindhoven".into(),
        state: None,
        country: "The Netherlands".into(),
        member_since: epoch,
        educational_institution: Some("TU/e".into()),
    }
}

pub(crate) fn sample_member(id: MemberId) -> Member {
    Member::new(id, sample_details(), None)
}

pub(crate) fn create_test_storage() -> (TempDir, Storage) {
    let temp_dir = TempDir::new().unwrap();
    let paths = MemberfilePaths::with_base_dir(temp_dir.path().to_path_buf());
    let mut storage = Storage::new(paths).unwrap();
    storage.load_all().unwrap();
    (temp_dir, storage)
}

/// Store an admin user without going through registration
pub(crate) fn add_admin(storage: &Storage, username: &str) -> User {
    let mut user = User::new(
        username,
        format!("{}@example.com", username),
        username,
        "not-a-real-hash",
    );
    user.is_admin = true;
    storage.users.upsert(user.clone()).unwrap();
    user
}
