//! Member model
//!
//! A member record in the registry, plus the form through which the admin
//! interface submits member data.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{MemberId, UserId};
use crate::error::{FieldErrors, MemberfileError, MemberfileResult};

const DATE_FORMAT: &str = "%Y-%m-%d";
const REQUIRED: &str = "This field is required.";

/// The descriptive attributes of a member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDetails {
    pub initials: Option<String>,
    pub first_name: String,
    pub tussenvoegsel: Option<String>,
    pub last_name: String,
    pub tue_card_number: Option<u32>,
    pub external_card_number: Option<String>,
    pub external_card_digits: Option<String>,
    pub external_card_cluster: Option<String>,
    pub date_of_birth: NaiveDate,
    pub email: String,
    pub phone_number: Option<String>,
    pub street: String,
    pub house_number: u32,
    pub house_number_addition: Option<String>,
    pub postal_code: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub country: String,
    pub member_since: NaiveDate,
    pub educational_institution: Option<String>,
}

/// A registered member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Store-assigned identifier
    pub id: MemberId,

    #[serde(flatten)]
    pub details: MemberDetails,

    /// Whether an admin has requested deletion of this member
    #[serde(default)]
    pub marked_for_deletion: bool,

    /// The admin who last saved the record (the marker, while marked)
    #[serde(default)]
    pub last_updated_by: Option<UserId>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    pub fn new(id: MemberId, details: MemberDetails, last_updated_by: Option<UserId>) -> Self {
        let now = Utc::now();
        Self {
            id,
            details,
            marked_for_deletion: false,
            last_updated_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full display name, e.g. "Knights of the Kitchen Table"
    pub fn full_name(&self) -> String {
        let d = &self.details;
        match d.tussenvoegsel.as_deref() {
            Some(t) if !t.is_empty() => format!("{} {} {}", d.first_name, t, d.last_name),
            _ => format!("{} {}", d.first_name, d.last_name),
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.full_name(), self.details.email)
    }
}

/// Names of all submittable form fields, in declaration order
pub const FORM_FIELDS: &[&str] = &[
    "initials",
    "first_name",
    "tussenvoegsel",
    "last_name",
    "tue_card_number",
    "external_card_number",
    "external_card_digits",
    "external_card_cluster",
    "date_of_birth",
    "email",
    "phone_number",
    "street",
    "house_number",
    "house_number_addition",
    "postal_code",
    "city",
    "state",
    "country",
    "member_since",
    "educational_institution",
];

/// Raw member data as submitted through the admin interface
///
/// Every value is a string; an empty string means "no value".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberForm {
    pub initials: String,
    pub first_name: String,
    pub tussenvoegsel: String,
    pub last_name: String,
    pub tue_card_number: String,
    pub external_card_number: String,
    pub external_card_digits: String,
    pub external_card_cluster: String,
    pub date_of_birth: String,
    pub email: String,
    pub phone_number: String,
    pub street: String,
    pub house_number: String,
    pub house_number_addition: String,
    pub postal_code: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub member_since: String,
    pub educational_institution: String,
    pub marked_for_deletion: bool,
}

impl MemberForm {
    /// Build a form from `(field, value)` pairs
    pub fn from_pairs<'a, I>(pairs: I) -> MemberfileResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut form = Self::default();
        for (field, value) in pairs {
            form.set(field, value)?;
        }
        Ok(form)
    }

    /// Prefill a form with a member's current values (the admin change form)
    pub fn from_member(member: &Member) -> Self {
        let d = &member.details;
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            initials: opt(&d.initials),
            first_name: d.first_name.clone(),
            tussenvoegsel: opt(&d.tussenvoegsel),
            last_name: d.last_name.clone(),
            tue_card_number: d.tue_card_number.map(|n| n.to_string()).unwrap_or_default(),
            external_card_number: opt(&d.external_card_number),
            external_card_digits: opt(&d.external_card_digits),
            external_card_cluster: opt(&d.external_card_cluster),
            date_of_birth: d.date_of_birth.format(DATE_FORMAT).to_string(),
            email: d.email.clone(),
            phone_number: opt(&d.phone_number),
            street: d.street.clone(),
            house_number: d.house_number.to_string(),
            house_number_addition: opt(&d.house_number_addition),
            postal_code: opt(&d.postal_code),
            city: d.city.clone(),
            state: opt(&d.state),
            country: d.country.clone(),
            member_since: d.member_since.format(DATE_FORMAT).to_string(),
            educational_institution: opt(&d.educational_institution),
            marked_for_deletion: member.marked_for_deletion,
        }
    }

    fn slot(&mut self, field: &str) -> Option<&mut String> {
        let slot = match field {
            "initials" => &mut self.initials,
            "first_name" => &mut self.first_name,
            "tussenvoegsel" => &mut self.tussenvoegsel,
            "last_name" => &mut self.last_name,
            "tue_card_number" => &mut self.tue_card_number,
            "external_card_number" => &mut self.external_card_number,
            "external_card_digits" => &mut self.external_card_digits,
            "external_card_cluster" => &mut self.external_card_cluster,
            "date_of_birth" => &mut self.date_of_birth,
            "email" => &mut self.email,
            "phone_number" => &mut self.phone_number,
            "street" => &mut self.street,
            "house_number" => &mut self.house_number,
            "house_number_addition" => &mut self.house_number_addition,
            "postal_code" => &mut self.postal_code,
            "city" => &mut self.city,
            "state" => &mut self.state,
            "country" => &mut self.country,
            "member_since" => &mut self.member_since,
            "educational_institution" => &mut self.educational_institution,
            _ => return None,
        };
        Some(slot)
    }

    /// Set a field by name. `marked_for_deletion` accepts checkbox values.
    pub fn set(&mut self, field: &str, value: &str) -> MemberfileResult<()> {
        if field == "marked_for_deletion" {
            self.marked_for_deletion = matches!(
                value.trim().to_lowercase().as_str(),
                "on" | "true" | "1" | "yes"
            );
            return Ok(());
        }

        let slot = self
            .slot(field)
            .ok_or_else(|| MemberfileError::Validation(format!("Unknown member field: '{}'", field)))?;
        *slot = value.to_string();
        Ok(())
    }

    /// Validate the form and convert it into typed member details
    pub fn clean(&self) -> Result<MemberDetails, FieldErrors> {
        let mut errors = FieldErrors::new();

        let first_name = required_text(&mut errors, "first_name", &self.first_name);
        let last_name = required_text(&mut errors, "last_name", &self.last_name);
        let street = required_text(&mut errors, "street", &self.street);
        let city = required_text(&mut errors, "city", &self.city);
        let country = required_text(&mut errors, "country", &self.country);

        let email = required_text(&mut errors, "email", &self.email);
        if !email.is_empty() && !looks_like_email(&email) {
            errors.add("email", "Enter a valid email address.");
        }

        let date_of_birth = required_date(&mut errors, "date_of_birth", &self.date_of_birth);
        let member_since = required_date(&mut errors, "member_since", &self.member_since);

        let house_number = match self.house_number.trim() {
            "" => {
                errors.add("house_number", REQUIRED);
                None
            }
            raw => match raw.parse::<u32>() {
                Ok(n) => Some(n),
                Err(_) => {
                    errors.add("house_number", "Enter a whole number.");
                    None
                }
            },
        };

        let tue_card_number = match self.tue_card_number.trim() {
            "" => None,
            raw => match raw.parse::<u32>() {
                Ok(n) => Some(n),
                Err(_) => {
                    errors.add("tue_card_number", "Enter a whole number.");
                    None
                }
            },
        };

        let external_card_digits = optional_text(&self.external_card_digits);
        if let Some(digits) = &external_card_digits {
            if !digits.chars().all(|c| c.is_ascii_digit()) {
                errors.add("external_card_digits", "Only digits are allowed.");
            }
        }

        match (date_of_birth, member_since, house_number) {
            (Some(date_of_birth), Some(member_since), Some(house_number)) if errors.is_empty() => {
                Ok(MemberDetails {
                    initials: optional_text(&self.initials),
                    first_name,
                    tussenvoegsel: optional_text(&self.tussenvoegsel),
                    last_name,
                    tue_card_number,
                    external_card_number: optional_text(&self.external_card_number),
                    external_card_digits,
                    external_card_cluster: optional_text(&self.external_card_cluster),
                    date_of_birth,
                    email,
                    phone_number: optional_text(&self.phone_number),
                    street,
                    house_number,
                    house_number_addition: optional_text(&self.house_number_addition),
                    postal_code: optional_text(&self.postal_code),
                    city,
                    state: optional_text(&self.state),
                    country,
                    member_since,
                    educational_institution: optional_text(&self.educational_institution),
                })
            }
            _ => Err(errors),
        }
    }
}

fn optional_text(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn required_text(errors: &mut FieldErrors, field: &str, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
    }
    value.to_string()
}

fn required_date(errors: &mut FieldErrors, field: &str, value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(field, "Enter a valid date (YYYY-MM-DD).");
            None
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
