//! Logged member fields
//!
//! The statically declared list of `(field name, accessor)` pairs that the
//! differ walks. Table order is the canonical field order of log rows.

use crate::models::Member;

/// Reads one field of a member as its logged string form
pub type FieldAccessor = fn(&Member) -> Option<String>;

/// A logged member field
#[derive(Clone, Copy)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub accessor: FieldAccessor,
}

impl FieldDescriptor {
    /// Read the field, folding empty strings into `None`
    pub fn read(&self, member: &Member) -> Option<String> {
        (self.accessor)(member).filter(|v| !v.is_empty())
    }
}

impl std::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .finish()
    }
}

macro_rules! field {
    ($name:literal, $m:ident => $expr:expr) => {
        FieldDescriptor {
            name: $name,
            accessor: |$m: &Member| $expr,
        }
    };
}

/// Every member attribute that is audited. The deletion flag, the last editor
/// and the bookkeeping timestamps are deliberately absent.
pub static MEMBER_FIELDS: &[FieldDescriptor] = &[
    field!("id", m => Some(m.id.to_string())),
    field!("initials", m => m.details.initials.clone()),
    field!("first_name", m => Some(m.details.first_name.clone())),
    field!("tussenvoegsel", m => m.details.tussenvoegsel.clone()),
    field!("last_name", m => Some(m.details.last_name.clone())),
    field!("tue_card_number", m => m.details.tue_card_number.map(|n| n.to_string())),
    field!("external_card_number", m => m.details.external_card_number.clone()),
    field!("external_card_digits", m => m.details.external_card_digits.clone()),
    field!("external_card_cluster", m => m.details.external_card_cluster.clone()),
    field!("date_of_birth", m => Some(m.details.date_of_birth.format("%Y-%m-%d").to_string())),
    field!("email", m => Some(m.details.email.clone())),
    field!("phone_number", m => m.details.phone_number.clone()),
    field!("street", m => Some(m.details.street.clone())),
    field!("house_number", m => Some(m.details.house_number.to_string())),
    field!("house_number_addition", m => m.details.house_number_addition.clone()),
    field!("postal_code", m => m.details.postal_code.clone()),
    field!("city", m => Some(m.details.city.clone())),
    field!("state", m => m.details.state.clone()),
    field!("country", m => Some(m.details.country.clone())),
    field!("member_since", m => Some(m.details.member_since.format("%Y-%m-%d").to_string())),
    field!("educational_institution", m => m.details.educational_institution.clone()),
];

/// Look up a logged field by name
pub fn field_by_name(name: &str) -> Option<&'static FieldDescriptor> {
    MEMBER_FIELDS.iter().find(|f| f.name == name)
}
