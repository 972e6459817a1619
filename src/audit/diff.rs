//! Field differ for member logs
//!
//! Computes the old/new value pairs that a member log records for a mutation.

use serde::Serialize;

use super::fields::MEMBER_FIELDS;
use crate::models::Member;

/// One changed field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub field: &'static str,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// Diff a member against its previous snapshot
///
/// With no previous snapshot (a create) every field with a value is reported
/// with `old_value = None`. Otherwise only fields whose value changed are
/// reported. Fields whose new value is empty are never reported. The result
/// follows the order of [`MEMBER_FIELDS`].
pub fn diff_member(before: Option<&Member>, after: &Member) -> Vec<FieldChange> {
    MEMBER_FIELDS
        .iter()
        .filter_map(|descriptor| {
            let new_value = descriptor.read(after)?;
            let old_value = before.and_then(|b| descriptor.read(b));

            if before.is_some() && old_value.as_deref() == Some(new_value.as_str()) {
                return None;
            }

            Some(FieldChange {
                field: descriptor.name,
                old_value,
                new_value: Some(new_value),
            })
        })
        .collect()
}

/// One-line summary of a change set, e.g. `first_name: "A" -> "B"`
pub fn summarize(changes: &[FieldChange]) -> Option<String> {
    if changes.is_empty() {
        return None;
    }

    let parts: Vec<String> = changes
        .iter()
        .map(|c| {
            format!(
                "{}: {} -> {}",
                c.field,
                format_value(c.old_value.as_deref()),
                format_value(c.new_value.as_deref())
            )
        })
        .collect();
    Some(parts.join(", "))
}

fn format_value(value: Option<&str>) -> String {
    match value {
        None => "null".to_string(),
        Some(s) if s.chars().count() > 50 => {
            let truncated: String = s.chars().take(47).collect();
            format!("\"{}...\"", truncated)
        }
        Some(s) => format!("\"{}\"", s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MemberId;
    use crate::test_support::sample_member;

    #[test]
    fn test_insert_reports_every_non_empty_field() {
        let member = sample_member(MemberId::new(1));
        let changes = diff_member(None, &member);

        // id + the 11 filled form fields
        assert_eq!(changes.len(), 12);
        assert!(changes.iter().all(|c| c.old_value.is_none()));
        assert_eq!(changes[0].field, "id");
        assert_eq!(changes[0].new_value.as_deref(), Some("1"));
    }

    #[test]
    fn test_insert_skips_empty_fields() {
        let mut member = sample_member(MemberId::new(1));
        member.details.state = Some(String::new());
        member.details.phone_number = None;

        let changes = diff_member(None, &member);
        assert!(changes.iter().all(|c| c.field != "state" && c.field != "phone_number"));
    }

    #[test]
    fn test_update_reports_only_changed_fields_in_declaration_order() {
        let before = sample_member(MemberId::new(1));
        let mut after = before.clone();
        after.details.email = "newemail@example.com".into();
        after.details.first_name = "NewFirstName".into();

        let changes = diff_member(Some(&before), &after);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].field, "first_name");
        assert_eq!(changes[0].old_value.as_deref(), Some("Fantasy"));
        assert_eq!(changes[1].field, "email");
        assert_eq!(changes[1].new_value.as_deref(), Some("newemail@example.com"));
    }

    #[test]
    fn test_update_clearing_a_field_is_not_reported() {
        let before = sample_member(MemberId::new(1));
        let mut after = before.clone();
        after.details.educational_institution = None;

        assert!(diff_member(Some(&before), &after).is_empty());
    }

    #[test]
    fn test_deletion_flag_alone_produces_no_changes() {
        let before = sample_member(MemberId::new(1));
        let mut after = before.clone();
        after.marked_for_deletion = true;

        assert!(diff_member(Some(&before), &after).is_empty());
    }

    #[test]
    fn test_summarize() {
        let before = sample_member(MemberId::new(1));
        let mut after = before.clone();
        after.details.city = "Helmond".into();

        let summary = summarize(&diff_member(Some(&before), &after)).unwrap();
        assert_eq!(summary, "city: \"Eindhoven\" -> \"Helmond\"");
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn test_long_value_truncation() {
        assert!(format_value(Some(&"a".repeat(100))).ends_with("...\""));
        assert_eq!(format_value(None), "null");
    }
}
