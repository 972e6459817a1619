//! Member display formatting
//!
//! Formats members for terminal output in table and detail views.

use chrono::NaiveDate;

use crate::audit::DeletionState;
use crate::config::format_date;
use crate::models::{Member, User};

const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format a list of members as a table
pub fn format_member_list(members: &[Member]) -> String {
    if members.is_empty() {
        return "No members found.".to_string();
    }

    let name_width = members
        .iter()
        .map(|m| m.full_name().len())
        .max()
        .unwrap_or(4)
        .max(4);

    let email_width = members
        .iter()
        .map(|m| m.details.email.len())
        .max()
        .unwrap_or(5)
        .max(5);

    let mut output = String::new();
    output.push_str(&format!(
        "{:>5}  {:<name_width$}  {:<email_width$}  {:<15}  {}\n",
        "ID",
        "Name",
        "Email",
        "City",
        "Status",
        name_width = name_width,
        email_width = email_width,
    ));

    output.push_str(&format!(
        "{:->5}  {:-<name_width$}  {:-<email_width$}  {:-<15}  {:-<10}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
        email_width = email_width,
    ));

    for member in members {
        let status = if member.marked_for_deletion {
            "Marked"
        } else {
            ""
        };

        output.push_str(&format!(
            "{:>5}  {:<name_width$}  {:<email_width$}  {:<15}  {}\n",
            member.id.to_string(),
            member.full_name(),
            member.details.email,
            member.details.city,
            status,
            name_width = name_width,
            email_width = email_width,
        ));
    }

    output.push_str(&format!("\n{} member(s)\n", members.len()));
    output
}

/// Format a single member's details
///
/// `last_editor` is the user behind `last_updated_by`, when known. Dates are
/// printed with the strftime `date_format`, or as `YYYY-MM-DD` when that
/// format cannot print a date.
pub fn format_member_details(
    member: &Member,
    last_editor: Option<&User>,
    date_format: &str,
) -> String {
    let show_date = |date: NaiveDate| {
        format_date(date, date_format)
            .unwrap_or_else(|| date.format(FALLBACK_DATE_FORMAT).to_string())
    };
    let d = &member.details;
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();

    let mut output = String::new();
    output.push_str(&format!("Member #{}: {}\n", member.id, member.full_name()));
    output.push_str(&format!("  Initials:        {}\n", opt(&d.initials)));
    output.push_str(&format!("  Email:           {}\n", d.email));
    output.push_str(&format!("  Phone:           {}\n", opt(&d.phone_number)));
    output.push_str(&format!(
        "  Date of Birth:   {}\n",
        show_date(d.date_of_birth)
    ));
    output.push('\n');

    let addition = opt(&d.house_number_addition);
    output.push_str(&format!(
        "  Address:         {} {}{}\n",
        d.street, d.house_number, addition
    ));
    output.push_str(&format!(
        "                   {} {}\n",
        opt(&d.postal_code),
        d.city
    ));
    if let Some(state) = &d.state {
        output.push_str(&format!("                   {}\n", state));
    }
    output.push_str(&format!("                   {}\n", d.country));
    output.push('\n');

    output.push_str(&format!(
        "  Member Since:    {}\n",
        show_date(d.member_since)
    ));
    output.push_str(&format!(
        "  Institution:     {}\n",
        opt(&d.educational_institution)
    ));
    if let Some(number) = d.tue_card_number {
        output.push_str(&format!("  TU/e Card:       {}\n", number));
    }
    if let Some(number) = &d.external_card_number {
        output.push_str(&format!(
            "  External Card:   {} ({}) {}\n",
            number,
            opt(&d.external_card_digits),
            opt(&d.external_card_cluster)
        ));
    }
    output.push('\n');

    let editor = last_editor
        .map(|u| u.username.clone())
        .or_else(|| member.last_updated_by.map(|id| id.to_string()))
        .unwrap_or_else(|| "-".to_string());

    match DeletionState::of(member) {
        DeletionState::Active => output.push_str("  Status:          Active\n"),
        DeletionState::MarkedForDeletion { .. } => output.push_str(&format!(
            "  Status:          Marked for deletion by {}\n",
            editor
        )),
    }
    output.push_str(&format!("  Last Updated By: {}\n", editor));
    output.push_str(&format!(
        "  Updated:         {}\n",
        member.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}
