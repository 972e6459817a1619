//! Member CLI commands
//!
//! Implements CLI commands for the member registry. Every mutation runs as
//! the admin named with `--as`.

use clap::Subcommand;

use crate::audit::{diff_member, summarize};
use crate::config::Settings;
use crate::display::{format_member_details, format_member_list};
use crate::error::{MemberfileError, MemberfileResult};
use crate::models::{Member, MemberForm};
use crate::services::MemberAdminService;
use crate::storage::Storage;

use super::{parse_field, ActingUser};

/// Member subcommands
#[derive(Subcommand)]
pub enum MemberCommands {
    /// Register a new member
    Add {
        /// Field value as name=value (repeatable), e.g. -f first_name=Ada
        #[arg(short = 'f', long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
        /// Mark the new member for deletion right away
        #[arg(long)]
        mark: bool,
    },
    /// Change fields of a member
    Edit {
        /// Member ID or email
        member: String,
        /// Field value as name=value (repeatable); an empty value clears it
        #[arg(short = 'f', long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Mark a member for deletion
    Mark {
        /// Member ID or email
        member: String,
    },
    /// Clear the deletion mark of a member
    Unmark {
        /// Member ID or email
        member: String,
    },
    /// Delete a marked member (must be a different admin than the marker)
    Delete {
        /// Member ID or email
        member: String,
    },
    /// List members
    List {
        /// Include members marked for deletion
        #[arg(short, long)]
        all: bool,
    },
    /// Show member details
    Show {
        /// Member ID or email
        member: String,
    },
}

fn find_member(service: &MemberAdminService<'_>, identifier: &str) -> MemberfileResult<Member> {
    service
        .find(identifier)?
        .ok_or_else(|| MemberfileError::member_not_found(identifier))
}

/// Handle a member command
pub fn handle_member_command(
    storage: &Storage,
    settings: &Settings,
    acting: &ActingUser,
    cmd: MemberCommands,
) -> MemberfileResult<()> {
    let service = MemberAdminService::new(storage, settings);

    match cmd {
        MemberCommands::Add { fields, mark } => {
            let actor = acting.require(storage)?;
            let mut form = MemberForm::from_pairs(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
            form.marked_for_deletion = mark;

            let member = service.create(actor, &form)?;
            println!("Created member #{}: {}", member.id, member.full_name());
            if member.marked_for_deletion {
                println!("  Marked for deletion");
            }
        }

        MemberCommands::Edit { member, fields } => {
            let actor = acting.require(storage)?;
            let before = find_member(&service, &member)?;

            let mut form = MemberForm::from_member(&before);
            for (field, value) in &fields {
                form.set(field, value)?;
            }

            let after = service.update(actor, before.id, &form)?;
            match summarize(&diff_member(Some(&before), &after)) {
                Some(summary) => println!("Updated member #{}: {}", after.id, summary),
                None => println!("No changes to member #{}", after.id),
            }
        }

        MemberCommands::Mark { member } => {
            let actor = acting.require(storage)?;
            let found = find_member(&service, &member)?;
            let marked = service.mark_for_deletion(actor, found.id)?;
            println!(
                "Marked member #{} for deletion. Another admin must confirm the deletion.",
                marked.id
            );
        }

        MemberCommands::Unmark { member } => {
            let actor = acting.require(storage)?;
            let found = find_member(&service, &member)?;
            let unmarked = service.unmark(actor, found.id)?;
            println!("Member #{} is no longer marked for deletion", unmarked.id);
        }

        MemberCommands::Delete { member } => {
            let actor = acting.require(storage)?;
            let found = find_member(&service, &member)?;
            let deleted = service.delete(actor, found.id)?;
            println!("Deleted member #{}: {}", deleted.id, deleted.full_name());
        }

        MemberCommands::List { all } => {
            let members = service.list(all)?;
            println!("{}", format_member_list(&members));
        }

        MemberCommands::Show { member } => {
            let found = find_member(&service, &member)?;
            let editor = match found.last_updated_by {
                Some(id) => storage.users.get(id)?,
                None => None,
            };
            print!(
                "{}",
                format_member_details(&found, editor.as_ref(), &settings.date_format)
            );
        }
    }

    Ok(())
}
