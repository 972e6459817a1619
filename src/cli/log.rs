//! Member log CLI commands
//!
//! Listing, inspecting, deleting and exporting member logs.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use crate::config::Settings;
use crate::display::{format_log_details, format_log_list};
use crate::error::{MemberfileError, MemberfileResult};
use crate::export::{csv, json, yaml};
use crate::models::{MemberId, MemberLogId};
use crate::services::MemberAdminService;
use crate::storage::Storage;

use super::ActingUser;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// CSV, one row per changed field
    Csv,
    /// JSON with schema version and metadata
    Json,
    /// YAML, human-readable
    Yaml,
}

/// Member log subcommands
#[derive(Subcommand)]
pub enum LogCommands {
    /// List member logs, oldest first
    List {
        /// Only logs of this member ID
        #[arg(short, long)]
        member: Option<u64>,
    },
    /// Show a log with its changed fields
    Show {
        /// Log ID
        id: u64,
    },
    /// Delete a log and its fields (the member is kept)
    Delete {
        /// Log ID
        id: u64,
    },
    /// Export member logs to a file
    Export {
        /// Output file path
        output: PathBuf,

        /// Export format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Only logs of this member ID
        #[arg(short, long)]
        member: Option<u64>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

/// Handle a member log command
pub fn handle_log_command(
    storage: &Storage,
    settings: &Settings,
    acting: &ActingUser,
    cmd: LogCommands,
) -> MemberfileResult<()> {
    let service = MemberAdminService::new(storage, settings);

    match cmd {
        LogCommands::List { member } => {
            let records = match member {
                Some(id) => service.history(MemberId::new(id))?,
                None => service.all_logs()?,
            };
            let usernames: HashMap<_, _> = storage
                .users
                .get_all()?
                .into_iter()
                .map(|u| (u.id, u.username))
                .collect();
            println!("{}", format_log_list(&records, &usernames));
        }

        LogCommands::Show { id } => {
            let record = service.get_log(MemberLogId::new(id))?;
            print!("{}", format_log_details(&record));
        }

        LogCommands::Delete { id } => {
            let actor = acting.require(storage)?;
            let log = service.delete_log(actor, MemberLogId::new(id))?;
            println!("Deleted {} log #{} of member #{}", log.log_type, log.id, log.member);
        }

        LogCommands::Export {
            output,
            format,
            member,
            pretty,
        } => {
            let file = File::create(&output).map_err(|e| {
                MemberfileError::Export(format!(
                    "Failed to create file {}: {}",
                    output.display(),
                    e
                ))
            })?;
            let mut writer = BufWriter::new(file);
            let member = member.map(MemberId::new);

            match format {
                ExportFormat::Csv => csv::export_logs_csv(storage, &mut writer, member)?,
                ExportFormat::Json => json::export_logs_json(storage, &mut writer, member, pretty)?,
                ExportFormat::Yaml => yaml::export_logs_yaml(storage, &mut writer, member)?,
            }
            println!("Member logs exported to: {}", output.display());
        }
    }

    Ok(())
}
