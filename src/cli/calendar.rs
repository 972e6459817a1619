//! Calendar feed CLI command

use clap::Subcommand;

use crate::config::Settings;
use crate::error::{MemberfileError, MemberfileResult};
use crate::services::ActivityService;
use crate::storage::Storage;

/// Calendar subcommands
#[derive(Subcommand)]
pub enum CalendarCommands {
    /// Print the feed of published activities between two moments as JSON
    Feed {
        /// Window start, yyyy-mm-ddThh:mm:ss+hh:mm
        #[arg(long)]
        start: Option<String>,
        /// Window end, yyyy-mm-ddThh:mm:ss+hh:mm
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        pretty: bool,
    },
}

/// Handle a calendar command
pub fn handle_calendar_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CalendarCommands,
) -> MemberfileResult<()> {
    let service = ActivityService::new(storage, settings);

    match cmd {
        CalendarCommands::Feed { start, end, pretty } => {
            let feed = service.feed(start.as_deref(), end.as_deref())?;
            let json = if pretty {
                serde_json::to_string_pretty(&feed)
            } else {
                serde_json::to_string(&feed)
            }
            .map_err(|e| MemberfileError::Json(e.to_string()))?;
            println!("{}", json);
        }
    }

    Ok(())
}
