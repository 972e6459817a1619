//! Activity CLI commands

use chrono::{DateTime, NaiveDate, Utc};
use clap::Subcommand;

use crate::calendar::parse_datetime;
use crate::config::Settings;
use crate::display::format_activity_list;
use crate::error::{MemberfileError, MemberfileResult};
use crate::models::{Activity, Frequency, Recurrence, RecurrenceRule};
use crate::services::{ActivityService, NewActivity};
use crate::storage::Storage;

/// Activity subcommands
#[derive(Subcommand)]
pub enum ActivityCommands {
    /// Add an activity
    Add {
        /// Activity title
        title: String,
        /// Start, e.g. 2024-03-01T20:00:00+01:00
        #[arg(long)]
        start: String,
        /// End
        #[arg(long)]
        end: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long, default_value = "")]
        location: String,
        /// Repeat daily, weekly or monthly
        #[arg(long)]
        repeat: Option<String>,
        /// Repeat every N periods
        #[arg(long, default_value = "1")]
        interval: u32,
        /// Number of occurrences
        #[arg(long, requires = "repeat")]
        count: Option<u32>,
        /// Last date an occurrence may fall on (YYYY-MM-DD)
        #[arg(long, requires = "repeat")]
        until: Option<String>,
        /// Extra occurrence date (repeatable)
        #[arg(long)]
        rdate: Vec<String>,
        /// Skipped occurrence date (repeatable)
        #[arg(long)]
        exdate: Vec<String>,
        /// Hide from the feed until this moment
        #[arg(long)]
        publish_at: Option<String>,
    },
    /// List activities
    List,
    /// Delete an activity
    Delete {
        /// Activity ID or title
        activity: String,
    },
}

fn parse_moment(raw: &str, what: &str) -> MemberfileResult<DateTime<Utc>> {
    parse_datetime(raw).ok_or_else(|| {
        MemberfileError::Validation(format!(
            "Invalid {} '{}'. Use yyyy-mm-ddThh:mm:ss+hh:mm",
            what, raw
        ))
    })
}

fn parse_date(raw: &str) -> MemberfileResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        MemberfileError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD", raw))
    })
}

fn find_activity(service: &ActivityService<'_>, identifier: &str) -> MemberfileResult<Activity> {
    let activities = service.list()?;
    activities
        .iter()
        .find(|a| a.id.to_string() == identifier || a.id.as_uuid().to_string() == identifier)
        .or_else(|| {
            activities
                .iter()
                .find(|a| a.title.eq_ignore_ascii_case(identifier))
        })
        .cloned()
        .ok_or_else(|| MemberfileError::activity_not_found(identifier))
}

/// Handle an activity command
pub fn handle_activity_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ActivityCommands,
) -> MemberfileResult<()> {
    let service = ActivityService::new(storage, settings);

    match cmd {
        ActivityCommands::Add {
            title,
            start,
            end,
            description,
            location,
            repeat,
            interval,
            count,
            until,
            rdate,
            exdate,
            publish_at,
        } => {
            let mut recurrence = Recurrence::default();
            if let Some(repeat) = repeat {
                let frequency = Frequency::parse(&repeat).ok_or_else(|| {
                    MemberfileError::Validation(format!(
                        "Invalid repeat '{}'. Use daily, weekly or monthly",
                        repeat
                    ))
                })?;
                let mut rule = RecurrenceRule::new(frequency);
                rule.interval = interval.max(1);
                rule.count = count;
                rule.until = until.as_deref().map(parse_date).transpose()?;
                recurrence.rrules.push(rule);
            }
            recurrence.rdates = rdate.iter().map(|d| parse_date(d)).collect::<Result<_, _>>()?;
            recurrence.exdates = exdate.iter().map(|d| parse_date(d)).collect::<Result<_, _>>()?;

            let activity = service.create(NewActivity {
                title,
                description,
                location,
                start: parse_moment(&start, "start")?,
                end: parse_moment(&end, "end")?,
                published_date: publish_at
                    .as_deref()
                    .map(|p| parse_moment(p, "publish date"))
                    .transpose()?,
                recurrence,
            })?;
            println!("Created activity: {} ({})", activity.title, activity.id);
        }

        ActivityCommands::List => {
            let activities = service.list()?;
            println!("{}", format_activity_list(&activities));
        }

        ActivityCommands::Delete { activity } => {
            let found = find_activity(&service, &activity)?;
            service.delete(found.id)?;
            println!("Deleted activity: {}", found.title);
        }
    }

    Ok(())
}
