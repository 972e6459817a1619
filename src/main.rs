use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use memberfile::cli::{
    handle_activity_command, handle_calendar_command, handle_log_command, handle_member_command,
    handle_user_command, ActingUser,
};
use memberfile::config::{validate_date_format, MarkedRecordPolicy, MemberfilePaths, Settings};
use memberfile::storage::{initialize_storage, Storage};
use memberfile::MemberfileError;

/// Environment variable holding the log filter
const LOG_ENV: &str = "MEMBERFILE_LOG";

#[derive(Parser)]
#[command(
    name = "memberfile",
    version,
    about = "Member registry with audit logging and two-admin deletion",
    long_about = "memberfile keeps the member records of an association. Every change \
                  an admin makes is written to a field-level audit log, and deleting a \
                  member needs two different admins: one marks, another confirms."
)]
struct Cli {
    /// Username of the admin performing registry changes
    #[arg(long = "as", global = true, env = "MEMBERFILE_USER")]
    acting_user: Option<String>,

    /// Password of the acting admin (prompted for when omitted)
    #[arg(
        long = "as-password",
        global = true,
        env = "MEMBERFILE_AS_PASSWORD",
        hide_env_values = true
    )]
    acting_password: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory
    Init,

    /// Show or change configuration
    Config {
        /// accept, ignore or reject edits to members marked for deletion
        #[arg(long)]
        marked_record_policy: Option<MarkedRecordPolicy>,
        /// Largest calendar feed window in days
        #[arg(long)]
        calendar_max_window_days: Option<i64>,
        /// strftime format for dates in member details
        #[arg(long)]
        date_format: Option<String>,
    },

    /// User management commands
    #[command(subcommand)]
    User(memberfile::cli::UserCommands),

    /// Member registry commands
    #[command(subcommand)]
    Member(memberfile::cli::MemberCommands),

    /// Member audit log commands
    #[command(subcommand)]
    Log(memberfile::cli::LogCommands),

    /// Activity management commands
    #[command(subcommand)]
    Activity(memberfile::cli::ActivityCommands),

    /// Calendar feed commands
    #[command(subcommand)]
    Calendar(memberfile::cli::CalendarCommands),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        match err.downcast_ref::<MemberfileError>() {
            Some(e) => eprintln!("Error ({}): {}", e.status_code(), e),
            None => eprintln!("Error: {:#}", err),
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let acting = ActingUser::new(cli.acting_user, cli.acting_password);

    let paths = MemberfilePaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing memberfile at: {}", paths.base_dir().display());
            initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Register the first admin with:");
            println!("  memberfile user register <username> --email <email> --admin");
        }
        Some(Commands::Config {
            marked_record_policy,
            calendar_max_window_days,
            date_format,
        }) => {
            let changed = marked_record_policy.is_some()
                || calendar_max_window_days.is_some()
                || date_format.is_some();
            if let Some(policy) = marked_record_policy {
                settings.marked_record_policy = policy;
            }
            if let Some(days) = calendar_max_window_days {
                if days < 1 {
                    return Err(MemberfileError::Validation(
                        "calendar window must be at least one day".into(),
                    )
                    .into());
                }
                settings.calendar_max_window_days = days;
            }
            if let Some(format) = date_format {
                validate_date_format(&format)?;
                settings.date_format = format;
            }
            if changed {
                settings.save(&paths)?;
            }

            println!("memberfile Configuration");
            println!("========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!();
            println!("Settings:");
            println!("  Marked record policy: {}", settings.marked_record_policy);
            println!(
                "  Calendar max window:  {} days",
                settings.calendar_max_window_days
            );
            println!("  Date format:          {}", settings.date_format);
        }
        Some(Commands::User(cmd)) => handle_user_command(&storage, &acting, cmd)?,
        Some(Commands::Member(cmd)) => {
            handle_member_command(&storage, &settings, &acting, cmd)?
        }
        Some(Commands::Log(cmd)) => handle_log_command(&storage, &settings, &acting, cmd)?,
        Some(Commands::Activity(cmd)) => handle_activity_command(&storage, &settings, cmd)?,
        Some(Commands::Calendar(cmd)) => handle_calendar_command(&storage, &settings, cmd)?,
        None => {
            println!("memberfile - Member registry with two-admin deletion");
            println!();
            println!("Run 'memberfile --help' for usage information.");
        }
    }

    Ok(())
}
