//! User CLI commands

use clap::Subcommand;

use crate::display::format_user_list;
use crate::error::MemberfileResult;
use crate::services::{RegisterForm, UserService};
use crate::storage::Storage;

use super::{prompt_password, ActingUser};

/// Environment variable read instead of prompting for a password
pub const PASSWORD_ENV: &str = "MEMBERFILE_PASSWORD";

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a new user
    Register {
        /// Username (case-insensitive, unique)
        username: String,
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Display name
        #[arg(short, long, default_value = "")]
        nickname: String,
        /// Grant admin rights (needs --as with an admin, unless no admin exists yet)
        #[arg(long)]
        admin: bool,
        /// Password (prompted for when omitted)
        #[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,
    },
    /// Check a username and password
    Login {
        username: String,
        /// Password (prompted for when omitted)
        #[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,
    },
    /// Grant admin rights
    Promote { username: String },
    /// Revoke admin rights
    Demote { username: String },
    /// List users
    List,
}

/// Handle a user command
pub fn handle_user_command(
    storage: &Storage,
    acting: &ActingUser,
    cmd: UserCommands,
) -> MemberfileResult<()> {
    let service = UserService::new(storage);

    match cmd {
        UserCommands::Register {
            username,
            email,
            nickname,
            admin,
            password,
        } => {
            // Granting admin rights is checked against the acting admin
            let actor = if admin {
                acting.authenticate(storage)?
            } else {
                None
            };
            let (password1, password2) = match password {
                Some(p) => (p.clone(), p),
                None => (
                    prompt_password("Password: ")?,
                    prompt_password("Password (again): ")?,
                ),
            };
            let form = RegisterForm {
                username,
                password1,
                password2,
                email,
                nickname,
            };

            let user = service.register(actor, &form, admin)?;
            println!(
                "Registered user '{}'{}",
                user.username,
                if user.is_admin { " (admin)" } else { "" }
            );
        }

        UserCommands::Login { username, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt_password("Password: ")?,
            };
            let user = service.authenticate(&username, &password)?;
            println!("Credentials valid for '{}'", user.username);
        }

        UserCommands::Promote { username } => {
            let user = service.set_admin(acting.authenticate(storage)?, &username, true)?;
            println!("'{}' is now an admin", user.username);
        }

        UserCommands::Demote { username } => {
            let user = service.set_admin(acting.authenticate(storage)?, &username, false)?;
            println!("'{}' is no longer an admin", user.username);
        }

        UserCommands::List => {
            let users = service.list()?;
            println!("{}", format_user_list(&users));
        }
    }

    Ok(())
}
