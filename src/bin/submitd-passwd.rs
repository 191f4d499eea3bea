//! Manage accounts in the submit server password store.
//!
//! Runs the same store code as the server, against the same tree, so every
//! mutation takes the password file lock like any web request would.

use std::path::PathBuf;
use std::process::exit;

use clap::{Parser, Subcommand};

use submitd::{config::Config, services::AdminService, store::SubmitStore};

#[derive(Parser)]
#[command(name = "submitd-passwd", version, about = "Manage submit server accounts")]
struct Cli {
    /// Application root directory (defaults to the APP_DIR environment
    /// variable, then the built-in default)
    #[arg(short, long, value_name = "appdir")]
    topdir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a new account; prints the initial password
    Add {
        username: String,
        /// Grant admin rights
        #[arg(long)]
        admin: bool,
        /// Use this password instead of generating one
        #[arg(long)]
        password: Option<String>,
    },
    /// Update an account's access flags
    Update {
        username: String,
        /// Grant admin rights
        #[arg(long, conflicts_with = "revoke_admin")]
        grant_admin: bool,
        /// Revoke admin rights
        #[arg(long)]
        revoke_admin: bool,
        /// Disable login
        #[arg(long, conflicts_with = "enable")]
        disable: bool,
        /// Re-enable login
        #[arg(long)]
        enable: bool,
    },
    /// Reset an account's password to a fresh generated one
    Reset { username: String },
    /// Delete an account
    Delete { username: String },
    /// Show one account
    Show { username: String },
    /// List all accounts
    List,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let app_dir = match cli.topdir {
        Some(dir) => dir,
        None => match Config::from_env() {
            Ok(config) => config.storage.app_dir,
            Err(err) => {
                eprintln!("ERROR: configuration: {err}");
                exit(2);
            }
        },
    };
    let store = SubmitStore::new(&app_dir);

    match cli.command {
        Command::Add {
            username,
            admin,
            password,
        } => match AdminService::add_user(&store, &username, admin, password.as_deref()) {
            Ok((account, password)) => {
                println!("Notice: added user: {}", account.username);
                println!("Initial password: {password}");
            }
            Err(err) => {
                eprintln!("ERROR: add failed: <<{err}>>");
                exit(3);
            }
        },

        Command::Update {
            username,
            grant_admin,
            revoke_admin,
            disable,
            enable,
        } => {
            let admin = match (grant_admin, revoke_admin) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let disable_login = match (disable, enable) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            match AdminService::update_user(&store, &username, admin, disable_login) {
                Ok(account) => println!(
                    "Notice: updated user: {} admin: {} disable_login: {}",
                    account.username, account.admin, account.disable_login
                ),
                Err(err) => {
                    eprintln!("ERROR: update failed: <<{err}>>");
                    exit(4);
                }
            }
        }

        Command::Reset { username } => match AdminService::reset_password(&store, &username) {
            Ok(password) => {
                println!("Notice: password reset for user: {username}");
                println!("New password: {password}");
            }
            Err(err) => {
                eprintln!("ERROR: reset failed: <<{err}>>");
                exit(5);
            }
        },

        Command::Delete { username } => match AdminService::delete_user(&store, &username) {
            Ok(removed) => println!("Notice: deleted user: {}", removed.username),
            Err(err) => {
                eprintln!("ERROR: delete failed: <<{err}>>");
                exit(6);
            }
        },

        Command::Show { username } => match store.lookup(&username) {
            Ok(account) => {
                println!(
                    "username: {} admin: {} force_pw_change: {} pw_change_by: {} disable_login: {} login_allowed: {}",
                    account.username,
                    account.admin,
                    account.force_pw_change,
                    account.pw_change_by.as_deref().unwrap_or("none"),
                    account.disable_login,
                    account.login_allowed()
                );
            }
            Err(err) => {
                eprintln!("ERROR: lookup failed: <<{err}>>");
                exit(7);
            }
        },

        Command::List => match AdminService::list_users(&store) {
            Ok(accounts) => {
                for account in accounts {
                    println!(
                        "{} admin: {} disable_login: {}",
                        account.username, account.admin, account.disable_login
                    );
                }
            }
            Err(err) => {
                eprintln!("ERROR: list failed: <<{err}>>");
                exit(8);
            }
        },
    }
}
