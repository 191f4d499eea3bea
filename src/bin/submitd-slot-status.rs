//! Set the status string of one of a user's slots.

use std::path::PathBuf;
use std::process::exit;

use clap::Parser;

use submitd::{config::Config, store::SubmitStore};

#[derive(Parser)]
#[command(name = "submitd-slot-status", version, about = "Set a slot's status string")]
struct Cli {
    /// Application root directory (defaults to the APP_DIR environment
    /// variable, then the built-in default)
    #[arg(short, long, value_name = "appdir")]
    topdir: Option<PathBuf>,

    /// Account owning the slot
    username: String,

    /// Slot number
    slot_num: u32,

    /// New status string
    status: String,
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

    if let Err(err) = store.update_slot_status(&cli.username, cli.slot_num, &cli.status) {
        eprintln!("ERROR: failed to update slot status: <<{err}>>");
        exit(3);
    }
    println!(
        "Notice: set status for username: {} slot: {} to: {}",
        cli.username, cli.slot_num, cli.status
    );
}
