//! Print or set the contest open and close dates.
//!
//! With no date options this prints the current window. Giving only one of
//! the two dates keeps the other at its current value.

use std::path::PathBuf;
use std::process::exit;

use clap::Parser;

use submitd::{config::Config, store::SubmitStore, utils::time};

#[derive(Parser)]
#[command(name = "submitd-dates", version, about = "Manage the contest open/close window")]
struct Cli {
    /// Application root directory (defaults to the APP_DIR environment
    /// variable, then the built-in default)
    #[arg(short, long, value_name = "appdir")]
    topdir: Option<PathBuf>,

    /// Set the contest open date, e.g. "2026-03-01 00:00:00.000000+00:00"
    #[arg(short = 's', long, value_name = "DateTime")]
    open: Option<String>,

    /// Set the contest close date, e.g. "2026-06-01 00:00:00.000000+00:00"
    #[arg(short = 'S', long, value_name = "DateTime")]
    close: Option<String>,
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

    let (current_open, current_close) = match store.read_state() {
        Ok(window) => window,
        Err(err) => {
            eprintln!("ERROR: unable to read contest window: <<{err}>>");
            exit(3);
        }
    };

    if cli.open.is_none() && cli.close.is_none() {
        println!(
            "Notice: contest open: {} close: {}",
            time::format_datetime(current_open),
            time::format_datetime(current_close)
        );
        exit(0);
    }

    let open = cli
        .open
        .unwrap_or_else(|| time::format_datetime(current_open));
    let close = cli
        .close
        .unwrap_or_else(|| time::format_datetime(current_close));

    if let Err(err) = store.update_state(&open, &close) {
        eprintln!("ERROR: failed to update contest window: <<{err}>>");
        exit(4);
    }
    println!("Notice: set contest open: {open} close: {close}");
}
