//! CLI tool that creates the application database if it is missing
//!
//! Connects to the server's administrative database and issues
//! `CREATE DATABASE` for `DB_NAME`. An existing database counts as success.
//!
//! Usage:
//!   create-database [--config <path>] [--verbose]
//!
//! The outcome is reported on the console. The exit code is 0 once the
//! attempt has settled, whether or not the database could be created; only
//! configuration problems exit non-zero.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use membership_db::{config::CONFIG_PATH_ENV, ensure_database, logging, AppConfig};
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<PathBuf> = None;
    let mut verbose = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--verbose" | "-v" => {
                verbose = true;
            }
            "--version" | "-V" => {
                println!("create-database {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    if let Some(path) = config_path {
        env::set_var(CONFIG_PATH_ENV, path);
    }

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if verbose {
        config.logging.level = "debug".to_string();
    }
    let _log_guard = logging::init(&config.logging)?;

    debug!(database = ?config.database, "Configuration loaded");

    let outcome = ensure_database(&config.database).await;
    debug!(success = outcome.is_success(), "Bootstrap finished");

    Ok(())
}

fn print_help() {
    println!("create-database - create the application database if it does not exist");
    println!();
    println!("Usage:");
    println!("  create-database [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --config <path>   Path to a YAML configuration file");
    println!("  -v, --verbose     Enable verbose output");
    println!("  -V, --version     Print version");
    println!("  -h, --help        Show this help message");
    println!();
    println!("Environment:");
    println!("  DB_HOST, DB_PORT, DB_USER, DB_PASSWORD, DB_NAME   (required)");
    println!("  DB_ADMIN_DATABASE                                 (default: postgres)");
}
