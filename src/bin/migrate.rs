//! CLI tool for applying or reverting a schema migration step
//!
//! Usage:
//!   migrate <up|down> [--step <name>] [--config <path>] [--verbose]
//!   migrate list
//!
//! Without `--step`, the most recent registered step is used. A failing step
//! is rolled back and the process exits non-zero with the server's error.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use membership_db::config::CONFIG_PATH_ENV;
use membership_db::db::migrations::{self, Direction};
use membership_db::{logging, AppConfig};
use tracing::error;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<PathBuf> = None;
    let mut step: Option<String> = None;
    let mut direction: Option<Direction> = None;
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
            "--step" => {
                if i + 1 < args.len() {
                    step = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--verbose" | "-v" => {
                verbose = true;
            }
            "--version" | "-V" => {
                println!("migrate {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "list" => {
                for migration in migrations::registered() {
                    println!("{}", migration.name());
                }
                return Ok(());
            }
            other => match other.parse::<Direction>() {
                Ok(d) if direction.is_none() => direction = Some(d),
                _ => {
                    eprintln!("Unknown argument: {}", other);
                    print_help();
                    std::process::exit(1);
                }
            },
        }
        i += 1;
    }

    let Some(direction) = direction else {
        eprintln!("Missing direction: expected 'up' or 'down'");
        print_help();
        std::process::exit(1);
    };

    let migration = match step {
        Some(ref name) => migrations::find(name)
            .with_context(|| format!("Unknown migration step: {}", name))?,
        None => migrations::registered()
            .pop()
            .context("No migration steps are registered")?,
    };

    if let Some(path) = config_path {
        env::set_var(CONFIG_PATH_ENV, path);
    }

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if verbose {
        config.logging.level = "debug".to_string();
    }
    let _log_guard = logging::init(&config.logging)?;

    if let Err(e) = migrations::migrate(&config.database, migration.as_ref(), direction).await {
        error!(
            "[FAIL] Migration {} ({}) failed: {}",
            migration.name(),
            direction,
            e
        );
        return Err(e.into());
    }

    Ok(())
}

fn print_help() {
    println!("migrate - apply or revert a schema migration step");
    println!();
    println!("Usage:");
    println!("  migrate <up|down> [OPTIONS]");
    println!("  migrate list");
    println!();
    println!("Options:");
    println!("  --step <name>     Migration step to run (default: latest)");
    println!("  --config <path>   Path to a YAML configuration file");
    println!("  -v, --verbose     Enable verbose output");
    println!("  -V, --version     Print version");
    println!("  -h, --help        Show this help message");
}
