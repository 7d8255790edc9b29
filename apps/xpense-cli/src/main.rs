//! # xpense
//!
//! ```text
//! xpense [OPTIONS] [COMMAND]
//!
//! Commands: summary (default), balances, balance <friend>, history,
//!           expenses, pairs
//! ```

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use xpense_cli::config::CliConfig;
use xpense_cli::{execute, Command};
use xpense_core::UserId;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();

    let mut config_path: Option<PathBuf> = None;
    let mut snapshot: Option<PathBuf> = None;
    let mut self_id: Option<String> = None;
    let mut json = false;
    let mut positional: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                let value = args.get(i + 1).context("--config needs a path")?;
                config_path = Some(PathBuf::from(value));
                i += 1;
            }
            "--snapshot" | "-s" => {
                let value = args.get(i + 1).context("--snapshot needs a path")?;
                snapshot = Some(PathBuf::from(value));
                i += 1;
            }
            "--as" | "-u" => {
                let value = args.get(i + 1).context("--as needs a user id")?;
                self_id = Some(value.clone());
                i += 1;
            }
            "--json" => json = true,
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other => positional.push(other.to_string()),
        }
        i += 1;
    }

    let command = Command::parse(&positional)?;

    let mut config = CliConfig::load(config_path.as_deref()).context("Failed to load configuration")?;
    // Flags beat both the file and the environment
    if let Some(path) = snapshot {
        config.source.snapshot_path = path;
    }
    if let Some(id) = self_id {
        config.source.self_id = Some(UserId::new(id));
    }
    config.validate()?;
    debug!(?config, "Configuration loaded");

    info!(snapshot = %config.source.snapshot_path.display(), "Starting xpense");
    let output = execute(&command, &config, json)?;
    print!("{output}");
    if json {
        println!();
    }

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=xpense_core=trace` - Show every split and fold
///
/// Logs go to stderr so command output stays pipeable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,xpense_cli=info,xpense_core=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_help() {
    println!("xpense - EasyXpense ledger inspector");
    println!();
    println!("Usage: xpense [OPTIONS] [COMMAND]");
    println!();
    println!("Commands:");
    println!("  summary            Owed, owe, totals and active debts (default)");
    println!("  balances           Net balance with every friend");
    println!("  balance <friend>   Net balance with one friend");
    println!("  history            Transfers involving you, oldest first");
    println!("  expenses           Your expenses, newest first");
    println!("  pairs              Unsettled pairs across your records");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>    Config file (default: platform config dir/xpense.toml)");
    println!("  -s, --snapshot <PATH>  Ledger snapshot JSON (overrides config)");
    println!("  -u, --as <ID>          Whose ledger to show (overrides config)");
    println!("      --json             Print JSON instead of text");
    println!("  -h, --help             Show this help message");
}
