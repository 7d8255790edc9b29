//! # xpense CLI
//!
//! Inspection tool over `xpense-core`: loads configuration, opens a JSON
//! ledger snapshot, and prints the same figures the dashboard shows.
//!
//! ## Command Flow
//! ```text
//! args ──► Command ──► CliConfig::load ──► JsonSnapshotSource::open
//!                                                   │
//!                                     snapshot(AccountScope(self_id))
//!                                                   │
//!                                                   ▼
//!                                  Ledger::from_snapshot ──► report::*
//! ```

pub mod config;
pub mod report;
pub mod source;

use anyhow::{bail, Context};
use tracing::info;
use xpense_core::{AccountScope, Ledger, RecordSource, UserId};

use crate::config::CliConfig;
use crate::source::JsonSnapshotSource;

/// What to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Net balance with every friend.
    Balances,
    /// Balance with one friend.
    Balance(UserId),
    /// Owed / owe / totals / active debts.
    Summary,
    /// Transfers involving the user, oldest first.
    History,
    /// Expenses the user is part of, newest first.
    Expenses,
    /// Every unsettled pair among the records the user is part of.
    Pairs,
}

impl Command {
    /// Parses the positional part of the command line.
    pub fn parse(args: &[String]) -> anyhow::Result<Self> {
        let Some(name) = args.first() else {
            return Ok(Command::Summary);
        };

        let command = match name.as_str() {
            "balances" => Command::Balances,
            "balance" => {
                let friend = args.get(1).context("balance needs a friend id")?;
                Command::Balance(UserId::new(friend.as_str()))
            }
            "summary" => Command::Summary,
            "history" => Command::History,
            "expenses" => Command::Expenses,
            "pairs" => Command::Pairs,
            other => bail!("Unknown command: {other}"),
        };
        Ok(command)
    }
}

/// Runs `command` against `source` and returns the rendered output.
pub fn run(
    command: &Command,
    config: &CliConfig,
    source: &impl RecordSource,
    json: bool,
) -> anyhow::Result<String> {
    let me = config
        .self_id()
        .cloned()
        .context("No user selected: pass --as <id> or set XPENSE_SELF_ID")?;

    let snapshot = source.snapshot(&AccountScope::new(me.clone()))?;
    let ledger = Ledger::from_snapshot(&snapshot).with_policy(config.ledger.clone());
    let policy = ledger.policy();

    info!(user_id = %me, ?command, "Running command");

    let output = match command {
        Command::Balances => {
            let balances = ledger.net_balances(&me)?;
            if json {
                serde_json::to_string_pretty(&balances)?
            } else {
                report::balances(&balances, policy)
            }
        }
        Command::Balance(friend) => {
            let amount = ledger.balance_with(&me, friend)?;
            if json {
                serde_json::to_string(&amount)?
            } else {
                format!("{}\n", policy.display(amount))
            }
        }
        Command::Summary => {
            let summary = ledger.summary(&me)?;
            if json {
                serde_json::to_string_pretty(&summary)?
            } else {
                report::summary(&summary, policy)
            }
        }
        Command::History => {
            let history = ledger.history(&me)?;
            if json {
                serde_json::to_string_pretty(&history)?
            } else {
                report::history(&history, policy)
            }
        }
        Command::Expenses => {
            let expenses = ledger.expenses_involving(&me);
            if json {
                serde_json::to_string_pretty(&expenses)?
            } else {
                report::expenses(&expenses, policy)
            }
        }
        Command::Pairs => report::pairwise(&ledger.pairwise()?, policy),
    };

    Ok(output)
}

/// Opens the configured snapshot and runs `command` over it.
pub fn execute(command: &Command, config: &CliConfig, json: bool) -> anyhow::Result<String> {
    let path = &config.source.snapshot_path;
    let source = JsonSnapshotSource::open(path)
        .with_context(|| format!("Could not open ledger snapshot {}", path.display()))?;
    run(command, config, &source, json)
}
