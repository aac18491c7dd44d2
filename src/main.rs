//! Command-line front end for the trade journal.
//!
//! ```bash
//! # Dashboard for the last three months of a backup, plus the equity curve
//! trade-calendar report --backup journal.json --range 3M --csv equity.csv
//!
//! # 1R/2R/3R and lot size for a 1,000,000 balance at 2%
//! trade-calendar risk --balance 1000000 --percent 2 --stop-loss-pips 20
//! ```

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs::File;
use std::path::PathBuf;

use trade_calendar_lib::backup::read_backup_file;
use trade_calendar_lib::report::{DashboardReport, write_equity_csv};
use trade_calendar_lib::risk::{self, RiskRate, RiskTargets};
use trade_calendar_lib::stats::ProfitGraphRange;
use trade_calendar_lib::{FixedClock, Journal, MemoryTradeStore};

#[derive(Parser)]
#[command(name = "trade-calendar")]
#[command(about = "Trade journal analytics: daily P&L, profit graph, drawdown and 1R sizing", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dashboard report for a backup file as JSON
    Report {
        /// Backup JSON written by the journal export
        #[arg(short, long)]
        backup: PathBuf,

        /// Profit graph period (1M, 3M, ALL); defaults to the backup's setting
        #[arg(short, long)]
        range: Option<ProfitGraphRange>,

        /// IANA timezone overriding the backup's setting
        #[arg(short, long)]
        timezone: Option<String>,

        /// Evaluate as of this instant (RFC 3339) instead of now
        #[arg(long)]
        now: Option<DateTime<Utc>>,

        /// Also write the equity curve of the period as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Print risk targets for a balance
    Risk {
        /// Account balance
        #[arg(short, long, allow_negative_numbers = true)]
        balance: f64,

        /// Risk per trade in percent (0 < p <= 100)
        #[arg(short, long)]
        percent: String,

        /// Stop distance in pips, for the lot size
        #[arg(short, long)]
        stop_loss_pips: Option<f64>,
    },
}

#[derive(Serialize)]
struct RiskOutput {
    balance: f64,
    risk_percent: f64,
    #[serde(flatten)]
    targets: RiskTargets,
    #[serde(skip_serializing_if = "Option::is_none")]
    lot_size: Option<f64>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report { backup, range, timezone, now, csv } => {
            run_report(backup, range, timezone, now, csv)?;
        }
        Commands::Risk { balance, percent, stop_loss_pips } => {
            run_risk(balance, &percent, stop_loss_pips)?;
        }
    }

    Ok(())
}

fn run_report(
    backup_path: PathBuf,
    range: Option<ProfitGraphRange>,
    timezone: Option<String>,
    now: Option<DateTime<Utc>>,
    csv_path: Option<PathBuf>,
) -> Result<()> {
    let backup = read_backup_file(&backup_path)
        .with_context(|| format!("Failed to read backup {}", backup_path.display()))?;

    let mut settings = backup.settings;
    if let Some(range) = range {
        settings.default_range = range;
    }
    if let Some(timezone) = timezone {
        settings.timezone = timezone;
    }

    let clock = FixedClock::new(now.unwrap_or_else(Utc::now));
    let journal = Journal::open(MemoryTradeStore::with_trades(backup.trades), clock, settings)
        .context("Invalid journal settings")?;

    let report = DashboardReport::from_journal(&journal);
    println!("{}", report.to_json()?);

    if let Some(csv_path) = csv_path {
        let file = File::create(&csv_path)
            .with_context(|| format!("Failed to create {}", csv_path.display()))?;
        write_equity_csv(file, &journal.graph().series)?;
        log::info!("Wrote equity curve to {}", csv_path.display());
    }

    Ok(())
}

fn run_risk(balance: f64, percent: &str, stop_loss_pips: Option<f64>) -> Result<()> {
    let rate = RiskRate::parse(percent).context("Invalid risk percent")?;

    let Some(targets) = risk::risk_targets(balance, rate) else {
        bail!("Balance must be positive, got {}", balance);
    };

    let output = RiskOutput {
        balance,
        risk_percent: rate.percent(),
        targets,
        lot_size: stop_loss_pips.map(|pips| risk::lot_size(balance, rate, pips)),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
