//! Fund Metrics CLI
//!
//! Loads a CSV ledger into memory and prints fund metrics.
//! Modeling parameters come from the environment:
//!   FUND_METRICS_TARGET_TVPI, FUND_METRICS_SEED_RATES,
//!   FUND_METRICS_MAX_ITERATIONS, FUND_METRICS_TOLERANCE
//! Set RUST_LOG=debug to trace solver seeds.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::time::Instant;

use fund_metrics::fund::loader::{DEFAULT_FUNDS_PATH, DEFAULT_LEDGER_PATH};
use fund_metrics::fund::{load_funds, load_ledger};
use fund_metrics::{fund_report, metric_report, FundId, InMemoryRepository, MetricsConfig, MetricsRunner};

#[derive(Parser)]
#[command(name = "fund-metrics", version, about = "PIC, DPI and IRR for private-equity funds")]
struct Cli {
    /// Ledger CSV (fund_id,record_type,date,amount,is_recallable,adjustment_type,description)
    #[arg(long, default_value = DEFAULT_LEDGER_PATH)]
    ledger: PathBuf,

    /// Fund metadata CSV (id,name,gp_name,fund_type,vintage_year)
    #[arg(long, default_value = DEFAULT_FUNDS_PATH)]
    funds: PathBuf,

    /// Override the target TVPI used for the terminal NAV
    #[arg(long)]
    target_tvpi: Option<Decimal>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Headline metrics for one fund
    Metrics {
        #[arg(long)]
        fund: FundId,
        /// Print JSON instead of a text list
        #[arg(long)]
        json: bool,
    },
    /// Audit breakdown of one metric (pic, dpi, irr)
    Breakdown {
        #[arg(long)]
        fund: FundId,
        #[arg(long)]
        metric: String,
    },
    /// Metrics for every fund in the ledger, as JSON
    Batch,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let start = Instant::now();

    let mut config = MetricsConfig::from_env().context("invalid metrics configuration")?;
    if let Some(target_tvpi) = cli.target_tvpi {
        config = config.with_target_tvpi(target_tvpi);
        config.validate()?;
    }

    let entries = load_ledger(&cli.ledger)
        .with_context(|| format!("failed to load ledger {}", cli.ledger.display()))?;
    let funds = load_funds(&cli.funds)
        .with_context(|| format!("failed to load funds {}", cli.funds.display()))?;
    log::info!("Loaded {} ledger rows and {} funds", entries.len(), funds.len());

    let runner = MetricsRunner::new(InMemoryRepository::from_entries(funds, entries)?, config);
    let calc = runner.calculator();
    log::debug!("Terminal NAV assumes target TVPI {}", calc.config().target_tvpi);

    match cli.command {
        Command::Metrics { fund, json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&fund_report(calc, fund)?)?);
            } else {
                let report = fund_report(calc, fund)?;
                println!("{} (fund {})", report.fund_name, report.fund_id);
                print!("{}", report.metrics);
            }
        }
        Command::Breakdown { fund, metric } => {
            println!("{}", serde_json::to_string_pretty(&metric_report(calc, fund, &metric)?)?);
        }
        Command::Batch => {
            let runs = runner.run_all()?;
            println!("{}", serde_json::to_string_pretty(&runs)?);
        }
    }

    log::info!("Completed in {}ms", start.elapsed().as_millis());
    Ok(())
}
