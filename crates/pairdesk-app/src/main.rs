//! pairdesk - bid/ask submission desk, terminal entry point.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use pairdesk_app::{describe_state, AppConfig, Application};
use pairdesk_core::{FundingSource, SubmissionKind};
use tracing::info;

/// Bid/ask submission desk
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via PAIRDESK_CONFIG env var)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print gate state and countdown once
    Status,
    /// Print the countdown every tick
    Watch {
        /// Stop after this many updates
        #[arg(long)]
        ticks: Option<u64>,
    },
    /// List investment plans
    Plans,
    /// Submit a bid against the active plan
    Bid {
        #[arg(long)]
        amount: String,
    },
    /// Submit an ask
    Ask {
        #[arg(long)]
        amount: String,
        /// Funding source: balance or earning
        #[arg(long, default_value = "balance")]
        source: FundingSource,
    },
    /// List submitted bids or asks
    History {
        #[arg(long, value_enum, default_value_t = HistoryKind::Bids)]
        kind: HistoryKind,
    },
    /// Print the preset amounts
    Presets,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum HistoryKind {
    Bids,
    Asks,
}

impl From<HistoryKind> for SubmissionKind {
    fn from(kind: HistoryKind) -> Self {
        match kind {
            HistoryKind::Bids => SubmissionKind::Bid,
            HistoryKind::Asks => SubmissionKind::Ask,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    pairdesk_telemetry::init_logging()?;

    info!("Starting pairdesk v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load(args.config.as_deref())?;
    info!(base_url = %config.api.base_url, "Configuration loaded");

    let app = Application::new(config)?;

    match args.command {
        Command::Status => {
            println!("{}", describe_state(&app.status(), app.gate()));
        }
        Command::Watch { ticks } => {
            let gate = app.gate().clone();
            app.watch(ticks, |state| println!("{}", describe_state(state, &gate)))
                .await?;
        }
        Command::Plans => {
            for plan in app.plans().await? {
                println!(
                    "#{} {}  min {}  max {}  interest {} ({})",
                    plan.id, plan.name, plan.minimum, plan.maximum, plan.interest, plan.interest_type
                );
            }
        }
        Command::Bid { amount } => {
            if !app.bid(&amount).await.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Ask { amount, source } => {
            if !app.ask(&amount, source).await.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::History { kind } => {
            for record in app.history(kind.into()).await? {
                println!(
                    "#{}  {}  {}  {}  {}",
                    record.id,
                    record.amount,
                    record.status,
                    record.trx.as_deref().unwrap_or("-"),
                    record.created_at.as_deref().unwrap_or("-")
                );
            }
        }
        Command::Presets => {
            let presets: Vec<String> = Application::presets().iter().map(ToString::to_string).collect();
            println!("{}", presets.join(" "));
        }
    }

    Ok(ExitCode::SUCCESS)
}
