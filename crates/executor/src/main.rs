use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tokio::sync::watch;
use tracing::{debug, error, info};

use common::config::ScanConfig;
use common::logger;
use executor::services::report;
use executor::{RunRequest, run_scan};
use storage::Database;
use storage::repositories::ScannerResultsRepository;

#[derive(Parser, Debug)]
#[command(name = "scan")]
#[command(about = "Daily equity pattern scanner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every scanner over every symbol and replace that date's results
    Run {
        /// Scan date (YYYY-MM-DD), today when omitted
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Allow a scan date before today
        #[arg(long, default_value_t = false)]
        backfill: bool,

        /// Print the run summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Overview of the stored results
    Stats,
    /// Strongest signals of one scan date
    Top {
        /// Scan date (YYYY-MM-DD), latest stored date when omitted
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long, default_value_t = 30)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logger::setup_logger();
    let cli = Cli::parse();

    let config = ScanConfig::from_env()?;
    debug!("Loaded config: {:?}", config);
    let db = Database::connect(&config)
        .await
        .with_context(|| format!("Failed to open {}", config.database_url))?;

    let outcome = match cli.command {
        Command::Run { date, backfill, json } => run(&db, &config, date, backfill, json).await,
        Command::Stats => {
            let stats = ScannerResultsRepository::stats(db.pool()).await?;
            print!("{}", report::format_stats(&stats));
            Ok(())
        }
        Command::Top { date, limit } => top(&db, date, limit).await,
    };

    db.close().await;
    outcome
}

async fn run(
    db: &Database,
    config: &ScanConfig,
    date: Option<NaiveDate>,
    backfill: bool,
    json: bool,
) -> anyhow::Result<()> {
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, cancelling run...");
            if let Err(e) = cancel_tx.send(true) {
                error!("Failed to signal cancellation: {}", e);
            }
        }
    });

    let request = RunRequest {
        date,
        today: chrono::Local::now().date_naive(),
        backfill,
    };
    let summary = run_scan(db, config, request, cancel_rx).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary);
    }
    Ok(())
}

async fn top(db: &Database, date: Option<NaiveDate>, limit: u32) -> anyhow::Result<()> {
    let scan_date = match date {
        Some(date) => date,
        None => match ScannerResultsRepository::latest_scan_date(db.pool()).await? {
            Some(date) => date,
            None => {
                println!("No scan results stored yet.");
                return Ok(());
            }
        },
    };

    let records = ScannerResultsRepository::top_signals(db.pool(), scan_date, limit).await?;
    println!("Top signals for {}", scan_date);
    print!("{}", report::format_top(&records));
    Ok(())
}
