mod api;
mod config;
mod currencies;
mod db;
mod error;
mod exchange_rates;
mod models;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use error::EtlError;
use exchange_rates::{DailyJob, CBR_DAILY_URL, DEFAULT_TABLE};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Exit status for every fatal path.
const FAILURE_EXIT_CODE: u8 = 2;

#[derive(Parser)]
#[command(name = "currency-daily", version, about = "Load the daily central bank currency rates into a database")]
struct Cli {
    /// TOML settings file
    #[arg(long, global = true, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Section of the settings file holding the connection settings
    #[arg(long, global = true, default_value = config::DEFAULT_SECTION)]
    section: String,

    /// Destination table, optionally schema-qualified (`schema.table`)
    #[arg(long, global = true, default_value = DEFAULT_TABLE)]
    table: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch today's feed and append it to the destination table (default)
    Run {
        /// Feed endpoint; the request date is appended to it
        #[arg(long, default_value = CBR_DAILY_URL)]
        base_url: String,
    },
    /// Print the first rows of the destination table as CSV
    Peek {
        #[arg(long, default_value_t = 3)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<EtlError>() {
                Some(etl) => error!(stage = etl.stage(), "{}", etl),
                None => error!(stage = "output", "{:#}", err),
            }
            ExitCode::from(FAILURE_EXIT_CODE)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Commands::Run {
        base_url: CBR_DAILY_URL.to_string(),
    }) {
        Commands::Run { base_url } => {
            let job = DailyJob {
                base_url,
                config_path: cli.config,
                section: cli.section,
                table: cli.table,
            };
            let feed = api::CbrClient::new().map_err(EtlError::from)?;
            let request_date = utils::current_request_date();

            info!("Loading currency rates for {}", request_date);
            exchange_rates::load_daily_rates(&feed, &job, &request_date).await?;
        }
        Commands::Peek { limit } => {
            let stdout = std::io::stdout();
            exchange_rates::peek_rates(&cli.config, &cli.section, &cli.table, limit, stdout.lock())
                .await?;
        }
    }

    Ok(())
}
