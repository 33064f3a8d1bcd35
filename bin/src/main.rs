//! fiidex CLI binary.
//!
//! Command-line front end for the fiidex indicator engine.

mod cmd;
mod data;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fiidex::{IndicatorEngine, LiveMarketData, Ticker};
use output::OutputFormat;
use std::{path::PathBuf, process};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "fiidex")]
#[command(about = "Dividend yield and P/VP histories for Brazilian real-estate funds", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding the bronze extracts
    #[arg(long, global = true)]
    bronze_dir: Option<PathBuf>,

    /// Directory holding the Oceans14 extracts
    #[arg(long, global = true)]
    oceans_dir: Option<PathBuf>,

    /// Never call the live market-data provider
    #[arg(long, global = true)]
    offline: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List known tickers
    Tickers,

    /// Dividend-yield history
    Dy {
        /// Fund ticker (e.g. HGLG11)
        ticker: String,
    },

    /// Price-to-book series
    Pvp {
        /// Fund ticker
        ticker: String,

        /// Resample to one row per month and print the latest reading
        #[arg(short, long)]
        monthly: bool,
    },

    /// Resolved book value per share and its source
    BookValue {
        /// Fund ticker
        ticker: String,
    },

    /// Dividend yield against monthly P/VP
    Compare {
        /// Fund ticker
        ticker: String,
    },

    /// Per-ticker data coverage
    Coverage {
        /// Only show the first N tickers
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Load status of every source
    Sources,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) -> Result<()> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let paths = data::data_paths(cli.bronze_dir, cli.oceans_dir);

    match data::live_client(cli.offline) {
        Some(client) => {
            let engine = IndicatorEngine::load(&paths, client);
            dispatch(&engine, cli.command, cli.format).await
        }
        None => {
            let engine = IndicatorEngine::load(&paths, fiidex::OfflineMarketData);
            dispatch(&engine, cli.command, cli.format).await
        }
    }
}

async fn dispatch<L: LiveMarketData>(
    engine: &IndicatorEngine<L>,
    command: Commands,
    format: OutputFormat,
) -> Result<()> {
    match command {
        Commands::Tickers => cmd::tickers::run(engine, format),
        Commands::Dy { ticker } => cmd::dividend::run(engine, &Ticker::new(ticker), format).await,
        Commands::Pvp { ticker, monthly } => {
            cmd::price_to_book::run(engine, &Ticker::new(ticker), monthly, format)
        }
        Commands::BookValue { ticker } => {
            cmd::book_value::run(engine, &Ticker::new(ticker), format)
        }
        Commands::Compare { ticker } => {
            cmd::compare::run(engine, &Ticker::new(ticker), format).await
        }
        Commands::Coverage { top } => cmd::coverage::run(engine, top, format),
        Commands::Sources => cmd::sources::run(engine, format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "fiidex", "pvp", "HGLG11", "--monthly", "--offline", "--format", "json", "-vv",
        ]);
        assert!(cli.offline);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Pvp { monthly: true, .. }));
    }

    #[tokio::test]
    async fn test_dispatch_on_empty_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let paths = fiidex::DataPaths::new(dir.path(), dir.path());
        let engine = IndicatorEngine::load(&paths, fiidex::OfflineMarketData);
        assert!(!engine.load_report().all_loaded());

        let commands = [
            Commands::Tickers,
            Commands::Sources,
            Commands::Coverage { top: Some(1) },
            Commands::Dy {
                ticker: "HGLG11".to_string(),
            },
            Commands::Pvp {
                ticker: "HGLG11".to_string(),
                monthly: true,
            },
            Commands::Compare {
                ticker: "HGLG11".to_string(),
            },
        ];
        for command in commands {
            dispatch(&engine, command, OutputFormat::Text).await.unwrap();
        }

        let book_value = Commands::BookValue {
            ticker: "HGLG11".to_string(),
        };
        assert!(dispatch(&engine, book_value, OutputFormat::Json).await.is_err());
    }

    #[test]
    fn test_coverage_top() {
        let cli = Cli::parse_from(["fiidex", "--bronze-dir", "/tmp/x", "coverage", "--top", "5"]);
        assert_eq!(cli.bronze_dir, Some(PathBuf::from("/tmp/x")));
        assert!(matches!(cli.command, Commands::Coverage { top: Some(5) }));
    }
}
