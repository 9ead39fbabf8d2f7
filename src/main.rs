use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roundplan::config::Config;

mod commands;

#[derive(Parser)]
#[command(
    name = "roundplan",
    version,
    about = "Plan recurring group rounds with as few repeated groupings as possible",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// TOML configuration file (environment variables otherwise)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a plan of fixed-size groups
    Generate {
        /// Comma-separated player names
        #[arg(short, long, value_delimiter = ',', required = true)]
        players: Vec<String>,

        /// Number of rounds
        #[arg(short, long)]
        rounds: usize,

        /// Players per round (configured default otherwise)
        #[arg(long)]
        per_round: Option<usize>,

        /// Selection mode (exhaustive, greedy_shuffle, backtrack_random)
        #[arg(long)]
        selection: Option<String>,

        /// Seed for randomized selection
        #[arg(long)]
        seed: Option<u64>,

        /// Also write the plan as CSV to this file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print the plan as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Generate rounds of pairs covering every player
    Pairs {
        /// Comma-separated player names (even count)
        #[arg(short, long, value_delimiter = ',', required = true)]
        players: Vec<String>,

        /// Number of rounds
        #[arg(short, long)]
        rounds: usize,

        /// Print the rounds as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Run the HTTP API server
    Serve {
        /// Host to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short = 'P', long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let log_format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| config.logging.format.clone());

    // Initialize tracing/logging
    setup_tracing(&log_format, &config.logging.level, cli.verbose)?;

    tracing::debug!(selection = %config.algorithm.selection, "Configuration loaded");

    match cli.command {
        Commands::Generate {
            players,
            rounds,
            per_round,
            selection,
            seed,
            csv,
            json,
        } => {
            tracing::info!(
                players = players.len(),
                rounds = %rounds,
                per_round = ?per_round,
                "Starting generate command"
            );
            commands::generate(
                &config,
                commands::GenerateParams {
                    players,
                    rounds,
                    per_round,
                    selection,
                    seed,
                    csv,
                    json,
                },
            )?;
        }

        Commands::Pairs {
            players,
            rounds,
            json,
        } => {
            tracing::info!(players = players.len(), rounds = %rounds, "Starting pairs command");
            commands::pairs(&config, players, rounds, json)?;
        }

        Commands::Serve { host, port } => {
            commands::serve(&config, host, port).await?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("roundplan=debug,tower_http=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .or_else(|_| tracing_subscriber::EnvFilter::try_new(format!("roundplan={level},warn")))
            .context("Invalid log level")?
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
