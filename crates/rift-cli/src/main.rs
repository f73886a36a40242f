//! `rift` command-line entry point.
//!
//! Parses arguments, sets up logging on stderr and hands off to the
//! command handlers. JSON results go to stdout.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{DDragonCommand, RequestArgs};

#[derive(Parser)]
#[command(
    name = "rift",
    about = "Query the Riot Games web API from the command line",
    version,
    long_about = "A command-line front end for rift-api. Requests go through the same \
                  rate limiter and optional response cache as library callers; cache and \
                  limiter settings are read from RIFT_* environment variables."
)]
struct Cli {
    /// API key sent as X-Riot-Token
    #[arg(long, env = "RIFT_API_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Verbose logging, including cache hits and writes
    #[arg(short, long, global = true)]
    debug: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Call any registered method by key
    Request(RequestArgs),

    /// List registered method keys, optionally under one namespace
    Methods {
        /// Namespace such as SUMMONER or TFT_LEAGUE
        namespace: Option<String>,
    },

    /// Fetch static game data from Data Dragon
    #[command(subcommand)]
    Ddragon(DDragonCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let output = match cli.command {
        Commands::Request(args) => commands::request(cli.token, cli.debug, args).await?,
        Commands::Methods { namespace } => commands::methods(namespace.as_deref())?,
        Commands::Ddragon(cmd) => commands::ddragon(cmd).await?,
    };

    let text = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{text}");

    Ok(())
}
