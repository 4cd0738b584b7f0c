//! Costar CLI - Actor distances over the IMDb co-star graph

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{completions, describe, distance, neighbors, pairs, results};
use config::{config_file_path, Config};
use costar_core::{HopOracles, MemoryOracle, NodeId};
use costar_imdb::{extract_id, ImdbClient};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "costar")]
#[command(author, version, about = "Distances between actors through the movies they share")]
pub struct Cli {
    /// Config file [default: ~/.costar/config.toml]
    #[arg(long, env = "COSTAR_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Read the graph from a JSON adjacency file instead of IMDb
    #[arg(short, long, global = true)]
    pub graph: Option<PathBuf>,

    /// Output format: table, json, csv
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn config_path(&self) -> PathBuf {
        config_file_path(self.config.as_deref())
    }

    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from(self.format.as_str())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Distance between two actors
    Distance(distance::DistanceArgs),
    /// Distances between every pair of a roster
    Pairs(pairs::PairsArgs),
    /// Neighbors of one actor or movie
    Neighbors(neighbors::NeighborsArgs),
    /// Plot descriptions of an actor's movies
    Describe(describe::DescribeArgs),
    /// Show outcomes saved by an earlier batch
    Results(results::ResultsArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Where neighbor lists come from
pub enum GraphSource {
    Offline(Arc<MemoryOracle>),
    Imdb(ImdbClient),
}

/// Application context with the loaded config and graph source
pub struct AppContext {
    pub config: Config,
    pub source: GraphSource,
}

impl AppContext {
    pub fn new(cli: &Cli, config: Config) -> anyhow::Result<Self> {
        let source = match &cli.graph {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read graph {}", path.display()))?;
                let oracle = MemoryOracle::from_json(&json)
                    .with_context(|| format!("Invalid graph file {}", path.display()))?;
                tracing::debug!("Loaded {} nodes from {:?}", oracle.node_count(), path);
                GraphSource::Offline(Arc::new(oracle))
            }
            None => {
                tracing::debug!("Using IMDb at {}", config.base_url);
                GraphSource::Imdb(ImdbClient::with_config(config.imdb_config())?)
            }
        };

        Ok(Self { config, source })
    }

    pub fn hop_oracles(&self) -> HopOracles {
        match &self.source {
            GraphSource::Offline(oracle) => HopOracles::symmetric(oracle.clone()),
            GraphSource::Imdb(client) => client.hop_oracles(),
        }
    }

    /// Node id from an IMDb URL or id; offline graphs accept any name
    pub fn resolve(&self, input: &str) -> anyhow::Result<NodeId> {
        match (extract_id(input), &self.source) {
            (Ok(id), _) => Ok(id),
            (Err(_), GraphSource::Offline(_)) => Ok(NodeId::new(input.trim())),
            (Err(e), GraphSource::Imdb(_)) => Err(e.into()),
        }
    }

    pub fn imdb(&self, command: &str) -> anyhow::Result<&ImdbClient> {
        match &self.source {
            GraphSource::Imdb(client) => Ok(client),
            GraphSource::Offline(_) => {
                anyhow::bail!("{} reads IMDb pages and cannot run with --graph", command)
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting costar CLI");

    let config_path = cli.config_path();
    match &cli.command {
        Commands::Config(args) => return commands::config::run(args, &config_path),
        Commands::Completions(args) => return completions::run(args),
        Commands::Results(args) => return results::run(args, &cli).await,
        _ => {}
    }

    let config = Config::load(&config_path)?;
    let ctx = AppContext::new(&cli, config)?;

    match &cli.command {
        Commands::Distance(args) => distance::run(args, &cli, &ctx).await?,
        Commands::Pairs(args) => pairs::run(args, &cli, &ctx).await?,
        Commands::Neighbors(args) => neighbors::run(args, &cli, &ctx).await?,
        Commands::Describe(args) => describe::run(args, &cli, &ctx).await?,
        Commands::Config(_) | Commands::Completions(_) | Commands::Results(_) => {}
    }

    Ok(())
}
