//! Distances between every pair of a roster

use anyhow::Context;
use clap::{Args, ValueEnum};
use costar_core::{NodeId, PairwiseDistanceDriver, ResultSink};
use costar_storage::{CsvSink, JsonSink};
use std::path::{Path, PathBuf};

use super::SearchArgs;
use crate::output;
use crate::{AppContext, Cli};

/// Where the batch outcomes are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkKind {
    Csv,
    Json,
    Redb,
}

impl SinkKind {
    fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Redb => "redb",
        }
    }

    fn open(self, path: &Path) -> anyhow::Result<Box<dyn ResultSink>> {
        let sink: Box<dyn ResultSink> = match self {
            Self::Csv => Box::new(CsvSink::new(path)),
            Self::Json => Box::new(JsonSink::new(path)),
            Self::Redb => open_redb(path)?,
        };
        Ok(sink)
    }
}

#[cfg(feature = "redb")]
fn open_redb(path: &Path) -> anyhow::Result<Box<dyn ResultSink>> {
    Ok(Box::new(costar_storage::RedbSink::open(path)?))
}

#[cfg(not(feature = "redb"))]
fn open_redb(_path: &Path) -> anyhow::Result<Box<dyn ResultSink>> {
    anyhow::bail!("This build has no redb support")
}

#[derive(Args)]
pub struct PairsArgs {
    /// Roster actor (IMDb id or URL); repeat for each actor [default: config roster]
    #[arg(short, long = "actor")]
    pub actors: Vec<String>,

    /// Output file [default: config output, with the sink's extension]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output backend
    #[arg(long, value_enum, default_value = "csv")]
    pub sink: SinkKind,

    /// Pair searches running at once
    #[arg(long)]
    pub workers: Option<usize>,

    /// Retries for pairs failing with a transient error
    #[arg(long)]
    pub retries: Option<u32>,

    #[command(flatten)]
    pub search: SearchArgs,
}

pub async fn run(args: &PairsArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let inputs = if args.actors.is_empty() {
        ctx.config.roster_ids()
    } else {
        args.actors.clone()
    };
    if inputs.is_empty() {
        anyhow::bail!("No actors given. Pass --actor or add a [[roster]] to the config file.");
    }

    let roster = inputs
        .iter()
        .map(|input| ctx.resolve(input))
        .collect::<anyhow::Result<Vec<NodeId>>>()?;

    let mut config = ctx
        .config
        .driver_config(args.search.apply(ctx.config.search_config()));
    if let Some(workers) = args.workers {
        config = config.with_worker_budget(workers);
    }
    if let Some(retries) = args.retries {
        config = config.with_retries(retries);
    }

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| ctx.config.output.with_extension(args.sink.extension()));
    let sink = args.sink.open(&path)?;

    let driver = PairwiseDistanceDriver::new(ctx.hop_oracles(), config);
    let persisted = driver.run_and_persist(&roster, sink.as_ref()).await?;
    let report = &persisted.report;

    if !cli.quiet {
        if !report.is_empty() {
            println!(
                "{}",
                output::render_outcomes(&report.outcomes, cli.output_format())?.trim_end()
            );
        }
        eprintln!(
            "{} pairs: {} found, {} failed",
            report.len(),
            report.successes().count(),
            report.failures().count()
        );
    }

    persisted
        .sink
        .with_context(|| format!("Can't write distances to {}", path.display()))?;

    if !cli.quiet {
        eprintln!("Wrote {}", path.display());
    }

    Ok(())
}
