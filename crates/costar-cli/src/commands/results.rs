//! Outcomes saved by an earlier batch

use anyhow::Context;
use clap::Args;
use costar_storage::{JsonSink, OutcomeStore};
use std::path::{Path, PathBuf};

use crate::output;
use crate::Cli;

#[derive(Args)]
pub struct ResultsArgs {
    /// File written by `pairs --sink json` or `--sink redb`
    pub path: PathBuf,

    /// Show failed pairs only
    #[arg(long)]
    pub failed: bool,
}

fn open_store(path: &Path) -> anyhow::Result<Box<dyn OutcomeStore>> {
    let store: Box<dyn OutcomeStore> = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Box::new(JsonSink::new(path)),
        #[cfg(feature = "redb")]
        Some("redb") => Box::new(costar_storage::RedbSink::open(path)?),
        _ => anyhow::bail!(
            "Can't read results from {}: expected a .json or .redb file",
            path.display()
        ),
    };
    Ok(store)
}

pub async fn run(args: &ResultsArgs, cli: &Cli) -> anyhow::Result<()> {
    if !args.path.exists() {
        anyhow::bail!("No results at {}", args.path.display());
    }

    let store = open_store(&args.path)?;
    let mut outcomes = store
        .load_all()
        .await
        .with_context(|| format!("Failed to read {}", args.path.display()))?;

    if args.failed {
        outcomes.retain(|outcome| outcome.is_failure());
    }

    tracing::info!("Loaded {} outcomes", outcomes.len());

    if outcomes.is_empty() {
        println!("No outcomes in {}", args.path.display());
    } else {
        println!(
            "{}",
            output::render_outcomes(&outcomes, cli.output_format())?.trim_end()
        );
    }

    Ok(())
}
