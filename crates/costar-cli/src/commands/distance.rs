//! Distance between two actors

use clap::Args;
use costar_core::{BidirectionalSearchEngine, DistanceResult, PairOutcome};

use super::SearchArgs;
use crate::output::{self, OutputFormat};
use crate::{AppContext, Cli};

#[derive(Args)]
pub struct DistanceArgs {
    /// Starting actor (IMDb id or URL)
    pub from: String,

    /// Target actor (IMDb id or URL)
    pub to: String,

    #[command(flatten)]
    pub search: SearchArgs,
}

pub async fn run(args: &DistanceArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let source = ctx.resolve(&args.from)?;
    let target = ctx.resolve(&args.to)?;

    let config = args.search.apply(ctx.config.search_config());
    config.validate()?;

    let engine = BidirectionalSearchEngine::new(ctx.hop_oracles(), config);
    let outcome = engine.search(&source, &target).await?;

    tracing::info!(
        "{} rounds, {} lookups, {}/{} nodes known",
        outcome.stats.rounds,
        outcome.stats.lookups,
        outcome.stats.left_known,
        outcome.stats.right_known
    );

    match cli.output_format() {
        OutputFormat::Json => println!("{}", output::to_json(&outcome)?),
        format => {
            let result = PairOutcome::Found(DistanceResult::new(outcome.pair, outcome.distance));
            println!("{}", output::render_outcomes(&[result], format)?.trim_end());
        }
    }

    Ok(())
}
