//! Neighbors of one node

use clap::Args;
use costar_core::NeighborOracle;
use costar_imdb::{Credit, IdKind};

use crate::output;
use crate::{AppContext, Cli, GraphSource};

#[derive(Args)]
pub struct NeighborsArgs {
    /// Actor or movie (IMDb id or URL)
    pub id: String,

    /// Keep only the first N neighbors
    #[arg(short, long)]
    pub limit: Option<usize>,
}

pub async fn run(args: &NeighborsArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let id = ctx.resolve(&args.id)?;
    costar_core::limits::validate_neighbor_limit(args.limit)?;

    let credits = match &ctx.source {
        GraphSource::Offline(oracle) => oracle
            .fetch_neighbors(&id, args.limit)
            .await?
            .into_iter()
            .map(|id| Credit {
                id,
                name: String::new(),
            })
            .collect(),
        GraphSource::Imdb(client) => match IdKind::of(id.as_str()) {
            Some(IdKind::Name) => client.movies_of_actor(&id, args.limit).await?,
            Some(IdKind::Title) => client.actors_of_movie(&id, args.limit).await?,
            None => anyhow::bail!("Not an IMDb name or title id: {}", id),
        },
    };

    tracing::info!("{} has {} neighbors", id, credits.len());

    if credits.is_empty() {
        println!("No neighbors found for {}", id);
    } else {
        println!(
            "{}",
            output::render_credits(&credits, cli.output_format())?.trim_end()
        );
    }

    Ok(())
}
