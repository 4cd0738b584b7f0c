//! Plot descriptions of an actor's movies

use clap::Args;

use crate::output;
use crate::{AppContext, Cli};

#[derive(Args)]
pub struct DescribeArgs {
    /// Actor (IMDb id or URL)
    pub actor: String,
}

pub async fn run(args: &DescribeArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let client = ctx.imdb("describe")?;
    let actor = ctx.resolve(&args.actor)?;

    let descriptions = client.movie_descriptions(&actor).await?;
    tracing::info!("Found {} descriptions for {}", descriptions.len(), actor);

    if descriptions.is_empty() {
        println!("No movie descriptions found for {}", actor);
    } else {
        println!(
            "{}",
            output::render_descriptions(&descriptions, cli.output_format())?.trim_end()
        );
    }

    Ok(())
}
