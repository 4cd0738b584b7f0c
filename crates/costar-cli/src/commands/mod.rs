//! CLI command implementations

use clap::Args;
use costar_core::SearchConfig;

pub mod completions;
pub mod config;
pub mod describe;
pub mod distance;
pub mod neighbors;
pub mod pairs;
pub mod results;

/// Search settings that override the config file
#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Depth bound in hops
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Movies taken per actor
    #[arg(long)]
    pub movies_limit: Option<usize>,

    /// Actors taken per movie
    #[arg(long)]
    pub actors_limit: Option<usize>,

    /// Concurrent page fetches per search
    #[arg(long)]
    pub concurrency: Option<usize>,
}

impl SearchArgs {
    pub fn apply(&self, mut config: SearchConfig) -> SearchConfig {
        if let Some(depth) = self.max_depth {
            config = config.with_max_depth(depth);
        }
        if let Some(limit) = self.movies_limit {
            config = config.with_outbound_limit(Some(limit));
        }
        if let Some(limit) = self.actors_limit {
            config = config.with_inbound_limit(Some(limit));
        }
        if let Some(concurrency) = self.concurrency {
            config = config.with_concurrency(concurrency);
        }
        config
    }
}
