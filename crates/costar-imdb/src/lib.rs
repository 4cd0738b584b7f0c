//! Costar IMDb - Neighbor oracles that read IMDb pages
//!
//! Actors link to the movies in their filmography and movies link to their
//! cast, so [`ImdbClient::hop_oracles`] gives the engine a bipartite pair of
//! oracles that walk the co-star graph one page at a time.

pub mod client;
pub mod error;
pub mod ids;
pub mod oracle;
pub mod parse;

#[cfg(test)]
mod fixtures;

pub use client::{ImdbClient, ImdbConfig, MovieDescription, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use error::{ImdbError, Result};
pub use ids::{extract_id, is_imdb_id, IdKind};
pub use oracle::{ActorsOfMovie, MoviesOfActor};
pub use parse::{Credit, PageParser};
