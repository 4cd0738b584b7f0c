//! Neighbor oracles backed by IMDb pages

use crate::client::ImdbClient;
use async_trait::async_trait;
use costar_core::{HopOracles, NeighborOracle, NodeId, OracleResult};
use std::sync::Arc;

/// Actor → movies, read from the actor's filmography
#[derive(Debug, Clone)]
pub struct MoviesOfActor {
    client: ImdbClient,
}

impl MoviesOfActor {
    pub fn new(client: ImdbClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NeighborOracle for MoviesOfActor {
    async fn fetch_neighbors(
        &self,
        node: &NodeId,
        limit: Option<usize>,
    ) -> OracleResult<Vec<NodeId>> {
        let movies = self
            .client
            .movies_of_actor(node, limit)
            .await
            .map_err(|e| e.into_oracle_error(node))?;

        tracing::debug!("{} has {} movies", node, movies.len());
        Ok(movies.into_iter().map(|movie| movie.id).collect())
    }
}

/// Movie → actors, read from the full cast listing
#[derive(Debug, Clone)]
pub struct ActorsOfMovie {
    client: ImdbClient,
}

impl ActorsOfMovie {
    pub fn new(client: ImdbClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NeighborOracle for ActorsOfMovie {
    async fn fetch_neighbors(
        &self,
        node: &NodeId,
        limit: Option<usize>,
    ) -> OracleResult<Vec<NodeId>> {
        let actors = self
            .client
            .actors_of_movie(node, limit)
            .await
            .map_err(|e| e.into_oracle_error(node))?;

        tracing::debug!("{} has {} actors", node, actors.len());
        Ok(actors.into_iter().map(|actor| actor.id).collect())
    }
}

impl ImdbClient {
    /// Oracle pair for actor-to-actor searches: movies out, cast back in
    pub fn hop_oracles(&self) -> HopOracles {
        HopOracles::new(
            Arc::new(MoviesOfActor::new(self.clone())),
            Arc::new(ActorsOfMovie::new(self.clone())),
        )
    }
}
