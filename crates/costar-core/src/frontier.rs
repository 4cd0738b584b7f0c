//! One-hop frontier expansion with bounded concurrent lookups

use crate::error::{ExpansionError, OracleError};
use crate::node::NodeId;
use crate::oracle::NeighborOracle;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Outcome of expanding one frontier by one hop
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    /// Neighbors not previously known on this side: the next frontier
    pub discovered: HashSet<NodeId>,

    /// Known set after the hop (`known ∪ discovered`)
    pub known: HashSet<NodeId>,
}

impl Expansion {
    /// Merge fetched neighbor lists into a known set
    ///
    /// The result depends only on the union of `fetched`, never on the
    /// order the lists arrive in.
    pub fn absorb<I>(known: HashSet<NodeId>, fetched: I) -> Self
    where
        I: IntoIterator<Item = Vec<NodeId>>,
    {
        let discovered: HashSet<NodeId> = fetched
            .into_iter()
            .flatten()
            .filter(|node| !known.contains(node))
            .collect();

        let mut known = known;
        known.extend(discovered.iter().cloned());

        Self { discovered, known }
    }
}

/// Expands frontiers through a neighbor oracle
///
/// All expansions made through one expander share its lookup pool, so two
/// frontiers expanded at the same time never exceed `concurrency` in-flight
/// lookups together.
#[derive(Debug, Clone)]
pub struct FrontierExpander {
    permits: Arc<Semaphore>,
    concurrency: usize,
}

impl FrontierExpander {
    pub fn new(concurrency: usize) -> Self {
        let concurrency = concurrency.max(1);
        Self {
            permits: Arc::new(Semaphore::new(concurrency)),
            concurrency,
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Fetch the neighbors of every node in `nodes` and merge them
    ///
    /// Fails fast: the first failing lookup aborts the hop and drops every
    /// lookup still in flight.
    pub async fn expand(
        &self,
        nodes: &HashSet<NodeId>,
        oracle: &dyn NeighborOracle,
        limit: Option<usize>,
        known: HashSet<NodeId>,
    ) -> Result<Expansion, ExpansionError> {
        let permits = &self.permits;

        let mut lookups = stream::iter(nodes.iter().cloned())
            .map(|node: NodeId| async move {
                let _permit = permits.acquire().await.map_err(|_| ExpansionError {
                    source: OracleError::transient(&node, "lookup pool closed"),
                    node: node.clone(),
                })?;

                match oracle.fetch_neighbors(&node, limit).await {
                    Ok(mut neighbors) => {
                        if let Some(limit) = limit {
                            neighbors.truncate(limit);
                        }
                        Ok(neighbors)
                    }
                    Err(source) => Err(ExpansionError { node, source }),
                }
            })
            .buffer_unordered(self.concurrency);

        let mut fetched = Vec::with_capacity(nodes.len());
        while let Some(result) = lookups.next().await {
            match result {
                Ok(neighbors) => fetched.push(neighbors),
                Err(e) => {
                    tracing::warn!("Abandoning hop after failed lookup: {}", e);
                    return Err(e);
                }
            }
        }

        let expansion = Expansion::absorb(known, fetched);

        tracing::debug!(
            "Expanded {} nodes: {} discovered, {} known",
            nodes.len(),
            expansion.discovered.len(),
            expansion.known.len()
        );

        Ok(expansion)
    }
}
