//! Neighbor oracle trait and the in-memory implementation

use crate::error::{OracleError, OracleResult};
use crate::node::NodeId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Source of one-hop neighbors for a node
///
/// Lookups are cancelled by dropping the returned future. Implementations
/// must not leave detached work running once their future is dropped.
#[async_trait]
pub trait NeighborOracle: Send + Sync {
    /// Neighbors of `node` in source order, at most `limit` of them
    async fn fetch_neighbors(&self, node: &NodeId, limit: Option<usize>)
        -> OracleResult<Vec<NodeId>>;
}

/// The oracles a search expands its frontiers with
///
/// Built with [`new`](Self::new), the graph is bipartite: both search
/// frontiers start on the same side (actors), so every round expands both
/// of them in the same direction, outbound on even rounds (actor to movies)
/// and inbound on odd rounds (movie to actors). Distances are then always
/// even.
///
/// Built with [`symmetric`](Self::symmetric), one oracle serves every round
/// and the graph may have odd cycles, so odd distances are searched too.
#[derive(Clone)]
pub struct HopOracles {
    pub outbound: Arc<dyn NeighborOracle>,
    pub inbound: Arc<dyn NeighborOracle>,
    bipartite: bool,
}

impl HopOracles {
    pub fn new(outbound: Arc<dyn NeighborOracle>, inbound: Arc<dyn NeighborOracle>) -> Self {
        Self {
            outbound,
            inbound,
            bipartite: true,
        }
    }

    /// Use one oracle for both directions of an arbitrary undirected graph
    pub fn symmetric(oracle: Arc<dyn NeighborOracle>) -> Self {
        Self {
            outbound: oracle.clone(),
            inbound: oracle,
            bipartite: false,
        }
    }

    /// Whether both search ends sit on the same side of a bipartite graph
    pub fn is_bipartite(&self) -> bool {
        self.bipartite
    }

    /// Oracle used on the given zero-based round
    pub fn for_round(&self, round: u32) -> &dyn NeighborOracle {
        if round % 2 == 0 {
            self.outbound.as_ref()
        } else {
            self.inbound.as_ref()
        }
    }
}

impl std::fmt::Debug for HopOracles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HopOracles")
            .field("bipartite", &self.bipartite)
            .finish_non_exhaustive()
    }
}

/// Adjacency list as stored in graph files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Adjacency(pub HashMap<NodeId, Vec<NodeId>>);

/// Oracle backed by an in-memory adjacency list
///
/// Useful for testing and for offline runs against a saved graph.
#[derive(Debug, Default)]
pub struct MemoryOracle {
    adjacency: HashMap<NodeId, Vec<NodeId>>,
    calls: AtomicUsize,
}

impl MemoryOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_adjacency(adjacency: Adjacency) -> Self {
        Self {
            adjacency: adjacency.0,
            calls: AtomicUsize::new(0),
        }
    }

    /// Parse a JSON object mapping each node to its neighbor list
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let adjacency: Adjacency = serde_json::from_str(json)?;
        Ok(Self::from_adjacency(adjacency))
    }

    /// Add an undirected edge, keeping insertion order of neighbors
    pub fn with_edge(mut self, a: impl Into<NodeId>, b: impl Into<NodeId>) -> Self {
        let (a, b) = (a.into(), b.into());
        Self::push_unique(self.adjacency.entry(a.clone()).or_default(), b.clone());
        Self::push_unique(self.adjacency.entry(b).or_default(), a);
        self
    }

    /// Register a node with no neighbors
    pub fn with_node(mut self, node: impl Into<NodeId>) -> Self {
        self.adjacency.entry(node.into()).or_default();
        self
    }

    /// Number of lookups served so far, including failed ones
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    fn push_unique(neighbors: &mut Vec<NodeId>, node: NodeId) {
        if !neighbors.contains(&node) {
            neighbors.push(node);
        }
    }
}

#[async_trait]
impl NeighborOracle for MemoryOracle {
    async fn fetch_neighbors(
        &self,
        node: &NodeId,
        limit: Option<usize>,
    ) -> OracleResult<Vec<NodeId>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let neighbors = self
            .adjacency
            .get(node)
            .ok_or_else(|| OracleError::NotFound(node.clone()))?;

        let take = limit.unwrap_or(neighbors.len());
        Ok(neighbors.iter().take(take).cloned().collect())
    }
}
