//! Bidirectional depth-bounded breadth-first search

use crate::config::SearchConfig;
use crate::distance::Distance;
use crate::error::SearchError;
use crate::frontier::FrontierExpander;
use crate::node::{NodeId, Pair};
use crate::oracle::HopOracles;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Each round advances both frontiers by one edge
const HOPS_PER_ROUND: u32 = 2;

/// Search statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Completed expansion rounds
    pub rounds: u32,
    /// Neighbor lookups issued
    pub lookups: usize,
    /// Final size of the source side's known set
    pub left_known: usize,
    /// Final size of the target side's known set
    pub right_known: usize,
}

/// Result of a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub pair: Pair,
    pub distance: Distance,
    pub stats: SearchStats,
}

/// Frontiers and known sets of one search, owned by the searching task
struct SearchState {
    left: HashSet<NodeId>,
    right: HashSet<NodeId>,
    known_left: HashSet<NodeId>,
    known_right: HashSet<NodeId>,
}

impl SearchState {
    fn new(source: &NodeId, target: &NodeId) -> Self {
        Self {
            left: HashSet::from([source.clone()]),
            right: HashSet::from([target.clone()]),
            known_left: HashSet::from([source.clone()]),
            known_right: HashSet::from([target.clone()]),
        }
    }

    /// A node sits on both frontiers and is known on the source side
    fn meets(&self) -> bool {
        self.left
            .iter()
            .any(|node| self.right.contains(node) && self.known_left.contains(node))
    }

    /// The source frontier reached the target frontier of the previous round
    fn meets_behind(&self, behind: &HashSet<NodeId>) -> bool {
        self.left.iter().any(|node| behind.contains(node))
    }

    /// One side ran out of undiscovered nodes
    fn exhausted(&self) -> bool {
        self.left.is_empty() || self.right.is_empty()
    }

    fn largest_frontier(&self) -> usize {
        self.left.len().max(self.right.len())
    }
}

/// Computes the distance between two nodes of a lazily fetched graph
///
/// The engine is cheap to clone and holds no per-search state; every call
/// to [`search`](Self::search) owns its frontiers and known sets and
/// drops them on return.
#[derive(Debug, Clone)]
pub struct BidirectionalSearchEngine {
    oracles: HopOracles,
    config: SearchConfig,
}

impl BidirectionalSearchEngine {
    pub fn new(oracles: HopOracles, config: SearchConfig) -> Self {
        Self { oracles, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Distance between `source` and `target`, in hops
    pub async fn distance(
        &self,
        source: &NodeId,
        target: &NodeId,
    ) -> Result<Distance, SearchError> {
        self.search(source, target)
            .await
            .map(|outcome| outcome.distance)
    }

    /// Run the search and report statistics along with the distance
    ///
    /// An out-of-range config fails with [`SearchError::InvalidConfig`]
    /// before any lookup is issued.
    pub async fn search(
        &self,
        source: &NodeId,
        target: &NodeId,
    ) -> Result<SearchOutcome, SearchError> {
        let pair = Pair::new(source.clone(), target.clone());
        self.config
            .validate()
            .map_err(|source| SearchError::InvalidConfig {
                pair: pair.clone(),
                source,
            })?;

        let max_depth = self.config.max_depth;
        let bipartite = self.oracles.is_bipartite();
        // Shortest distance past `hop` that one more round can reveal
        let step = if bipartite { HOPS_PER_ROUND } else { 1 };

        let expander = FrontierExpander::new(self.config.search_concurrency);
        let mut state = SearchState::new(source, target);
        let mut stats = SearchStats::default();
        let mut hop: u32 = 0;

        tracing::debug!(
            "Searching {}: max_depth={}, concurrency={}, bipartite={}",
            pair,
            max_depth,
            expander.concurrency(),
            bipartite
        );

        let distance = loop {
            // Past the bound only after a round run for an odd meeting
            if state.meets() && hop <= max_depth {
                tracing::info!("Found {} at distance {}", pair, hop);
                break Distance::Hops(hop);
            }

            if hop.saturating_add(step) > max_depth || state.exhausted() {
                tracing::info!("No path for {} within {} hops", pair, max_depth);
                break Distance::Infinite;
            }

            if let Some(limit) = self.config.frontier_limit {
                let size = state.largest_frontier();
                if size > limit {
                    return Err(SearchError::FrontierBudget {
                        pair,
                        hop,
                        size,
                        limit,
                    });
                }
            }

            let round = stats.rounds;
            let oracle = self.oracles.for_round(round);
            let limit = self.limit_for_round(round);

            let SearchState {
                left,
                right,
                known_left,
                known_right,
            } = state;

            let (from_left, from_right) = futures::future::try_join(
                expander.expand(&left, oracle, limit, known_left),
                expander.expand(&right, oracle, limit, known_right),
            )
            .await
            .map_err(|source| SearchError::Expansion {
                pair: pair.clone(),
                hop,
                source,
            })?;

            stats.rounds += 1;
            stats.lookups += left.len() + right.len();

            state = SearchState {
                left: from_left.discovered,
                right: from_right.discovered,
                known_left: from_left.known,
                known_right: from_right.known,
            };

            if !bipartite && state.meets_behind(&right) {
                tracing::info!("Found {} at distance {}", pair, hop + 1);
                break Distance::Hops(hop + 1);
            }
            hop = hop.saturating_add(HOPS_PER_ROUND);

            tracing::debug!(
                "{} hop {}: frontiers {}/{}, known {}/{}",
                pair,
                hop,
                state.left.len(),
                state.right.len(),
                state.known_left.len(),
                state.known_right.len()
            );
        };

        stats.left_known = state.known_left.len();
        stats.right_known = state.known_right.len();

        Ok(SearchOutcome {
            pair,
            distance,
            stats,
        })
    }

    fn limit_for_round(&self, round: u32) -> Option<usize> {
        if round % 2 == 0 {
            self.config.outbound_limit
        } else {
            self.config.inbound_limit
        }
    }
}
