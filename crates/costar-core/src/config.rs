//! Search and batch configuration

use crate::limits::{self, ValidationError, DEFAULT_MAX_DEPTH};
use serde::{Deserialize, Serialize};

/// Configuration of a single bidirectional search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Depth bound in hops; pairs farther apart are reported as infinite
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Cap on neighbors taken per node on outbound hops (movies of an actor)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outbound_limit: Option<usize>,

    /// Cap on neighbors taken per node on inbound hops (actors of a movie)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inbound_limit: Option<usize>,

    /// Maximum in-flight neighbor lookups for one search
    #[serde(default = "default_search_concurrency")]
    pub search_concurrency: usize,

    /// Abort the search when a frontier grows past this many nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontier_limit: Option<usize>,
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_search_concurrency() -> usize {
    4
}

fn default_worker_budget() -> usize {
    5
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            outbound_limit: None,
            inbound_limit: None,
            search_concurrency: default_search_concurrency(),
            frontier_limit: None,
        }
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the depth bound
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Cap neighbors per node on outbound hops
    pub fn with_outbound_limit(mut self, limit: Option<usize>) -> Self {
        self.outbound_limit = limit;
        self
    }

    /// Cap neighbors per node on inbound hops
    pub fn with_inbound_limit(mut self, limit: Option<usize>) -> Self {
        self.inbound_limit = limit;
        self
    }

    /// Set the per-search lookup concurrency
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.search_concurrency = concurrency;
        self
    }

    /// Set the frontier size budget
    pub fn with_frontier_limit(mut self, limit: Option<usize>) -> Self {
        self.frontier_limit = limit;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        limits::validate_depth(self.max_depth)?;
        limits::validate_concurrency(self.search_concurrency)?;
        limits::validate_neighbor_limit(self.outbound_limit)?;
        limits::validate_neighbor_limit(self.inbound_limit)?;
        if self.frontier_limit == Some(0) {
            return Err(ValidationError::ZeroFrontierLimit);
        }
        Ok(())
    }
}

/// Configuration of a pairwise batch
///
/// The worker budget and the per-search concurrency compose: a batch keeps
/// at most `worker_budget * search.search_concurrency` lookups in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Number of pair searches running at once
    #[serde(default = "default_worker_budget")]
    pub worker_budget: usize,

    /// Extra attempts for pairs that fail with a transient error
    #[serde(default)]
    pub pair_retries: u32,

    #[serde(default)]
    pub search: SearchConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            worker_budget: default_worker_budget(),
            pair_retries: 0,
            search: SearchConfig::default(),
        }
    }
}

impl DriverConfig {
    pub fn new(search: SearchConfig) -> Self {
        Self {
            search,
            ..Default::default()
        }
    }

    pub fn with_worker_budget(mut self, workers: usize) -> Self {
        self.worker_budget = workers;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.pair_retries = retries;
        self
    }

    /// Upper bound on simultaneous neighbor lookups across the batch
    pub fn max_in_flight(&self) -> usize {
        self.worker_budget
            .saturating_mul(self.search.search_concurrency)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        limits::validate_workers(self.worker_budget)?;
        limits::validate_retries(self.pair_retries)?;
        self.search.validate()
    }
}
