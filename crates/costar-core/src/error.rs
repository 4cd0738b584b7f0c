//! Error types for Costar Core
//!
//! Each layer wraps the failure of the layer below and adds the context it
//! owns: the oracle names the node, the expander keeps it, the search adds
//! the pair and hop. The driver is the only place a failure becomes data.

use crate::limits::ValidationError;
use crate::node::{NodeId, Pair};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using Costar's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for neighbor lookups
pub type OracleResult<T> = std::result::Result<T, OracleError>;

/// Failure of a single neighbor lookup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("Node not found: {0}")]
    NotFound(NodeId),

    #[error("Failed to extract neighbors of {node}: {reason}")]
    Parse { node: NodeId, reason: String },

    #[error("Transient I/O error while fetching {node}: {reason}")]
    TransientIo { node: NodeId, reason: String },
}

impl OracleError {
    pub fn parse(node: &NodeId, reason: impl Into<String>) -> Self {
        Self::Parse {
            node: node.clone(),
            reason: reason.into(),
        }
    }

    pub fn transient(node: &NodeId, reason: impl Into<String>) -> Self {
        Self::TransientIo {
            node: node.clone(),
            reason: reason.into(),
        }
    }

    /// Whether retrying the same lookup may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientIo { .. })
    }
}

/// A hop expansion aborted by the first failing lookup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Expansion failed at node {node}: {source}")]
pub struct ExpansionError {
    pub node: NodeId,
    #[source]
    pub source: OracleError,
}

impl ExpansionError {
    pub fn is_transient(&self) -> bool {
        self.source.is_transient()
    }
}

/// Failure of one pair's distance search
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Search {pair} failed at hop {hop}: {source}")]
    Expansion {
        pair: Pair,
        hop: u32,
        #[source]
        source: ExpansionError,
    },

    #[error("Search {pair} exceeded the frontier budget at hop {hop}: {size} nodes (max {limit})")]
    FrontierBudget {
        pair: Pair,
        hop: u32,
        size: usize,
        limit: usize,
    },
    #[error("Search {pair} has an invalid configuration: {source}")]
    InvalidConfig {
        pair: Pair,
        #[source]
        source: ValidationError,
    },
}

impl SearchError {
    pub fn pair(&self) -> &Pair {
        match self {
            Self::Expansion { pair, .. }
            | Self::FrontierBudget { pair, .. }
            | Self::InvalidConfig { pair, .. } => pair,
        }
    }

    pub fn is_transient(&self) -> bool {
        match self {
            Self::Expansion { source, .. } => source.is_transient(),
            Self::FrontierBudget { .. } | Self::InvalidConfig { .. } => false,
        }
    }
}

/// Recorded failure of a pair inside a batch
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("Pair {left} <-> {right} failed after {attempts} attempt(s): {message}")]
pub struct PairFailure {
    pub left: NodeId,
    pub right: NodeId,
    pub attempts: u32,
    pub message: String,
    #[serde(default)]
    pub transient: bool,
}

impl PairFailure {
    pub fn new(pair: &Pair, attempts: u32, message: impl Into<String>) -> Self {
        Self {
            left: pair.left.clone(),
            right: pair.right.clone(),
            attempts,
            message: message.into(),
            transient: false,
        }
    }

    pub fn from_search(attempts: u32, error: &SearchError) -> Self {
        Self {
            transient: error.is_transient(),
            ..Self::new(error.pair(), attempts, error.to_string())
        }
    }

    pub fn pair(&self) -> Pair {
        Pair::new(self.left.clone(), self.right.clone())
    }
}

/// Failure reported by a result sink
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Sink error: {0}")]
pub struct SinkError(pub String);

/// Costar error types
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Expansion(#[from] ExpansionError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_is_added_per_layer() {
        let pair = Pair::new("nm1", "nm2");
        let oracle = OracleError::transient(&NodeId::from("tt9"), "connection reset");
        let expansion = ExpansionError {
            node: NodeId::from("tt9"),
            source: oracle,
        };
        let search = SearchError::Expansion {
            pair: pair.clone(),
            hop: 2,
            source: expansion,
        };

        let message = search.to_string();
        assert!(message.contains("nm1 <-> nm2"));
        assert!(message.contains("tt9"));
        assert!(message.contains("connection reset"));
        assert!(search.is_transient());

        let failure = PairFailure::from_search(3, &search);
        assert_eq!(failure.pair(), pair);
        assert_eq!(failure.attempts, 3);
        assert!(failure.transient);
    }

    #[test]
    fn test_not_found_is_not_transient() {
        let error = OracleError::NotFound(NodeId::from("nm404"));
        assert!(!error.is_transient());
        assert_eq!(error.to_string(), "Node not found: nm404");
    }
}
