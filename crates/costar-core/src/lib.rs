//! Costar Core - Distance search over a lazily discovered co-star graph
//!
//! This crate provides the data model, the neighbor oracle and result sink
//! traits, and the bidirectional search engine that computes actor-to-actor
//! distances without ever materializing the graph.

pub mod config;
pub mod distance;
pub mod driver;
pub mod error;
pub mod frontier;
pub mod limits;
pub mod node;
pub mod oracle;
pub mod search;
pub mod sink;

pub use config::{DriverConfig, SearchConfig};
pub use distance::{Distance, DistanceResult};
pub use driver::{BatchReport, PairOutcome, PairwiseDistanceDriver, PersistOutcome};
pub use error::{
    Error, ExpansionError, OracleError, OracleResult, PairFailure, Result, SearchError, SinkError,
};
pub use frontier::{Expansion, FrontierExpander};
pub use node::{unordered_pairs, NodeId, Pair};
pub use oracle::{HopOracles, MemoryOracle, NeighborOracle};
pub use search::{BidirectionalSearchEngine, SearchOutcome, SearchStats};
pub use sink::ResultSink;
