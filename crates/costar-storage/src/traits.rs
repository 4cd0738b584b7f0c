//! Storage trait definitions

use crate::error::StorageResult;
use async_trait::async_trait;
use costar_core::{PairOutcome, ResultSink};

/// A sink whose outcomes can be read back
#[async_trait]
pub trait OutcomeStore: ResultSink {
    /// Load every stored outcome
    async fn load_all(&self) -> StorageResult<Vec<PairOutcome>>;
}
