//! Result sink trait definition

use crate::driver::PairOutcome;
use crate::error::SinkError;
use async_trait::async_trait;

/// Destination for the outcomes of a pairwise batch
///
/// All storage backends implement this trait.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Persist every outcome, successes and failures alike
    async fn write_all(&self, outcomes: &[PairOutcome]) -> Result<(), SinkError>;
}
