//! In-memory sink for testing

use crate::error::{StorageError, StorageResult};
use crate::traits::OutcomeStore;
use async_trait::async_trait;
use costar_core::{PairOutcome, ResultSink, SinkError};
use std::sync::RwLock;

/// In-memory sink
///
/// Keeps every batch it receives; useful for testing and for callers that
/// only want the outcomes back.
#[derive(Default)]
pub struct MemorySink {
    outcomes: RwLock<Vec<PairOutcome>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultSink for MemorySink {
    async fn write_all(&self, outcomes: &[PairOutcome]) -> Result<(), SinkError> {
        let mut stored = self
            .outcomes
            .write()
            .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))?;
        stored.extend_from_slice(outcomes);
        Ok(())
    }
}

#[async_trait]
impl OutcomeStore for MemorySink {
    async fn load_all(&self) -> StorageResult<Vec<PairOutcome>> {
        let stored = self
            .outcomes
            .read()
            .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))?;
        Ok(stored.clone())
    }
}
