//! JSON file sink

use crate::csv::write_private;
use crate::error::StorageResult;
use crate::traits::OutcomeStore;
use async_trait::async_trait;
use costar_core::{PairOutcome, ResultSink, SinkError};
use std::path::{Path, PathBuf};

/// Writes outcomes as a pretty-printed JSON array
pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ResultSink for JsonSink {
    async fn write_all(&self, outcomes: &[PairOutcome]) -> Result<(), SinkError> {
        let content = serde_json::to_string_pretty(outcomes).map_err(crate::StorageError::from)?;
        write_private(&self.path, &content)?;
        tracing::info!("Wrote {} outcomes to {}", outcomes.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl OutcomeStore for JsonSink {
    async fn load_all(&self) -> StorageResult<Vec<PairOutcome>> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}
