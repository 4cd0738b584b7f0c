//! ReDB sink

use crate::error::{StorageError, StorageResult};
use crate::traits::OutcomeStore;
use async_trait::async_trait;
use costar_core::{Pair, PairOutcome, ResultSink, SinkError};
use redb::{Database, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Mutex;

// Table definitions
const OUTCOMES: TableDefinition<&str, &[u8]> = TableDefinition::new("outcomes");

/// ReDB sink
///
/// Outcomes are keyed by pair, so writing a pair again replaces its
/// previous outcome.
pub struct RedbSink {
    db: Mutex<Database>,
}

impl RedbSink {
    /// Open or create a ReDB database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path).map_err(|e| StorageError::Database(e.to_string()))?;

        // Initialize tables
        {
            let write_txn = db
                .begin_write()
                .map_err(|e| StorageError::Database(e.to_string()))?;
            {
                let _ = write_txn.open_table(OUTCOMES);
            }
            write_txn
                .commit()
                .map_err(|e| StorageError::Database(e.to_string()))?;
        }

        Ok(Self { db: Mutex::new(db) })
    }

    fn make_key(pair: &Pair) -> String {
        format!("{}:{}", pair.left, pair.right)
    }

    fn store(&self, outcomes: &[PairOutcome]) -> StorageResult<()> {
        let db = self
            .db
            .lock()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        let write_txn = db
            .begin_write()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        {
            let mut table = write_txn.open_table(OUTCOMES)?;
            for outcome in outcomes {
                let key = Self::make_key(&outcome.pair());
                let value = serde_json::to_vec(outcome)?;
                table.insert(key.as_str(), value.as_slice())?;
            }
        }
        write_txn.commit()?;

        Ok(())
    }

    /// Outcome stored for a pair, if any
    pub fn get(&self, pair: &Pair) -> StorageResult<Option<PairOutcome>> {
        let key = Self::make_key(pair);

        let db = self
            .db
            .lock()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        let read_txn = db
            .begin_read()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        let table = read_txn.open_table(OUTCOMES)?;

        if let Some(value) = table.get(key.as_str())? {
            Ok(Some(serde_json::from_slice(value.value())?))
        } else {
            Ok(None)
        }
    }
}

#[async_trait]
impl ResultSink for RedbSink {
    async fn write_all(&self, outcomes: &[PairOutcome]) -> Result<(), SinkError> {
        self.store(outcomes)?;
        tracing::info!("Stored {} outcomes", outcomes.len());
        Ok(())
    }
}

#[async_trait]
impl OutcomeStore for RedbSink {
    /// Outcomes ordered by pair key
    async fn load_all(&self) -> StorageResult<Vec<PairOutcome>> {
        let db = self
            .db
            .lock()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        let read_txn = db
            .begin_read()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        let table = read_txn.open_table(OUTCOMES)?;

        let mut outcomes = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let outcome: PairOutcome = serde_json::from_slice(value.value())?;
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }
}
