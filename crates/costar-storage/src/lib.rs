//! Costar Storage - Result sinks for pairwise distance batches
//!
//! This crate provides the backends that persist batch outcomes: CSV and
//! JSON files, an in-memory store, and an embedded redb database.

#![allow(clippy::result_large_err)]

pub mod csv;
pub mod error;
pub mod json;
pub mod memory;
pub mod record;
pub mod traits;

#[cfg(feature = "redb")]
pub mod redb;

pub use csv::CsvSink;
pub use error::{StorageError, StorageResult};
pub use json::JsonSink;
pub use memory::MemorySink;
pub use record::DistanceRow;
pub use traits::OutcomeStore;

#[cfg(feature = "redb")]
pub use redb::RedbSink;
