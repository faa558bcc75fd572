//! Visit log: append, exit, query and export of gate visit records.

pub mod export;
pub mod kv;
pub mod query;
pub mod record;
pub mod store;

use thiserror::Error;

pub use export::{export_file_name, format_timestamp, write_csv, ExportRow, STILL_INSIDE};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use query::{HistoryQuery, LogSummary, StatusFilter};
pub use record::{NewVisit, VisitRecord, VisitStatus};
pub use store::{Clock, SystemClock, VisitLogStore, UNREADABLE_LOG_KEY, VISIT_LOG_KEY};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("serialization failure: {0}")]
    Serialize(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export write failed: {0}")]
    Io(String),
    #[error("export encoding failed: {0}")]
    Csv(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
