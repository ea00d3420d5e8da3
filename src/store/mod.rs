//! Ephemeral document store module.
//!
//! Holds uploaded documents per session, in memory only, and expires stale
//! sessions.

pub mod batch;
pub mod config;
pub mod manager;
pub mod model;

// Re-exports for convenience
pub use batch::{run_batch, BatchItemResult, BatchOperation, BatchStatus};
pub use config::StoreConfig;
pub use manager::{DocumentStore, StoreStats};
pub use model::{DocumentId, DocumentRecord, SessionId, SessionRecord};
