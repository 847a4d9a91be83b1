//! Batch conversion with per-item fault isolation.

mod coordinator;
mod types;

pub use coordinator::BatchCoordinator;
pub use types::{BatchItemError, BatchItemSuccess, BatchResult, BatchSummary};
