//! Types for batch coordination.

use serde::Serialize;
use std::path::PathBuf;

use crate::converter::OutputArtifact;

/// A successfully converted batch item.
#[derive(Debug, Clone, Serialize)]
pub struct BatchItemSuccess {
    pub job_id: String,
    pub original_filename: String,
    pub outputs: Vec<OutputArtifact>,
}

/// A failed batch item. Carries the original filename so the caller can
/// tell the user which upload failed, not just which internal id.
#[derive(Debug, Clone, Serialize)]
pub struct BatchItemError {
    pub job_id: String,
    pub original_filename: String,
    pub error: String,
}

/// Aggregate counts for a completed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Terminal result of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub batch_id: String,
    pub successes: Vec<BatchItemSuccess>,
    pub failures: Vec<BatchItemError>,
    /// Archive bundling every successful output. Present whenever at
    /// least one item succeeded and packaging itself did not fail.
    pub archive_path: Option<PathBuf>,
}

impl BatchResult {
    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            total: self.successes.len() + self.failures.len(),
            succeeded: self.successes.len(),
            failed: self.failures.len(),
        }
    }
}
