//! Batch coordinator: runs a set of jobs with per-item fault isolation.

use tracing::{info, warn};

use super::types::{BatchItemError, BatchItemSuccess, BatchResult};
use crate::archive;
use crate::converter::{generate_job_id, ConversionJob, Converter};
use crate::storage::StorageLayout;
use crate::validate::{validate_input_file, DEFAULT_MAX_INPUT_BYTES};

/// Runs conversion jobs sequentially and bundles the survivors.
///
/// One bad item never takes down its siblings: validation and conversion
/// failures become error entries and the batch moves on. When at least
/// one item succeeds, every successful output is packed into a single
/// `<batchId>.zip`, even for a batch of one.
pub struct BatchCoordinator<C: Converter> {
    converter: C,
    layout: StorageLayout,
    max_input_bytes: u64,
}

impl<C: Converter> BatchCoordinator<C> {
    pub fn new(converter: C, layout: StorageLayout) -> Self {
        Self {
            converter,
            layout,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }

    pub fn with_max_input_bytes(mut self, max_input_bytes: u64) -> Self {
        self.max_input_bytes = max_input_bytes;
        self
    }

    /// Runs the whole batch to completion.
    pub async fn run_batch(&self, jobs: Vec<ConversionJob>, batch_id: Option<String>) -> BatchResult {
        let batch_id = batch_id.unwrap_or_else(generate_job_id);
        info!(%batch_id, items = jobs.len(), "starting batch");

        let mut successes: Vec<BatchItemSuccess> = Vec::new();
        let mut failures: Vec<BatchItemError> = Vec::new();

        for job in jobs {
            if let Err(e) = validate_input_file(&job.input_path, self.max_input_bytes).await {
                warn!(
                    %batch_id,
                    job_id = %job.job_id,
                    filename = %job.original_filename,
                    error = %e,
                    "batch item rejected before conversion"
                );
                // The rejected upload is still ours to clean up.
                if let Err(remove_err) = tokio::fs::remove_file(&job.input_path).await {
                    if remove_err.kind() != std::io::ErrorKind::NotFound {
                        warn!(job_id = %job.job_id, error = %remove_err, "failed to remove rejected input");
                    }
                }
                failures.push(BatchItemError {
                    job_id: job.job_id,
                    original_filename: job.original_filename,
                    error: e.to_string(),
                });
                continue;
            }

            let original_filename = job.original_filename.clone();
            let result = self.converter.convert(job).await;

            if result.success {
                successes.push(BatchItemSuccess {
                    job_id: result.job_id,
                    original_filename,
                    outputs: result.outputs,
                });
            } else {
                failures.push(BatchItemError {
                    job_id: result.job_id,
                    original_filename,
                    error: result
                        .error
                        .unwrap_or_else(|| "conversion failed".to_string()),
                });
            }
        }

        let archive_path = if successes.is_empty() {
            None
        } else {
            let members: Vec<_> = successes
                .iter()
                .flat_map(|s| s.outputs.iter().map(|o| o.path.clone()))
                .collect();
            match archive::pack(members, &batch_id, &self.layout.output_dir()).await {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!(%batch_id, error = %e, "batch archive packaging failed");
                    None
                }
            }
        };

        let result = BatchResult {
            batch_id,
            successes,
            failures,
            archive_path,
        };
        let summary = result.summary();
        info!(
            batch_id = %result.batch_id,
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "batch complete"
        );
        result
    }
}
