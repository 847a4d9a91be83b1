//! Mock converter for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::converter::{
    ConversionJob, ConversionResult, Converter, ConverterError, OutputArtifact,
};
use crate::storage::StorageLayout;

/// A recorded conversion job for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedConversion {
    /// The job that was submitted.
    pub job: ConversionJob,
    /// Whether the conversion succeeded.
    pub success: bool,
}

/// Mock implementation of the Converter trait.
///
/// Provides controllable behavior for testing:
/// - Track conversion jobs for assertions
/// - Script per-job failures by original filename
/// - Materialize real output files so downstream packaging and retention
///   operate on an actual file tree
///
/// # Example
///
/// ```rust,ignore
/// use bindery_core::testing::MockConverter;
///
/// let converter = MockConverter::new(layout);
/// converter.fail_filename("corrupt.pdf").await;
///
/// let result = converter.convert(job).await;
///
/// let conversions = converter.recorded_conversions().await;
/// assert_eq!(conversions.len(), 1);
/// ```
#[derive(Debug)]
pub struct MockConverter {
    layout: StorageLayout,
    /// Recorded conversions.
    conversions: Arc<RwLock<Vec<RecordedConversion>>>,
    /// Original filenames whose jobs should fail.
    failing_filenames: Arc<RwLock<HashSet<String>>>,
    /// If set, the next validate() call fails with this error.
    next_validate_error: Arc<RwLock<Option<ConverterError>>>,
    /// Whether to write real output files for successful jobs.
    write_outputs: Arc<RwLock<bool>>,
}

impl MockConverter {
    /// Create a new mock converter writing outputs into the given layout.
    pub fn new(layout: StorageLayout) -> Self {
        Self {
            layout,
            conversions: Arc::new(RwLock::new(Vec::new())),
            failing_filenames: Arc::new(RwLock::new(HashSet::new())),
            next_validate_error: Arc::new(RwLock::new(None)),
            write_outputs: Arc::new(RwLock::new(true)),
        }
    }

    /// Get all recorded conversions.
    pub async fn recorded_conversions(&self) -> Vec<RecordedConversion> {
        self.conversions.read().await.clone()
    }

    /// Get the number of conversions performed.
    pub async fn conversion_count(&self) -> usize {
        self.conversions.read().await.len()
    }

    /// Script jobs with this original filename to fail.
    pub async fn fail_filename(&self, filename: impl Into<String>) {
        self.failing_filenames.write().await.insert(filename.into());
    }

    /// Configure the next validate() call to fail.
    pub async fn set_validate_error(&self, error: ConverterError) {
        *self.next_validate_error.write().await = Some(error);
    }

    /// Disable writing real output files.
    pub async fn set_write_outputs(&self, write: bool) {
        *self.write_outputs.write().await = write;
    }
}

#[async_trait]
impl Converter for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn convert(&self, job: ConversionJob) -> ConversionResult {
        let should_fail = self
            .failing_filenames
            .read()
            .await
            .contains(&job.original_filename);

        self.conversions.write().await.push(RecordedConversion {
            job: job.clone(),
            success: !should_fail,
        });

        // The input is consumed at the terminal state, like production.
        let _ = tokio::fs::remove_file(&job.input_path).await;

        if should_fail {
            return ConversionResult {
                job_id: job.job_id,
                success: false,
                outputs: Vec::new(),
                duration_ms: 0,
                error: Some("scripted failure".to_string()),
            };
        }

        let write_outputs = *self.write_outputs.read().await;
        let mut outputs = Vec::new();
        for &format in job.formats.formats() {
            let path = self.layout.output_path(&job.job_id, format);
            let payload = format!("{} {}", job.job_id, format.extension());
            if write_outputs {
                let _ = tokio::fs::write(&path, payload.as_bytes()).await;
            }
            outputs.push(OutputArtifact {
                format,
                path,
                size_bytes: payload.len() as u64,
            });
        }

        ConversionResult {
            job_id: job.job_id,
            success: true,
            outputs,
            duration_ms: 0,
            error: None,
        }
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        match self.next_validate_error.write().await.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
