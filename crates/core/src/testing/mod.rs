//! Testing utilities and mock implementations for E2E tests.
//!
//! Provides a mock conversion backend that operates on a real storage
//! tree, so batch coordination, archiving, and retention can be tested
//! end to end without the external engine installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use bindery_core::testing::MockConverter;
//!
//! let converter = MockConverter::new(layout);
//! converter.fail_filename("corrupt.pdf").await;
//!
//! // Use in a BatchCoordinator...
//! ```

mod mock_converter;

pub use mock_converter::{MockConverter, RecordedConversion};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::converter::{ConversionJob, FormatSelection};
    use crate::storage::StorageLayout;

    /// Create a job for an input file materialized in the layout's input
    /// directory, with a deterministic id derived from the filename.
    pub async fn pdf_job(layout: &StorageLayout, filename: &str) -> ConversionJob {
        let input = layout.input_dir().join(filename);
        tokio::fs::write(&input, b"%PDF-1.4 fixture content")
            .await
            .unwrap();
        let mut job = ConversionJob::new(input, filename);
        job.job_id = format!("job-{}", filename.trim_end_matches(".pdf"));
        job
    }

    /// Same as [`pdf_job`] but requesting both output formats.
    pub async fn both_formats_job(layout: &StorageLayout, filename: &str) -> ConversionJob {
        let mut job = pdf_job(layout, filename).await;
        job.formats = FormatSelection::Both;
        job
    }
}
