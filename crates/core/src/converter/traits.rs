//! Converter trait, the seam between the pipeline and its backends.

use async_trait::async_trait;

use super::error::ConverterError;
use super::types::{ConversionJob, ConversionResult};

/// A document-to-ebook conversion backend.
///
/// Implementations own the full job lifecycle: cover extraction, one
/// engine run per requested format, artifact verification, and input
/// cleanup. `convert` never panics and never returns early with a
/// half-populated result; every job reaches exactly one terminal state.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Backend name, for logging.
    fn name(&self) -> &str;

    /// Runs one job to its terminal state. Failures are folded into the
    /// returned result rather than bubbled as errors.
    async fn convert(&self, job: ConversionJob) -> ConversionResult;

    /// Checks that the backend's external tooling is usable.
    async fn validate(&self) -> Result<(), ConverterError>;
}
