//! Types for the converter module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Target ebook container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EbookFormat {
    Epub,
    Mobi,
}

impl EbookFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Epub => "epub",
            Self::Mobi => "mobi",
        }
    }
}

/// Which output formats a job requests. `Both` converts EPUB first,
/// then MOBI; the whole job is all-or-nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatSelection {
    Epub,
    Mobi,
    Both,
}

impl FormatSelection {
    /// The concrete formats to convert, in request order.
    pub fn formats(&self) -> &'static [EbookFormat] {
        match self {
            Self::Epub => &[EbookFormat::Epub],
            Self::Mobi => &[EbookFormat::Mobi],
            Self::Both => &[EbookFormat::Epub, EbookFormat::Mobi],
        }
    }
}

impl Default for FormatSelection {
    fn default() -> Self {
        Self::Epub
    }
}

/// Device class the caller is optimizing for. Carried on the job for the
/// upload layer; the engine's output profile always comes from the
/// template, never from this hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizeProfile {
    Kindle,
    Ipad,
    Generic,
}

impl Default for OptimizeProfile {
    fn default() -> Self {
        Self::Generic
    }
}

/// Metadata overrides embedded into the output. Values are clamped at the
/// argument-builder boundary (title 200 chars, author 100).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// One document-to-format conversion request.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    /// Globally unique job id; every artifact name embeds it.
    pub job_id: String,
    /// Materialized input file, owned by this job until terminal state.
    pub input_path: PathBuf,
    /// Requested output formats.
    pub formats: FormatSelection,
    /// Template key; unknown keys fall back to `default`.
    pub template: String,
    /// Title/author overrides.
    pub metadata: BookMetadata,
    /// Device optimization hint.
    pub optimize: OptimizeProfile,
    /// Whether to rasterize page one as the cover.
    pub extract_cover: bool,
    /// Whether the upload layer wants the original bundled alongside
    /// the outputs. Not consumed by the conversion pipeline itself.
    pub include_original: bool,
    /// Original upload filename, kept for error reporting.
    pub original_filename: String,
}

impl ConversionJob {
    /// Creates a job with a fresh id and default options.
    pub fn new(input_path: impl Into<PathBuf>, original_filename: impl Into<String>) -> Self {
        Self {
            job_id: generate_job_id(),
            input_path: input_path.into(),
            formats: FormatSelection::default(),
            template: "default".to_string(),
            metadata: BookMetadata::default(),
            optimize: OptimizeProfile::default(),
            extract_cover: true,
            include_original: false,
            original_filename: original_filename.into(),
        }
    }
}

/// Generates a globally unique job id.
pub fn generate_job_id() -> String {
    Uuid::new_v4().to_string()
}

/// A produced output file, tagged with its format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputArtifact {
    pub format: EbookFormat,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Terminal result of a conversion job. Immutable once produced.
///
/// On success the output count equals the requested-format count; on
/// failure it is zero and `error` carries the human-readable cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    pub job_id: String,
    pub success: bool,
    /// Format-tagged outputs, in request order.
    pub outputs: Vec<OutputArtifact>,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
