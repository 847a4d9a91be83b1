//! Document conversion pipeline.
//!
//! A [`ConversionJob`] describes one uploaded document and its requested
//! outputs; a [`Converter`] backend drives it to a terminal
//! [`ConversionResult`]. The production backend shells out to the
//! Calibre engine, with first-page cover extraction as a best-effort
//! pre-step.

mod args;
mod calibre;
mod config;
mod cover;
mod error;
mod runner;
mod traits;
mod types;

pub use args::{build_engine_args, clamp_metadata, CoverDirective, AUTHOR_MAX_CHARS, TITLE_MAX_CHARS};
pub use calibre::CalibreConverter;
pub use config::ConverterConfig;
pub use cover::extract_first_page;
pub use error::ConverterError;
pub use runner::{run_command, CommandSpec, ProcessOutcome};
pub use traits::Converter;
pub use types::{
    generate_job_id, BookMetadata, ConversionJob, ConversionResult, EbookFormat, FormatSelection,
    OptimizeProfile, OutputArtifact,
};
