//! Core document-to-ebook conversion service.
//!
//! Converts uploaded PDF documents to EPUB and MOBI by driving the
//! Calibre conversion engine as an external process, with presentation
//! templates, first-page cover extraction, batch coordination, ZIP
//! packaging of results, and retention of the managed storage tree.

pub mod archive;
pub mod batch;
pub mod config;
pub mod converter;
pub mod retention;
pub mod storage;
pub mod templates;
pub mod testing;
pub mod validate;

pub use batch::{BatchCoordinator, BatchResult};
pub use config::{load_config, load_config_from_str, Config, ConfigError};
pub use converter::{
    CalibreConverter, ConversionJob, ConversionResult, Converter, ConverterConfig, ConverterError,
    EbookFormat, FormatSelection,
};
pub use retention::{RetentionConfig, RetentionEngine};
pub use storage::StorageLayout;
