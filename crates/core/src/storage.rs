//! Storage layout for the managed file tree.
//!
//! All pipeline artifacts live under a single root with three
//! subdirectories: `input/` for uploaded sources, `output/` for converted
//! books and archives, `temp/` for extracted covers and other scratch
//! files. Every artifact name embeds the owning job id, which is what
//! makes job-scoped purging and concurrent jobs safe without locking.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::converter::EbookFormat;

/// Paths of the managed storage tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageLayout {
    root: PathBuf,
}

impl StorageLayout {
    /// Creates a layout rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for uploaded input files.
    pub fn input_dir(&self) -> PathBuf {
        self.root.join("input")
    }

    /// Directory for converted outputs and archives.
    pub fn output_dir(&self) -> PathBuf {
        self.root.join("output")
    }

    /// Directory for scratch files (extracted covers).
    pub fn temp_dir(&self) -> PathBuf {
        self.root.join("temp")
    }

    /// All managed directories, in scan order.
    pub fn managed_dirs(&self) -> [PathBuf; 3] {
        [self.input_dir(), self.output_dir(), self.temp_dir()]
    }

    /// Deterministic output path for a job/format pair: `output/<jobId>.<ext>`.
    pub fn output_path(&self, job_id: &str, format: EbookFormat) -> PathBuf {
        self.output_dir()
            .join(format!("{}.{}", job_id, format.extension()))
    }

    /// Prefix handed to the rasterizer; the tool appends `-01.jpg` itself.
    pub fn cover_prefix(&self, job_id: &str) -> PathBuf {
        self.temp_dir().join(format!("{}_cover", job_id))
    }

    /// Where the extracted first-page cover materializes.
    pub fn cover_path(&self, job_id: &str) -> PathBuf {
        self.temp_dir().join(format!("{}_cover-01.jpg", job_id))
    }

    /// Archive path for a job or batch id: `output/<id>.zip`.
    pub fn archive_path(&self, id: &str) -> PathBuf {
        self.output_dir().join(format!("{}.zip", id))
    }

    /// Creates the full directory tree if missing.
    pub async fn ensure(&self) -> std::io::Result<()> {
        for dir in self.managed_dirs() {
            tokio::fs::create_dir_all(&dir).await?;
        }
        Ok(())
    }
}
