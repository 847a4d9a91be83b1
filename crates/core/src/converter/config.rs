//! Configuration for the converter module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the engine-backed converter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Path to the conversion engine binary.
    #[serde(default = "default_engine_path")]
    pub engine_path: PathBuf,

    /// Path to the first-page rasterizer binary.
    #[serde(default = "default_rasterizer_path")]
    pub rasterizer_path: PathBuf,

    /// Hard wall-clock deadline for a single external process, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Rasterization resolution for cover extraction.
    #[serde(default = "default_cover_dpi")]
    pub cover_dpi: u32,

    /// How long to wait for the rasterizer's output to materialize after
    /// the process exits; the tool may flush asynchronously.
    #[serde(default = "default_cover_wait_ms")]
    pub cover_wait_ms: u64,
}

fn default_engine_path() -> PathBuf {
    PathBuf::from("ebook-convert")
}

fn default_rasterizer_path() -> PathBuf {
    PathBuf::from("pdftoppm")
}

fn default_timeout() -> u64 {
    600 // 10 minutes
}

fn default_cover_dpi() -> u32 {
    300
}

fn default_cover_wait_ms() -> u64 {
    1000
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            engine_path: default_engine_path(),
            rasterizer_path: default_rasterizer_path(),
            timeout_secs: default_timeout(),
            cover_dpi: default_cover_dpi(),
            cover_wait_ms: default_cover_wait_ms(),
        }
    }
}

impl ConverterConfig {
    /// Creates a config with custom engine/rasterizer paths.
    pub fn with_paths(engine_path: PathBuf, rasterizer_path: PathBuf) -> Self {
        Self {
            engine_path,
            rasterizer_path,
            ..Default::default()
        }
    }

    /// Sets the process deadline in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Sets the post-exit cover wait.
    pub fn with_cover_wait_ms(mut self, cover_wait_ms: u64) -> Self {
        self.cover_wait_ms = cover_wait_ms;
        self
    }

    /// The process deadline as a `Duration`.
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
