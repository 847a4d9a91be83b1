//! Types for the retention engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Retention policy knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Age after which the periodic sweep removes files.
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,

    /// Tighter age used by the threshold reclaim's second tier.
    #[serde(default = "default_reclaim_age_secs")]
    pub reclaim_age_secs: u64,

    /// Total managed-tree size above which reclaim kicks in, in MB.
    #[serde(default = "default_threshold_mb")]
    pub threshold_mb: u64,
}

fn default_max_age_secs() -> u64 {
    86_400 // 24 hours
}

fn default_reclaim_age_secs() -> u64 {
    43_200 // 12 hours
}

fn default_threshold_mb() -> u64 {
    500
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            max_age_secs: default_max_age_secs(),
            reclaim_age_secs: default_reclaim_age_secs(),
            threshold_mb: default_threshold_mb(),
        }
    }
}

impl RetentionConfig {
    pub fn threshold_bytes(&self) -> u64 {
        self.threshold_mb * 1024 * 1024
    }
}

/// What one sweep removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub files_removed: usize,
    pub bytes_reclaimed: u64,
}

impl SweepReport {
    pub fn absorb(&mut self, other: SweepReport) {
        self.files_removed += other.files_removed;
        self.bytes_reclaimed += other.bytes_reclaimed;
    }
}

/// Outcome of a threshold-driven reclaim pass.
#[derive(Debug, Clone, Serialize)]
pub struct ReclaimReport {
    /// Whether the threshold was exceeded and anything ran at all.
    pub triggered: bool,
    pub bytes_before: u64,
    pub bytes_after: u64,
    /// Temp purge, first tier. Zeroed when not triggered.
    pub temp: SweepReport,
    /// Aged sweep, second tier. Runs only when the temp purge alone did
    /// not bring usage back under the threshold.
    pub aged: Option<SweepReport>,
}

/// Usage of one managed directory.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryUsage {
    pub name: String,
    pub path: PathBuf,
    pub files: usize,
    pub bytes: u64,
}

/// Point-in-time view of the managed storage tree.
#[derive(Debug, Clone, Serialize)]
pub struct StorageReport {
    pub generated_at: DateTime<Utc>,
    pub total_bytes: u64,
    pub directories: Vec<DirectoryUsage>,
}
