//! Retention engine: keeps the managed storage tree bounded.
//!
//! Every operation is idempotent and loss-tolerant. A file that is
//! already gone counts as cleaned; a file that cannot be inspected or
//! removed is logged and skipped, never fatal. Sweeps scan the managed
//! directories non-recursively, since the pipeline only ever writes
//! flat files into them.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::Utc;
use tracing::{debug, info, warn};

use super::types::{
    DirectoryUsage, ReclaimReport, RetentionConfig, StorageReport, SweepReport,
};
use crate::storage::StorageLayout;

pub struct RetentionEngine {
    layout: StorageLayout,
    config: RetentionConfig,
}

impl RetentionEngine {
    pub fn new(layout: StorageLayout, config: RetentionConfig) -> Self {
        Self { layout, config }
    }

    /// Removes files older than the configured age from every managed
    /// directory. The periodic sweep entry point.
    pub async fn sweep_aged(&self) -> SweepReport {
        self.sweep_older_than(Duration::from_secs(self.config.max_age_secs))
            .await
    }

    /// Removes files older than `max_age` from every managed directory.
    pub async fn sweep_older_than(&self, max_age: Duration) -> SweepReport {
        let cutoff = SystemTime::now().checked_sub(max_age);
        let mut report = SweepReport::default();
        for dir in self.layout.managed_dirs() {
            report.absorb(self.sweep_dir(&dir, |meta, _| older_than(meta, cutoff)).await);
        }
        if report.files_removed > 0 {
            info!(
                files = report.files_removed,
                bytes = report.bytes_reclaimed,
                max_age_secs = max_age.as_secs(),
                "aged sweep complete"
            );
        }
        report
    }

    /// Removes everything from the temp directory.
    pub async fn purge_temp(&self) -> SweepReport {
        let report = self.sweep_dir(&self.layout.temp_dir(), |_, _| true).await;
        debug!(files = report.files_removed, "temp purge complete");
        report
    }

    /// Removes every file belonging to one job, across all managed
    /// directories. Artifact names embed the job id, which is what makes
    /// this match safe.
    pub async fn purge_job(&self, job_id: &str) -> SweepReport {
        let mut report = SweepReport::default();
        for dir in self.layout.managed_dirs() {
            report.absorb(
                self.sweep_dir(&dir, |_, name| name.contains(job_id))
                    .await,
            );
        }
        info!(job_id, files = report.files_removed, "job purge complete");
        report
    }

    /// Total size of the managed tree, recursive.
    pub async fn total_size(&self) -> u64 {
        let mut total = 0u64;
        let mut stack: Vec<PathBuf> = self.layout.managed_dirs().to_vec();
        while let Some(dir) = stack.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(_) => continue,
            };
            while let Ok(Some(entry)) = entries.next_entry().await {
                match entry.metadata().await {
                    Ok(meta) if meta.is_dir() => stack.push(entry.path()),
                    Ok(meta) => total += meta.len(),
                    Err(e) => {
                        warn!(path = %entry.path().display(), error = %e, "skipping unreadable entry");
                    }
                }
            }
        }
        total
    }

    /// Two-tier reclaim: when total usage exceeds the threshold, purge
    /// temp first; if that alone is not enough, sweep with the tighter
    /// reclaim age. Under the threshold this is a no-op.
    pub async fn reclaim_if_over_threshold(&self) -> ReclaimReport {
        let threshold = self.config.threshold_bytes();
        let bytes_before = self.total_size().await;

        if bytes_before <= threshold {
            return ReclaimReport {
                triggered: false,
                bytes_before,
                bytes_after: bytes_before,
                temp: SweepReport::default(),
                aged: None,
            };
        }

        info!(
            bytes = bytes_before,
            threshold, "storage over threshold, reclaiming"
        );
        let temp = self.purge_temp().await;

        let after_temp = self.total_size().await;
        let aged = if after_temp > threshold {
            Some(
                self.sweep_older_than(Duration::from_secs(self.config.reclaim_age_secs))
                    .await,
            )
        } else {
            None
        };

        let bytes_after = self.total_size().await;
        info!(bytes_before, bytes_after, "reclaim complete");
        ReclaimReport {
            triggered: true,
            bytes_before,
            bytes_after,
            temp,
            aged,
        }
    }

    /// Point-in-time usage breakdown of the managed tree.
    pub async fn storage_report(&self) -> StorageReport {
        let mut directories = Vec::with_capacity(3);
        let mut total_bytes = 0u64;

        for (name, dir) in [
            ("input", self.layout.input_dir()),
            ("output", self.layout.output_dir()),
            ("temp", self.layout.temp_dir()),
        ] {
            let (files, bytes) = self.measure_dir(&dir).await;
            total_bytes += bytes;
            directories.push(DirectoryUsage {
                name: name.to_string(),
                path: dir,
                files,
                bytes,
            });
        }

        StorageReport {
            generated_at: Utc::now(),
            total_bytes,
            directories,
        }
    }

    async fn measure_dir(&self, dir: &Path) -> (usize, u64) {
        let mut files = 0usize;
        let mut bytes = 0u64;
        if let Ok(mut entries) = tokio::fs::read_dir(dir).await {
            while let Ok(Some(entry)) = entries.next_entry().await {
                if let Ok(meta) = entry.metadata().await {
                    if meta.is_file() {
                        files += 1;
                        bytes += meta.len();
                    }
                }
            }
        }
        (files, bytes)
    }

    /// Removes every regular file in `dir` matching the predicate.
    async fn sweep_dir<F>(&self, dir: &Path, matches: F) -> SweepReport
    where
        F: Fn(&std::fs::Metadata, &str) -> bool,
    {
        let mut report = SweepReport::default();
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "cannot scan directory");
                return report;
            }
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            let meta = match entry.metadata().await {
                Ok(meta) if meta.is_file() => meta,
                Ok(_) => continue,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            if !matches(&meta, &name) {
                continue;
            }
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    report.files_removed += 1;
                    report.bytes_reclaimed += meta.len();
                    debug!(path = %path.display(), "removed");
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    // Already gone; same terminal state.
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to remove file");
                }
            }
        }
        report
    }
}

fn older_than(meta: &std::fs::Metadata, cutoff: Option<SystemTime>) -> bool {
    match (meta.modified(), cutoff) {
        (Ok(modified), Some(cutoff)) => modified < cutoff,
        _ => false,
    }
}
