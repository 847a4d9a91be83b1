//! Storage retention: aged sweeps, job purges, threshold reclaim.

mod engine;
mod types;

pub use engine::RetentionEngine;
pub use types::{
    DirectoryUsage, ReclaimReport, RetentionConfig, StorageReport, SweepReport,
};
