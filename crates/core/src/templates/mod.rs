//! Template registry: named presentation option sets for the engine.
//!
//! Pure lookup, no side effects. `resolve` never fails; unknown keys fall
//! back to the built-in `default` template so a stale key from an old
//! client degrades gracefully instead of rejecting the job.

mod catalog;
mod types;

pub use catalog::{all, available, is_valid, resolve};
pub use types::{EngineOption, Template, TemplateInfo, MOBI_INCOMPATIBLE_FLAGS};
