//! Types for the template registry.

use serde::Serialize;

use crate::converter::EbookFormat;

/// Option keys the MOBI engine backend rejects outright. Chapter and TOC
/// semantics only exist for EPUB.
pub const MOBI_INCOMPATIBLE_FLAGS: [&str; 6] = [
    "--epub-version",
    "--epub-flatten",
    "--epub-toc-at-end",
    "--no-chapters",
    "--chapter",
    "--page-breaks-before",
];

/// A single engine option. An empty value means a bare switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineOption {
    pub flag: String,
    pub value: String,
}

impl EngineOption {
    pub fn new(flag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            flag: flag.into(),
            value: value.into(),
        }
    }

    /// Whether this is a value-less switch.
    pub fn is_switch(&self) -> bool {
        self.value.is_empty()
    }
}

/// A named, predefined presentation template. Immutable after startup;
/// the registry hands out references, never mutated copies.
#[derive(Debug, Clone, Serialize)]
pub struct Template {
    /// Lookup key (`novel`, `children`, ...).
    pub key: String,
    /// Human-readable display name.
    pub name: String,
    /// One-line description for template listings.
    pub description: String,
    /// Engine options in definition order. Order is significant:
    /// argument emission must reproduce it for deterministic commands.
    pub options: Vec<EngineOption>,
}

impl Template {
    /// Returns this template's option set adjusted for the target format.
    ///
    /// The template itself is never mutated; callers get a fresh copy.
    /// For MOBI, incompatible keys are dropped and the `ipad3` output
    /// profile is substituted with its Kindle equivalent.
    pub fn settings_for(&self, format: EbookFormat) -> Vec<EngineOption> {
        let mut options: Vec<EngineOption> = self.options.clone();

        if format == EbookFormat::Mobi {
            options.retain(|opt| !MOBI_INCOMPATIBLE_FLAGS.contains(&opt.flag.as_str()));
            for opt in &mut options {
                if opt.flag == "--output-profile" && opt.value == "ipad3" {
                    opt.value = "kindle_pw3".to_string();
                }
            }
        }

        options
    }
}

/// Summary entry for template listings exposed to the upload layer.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfo {
    pub key: String,
    pub name: String,
    pub description: String,
}

impl From<&Template> for TemplateInfo {
    fn from(t: &Template) -> Self {
        Self {
            key: t.key.clone(),
            name: t.name.clone(),
            description: t.description.clone(),
        }
    }
}
