//! Argument builder: maps a conversion request to a deterministic engine
//! command line.
//!
//! The same job and format always produce the same argument vector.
//! Order matters: input, output, template options, format extras,
//! metadata, cover handling, `--verbose` last.

use std::path::Path;

use tracing::debug;

use super::error::ConverterError;
use super::types::{BookMetadata, EbookFormat};
use crate::templates::Template;

/// Maximum clamped title length, in characters.
pub const TITLE_MAX_CHARS: usize = 200;
/// Maximum clamped author length, in characters.
pub const AUTHOR_MAX_CHARS: usize = 100;

const SUPPRESS_COVER_FLAG: &str = "--no-default-epub-cover";

/// How the cover should be handled for this invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverDirective {
    /// A first-page cover was extracted; embed it.
    Extracted(std::path::PathBuf),
    /// The caller disabled covers; suppress the engine's generated one.
    Suppress,
    /// Extraction was requested but produced nothing, or the caller left
    /// the default behavior in place. The template decides.
    None,
}

/// Builds the full engine argument vector for one format conversion.
///
/// Fails fast with `MissingExtension` when either path lacks an
/// extension, since the engine infers formats from extensions and would
/// otherwise guess.
pub fn build_engine_args(
    input: &Path,
    output: &Path,
    format: EbookFormat,
    template: &Template,
    metadata: &BookMetadata,
    cover: &CoverDirective,
) -> Result<Vec<String>, ConverterError> {
    for path in [input, output] {
        if path.extension().is_none() {
            return Err(ConverterError::MissingExtension {
                path: path.to_path_buf(),
            });
        }
    }

    let mut args: Vec<String> = vec![
        input.to_string_lossy().into_owned(),
        output.to_string_lossy().into_owned(),
    ];

    for opt in template.settings_for(format) {
        args.push(opt.flag.clone());
        if !opt.is_switch() {
            args.push(opt.value.clone());
        }
    }

    if format == EbookFormat::Mobi {
        args.push("--mobi-file-type".to_string());
        args.push("both".to_string());
        args.push("--mobi-ignore-margins".to_string());
        args.push("--share-not-sync".to_string());
    }

    if let Some(title) = metadata.title.as_deref().filter(|t| !t.trim().is_empty()) {
        args.push("--title".to_string());
        args.push(clamp_metadata(title, TITLE_MAX_CHARS));
    }
    if let Some(author) = metadata.author.as_deref().filter(|a| !a.trim().is_empty()) {
        args.push("--authors".to_string());
        args.push(clamp_metadata(author, AUTHOR_MAX_CHARS));
    }

    match cover {
        CoverDirective::Extracted(path) => {
            // An explicit cover wins over any template-level suppression.
            args.retain(|a| a != SUPPRESS_COVER_FLAG);
            args.push("--cover".to_string());
            args.push(path.to_string_lossy().into_owned());
        }
        CoverDirective::Suppress => {
            if !args.iter().any(|a| a == SUPPRESS_COVER_FLAG) {
                args.push(SUPPRESS_COVER_FLAG.to_string());
            }
        }
        CoverDirective::None => {}
    }

    args.push("--verbose".to_string());

    debug!(
        format = format.extension(),
        template = %template.key,
        arg_count = args.len(),
        "built engine arguments"
    );

    Ok(args)
}

/// Clamps a metadata value: collapses runs of whitespace to single
/// spaces, truncates to `max_chars`, and trims trailing whitespace.
/// Applying the clamp twice is a no-op.
pub fn clamp_metadata(value: &str, max_chars: usize) -> String {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated: String = collapsed.chars().take(max_chars).collect();
    truncated.trim_end().to_string()
}
