//! Input validation: PDF acceptance checks and filename sanitization.
//!
//! Validation runs before any process is spawned, so a rejected input
//! costs nothing but a stat and an eight-byte read.

use std::path::Path;

use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

use crate::converter::ConverterError;

/// Default maximum accepted input size, 100 MB.
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 100 * 1024 * 1024;

/// Maximum sanitized filename length, in characters.
const FILENAME_MAX_CHARS: usize = 150;

const PDF_MAGIC: &[u8; 5] = b"%PDF-";

/// Validates a materialized input file for conversion.
///
/// Checks, in order: the file exists, is non-empty, is within the size
/// cap, and starts with the PDF magic bytes. Each rejection names its
/// reason; none of them spawns a process.
pub async fn validate_input_file(path: &Path, max_bytes: u64) -> Result<(), ConverterError> {
    let meta = match tokio::fs::metadata(path).await {
        Ok(meta) => meta,
        Err(_) => {
            return Err(ConverterError::validation(format!(
                "file does not exist: {}",
                path.display()
            )));
        }
    };

    if meta.len() == 0 {
        return Err(ConverterError::validation("file is empty"));
    }
    if meta.len() > max_bytes {
        return Err(ConverterError::validation(format!(
            "file too large: {} bytes exceeds cap of {}",
            meta.len(),
            max_bytes
        )));
    }

    let mut header = [0u8; 8];
    let mut file = tokio::fs::File::open(path).await?;
    let read = file.read(&mut header).await?;
    if read < PDF_MAGIC.len() || &header[..PDF_MAGIC.len()] != PDF_MAGIC {
        warn!(path = %path.display(), "input rejected: not a PDF signature");
        return Err(ConverterError::validation("not a valid PDF file"));
    }

    // Version digits follow the signature. Unknown versions are accepted;
    // the engine is the authority on what it can parse.
    if read == 8 {
        let version = String::from_utf8_lossy(&header[5..8]);
        debug!(path = %path.display(), size = meta.len(), %version, "input accepted");
    }

    Ok(())
}

/// Sanitizes an upload filename into a form safe for the engine.
///
/// Folds common diacritics to ASCII, replaces everything outside
/// `[a-zA-Z0-9._-]` with underscores, collapses runs, strips leading and
/// trailing separators, caps the length, and guarantees a `.pdf`
/// extension. Never returns an empty name.
pub fn sanitize_filename(filename: &str) -> String {
    let folded: String = filename.chars().flat_map(fold_char).collect();

    let mut out = String::with_capacity(folded.len());
    for c in folded.chars() {
        if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
            out.push(c);
        } else {
            out.push('_');
        }
    }

    let out = collapse_runs(&out, '_');
    let out = collapse_runs(&out, '.');
    let out = out.trim_matches(|c| c == '.' || c == '_' || c == '-');

    let mut name = if out.is_empty() {
        "unnamed_file".to_string()
    } else {
        out.to_string()
    };

    if name.chars().count() > FILENAME_MAX_CHARS {
        let ext = Path::new(&name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let stem_budget = FILENAME_MAX_CHARS.saturating_sub(ext.chars().count());
        let stem: String = Path::new(&name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
            .chars()
            .take(stem_budget)
            .collect();
        name = format!("{}{}", stem, ext);
    }

    if Path::new(&name).extension().is_none() {
        name.push_str(".pdf");
    }

    name
}

fn fold_char(c: char) -> impl Iterator<Item = char> {
    let folded: &str = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ă' => "a",
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ă' => "A",
        'æ' => "ae",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'È' | 'É' | 'Ê' | 'Ë' => "E",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'Ì' | 'Í' | 'Î' | 'Ï' => "I",
        'ð' => "d",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "O",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'Ù' | 'Ú' | 'Û' | 'Ü' => "U",
        'ý' | 'ÿ' => "y",
        'þ' => "th",
        'ș' => "s",
        'Ș' => "S",
        'ț' => "t",
        'Ț' => "T",
        _ => return Either::Keep(std::iter::once(c)),
    };
    Either::Folded(folded.chars())
}

enum Either<A, B> {
    Keep(A),
    Folded(B),
}

impl<A: Iterator<Item = char>, B: Iterator<Item = char>> Iterator for Either<A, B> {
    type Item = char;
    fn next(&mut self) -> Option<char> {
        match self {
            Either::Keep(a) => a.next(),
            Either::Folded(b) => b.next(),
        }
    }
}

fn collapse_runs(s: &str, target: char) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev = None;
    for c in s.chars() {
        if c == target && prev == Some(target) {
            continue;
        }
        out.push(c);
        prev = Some(c);
    }
    out
}
