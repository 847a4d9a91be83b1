//! Archive packager: bundles output artifacts into a single ZIP.
//!
//! ZIP construction is synchronous, so it runs on the blocking pool.
//! Members that vanished between conversion and packaging are skipped
//! with a warning rather than failing the whole archive; a member list
//! is a snapshot, not a lock.

use std::fs::File;
use std::io::{copy, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug, Error)]
pub enum ArchiveError {
    /// No member could be added, so no archive was produced.
    #[error("No files available to archive")]
    NoMembers,

    #[error("I/O error while packaging archive: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The blocking task was cancelled or panicked.
    #[error("Archive task failed: {0}")]
    Task(String),
}

/// Packs the given files into `<dest_dir>/<archive_id>.zip`.
///
/// Entry names are the members' file names, which embed job ids and are
/// therefore unique within a batch. Missing members are skipped. Returns
/// the archive path, or `NoMembers` when every member was missing.
pub async fn pack(
    files: Vec<PathBuf>,
    archive_id: &str,
    dest_dir: &Path,
) -> Result<PathBuf, ArchiveError> {
    let archive_path = dest_dir.join(format!("{}.zip", archive_id));
    let target = archive_path.clone();

    let added = tokio::task::spawn_blocking(move || write_archive(&target, &files))
        .await
        .map_err(|e| ArchiveError::Task(e.to_string()))??;

    if added == 0 {
        // Don't leave an empty archive behind.
        let _ = std::fs::remove_file(&archive_path);
        return Err(ArchiveError::NoMembers);
    }

    info!(archive = %archive_path.display(), members = added, "archive packaged");
    Ok(archive_path)
}

fn write_archive(archive_path: &Path, files: &[PathBuf]) -> Result<usize, ArchiveError> {
    let file = File::create(archive_path)?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9));

    let mut added = 0usize;
    for path in files {
        let mut source = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(member = %path.display(), error = %e, "skipping missing archive member");
                continue;
            }
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("member-{}", added));

        writer.start_file(name, options)?;
        let mut reader = BufReader::new(&mut source);
        copy(&mut reader, &mut writer)?;
        added += 1;
    }

    writer.finish()?;
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_archive_names(path: &Path) -> Vec<String> {
        let file = File::open(path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_pack_bundles_all_members() {
        let dir = tempfile::TempDir::new().unwrap();
        let a = dir.path().join("job-1.epub");
        let b = dir.path().join("job-1.mobi");
        std::fs::write(&a, b"epub bytes").unwrap();
        std::fs::write(&b, b"mobi bytes").unwrap();

        let archive = pack(vec![a, b], "job-1", dir.path()).await.unwrap();
        assert_eq!(archive, dir.path().join("job-1.zip"));

        let names = read_archive_names(&archive);
        assert_eq!(names, vec!["job-1.epub", "job-1.mobi"]);
    }

    #[tokio::test]
    async fn test_pack_skips_missing_members() {
        let dir = tempfile::TempDir::new().unwrap();
        let present = dir.path().join("job-2.epub");
        std::fs::write(&present, b"content").unwrap();
        let missing = dir.path().join("gone.epub");

        let archive = pack(vec![present, missing], "job-2", dir.path())
            .await
            .unwrap();
        assert_eq!(read_archive_names(&archive), vec!["job-2.epub"]);
    }

    #[tokio::test]
    async fn test_pack_with_no_survivors_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = pack(vec![dir.path().join("gone.epub")], "job-3", dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, ArchiveError::NoMembers));
        assert!(!dir.path().join("job-3.zip").exists());
    }

    #[tokio::test]
    async fn test_archive_members_decompress_intact() {
        let dir = tempfile::TempDir::new().unwrap();
        let member = dir.path().join("job-4.epub");
        let payload = b"payload that should survive compression".to_vec();
        std::fs::write(&member, &payload).unwrap();

        let archive = pack(vec![member], "job-4", dir.path()).await.unwrap();

        let file = File::open(&archive).unwrap();
        let mut zip = zip::ZipArchive::new(file).unwrap();
        let mut entry = zip.by_index(0).unwrap();
        let mut out = Vec::new();
        std::io::Read::read_to_end(&mut entry, &mut out).unwrap();
        assert_eq!(out, payload);
    }
}
