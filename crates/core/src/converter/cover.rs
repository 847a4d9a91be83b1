//! First-page cover extraction.
//!
//! Rasterizes page one of the input document to a JPEG in the temp
//! directory. Strictly best-effort: any failure (missing rasterizer,
//! non-zero exit, output never materializing) downgrades the job to a
//! coverless conversion instead of failing it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use super::config::ConverterConfig;
use super::runner::{run_command, CommandSpec};
use crate::storage::StorageLayout;

/// Extracts the first page of `input` as a cover image.
///
/// Returns the path of the extracted JPEG, or `None` when extraction
/// failed for any reason. The rasterizer writes `<prefix>-01.jpg` and may
/// flush it after exiting, so a short grace wait precedes the existence
/// check.
pub async fn extract_first_page(
    config: &ConverterConfig,
    layout: &StorageLayout,
    input: &Path,
    job_id: &str,
) -> Option<PathBuf> {
    let prefix = layout.cover_prefix(job_id);
    let spec = CommandSpec::new(
        config.rasterizer_path.clone(),
        vec![
            "-f".to_string(),
            "1".to_string(),
            "-l".to_string(),
            "1".to_string(),
            "-jpeg".to_string(),
            "-r".to_string(),
            config.cover_dpi.to_string(),
            input.to_string_lossy().into_owned(),
            prefix.to_string_lossy().into_owned(),
        ],
    );

    match run_command(&spec, config.deadline()).await {
        Ok(outcome) if outcome.success() => {}
        Ok(outcome) => {
            warn!(
                job_id,
                exit_code = ?outcome.exit_code,
                timed_out = outcome.timed_out,
                "cover rasterization failed, continuing without cover"
            );
            return None;
        }
        Err(e) => {
            warn!(job_id, error = %e, "cover rasterizer unavailable, continuing without cover");
            return None;
        }
    }

    sleep(Duration::from_millis(config.cover_wait_ms)).await;

    let cover = layout.cover_path(job_id);
    if tokio::fs::try_exists(&cover).await.unwrap_or(false) {
        debug!(job_id, cover = %cover.display(), "extracted first-page cover");
        Some(cover)
    } else {
        warn!(
            job_id,
            expected = %cover.display(),
            "rasterizer exited cleanly but cover never materialized"
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn fake_rasterizer(dir: &Path, script: &str) -> PathBuf {
        let path = dir.join("pdftoppm");
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn test_extracts_cover_when_rasterizer_succeeds() {
        let temp = tempfile::TempDir::new().unwrap();
        let layout = StorageLayout::new(temp.path().join("storage"));
        layout.ensure().await.unwrap();

        // Takes the output prefix as its last argument, like the real tool.
        let rasterizer = fake_rasterizer(
            temp.path(),
            "#!/bin/sh\nfor last; do :; done\ntouch \"${last}-01.jpg\"\n",
        );
        let config = ConverterConfig::with_paths("ebook-convert".into(), rasterizer)
            .with_cover_wait_ms(10);

        let input = layout.input_dir().join("job-1.pdf");
        tokio::fs::write(&input, b"%PDF-1.4").await.unwrap();

        let cover = extract_first_page(&config, &layout, &input, "job-1").await;
        assert_eq!(cover, Some(layout.cover_path("job-1")));
        assert!(cover.unwrap().is_file());
    }

    #[tokio::test]
    async fn test_rasterizer_failure_yields_none() {
        let temp = tempfile::TempDir::new().unwrap();
        let layout = StorageLayout::new(temp.path().join("storage"));
        layout.ensure().await.unwrap();

        let rasterizer = fake_rasterizer(temp.path(), "#!/bin/sh\nexit 1\n");
        let config = ConverterConfig::with_paths("ebook-convert".into(), rasterizer)
            .with_cover_wait_ms(10);

        let input = layout.input_dir().join("job-2.pdf");
        tokio::fs::write(&input, b"%PDF-1.4").await.unwrap();

        assert!(extract_first_page(&config, &layout, &input, "job-2")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_missing_rasterizer_yields_none() {
        let temp = tempfile::TempDir::new().unwrap();
        let layout = StorageLayout::new(temp.path().join("storage"));
        layout.ensure().await.unwrap();

        let config = ConverterConfig::with_paths(
            "ebook-convert".into(),
            temp.path().join("no-such-rasterizer"),
        )
        .with_cover_wait_ms(10);

        let input = layout.input_dir().join("job-3.pdf");
        tokio::fs::write(&input, b"%PDF-1.4").await.unwrap();

        assert!(extract_first_page(&config, &layout, &input, "job-3")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_clean_exit_without_output_yields_none() {
        let temp = tempfile::TempDir::new().unwrap();
        let layout = StorageLayout::new(temp.path().join("storage"));
        layout.ensure().await.unwrap();

        let rasterizer = fake_rasterizer(temp.path(), "#!/bin/sh\nexit 0\n");
        let config = ConverterConfig::with_paths("ebook-convert".into(), rasterizer)
            .with_cover_wait_ms(10);

        let input = layout.input_dir().join("job-4.pdf");
        tokio::fs::write(&input, b"%PDF-1.4").await.unwrap();

        assert!(extract_first_page(&config, &layout, &input, "job-4")
            .await
            .is_none());
    }
}
