//! Batch lifecycle integration tests.
//!
//! These tests verify the batch coordinator with the mock converter:
//! - Per-item fault isolation (one bad upload never fails its siblings)
//! - Archive packaging of successful outputs, including a batch of one
//! - Retention interplay: job purges and sweeps against batch artifacts

use std::time::Duration;

use tempfile::TempDir;

use bindery_core::{
    batch::BatchCoordinator,
    retention::{RetentionConfig, RetentionEngine},
    storage::StorageLayout,
    testing::{fixtures, MockConverter},
    EbookFormat,
};

#[tokio::test]
async fn test_batch_runs_every_item() {
    let temp_dir = TempDir::new().unwrap();
    let layout = StorageLayout::new(temp_dir.path().join("storage"));
    layout.ensure().await.unwrap();

    let converter = MockConverter::new(layout.clone());
    let coordinator = BatchCoordinator::new(converter, layout.clone());

    let jobs = vec![
        fixtures::pdf_job(&layout, "one.pdf").await,
        fixtures::pdf_job(&layout, "two.pdf").await,
        fixtures::pdf_job(&layout, "three.pdf").await,
    ];
    let result = coordinator.run_batch(jobs, Some("batch-all".to_string())).await;

    let summary = result.summary();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.failed, 0);
    assert_eq!(result.batch_id, "batch-all");
}

#[tokio::test]
async fn test_invalid_item_is_isolated() {
    let temp_dir = TempDir::new().unwrap();
    let layout = StorageLayout::new(temp_dir.path().join("storage"));
    layout.ensure().await.unwrap();

    let converter = MockConverter::new(layout.clone());
    let coordinator = BatchCoordinator::new(converter, layout.clone());

    let good = fixtures::pdf_job(&layout, "good.pdf").await;
    // Not a PDF: wrong magic bytes.
    let bad_input = layout.input_dir().join("fake.pdf");
    tokio::fs::write(&bad_input, b"<html>not a pdf</html>")
        .await
        .unwrap();
    let mut bad = fixtures::pdf_job(&layout, "placeholder.pdf").await;
    tokio::fs::remove_file(&bad.input_path).await.unwrap();
    bad.input_path = bad_input.clone();
    bad.original_filename = "fake.pdf".to_string();

    let result = coordinator
        .run_batch(vec![good, bad], Some("batch-mixed".to_string()))
        .await;

    assert_eq!(result.successes.len(), 1);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].original_filename, "fake.pdf");
    assert!(result.failures[0].error.contains("PDF"));
    // The rejected input was cleaned up without touching the sibling.
    assert!(!bad_input.exists());
    assert!(result.archive_path.is_some());
}

#[tokio::test]
async fn test_scripted_conversion_failure_is_isolated() {
    let temp_dir = TempDir::new().unwrap();
    let layout = StorageLayout::new(temp_dir.path().join("storage"));
    layout.ensure().await.unwrap();

    let converter = MockConverter::new(layout.clone());
    converter.fail_filename("doomed.pdf").await;
    let coordinator = BatchCoordinator::new(converter, layout.clone());

    let jobs = vec![
        fixtures::pdf_job(&layout, "fine.pdf").await,
        fixtures::pdf_job(&layout, "doomed.pdf").await,
    ];
    let result = coordinator
        .run_batch(jobs, Some("batch-scripted".to_string()))
        .await;

    assert_eq!(result.successes.len(), 1);
    assert_eq!(result.successes[0].original_filename, "fine.pdf");
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].original_filename, "doomed.pdf");
    assert_eq!(result.failures[0].error, "scripted failure");
}

#[tokio::test]
async fn test_archive_bundles_every_successful_output() {
    let temp_dir = TempDir::new().unwrap();
    let layout = StorageLayout::new(temp_dir.path().join("storage"));
    layout.ensure().await.unwrap();

    let converter = MockConverter::new(layout.clone());
    let coordinator = BatchCoordinator::new(converter, layout.clone());

    let jobs = vec![
        fixtures::both_formats_job(&layout, "alpha.pdf").await,
        fixtures::pdf_job(&layout, "beta.pdf").await,
    ];
    let result = coordinator
        .run_batch(jobs, Some("batch-zip".to_string()))
        .await;

    let archive = result.archive_path.expect("archive should exist");
    assert_eq!(archive, layout.archive_path("batch-zip"));

    let file = std::fs::File::open(&archive).unwrap();
    let zip = zip::ZipArchive::new(file).unwrap();
    // alpha produced epub+mobi, beta produced epub.
    assert_eq!(zip.len(), 3);
}

#[tokio::test]
async fn test_single_item_batch_still_gets_archive() {
    let temp_dir = TempDir::new().unwrap();
    let layout = StorageLayout::new(temp_dir.path().join("storage"));
    layout.ensure().await.unwrap();

    let converter = MockConverter::new(layout.clone());
    let coordinator = BatchCoordinator::new(converter, layout.clone());

    let jobs = vec![fixtures::pdf_job(&layout, "solo.pdf").await];
    let result = coordinator.run_batch(jobs, None).await;

    assert!(result.archive_path.is_some());
    // An omitted batch id is generated, not reused.
    assert!(!result.batch_id.is_empty());
}

#[tokio::test]
async fn test_all_failed_batch_has_no_archive() {
    let temp_dir = TempDir::new().unwrap();
    let layout = StorageLayout::new(temp_dir.path().join("storage"));
    layout.ensure().await.unwrap();

    let converter = MockConverter::new(layout.clone());
    converter.fail_filename("a.pdf").await;
    converter.fail_filename("b.pdf").await;
    let coordinator = BatchCoordinator::new(converter, layout.clone());

    let jobs = vec![
        fixtures::pdf_job(&layout, "a.pdf").await,
        fixtures::pdf_job(&layout, "b.pdf").await,
    ];
    let result = coordinator
        .run_batch(jobs, Some("batch-doomed".to_string()))
        .await;

    assert_eq!(result.summary().failed, 2);
    assert!(result.archive_path.is_none());
    assert!(!layout.archive_path("batch-doomed").exists());
}

#[tokio::test]
async fn test_archive_skips_output_deleted_mid_flight() {
    let temp_dir = TempDir::new().unwrap();
    let layout = StorageLayout::new(temp_dir.path().join("storage"));
    layout.ensure().await.unwrap();

    let converter = MockConverter::new(layout.clone());
    // Outputs are reported but never written, simulating deletion
    // between conversion and packaging.
    converter.set_write_outputs(false).await;
    let coordinator = BatchCoordinator::new(converter, layout.clone());

    let jobs = vec![fixtures::pdf_job(&layout, "vanish.pdf").await];
    let result = coordinator
        .run_batch(jobs, Some("batch-vanish".to_string()))
        .await;

    // Every member vanished, so packaging yields no archive but the
    // batch itself still reports its successes.
    assert_eq!(result.summary().succeeded, 1);
    assert!(result.archive_path.is_none());
}

#[tokio::test]
async fn test_job_purge_removes_batch_artifacts() {
    let temp_dir = TempDir::new().unwrap();
    let layout = StorageLayout::new(temp_dir.path().join("storage"));
    layout.ensure().await.unwrap();

    let converter = MockConverter::new(layout.clone());
    let coordinator = BatchCoordinator::new(converter, layout.clone());

    let jobs = vec![fixtures::both_formats_job(&layout, "purgeme.pdf").await];
    let result = coordinator
        .run_batch(jobs, Some("batch-purge".to_string()))
        .await;
    assert_eq!(result.summary().succeeded, 1);
    let job_id = result.successes[0].job_id.clone();

    let retention = RetentionEngine::new(layout.clone(), RetentionConfig::default());
    let report = retention.purge_job(&job_id).await;
    assert_eq!(report.files_removed, 2);
    assert!(!layout.output_path(&job_id, EbookFormat::Epub).exists());
    assert!(!layout.output_path(&job_id, EbookFormat::Mobi).exists());
    // The batch archive does not embed the job id and survives.
    assert!(layout.archive_path("batch-purge").exists());
}

#[tokio::test]
async fn test_sweep_eventually_reclaims_batch_outputs() {
    use std::fs::FileTimes;
    use std::time::SystemTime;

    let temp_dir = TempDir::new().unwrap();
    let layout = StorageLayout::new(temp_dir.path().join("storage"));
    layout.ensure().await.unwrap();

    let converter = MockConverter::new(layout.clone());
    let coordinator = BatchCoordinator::new(converter, layout.clone());

    let jobs = vec![fixtures::pdf_job(&layout, "aging.pdf").await];
    let result = coordinator
        .run_batch(jobs, Some("batch-aging".to_string()))
        .await;
    assert_eq!(result.summary().succeeded, 1);

    // Backdate everything the batch left behind.
    let past = SystemTime::now() - Duration::from_secs(7200);
    for dir in layout.managed_dirs() {
        for entry in std::fs::read_dir(&dir).unwrap().flatten() {
            let file = std::fs::File::options()
                .write(true)
                .open(entry.path())
                .unwrap();
            file.set_times(FileTimes::new().set_accessed(past).set_modified(past))
                .unwrap();
        }
    }

    let retention = RetentionEngine::new(layout.clone(), RetentionConfig::default());
    let report = retention.sweep_older_than(Duration::from_secs(3600)).await;
    assert!(report.files_removed >= 2); // output plus archive
    assert_eq!(retention.total_size().await, 0);

    // A second sweep finds nothing.
    let again = retention.sweep_older_than(Duration::from_secs(3600)).await;
    assert_eq!(again.files_removed, 0);
}
