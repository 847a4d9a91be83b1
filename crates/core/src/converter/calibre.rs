//! Engine-backed converter: drives `ebook-convert` through the process
//! runner, one invocation per requested format.

use std::time::Instant;

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::args::{build_engine_args, CoverDirective};
use super::config::ConverterConfig;
use super::cover::extract_first_page;
use super::error::ConverterError;
use super::runner::{run_command, CommandSpec};
use super::traits::Converter;
use super::types::{ConversionJob, ConversionResult, OutputArtifact};
use crate::storage::StorageLayout;

/// Production converter backed by the Calibre conversion engine.
pub struct CalibreConverter {
    config: ConverterConfig,
    layout: StorageLayout,
}

impl CalibreConverter {
    pub fn new(config: ConverterConfig, layout: StorageLayout) -> Self {
        Self { config, layout }
    }

    /// Runs all requested format conversions for one job.
    ///
    /// Fails on the first format that does not produce a verified
    /// artifact; a multi-format job is all-or-nothing.
    async fn run_job(&self, job: &ConversionJob) -> Result<Vec<OutputArtifact>, ConverterError> {
        let output_dir = self.layout.output_dir();
        tokio::fs::create_dir_all(&output_dir)
            .await
            .map_err(|_| ConverterError::OutputDirectoryFailed { path: output_dir })?;

        let cover = if job.extract_cover {
            match extract_first_page(&self.config, &self.layout, &job.input_path, &job.job_id)
                .await
            {
                Some(path) => CoverDirective::Extracted(path),
                None => CoverDirective::None,
            }
        } else {
            CoverDirective::Suppress
        };

        let template = crate::templates::resolve(&job.template);
        let mut outputs = Vec::new();

        for &format in job.formats.formats() {
            let output_path = self.layout.output_path(&job.job_id, format);
            let args = build_engine_args(
                &job.input_path,
                &output_path,
                format,
                template,
                &job.metadata,
                &cover,
            )?;

            info!(
                job_id = %job.job_id,
                format = format.extension(),
                template = %template.key,
                "starting engine conversion"
            );

            let spec = CommandSpec::new(self.config.engine_path.clone(), args);
            let outcome = run_command(&spec, self.config.deadline()).await?;

            if outcome.timed_out {
                return Err(ConverterError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                });
            }
            if !outcome.success() {
                return Err(ConverterError::engine_failed(
                    outcome.exit_code,
                    &outcome.stderr,
                ));
            }

            let meta = tokio::fs::metadata(&output_path)
                .await
                .map_err(|_| ConverterError::ArtifactMissing {
                    path: output_path.clone(),
                })?;

            outputs.push(OutputArtifact {
                format,
                path: output_path,
                size_bytes: meta.len(),
            });
        }

        Ok(outputs)
    }

    /// Deletes the job's input file. The input is owned by the job, so
    /// this runs exactly once per job, at the terminal state, on both the
    /// success and failure paths. A failed delete is logged and absorbed;
    /// the retention sweep will catch the leftover.
    async fn cleanup_input(&self, job: &ConversionJob) {
        match tokio::fs::remove_file(&job.input_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(
                    job_id = %job.job_id,
                    input = %job.input_path.display(),
                    error = %e,
                    "failed to delete input file"
                );
            }
        }
    }
}

#[async_trait]
impl Converter for CalibreConverter {
    fn name(&self) -> &str {
        "calibre"
    }

    async fn convert(&self, job: ConversionJob) -> ConversionResult {
        let started = Instant::now();
        let outcome = self.run_job(&job).await;
        self.cleanup_input(&job).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(outputs) => {
                info!(
                    job_id = %job.job_id,
                    outputs = outputs.len(),
                    duration_ms,
                    "conversion succeeded"
                );
                ConversionResult {
                    job_id: job.job_id,
                    success: true,
                    outputs,
                    duration_ms,
                    error: None,
                }
            }
            Err(e) => {
                error!(job_id = %job.job_id, duration_ms, error = %e, "conversion failed");
                ConversionResult {
                    job_id: job.job_id,
                    success: false,
                    outputs: Vec::new(),
                    duration_ms,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        let spec = CommandSpec::new(
            self.config.engine_path.clone(),
            vec!["--version".to_string()],
        );
        let outcome = run_command(&spec, std::time::Duration::from_secs(10)).await?;
        if outcome.success() {
            Ok(())
        } else {
            Err(ConverterError::engine_failed(
                outcome.exit_code,
                &outcome.stderr,
            ))
        }
    }
}
