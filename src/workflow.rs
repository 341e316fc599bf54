use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::Config;
use crate::context::BatchContext;
use crate::error::{Result, SubtranError};
use crate::error_log::{ErrorEvent, ErrorLog};
use crate::gate::AdmissionGate;
use crate::pipeline::{join_error_detail, FilePipeline};
use crate::progress::Progress;
use crate::subtitle::{count_lines, is_eligible, LineClassifier};
use crate::translate::{BackendFactory, TranslationBackend, TranslationClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    SingleFile,
    Directory,
}

/// Aggregate result of one run
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub mode: InputMode,
    pub files_completed: usize,
    pub files_failed: usize,
    pub lines_translated: usize,
    pub lines_processed: u64,
    pub total_lines: u64,
    pub elapsed: Duration,
}

impl BatchSummary {
    /// A single-file run whose only file failed has nothing to show for itself.
    pub fn is_fatal(&self) -> bool {
        self.mode == InputMode::SingleFile && self.files_failed > 0
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Completed: {} files, {} lines in {:?}",
            self.files_completed, self.lines_translated, self.elapsed
        )
    }
}

/// Batch coordinator: discovers subtitle files and runs a pipeline per file
/// under one shared admission gate.
pub struct Workflow {
    config: Config,
    backend: Arc<dyn TranslationBackend>,
    workers: usize,
    show_progress: bool,
}

impl Workflow {
    pub fn new(config: Config, workers: usize) -> Result<Self> {
        let backend = BackendFactory::create_backend(&config.translate)?;
        Ok(Self::with_backend(config, workers, backend))
    }

    pub fn with_backend(
        config: Config,
        workers: usize,
        backend: Arc<dyn TranslationBackend>,
    ) -> Self {
        Self {
            config,
            backend,
            workers: workers.max(1),
            show_progress: true,
        }
    }

    /// Keep the progress bar off the terminal
    pub fn hide_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Translate a file or every eligible file below a directory.
    ///
    /// Only an inaccessible input path is an error here; per-line and per-file
    /// failures are written to `errors` and reflected in the summary.
    pub async fn run(
        &self,
        input: &Path,
        target_language: &str,
        errors: ErrorLog,
    ) -> Result<BatchSummary> {
        let metadata = match tokio::fs::metadata(input).await {
            Ok(metadata) => metadata,
            Err(e) => {
                errors.record(ErrorEvent::Access {
                    path: input,
                    error: &e.to_string(),
                });
                return Err(SubtranError::InvalidInput {
                    path: input.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };

        if metadata.is_dir() {
            self.process_directory(input, target_language, errors).await
        } else {
            self.process_single_file(input, target_language, errors).await
        }
    }

    /// Process all subtitle files below `root` concurrently
    pub async fn process_directory(
        &self,
        root: &Path,
        target_language: &str,
        errors: ErrorLog,
    ) -> Result<BatchSummary> {
        let start = Instant::now();
        info!("Processing directory: {}", root.display());

        let ctx = self.context(errors, "Total Progress");
        let files = self.discover(root, &ctx.errors);
        info!(
            "Found {} subtitle files to process with {} workers",
            files.len(),
            ctx.gate.capacity()
        );

        let total = self.prescan(&files, &ctx.errors).await;
        ctx.progress.set_total(total);

        let pipeline = Arc::new(FilePipeline::new(Arc::clone(&ctx), target_language));
        let mut tasks = JoinSet::new();

        for path in files {
            let permit = match ctx.gate.admit_file().await {
                Ok(permit) => permit,
                Err(e) => {
                    ctx.errors.record(ErrorEvent::Admission {
                        path: &path,
                        error: &e,
                    });
                    continue;
                }
            };

            let ctx = Arc::clone(&ctx);
            let pipeline = Arc::clone(&pipeline);
            tasks.spawn(async move {
                let _permit = permit;
                supervise_file(ctx, pipeline, path).await
            });
        }

        let mut files_failed = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(true) => {}
                Ok(false) => files_failed += 1,
                Err(e) => {
                    files_failed += 1;
                    ctx.errors.record(ErrorEvent::Fault {
                        path: root,
                        detail: &join_error_detail(e),
                    });
                }
            }
        }

        Ok(self.finish(&ctx, InputMode::Directory, files_failed, start))
    }

    /// Process one subtitle file, bypassing discovery
    pub async fn process_single_file(
        &self,
        path: &Path,
        target_language: &str,
        errors: ErrorLog,
    ) -> Result<BatchSummary> {
        let start = Instant::now();
        info!("Processing single file: {}", path.display());

        let ctx = self.context(errors, "Progress");
        let total = self.prescan(&[path.to_path_buf()], &ctx.errors).await;
        ctx.progress.set_total(total);

        let pipeline = Arc::new(FilePipeline::new(Arc::clone(&ctx), target_language));
        let succeeded = supervise_file(Arc::clone(&ctx), pipeline, path.to_path_buf()).await;
        let files_failed = usize::from(!succeeded);

        Ok(self.finish(&ctx, InputMode::SingleFile, files_failed, start))
    }

    fn context(&self, errors: ErrorLog, description: &str) -> Arc<BatchContext> {
        let progress = if self.show_progress {
            Progress::new(0, description)
        } else {
            Progress::hidden(0)
        };

        BatchContext::new(
            TranslationClient::new(Arc::clone(&self.backend), &self.config.translate),
            LineClassifier::new(self.config.batch.header_token.clone()),
            AdmissionGate::new(self.workers),
            progress,
            errors,
        )
    }

    /// Eligible files below `root`, in a stable order. Unreadable entries are logged and skipped.
    fn discover(&self, root: &Path, errors: &ErrorLog) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    errors.record(ErrorEvent::Walk {
                        path: &path,
                        error: &e.to_string(),
                    });
                    continue;
                }
            };

            if entry.file_type().is_file()
                && is_eligible(entry.path(), self.config.batch.extensions.as_slice())
            {
                files.push(entry.into_path());
            }
        }

        files
    }

    /// Total line count across `files`, used as the progress total.
    async fn prescan(&self, files: &[PathBuf], errors: &ErrorLog) -> u64 {
        let mut total = 0;
        for path in files {
            match count_lines(path).await {
                Ok(count) => {
                    debug!("{}: {} lines", path.display(), count);
                    total += count;
                }
                Err(e) => errors.record(ErrorEvent::Scan { path, error: &e }),
            }
        }
        total
    }

    fn finish(
        &self,
        ctx: &BatchContext,
        mode: InputMode,
        files_failed: usize,
        start: Instant,
    ) -> BatchSummary {
        ctx.progress.finish();
        let cache = ctx.client.cache();
        info!(
            "Cache: {} entries, {} hits, {} misses",
            cache.len(),
            cache.hits(),
            cache.misses()
        );

        BatchSummary {
            mode,
            files_completed: ctx.stats.files_completed(),
            files_failed,
            lines_translated: ctx.stats.lines_translated(),
            lines_processed: ctx.progress.processed(),
            total_lines: ctx.progress.total(),
            elapsed: start.elapsed(),
        }
    }
}

/// Run one file behind its own task boundary so a panic is logged, not propagated.
/// Returns whether the file was written.
async fn supervise_file(ctx: Arc<BatchContext>, pipeline: Arc<FilePipeline>, path: PathBuf) -> bool {
    let task_path = path.clone();
    let handle = tokio::spawn(async move { pipeline.process_file(&task_path).await });

    match handle.await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            ctx.errors.record(ErrorEvent::File { path: &path, error: &e });
            false
        }
        Err(e) => {
            ctx.errors.record(ErrorEvent::Fault {
                path: &path,
                detail: &join_error_detail(e),
            });
            false
        }
    }
}
