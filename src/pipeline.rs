use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info};

use crate::context::BatchContext;
use crate::error::{Result, SubtranError};
use crate::error_log::ErrorEvent;
use crate::subtitle::{output_path, read_lines, LineKind};

/// Translates one subtitle file line by line and writes `<stem>_<lang>.<ext>`.
pub struct FilePipeline {
    ctx: Arc<BatchContext>,
    target_language: Arc<str>,
}

impl FilePipeline {
    pub fn new(ctx: Arc<BatchContext>, target_language: &str) -> Self {
        Self {
            ctx,
            target_language: Arc::from(target_language),
        }
    }

    /// Process one file and return the path of the written translation.
    ///
    /// Output has exactly one line per input line, in input order. A line whose
    /// translation fails keeps its original text; only read and write failures
    /// fail the file.
    pub async fn process_file(&self, path: &Path) -> Result<PathBuf> {
        let units = read_lines(path).await?;
        let shared_path: Arc<Path> = Arc::from(path);
        let mut slots: Vec<Option<String>> = vec![None; units.len()];
        let mut tasks = JoinSet::new();

        for unit in &units {
            if self.ctx.classifier.classify(&unit.text) == LineKind::Structural {
                slots[unit.index] = Some(unit.text.clone());
                self.ctx.progress.advance();
                continue;
            }

            let permit = match self.ctx.gate.admit_unit().await {
                Ok(permit) => permit,
                Err(e) => {
                    self.ctx.errors.record(ErrorEvent::Admission {
                        path,
                        error: &e,
                    });
                    slots[unit.index] = Some(unit.text.clone());
                    self.ctx.progress.advance();
                    continue;
                }
            };

            let ctx = Arc::clone(&self.ctx);
            let lang = Arc::clone(&self.target_language);
            let path = Arc::clone(&shared_path);
            let index = unit.index;
            let line_number = unit.line_number();
            let text = unit.text.clone();

            tasks.spawn(async move {
                let _permit = permit;
                let resolved = match ctx.client.translate(&text, &lang).await {
                    Ok(translated) => {
                        ctx.stats.line_translated();
                        translated
                    }
                    Err(e) => {
                        ctx.errors.record(ErrorEvent::Line {
                            path: &path,
                            line_number,
                            text: &text,
                            error: &e,
                        });
                        text
                    }
                };
                ctx.progress.advance();
                (index, resolved)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, text)) => slots[index] = Some(text),
                Err(e) => self.ctx.errors.record(ErrorEvent::Fault {
                    path,
                    detail: &join_error_detail(e),
                }),
            }
        }

        // Units lost to a fault keep their original text
        let lines: Vec<String> = slots
            .into_iter()
            .zip(units)
            .map(|(slot, unit)| {
                slot.unwrap_or_else(|| {
                    self.ctx.progress.advance();
                    unit.text
                })
            })
            .collect();

        let output = output_path(path, &self.target_language);
        debug!("Writing {} lines to {}", lines.len(), output.display());
        fs::write(&output, lines.join("\n"))
            .await
            .map_err(|source| SubtranError::Write {
                path: output.clone(),
                source,
            })?;

        self.ctx.stats.file_completed();
        info!("Translated {} -> {}", path.display(), output.display());
        Ok(output)
    }
}

/// Readable description of a failed task, including its panic message.
pub(crate) fn join_error_detail(error: JoinError) -> String {
    if error.is_panic() {
        panic_message(error.into_panic())
    } else {
        error.to_string()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
