use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;

use crate::error::{Result, SubtranError};

/// A non-fatal failure worth one line in the error log
#[derive(Debug)]
pub enum ErrorEvent<'a> {
    /// A single line fell back to its original text
    Line {
        path: &'a Path,
        line_number: usize,
        text: &'a str,
        error: &'a SubtranError,
    },
    /// A whole file was skipped
    File { path: &'a Path, error: &'a SubtranError },
    /// A directory entry could not be visited
    Walk { path: &'a Path, error: &'a str },
    /// A task panicked
    Fault { path: &'a Path, detail: &'a str },
    /// The admission gate refused a unit or a file
    Admission { path: &'a Path, error: &'a SubtranError },
    /// A file could not be opened while counting lines
    Scan { path: &'a Path, error: &'a SubtranError },
    /// The top-level input could not be accessed
    Access { path: &'a Path, error: &'a str },
}

impl fmt::Display for ErrorEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line {
                path,
                line_number,
                text,
                error,
            } => write!(
                f,
                "Line error in file '{}' [line {}]: '{}' - {}",
                path.display(),
                line_number,
                text,
                error
            ),
            Self::File { path, error } => {
                write!(f, "Translation error {}: {}", path.display(), error)
            }
            Self::Walk { path, error } => write!(f, "Walk error {}: {}", path.display(), error),
            Self::Fault { path, detail } => {
                write!(f, "Panic in file {}: {}", path.display(), detail)
            }
            Self::Admission { path, error } => {
                write!(f, "Semaphore error {}: {}", path.display(), error)
            }
            Self::Scan { path, error } => {
                write!(f, "Failed to open file {}: {}", path.display(), error)
            }
            Self::Access { path, error } => {
                write!(f, "Access error {}: {}", path.display(), error)
            }
        }
    }
}

/// Append-only error log shared by all workers.
///
/// Each record becomes exactly one line in the file and one console warning.
/// Writes are serialized through a mutex so concurrent records never interleave.
pub struct ErrorLog {
    sink: Mutex<File>,
    path: PathBuf,
    recorded: AtomicUsize,
}

impl ErrorLog {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| SubtranError::Write {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            sink: Mutex::new(file),
            path,
            recorded: AtomicUsize::new(0),
        })
    }

    pub fn record(&self, event: ErrorEvent<'_>) {
        let message = event.to_string().replace(['\r', '\n'], " ");
        warn!("{}", message);

        let line = format!(
            "[{}] {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            message
        );

        match self.sink.lock() {
            Ok(mut file) => {
                if let Err(e) = file.write_all(line.as_bytes()) {
                    warn!("Failed to write error log {}: {}", self.path.display(), e);
                }
            }
            Err(_) => warn!("Error log {} is poisoned", self.path.display()),
        }
        self.recorded.fetch_add(1, Ordering::Relaxed);
    }

    /// Records written by this process
    pub fn recorded(&self) -> usize {
        self.recorded.load(Ordering::Relaxed)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
