use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::{Result, SubtranError};

/// Separator between the start and end time of a cue.
pub const CUE_TIME_SEPARATOR: &str = "-->";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Header, cue timing or blank separator. Copied through unchanged.
    Structural,
    /// Spoken content sent to the translation service.
    Translatable,
}

/// One line of a subtitle file tagged with its 0-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineUnit {
    pub index: usize,
    pub text: String,
}

impl LineUnit {
    /// 1-based line number as shown in editors and error logs
    pub fn line_number(&self) -> usize {
        self.index + 1
    }
}

#[derive(Debug, Clone)]
pub struct LineClassifier {
    header_token: String,
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new("WEBVTT")
    }
}

impl LineClassifier {
    pub fn new(header_token: impl Into<String>) -> Self {
        Self {
            header_token: header_token.into(),
        }
    }

    pub fn classify(&self, line: &str) -> LineKind {
        if line.trim().is_empty()
            || line.contains(CUE_TIME_SEPARATOR)
            || line == self.header_token
        {
            LineKind::Structural
        } else {
            LineKind::Translatable
        }
    }
}

/// Whether a file name carries the hidden-file marker
pub fn is_hidden(file_name: &str) -> bool {
    file_name.starts_with('.')
}

/// Check a path's extension against the supported subtitle formats, ignoring case.
pub fn has_subtitle_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| e.as_ref().eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Eligible for translation: not hidden and a supported subtitle extension.
pub fn is_eligible<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    let visible = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| !is_hidden(name))
        .unwrap_or(false);
    visible && has_subtitle_extension(path, extensions)
}

/// `<dir>/<stem>_<lang>.<ext>` next to the input file.
pub fn output_path(input: &Path, target_language: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match input.extension() {
        Some(ext) => format!("{}_{}.{}", stem, target_language, ext.to_string_lossy()),
        None => format!("{}_{}", stem, target_language),
    };
    input.with_file_name(file_name)
}

/// Read every line of a subtitle file, in order, as line units.
///
/// Lines end at `\n` with an optional `\r` before it. Bytes that are not
/// valid UTF-8 are decoded lossily instead of failing the file.
pub async fn read_lines(path: &Path) -> Result<Vec<LineUnit>> {
    let read_err = |source| SubtranError::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).await.map_err(read_err)?;
    let mut segments = BufReader::new(file).split(b'\n');
    let mut units = Vec::new();

    while let Some(mut bytes) = segments.next_segment().await.map_err(read_err)? {
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        units.push(LineUnit {
            index: units.len(),
            text: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }

    Ok(units)
}

/// Count lines without keeping them, for the progress pre-scan.
pub async fn count_lines(path: &Path) -> Result<u64> {
    let read_err = |source| SubtranError::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).await.map_err(read_err)?;
    let mut segments = BufReader::new(file).split(b'\n');
    let mut count = 0u64;
    while segments.next_segment().await.map_err(read_err)?.is_some() {
        count += 1;
    }
    Ok(count)
}
