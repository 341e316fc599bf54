use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubtranError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Translation request timed out after {0}s")]
    Timeout(u64),

    #[error("API response: {0}")]
    Service(reqwest::StatusCode),

    #[error("Failed to decode translation response: {0}")]
    Decode(String),

    #[error("Admission error: {0}")]
    Admission(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input path {}: {reason}", path.display())]
    InvalidInput { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, SubtranError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_shows_status() {
        let err = SubtranError::Service(reqwest::StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "API response: 502 Bad Gateway");
    }

    #[test]
    fn test_read_error_names_path() {
        let err = SubtranError::Read {
            path: PathBuf::from("movies/a.vtt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("movies/a.vtt"));
    }
}
