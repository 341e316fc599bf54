use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{Result, SubtranError};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5001/translate";

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_extensions() -> Vec<String> {
    vec!["vtt".to_string(), "srt".to_string()]
}

fn default_header_token() -> String {
    "WEBVTT".to_string()
}

fn default_error_log() -> String {
    "translate_errors.log".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub translate: TranslateConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Translation service endpoint (LibreTranslate `/translate` route)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Language every input file is written in
    #[serde(default = "default_source_language")]
    pub source_language: String,
    /// Payload format understood by the service
    #[serde(default = "default_format")]
    pub format: String,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Subtitle file extensions picked up during directory traversal (case-insensitive)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Literal header line of the caption format, never translated
    #[serde(default = "default_header_token")]
    pub header_token: String,
    /// Append-only error log, relative to the working directory
    #[serde(default = "default_error_log")]
    pub error_log: String,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            source_language: default_source_language(),
            format: default_format(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            header_token: default_header_token(),
            error_log: default_error_log(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SubtranError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| SubtranError::Config(format!("Failed to parse config file: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_service_contract() {
        let config = Config::default();
        assert_eq!(config.translate.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.translate.source_language, "en");
        assert_eq!(config.translate.timeout_secs, 10);
        assert_eq!(config.batch.extensions, vec!["vtt", "srt"]);
        assert_eq!(config.batch.error_log, "translate_errors.log");
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subtran.toml");
        std::fs::write(&path, "[translate]\nendpoint = \"http://mt:5000/translate\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.translate.endpoint, "http://mt:5000/translate");
        assert_eq!(config.translate.timeout_secs, 10);
        assert_eq!(config.batch.header_token, "WEBVTT");
    }

    #[test]
    fn test_custom_extensions_replace_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subtran.toml");
        std::fs::write(&path, "[batch]\nextensions = [\"vtt\", \"srt\", \"ass\"]\n").unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.batch.extensions, vec!["vtt", "srt", "ass"]);
        assert_eq!(loaded.translate.source_language, "en");
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[translate\n").unwrap();

        assert!(matches!(Config::from_file(&path), Err(SubtranError::Config(_))));
    }
}
