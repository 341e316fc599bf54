use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::TranslateConfig;
use crate::error::{Result, SubtranError};

/// Request body of the LibreTranslate `/translate` route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub q: String,
    pub source: String,
    pub target: String,
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResponse {
    #[serde(rename = "translatedText")]
    pub translated_text: String,
}

/// One remote translation call. Implementations do not cache and do not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    async fn translate(&self, request: TranslationRequest) -> Result<String>;
}

/// HTTP client for a LibreTranslate-compatible service
pub struct LibreTranslateBackend {
    client: Client,
    endpoint: String,
    timeout_secs: u64,
}

impl LibreTranslateBackend {
    pub fn new(config: &TranslateConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SubtranError::Network(format!("HTTP client creation failed: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    fn transport_error(&self, error: reqwest::Error) -> SubtranError {
        if error.is_timeout() {
            SubtranError::Timeout(self.timeout_secs)
        } else {
            SubtranError::Network(error.to_string())
        }
    }
}

#[async_trait]
impl TranslationBackend for LibreTranslateBackend {
    async fn translate(&self, request: TranslationRequest) -> Result<String> {
        debug!("Sending translation request to: {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(SubtranError::Service(status));
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        let parsed: TranslationResponse =
            serde_json::from_str(&body).map_err(|e| SubtranError::Decode(e.to_string()))?;

        Ok(parsed.translated_text)
    }
}

/// Factory for translation backends
pub struct BackendFactory;

impl BackendFactory {
    /// The default backend: LibreTranslate over HTTP
    pub fn create_backend(config: &TranslateConfig) -> Result<Arc<dyn TranslationBackend>> {
        Ok(Arc::new(LibreTranslateBackend::new(config)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answer a single HTTP request with a canned response; yields the request body.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/translate", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 4096];
            let request_body = loop {
                let n = socket.read(&mut buf).await.unwrap();
                received.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&received).to_string();
                if let Some(split) = text.find("\r\n\r\n") {
                    let length = text[..split]
                        .lines()
                        .find_map(|l| {
                            let lower = l.to_ascii_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if received.len() >= split + 4 + length || n == 0 {
                        break text[split + 4..].to_string();
                    }
                }
                if n == 0 {
                    break String::new();
                }
            };

            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request_body
        });

        (url, handle)
    }

    fn config_for(endpoint: String, timeout_secs: u64) -> TranslateConfig {
        TranslateConfig {
            endpoint,
            timeout_secs,
            ..TranslateConfig::default()
        }
    }

    fn request(text: &str) -> TranslationRequest {
        TranslationRequest {
            q: text.to_string(),
            source: "en".to_string(),
            target: "fr".to_string(),
            format: "text".to_string(),
        }
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(request("Hello")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"q": "Hello", "source": "en", "target": "fr", "format": "text"})
        );

        let response: TranslationResponse =
            serde_json::from_str(r#"{"translatedText":"Bonjour"}"#).unwrap();
        assert_eq!(response.translated_text, "Bonjour");
    }

    #[tokio::test]
    async fn test_successful_call_posts_payload() {
        let (url, server) = serve_once("HTTP/1.1 200 OK", r#"{"translatedText":"Bonjour"}"#).await;
        let backend = LibreTranslateBackend::new(&config_for(url, 10)).unwrap();

        let translated = backend.translate(request("Hello")).await.unwrap();
        assert_eq!(translated, "Bonjour");

        let sent: TranslationRequest = serde_json::from_str(&server.await.unwrap()).unwrap();
        assert_eq!(sent, request("Hello"));
    }

    #[tokio::test]
    async fn test_non_200_is_service_error() {
        let (url, _server) = serve_once("HTTP/1.1 503 Service Unavailable", "{}").await;
        let backend = LibreTranslateBackend::new(&config_for(url, 10)).unwrap();

        match backend.translate(request("Hello")).await {
            Err(SubtranError::Service(status)) => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE)
            }
            other => panic!("expected service error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let (url, _server) = serve_once("HTTP/1.1 200 OK", r#"{"text":"Bonjour"}"#).await;
        let backend = LibreTranslateBackend::new(&config_for(url, 10)).unwrap();

        let result = backend.translate(request("Hello")).await;
        assert!(matches!(result, Err(SubtranError::Decode(_))));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        // Bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/translate", listener.local_addr().unwrap());
        drop(listener);

        let backend = LibreTranslateBackend::new(&config_for(url, 10)).unwrap();
        let err = backend.translate(request("Hello")).await.unwrap_err();
        assert!(matches!(err, SubtranError::Network(_)));
    }

    #[tokio::test]
    async fn test_silent_service_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/translate", listener.local_addr().unwrap());
        let _server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let backend = LibreTranslateBackend::new(&config_for(url, 1)).unwrap();
        let result = backend.translate(request("Hello")).await;
        assert!(matches!(result, Err(SubtranError::Timeout(1))));
    }
}
