use std::sync::Arc;
use tracing::debug;

use crate::config::TranslateConfig;
use crate::error::Result;
use super::{TranslationBackend, TranslationCache, TranslationRequest};

/// Resolves one line of text: cache first, otherwise one backend call.
pub struct TranslationClient {
    backend: Arc<dyn TranslationBackend>,
    cache: TranslationCache,
    source_language: String,
    format: String,
}

impl TranslationClient {
    pub fn new(backend: Arc<dyn TranslationBackend>, config: &TranslateConfig) -> Self {
        Self {
            backend,
            cache: TranslationCache::new(),
            source_language: config.source_language.clone(),
            format: config.format.clone(),
        }
    }

    /// Translate `text` into `target_language`.
    ///
    /// The text is trimmed before lookup and before sending. A failed call is
    /// returned as-is with no retry; the caller decides on fallback.
    pub async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        let text = text.trim();
        if let Some(cached) = self.cache.get(text, target_language) {
            return Ok(cached);
        }

        let request = TranslationRequest {
            q: text.to_string(),
            source: self.source_language.clone(),
            target: target_language.to_string(),
            format: self.format.clone(),
        };

        let translated = self.backend.translate(request).await?;
        debug!("Translated '{}' -> '{}'", text, translated);

        self.cache.insert(text, target_language, &translated);
        Ok(translated)
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }
}
