use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    text: String,
    target_language: String,
}

impl CacheKey {
    fn new(text: &str, target_language: &str) -> Self {
        Self {
            text: text.to_string(),
            target_language: target_language.to_string(),
        }
    }
}

/// Process-wide translation cache shared by every file and worker.
///
/// Keyed on the trimmed source text together with the target language, so one
/// run can translate into several languages without cross-talk. Two workers
/// racing on the same key both write; translations of identical input are
/// interchangeable, so whichever lands last is kept.
#[derive(Debug, Default)]
pub struct TranslationCache {
    entries: DashMap<CacheKey, String>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, text: &str, target_language: &str) -> Option<String> {
        let key = CacheKey::new(text, target_language);
        match self.entries.get(&key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit for '{}' ({})", text, target_language);
                Some(entry.value().clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn insert(&self, text: &str, target_language: &str, translated: &str) {
        self.entries
            .insert(CacheKey::new(text, target_language), translated.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}
