use std::sync::Arc;

use crate::error_log::ErrorLog;
use crate::gate::AdmissionGate;
use crate::progress::{BatchStats, Progress};
use crate::subtitle::LineClassifier;
use crate::translate::TranslationClient;

/// Everything shared between concurrent files and lines of one run.
///
/// Built once by the coordinator and passed down by `Arc`; nothing here is
/// global state.
pub struct BatchContext {
    pub client: TranslationClient,
    pub classifier: LineClassifier,
    pub gate: AdmissionGate,
    pub progress: Progress,
    pub stats: BatchStats,
    pub errors: ErrorLog,
}

impl BatchContext {
    pub fn new(
        client: TranslationClient,
        classifier: LineClassifier,
        gate: AdmissionGate,
        progress: Progress,
        errors: ErrorLog,
    ) -> Arc<Self> {
        Arc::new(Self {
            client,
            classifier,
            gate,
            progress,
            stats: BatchStats::default(),
            errors,
        })
    }
}
