//! Scan context built once per run

use crate::config::ScannerConfig;
use crate::core::chunker::{build_tokenizer, Chunker};
use crate::core::detector::{build_classifier, PiiDetector};
use crate::core::history::ScanHistoryStore;
use crate::domain::Result;

/// Everything a scan needs: chunker, detector and history store
///
/// Built once at start-up and handed to the [`Scanner`](super::Scanner).
#[derive(Debug, Clone)]
pub struct ScanEngine {
    chunker: Chunker,
    detector: PiiDetector,
    history: ScanHistoryStore,
}

impl ScanEngine {
    /// Build the engine from configuration
    ///
    /// Initializes the history store, then the tokenizer, then the model.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Storage`](crate::domain::ScanError::Storage),
    /// [`ScanError::TokenizerInit`](crate::domain::ScanError::TokenizerInit) or
    /// [`ScanError::ModelInit`](crate::domain::ScanError::ModelInit) for the
    /// first resource that fails to initialize.
    pub fn from_config(config: &ScannerConfig) -> Result<Self> {
        let history = ScanHistoryStore::new(&config.storage.db_file);
        history.initialize()?;

        let tokenizer = build_tokenizer(&config.model)?;
        let chunker = Chunker::new(
            tokenizer,
            config.scan.max_chunk_length,
            config.scan.reserved_tokens,
        );

        let classifier = build_classifier(&config.model)?;
        let detector = PiiDetector::new(classifier, config.labels.clone());

        tracing::info!(
            db_file = %config.storage.db_file.display(),
            model = %config.model.name,
            chunk_budget = chunker.budget(),
            "Scan engine ready"
        );

        Ok(Self::new(chunker, detector, history))
    }

    /// Assemble an engine from parts
    pub fn new(chunker: Chunker, detector: PiiDetector, history: ScanHistoryStore) -> Self {
        Self {
            chunker,
            detector,
            history,
        }
    }

    pub fn chunker(&self) -> &Chunker {
        &self.chunker
    }

    pub fn detector(&self) -> &PiiDetector {
        &self.detector
    }

    pub fn history(&self) -> &ScanHistoryStore {
        &self.history
    }
}
