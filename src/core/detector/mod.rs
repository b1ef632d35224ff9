//! PII detection over text chunks
//!
//! The [`EntityClassifier`] trait is the boundary to the span classification
//! model. [`PiiDetector`] picks the label vocabulary for the scan mode, runs
//! the classifier per chunk and never lets a classifier failure escape: a
//! failed chunk contributes no entities.

pub mod pattern;
pub mod patterns;

pub use pattern::PatternClassifier;
pub use patterns::PatternRegistry;

use crate::config::{LabelConfig, ModelConfig, BUILTIN_MODEL};
use crate::domain::{DetectedEntity, Result, ScanError, ScanMode};
use std::sync::Arc;
use thiserror::Error;

/// Classification failures
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("inference failed: {0}")]
    Inference(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// A span classifier: `classify(text, labels) -> [(span text, label)]`
pub trait EntityClassifier: Send + Sync {
    /// Model identifier, for logging
    fn name(&self) -> &str;

    /// Classify spans of `text` against `labels`
    ///
    /// Returned labels must be spelled as in `labels`.
    ///
    /// # Errors
    ///
    /// Returns a [`ClassifyError`] when the model cannot process the input.
    fn classify(
        &self,
        text: &str,
        labels: &[String],
    ) -> std::result::Result<Vec<DetectedEntity>, ClassifyError>;
}

/// Build the classifier named in the model configuration
///
/// # Errors
///
/// Returns [`ScanError::ModelInit`] for an unknown model identifier or a
/// pattern library that fails to load.
pub fn build_classifier(config: &ModelConfig) -> Result<Arc<dyn EntityClassifier>> {
    if config.name != BUILTIN_MODEL {
        return Err(ScanError::ModelInit(format!(
            "Unknown model '{}'. Supported: {}",
            config.name, BUILTIN_MODEL
        )));
    }

    let registry = match &config.pattern_library {
        Some(path) => PatternRegistry::from_file(path)?,
        None => PatternRegistry::default_patterns()?,
    };
    tracing::debug!(
        model = %config.name,
        patterns = registry.all_patterns().len(),
        "Pattern library loaded"
    );

    Ok(Arc::new(
        PatternClassifier::with_registry(registry)
            .with_confidence_threshold(config.min_confidence),
    ))
}

/// Runs the classifier with the label set of the scan mode
#[derive(Clone)]
pub struct PiiDetector {
    classifier: Arc<dyn EntityClassifier>,
    labels: LabelConfig,
}

impl PiiDetector {
    pub fn new(classifier: Arc<dyn EntityClassifier>, labels: LabelConfig) -> Self {
        Self { classifier, labels }
    }

    /// Labels requested for a scan mode
    pub fn labels_for(&self, mode: ScanMode) -> &[String] {
        self.labels.for_mode(mode)
    }

    /// Detect entities in one chunk
    ///
    /// Blank chunks are not sent to the classifier. Classifier errors are
    /// logged and yield an empty result.
    pub fn detect(&self, chunk: &str, mode: ScanMode) -> Vec<DetectedEntity> {
        if chunk.trim().is_empty() {
            return Vec::new();
        }
        match self.classifier.classify(chunk, self.labels_for(mode)) {
            Ok(entities) => entities,
            Err(e) => {
                tracing::warn!(
                    model = self.classifier.name(),
                    mode = %mode,
                    error = %e,
                    "PII detection failed for chunk"
                );
                Vec::new()
            }
        }
    }

    /// Detect entities across chunks, concatenated in chunk order
    ///
    /// Repeated spans are kept; the result is a multiset.
    pub fn detect_chunks(&self, chunks: &[String], mode: ScanMode) -> Vec<DetectedEntity> {
        let mut entities = Vec::new();
        for (index, chunk) in chunks.iter().enumerate() {
            let found = self.detect(chunk, mode);
            tracing::trace!(chunk = index + 1, entities = found.len(), "Chunk classified");
            entities.extend(found);
        }
        entities
    }
}

impl std::fmt::Debug for PiiDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PiiDetector")
            .field("classifier", &self.classifier.name())
            .field("labels", &self.labels)
            .finish()
    }
}
