//! Regex-based entity classifier

use super::patterns::PatternRegistry;
use super::{ClassifyError, EntityClassifier};
use crate::config::BUILTIN_MODEL;
use crate::domain::{DetectedEntity, Result};
use std::sync::Arc;

/// Classifier that runs the pattern library against the requested labels
pub struct PatternClassifier {
    pattern_registry: Arc<PatternRegistry>,
    confidence_threshold: f32,
}

impl PatternClassifier {
    /// Create a classifier with the embedded pattern library
    pub fn new() -> Result<Self> {
        let registry = PatternRegistry::default_patterns()?;
        Ok(Self::with_registry(registry))
    }

    /// Create a classifier with a custom pattern registry
    pub fn with_registry(registry: PatternRegistry) -> Self {
        Self {
            pattern_registry: Arc::new(registry),
            confidence_threshold: 0.5,
        }
    }

    /// Set the confidence threshold
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold.clamp(0.0, 1.0);
        self
    }
}

struct Match {
    start: usize,
    end: usize,
    label_index: usize,
}

impl EntityClassifier for PatternClassifier {
    fn name(&self) -> &str {
        BUILTIN_MODEL
    }

    fn classify(
        &self,
        text: &str,
        labels: &[String],
    ) -> std::result::Result<Vec<DetectedEntity>, ClassifyError> {
        let mut matches = Vec::new();

        for (label_index, label) in labels.iter().enumerate() {
            for pattern in self.pattern_registry.patterns_for_label(label) {
                if pattern.confidence < self.confidence_threshold {
                    continue;
                }
                for caps in pattern.regex.captures_iter(text) {
                    // first capture group narrows the span when present
                    if let Some(m) = caps.get(1).or_else(|| caps.get(0)) {
                        if !m.as_str().trim().is_empty() {
                            matches.push(Match {
                                start: m.start(),
                                end: m.end(),
                                label_index,
                            });
                        }
                    }
                }
            }
        }

        matches.sort_by_key(|m| (m.start, m.end, m.label_index));
        matches.dedup_by_key(|m| (m.start, m.end, m.label_index));

        Ok(matches
            .into_iter()
            .map(|m| DetectedEntity::new(&text[m.start..m.end], labels[m.label_index].as_str()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detects_email() {
        let classifier = PatternClassifier::new().unwrap();
        let entities = classifier
            .classify("Contact: jane@example.com", &labels(&["person", "email"]))
            .unwrap();
        assert_eq!(entities, vec![DetectedEntity::new("jane@example.com", "email")]);
    }

    #[test]
    fn test_clean_text_yields_nothing() {
        let classifier = PatternClassifier::new().unwrap();
        let entities = classifier
            .classify("hello world", &labels(&["person", "email", "phone number"]))
            .unwrap();
        assert!(entities.is_empty());
    }

    #[test]
    fn test_only_requested_labels_run() {
        let classifier = PatternClassifier::new().unwrap();
        let entities = classifier
            .classify("jane@example.com 123-45-6789", &labels(&["email"]))
            .unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].label, "email");
    }

    #[test]
    fn test_label_uses_callers_spelling() {
        let classifier = PatternClassifier::new().unwrap();
        let entities = classifier
            .classify("SSN: 123-45-6789", &labels(&["social security number"]))
            .unwrap();
        assert_eq!(
            entities,
            vec![DetectedEntity::new("123-45-6789", "social security number")]
        );
    }

    #[test]
    fn test_entities_in_reading_order() {
        let classifier = PatternClassifier::new().unwrap();
        let entities = classifier
            .classify(
                "Call 555-123-4567 or mail jane@example.com",
                &labels(&["email", "phone number"]),
            )
            .unwrap();
        let found: Vec<&str> = entities.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(found, vec!["phone number", "email"]);
    }

    #[test]
    fn test_repeated_spans_are_kept() {
        let classifier = PatternClassifier::new().unwrap();
        let entities = classifier
            .classify("a@b.io and again a@b.io", &labels(&["email"]))
            .unwrap();
        assert_eq!(entities.len(), 2);
    }

    #[test]
    fn test_threshold_filters_low_confidence_patterns() {
        let classifier = PatternClassifier::new()
            .unwrap()
            .with_confidence_threshold(0.99);
        let entities = classifier
            .classify("jane@example.com", &labels(&["email"]))
            .unwrap();
        assert!(entities.is_empty());
    }
}
