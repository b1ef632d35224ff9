//! Detected PII entity

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A span of text the detector classified under a PII label
///
/// Produced per chunk and concatenated per file in chunk order; only ever
/// persisted as part of a scan record's entity list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetectedEntity {
    /// Matched span text
    pub text: String,
    /// PII category name, e.g. "email"
    pub label: String,
}

impl DetectedEntity {
    /// Create a new entity
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

/// Distinct labels carried by a list of entities, in sorted order
pub fn distinct_labels(entities: &[DetectedEntity]) -> BTreeSet<String> {
    entities.iter().map(|e| e.label.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_labels_sorted_and_deduplicated() {
        let entities = vec![
            DetectedEntity::new("555-123-4567", "phone number"),
            DetectedEntity::new("jane@example.com", "email"),
            DetectedEntity::new("bob@example.com", "email"),
        ];
        let labels: Vec<String> = distinct_labels(&entities).into_iter().collect();
        assert_eq!(labels, vec!["email", "phone number"]);
    }

    #[test]
    fn test_entity_json_shape() {
        let entity = DetectedEntity::new("jane@example.com", "email");
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["text"], "jane@example.com");
        assert_eq!(json["label"], "email");
    }

    #[test]
    fn test_entity_rejects_unknown_fields() {
        let result: Result<DetectedEntity, _> =
            serde_json::from_str(r#"{"text":"x","label":"email","score":0.9}"#);
        assert!(result.is_err());
    }
}
