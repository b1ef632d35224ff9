//! Stored form of a record's entity list
//!
//! Entities are persisted as a versioned JSON envelope:
//!
//! ```json
//! {"version":1,"entities":[{"text":"jane@example.com","label":"email"}]}
//! ```
//!
//! Decoding is strict. Unknown fields, another version or any other shape
//! fail with [`StorageError::Corrupt`].

use crate::domain::{DetectedEntity, StorageError};
use serde::{Deserialize, Serialize};

/// Envelope version written by this build
pub const ENTITY_CODEC_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    entities: &'a [DetectedEntity],
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Envelope {
    version: u32,
    entities: Vec<DetectedEntity>,
}

/// Encode an entity list for storage
pub fn encode_entities(entities: &[DetectedEntity]) -> Result<String, StorageError> {
    serde_json::to_string(&EnvelopeRef {
        version: ENTITY_CODEC_VERSION,
        entities,
    })
    .map_err(|e| StorageError::Write(format!("Failed to encode entities: {e}")))
}

/// Decode a stored entity list
///
/// # Errors
///
/// Returns [`StorageError::Corrupt`] for anything other than a current
/// version envelope.
pub fn decode_entities(stored: &str) -> Result<Vec<DetectedEntity>, StorageError> {
    let envelope: Envelope = serde_json::from_str(stored)
        .map_err(|e| StorageError::Corrupt(format!("Undecodable entity list: {e}")))?;

    if envelope.version != ENTITY_CODEC_VERSION {
        return Err(StorageError::Corrupt(format!(
            "Unsupported entity list version {} (expected {})",
            envelope.version, ENTITY_CODEC_VERSION
        )));
    }
    Ok(envelope.entities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_encoded_form() {
        let encoded = encode_entities(&[DetectedEntity::new("jane@example.com", "email")]).unwrap();
        assert_eq!(
            encoded,
            r#"{"version":1,"entities":[{"text":"jane@example.com","label":"email"}]}"#
        );
    }

    #[test]
    fn test_empty_list() {
        let encoded = encode_entities(&[]).unwrap();
        assert_eq!(encoded, r#"{"version":1,"entities":[]}"#);
        assert!(decode_entities(&encoded).unwrap().is_empty());
    }

    #[test]
    fn test_decode_preserves_order_and_duplicates() {
        let entities = vec![
            DetectedEntity::new("Jane Doe", "person"),
            DetectedEntity::new("jane@example.com", "email"),
            DetectedEntity::new("Jane Doe", "person"),
        ];
        let decoded = decode_entities(&encode_entities(&entities).unwrap()).unwrap();
        assert_eq!(decoded, entities);
    }

    #[test_case("[{'text': 'jane@example.com', 'label': 'email'}]" ; "python repr")]
    #[test_case(r#"[{"text":"a","label":"b"}]"# ; "bare list")]
    #[test_case(r#"{"version":2,"entities":[]}"# ; "future version")]
    #[test_case(r#"{"version":1,"entities":[],"extra":true}"# ; "unknown envelope field")]
    #[test_case(r#"{"version":1,"entities":[{"text":"a","label":"b","score":0.9}]}"# ; "unknown entity field")]
    #[test_case("" ; "empty")]
    fn test_decode_fails_closed(stored: &str) {
        assert!(matches!(
            decode_entities(stored),
            Err(StorageError::Corrupt(_))
        ));
    }
}
