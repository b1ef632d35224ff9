//! Property tests for chunking and content fingerprints

use pii_scanner::core::checksum::{calculate_checksum, calculate_checksum_bytes};
use pii_scanner::core::chunker::{Chunker, Tokenizer, WordTokenizer};
use pii_scanner::domain::ScanMode;
use proptest::prelude::*;
use std::sync::Arc;

fn chunker(max_token_chars: usize, max_length: usize, reserved: usize) -> Chunker {
    Chunker::new(Arc::new(WordTokenizer::new(max_token_chars)), max_length, reserved)
}

proptest! {
    #[test]
    fn chunks_never_exceed_budget(
        text in "[a-zA-Z0-9@. \n\t]{0,2000}",
        max_length in 3usize..64,
        reserved in 0usize..3,
    ) {
        let chunker = chunker(16, max_length, reserved);
        let chunks = chunker.chunk_tokens(&text).unwrap();
        for chunk in &chunks {
            prop_assert!(!chunk.is_empty());
            prop_assert!(chunk.len() <= chunker.budget());
        }
    }

    #[test]
    fn chunking_preserves_token_sequence(
        text in "\\PC{0,1500}",
        max_length in 3usize..32,
    ) {
        let tokenizer = WordTokenizer::new(8);
        let chunker = chunker(8, max_length, 2);

        let flattened: Vec<String> = chunker
            .chunk_tokens(&text)
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        prop_assert_eq!(flattened, tokenizer.tokenize(&text).unwrap());
    }

    #[test]
    fn only_the_last_chunk_is_short(
        words in prop::collection::vec("[a-z]{1,10}", 0..300),
        max_length in 3usize..40,
    ) {
        let chunker = chunker(64, max_length, 2);
        let chunks = chunker.chunk_tokens(&words.join(" ")).unwrap();
        if let Some((_, full)) = chunks.split_last() {
            for chunk in full {
                prop_assert_eq!(chunk.len(), chunker.budget());
            }
        }
    }

    #[test]
    fn tokens_respect_max_token_chars(
        text in "\\PC{0,500}",
        max_token_chars in 1usize..20,
    ) {
        let tokenizer = WordTokenizer::new(max_token_chars);
        for token in tokenizer.tokenize(&text).unwrap() {
            prop_assert!(!token.is_empty());
            prop_assert!(token.chars().count() <= max_token_chars);
            prop_assert!(!token.chars().any(char::is_whitespace));
        }
    }

    #[test]
    fn small_files_fingerprint_identically_in_both_modes(
        data in prop::collection::vec(any::<u8>(), 0..4096),
    ) {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), &data).unwrap();

        let lite = calculate_checksum(file.path(), ScanMode::Lite).unwrap();
        let full = calculate_checksum(file.path(), ScanMode::Full).unwrap();
        prop_assert_eq!(&lite, &full);
        prop_assert_eq!(full, calculate_checksum_bytes(&data));
    }
}
