//! Token-budgeted text chunking
//!
//! Text is split into tokens by a [`Tokenizer`] and packed greedily into
//! chunks of at most `max_length - reserved` tokens. Chunk boundaries ignore
//! sentences; a chunk is its tokens joined back together by the tokenizer.

use crate::config::{ModelConfig, WORD_TOKENIZER};
use crate::domain::{Result, ScanError};
use std::sync::Arc;
use thiserror::Error;

/// Tokenization failures
#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("tokenization failed: {0}")]
    Tokenize(String),
}

/// Splits text into the atomic units the detection model counts
pub trait Tokenizer: Send + Sync {
    /// Split text into tokens
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::Tokenize`] when the input cannot be tokenized.
    fn tokenize(&self, text: &str) -> std::result::Result<Vec<String>, ChunkError>;

    /// Rebuild chunk text from tokens
    fn join(&self, tokens: &[String]) -> String {
        tokens.join(" ")
    }
}

/// Whitespace tokenizer that splits overlong words into fixed-size pieces
#[derive(Debug, Clone)]
pub struct WordTokenizer {
    max_token_chars: usize,
}

impl WordTokenizer {
    pub fn new(max_token_chars: usize) -> Self {
        Self {
            max_token_chars: max_token_chars.max(1),
        }
    }
}

impl Default for WordTokenizer {
    fn default() -> Self {
        Self::new(64)
    }
}

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> std::result::Result<Vec<String>, ChunkError> {
        let mut tokens = Vec::new();
        for word in text.split_whitespace() {
            if word.chars().count() <= self.max_token_chars {
                tokens.push(word.to_string());
                continue;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(self.max_token_chars) {
                tokens.push(piece.iter().collect());
            }
        }
        Ok(tokens)
    }
}

/// Build the tokenizer named in the model configuration
///
/// # Errors
///
/// Returns [`ScanError::TokenizerInit`] for an unknown tokenizer name.
pub fn build_tokenizer(config: &ModelConfig) -> Result<Arc<dyn Tokenizer>> {
    match config.tokenizer.to_lowercase().as_str() {
        WORD_TOKENIZER => Ok(Arc::new(WordTokenizer::new(config.max_token_chars))),
        other => Err(ScanError::TokenizerInit(format!(
            "Unknown tokenizer '{}'. Supported: {}",
            other, WORD_TOKENIZER
        ))),
    }
}

/// Packs tokens into model-sized chunks
#[derive(Clone)]
pub struct Chunker {
    tokenizer: Arc<dyn Tokenizer>,
    max_length: usize,
    budget: usize,
}

impl Chunker {
    /// Create a chunker
    ///
    /// # Arguments
    ///
    /// * `tokenizer` - Tokenizer shared with the detection model
    /// * `max_length` - Model input limit in tokens
    /// * `reserved` - Slots kept free for the model's special tokens
    pub fn new(tokenizer: Arc<dyn Tokenizer>, max_length: usize, reserved: usize) -> Self {
        Self {
            tokenizer,
            max_length,
            budget: max_length.saturating_sub(reserved).max(1),
        }
    }

    /// Maximum number of tokens in one chunk
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Tokenize and pack text into chunks of tokens
    ///
    /// # Errors
    ///
    /// Propagates tokenizer failures; [`Chunker::chunk`] handles them.
    pub fn chunk_tokens(&self, text: &str) -> std::result::Result<Vec<Vec<String>>, ChunkError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let tokens = self.tokenizer.tokenize(text)?;

        let mut chunks = Vec::new();
        let mut current = Vec::with_capacity(self.budget);
        for token in tokens {
            if current.len() == self.budget {
                chunks.push(std::mem::take(&mut current));
            }
            current.push(token);
        }
        if !current.is_empty() {
            chunks.push(current);
        }
        Ok(chunks)
    }

    /// Split text into chunk strings
    ///
    /// Empty input yields no chunks. A tokenizer failure falls back to a
    /// single chunk holding the first `max_length` characters of the raw text.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        match self.chunk_tokens(text) {
            Ok(chunks) => {
                tracing::debug!(
                    chunks = chunks.len(),
                    budget = self.budget,
                    "Split text into chunks"
                );
                chunks
                    .iter()
                    .map(|tokens| self.tokenizer.join(tokens))
                    .collect()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Chunking failed, using truncated text");
                vec![text.chars().take(self.max_length).collect()]
            }
        }
    }
}

impl std::fmt::Debug for Chunker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunker")
            .field("max_length", &self.max_length)
            .field("budget", &self.budget)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenTokenizer;

    impl Tokenizer for BrokenTokenizer {
        fn tokenize(&self, _text: &str) -> std::result::Result<Vec<String>, ChunkError> {
            Err(ChunkError::Tokenize("vocabulary not loaded".into()))
        }
    }

    fn word_chunker(max_length: usize, reserved: usize) -> Chunker {
        Chunker::new(Arc::new(WordTokenizer::default()), max_length, reserved)
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        assert!(word_chunker(10, 2).chunk("").is_empty());
    }

    #[test]
    fn test_whitespace_only_has_no_chunks() {
        assert!(word_chunker(10, 2).chunk("  \n\t ").is_empty());
    }

    #[test]
    fn test_budget_subtracts_reserved() {
        assert_eq!(word_chunker(400, 2).budget(), 398);
        assert_eq!(word_chunker(2, 2).budget(), 1);
    }

    #[test]
    fn test_greedy_packing() {
        let chunker = word_chunker(5, 2);
        let chunks = chunker.chunk("one two three four five six seven");
        assert_eq!(chunks, vec!["one two three", "four five six", "seven"]);
    }

    #[test]
    fn test_whitespace_is_normalized() {
        let chunks = word_chunker(10, 2).chunk("Contact:\n\n  jane@example.com\t now");
        assert_eq!(chunks, vec!["Contact: jane@example.com now"]);
    }

    #[test]
    fn test_long_word_is_split() {
        let tokenizer = WordTokenizer::new(4);
        let tokens = tokenizer.tokenize("abcdefghij xy").unwrap();
        assert_eq!(tokens, vec!["abcd", "efgh", "ij", "xy"]);
    }

    #[test]
    fn test_long_word_split_respects_chars() {
        let tokenizer = WordTokenizer::new(2);
        let tokens = tokenizer.tokenize("éééé").unwrap();
        assert_eq!(tokens, vec!["éé", "éé"]);
    }

    #[test]
    fn test_tokenizer_failure_falls_back_to_truncated_text() {
        let chunker = Chunker::new(Arc::new(BrokenTokenizer), 5, 2);
        assert_eq!(chunker.chunk("abcdefghij"), vec!["abcde"]);
        assert!(chunker.chunk_tokens("abc").is_err());
    }

    #[test]
    fn test_build_tokenizer() {
        let config = ModelConfig::default();
        assert!(build_tokenizer(&config).is_ok());

        let config = ModelConfig {
            tokenizer: "bpe".into(),
            ..ModelConfig::default()
        };
        assert!(matches!(
            build_tokenizer(&config),
            Err(ScanError::TokenizerInit(_))
        ));
    }
}
