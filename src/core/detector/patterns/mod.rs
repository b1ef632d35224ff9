//! Pattern library for the built-in classifier

use crate::domain::{Result, ScanError};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Pattern definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Label reported for matches
    pub label: String,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f32,
    /// Regex patterns for this label
    pub patterns: Vec<String>,
}

/// Compiled pattern with metadata
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Compiled regex
    pub regex: Regex,
    /// Label as written in the library
    pub label: String,
    /// Confidence score
    pub confidence: f32,
}

/// Pattern library container
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    patterns: BTreeMap<String, PatternDefinition>,
}

/// Compiled pattern library, grouped by label
#[derive(Debug)]
pub struct PatternRegistry {
    patterns: Vec<CompiledPattern>,
}

impl PatternRegistry {
    /// Load a registry from a TOML pattern library
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::ModelInit`] when the file cannot be read or
    /// holds an invalid library.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScanError::ModelInit(format!(
                "Failed to read pattern library {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Create a registry from TOML content
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::ModelInit`] for malformed TOML, an invalid
    /// confidence, an empty label or a regex that does not compile.
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibrary = toml::from_str(content).map_err(|e| {
            ScanError::ModelInit(format!("Failed to parse pattern library TOML: {}", e))
        })?;

        let mut patterns = Vec::new();
        for (name, def) in library.patterns {
            if def.label.trim().is_empty() {
                return Err(ScanError::ModelInit(format!(
                    "Pattern '{}' has an empty label",
                    name
                )));
            }
            if !(0.0..=1.0).contains(&def.confidence) {
                return Err(ScanError::ModelInit(format!(
                    "Pattern '{}' confidence must be between 0.0 and 1.0, got {}",
                    name, def.confidence
                )));
            }

            for pattern_str in &def.patterns {
                let regex = Regex::new(pattern_str).map_err(|e| {
                    ScanError::ModelInit(format!(
                        "Invalid regex in pattern '{}': {}: {}",
                        name, pattern_str, e
                    ))
                })?;
                patterns.push(CompiledPattern {
                    regex,
                    label: def.label.clone(),
                    confidence: def.confidence,
                });
            }
        }

        Ok(Self { patterns })
    }

    /// Create a registry from the embedded default library
    pub fn default_patterns() -> Result<Self> {
        let default_toml = include_str!("../../../../patterns/pii_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// Get all patterns
    pub fn all_patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Patterns whose label matches, ignoring case
    pub fn patterns_for_label<'a>(
        &'a self,
        label: &'a str,
    ) -> impl Iterator<Item = &'a CompiledPattern> + 'a {
        self.patterns
            .iter()
            .filter(move |p| p.label.eq_ignore_ascii_case(label))
    }

    /// Distinct labels the library can produce
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.patterns.iter().map(|p| p.label.as_str()).collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }
}
