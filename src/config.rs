// In: src/config.rs

//! The single source of truth for all run configuration.
//!
//! `DispatchOptions` is created once at the application boundary (CLI flags or a
//! deserialized document) and is read-only for the rest of the run. The
//! `WorkflowConfig` wraps it together with the locations and tagger settings the
//! orchestrator needs.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BolimaError;

//==================================================================================
// I. Storage & Frame Modes
//==================================================================================

/// The on-disk format used by the storage sink for every table it writes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageFormat {
    /// **Default:** Arrow IPC file (Feather v2), the columnar round-trip format.
    #[default]
    Feather,
    /// Tab-delimited text.
    Csv,
    /// Tab-delimited text through a gzip stream.
    Gzip,
    /// Tab-delimited text through a bzip2 stream.
    Bz2,
    /// Tab-delimited text through an xz (lzma) stream.
    Lzma,
}

impl StorageFormat {
    pub const ALL: [StorageFormat; 5] = [
        StorageFormat::Feather,
        StorageFormat::Csv,
        StorageFormat::Gzip,
        StorageFormat::Bz2,
        StorageFormat::Lzma,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageFormat::Feather => "feather",
            StorageFormat::Csv => "csv",
            StorageFormat::Gzip => "gzip",
            StorageFormat::Bz2 => "bz2",
            StorageFormat::Lzma => "lzma",
        }
    }

    /// The extension appended to text files written in this format, if compressed.
    pub fn compressed_extension(&self) -> Option<&'static str> {
        match self {
            StorageFormat::Gzip => Some("gz"),
            StorageFormat::Bz2 => Some("bz2"),
            StorageFormat::Lzma => Some("xz"),
            StorageFormat::Feather | StorageFormat::Csv => None,
        }
    }
}

impl FromStr for StorageFormat {
    type Err = BolimaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        StorageFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == value)
            .ok_or_else(|| {
                BolimaError::ConfigurationError(format!(
                    "unknown storage format '{}' (expected one of feather, csv, gzip, bz2, lzma)",
                    value
                ))
            })
    }
}

impl fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether persisted token frames carry text or vocabulary ids.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FrameMode {
    /// Token, lemma and PoS columns are stored as text.
    Text,
    /// **Default:** Token and lemma are interned into a shared vocabulary and PoS
    /// tags are replaced by their tagset code.
    #[default]
    Codified,
}

impl FrameMode {
    pub fn from_codify(codify: bool) -> Self {
        if codify {
            FrameMode::Codified
        } else {
            FrameMode::Text
        }
    }
}

//==================================================================================
// II. Dispatch Options
//==================================================================================

/// Filtering, casing and column-selection policy applied to every tagged frame.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct DispatchOptions {
    #[serde(default)]
    pub storage_format: StorageFormat,

    /// Lowercase `token` and `lemma` before filtering.
    #[serde(default = "default_true")]
    pub lowercase: bool,

    /// Drop the `token` column from the persisted frame.
    #[serde(default = "default_true")]
    pub drop_token_text: bool,

    /// Drop rows whose lowercased token is a stopword.
    #[serde(default)]
    pub drop_stopword_rows: bool,

    /// Drop rows tagged as punctuation (`MID`, `MAD`, `PAD`).
    #[serde(default = "default_true")]
    pub drop_punctuation_rows: bool,

    /// Drop the `lemma` column from the persisted frame.
    #[serde(default)]
    pub drop_lemma_column: bool,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            storage_format: StorageFormat::default(),
            lowercase: true,
            drop_token_text: true,
            drop_stopword_rows: false,
            drop_punctuation_rows: true,
            drop_lemma_column: false,
        }
    }
}

//==================================================================================
// III. The Unified WorkflowConfig
//==================================================================================

/// Default location of the tagger models.
pub const DEFAULT_MODEL_ROOT: &str = "/data/sparv/models/stanza";

/// Default external tagger executable.
pub const DEFAULT_TAGGER_PROGRAM: &str = "stanza-tagger";

/// Everything the workflow orchestrator needs for one end-to-end run.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "snake_case")]
pub struct WorkflowConfig {
    pub source: PathBuf,
    pub target: PathBuf,

    /// Persist vocabulary ids instead of text.
    #[serde(default)]
    pub frame_mode: FrameMode,

    /// Remove an existing target folder instead of failing.
    #[serde(default)]
    pub force: bool,

    /// Normalize confusable characters before tagging.
    #[serde(default = "default_true")]
    pub normalize_chars: bool,

    #[serde(default)]
    pub dispatch: DispatchOptions,

    #[serde(default = "default_model_root")]
    pub model_root: PathBuf,

    #[serde(default = "default_tagger_program")]
    pub tagger_program: String,

    /// Extra arguments passed to the tagger program after `--model-root`.
    #[serde(default)]
    pub tagger_args: Vec<String>,
}

impl WorkflowConfig {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            frame_mode: FrameMode::default(),
            force: false,
            normalize_chars: true,
            dispatch: DispatchOptions::default(),
            model_root: default_model_root(),
            tagger_program: default_tagger_program(),
            tagger_args: Vec::new(),
        }
    }
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}

fn default_model_root() -> PathBuf {
    PathBuf::from(DEFAULT_MODEL_ROOT)
}

fn default_tagger_program() -> String {
    DEFAULT_TAGGER_PROGRAM.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_format_parses_known_values() {
        for format in StorageFormat::ALL {
            assert_eq!(format.as_str().parse::<StorageFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_storage_format_rejects_unknown_value() {
        let err = "zip".parse::<StorageFormat>().unwrap_err();
        assert!(matches!(err, BolimaError::ConfigurationError(_)));
        assert!(err.to_string().contains("zip"));
    }

    #[test]
    fn test_dispatch_options_defaults_from_empty_document() {
        let opts: DispatchOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, DispatchOptions::default());
        assert!(opts.lowercase && opts.drop_token_text && opts.drop_punctuation_rows);
        assert!(!opts.drop_stopword_rows && !opts.drop_lemma_column);
    }

    #[test]
    fn test_workflow_config_serde_uses_snake_case_formats() {
        let json = r#"{"source": "a.csv", "target": "out", "dispatch": {"storage_format": "bz2"}}"#;
        let config: WorkflowConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.dispatch.storage_format, StorageFormat::Bz2);
        assert_eq!(config.frame_mode, FrameMode::Codified);
        assert_eq!(config.tagger_program, DEFAULT_TAGGER_PROGRAM);
    }
}
