// In: src/tagging/mod.rs

//! This module defines the tagger seam of the pipeline.
//!
//! A `Tagger` turns a list of page texts into one `TaggedData` per text. The
//! `tag` entry point owns the contract every implementation shares (empty input,
//! preprocessing, one model call per batch, result validation); implementations
//! only provide `tag_batch`, the raw model call.

use serde::{Deserialize, Serialize};

use crate::error::BolimaError;

//==================================================================================
// 1. Module Declarations
//==================================================================================

pub mod adapter;
pub mod command;

#[cfg(test)]
pub(crate) mod stub;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================

pub use self::adapter::{tag_issue, Normalization};
pub use self::command::CommandTagger;

/// A text-to-text step applied to every input before the model sees it.
pub type Preprocessor = fn(&str) -> String;

/// The tagged tokens of one text, as parallel sequences.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TaggedData {
    pub token: Vec<String>,
    pub lemma: Vec<Option<String>>,
    pub pos: Vec<String>,
    #[serde(default)]
    pub xpos: Vec<Option<String>>,
    pub n_tokens: usize,
    pub n_words: usize,
}

impl TaggedData {
    pub fn len(&self) -> usize {
        self.token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.token.is_empty()
    }

    /// Checks that the parallel sequences line up. `xpos` may be omitted.
    pub fn validate(&self) -> Result<(), BolimaError> {
        let n = self.token.len();
        let xpos_ok = self.xpos.is_empty() || self.xpos.len() == n;
        if self.lemma.len() != n || self.pos.len() != n || !xpos_ok {
            return Err(BolimaError::TaggerError(format!(
                "misaligned tagger output: {} tokens, {} lemmas, {} pos, {} xpos",
                n,
                self.lemma.len(),
                self.pos.len(),
                self.xpos.len()
            )));
        }
        Ok(())
    }
}

/// **CONTRACT:** The trait every tagger backend implements.
pub trait Tagger {
    /// Tags already preprocessed texts in a single model call.
    fn tag_batch(&self, texts: &[String]) -> Result<Vec<TaggedData>, BolimaError>;

    /// Steps run, in order, on each text before `tag_batch`.
    fn preprocessors(&self) -> &[Preprocessor] {
        &[]
    }

    fn tag(&self, texts: &[String]) -> Result<Vec<TaggedData>, BolimaError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let prepared: Vec<String> = texts
            .iter()
            .map(|text| {
                self.preprocessors()
                    .iter()
                    .fold(text.clone(), |acc, step| step(&acc))
            })
            .collect();

        let tagged = self.tag_batch(&prepared)?;
        if tagged.len() != texts.len() {
            return Err(BolimaError::TaggerError(format!(
                "expected {} results, got {}",
                texts.len(),
                tagged.len()
            )));
        }
        for data in &tagged {
            data.validate()?;
        }
        Ok(tagged)
    }
}
