//! A deterministic in-process tagger for tests.
//!
//! Splits on word/punctuation boundaries, lemmatizes by lowercasing and tags
//! punctuation as `MAD`, everything else as `NN`.

use super::{TaggedData, Tagger};
use crate::error::BolimaError;
use crate::kernels::tokenize::tokenize;

#[derive(Debug, Default)]
pub struct StubTagger {
    /// Any batch containing a text with this substring fails.
    fail_on: Option<String>,
}

impl StubTagger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(marker: &str) -> Self {
        Self {
            fail_on: Some(marker.to_string()),
        }
    }
}

fn is_punct(token: &str) -> bool {
    token.chars().all(|c| !c.is_alphanumeric())
}

impl Tagger for StubTagger {
    fn tag_batch(&self, texts: &[String]) -> Result<Vec<TaggedData>, BolimaError> {
        if let Some(marker) = &self.fail_on {
            if texts.iter().any(|text| text.contains(marker.as_str())) {
                return Err(BolimaError::TaggerError(format!("stub refused '{}'", marker)));
            }
        }

        Ok(texts
            .iter()
            .map(|text| {
                let token: Vec<String> = tokenize(text).map(str::to_string).collect();
                let pos: Vec<String> = token
                    .iter()
                    .map(|t| if is_punct(t) { "MAD" } else { "NN" }.to_string())
                    .collect();
                TaggedData {
                    lemma: token.iter().map(|t| Some(t.to_lowercase())).collect(),
                    n_tokens: token.len(),
                    n_words: pos.iter().filter(|p| p.as_str() != "MAD").count(),
                    xpos: vec![None; token.len()],
                    token,
                    pos,
                }
            })
            .collect())
    }
}
