// In: src/frame_pipeline/vocabulary.rs

//! The shared token/lemma vocabulary of an interning run.

use std::sync::Arc;

use arrow::array::{ArrayRef, RecordBatch, StringArray, UInt32Array};
use indexmap::IndexSet;

use crate::bridge::format::{COL_TOKEN, COL_TOKEN_ID};
use crate::error::BolimaError;

/// Maps each distinct string to a dense id, in first-seen order from 0.
///
/// Ids are never reassigned; the vocabulary only grows.
#[derive(Debug, Default, Clone)]
pub struct Vocabulary {
    words: IndexSet<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `word`, assigning the next free id on first sight.
    pub fn intern(&mut self, word: &str) -> u32 {
        let idx = match self.words.get_index_of(word) {
            Some(idx) => idx,
            None => self.words.insert_full(word.to_string()).0,
        };
        idx as u32
    }

    pub fn get(&self, word: &str) -> Option<u32> {
        self.words.get_index_of(word).map(|idx| idx as u32)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words in id order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// The `(token, token_id)` table in id order.
    pub fn to_batch(&self) -> Result<RecordBatch, BolimaError> {
        let tokens: ArrayRef = Arc::new(StringArray::from_iter_values(self.iter()));
        let ids: ArrayRef = Arc::new(UInt32Array::from_iter_values(0..self.len() as u32));
        Ok(RecordBatch::try_from_iter(vec![(COL_TOKEN, tokens), (COL_TOKEN_ID, ids)])?)
    }
}
