// In: src/frame_pipeline/strategies.rs
use std::path::PathBuf;
use std::sync::Arc;

use arrow::array::{ArrayRef, Int8Array, RecordBatch, UInt32Array};

use super::vocabulary::Vocabulary;
use super::DispatchStrategy;
use crate::bridge::format::{
    COL_LEMMA, COL_LEMMA_ID, COL_POS, COL_POS_ID, COL_TOKEN, COL_TOKEN_ID, VOCABULARY_NAME,
};
use crate::bridge::StorageSink;
use crate::error::BolimaError;
use crate::types::{PosTagScheme, SUC};
use crate::utils::{drop_columns, has_column, replace_column, string_column};

//==================================================================================
// --- Strategy 1: Text Frames ---
//==================================================================================

/// Persists token, lemma and PoS as text. Nothing is carried across issues.
#[derive(Debug, Default)]
pub struct TextFrameStrategy;

impl DispatchStrategy for TextFrameStrategy {
    fn name(&self) -> &'static str {
        "text"
    }

    fn process(&mut self, frame: RecordBatch) -> Result<RecordBatch, BolimaError> {
        Ok(frame)
    }

    fn finalize(&mut self, _sink: &StorageSink) -> Result<Option<PathBuf>, BolimaError> {
        Ok(None)
    }
}

//==================================================================================
// --- Strategy 2: Id Frames ---
//==================================================================================

/// Replaces token and lemma with ids from a run-wide vocabulary and PoS tags
/// with their tagset code. The vocabulary is persisted on finalize.
#[derive(Debug)]
pub struct IdFrameStrategy {
    vocabulary: Vocabulary,
    scheme: PosTagScheme,
}

impl IdFrameStrategy {
    pub fn new(scheme: PosTagScheme) -> Self {
        Self {
            vocabulary: Vocabulary::new(),
            scheme,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    fn intern_column(&mut self, frame: &RecordBatch, name: &str) -> Result<ArrayRef, BolimaError> {
        let words = string_column(frame, name)?;
        let ids: UInt32Array = words
            .iter()
            .map(|word| self.vocabulary.intern(word.unwrap_or_default()))
            .collect();
        Ok(Arc::new(ids))
    }
}

impl Default for IdFrameStrategy {
    fn default() -> Self {
        Self::new(SUC)
    }
}

impl DispatchStrategy for IdFrameStrategy {
    fn name(&self) -> &'static str {
        "id"
    }

    fn process(&mut self, frame: RecordBatch) -> Result<RecordBatch, BolimaError> {
        // PoS first: an unknown tag must fail the issue before the vocabulary grows.
        let pos_ids = string_column(&frame, COL_POS)?
            .iter()
            .map(|tag| tag.map(|tag| self.scheme.pos_to_id(tag)).transpose())
            .collect::<Result<Int8Array, BolimaError>>()?;

        let mut interned: Vec<(&str, ArrayRef)> = Vec::with_capacity(3);
        if has_column(&frame, COL_TOKEN) {
            interned.push((COL_TOKEN_ID, self.intern_column(&frame, COL_TOKEN)?));
        }
        if has_column(&frame, COL_LEMMA) {
            interned.push((COL_LEMMA_ID, self.intern_column(&frame, COL_LEMMA)?));
        }
        interned.push((COL_POS_ID, Arc::new(pos_ids)));

        let mut frame = drop_columns(&frame, &[COL_TOKEN, COL_LEMMA, COL_POS])?;
        for (name, array) in interned {
            frame = replace_column(&frame, name, array)?;
        }
        Ok(frame)
    }

    fn finalize(&mut self, sink: &StorageSink) -> Result<Option<PathBuf>, BolimaError> {
        log::info!("vocabulary: {} distinct tokens and lemmas", self.vocabulary.len());
        let path = sink.store_frame(VOCABULARY_NAME, &self.vocabulary.to_batch()?)?;
        Ok(Some(path))
    }
}
