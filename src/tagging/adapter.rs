// In: src/tagging/adapter.rs

//! Turns the pages of one issue into a `TaggedIssue`.

use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, RecordBatch, StringArray};

use super::Tagger;
use crate::bridge::format::{
    COL_DOCUMENT_ID, COL_INDEX, COL_LEMMA, COL_N_TOKENS, COL_N_WORDS, COL_POS, COL_TEXT, COL_TOKEN,
};
use crate::bridge::IssuePages;
use crate::error::BolimaError;
use crate::kernels::CharNormalizer;
use crate::types::TaggedIssue;
use crate::utils::{drop_columns, insert_column, replace_column, string_column};

/// Character normalization applied to page texts before tagging.
#[derive(Debug, Clone)]
pub enum Normalization {
    Off,
    Chars(CharNormalizer),
}

impl Normalization {
    /// All confusable groups when `enabled`, nothing otherwise.
    pub fn from_flag(enabled: bool) -> Self {
        if enabled {
            Normalization::Chars(CharNormalizer::all())
        } else {
            Normalization::Off
        }
    }

    pub fn apply(&self, text: &str) -> String {
        match self {
            Normalization::Off => text.to_string(),
            Normalization::Chars(normalizer) => normalizer.normalize(text),
        }
    }
}

impl Default for Normalization {
    fn default() -> Self {
        Normalization::from_flag(true)
    }
}

/// Tags every page of `issue` in one tagger call.
///
/// The document index keeps the page columns except `text`, gains `index` (the
/// page's row in the source corpus) in front and `n_tokens`, `n_words` and a
/// local `document_id` at the end. The tagged frame has `token`, `lemma`, `pos`
/// and the page's local `document_id`.
pub fn tag_issue(
    tagger: &dyn Tagger,
    issue: &IssuePages,
    normalization: &Normalization,
) -> Result<TaggedIssue, BolimaError> {
    let texts: Vec<String> = string_column(&issue.pages, COL_TEXT)?
        .iter()
        .map(|text| normalization.apply(text.unwrap_or_default()))
        .collect();

    let tagged = tagger.tag(&texts)?;

    let mut tokens: Vec<&str> = Vec::new();
    let mut lemmas: Vec<Option<&str>> = Vec::new();
    let mut pos: Vec<&str> = Vec::new();
    let mut frame_ids: Vec<i64> = Vec::new();
    for (document_id, data) in tagged.iter().enumerate() {
        tokens.extend(data.token.iter().map(String::as_str));
        lemmas.extend(data.lemma.iter().map(Option::as_deref));
        pos.extend(data.pos.iter().map(String::as_str));
        frame_ids.extend(std::iter::repeat(document_id as i64).take(data.len()));
    }

    let tagged_frame = RecordBatch::try_from_iter(vec![
        (COL_TOKEN, Arc::new(StringArray::from(tokens)) as ArrayRef),
        (COL_LEMMA, Arc::new(StringArray::from(lemmas)) as ArrayRef),
        (COL_POS, Arc::new(StringArray::from(pos)) as ArrayRef),
        (COL_DOCUMENT_ID, Arc::new(Int64Array::from(frame_ids)) as ArrayRef),
    ])?;

    let positions: ArrayRef = Arc::new(Int64Array::from_iter_values(
        issue.positions.iter().map(|&p| i64::from(p)),
    ));
    let n_tokens: ArrayRef = Arc::new(Int64Array::from_iter_values(
        tagged.iter().map(|data| data.n_tokens as i64),
    ));
    let n_words: ArrayRef = Arc::new(Int64Array::from_iter_values(
        tagged.iter().map(|data| data.n_words as i64),
    ));
    let local_ids: ArrayRef = Arc::new(Int64Array::from_iter_values(0..issue.num_pages() as i64));

    let document_index = drop_columns(&issue.pages, &[COL_TEXT, COL_DOCUMENT_ID, COL_INDEX])?;
    let document_index = insert_column(&document_index, 0, COL_INDEX, positions)?;
    let document_index = replace_column(&document_index, COL_N_TOKENS, n_tokens)?;
    let document_index = replace_column(&document_index, COL_N_WORDS, n_words)?;
    let document_index = replace_column(&document_index, COL_DOCUMENT_ID, local_ids)?;

    let issue = TaggedIssue::new(issue.title.clone(), document_index, tagged_frame)?;
    issue.check_document_ids()?;
    Ok(issue)
}
