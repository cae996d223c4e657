// In: src/frame_pipeline/process.rs

//! Row filtering and column shaping of a tagged frame, shared by both strategies.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, RecordBatch};
use arrow::compute::filter_record_batch;

use crate::bridge::format::{COL_LEMMA, COL_POS, COL_TOKEN, COL_XPOS};
use crate::config::DispatchOptions;
use crate::error::BolimaError;
use crate::kernels::columns::{fill_nulls, lowercase};
use crate::types::pos_tags::is_punctuation;
use crate::types::StopwordSet;
use crate::utils::{drop_columns, has_column, replace_column, string_column};

fn lowercase_column(frame: &RecordBatch, name: &str) -> Result<RecordBatch, BolimaError> {
    if !has_column(frame, name) {
        return Ok(frame.clone());
    }
    let lowered = lowercase(&string_column(frame, name)?);
    replace_column(frame, name, Arc::new(lowered))
}

/// Builds the keep-mask for stopword and punctuation rows, or `None` when no
/// row filter is enabled.
fn row_mask(
    frame: &RecordBatch,
    options: &DispatchOptions,
    stopwords: &StopwordSet,
) -> Result<Option<BooleanArray>, BolimaError> {
    if !options.drop_stopword_rows && !options.drop_punctuation_rows {
        return Ok(None);
    }
    let tokens = string_column(frame, COL_TOKEN)?;
    let pos = string_column(frame, COL_POS)?;

    let mask = tokens
        .iter()
        .zip(pos.iter())
        .map(|(token, tag)| {
            let stop = options.drop_stopword_rows && token.map_or(false, |t| stopwords.contains(t));
            let punct = options.drop_punctuation_rows && tag.map_or(false, is_punctuation);
            Some(!(stop || punct))
        })
        .collect();
    Ok(Some(mask))
}

/// Applies casing, row filters and column drops to a (rebased) tagged frame.
///
/// Surviving rows keep their relative order. Unless the lemma column is dropped,
/// missing lemmas are filled with `""` whether or not casing is applied; a lemma
/// still missing after the fill is a `ConsistencyError`.
pub fn process_frame(
    frame: &RecordBatch,
    options: &DispatchOptions,
    stopwords: &StopwordSet,
) -> Result<RecordBatch, BolimaError> {
    let mut frame = frame.clone();

    if options.lowercase {
        frame = lowercase_column(&frame, COL_TOKEN)?;
        frame = lowercase_column(&frame, COL_LEMMA)?;
    }

    frame = drop_columns(&frame, &[COL_XPOS])?;

    if let Some(mask) = row_mask(&frame, options, stopwords)? {
        frame = filter_record_batch(&frame, &mask)?;
    }

    let mut drop: Vec<&str> = Vec::new();
    if options.drop_token_text {
        drop.push(COL_TOKEN);
    }
    if options.drop_lemma_column {
        drop.push(COL_LEMMA);
    } else {
        let mut lemmas = string_column(&frame, COL_LEMMA)?;
        if options.lowercase {
            lemmas = lowercase(&lemmas);
        }
        let lemmas = fill_nulls(&lemmas, "");
        if lemmas.null_count() > 0 {
            return Err(BolimaError::ConsistencyError(format!(
                "{} row(s) have no lemma after fill",
                lemmas.null_count()
            )));
        }
        let lemmas: ArrayRef = Arc::new(lemmas);
        frame = replace_column(&frame, COL_LEMMA, lemmas)?;
    }

    drop_columns(&frame, &drop)
}
