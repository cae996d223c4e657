// In: src/frame_pipeline/dispatcher.rs

//! The per-run dispatcher.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::RecordBatch;
use arrow::compute::concat_batches;

use super::process::process_frame;
use super::{strategy_for, DispatchStrategy};
use crate::bridge::format::{
    COL_DOCUMENT_ID, COL_NUM_TOKENS, COL_N_TOKENS, DOCUMENT_INDEX_NAME, DOWNCAST_INDEX_COLUMNS,
};
use crate::bridge::{Payload, StorageSink};
use crate::config::{DispatchOptions, FrameMode};
use crate::error::BolimaError;
use crate::kernels::columns::{add_offset, downcast_integers};
use crate::types::{StopwordSet, TaggedIssue};
use crate::utils::{column, has_column, int64_column, rename_column, replace_column};

/// Adds `offset` to the `document_id` column of `batch`.
fn rebase(batch: &RecordBatch, offset: i64) -> Result<RecordBatch, BolimaError> {
    let ids = add_offset(&int64_column(batch, COL_DOCUMENT_ID)?, offset);
    replace_column(batch, COL_DOCUMENT_ID, Arc::new(ids))
}

/// Persists tagged issues into a target folder and writes the run's document
/// index (and, in id mode, the vocabulary) when the run ends.
///
/// Document ids are rebased into one gap-free, strictly increasing id space: the
/// first page of the first dispatched issue gets id 0 and each issue continues
/// where the previous one stopped.
///
/// The summary tables are written by `close()`. A dispatcher dropped without
/// `close()` writes them from `Drop` instead.
pub struct Dispatcher {
    sink: StorageSink,
    options: DispatchOptions,
    stopwords: StopwordSet,
    strategy: Box<dyn DispatchStrategy>,
    next_document_id: i64,
    issue_indexes: Vec<RecordBatch>,
    finalized: bool,
}

impl Dispatcher {
    /// Creates the target folder and a dispatcher writing into it.
    pub fn open(target: &Path, options: DispatchOptions, mode: FrameMode) -> Result<Self, BolimaError> {
        Self::open_with_strategy(target, options, strategy_for(mode))
    }

    pub fn open_with_strategy(
        target: &Path,
        options: DispatchOptions,
        strategy: Box<dyn DispatchStrategy>,
    ) -> Result<Self, BolimaError> {
        fs::create_dir_all(target)?;
        log::info!(
            "dispatching {} frames to {} as {}",
            strategy.name(),
            target.display(),
            options.storage_format
        );
        Ok(Self {
            sink: StorageSink::new(target, options.storage_format),
            options,
            stopwords: StopwordSet::new(),
            strategy,
            next_document_id: 0,
            issue_indexes: Vec::new(),
            finalized: false,
        })
    }

    pub fn sink(&self) -> &StorageSink {
        &self.sink
    }

    /// The id the next dispatched page will get; also the number of pages dispatched.
    pub fn next_document_id(&self) -> i64 {
        self.next_document_id
    }

    pub fn num_dispatched(&self) -> usize {
        self.issue_indexes.len()
    }

    /// Rebases, processes and persists one issue. Returns the path of its frame.
    ///
    /// The counter and the accumulated index only move once the frame is on disk,
    /// so a failing issue leaves no trace in the id space.
    pub fn dispatch(&mut self, issue: &TaggedIssue) -> Result<PathBuf, BolimaError> {
        if self.finalized {
            return Err(BolimaError::WorkflowError(format!(
                "cannot dispatch {} after the run was finalized",
                issue.title
            )));
        }

        let offset = self.next_document_id;
        let document_index = rebase(&issue.document_index, offset)?;
        let frame = rebase(&issue.tagged_frame, offset)?;

        let processed = process_frame(&frame, &self.options, &self.stopwords)?;
        let rows_kept = processed.num_rows();
        let output = self.strategy.process(processed)?;

        let path = self.sink.store(&issue.filename(), Payload::Frame(&output))?;

        let pages = document_index.num_rows();
        self.next_document_id += pages as i64;
        self.issue_indexes.push(document_index);

        crate::log_metric!(
            "event" = "dispatch",
            "title" = &issue.title,
            "pages" = pages,
            "first_id" = offset,
            "rows_kept" = rows_kept,
            "rows_dropped" = frame.num_rows() - rows_kept
        );
        Ok(path)
    }

    /// Writes the document index (and strategy output) once. Later calls and
    /// calls on an empty run are no-ops returning `None`.
    pub fn finalize(&mut self) -> Result<Option<PathBuf>, BolimaError> {
        if self.finalized {
            return Ok(None);
        }
        self.finalized = true;

        let Some(first) = self.issue_indexes.first() else {
            log::info!("no issues dispatched; nothing to finalize");
            return Ok(None);
        };

        let mut index = concat_batches(&first.schema(), &self.issue_indexes)?;
        if has_column(&index, COL_NUM_TOKENS) && !has_column(&index, COL_N_TOKENS) {
            index = rename_column(&index, COL_NUM_TOKENS, COL_N_TOKENS)?;
        }
        for name in DOWNCAST_INDEX_COLUMNS {
            if has_column(&index, name) {
                let narrowed = downcast_integers(column(&index, name)?)?;
                index = replace_column(&index, name, narrowed)?;
            }
        }

        let path = self.sink.store_frame(DOCUMENT_INDEX_NAME, &index)?;
        self.strategy.finalize(&self.sink)?;
        log::info!(
            "finalized {} issues, {} documents into {}",
            self.issue_indexes.len(),
            self.next_document_id,
            self.sink.folder().display()
        );
        Ok(Some(path))
    }

    /// Finalizes and releases the dispatcher.
    pub fn close(mut self) -> Result<Option<PathBuf>, BolimaError> {
        self.finalize()
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        if self.finalized {
            return;
        }
        if let Err(e) = self.finalize() {
            log::error!(
                "failed to finalize {}: {}",
                self.sink.folder().display(),
                e
            );
        }
    }
}
