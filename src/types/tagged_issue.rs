// In: src/types/tagged_issue.rs

//! The unit of work handed from the tagging adapter to the dispatcher.
//!
//! A `TaggedIssue` pairs a page-level document index with a token-level frame.
//! Both tables carry a `document_id` column; until the dispatcher rebases them
//! the ids are local to the issue, starting at 0.

use std::fs;
use std::path::{Path, PathBuf};

use arrow::array::RecordBatch;

use crate::bridge::format::{
    COL_DOCUMENT_ID, CSV_EXTENSION, ISSUE_INDEX_SUFFIX, SAFE_TITLE_MARKER, TITLE_RESERVED_CHAR,
};
use crate::bridge::load::{read_delimited, read_delimited_keep_empty};
use crate::bridge::sink::render_delimited;
use crate::error::BolimaError;
use crate::utils::int64_column;

/// Maps a title to a name that is safe to use as a file name (`:` -> `_#`).
pub fn safe_title(title: &str) -> String {
    title.replace(TITLE_RESERVED_CHAR, SAFE_TITLE_MARKER)
}

/// Inverse of `safe_title`.
pub fn title_from_safe(name: &str) -> String {
    name.replace(SAFE_TITLE_MARKER, &TITLE_RESERVED_CHAR.to_string())
}

#[derive(Debug, Clone)]
pub struct TaggedIssue {
    pub title: String,
    /// One row per page.
    pub document_index: RecordBatch,
    /// One row per token.
    pub tagged_frame: RecordBatch,
}

impl TaggedIssue {
    /// Creates a tagged issue. The title must be non-empty and must survive the
    /// filename-safe transform unchanged in both directions.
    pub fn new(
        title: impl Into<String>,
        document_index: RecordBatch,
        tagged_frame: RecordBatch,
    ) -> Result<Self, BolimaError> {
        let title = title.into();
        if title.is_empty() || title.contains(SAFE_TITLE_MARKER) {
            return Err(BolimaError::InvalidTitle(title));
        }
        Ok(Self {
            title,
            document_index,
            tagged_frame,
        })
    }

    pub fn safe_title(&self) -> String {
        safe_title(&self.title)
    }

    /// Name of the issue's token frame, e.g. `BLM-1943_#1.csv`.
    pub fn filename(&self) -> String {
        format!("{}.{}", self.safe_title(), CSV_EXTENSION)
    }

    /// Name of the issue's stored document index, e.g. `BLM-1943_#1_document_index.csv`.
    pub fn index_name(&self) -> String {
        format!("{}{}", self.safe_title(), ISSUE_INDEX_SUFFIX)
    }

    pub fn num_documents(&self) -> usize {
        self.document_index.num_rows()
    }

    /// Checks that every `document_id` in the frame is present in the index.
    pub fn check_document_ids(&self) -> Result<(), BolimaError> {
        let known: hashbrown::HashSet<i64> = int64_column(&self.document_index, COL_DOCUMENT_ID)?
            .iter()
            .flatten()
            .collect();
        let frame_ids = int64_column(&self.tagged_frame, COL_DOCUMENT_ID)?;
        match frame_ids.iter().find(|id| !id.map_or(false, |id| known.contains(&id))) {
            None => Ok(()),
            Some(id) => Err(BolimaError::ConsistencyError(format!(
                "{}: document_id {:?} of the tagged frame is not in the document index",
                self.title, id
            ))),
        }
    }

    //==============================================================================
    // Persistence
    //==============================================================================

    /// Writes the frame and the document index as tab-delimited files into `folder`.
    pub fn store(&self, folder: &Path) -> Result<(PathBuf, PathBuf), BolimaError> {
        fs::create_dir_all(folder)?;
        let frame_path = folder.join(self.filename());
        let index_path = folder.join(self.index_name());
        fs::write(&frame_path, render_delimited(&self.tagged_frame, b'\t')?)?;
        fs::write(&index_path, render_delimited(&self.document_index, b'\t')?)?;
        Ok((frame_path, index_path))
    }

    /// Loads an issue previously written by `store`.
    ///
    /// Empty token-table fields come back as `""`; a lemma that was null when
    /// stored therefore reloads as `""` too.
    pub fn load(folder: &Path, title: &str) -> Result<Self, BolimaError> {
        let safe = safe_title(title);
        let frame_path = folder.join(format!("{}.{}", safe, CSV_EXTENSION));
        let index_path = folder.join(format!("{}{}", safe, ISSUE_INDEX_SUFFIX));
        for path in [&frame_path, &index_path] {
            if !path.is_file() {
                return Err(BolimaError::NotFoundError(path.display().to_string()));
            }
        }
        let tagged_frame = read_delimited_keep_empty(&frame_path, b'\t')?;
        let document_index = read_delimited(&index_path, b'\t')?;
        Self::new(title, document_index, tagged_frame)
    }

    /// Titles of all issues stored in `folder`, sorted.
    pub fn find(folder: &Path) -> Result<Vec<String>, BolimaError> {
        let mut titles = Vec::new();
        for entry in fs::read_dir(folder)? {
            let name = entry?.file_name();
            if let Some(safe) = name.to_str().and_then(|n| n.strip_suffix(ISSUE_INDEX_SUFFIX)) {
                titles.push(title_from_safe(safe));
            }
        }
        titles.sort();
        Ok(titles)
    }

    pub fn load_all(folder: &Path) -> Result<Vec<Self>, BolimaError> {
        Self::find(folder)?
            .iter()
            .map(|title| Self::load(folder, title))
            .collect()
    }
}
