// In: src/bridge/reader.rs

//! The issue reader: yields a corpus one issue at a time, in sorted title order.

use std::collections::btree_map;
use std::path::Path;

use arrow::array::RecordBatch;

use super::format::COL_TITLE;
use super::load::{load_corpus, prepare_corpus};
use crate::error::BolimaError;
use crate::utils::{create_index_map, take_rows};

/// The pages of one issue, in corpus order.
#[derive(Debug, Clone)]
pub struct IssuePages {
    pub title: String,
    /// Row position of each page in the source corpus.
    pub positions: Vec<u32>,
    pub pages: RecordBatch,
}

impl IssuePages {
    pub fn num_pages(&self) -> usize {
        self.pages.num_rows()
    }
}

/// A finite, single-pass iterator over the issues of a corpus.
///
/// Grouping happens once on construction; each issue's page table is only
/// materialized when the iterator reaches it.
pub struct IssueReader {
    corpus: RecordBatch,
    groups: btree_map::IntoIter<String, Vec<u32>>,
    total: usize,
    yielded: usize,
}

impl IssueReader {
    /// Creates a reader over an in-memory corpus table.
    pub fn new(corpus: RecordBatch) -> Result<Self, BolimaError> {
        Self::from_prepared(prepare_corpus(corpus)?)
    }

    /// Loads the corpus at `path` and creates a reader over it.
    pub fn open(path: &Path) -> Result<Self, BolimaError> {
        Self::from_prepared(load_corpus(path)?)
    }

    fn from_prepared(corpus: RecordBatch) -> Result<Self, BolimaError> {
        let groups = create_index_map(&corpus, COL_TITLE)?;
        Ok(Self {
            corpus,
            total: groups.len(),
            groups: groups.into_iter(),
            yielded: 0,
        })
    }

    /// Number of issues in the corpus.
    pub fn num_issues(&self) -> usize {
        self.total
    }
}

impl Iterator for IssueReader {
    type Item = Result<IssuePages, BolimaError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (title, positions) = self.groups.next()?;
        self.yielded += 1;
        log::info!("[{}/{}] {}", self.yielded, self.total, title);

        Some(take_rows(&self.corpus, &positions).map(|pages| IssuePages {
            title,
            positions,
            pages,
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.groups.size_hint()
    }
}
