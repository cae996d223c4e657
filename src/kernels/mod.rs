//! This module collects the pure, stateless kernels used by the tagging and
//! dispatch pipelines.
//!
//! Kernels never touch the filesystem and never hold state between calls. They
//! operate on plain strings or on single Arrow arrays; everything that needs a
//! whole `RecordBatch` or a sink lives in `frame_pipeline` or `bridge`.

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Text: confusable character folding before tagging.
pub mod normalize;

/// Text: word/punctuation splitting for pretokenized tagger input.
pub mod tokenize;

/// Columns: casing, null filling, id offsets and integer narrowing.
pub mod columns;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================

pub use self::normalize::{normalize_characters, CharGroup, CharNormalizer};
pub use self::tokenize::pretokenize;
