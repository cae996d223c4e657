// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the boundary between the filesystem and the in-memory pipeline.
// Everything that reads or writes files lives here; the tagging and dispatch
// layers only ever see Arrow `RecordBatch`es.
//
// Data Flow (Input):
//
//   1. [load_corpus]   -> Reads Feather / Parquet / delimited text into one batch,
//         |               checks required columns, derives missing ones.
//         `-> 2. [IssueReader] -> Groups rows by title, yields `IssuePages` lazily
//                                 in sorted title order.
//
// Data Flow (Output):
//
//   1. [Dispatcher]    -> Hands a processed frame (or text) and a name to the sink.
//         |
//         `-> 2. [StorageSink] -> Feather file, or tab-delimited text that is
//                                 optionally gzip / bzip2 / xz compressed.
//
// ====================================================================================
pub mod format;
pub mod load;
pub mod reader;
pub mod sink;

pub use load::load_corpus;
pub use reader::{IssuePages, IssueReader};
pub use sink::{Payload, StorageSink};

#[cfg(test)]
mod tests;
