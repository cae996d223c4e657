//! This module defines the dispatch pipeline: the stateful tail of a tagging run
//! that rebases document ids into one corpus-wide id space, filters and shapes
//! each tagged frame, persists it, and writes the run's summary tables when the
//! run ends.
//!
//! The `Dispatcher` owns everything that spans issues (the id counter and the
//! accumulated document indexes). Whatever differs between text output and
//! vocabulary-id output lives behind the `DispatchStrategy` trait.

use std::path::PathBuf;

use arrow::record_batch::RecordBatch;

use crate::bridge::StorageSink;
use crate::config::FrameMode;
use crate::error::BolimaError;

//==================================================================================
// 1. Module Declarations
//==================================================================================

pub mod dispatcher;
pub mod process;
pub mod vocabulary;

mod strategies; // Concrete DispatchStrategy implementations

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use self::dispatcher::Dispatcher;
pub use self::process::process_frame;
pub use self::strategies::{IdFrameStrategy, TextFrameStrategy};
pub use self::vocabulary::Vocabulary;

/// **CONTRACT:** The mode-specific step of dispatch.
///
/// `process` receives a frame that is already rebased and filtered and returns the
/// frame to persist. `finalize` runs once at the end of a non-empty run and may
/// write extra tables through the sink.
pub trait DispatchStrategy {
    fn name(&self) -> &'static str;

    fn process(&mut self, frame: RecordBatch) -> Result<RecordBatch, BolimaError>;

    fn finalize(&mut self, sink: &StorageSink) -> Result<Option<PathBuf>, BolimaError>;
}

/// Creates the strategy for a frame mode.
pub fn strategy_for(mode: FrameMode) -> Box<dyn DispatchStrategy> {
    match mode {
        FrameMode::Text => Box::new(TextFrameStrategy),
        FrameMode::Codified => Box::new(IdFrameStrategy::default()),
    }
}
