//! This file is the root of the `bolima` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`bridge`, `kernels`, etc.)
//!     so the Rust compiler knows they exist.
//! 2.  Re-exporting the handful of types a caller needs to run the tagging workflow
//!     end to end: the configuration, the tagger seam, the dispatcher and the
//!     orchestrator entry points.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
pub mod observability; // Make macros available throughout the crate

pub mod bridge;
pub mod config;
pub mod error;
pub mod frame_pipeline;
pub mod kernels;
pub mod tagging;
pub mod types;
pub mod utils;
pub mod workflow;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use config::{DispatchOptions, FrameMode, StorageFormat, WorkflowConfig};
pub use error::BolimaError;
pub use frame_pipeline::Dispatcher;
pub use tagging::{CommandTagger, TaggedData, Tagger};
pub use types::TaggedIssue;
pub use workflow::{build_tagger, run_workflow, tag_issues, RunSummary};
