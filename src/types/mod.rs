//! This module defines the core, strongly-typed data representations that flow
//! through the tagging pipeline.
//!
//! It includes the `TaggedIssue` unit of work, the PoS tagset used to codify
//! frames and the fixed stopword list used for row filtering.

pub mod pos_tags;
pub mod stopwords;
pub mod tagged_issue;

// Re-export the main type(s) for easier access.
pub use pos_tags::{PosTagScheme, PUNCTUATION_TAGS, SUC};
pub use stopwords::{StopwordSet, STOPWORDS};
pub use tagged_issue::{safe_title, title_from_safe, TaggedIssue};
