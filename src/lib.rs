//! # violation-tracker
//!
//! A library for following static-analysis findings across revisions of a file.
//!
//! Every time a file is re-analyzed, the rule engine reports its findings afresh.
//! Lines shift when code is inserted above them, code gets reformatted, messages
//! get reworded, and some findings carry no line at all. To report "new since
//! last analysis" counts and issue age, each fresh finding has to be recognized
//! as either new or the same finding as one recorded last time.
//!
//! `violation-tracker` does this for one file at a time by combining
//! whitespace-insensitive line checksums, an order-preserving line alignment of
//! the two revisions, and a tiered one-to-one matcher.
//!
//! ## Features
//!
//! - **Line checksums**: MD5 of each line with all whitespace removed
//! - **Line mapping**: Translates old line numbers past inserted or removed lines
//! - **Tiered matching**: Permanent id, checksum, line and message, in that order
//! - **Deterministic**: Greedy first-come matching driven only by input order
//! - **Closed findings**: Reports references that disappeared, with their new line
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use violation_tracker::{ReferenceViolation, Violation, ViolationMatcher};
//!
//! let current = vec![
//!     Violation::new("R50", "Indentation").with_line(3),
//!     Violation::new("R50", "Indentation").with_line(9),
//! ];
//! let reference = vec![ReferenceViolation::new(1, "R50", "Indentation", Utc::now()).with_line(3)];
//!
//! let matcher = ViolationMatcher::new();
//! let result = matcher.match_violations(&current, &reference, None, Utc::now());
//!
//! assert!(!result.is_new(0));
//! assert!(result.is_new(1));
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Violation records and identity types
//! - [`source`]: Line checksums and line mapping between revisions
//! - [`matching`]: Matching engine and its result types
//! - [`parsing`]: Loaders for JSON, TSV and CSV violation files
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod source;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::types::{MatchTier, ReferenceId, RuleKey};
pub use crate::core::violation::{ReferenceViolation, Violation};
pub use crate::matching::classification::{MatchResult, TrackedViolation, TrackingSummary};
pub use crate::matching::engine::{TrackingConfig, ViolationMatcher};
pub use crate::source::checksum::{checksums_of_file, normalized_checksum, ChecksumSet};
pub use crate::source::diff::{map_lines, LineDiffMapper, LineMap};
