//! Violation matching engine.
//!
//! This module provides the reconciliation of two analyses of one file:
//!
//! - [`ViolationMatcher`]: Main entry point, pairs current and reference violations
//! - [`MatchResult`]: One classification per current violation plus closed references
//! - [`TrackingConfig`]: Message width and checksum derivation settings
//!
//! ## Matching Algorithm
//!
//! Matching runs as a sequence of tiers, strongest signal first:
//!
//! 1. **Permanent id**: equal permanent ids, regardless of anything else
//! 2. **Checksum + line**: same rule, same checksum, same translated line
//! 3. **Checksum**: same rule, same checksum
//! 4. **Line + message**: same rule, same translated line, same stored message
//! 5. **No line + message**: same rule, no line on either side, same stored message
//!
//! Each tier is a greedy first-come pass over what earlier tiers left, so each
//! side is used at most once and results depend only on input order.
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use violation_tracker::{ReferenceViolation, Violation, ViolationMatcher};
//!
//! let created = Utc::now();
//! let current = vec![Violation::new("R1", "Avoid magic numbers").with_line(12)];
//! let reference = vec![ReferenceViolation::new(7, "R1", "Avoid magic numbers", created).with_line(10)];
//!
//! let reference_source = "a\nb\nc\nd\ne\nf\ng\nh\ni\nconst X = 42;";
//! let current_source = "new\nnew\na\nb\nc\nd\ne\nf\ng\nh\ni\nconst X = 42;";
//!
//! let result = ViolationMatcher::new().match_with_sources(
//!     &current,
//!     &reference,
//!     reference_source,
//!     current_source,
//!     Utc::now(),
//! );
//! assert!(!result.is_new(0));
//! ```

pub mod classification;
pub mod engine;
pub mod tiers;

pub use classification::{MatchResult, TrackedViolation, TrackingSummary};
pub use engine::{TrackingConfig, ViolationMatcher};
