//! Core data types for violation tracking.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Violation`]: A finding raised by the current analysis of a file
//! - [`ReferenceViolation`]: A finding recorded by the previous analysis, read-only
//! - [`RuleKey`], [`ReferenceId`]: Identity types
//! - [`MatchTier`]: Which matching strategy paired two findings
//!
//! ## Identity
//!
//! Findings are compared on several partial keys, any of which may be absent:
//!
//! | Key | Current side | Reference side |
//! |-----|--------------|----------------|
//! | rule key | always | always |
//! | line | optional | optional |
//! | checksum | optional | optional |
//! | permanent id | optional | optional |
//!
//! A rule key match is mandatory for everything except the permanent id.

pub mod types;
pub mod violation;

pub use types::{MatchTier, ReferenceId, RuleKey};
pub use violation::{ReferenceViolation, Violation};
