//! Loaders for violation lists produced by the surrounding analysis pipeline.
//!
//! This module provides parsers for:
//!
//! - **JSON files**: An array of violation objects
//! - **TSV/CSV files**: Tabular violation records, one per line; CSV fields
//!   may be quoted
//!
//! ## Example
//!
//! ```rust
//! use violation_tracker::parsing::tsv::parse_violations_text;
//!
//! let tsv = "rule_key\tline\tmessage\nsquid:S100\t12\tRename this method\n";
//! let violations = parse_violations_text(tsv, '\t').unwrap();
//! assert_eq!(violations[0].line, Some(12));
//! ```
//!
//! ## Columns
//!
//! | Column | Current | Reference | Required |
//! |--------|---------|-----------|----------|
//! | id | - | yes | Reference only |
//! | rule_key | yes | yes | Yes |
//! | line | yes | yes | No |
//! | message | yes | yes | No |
//! | checksum | yes | yes | No |
//! | permanent_id | yes | yes | No |
//! | created_at | - | yes | Reference only (RFC 3339) |

use std::path::Path;

use thiserror::Error;

use crate::core::types::RuleKey;
use crate::core::violation::{ReferenceViolation, Violation};
use crate::utils::validation::{normalize_checksum, validate_line, validate_rule_key, ValidationError};

pub mod json;
pub mod tsv;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid violation file format: {0}")]
    InvalidFormat(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Delimited file error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid violation record: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Too many violations: {0} exceeds maximum allowed (1000000)")]
    TooManyViolations(usize),
}

/// Supported input formats, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Tsv,
    Csv,
}

impl InputFormat {
    /// Detect the format from a file extension
    ///
    /// # Errors
    ///
    /// Returns `ParseError::UnsupportedFormat` for unknown or missing extensions.
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("tsv" | "txt") => Ok(Self::Tsv),
            Some("csv") => Ok(Self::Csv),
            Some(ext) => Err(ParseError::UnsupportedFormat(ext.to_string())),
            None => Err(ParseError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Load current violations from a JSON, TSV or CSV file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::UnsupportedFormat`
/// for unknown extensions, or the parse errors of the format-specific parser.
pub fn load_violations(path: &Path) -> Result<Vec<Violation>, ParseError> {
    let format = InputFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    match format {
        InputFormat::Json => json::parse_violations_json(&content),
        InputFormat::Tsv => tsv::parse_violations_text(&content, '\t'),
        InputFormat::Csv => tsv::parse_violations_text(&content, ','),
    }
}

/// Load reference violations from a JSON, TSV or CSV file
///
/// # Errors
///
/// Same as [`load_violations`].
pub fn load_references(path: &Path) -> Result<Vec<ReferenceViolation>, ParseError> {
    let format = InputFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    match format {
        InputFormat::Json => json::parse_references_json(&content),
        InputFormat::Tsv => tsv::parse_references_text(&content, '\t'),
        InputFormat::Csv => tsv::parse_references_text(&content, ','),
    }
}

/// Validate and normalize the fields shared by both sides of the comparison
fn validate_fields(
    rule_key: &mut RuleKey,
    line: Option<u32>,
    checksum: &mut Option<String>,
) -> Result<(), ValidationError> {
    rule_key.0 = validate_rule_key(&rule_key.0)?.to_string();
    if let Some(line) = line {
        validate_line(line)?;
    }
    *checksum = checksum.as_deref().map(normalize_checksum).transpose()?;
    Ok(())
}

pub(crate) fn validate_violation(violation: &mut Violation) -> Result<(), ValidationError> {
    validate_fields(
        &mut violation.rule_key,
        violation.line,
        &mut violation.checksum,
    )
}

pub(crate) fn validate_reference(reference: &mut ReferenceViolation) -> Result<(), ValidationError> {
    validate_fields(
        &mut reference.rule_key,
        reference.line,
        &mut reference.checksum,
    )
}
