use crate::core::violation::{ReferenceViolation, Violation};
use crate::parsing::{validate_reference, validate_violation, ParseError};
use crate::utils::validation::MAX_VIOLATIONS;

/// Parse current violations from a JSON array
///
/// # Errors
///
/// Returns `ParseError::Json` for malformed JSON, `ParseError::Validation` for
/// invalid records, or `ParseError::TooManyViolations` if the limit is exceeded.
pub fn parse_violations_json(text: &str) -> Result<Vec<Violation>, ParseError> {
    let mut violations: Vec<Violation> = serde_json::from_str(text)?;
    if violations.len() > MAX_VIOLATIONS {
        return Err(ParseError::TooManyViolations(violations.len()));
    }
    for violation in &mut violations {
        validate_violation(violation)?;
    }
    Ok(violations)
}

/// Parse reference violations from a JSON array
///
/// # Errors
///
/// Same as [`parse_violations_json`]; `created_at` must be an RFC 3339 timestamp.
pub fn parse_references_json(text: &str) -> Result<Vec<ReferenceViolation>, ParseError> {
    let mut references: Vec<ReferenceViolation> = serde_json::from_str(text)?;
    if references.len() > MAX_VIOLATIONS {
        return Err(ParseError::TooManyViolations(references.len()));
    }
    for reference in &mut references {
        validate_reference(reference)?;
    }
    Ok(references)
}
