//! Centralized validation and helper functions.

/// Maximum number of violations allowed in a single input file (DOS protection)
pub const MAX_VIOLATIONS: usize = 1_000_000;

/// Validation error types for violation records
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid checksum '{0}': expected 32 hexadecimal characters")]
    InvalidChecksum(String),
    #[error("Invalid line number {0}: lines are 1-based")]
    InvalidLine(u32),
    #[error("Empty rule key")]
    EmptyRuleKey,
}

/// Validate that a string is a valid line checksum (32 hex characters).
///
/// # Examples
///
/// ```
/// use violation_tracker::utils::validation::is_valid_checksum;
///
/// assert!(is_valid_checksum("5ba3a45e1299ede07f56e5531351be52"));
/// assert!(!is_valid_checksum("not-a-checksum"));
/// assert!(!is_valid_checksum("5ba3a45e1299ede07f56e5531351be5")); // 31 chars
/// ```
#[must_use]
pub fn is_valid_checksum(s: &str) -> bool {
    s.len() == 32 && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Normalize a checksum string to lowercase.
///
/// # Errors
///
/// Returns `ValidationError::InvalidChecksum` if the input is not 32 hex characters.
pub fn normalize_checksum(s: &str) -> Result<String, ValidationError> {
    if is_valid_checksum(s) {
        Ok(s.to_lowercase())
    } else {
        Err(ValidationError::InvalidChecksum(s.to_string()))
    }
}

/// Validate a 1-based line number
///
/// # Errors
///
/// Returns `ValidationError::InvalidLine` for line 0.
pub fn validate_line(line: u32) -> Result<u32, ValidationError> {
    if line == 0 {
        Err(ValidationError::InvalidLine(line))
    } else {
        Ok(line)
    }
}

/// Validate that a rule key is not blank
///
/// # Errors
///
/// Returns `ValidationError::EmptyRuleKey` if the key is empty after trimming.
pub fn validate_rule_key(key: &str) -> Result<&str, ValidationError> {
    let key = key.trim();
    if key.is_empty() {
        Err(ValidationError::EmptyRuleKey)
    } else {
        Ok(key)
    }
}

/// Check if adding another violation would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new violation.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_violation_limit(count: usize) -> Option<String> {
    if count >= MAX_VIOLATIONS {
        Some(format!(
            "Too many violations: adding another would exceed maximum of {MAX_VIOLATIONS}"
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_checksum() {
        assert_eq!(
            normalize_checksum("5BA3A45E1299EDE07F56E5531351BE52").unwrap(),
            "5ba3a45e1299ede07f56e5531351be52"
        );
        assert_eq!(
            normalize_checksum("xyz"),
            Err(ValidationError::InvalidChecksum("xyz".to_string()))
        );
    }

    #[test]
    fn test_validate_line() {
        assert_eq!(validate_line(1), Ok(1));
        assert_eq!(validate_line(0), Err(ValidationError::InvalidLine(0)));
    }

    #[test]
    fn test_validate_rule_key() {
        assert_eq!(validate_rule_key(" squid:S100 "), Ok("squid:S100"));
        assert_eq!(validate_rule_key("  "), Err(ValidationError::EmptyRuleKey));
    }

    #[test]
    fn test_check_violation_limit() {
        assert!(check_violation_limit(0).is_none());
        assert!(check_violation_limit(MAX_VIOLATIONS - 1).is_none());
        assert!(check_violation_limit(MAX_VIOLATIONS).is_some());
    }
}
