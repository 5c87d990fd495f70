use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::types::{ReferenceId, RuleKey};

/// A finding raised by the current analysis of a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule that raised the finding
    pub rule_key: RuleKey,

    /// 1-based line, absent for file-level findings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    /// Message as produced by the rule engine
    #[serde(default)]
    pub message: String,

    /// Whitespace-insensitive checksum of the flagged line.
    /// Lowercase hex, 32 characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,

    /// Externally stable identity, if the rule engine supplies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permanent_id: Option<i64>,
}

impl Violation {
    pub fn new(rule_key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule_key: RuleKey::new(rule_key),
            line: None,
            message: message.into(),
            checksum: None,
            permanent_id: None,
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    #[must_use]
    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = Some(checksum.into());
        self
    }

    #[must_use]
    pub fn with_permanent_id(mut self, permanent_id: i64) -> Self {
        self.permanent_id = Some(permanent_id);
        self
    }
}

/// A finding recorded against the previous analysis of the same file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceViolation {
    /// Identity in the historical store
    pub id: ReferenceId,

    pub rule_key: RuleKey,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    #[serde(default)]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permanent_id: Option<i64>,

    /// When the finding was first seen
    pub created_at: DateTime<Utc>,
}

impl ReferenceViolation {
    pub fn new(
        id: i64,
        rule_key: impl Into<String>,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ReferenceId(id),
            rule_key: RuleKey::new(rule_key),
            line: None,
            message: message.into(),
            checksum: None,
            permanent_id: None,
            created_at,
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    #[must_use]
    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = Some(checksum.into());
        self
    }

    #[must_use]
    pub fn with_permanent_id(mut self, permanent_id: i64) -> Self {
        self.permanent_id = Some(permanent_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_builder() {
        let v = Violation::new("R50", "Indentation")
            .with_line(7)
            .with_checksum("c1")
            .with_permanent_id(3);
        assert_eq!(v.rule_key.as_str(), "R50");
        assert_eq!(v.line, Some(7));
        assert_eq!(v.checksum.as_deref(), Some("c1"));
        assert_eq!(v.permanent_id, Some(3));
    }

    #[test]
    fn test_violation_json_optional_fields() {
        let v: Violation = serde_json::from_str(r#"{"rule_key":"R1","message":"m"}"#).unwrap();
        assert_eq!(v.line, None);
        assert_eq!(v.checksum, None);
        assert_eq!(v.permanent_id, None);

        let json = serde_json::to_string(&v).unwrap();
        assert!(!json.contains("line"));
        assert!(!json.contains("checksum"));
    }

    #[test]
    fn test_reference_violation_json() {
        let json = r#"{
            "id": 12,
            "rule_key": "R1",
            "line": 4,
            "message": "m",
            "created_at": "2024-03-01T10:00:00Z"
        }"#;
        let r: ReferenceViolation = serde_json::from_str(json).unwrap();
        assert_eq!(r.id, ReferenceId(12));
        assert_eq!(r.line, Some(4));
        assert_eq!(r.created_at.to_rfc3339(), "2024-03-01T10:00:00+00:00");
    }
}
