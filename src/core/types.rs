use serde::{Deserialize, Serialize};

/// Opaque identifier of the rule that raised a violation (e.g. `squid:IndentationCheck`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleKey(pub String);

impl RuleKey {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RuleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identity of a reference violation in the historical store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceId(pub i64);

impl std::fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The matching tier that paired a violation with its reference.
///
/// Variants are declared in priority order, so `Ord` follows tier precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// Both sides carry the same permanent id
    PermanentId,
    /// Same rule, same checksum, same (translated) line
    ChecksumAndLine,
    /// Same rule, same checksum, line ignored
    Checksum,
    /// Same rule, same (translated) line, same stored message
    LineAndMessage,
    /// Same rule, no line on either side, same stored message
    NoLineAndMessage,
}

impl MatchTier {
    /// All tiers in the order they are evaluated
    pub const ALL: [MatchTier; 5] = [
        MatchTier::PermanentId,
        MatchTier::ChecksumAndLine,
        MatchTier::Checksum,
        MatchTier::LineAndMessage,
        MatchTier::NoLineAndMessage,
    ];
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermanentId => write!(f, "permanent-id"),
            Self::ChecksumAndLine => write!(f, "checksum+line"),
            Self::Checksum => write!(f, "checksum"),
            Self::LineAndMessage => write!(f, "line+message"),
            Self::NoLineAndMessage => write!(f, "no-line+message"),
        }
    }
}
