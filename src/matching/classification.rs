use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::types::{MatchTier, ReferenceId};
use crate::core::violation::Violation;

/// A current violation paired with a reference violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Match {
    /// Position of the reference in the reference input
    pub reference_index: usize,
    pub reference_id: ReferenceId,
    /// Tier that produced the pairing
    pub tier: MatchTier,
}

/// Outcome for one current violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub is_new: bool,

    /// Inherited from the reference when matched, else the analysis time
    pub created_at: DateTime<Utc>,

    /// The violation's own permanent id, or the reference's if it had none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permanent_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<Match>,
}

/// A reference violation that no current violation claimed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnmatchedReference {
    pub reference_index: usize,
    pub reference_id: ReferenceId,
    /// Line in the current revision, when the reference had a line and it
    /// still exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relocated_line: Option<u32>,
    /// The reference line lies beyond the end of the current revision
    pub removed: bool,
}

/// Counts of one tracking run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrackingSummary {
    /// Current violations with no reference
    pub new: usize,
    /// Current violations matched to a reference
    pub tracked: usize,
    /// References with no current violation
    pub closed: usize,
}

/// Result of reconciling current violations against reference violations.
///
/// `classifications[i]` belongs to the i-th current violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub classifications: Vec<Classification>,
    pub unmatched_references: Vec<UnmatchedReference>,
}

impl MatchResult {
    /// Reference index matched to a current violation
    #[must_use]
    pub fn reference_for(&self, current_index: usize) -> Option<usize> {
        self.classifications
            .get(current_index)?
            .matched
            .map(|m| m.reference_index)
    }

    /// `(current_index, reference_index)` pairs in current input order
    pub fn matches(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.classifications
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.matched.map(|m| (i, m.reference_index)))
    }

    #[must_use]
    pub fn is_new(&self, current_index: usize) -> bool {
        self.classifications
            .get(current_index)
            .is_some_and(|c| c.is_new)
    }

    #[must_use]
    pub fn summary(&self) -> TrackingSummary {
        let tracked = self
            .classifications
            .iter()
            .filter(|c| c.matched.is_some())
            .count();
        TrackingSummary {
            new: self.classifications.len() - tracked,
            tracked,
            closed: self.unmatched_references.len(),
        }
    }

    /// Updated copies of the current violations, with their classification
    #[must_use]
    pub fn apply(&self, current: &[Violation]) -> Vec<TrackedViolation> {
        current
            .iter()
            .zip(&self.classifications)
            .map(|(violation, classification)| {
                let mut violation = violation.clone();
                violation.permanent_id = classification.permanent_id;
                TrackedViolation {
                    violation,
                    is_new: classification.is_new,
                    created_at: classification.created_at,
                    reference_id: classification.matched.map(|m| m.reference_id),
                    tier: classification.matched.map(|m| m.tier),
                }
            })
            .collect()
    }
}

/// A current violation after classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackedViolation {
    #[serde(flatten)]
    pub violation: Violation,
    pub is_new: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<ReferenceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<MatchTier>,
}
