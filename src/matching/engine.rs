use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::types::{MatchTier, RuleKey};
use crate::core::violation::{ReferenceViolation, Violation};
use crate::matching::classification::{Classification, Match, MatchResult, UnmatchedReference};
use crate::matching::tiers::TierContext;
use crate::source::checksum::ChecksumSet;
use crate::source::diff::{LineDiffMapper, LineMap};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Default width of the persisted message column
pub const DEFAULT_MESSAGE_MAX_LENGTH: usize = 4000;

/// Configuration for the violation matcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackingConfig {
    /// Messages are compared on their first `message_max_length` characters
    pub message_max_length: usize,
    /// When source texts are given, fill absent checksums from the flagged line
    pub derive_missing_checksums: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            message_max_length: DEFAULT_MESSAGE_MAX_LENGTH,
            derive_missing_checksums: false,
        }
    }
}

impl TrackingConfig {
    /// Load configuration from a JSON file; absent fields take their defaults
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadError` if the file cannot be read,
    /// `ConfigError::ParseError` for malformed JSON or unknown fields, or
    /// `ConfigError::Invalid` if a value is out of range.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` or `ConfigError::Invalid`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `message_max_length` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.message_max_length == 0 {
            return Err(ConfigError::Invalid(
                "message_max_length must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Pairing state shared by all tiers of one run
struct Pairing {
    current: Vec<Option<Match>>,
    reference_used: Vec<bool>,
}

impl Pairing {
    fn new(current_len: usize, reference_len: usize) -> Self {
        Self {
            current: vec![None; current_len],
            reference_used: vec![false; reference_len],
        }
    }
}

/// Current and reference indices sharing one rule key, both in input order
struct RuleBucket {
    current: Vec<usize>,
    reference: Vec<usize>,
}

/// Partition both sides by rule key; buckets follow first appearance on the current side
fn bucket_by_rule(current: &[Violation], reference: &[ReferenceViolation]) -> Vec<RuleBucket> {
    let mut index: HashMap<&RuleKey, usize> = HashMap::new();
    let mut buckets: Vec<RuleBucket> = Vec::new();

    for (i, violation) in current.iter().enumerate() {
        let slot = *index.entry(&violation.rule_key).or_insert_with(|| {
            buckets.push(RuleBucket {
                current: Vec::new(),
                reference: Vec::new(),
            });
            buckets.len() - 1
        });
        buckets[slot].current.push(i);
    }

    for (i, reference) in reference.iter().enumerate() {
        if let Some(&slot) = index.get(&reference.rule_key) {
            buckets[slot].reference.push(i);
        }
    }

    buckets
}

/// Reconciles the violations of a new analysis with those of the previous one
#[derive(Debug, Clone, Default)]
pub struct ViolationMatcher {
    config: TrackingConfig,
}

impl ViolationMatcher {
    /// Create a matcher with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a matcher with custom configuration
    #[must_use]
    pub fn with_config(config: TrackingConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    /// Match current violations against reference violations.
    ///
    /// Tiers run in priority order, each a greedy pass over the findings left
    /// unmatched by earlier tiers: for every current violation in input order,
    /// the first free reference that qualifies is taken. Reference lines are
    /// translated through `line_map` when one is given. Unmatched violations
    /// are stamped with `analysis_time`.
    #[must_use]
    pub fn match_violations(
        &self,
        current: &[Violation],
        reference: &[ReferenceViolation],
        line_map: Option<&LineMap>,
        analysis_time: DateTime<Utc>,
    ) -> MatchResult {
        let ctx = TierContext::new(line_map, self.config.message_max_length);
        let mut pairing = Pairing::new(current.len(), reference.len());

        // Permanent ids are authoritative across rules
        let all_current: Vec<usize> = (0..current.len()).collect();
        let all_reference: Vec<usize> = (0..reference.len()).collect();
        let mut counts = [0usize; MatchTier::ALL.len()];
        counts[0] = run_tier(
            MatchTier::PermanentId,
            &ctx,
            current,
            reference,
            &all_current,
            &all_reference,
            &mut pairing,
        );

        for bucket in bucket_by_rule(current, reference) {
            for (slot, tier) in MatchTier::ALL.iter().enumerate().skip(1) {
                counts[slot] += run_tier(
                    *tier,
                    &ctx,
                    current,
                    reference,
                    &bucket.current,
                    &bucket.reference,
                    &mut pairing,
                );
            }
        }

        for (tier, count) in MatchTier::ALL.iter().zip(counts) {
            debug!("Tier {tier}: {count} matches");
        }

        let classifications = current
            .iter()
            .zip(&pairing.current)
            .map(|(violation, matched)| match matched {
                Some(m) => {
                    let r = &reference[m.reference_index];
                    Classification {
                        is_new: false,
                        created_at: r.created_at,
                        permanent_id: violation.permanent_id.or(r.permanent_id),
                        matched: Some(*m),
                    }
                }
                None => Classification {
                    is_new: true,
                    created_at: analysis_time,
                    permanent_id: violation.permanent_id,
                    matched: None,
                },
            })
            .collect();

        let unmatched_references = reference
            .iter()
            .enumerate()
            .filter(|(i, _)| !pairing.reference_used[*i])
            .map(|(i, r)| UnmatchedReference {
                reference_index: i,
                reference_id: r.id,
                relocated_line: r.line,
                removed: false,
            })
            .collect();

        let result = MatchResult {
            classifications,
            unmatched_references,
        };

        let summary = result.summary();
        debug!(
            "Tracked {} violations: {} new, {} matched, {} closed",
            current.len(),
            summary.new,
            summary.tracked,
            summary.closed
        );

        result
    }

    /// Match using the two revisions of the file's content to translate lines.
    ///
    /// With `derive_missing_checksums` enabled, findings without a checksum take
    /// the checksum of their line in their own revision first. Unmatched
    /// references are then relocated against the current revision.
    #[must_use]
    pub fn match_with_sources(
        &self,
        current: &[Violation],
        reference: &[ReferenceViolation],
        reference_source: &str,
        current_source: &str,
        analysis_time: DateTime<Utc>,
    ) -> MatchResult {
        let reference_checksums = ChecksumSet::of_text(reference_source);
        let current_checksums = ChecksumSet::of_text(current_source);
        let line_map = LineDiffMapper::new(&reference_checksums, &current_checksums).compute();

        let mut result = if self.config.derive_missing_checksums {
            let mut derived_current = current.to_vec();
            for violation in &mut derived_current {
                derive_checksum(violation.line, &mut violation.checksum, &current_checksums);
            }
            let mut derived_reference = reference.to_vec();
            for r in &mut derived_reference {
                derive_checksum(r.line, &mut r.checksum, &reference_checksums);
            }
            self.match_violations(
                &derived_current,
                &derived_reference,
                Some(&line_map),
                analysis_time,
            )
        } else {
            self.match_violations(current, reference, Some(&line_map), analysis_time)
        };

        for unmatched in &mut result.unmatched_references {
            relocate(
                unmatched,
                &reference[unmatched.reference_index],
                &reference_checksums,
                &current_checksums,
            );
        }

        result
    }
}

/// Fill an absent checksum from the checksum of `line`
fn derive_checksum(line: Option<u32>, checksum: &mut Option<String>, checksums: &ChecksumSet) {
    if checksum.is_some() {
        return;
    }
    if let Some(c) = line.and_then(|l| checksums.checksum_at(l)) {
        *checksum = Some(c.to_string());
    }
}

/// Move an unmatched reference to the only current line with the checksum of
/// its old line. Without a unique hit the recorded line stays, unless the
/// current revision no longer reaches it.
fn relocate(
    unmatched: &mut UnmatchedReference,
    reference: &ReferenceViolation,
    reference_checksums: &ChecksumSet,
    current_checksums: &ChecksumSet,
) {
    let Some(line) = reference.line else {
        return;
    };

    let checksum = reference_checksums
        .checksum_at(line)
        .or(reference.checksum.as_deref());
    let mut hits = checksum
        .into_iter()
        .flat_map(|c| current_checksums.lines_matching(c));
    if let (Some(only), None) = (hits.next(), hits.next()) {
        unmatched.relocated_line = Some(only);
        return;
    }

    if current_checksums.checksum_at(line).is_none() {
        debug!("Reference {} line {line} is past the end of the file", reference.id);
        unmatched.relocated_line = None;
        unmatched.removed = true;
    }
}

/// Run one tier over the given candidates, returning the number of new pairs
fn run_tier(
    tier: MatchTier,
    ctx: &TierContext<'_>,
    current: &[Violation],
    reference: &[ReferenceViolation],
    current_indices: &[usize],
    reference_indices: &[usize],
    pairing: &mut Pairing,
) -> usize {
    let mut matched = 0;

    for &ci in current_indices {
        if pairing.current[ci].is_some() {
            continue;
        }
        let violation = &current[ci];
        let found = reference_indices.iter().copied().find(|&ri| {
            !pairing.reference_used[ri] && ctx.is_match(tier, violation, &reference[ri])
        });
        if let Some(ri) = found {
            pairing.reference_used[ri] = true;
            pairing.current[ci] = Some(Match {
                reference_index: ri,
                reference_id: reference[ri].id,
                tier,
            });
            matched += 1;
        }
    }

    matched
}
