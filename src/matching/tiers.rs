use crate::core::types::MatchTier;
use crate::core::violation::{ReferenceViolation, Violation};
use crate::source::diff::LineMap;

/// The part of a message that survives persistence: trimmed, then cut to
/// `max_length` characters
#[must_use]
pub fn stored_message(message: &str, max_length: usize) -> &str {
    let trimmed = message.trim();
    match trimmed.char_indices().nth(max_length) {
        Some((end, _)) => &trimmed[..end],
        None => trimmed,
    }
}

/// Everything a tier predicate needs besides the two findings
#[derive(Debug, Clone, Copy)]
pub struct TierContext<'a> {
    line_map: Option<&'a LineMap>,
    message_max_length: usize,
}

impl<'a> TierContext<'a> {
    pub fn new(line_map: Option<&'a LineMap>, message_max_length: usize) -> Self {
        Self {
            line_map,
            message_max_length,
        }
    }

    /// Reference line expressed in current line numbers.
    ///
    /// Without a line map the reference line is used as-is; with one, a line
    /// that was not mapped counts as absent.
    #[must_use]
    pub fn translated_line(&self, reference: &ReferenceViolation) -> Option<u32> {
        let line = reference.line?;
        match self.line_map {
            Some(map) => map.get(line),
            None => Some(line),
        }
    }

    fn same_message(&self, violation: &Violation, reference: &ReferenceViolation) -> bool {
        stored_message(&violation.message, self.message_max_length)
            == stored_message(&reference.message, self.message_max_length)
    }

    /// Check whether a violation and a reference qualify for `tier`.
    ///
    /// Absent keys never compare equal, so a finding without line and checksum
    /// can only pass the permanent id and no-line tiers.
    #[must_use]
    pub fn is_match(
        &self,
        tier: MatchTier,
        violation: &Violation,
        reference: &ReferenceViolation,
    ) -> bool {
        let same_rule = violation.rule_key == reference.rule_key;

        match tier {
            MatchTier::PermanentId => matches!(
                (violation.permanent_id, reference.permanent_id),
                (Some(a), Some(b)) if a == b
            ),
            MatchTier::ChecksumAndLine => {
                same_rule
                    && same_checksum(violation, reference)
                    && same_line(violation.line, self.translated_line(reference))
            }
            MatchTier::Checksum => same_rule && same_checksum(violation, reference),
            MatchTier::LineAndMessage => {
                same_rule
                    && same_line(violation.line, self.translated_line(reference))
                    && self.same_message(violation, reference)
            }
            MatchTier::NoLineAndMessage => {
                same_rule
                    && violation.line.is_none()
                    && reference.line.is_none()
                    && self.same_message(violation, reference)
            }
        }
    }
}

fn same_checksum(violation: &Violation, reference: &ReferenceViolation) -> bool {
    matches!(
        (&violation.checksum, &reference.checksum),
        (Some(a), Some(b)) if a == b
    )
}

fn same_line(a: Option<u32>, b: Option<u32>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn reference(line: Option<u32>) -> ReferenceViolation {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut r = ReferenceViolation::new(1, "R1", "msg", created);
        r.line = line;
        r
    }

    #[test]
    fn test_stored_message_trims_and_truncates() {
        assert_eq!(stored_message("  hello  ", 10), "hello");
        assert_eq!(stored_message("  hello world ", 5), "hello");
        assert_eq!(stored_message("héllo", 2), "hé");
        assert_eq!(stored_message("", 5), "");
    }

    #[test]
    fn test_translated_line_without_map() {
        let ctx = TierContext::new(None, 4000);
        assert_eq!(ctx.translated_line(&reference(Some(4))), Some(4));
        assert_eq!(ctx.translated_line(&reference(None)), None);
    }

    #[test]
    fn test_translated_line_with_map() {
        let map = LineMap::from_pairs([(4, 6)]);
        let ctx = TierContext::new(Some(&map), 4000);
        assert_eq!(ctx.translated_line(&reference(Some(4))), Some(6));
        assert_eq!(ctx.translated_line(&reference(Some(5))), None);
        assert_eq!(ctx.translated_line(&reference(None)), None);
    }

    #[test]
    fn test_rule_key_is_mandatory_below_permanent_id() {
        let ctx = TierContext::new(None, 4000);
        let v = Violation::new("R2", "msg").with_line(1).with_checksum("c");
        let r = reference(Some(1)).with_checksum("c");
        for tier in &MatchTier::ALL[1..] {
            assert!(!ctx.is_match(*tier, &v, &r), "{tier} matched across rules");
        }
    }

    #[test]
    fn test_permanent_id_ignores_rule() {
        let ctx = TierContext::new(None, 4000);
        let v = Violation::new("R2", "other").with_permanent_id(7);
        let r = reference(Some(1)).with_permanent_id(7);
        assert!(ctx.is_match(MatchTier::PermanentId, &v, &r));
    }

    #[test]
    fn test_missing_keys_never_match() {
        let ctx = TierContext::new(None, 4000);
        let v = Violation::new("R1", "msg");
        let r = reference(None);
        assert!(!ctx.is_match(MatchTier::PermanentId, &v, &r));
        assert!(!ctx.is_match(MatchTier::ChecksumAndLine, &v, &r));
        assert!(!ctx.is_match(MatchTier::Checksum, &v, &r));
        assert!(!ctx.is_match(MatchTier::LineAndMessage, &v, &r));
        assert!(ctx.is_match(MatchTier::NoLineAndMessage, &v, &r));
    }

    #[test]
    fn test_no_line_tier_requires_both_lines_absent() {
        let ctx = TierContext::new(None, 4000);
        let v = Violation::new("R1", "msg");
        assert!(!ctx.is_match(MatchTier::NoLineAndMessage, &v, &reference(Some(3))));
        let v = Violation::new("R1", "msg").with_line(3);
        assert!(!ctx.is_match(MatchTier::NoLineAndMessage, &v, &reference(None)));
    }

    #[test]
    fn test_message_compared_on_stored_prefix() {
        let ctx = TierContext::new(None, 5);
        let v = Violation::new("R1", " msg-long-suffix-A").with_line(1);
        let mut r = reference(Some(1));
        r.message = "msg-long-suffix-B ".to_string();
        assert!(ctx.is_match(MatchTier::LineAndMessage, &v, &r));
    }
}
