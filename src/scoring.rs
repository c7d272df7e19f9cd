//! Correctness evaluation for submitted answers
//!
//! The final segment of a quiz inverts the scoring rule: the player must
//! pick an option that is *not* the designated one. This module holds the
//! single pure function that applies the right rule for a round kind.

use crate::question::{OptionKey, RoundKind};

/// Decides whether a submitted option counts as correct
///
/// `Standard` rounds reward matching the designated option; `Inverted`
/// rounds reward avoiding it. There is no other rule: the round kind is a
/// closed enum, so every question evaluates through exactly one of these
/// two arms.
pub fn evaluate(kind: RoundKind, submitted: OptionKey, correct: OptionKey) -> bool {
    match kind {
        RoundKind::Standard => submitted == correct,
        RoundKind::Inverted => submitted != correct,
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_standard_round_rewards_match() {
        assert!(evaluate(RoundKind::Standard, OptionKey::B, OptionKey::B));
        assert!(!evaluate(RoundKind::Standard, OptionKey::A, OptionKey::B));
    }

    #[test]
    fn test_inverted_round_rewards_mismatch() {
        assert!(!evaluate(RoundKind::Inverted, OptionKey::B, OptionKey::B));
        assert!(evaluate(RoundKind::Inverted, OptionKey::A, OptionKey::B));
    }

    #[test]
    fn test_full_truth_table() {
        for submitted in OptionKey::ALL {
            for correct in OptionKey::ALL {
                assert_eq!(
                    evaluate(RoundKind::Standard, submitted, correct),
                    submitted == correct
                );
                assert_eq!(
                    evaluate(RoundKind::Inverted, submitted, correct),
                    submitted != correct
                );
            }
        }
    }
}
