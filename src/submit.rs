//! Final result snapshot and the submission boundary
//!
//! When the last question is answered the session takes one immutable
//! snapshot of its outcome and hands it to a [`ResultSink`] exactly once.
//! Submission is fire-and-forget relative to the player: a sink failure
//! is logged and the results phase is reached regardless. Whether the
//! snapshot carries a player identity changes what may be persisted, so
//! the two shapes are distinct request variants rather than an optional
//! field.

use enum_map::EnumMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{profile::PlayerProfile, question::RoundKind, session::AnswerRecord};

/// Correct/total counts for one round kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindTally {
    /// Answers that evaluated as correct under this kind's rule
    pub correct: usize,
    /// Questions of this kind that were answered
    pub total: usize,
}

/// Immutable snapshot of a completed session's outcome
///
/// Taken exactly once, at the instant the last answer's acknowledgement
/// elapses. The elapsed seconds are a value copy of the clock at that
/// instant; the snapshot never aliases live session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalResult {
    /// Number of questions in the played set
    pub total_questions: usize,
    /// Number of answers that evaluated as correct
    pub correct_answers: usize,
    /// Authoritative duration of the run in whole seconds
    pub time_taken_seconds: u64,
    /// The player's identity, when one was collected
    pub profile: Option<PlayerProfile>,
    /// Every committed answer, in play order
    pub answers: Vec<AnswerRecord>,
    /// Correct/total breakdown per round kind
    pub by_kind: EnumMap<RoundKind, KindTally>,
}

impl FinalResult {
    /// Builds the snapshot from the session's committed answers
    pub(crate) fn snapshot(
        total_questions: usize,
        time_taken_seconds: u64,
        profile: Option<PlayerProfile>,
        answers: Vec<AnswerRecord>,
    ) -> Self {
        let correct_answers = answers.iter().filter(|answer| answer.was_correct).count();
        let mut by_kind = EnumMap::<RoundKind, KindTally>::default();
        for answer in &answers {
            let tally = &mut by_kind[answer.kind];
            tally.total += 1;
            if answer.was_correct {
                tally.correct += 1;
            }
        }
        Self {
            total_questions,
            correct_answers,
            time_taken_seconds,
            profile,
            answers,
            by_kind,
        }
    }

    /// Packages this snapshot for the submission boundary
    ///
    /// A profile-bearing result becomes an [`SubmissionRequest::Identified`]
    /// request carrying identity, tally, and the raw answer sequence; a
    /// profile-less one becomes [`SubmissionRequest::Anonymous`] carrying
    /// the aggregate tally only.
    pub fn submission(&self) -> SubmissionRequest {
        match &self.profile {
            Some(profile) => SubmissionRequest::Identified {
                profile: profile.clone(),
                total_questions: self.total_questions,
                correct_answers: self.correct_answers,
                time_taken_seconds: self.time_taken_seconds,
                answers: self.answers.clone(),
            },
            None => SubmissionRequest::Anonymous {
                total_questions: self.total_questions,
                correct_answers: self.correct_answers,
                time_taken_seconds: self.time_taken_seconds,
            },
        }
    }
}

/// One result submission, shaped by whether identity was collected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionRequest {
    /// Full submission: identity fields, aggregate tally, and the raw
    /// per-question answer sequence
    Identified {
        /// The player's identity
        profile: PlayerProfile,
        /// Number of questions in the played set
        total_questions: usize,
        /// Number of correct answers
        correct_answers: usize,
        /// Duration of the run in whole seconds
        time_taken_seconds: u64,
        /// Every committed answer, in play order
        answers: Vec<AnswerRecord>,
    },
    /// Anonymous submission: aggregate tally only
    Anonymous {
        /// Number of questions in the played set
        total_questions: usize,
        /// Number of correct answers
        correct_answers: usize,
        /// Duration of the run in whole seconds
        time_taken_seconds: u64,
    },
}

impl SubmissionRequest {
    /// Serializes the request to a JSON payload for transport
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never
    /// happen with the default JSON serializer for well-formed data.
    pub fn to_payload(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Errors a sink may report for a failed submission
///
/// All variants are recovered locally: the failure is logged and the
/// session still reaches its results phase. Retry policy, if any, lives
/// behind the sink.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The persistence layer could not be reached
    #[error("result store unreachable: {0}")]
    Unreachable(String),
    /// The persistence layer refused the submission
    #[error("result store rejected the submission: {0}")]
    Rejected(String),
}

/// Sink for completed results, implemented by the persistence adapter
///
/// The engine attempts at most one submission per completed session.
pub trait ResultSink {
    /// Forwards one submission to external persistence
    ///
    /// # Errors
    ///
    /// Returns a [`SubmitError`] when the submission could not be
    /// persisted; the engine logs it and continues.
    fn submit(&self, request: SubmissionRequest) -> Result<(), SubmitError>;
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::question::OptionKey;
    use uuid::Uuid;

    fn record(kind: RoundKind, was_correct: bool) -> AnswerRecord {
        AnswerRecord {
            question_id: Uuid::new_v4(),
            kind,
            submitted: OptionKey::A,
            correct: if was_correct == (kind == RoundKind::Standard) {
                OptionKey::A
            } else {
                OptionKey::B
            },
            was_correct,
        }
    }

    fn profile() -> PlayerProfile {
        PlayerProfile {
            name: "Grace Hopper".to_string(),
            email: "grace@example.com".to_string(),
            mobile: "1234567890".to_string(),
            college: "Vassar College".to_string(),
        }
    }

    #[test]
    fn test_snapshot_counts_correct_answers() {
        let result = FinalResult::snapshot(
            3,
            42,
            None,
            vec![
                record(RoundKind::Standard, true),
                record(RoundKind::Standard, false),
                record(RoundKind::Inverted, true),
            ],
        );

        assert_eq!(result.total_questions, 3);
        assert_eq!(result.correct_answers, 2);
        assert_eq!(result.time_taken_seconds, 42);
        assert_eq!(result.by_kind[RoundKind::Standard].correct, 1);
        assert_eq!(result.by_kind[RoundKind::Standard].total, 2);
        assert_eq!(result.by_kind[RoundKind::Inverted].correct, 1);
        assert_eq!(result.by_kind[RoundKind::Inverted].total, 1);
    }

    #[test]
    fn test_identified_submission_carries_answers() {
        let result = FinalResult::snapshot(1, 10, Some(profile()), vec![record(
            RoundKind::Standard,
            true,
        )]);

        match result.submission() {
            SubmissionRequest::Identified {
                profile,
                total_questions,
                correct_answers,
                answers,
                ..
            } => {
                assert_eq!(profile.name, "Grace Hopper");
                assert_eq!(total_questions, 1);
                assert_eq!(correct_answers, 1);
                assert_eq!(answers.len(), 1);
            }
            SubmissionRequest::Anonymous { .. } => panic!("expected identified submission"),
        }
    }

    #[test]
    fn test_anonymous_submission_is_aggregate_only() {
        let result = FinalResult::snapshot(2, 7, None, vec![record(RoundKind::Standard, false)]);

        let request = result.submission();
        match &request {
            SubmissionRequest::Anonymous {
                total_questions,
                correct_answers,
                time_taken_seconds,
            } => {
                assert_eq!(*total_questions, 2);
                assert_eq!(*correct_answers, 0);
                assert_eq!(*time_taken_seconds, 7);
            }
            SubmissionRequest::Identified { .. } => panic!("expected anonymous submission"),
        }

        let payload = request.to_payload();
        assert!(payload.contains("Anonymous"));
        assert!(!payload.contains("answers"));
    }
}
