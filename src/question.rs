//! Question data model and loading boundary
//!
//! This module defines the question records consumed by the session
//! controller, the ordered non-empty collection they live in, and the
//! trait through which a backing store supplies them. The engine never
//! authors or reorders questions; it consumes them exactly as the store
//! returns them, sorted by their fixed `order` field.

use std::fmt::Display;

use enum_map::{Enum, EnumMap};
use garde::Validate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// One of the four labeled answer options of a question
///
/// Options are addressed by their label rather than by position so that
/// a submitted answer can never refer to an option that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKey {
    /// Option "a"
    A,
    /// Option "b"
    B,
    /// Option "c"
    C,
    /// Option "d"
    D,
}

impl OptionKey {
    /// All option keys in display order
    pub const ALL: [Self; 4] = [Self::A, Self::B, Self::C, Self::D];
}

impl Display for OptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::A => "a",
            Self::B => "b",
            Self::C => "c",
            Self::D => "d",
        })
    }
}

/// Classification of a question controlling which correctness rule applies
///
/// This is a closed set: a stored kind that matches neither spelling is a
/// configuration error and fails deserialization rather than being coerced
/// to a default, since a silent default would corrupt scoring semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundKind {
    /// Picking the designated option is correct
    Standard,
    /// Picking anything but the designated option is correct; the backing
    /// store historically spells this kind "boss"
    #[serde(alias = "boss")]
    Inverted,
}

/// Validates that every answer option fits the configured length bound
fn validate_options(options: &EnumMap<OptionKey, String>, _context: &()) -> garde::Result {
    for (key, text) in options {
        if text.len() > crate::constants::question::MAX_OPTION_LENGTH {
            return Err(garde::Error::new(format!(
                "option {key} exceeds {} characters",
                crate::constants::question::MAX_OPTION_LENGTH
            )));
        }
    }
    Ok(())
}

/// A single quiz question as loaded from the backing store
///
/// Immutable once loaded; the session controller only ever holds a read
/// reference into the owning [`QuestionSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Question {
    /// Stable identity of the question in the backing store
    #[garde(skip)]
    pub id: Uuid,
    /// The question text shown to the player
    #[garde(length(max = crate::constants::question::MAX_TEXT_LENGTH))]
    pub text: String,
    /// The four labeled answer options
    #[garde(custom(validate_options))]
    pub options: EnumMap<OptionKey, String>,
    /// The designated correct option
    #[garde(skip)]
    pub correct: OptionKey,
    /// Which correctness rule applies to this question
    #[garde(skip)]
    pub kind: RoundKind,
    /// Fixed sequencing position within the set
    #[garde(skip)]
    pub order: u32,
}

/// Errors surfaced when a question set cannot be obtained
///
/// Both variants are blocking but retryable: the caller re-invokes the
/// load after fixing connectivity or seeding the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The backing store could not be reached
    #[error("question store unreachable: {0}")]
    Unavailable(String),
    /// The backing store is reachable but holds no questions
    #[error("question store returned no questions")]
    Empty,
}

/// Source of questions, implemented by the backing store adapter
///
/// The engine calls this once before play starts, and again on manual
/// retry after a [`LoadError`].
pub trait QuestionSource {
    /// Fetches every question, in any order
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Unavailable`] when the store cannot be
    /// reached; an empty result is turned into [`LoadError::Empty`] by
    /// [`QuestionSet::new`].
    fn fetch(&self) -> Result<Vec<Question>, LoadError>;
}

/// Serialization helper for `QuestionSet`
#[derive(Deserialize)]
struct QuestionSetSerde {
    questions: Vec<Question>,
}

/// An ordered, non-empty collection of questions
///
/// Construction sorts by the `order` field and rejects an empty input,
/// so a session holding a `QuestionSet` always has something to play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionSetSerde")]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl TryFrom<QuestionSetSerde> for QuestionSet {
    type Error = LoadError;

    fn try_from(serde: QuestionSetSerde) -> Result<Self, Self::Error> {
        Self::new(serde.questions)
    }
}

impl QuestionSet {
    /// Builds a set from unordered questions, sorting by `order`
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Empty`] when no questions were supplied.
    pub fn new(questions: Vec<Question>) -> Result<Self, LoadError> {
        if questions.is_empty() {
            return Err(LoadError::Empty);
        }
        let questions = questions
            .into_iter()
            .sorted_by_key(|question| question.order)
            .collect_vec();
        Ok(Self { questions })
    }

    /// Number of questions in the set (always at least one)
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always `false`; present for API completeness
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Returns the question at `index` in play order
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// All questions in play order
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn make_question(order: u32, kind: RoundKind, correct: OptionKey) -> Question {
        Question {
            id: Uuid::new_v4(),
            text: format!("Question {order}"),
            options: EnumMap::from_fn(|key: OptionKey| format!("choice {key}")),
            correct,
            kind,
            order,
        }
    }

    #[test]
    fn test_question_set_sorts_by_order() {
        let set = QuestionSet::new(vec![
            make_question(3, RoundKind::Inverted, OptionKey::D),
            make_question(1, RoundKind::Standard, OptionKey::A),
            make_question(2, RoundKind::Standard, OptionKey::C),
        ])
        .unwrap();

        let orders = set
            .questions()
            .iter()
            .map(|question| question.order)
            .collect::<Vec<_>>();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn test_question_set_rejects_empty() {
        assert_eq!(QuestionSet::new(Vec::new()), Err(LoadError::Empty));
    }

    #[test]
    fn test_question_set_deserialization_rejects_empty() {
        let result: Result<QuestionSet, _> = serde_json::from_str(r#"{"questions":[]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_question_validation() {
        let question = make_question(1, RoundKind::Standard, OptionKey::B);
        assert!(question.validate().is_ok());
    }

    #[test]
    fn test_question_text_too_long() {
        let mut question = make_question(1, RoundKind::Standard, OptionKey::B);
        question.text = "a".repeat(crate::constants::question::MAX_TEXT_LENGTH + 1);
        assert!(question.validate().is_err());
    }

    #[test]
    fn test_question_option_too_long() {
        let mut question = make_question(1, RoundKind::Standard, OptionKey::B);
        question.options[OptionKey::C] =
            "a".repeat(crate::constants::question::MAX_OPTION_LENGTH + 1);
        assert!(question.validate().is_err());
    }

    #[test]
    fn test_round_kind_accepts_storage_spelling() {
        let kind: RoundKind = serde_json::from_str(r#""boss""#).unwrap();
        assert_eq!(kind, RoundKind::Inverted);

        let kind: RoundKind = serde_json::from_str(r#""inverted""#).unwrap();
        assert_eq!(kind, RoundKind::Inverted);

        let kind: RoundKind = serde_json::from_str(r#""standard""#).unwrap();
        assert_eq!(kind, RoundKind::Standard);
    }

    #[test]
    fn test_round_kind_rejects_unknown_spelling() {
        let result: Result<RoundKind, _> = serde_json::from_str(r#""legendary""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_option_key_wire_format() {
        assert_eq!(serde_json::to_string(&OptionKey::C).unwrap(), r#""c""#);
        let key: OptionKey = serde_json::from_str(r#""d""#).unwrap();
        assert_eq!(key, OptionKey::D);
    }
}
