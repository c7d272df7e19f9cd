//! Session state machine and phase orchestration
//!
//! This module contains the controller that sequences a player through a
//! quiz run: profile collection, the welcome screen, the countdown, the
//! questions themselves (with the entrance interstitial when play crosses
//! into the inverted segment), and the final results phase.
//!
//! All timing is cooperative: the controller never sleeps or spawns.
//! Whenever a phase owns a timed transition it hands an [`AlarmMessage`]
//! and a duration to a caller-supplied scheduling closure, and the host
//! shell delivers the message back through [`Session::receive_alarm`]
//! when the time comes. Every alarm carries the generation counter it was
//! scheduled under; restarting or tearing down a session bumps the
//! counter, so a timer that outlives its session is ignored instead of
//! firing into fresh state.

use std::fmt::Debug;

use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use web_time::Duration;

use crate::{
    clock::ElapsedClock,
    profile::PlayerProfile,
    question::{LoadError, OptionKey, Question, QuestionSet, QuestionSource, RoundKind},
    scoring,
    submit::{FinalResult, ResultSink},
};

type ValidationResult = garde::Result;

/// Validates that a duration falls within millisecond bounds
fn validate_duration_millis<const MIN_MILLIS: u64, const MAX_MILLIS: u64>(
    field: &'static str,
    val: &Duration,
) -> ValidationResult {
    let millis = u64::try_from(val.as_millis()).unwrap_or(u64::MAX);
    if (MIN_MILLIS..=MAX_MILLIS).contains(&millis) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "{field} is outside of the bounds [{MIN_MILLIS},{MAX_MILLIS}] milliseconds",
        )))
    }
}

/// Validates the pre-quiz countdown duration
fn validate_countdown(val: &Duration) -> ValidationResult {
    validate_duration_millis::<
        { crate::constants::session::MIN_COUNTDOWN_MILLIS },
        { crate::constants::session::MAX_COUNTDOWN_MILLIS },
    >("countdown", val)
}

/// Validates the post-answer acknowledgement delay
fn validate_acknowledgement(val: &Duration) -> ValidationResult {
    validate_duration_millis::<
        { crate::constants::session::MIN_ACKNOWLEDGEMENT_MILLIS },
        { crate::constants::session::MAX_ACKNOWLEDGEMENT_MILLIS },
    >("acknowledgement", val)
}

/// Validates the boss entrance display duration
fn validate_boss_entrance(val: &Duration) -> ValidationResult {
    validate_duration_millis::<
        { crate::constants::session::MIN_BOSS_ENTRANCE_MILLIS },
        { crate::constants::session::MAX_BOSS_ENTRANCE_MILLIS },
    >("boss_entrance", val)
}

/// Configuration options for a quiz session
///
/// The durations pace the presentational phases; they are part of the
/// engine contract because they define when the next question becomes
/// answerable, not just how long something stays on screen.
#[serde_with::serde_as]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct SessionOptions {
    /// Whether a validated profile must be supplied before the welcome
    /// screen; when false the player may proceed anonymously
    #[garde(skip)]
    require_profile: bool,
    /// Duration of the pre-quiz countdown
    #[garde(custom(|v, _| validate_countdown(v)))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    countdown: Duration,
    /// Delay between committing an answer and activating the next question
    #[garde(custom(|v, _| validate_acknowledgement(v)))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    acknowledgement: Duration,
    /// Duration of the entrance interstitial before the inverted segment
    #[garde(custom(|v, _| validate_boss_entrance(v)))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    boss_entrance: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            require_profile: true,
            countdown: Duration::from_millis(crate::constants::session::COUNTDOWN_MILLIS),
            acknowledgement: Duration::from_millis(
                crate::constants::session::ACKNOWLEDGEMENT_MILLIS,
            ),
            boss_entrance: Duration::from_millis(crate::constants::session::BOSS_ENTRANCE_MILLIS),
        }
    }
}

impl SessionOptions {
    /// Sets whether a profile is required before the session can start
    pub fn with_require_profile(mut self, require_profile: bool) -> Self {
        self.require_profile = require_profile;
        self
    }
}

/// The phase a session is currently in
///
/// Transitions are strictly forward; the only way back is a full
/// [`Session::restart`]. The answerable question index lives inside the
/// variant that has one, so a phase without an active question cannot
/// carry a stale index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the player's identity (or an explicit skip)
    CollectingProfile,
    /// Identity settled; waiting for the player to start
    Welcome,
    /// Fixed-duration countdown before the first question
    Countdown,
    /// A question is on screen and answerable
    InProgress {
        /// Index of the answerable question within the set
        index: usize,
    },
    /// Entrance interstitial shown when play crosses into the inverted
    /// segment
    BossEntrance {
        /// Index of the question that activates when the entrance ends
        next: usize,
    },
    /// Terminal phase; the final result has been snapshotted
    Results,
}

/// Immutable record of one committed answer
///
/// Created exactly once per question, the instant the player commits;
/// appended to the session's ordered sequence and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// Identity of the answered question
    pub question_id: Uuid,
    /// Which correctness rule applied
    pub kind: RoundKind,
    /// The option the player picked
    pub submitted: OptionKey,
    /// The option the store designates as correct
    pub correct: OptionKey,
    /// Outcome under the round kind's rule
    pub was_correct: bool,
}

/// Timed transitions owned by the session's phases
///
/// Each variant carries the generation counter current when it was
/// scheduled; a mismatch on delivery means the session was reset in the
/// meantime and the alarm is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// The countdown display has run its course
    CountdownFinished {
        /// Scheduling generation
        generation: u64,
    },
    /// The acknowledgement window after answering question `index` is over
    AdvanceQuestion {
        /// Scheduling generation
        generation: u64,
        /// The question whose answer was just acknowledged
        index: usize,
    },
    /// The boss entrance interstitial has run its course
    BossEntranceFinished {
        /// Scheduling generation
        generation: u64,
    },
    /// One second of active play has elapsed
    Tick {
        /// Scheduling generation
        generation: u64,
    },
}

/// Errors surfaced by session operations
///
/// Out-of-turn calls that the contract defines as no-ops (such as a
/// repeated answer submission) are not errors; these variants cover
/// genuinely invalid input and programmer/configuration mistakes that
/// must stay detectable rather than being coerced away.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The supplied profile failed validation
    #[error("player profile is invalid: {0}")]
    InvalidProfile(#[from] garde::Report),
    /// An anonymous start was attempted while a profile is required
    #[error("a profile is required before the session can start")]
    ProfileRequired,
    /// No non-empty question set has been attached yet
    #[error("no question set has been loaded")]
    QuestionsNotReady,
    /// No question is active in the current phase
    #[error("no question is active in the current phase")]
    NoActiveQuestion,
    /// The active pointer does not resolve to a question; this is a
    /// configuration error, never a scoring default
    #[error("question pointer {pointer} is outside the loaded set of {total}")]
    PointerOutOfRange {
        /// The offending index
        pointer: usize,
        /// Size of the loaded set
        total: usize,
    },
}

/// The quiz session aggregate
///
/// Owns the phase, the committed answers, the elapsed clock, and the
/// optional player profile. The attached question set is read-only; the
/// controller never reorders or mutates it.
#[derive(Serialize, Deserialize)]
pub struct Session {
    /// Pacing and profile-requirement configuration
    options: SessionOptions,
    /// Current phase
    phase: Phase,
    /// The loaded question set, once attached
    questions: Option<QuestionSet>,
    /// The player's identity, once supplied
    profile: Option<PlayerProfile>,
    /// Committed answers in play order
    answers: Vec<AnswerRecord>,
    /// Whole-second duration accumulator
    clock: ElapsedClock,
    /// Timer-cancellation epoch; bumped to orphan pending alarms
    generation: u64,
    /// The results snapshot, taken exactly once
    final_result: once_cell_serde::sync::OnceCell<FinalResult>,
}

impl Debug for Session {
    /// Custom debug implementation that avoids printing the question set
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.phase)
            .field("answers", &self.answers.len())
            .field("elapsed", &self.clock.seconds())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Creates a session waiting for a player profile
    pub fn new(options: SessionOptions) -> Self {
        Self {
            options,
            phase: Phase::CollectingProfile,
            questions: None,
            profile: None,
            answers: Vec::new(),
            clock: ElapsedClock::default(),
            generation: 0,
            final_result: once_cell_serde::sync::OnceCell::new(),
        }
    }

    /// The current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of committed answers; also the index of the next question
    /// to be committed
    pub fn pointer(&self) -> usize {
        self.answers.len()
    }

    /// Committed answers in play order
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    /// The player's identity, if one was supplied
    pub fn profile(&self) -> Option<&PlayerProfile> {
        self.profile.as_ref()
    }

    /// The attached question set, if one was loaded
    pub fn questions(&self) -> Option<&QuestionSet> {
        self.questions.as_ref()
    }

    /// Whole seconds of active play accumulated so far
    pub fn elapsed_seconds(&self) -> u64 {
        self.clock.seconds()
    }

    /// The results snapshot, present once the last answer was acknowledged
    pub fn final_result(&self) -> Option<&FinalResult> {
        self.final_result.get()
    }

    /// The question currently on screen and answerable
    ///
    /// # Errors
    ///
    /// [`SessionError::NoActiveQuestion`] outside `InProgress`;
    /// [`SessionError::PointerOutOfRange`] when the active index does not
    /// resolve to a question, which indicates corrupted configuration.
    pub fn current_question(&self) -> Result<&Question, SessionError> {
        match self.phase {
            Phase::InProgress { index } => self.question_at(index),
            _ => Err(SessionError::NoActiveQuestion),
        }
    }

    /// Looks up a question by index, surfacing corruption as an error
    fn question_at(&self, index: usize) -> Result<&Question, SessionError> {
        let questions = self
            .questions
            .as_ref()
            .ok_or(SessionError::QuestionsNotReady)?;
        questions
            .get(index)
            .ok_or(SessionError::PointerOutOfRange {
                pointer: index,
                total: questions.len(),
            })
    }

    /// Attempts to transition from one phase to another
    ///
    /// Returns `true` only when the current phase matched the expected
    /// `before` phase, so a late or repeated trigger finds the state
    /// already moved and does nothing.
    fn change_phase(&mut self, before: Phase, after: Phase) -> bool {
        if self.phase == before {
            self.phase = after;
            true
        } else {
            false
        }
    }

    /// Stores a validated profile and advances to the welcome screen
    ///
    /// Returns `false` (without storing) when the session is not
    /// collecting a profile.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidProfile`] when validation fails; the phase
    /// does not advance.
    pub fn supply_profile(&mut self, profile: PlayerProfile) -> Result<bool, SessionError> {
        profile.validate()?;
        if !matches!(self.phase, Phase::CollectingProfile) {
            return Ok(false);
        }
        self.profile = Some(profile);
        self.phase = Phase::Welcome;
        Ok(true)
    }

    /// Advances to the welcome screen without an identity
    ///
    /// # Errors
    ///
    /// [`SessionError::ProfileRequired`] when the session options demand
    /// a profile.
    pub fn skip_profile(&mut self) -> Result<bool, SessionError> {
        if self.options.require_profile {
            return Err(SessionError::ProfileRequired);
        }
        Ok(self.change_phase(Phase::CollectingProfile, Phase::Welcome))
    }

    /// Attaches an already-built question set
    ///
    /// Accepted only before the countdown starts; returns whether the
    /// set was stored.
    pub fn attach_questions(&mut self, questions: QuestionSet) -> bool {
        if matches!(self.phase, Phase::CollectingProfile | Phase::Welcome) {
            self.questions = Some(questions);
            true
        } else {
            false
        }
    }

    /// Fetches questions from a source and attaches them
    ///
    /// Retryable: a failed load leaves the session where it was, and the
    /// caller simply invokes this again.
    ///
    /// # Errors
    ///
    /// [`LoadError::Unavailable`] when the source cannot be reached;
    /// [`LoadError::Empty`] when it returns no questions.
    pub fn load_questions<P: QuestionSource>(&mut self, source: &P) -> Result<bool, LoadError> {
        let questions = QuestionSet::new(source.fetch()?)?;
        Ok(self.attach_questions(questions))
    }

    /// Starts the quiz: welcome screen into countdown
    ///
    /// Schedules the countdown-finished alarm. Returns `false` when the
    /// session is not on the welcome screen.
    ///
    /// # Errors
    ///
    /// [`SessionError::QuestionsNotReady`] when no question set has been
    /// attached; the session stays on the welcome screen so the load can
    /// be retried.
    pub fn begin<S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        mut schedule_message: S,
    ) -> Result<bool, SessionError> {
        if !matches!(self.phase, Phase::Welcome) {
            return Ok(false);
        }
        if self.questions.is_none() {
            return Err(SessionError::QuestionsNotReady);
        }
        self.phase = Phase::Countdown;
        schedule_message(
            AlarmMessage::CountdownFinished {
                generation: self.generation,
            }
            .into(),
            self.options.countdown,
        );
        Ok(true)
    }

    /// Commits the player's answer for the question on screen
    ///
    /// Evaluates correctness under the question's round kind, appends the
    /// answer record, and schedules the advance alarm for the end of the
    /// acknowledgement window. Exactly one record is created per question:
    /// repeated calls during the acknowledgement window, or calls in any
    /// other phase, return `Ok(false)` and change nothing.
    ///
    /// # Errors
    ///
    /// [`SessionError::PointerOutOfRange`] when the active index does not
    /// resolve to a question.
    pub fn submit_answer<S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        choice: OptionKey,
        mut schedule_message: S,
    ) -> Result<bool, SessionError> {
        let Phase::InProgress { index } = self.phase else {
            return Ok(false);
        };
        if self.answers.len() > index {
            // Already committed; the acknowledgement window is open.
            return Ok(false);
        }
        let (question_id, kind, correct) = {
            let question = self.question_at(index)?;
            (question.id, question.kind, question.correct)
        };
        let was_correct = scoring::evaluate(kind, choice, correct);
        self.answers.push(AnswerRecord {
            question_id,
            kind,
            submitted: choice,
            correct,
            was_correct,
        });
        schedule_message(
            AlarmMessage::AdvanceQuestion {
                generation: self.generation,
                index,
            }
            .into(),
            self.options.acknowledgement,
        );
        Ok(true)
    }

    /// Delivers a previously scheduled alarm back into the session
    ///
    /// Alarms whose generation does not match the session's were
    /// scheduled before a reset and are dropped. Alarms that arrive for a
    /// phase the session has already left are likewise ignored.
    ///
    /// # Errors
    ///
    /// [`SessionError::PointerOutOfRange`] when advancing exposes a
    /// corrupted pointer/set combination.
    pub fn receive_alarm<S: FnMut(crate::AlarmMessage, Duration), R: ResultSink>(
        &mut self,
        message: &AlarmMessage,
        mut schedule_message: S,
        sink: &R,
    ) -> Result<(), SessionError> {
        match *message {
            AlarmMessage::CountdownFinished { generation } => {
                if generation != self.generation {
                    return Ok(());
                }
                if self.change_phase(Phase::Countdown, Phase::InProgress { index: 0 }) {
                    self.clock.start();
                    self.schedule_tick(&mut schedule_message);
                }
            }
            AlarmMessage::AdvanceQuestion { generation, index } => {
                if generation != self.generation {
                    return Ok(());
                }
                if !matches!(self.phase, Phase::InProgress { index: current } if current == index) {
                    return Ok(());
                }
                self.advance_from(index, &mut schedule_message, sink)?;
            }
            AlarmMessage::BossEntranceFinished { generation } => {
                if generation != self.generation {
                    return Ok(());
                }
                if let Phase::BossEntrance { next } = self.phase {
                    self.phase = Phase::InProgress { index: next };
                }
            }
            AlarmMessage::Tick { generation } => {
                if generation != self.generation {
                    return Ok(());
                }
                if self.clock.tick() {
                    self.schedule_tick(&mut schedule_message);
                }
            }
        }
        Ok(())
    }

    /// Schedules the next whole-second tick
    fn schedule_tick<S: FnMut(crate::AlarmMessage, Duration)>(&self, schedule_message: &mut S) {
        schedule_message(
            AlarmMessage::Tick {
                generation: self.generation,
            }
            .into(),
            Duration::from_millis(crate::constants::session::TICK_MILLIS),
        );
    }

    /// Moves past the question at `index` once its acknowledgement ends
    fn advance_from<S: FnMut(crate::AlarmMessage, Duration), R: ResultSink>(
        &mut self,
        index: usize,
        schedule_message: &mut S,
        sink: &R,
    ) -> Result<(), SessionError> {
        let total = self.questions.as_ref().map_or(0, QuestionSet::len);
        let next = index + 1;
        if next < total {
            let crossing_into_inverted = self.question_at(index)?.kind == RoundKind::Standard
                && self.question_at(next)?.kind == RoundKind::Inverted;
            if crossing_into_inverted {
                self.phase = Phase::BossEntrance { next };
                schedule_message(
                    AlarmMessage::BossEntranceFinished {
                        generation: self.generation,
                    }
                    .into(),
                    self.options.boss_entrance,
                );
            } else {
                self.phase = Phase::InProgress { index: next };
            }
        } else {
            self.finish(sink);
        }
        Ok(())
    }

    /// Freezes the clock, snapshots the final result, submits it, and
    /// enters the results phase
    ///
    /// The snapshot is a value copy taken exactly once; the submission is
    /// attempted exactly once, and its failure is logged rather than
    /// surfaced to the player.
    fn finish<R: ResultSink>(&mut self, sink: &R) {
        self.clock.freeze();
        let total = self.questions.as_ref().map_or(0, QuestionSet::len);
        let result = self.final_result.get_or_init(|| {
            FinalResult::snapshot(
                total,
                self.clock.seconds(),
                self.profile.clone(),
                self.answers.clone(),
            )
        });
        if let Err(error) = sink.submit(result.submission()) {
            log::warn!("result submission failed: {error}");
        }
        self.phase = Phase::Results;
    }

    /// Orphans every pending alarm scheduled for this session
    ///
    /// Call on teardown; [`Session::restart`] calls it implicitly. Any
    /// alarm delivered afterwards carries a stale generation and is
    /// dropped.
    pub fn cancel_pending(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Resets every piece of session-owned state
    ///
    /// The profile, answers, elapsed seconds, snapshot, and phase all
    /// return to their initial values and pending alarms are orphaned.
    /// The attached question set survives, ready for the next run.
    pub fn restart(&mut self) {
        self.cancel_pending();
        self.phase = Phase::CollectingProfile;
        self.profile = None;
        self.answers.clear();
        self.clock.reset();
        self.final_result = once_cell_serde::sync::OnceCell::new();
    }
}
