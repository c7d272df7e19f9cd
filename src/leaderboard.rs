//! Read-only leaderboard display
//!
//! Ranking is computed by the external data service; this module only
//! fetches and shows it. While a view is open it refreshes itself on a
//! fixed interval through the same alarm machinery the session uses, and
//! a failed refresh keeps the previous standings on screen instead of
//! disturbing the quiz.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use web_time::Duration;

use crate::TopList;

/// One ranked row as returned by the external ranking query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Position in the ranking, 1-indexed, computed externally
    pub rank: u32,
    /// The player's display name
    pub user_name: String,
    /// The player's email address
    pub email: String,
    /// The player's college or affiliation
    pub college_name: String,
    /// Number of correct answers in the ranked run
    pub correct_answers: u32,
    /// Number of questions in the ranked run
    pub total_questions: u32,
    /// Score percentage, computed externally
    pub score_percentage: f64,
}

/// Errors surfaced when the ranking query fails
///
/// Recovered locally: the view logs the failure, keeps its previous
/// entries, and tries again on the next refresh.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The ranking query could not be executed
    #[error("leaderboard query failed: {0}")]
    Unavailable(String),
}

/// Source of ranked entries, implemented by the data-service adapter
pub trait LeaderboardSource {
    /// Returns up to `limit` entries in rank order
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Unavailable`] when the query cannot be
    /// executed.
    fn fetch_top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, FetchError>;
}

/// Timed refreshes owned by an open leaderboard view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// The refresh interval has elapsed
    RefreshDue {
        /// Scheduling generation
        generation: u64,
    },
}

/// A leaderboard view with interval-driven refresh
///
/// Opening the view fetches immediately and schedules the next refresh;
/// closing it orphans any pending refresh via a generation bump, so a
/// late alarm cannot revive a closed view. The view never touches the
/// session state machine.
#[derive(Debug)]
pub struct LeaderboardView {
    open: bool,
    limit: usize,
    generation: u64,
    entries: TopList<LeaderboardEntry>,
    last_error: Option<FetchError>,
}

impl Default for LeaderboardView {
    /// A closed view showing the default number of entries
    fn default() -> Self {
        Self::new(crate::constants::leaderboard::DEFAULT_LIMIT)
    }
}

impl LeaderboardView {
    /// Creates a closed view showing up to `limit` entries
    ///
    /// The limit is clamped to the configured maximum.
    pub fn new(limit: usize) -> Self {
        Self {
            open: false,
            limit: limit.min(crate::constants::leaderboard::MAX_LIMIT),
            generation: 0,
            entries: TopList::default(),
            last_error: None,
        }
    }

    /// Opens the view: fetches standings and schedules the first refresh
    ///
    /// Opening an already-open view does nothing.
    pub fn open<L: LeaderboardSource, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        source: &L,
        mut schedule_message: S,
    ) {
        if self.open {
            return;
        }
        self.open = true;
        self.refresh(source);
        self.schedule_refresh(&mut schedule_message);
    }

    /// Closes the view and orphans any pending refresh
    pub fn close(&mut self) {
        self.open = false;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Delivers a refresh alarm back into the view
    ///
    /// Stale alarms (closed view or bumped generation) are dropped; a
    /// live one refetches and schedules the next interval.
    pub fn receive_alarm<L: LeaderboardSource, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        message: &AlarmMessage,
        source: &L,
        mut schedule_message: S,
    ) {
        let AlarmMessage::RefreshDue { generation } = *message;
        if !self.open || generation != self.generation {
            return;
        }
        self.refresh(source);
        self.schedule_refresh(&mut schedule_message);
    }

    /// Schedules the next interval refresh
    fn schedule_refresh<S: FnMut(crate::AlarmMessage, Duration)>(&self, schedule_message: &mut S) {
        schedule_message(
            AlarmMessage::RefreshDue {
                generation: self.generation,
            }
            .into(),
            Duration::from_millis(crate::constants::leaderboard::REFRESH_MILLIS),
        );
    }

    /// Fetches standings, keeping the previous ones on failure
    fn refresh<L: LeaderboardSource>(&mut self, source: &L) {
        match source.fetch_top(self.limit) {
            Ok(entries) => {
                let exact_count = entries.len();
                self.entries = TopList::new(entries.into_iter(), self.limit, exact_count);
                self.last_error = None;
            }
            Err(error) => {
                log::warn!("leaderboard refresh failed: {error}");
                self.last_error = Some(error);
            }
        }
    }

    /// Whether the view is currently open
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The most recently fetched standings
    pub fn entries(&self) -> &TopList<LeaderboardEntry> {
        &self.entries
    }

    /// The error from the last refresh, if it failed
    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }
}
