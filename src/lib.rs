//! # Gauntlet Quiz Engine
//!
//! This library provides the core session logic for a timed
//! multiple-choice quiz whose final segment inverts the scoring rule:
//! the player must pick an *incorrect* option to score. It handles the
//! phase state machine, answer evaluation, elapsed-time accounting, and
//! the boundaries to external question storage, result persistence, and
//! the leaderboard ranking service.
//!
//! The engine is sans-IO and single-threaded: timed transitions are
//! handed to a caller-supplied scheduling closure as [`AlarmMessage`]
//! values and delivered back when due, so the same core runs under any
//! timer implementation, native or WASM.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

use derive_where::derive_where;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub mod constants;

pub mod clock;
pub mod leaderboard;
pub mod profile;
pub mod question;
pub mod scoring;
pub mod session;
pub mod submit;

/// Timed transitions scheduled by the engine's components
///
/// The host shell holds one timer queue; this enum routes a fired alarm
/// back to the component that scheduled it. Alarms are serializable so a
/// shell that persists sessions can persist its timer queue alongside.
#[derive(Debug, Clone, derive_more::From, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// Phase transitions and ticks owned by the session state machine
    Session(session::AlarmMessage),
    /// Interval refreshes owned by an open leaderboard view
    Leaderboard(leaderboard::AlarmMessage),
}

/// A display list bounded to the top N items while keeping the exact count
///
/// Used for leaderboard views that show "top 10 of 124": the list holds
/// at most the display limit, and the exact total survives truncation.
#[derive(Debug, Clone, Serialize)]
#[derive_where(Default)]
pub struct TopList<T> {
    /// The exact total count of items before truncation
    exact_count: usize,
    /// The retained items (up to the limit)
    entries: Vec<T>,
}

impl<T> TopList<T> {
    /// Creates a list from an iterator, keeping at most `limit` items
    pub fn new<I: Iterator<Item = T>>(entries: I, limit: usize, exact_count: usize) -> Self {
        let entries = entries.take(limit).collect_vec();
        Self {
            exact_count,
            entries,
        }
    }

    /// The exact total count before truncation
    pub fn exact_count(&self) -> usize {
        self.exact_count
    }

    /// The retained items
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    /// Whether items were dropped to fit the limit
    pub fn is_truncated(&self) -> bool {
        self.entries.len() < self.exact_count
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_top_list_truncates_to_limit() {
        let list = TopList::new([1, 2, 3, 4, 5].into_iter(), 3, 5);

        assert_eq!(list.exact_count(), 5);
        assert_eq!(list.entries(), &[1, 2, 3]);
        assert!(list.is_truncated());
    }

    #[test]
    fn test_top_list_limit_larger_than_items() {
        let list = TopList::new([1, 2, 3].into_iter(), 5, 3);

        assert_eq!(list.exact_count(), 3);
        assert_eq!(list.entries(), &[1, 2, 3]);
        assert!(!list.is_truncated());
    }

    #[test]
    fn test_top_list_default_is_empty() {
        let list: TopList<String> = TopList::default();

        assert_eq!(list.exact_count(), 0);
        assert!(list.entries().is_empty());
    }

    #[test]
    fn test_alarm_message_round_trips() {
        let alarm: AlarmMessage =
            session::AlarmMessage::CountdownFinished { generation: 7 }.into();
        let json = serde_json::to_string(&alarm).unwrap();
        assert!(json.contains("Session"));
        assert!(json.contains("CountdownFinished"));

        let restored: AlarmMessage = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            restored,
            AlarmMessage::Session(session::AlarmMessage::CountdownFinished { generation: 7 })
        ));
    }

    #[test]
    fn test_leaderboard_alarm_converts() {
        let alarm: AlarmMessage =
            leaderboard::AlarmMessage::RefreshDue { generation: 0 }.into();
        assert!(matches!(alarm, AlarmMessage::Leaderboard(_)));
    }
}
