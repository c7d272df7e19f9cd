//! Configuration constants for the quiz session engine
//!
//! This module contains the timing values and limits used throughout
//! the engine, grouped by the component that owns them.

/// Session pacing constants
pub mod session {
    /// Duration of the pre-quiz countdown in milliseconds (3-2-1 plus "go")
    pub const COUNTDOWN_MILLIS: u64 = 3_800;
    /// Delay after an answer is committed before the next question activates
    pub const ACKNOWLEDGEMENT_MILLIS: u64 = 500;
    /// Duration of the boss entrance interstitial in milliseconds
    pub const BOSS_ENTRANCE_MILLIS: u64 = 3_800;
    /// Interval between elapsed-time ticks in milliseconds
    pub const TICK_MILLIS: u64 = 1_000;

    /// Minimum configurable countdown duration in milliseconds
    pub const MIN_COUNTDOWN_MILLIS: u64 = 0;
    /// Maximum configurable countdown duration in milliseconds
    pub const MAX_COUNTDOWN_MILLIS: u64 = 30_000;
    /// Minimum configurable acknowledgement delay in milliseconds
    pub const MIN_ACKNOWLEDGEMENT_MILLIS: u64 = 0;
    /// Maximum configurable acknowledgement delay in milliseconds
    pub const MAX_ACKNOWLEDGEMENT_MILLIS: u64 = 5_000;
    /// Minimum configurable boss entrance duration in milliseconds
    pub const MIN_BOSS_ENTRANCE_MILLIS: u64 = 0;
    /// Maximum configurable boss entrance duration in milliseconds
    pub const MAX_BOSS_ENTRANCE_MILLIS: u64 = 30_000;
}

/// Question content constants
pub mod question {
    /// Maximum length of a question's display text in characters
    pub const MAX_TEXT_LENGTH: usize = 200;
    /// Maximum length of a single answer option in characters
    pub const MAX_OPTION_LENGTH: usize = 200;
    /// Maximum number of questions allowed in a single set
    pub const MAX_QUESTION_COUNT: usize = 100;
}

/// Player profile constants
pub mod profile {
    /// Minimum length of the player's name
    pub const MIN_NAME_LENGTH: usize = 2;
    /// Maximum length of the player's name
    pub const MAX_NAME_LENGTH: usize = 100;
    /// Maximum length of the player's email address
    pub const MAX_EMAIL_LENGTH: usize = 254;
    /// Exact number of digits required in a mobile number
    pub const MOBILE_DIGITS: usize = 10;
    /// Minimum length of the college/affiliation name
    pub const MIN_COLLEGE_LENGTH: usize = 3;
    /// Maximum length of the college/affiliation name
    pub const MAX_COLLEGE_LENGTH: usize = 200;
}

/// Leaderboard display constants
pub mod leaderboard {
    /// Interval between automatic refreshes of an open leaderboard view
    pub const REFRESH_MILLIS: u64 = 5_000;
    /// Default number of entries shown in a leaderboard view
    pub const DEFAULT_LIMIT: usize = 10;
    /// Maximum number of entries a view may request
    pub const MAX_LIMIT: usize = 1_000;
}
