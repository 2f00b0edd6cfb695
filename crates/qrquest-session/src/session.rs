//! Session types: the data structures that represent a player's game run.
//!
//! A "session" is the server's record of a registered player. It tracks:
//! - WHO the player is (`PlayerId`, name, family name)
//! - WHEN they started (so we can derive how much time is left)
//! - HOW FAR they got (current level)
//! - WHETHER they finished, and in how many seconds

use std::time::Instant;

use qrquest_protocol::{Completion, PlayerId};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for session behavior.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Length of one game run in seconds. Every player gets the same
    /// budget, counted from registration.
    ///
    /// Default: 3600 (60 minutes).
    pub game_duration_secs: u64,
}

impl SessionConfig {
    /// Builds a config from a duration in whole minutes.
    ///
    /// Saturates at `u64::MAX` seconds instead of overflowing.
    pub fn from_minutes(minutes: u64) -> Self {
        Self {
            game_duration_secs: minutes.saturating_mul(60),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            game_duration_secs: 60 * 60,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Where a stored player is in the game.
///
/// ```text
///   (register) ──→ Active ──(final scan)──→ Completed
///                    │                          │
///                    └──(time budget used up)───┴──→ evicted
/// ```
///
/// There is no `Expired` variant: an expired session is deleted the next
/// time anyone touches it, so it never sits in the store.
///
/// `Completed` carries the completion time. Once a player is in this
/// state nothing moves them back, which is what keeps the completion time
/// from ever being overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Playing, time still running.
    Active,

    /// Finished the last level `completion_time` seconds after start.
    Completed { completion_time: u64 },
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A single player's session.
#[derive(Debug, Clone)]
pub struct Player {
    /// Opaque unique id, handed to the client as a cookie.
    pub id: PlayerId,

    /// Display name. Together with `family_name` it must be unique among
    /// live sessions.
    pub name: String,

    pub family_name: String,

    /// When registration completed. `Instant` is the monotonic clock, so
    /// system clock adjustments can't stretch or shrink a game.
    pub started_at: Instant,

    /// Index of the hint the player is currently working on. Starts at 0
    /// and only ever goes up.
    pub current_level: u32,

    pub state: SessionState,
}

impl Player {
    /// Creates a fresh, active player at level 0.
    pub fn new(
        id: PlayerId,
        name: impl Into<String>,
        family_name: impl Into<String>,
        started_at: Instant,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            family_name: family_name.into(),
            started_at,
            current_level: 0,
            state: SessionState::Active,
        }
    }

    /// Seconds left at `now`, clamped to zero.
    ///
    /// Elapsed time is truncated to whole seconds before subtracting, so a
    /// player who registered 0.9 s ago still has the full budget.
    pub fn time_left(&self, now: Instant, config: &SessionConfig) -> u64 {
        let elapsed = now.saturating_duration_since(self.started_at).as_secs();
        config.game_duration_secs.saturating_sub(elapsed)
    }

    /// The completion time, if the player has finished.
    pub fn completion_time(&self) -> Option<u64> {
        match self.state {
            SessionState::Completed { completion_time } => Some(completion_time),
            SessionState::Active => None,
        }
    }

    /// Returns `true` if `name`/`family_name` match this player exactly.
    pub fn has_name(&self, name: &str, family_name: &str) -> bool {
        self.name == name && self.family_name == family_name
    }

    /// The hand-off record for the leaderboard.
    pub(crate) fn completion(&self, completion_time: u64) -> Completion {
        Completion {
            player_id: self.id.clone(),
            name: self.name.clone(),
            family_name: self.family_name.clone(),
            completion_time,
        }
    }
}
