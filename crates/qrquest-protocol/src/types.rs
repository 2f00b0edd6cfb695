//! Core game types shared by every qrquest crate.
//!
//! These are the records that get persisted to disk (hints, results) and
//! the immutable hand-off record that travels from the session layer to
//! the leaderboard. HTTP request/response bodies live in [`crate::api`].

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// An opaque, unique identifier for a registered player.
///
/// Newtype wrapper around the string form of a random (v4) UUID. We keep
/// the string rather than a parsed `Uuid` because ids arrive from cookies
/// and URL paths: an id that isn't even a valid UUID is simply an unknown
/// player (404), not a malformed request.
///
/// `#[serde(transparent)]` serializes `PlayerId("abc")` as just `"abc"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Display prints the raw id, so it can go straight into a cookie value
/// or a log field.
impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// Hint
// ---------------------------------------------------------------------------

/// One checkpoint in the hint sequence.
///
/// A player standing at level `level` sees `text` and `educational_text`,
/// and advances by scanning the QR code whose value is `next_qr_code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    /// Position of this checkpoint in the sequence.
    pub level: u32,
    /// Background text shown alongside the hint.
    pub educational_text: String,
    /// The hint pointing at the next QR code.
    pub text: String,
    /// The code value that advances the player past this level.
    pub next_qr_code: String,
}

// ---------------------------------------------------------------------------
// QrCode
// ---------------------------------------------------------------------------

/// A scanned QR code as reported by the client.
///
/// `level` is the level the code claims to belong to. It is accepted but
/// only `code` takes part in validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrCode {
    pub code: String,
    pub level: u32,
}

// ---------------------------------------------------------------------------
// Completion (session → leaderboard hand-off)
// ---------------------------------------------------------------------------

/// A finalized completion, handed from the session layer to the
/// leaderboard exactly once per player.
///
/// This is also the body of `POST /api/results`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub player_id: PlayerId,
    pub name: String,
    pub family_name: String,
    /// Seconds from registration to the final scan.
    pub completion_time: u64,
}

// ---------------------------------------------------------------------------
// GameResult
// ---------------------------------------------------------------------------

/// A ranked leaderboard entry, as stored in the results file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub player_id: PlayerId,
    pub name: String,
    pub family_name: String,
    pub completion_time: u64,
    /// Local wall-clock time the result was submitted, without offset
    /// (`2024-05-01T12:30:00.123456`).
    pub timestamp: NaiveDateTime,
    /// 1-based position in the ranked set. Recomputed on every insert.
    #[serde(default)]
    pub rank: u32,
}

impl GameResult {
    /// Builds an unranked result from a completion and a submission time.
    pub fn from_completion(completion: Completion, timestamp: NaiveDateTime) -> Self {
        Self {
            player_id: completion.player_id,
            name: completion.name,
            family_name: completion.family_name,
            completion_time: completion.completion_time,
            timestamp,
            rank: 0,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
