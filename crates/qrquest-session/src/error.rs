//! Error types for the session layer.

use qrquest_protocol::{PlayerId, ProtocolError};

/// Errors that can occur while registering, querying, or advancing a
/// player, or while reading and writing the hint configuration.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Another live session already uses this (name, family name) pair.
    #[error("player {name} {family_name} already exists")]
    DuplicatePlayer { name: String, family_name: String },

    /// The freshly generated id collided with an existing player.
    #[error("player {0} already registered")]
    DuplicateId(PlayerId),

    /// No session exists for the given player. Either the id was never
    /// registered or the session already expired and was evicted.
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    /// The player's time budget is used up. The session has been evicted.
    #[error("game time is up for player {0}")]
    SessionExpired(PlayerId),

    /// The scanned code is not the one expected at the player's level.
    /// No state was changed.
    #[error("incorrect QR code for player {player_id} at level {level}")]
    InvalidCode { player_id: PlayerId, level: u32 },

    /// The hints file exists but isn't a valid hint sequence.
    #[error("hints file is malformed: {0}")]
    MalformedStorage(#[source] ProtocolError),

    /// The hints file couldn't be read or written.
    #[error("hints storage failed: {0}")]
    Storage(#[source] ProtocolError),

    /// The hint book's owner task is gone (shut down or panicked).
    #[error("hint book is unavailable")]
    Unavailable,
}

impl From<ProtocolError> for SessionError {
    fn from(err: ProtocolError) -> Self {
        if err.is_decode() {
            Self::MalformedStorage(err)
        } else {
            Self::Storage(err)
        }
    }
}
