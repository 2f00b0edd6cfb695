//! Error types for the leaderboard layer.

use qrquest_protocol::{PlayerId, ProtocolError};

/// Errors that can occur while submitting or querying results.
#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    /// The player has no entry on the leaderboard.
    #[error("no results for player {0}")]
    NotFound(PlayerId),

    /// The results file couldn't be written. The submission was not
    /// applied.
    #[error("results storage failed: {0}")]
    Storage(#[from] ProtocolError),

    /// The leaderboard's owner task is gone (shut down or panicked).
    #[error("leaderboard is unavailable")]
    Unavailable,
}
