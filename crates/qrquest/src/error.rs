//! Unified error type for the qrquest server.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use qrquest_leaderboard::LeaderboardError;
use qrquest_protocol::ProtocolError;
use qrquest_protocol::api::ErrorBody;
use qrquest_session::SessionError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically. Handlers
/// return `Result<_, QuestError>` and the [`IntoResponse`] impl below
/// turns the error into a status code and a `{"detail": …}` body.
#[derive(Debug, thiserror::Error)]
pub enum QuestError {
    /// A protocol-level error (encode, decode, document I/O).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (duplicate, not found, expired, bad code).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A leaderboard-level error (no results, storage failure).
    #[error(transparent)]
    Leaderboard(#[from] LeaderboardError),

    /// The request carried no `playerId` cookie.
    #[error("no player cookie")]
    MissingPlayerCookie,

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Binding or serving the HTTP listener failed.
    #[error("server i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuestError {
    /// The HTTP status and client-facing message for this error.
    pub fn status_and_detail(&self) -> (StatusCode, String) {
        match self {
            Self::Session(e) => match e {
                SessionError::DuplicatePlayer { .. } => (
                    StatusCode::BAD_REQUEST,
                    "Player with this name already exists".into(),
                ),
                SessionError::DuplicateId(_) => {
                    (StatusCode::BAD_REQUEST, "Player already registered".into())
                }
                SessionError::PlayerNotFound(_) => {
                    (StatusCode::NOT_FOUND, "Player not found".into())
                }
                SessionError::SessionExpired(_) => {
                    (StatusCode::BAD_REQUEST, "Game time is up".into())
                }
                SessionError::InvalidCode { .. } => {
                    (StatusCode::METHOD_NOT_ALLOWED, "Incorrect QR code".into())
                }
                SessionError::MalformedStorage(_)
                | SessionError::Storage(_)
                | SessionError::Unavailable => {
                    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
                }
            },
            Self::Leaderboard(LeaderboardError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "Player results not found".into())
            }
            Self::MissingPlayerCookie => (StatusCode::NOT_FOUND, "Player not found".into()),
            Self::Leaderboard(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            Self::Protocol(_) | Self::Config(_) | Self::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        }
    }
}

impl IntoResponse for QuestError {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        (status, Json(ErrorBody { detail })).into_response()
    }
}
