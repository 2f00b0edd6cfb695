//! HTTP handlers for the game API.
//!
//! Every handler takes the shared [`AppState`] and returns either a JSON
//! body or a [`QuestError`], which renders itself as a status code plus
//! `{"detail": …}`.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use qrquest_leaderboard::LeaderboardHandle;
use qrquest_protocol::api::{
    ActivePlayer, MessageResponse, PlayerStateResponse, RegisterRequest, RegisterResponse,
    ResultsResponse, ScanRequest, ScanResponse,
};
use qrquest_protocol::{Completion, Hint, PlayerId};
use qrquest_session::{HintBook, ScanOutcome, SessionError, SessionManager};

use crate::{QuestError, cookie};

/// Shared state handed to every handler.
///
/// Cloning is cheap: the session manager sits behind an `Arc` and the two
/// actor handles are channel senders.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub hints: HintBook,
    pub leaderboard: LeaderboardHandle,
}

/// `POST /api/register`
pub(crate) async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Response, QuestError> {
    let registration = state.sessions.register(&req.name, &req.family_name)?;

    let mut headers = HeaderMap::new();
    cookie::set_player(
        &mut headers,
        &registration.player_id,
        state.sessions.config().game_duration_secs,
    );

    let body = RegisterResponse {
        player_id: registration.player_id,
        message: "Registration successful".to_string(),
        time_left: registration.time_left,
    };
    Ok((headers, Json(body)).into_response())
}

/// `GET /api/player-state`
///
/// An expired session is not an error here: the client gets a 200 with
/// a message and the cookie is cleared.
pub(crate) async fn player_state(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, QuestError> {
    let player_id = cookie::player_id(&headers).ok_or(QuestError::MissingPlayerCookie)?;

    match state.sessions.get_state(&player_id) {
        Ok(status) => Ok(Json(PlayerStateResponse {
            player_id: status.player_id,
            time_left: status.time_left,
            current_level: status.current_level,
            completion_time: status.completion_time,
        })
        .into_response()),
        Err(SessionError::SessionExpired(_)) => {
            let mut headers = HeaderMap::new();
            cookie::clear_player(&mut headers);
            Ok((headers, Json(MessageResponse::new("Game time expired"))).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// `POST /api/scan`
///
/// The scan that finishes the game also records the result on the
/// leaderboard. If that submission fails the player still counts as
/// finished and the request returns 500.
pub(crate) async fn scan(
    State(state): State<AppState>,
    Json(req): Json<ScanRequest>,
) -> Result<Json<ScanResponse>, QuestError> {
    // Unknown players get a 404 even if the hints file is broken.
    if state.sessions.get(&req.player_id).is_none() {
        return Err(SessionError::PlayerNotFound(req.player_id).into());
    }

    let hints = state.hints.load().await?;
    tracing::debug!(
        player_id = %req.player_id,
        code = %req.qr_code.code,
        level = req.qr_code.level,
        debug = req.debug,
        "scan received"
    );

    let outcome = state.sessions.scan(&req.player_id, &req.qr_code, req.debug, &hints)?;

    match outcome {
        ScanOutcome::Advanced { hint, .. } => Ok(Json(ScanResponse::Hint {
            educational_text: hint.educational_text,
            hint: hint.text,
        })),
        ScanOutcome::Completed {
            completion_time,
            handoff,
        } => {
            if let Some(completion) = handoff {
                state.leaderboard.submit(completion).await?;
            }
            Ok(Json(ScanResponse::completed(completion_time)))
        }
    }
}

/// `GET /api/hints`
pub(crate) async fn get_hints(
    State(state): State<AppState>,
) -> Result<Json<Vec<Hint>>, QuestError> {
    Ok(Json(state.hints.load().await?))
}

/// `POST /api/hints`
pub(crate) async fn replace_hints(
    State(state): State<AppState>,
    Json(hints): Json<Vec<Hint>>,
) -> Result<Json<MessageResponse>, QuestError> {
    state.hints.replace_all(hints).await?;
    Ok(Json(MessageResponse::new("Hints updated successfully")))
}

/// `GET /api/results/:player_id`
pub(crate) async fn get_results(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
) -> Result<Json<ResultsResponse>, QuestError> {
    let standings = state.leaderboard.query(&player_id).await?;
    Ok(Json(ResultsResponse {
        current_player: standings.current_player,
        leaderboard: standings.leaderboard,
    }))
}

/// `POST /api/results`
pub(crate) async fn submit_result(
    State(state): State<AppState>,
    Json(completion): Json<Completion>,
) -> Result<Json<MessageResponse>, QuestError> {
    state.leaderboard.submit(completion).await?;
    Ok(Json(MessageResponse::new("Result submitted successfully")))
}

/// `GET /api/admin/active-users`
pub(crate) async fn active_users(State(state): State<AppState>) -> Json<Vec<ActivePlayer>> {
    let players = state
        .sessions
        .active_players()
        .into_iter()
        .map(|p| ActivePlayer {
            player_id: p.player_id,
            name: p.name,
            family_name: p.family_name,
            current_level: p.current_level,
            time_left: p.time_left,
            completion_time: p.completion_time,
        })
        .collect();
    Json(players)
}

/// `GET /api/health`
pub(crate) async fn health() -> &'static str {
    "OK"
}
