//! The `playerId` session cookie.
//!
//! The cookie only carries the player id. Its `Max-Age` matches the game
//! duration, so the browser forgets it around the time the session
//! expires on the server anyway.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use qrquest_protocol::PlayerId;

/// Name of the session cookie.
pub const PLAYER_COOKIE: &str = "playerId";

/// Reads the player id from the request's `Cookie` headers.
pub fn player_id(headers: &HeaderMap) -> Option<PlayerId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == PLAYER_COOKIE)
        .map(|(_, value)| value.trim_matches('"'))
        .filter(|value| !value.is_empty())
        .map(PlayerId::from)
}

/// Appends a `Set-Cookie` header that stores `player_id` for `max_age_secs`.
pub fn set_player(headers: &mut HeaderMap, player_id: &PlayerId, max_age_secs: u64) {
    let cookie =
        format!("{PLAYER_COOKIE}={player_id}; Max-Age={max_age_secs}; Path=/; SameSite=Lax");
    append(headers, &cookie);
}

/// Appends a `Set-Cookie` header that deletes the session cookie.
pub fn clear_player(headers: &mut HeaderMap) {
    let cookie = format!(
        "{PLAYER_COOKIE}=\"\"; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT; \
         Path=/; SameSite=Lax"
    );
    append(headers, &cookie);
}

fn append(headers: &mut HeaderMap, cookie: &str) {
    // Player ids are UUIDs we generated ourselves, so this only fails if
    // that invariant is broken.
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            headers.append(SET_COOKIE, value);
        }
        Err(e) => tracing::error!(error = %e, "invalid Set-Cookie value"),
    }
}
