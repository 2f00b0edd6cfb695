//! JSON bodies of the HTTP API.
//!
//! Field names here are the external contract with the web frontend, so
//! they stay snake_case exactly as the client sends and reads them.

use serde::{Deserialize, Serialize};

use crate::{GameResult, PlayerId, QrCode};

/// Message returned when a finished player scans again or completes.
pub const GAME_COMPLETED: &str = "game completed";

/// `POST /api/register` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub family_name: String,
}

/// `POST /api/register` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub player_id: PlayerId,
    pub message: String,
    /// Full time budget in seconds.
    pub time_left: u64,
}

/// `GET /api/player-state` response for a live session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStateResponse {
    pub player_id: PlayerId,
    pub time_left: u64,
    pub current_level: u32,
    /// `null` until the player finishes.
    pub completion_time: Option<u64>,
}

/// `POST /api/scan` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    pub player_id: PlayerId,
    pub qr_code: QrCode,
    /// Skips code validation. Defaults to `false` when omitted.
    #[serde(default)]
    pub debug: bool,
}

/// `POST /api/scan` response.
///
/// `#[serde(untagged)]` writes each variant as a bare object with no
/// discriminator, which is the shape the frontend expects:
/// `{"educational_text": …, "hint": …}` or
/// `{"message": "game completed", "completion_time": …}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScanResponse {
    Hint {
        educational_text: String,
        hint: String,
    },
    Completed {
        message: String,
        completion_time: u64,
    },
}

impl ScanResponse {
    pub fn completed(completion_time: u64) -> Self {
        Self::Completed {
            message: GAME_COMPLETED.to_string(),
            completion_time,
        }
    }
}

/// `GET /api/results/{player_id}` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsResponse {
    pub current_player: GameResult,
    pub leaderboard: Vec<GameResult>,
}

/// One row of `GET /api/admin/active-users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePlayer {
    pub player_id: PlayerId,
    pub name: String,
    pub family_name: String,
    pub current_level: u32,
    pub time_left: u64,
    pub completion_time: Option<u64>,
}

/// Generic `{"message": …}` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error body: `{"detail": …}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_request_debug_defaults_to_false() {
        let json = r#"{"player_id":"p1","qr_code":{"code":"A","level":0}}"#;
        let req: ScanRequest = serde_json::from_str(json).unwrap();
        assert!(!req.debug);
        assert_eq!(req.qr_code.code, "A");
    }

    #[test]
    fn test_scan_response_hint_is_untagged() {
        let resp = ScanResponse::Hint {
            educational_text: "e1".into(),
            hint: "t1".into(),
        };
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            serde_json::json!({"educational_text": "e1", "hint": "t1"})
        );
    }

    #[test]
    fn test_scan_response_completed_json_format() {
        assert_eq!(
            serde_json::to_value(ScanResponse::completed(95)).unwrap(),
            serde_json::json!({"message": "game completed", "completion_time": 95})
        );
    }

    #[test]
    fn test_scan_response_deserializes_both_shapes() {
        let hint: ScanResponse =
            serde_json::from_str(r#"{"educational_text":"e","hint":"h"}"#).unwrap();
        assert!(matches!(hint, ScanResponse::Hint { .. }));

        let done: ScanResponse =
            serde_json::from_str(r#"{"message":"game completed","completion_time":7}"#)
                .unwrap();
        assert_eq!(done, ScanResponse::completed(7));
    }

    #[test]
    fn test_player_state_null_completion_time() {
        let resp = PlayerStateResponse {
            player_id: PlayerId::from("p1"),
            time_left: 10,
            current_level: 2,
            completion_time: None,
        };
        let value = serde_json::to_value(&resp).unwrap();
        assert!(value["completion_time"].is_null());
    }
}
