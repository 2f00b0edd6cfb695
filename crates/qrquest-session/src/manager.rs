//! The session manager: registration, state queries, and scan handling.
//!
//! This is the player progression state machine. It's responsible for:
//! - Registering players under a unique id and a unique name pair
//! - Deriving time left from the clock on every access
//! - Evicting sessions whose time ran out (lazily, on next touch)
//! - Validating scanned codes and advancing levels
//! - Producing the one-time completion hand-off for the leaderboard
//!
//! # Concurrency note
//!
//! `SessionManager` takes `&self` everywhere and can be shared behind an
//! `Arc`. Each operation on an existing player runs as one
//! [`SessionStore::update`] call, so the time check, the code check and the
//! level increment of a scan happen atomically. The manager never does
//! I/O: the caller loads the hint sequence first and passes it in.

use std::sync::Arc;

use qrquest_protocol::{Completion, Hint, PlayerId, QrCode};

use crate::{
    Clock, MemorySessionStore, Player, SessionConfig, SessionError, SessionState,
    SessionStore, SystemClock, Update,
};

/// Result of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub player_id: PlayerId,
    /// Full time budget in seconds.
    pub time_left: u64,
}

/// A point-in-time view of one player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStatus {
    pub player_id: PlayerId,
    pub name: String,
    pub family_name: String,
    pub time_left: u64,
    pub current_level: u32,
    pub completion_time: Option<u64>,
}

/// What a successful scan did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The player moved to `level`; `hint` is the checkpoint to show next.
    Advanced { level: u32, hint: Hint },

    /// The player has finished.
    ///
    /// `handoff` is `Some` exactly once per player: on the scan that
    /// finished the game. Repeated final scans get the cached
    /// `completion_time` and `None`, so the caller submits at most one
    /// leaderboard entry.
    Completed {
        completion_time: u64,
        handoff: Option<Completion>,
    },
}

/// Owns all player sessions and drives their progression.
///
/// ## Lifecycle
///
/// ```text
/// register() ──→ [Active] ──scan()──→ [Active, level + 1] ──…──→ [Completed]
///                   │                                                │
///                   └────── time left hits 0, next get_state()/scan() ┴──→ evicted
/// ```
pub struct SessionManager<S: SessionStore = MemorySessionStore> {
    store: S,
    config: SessionConfig,
    clock: Arc<dyn Clock>,
}

impl SessionManager<MemorySessionStore> {
    /// Creates a manager with an in-memory store and the system clock.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_store(MemorySessionStore::new(), config, Arc::new(SystemClock))
    }
}

impl<S: SessionStore> SessionManager<S> {
    /// Creates a manager over an arbitrary store and clock.
    pub fn with_store(store: S, config: SessionConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Registers a new player and starts their clock.
    ///
    /// Sessions whose time already ran out are evicted first, so a name
    /// pair frees up as soon as its previous holder's game is over.
    ///
    /// # Errors
    /// - [`SessionError::DuplicatePlayer`] if a live session has the same
    ///   name and family name
    /// - [`SessionError::DuplicateId`] if the generated id is taken
    pub fn register(&self, name: &str, family_name: &str) -> Result<Registration, SessionError> {
        let now = self.clock.now();
        self.store.retain(|p| p.time_left(now, &self.config) > 0);

        let player_id = PlayerId::generate();
        let player = Player::new(player_id.clone(), name, family_name, now);
        self.store.insert(player)?;

        tracing::info!(%player_id, name, family_name, "player registered");

        Ok(Registration {
            player_id,
            time_left: self.config.game_duration_secs,
        })
    }

    /// Returns the player's current status.
    ///
    /// # Errors
    /// - [`SessionError::PlayerNotFound`] if no such player
    /// - [`SessionError::SessionExpired`] if time ran out; the session is
    ///   evicted as part of this call
    pub fn get_state(&self, player_id: &PlayerId) -> Result<PlayerStatus, SessionError> {
        let now = self.clock.now();
        self.store
            .update(player_id, |player| {
                let time_left = player.time_left(now, &self.config);
                if time_left == 0 {
                    tracing::info!(%player_id, "session expired, evicting");
                    return Update::Evict(Err(SessionError::SessionExpired(
                        player_id.clone(),
                    )));
                }
                Update::Keep(Ok(status(player, time_left)))
            })
            .ok_or_else(|| SessionError::PlayerNotFound(player_id.clone()))?
    }

    /// Applies a scanned QR code to the player.
    ///
    /// Unless `debug` is set, `qr_code.code` must equal the `next_qr_code`
    /// of the hint at the player's current level. On a match the level
    /// goes up by one. Reaching the end of `hints` finishes the game.
    ///
    /// A player who already finished gets their cached completion time
    /// back, whatever they scanned.
    ///
    /// # Errors
    /// - [`SessionError::PlayerNotFound`] if no such player
    /// - [`SessionError::SessionExpired`] if time ran out; the session is
    ///   evicted as part of this call
    /// - [`SessionError::InvalidCode`] on a mismatch (nothing changes)
    pub fn scan(
        &self,
        player_id: &PlayerId,
        qr_code: &QrCode,
        debug: bool,
        hints: &[Hint],
    ) -> Result<ScanOutcome, SessionError> {
        let now = self.clock.now();
        self.store
            .update(player_id, |player| {
                let time_left = player.time_left(now, &self.config);
                if time_left == 0 {
                    tracing::info!(%player_id, "scan after time ran out, evicting");
                    return Update::Evict(Err(SessionError::SessionExpired(
                        player_id.clone(),
                    )));
                }
                Update::Keep(self.apply_scan(player, qr_code, debug, hints, time_left))
            })
            .ok_or_else(|| SessionError::PlayerNotFound(player_id.clone()))?
    }

    /// The part of a scan that runs once the session is known to be live.
    fn apply_scan(
        &self,
        player: &mut Player,
        qr_code: &QrCode,
        debug: bool,
        hints: &[Hint],
        time_left: u64,
    ) -> Result<ScanOutcome, SessionError> {
        if let SessionState::Completed { completion_time } = player.state {
            tracing::debug!(player_id = %player.id, "repeat scan after completion");
            return Ok(ScanOutcome::Completed {
                completion_time,
                handoff: None,
            });
        }

        let level = player.current_level;
        if !debug {
            let expected = hints
                .get(level as usize)
                .map(|hint| hint.next_qr_code.as_str());
            if expected != Some(qr_code.code.as_str()) {
                tracing::debug!(
                    player_id = %player.id,
                    level,
                    code = %qr_code.code,
                    "incorrect QR code"
                );
                return Err(SessionError::InvalidCode {
                    player_id: player.id.clone(),
                    level,
                });
            }
        }
        if qr_code.level != level {
            // Only the code value is validated; the claimed level is not.
            tracing::debug!(
                player_id = %player.id,
                level,
                claimed = qr_code.level,
                "scanned code claims a different level"
            );
        }

        player.current_level = level + 1;
        let reached = player.current_level;

        match hints.get(reached as usize) {
            Some(hint) => {
                tracing::info!(player_id = %player.id, level = reached, "player advanced");
                Ok(ScanOutcome::Advanced {
                    level: reached,
                    hint: hint.clone(),
                })
            }
            None => {
                let completion_time = self.config.game_duration_secs - time_left;
                player.state = SessionState::Completed { completion_time };
                tracing::info!(
                    player_id = %player.id,
                    completion_time,
                    "player completed the game"
                );
                Ok(ScanOutcome::Completed {
                    completion_time,
                    handoff: Some(player.completion(completion_time)),
                })
            }
        }
    }

    /// Lists every live session, evicting the ones whose time ran out.
    pub fn active_players(&self) -> Vec<PlayerStatus> {
        let now = self.clock.now();
        let mut players: Vec<PlayerStatus> = self
            .store
            .retain(|p| p.time_left(now, &self.config) > 0)
            .iter()
            .map(|p| status(p, p.time_left(now, &self.config)))
            .collect();
        players.sort_by(|a, b| a.player_id.cmp(&b.player_id));
        players
    }

    /// Returns a copy of the stored record, without touching expiry.
    pub fn get(&self, player_id: &PlayerId) -> Option<Player> {
        self.store.get(player_id)
    }

    /// Number of stored sessions (live or not yet evicted).
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

fn status(player: &Player, time_left: u64) -> PlayerStatus {
    PlayerStatus {
        player_id: player.id.clone(),
        name: player.name.clone(),
        family_name: player.family_name.clone(),
        time_left,
        current_level: player.current_level,
        completion_time: player.completion_time(),
    }
}

// =========================================================================
// Tests
// =========================================================================
