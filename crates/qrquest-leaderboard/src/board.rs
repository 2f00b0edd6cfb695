//! Leaderboard actor: an isolated Tokio task that owns the ranked results.
//!
//! The actor holds the ranked set in memory and writes it through to the
//! results file on every submission. Until the file has been read
//! successfully the set counts as unloaded: every command retries the read
//! first and fails with a storage error if it still can't, so an
//! unreadable file is never overwritten with a partial set. Because one task owns both, the whole
//! "append, sort, re-rank, save" cycle runs without anything else touching
//! the set in between. Two submissions that arrive together are applied
//! one after the other and both survive.

use chrono::{Local, SubsecRound};
use qrquest_protocol::{Completion, GameResult, JsonDocument, PlayerId};
use tokio::sync::{mpsc, oneshot};

use crate::{LeaderboardConfig, LeaderboardError, ranking};

/// Default command channel size for the leaderboard actor.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// A player's own result plus the top of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standings {
    pub current_player: GameResult,
    pub leaderboard: Vec<GameResult>,
}

/// Commands sent to the leaderboard actor through its channel.
enum LeaderboardCommand {
    Submit {
        completion: Completion,
        reply: oneshot::Sender<Result<GameResult, LeaderboardError>>,
    },
    Query {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<Standings, LeaderboardError>>,
    },
    Snapshot {
        reply: oneshot::Sender<Result<Vec<GameResult>, LeaderboardError>>,
    },
}

/// Handle to a running leaderboard actor. Used to send commands to it.
///
/// Cheap to clone: it's just an `mpsc::Sender` wrapper. The actor stops
/// once every handle has been dropped.
#[derive(Clone)]
pub struct LeaderboardHandle {
    sender: mpsc::Sender<LeaderboardCommand>,
}

impl LeaderboardHandle {
    /// Spawns the actor. It loads the results file before serving its
    /// first command, and again on later commands if that load failed.
    pub fn spawn(config: LeaderboardConfig) -> Self {
        let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_SIZE);

        let actor = LeaderboardActor {
            document: JsonDocument::new(&config.results_path),
            top_n: config.top_n,
            results: None,
            receiver: rx,
        };
        tokio::spawn(actor.run());

        Self { sender: tx }
    }

    /// Records a completion, re-ranks, and persists the whole set.
    ///
    /// Returns the stored entry with its rank at insertion time. There is
    /// no dedup: submitting the same player twice creates two entries.
    ///
    /// # Errors
    /// - [`LeaderboardError::Storage`] if the file can't be read or
    ///   written; the in-memory set and the file are left unchanged
    /// - [`LeaderboardError::Unavailable`] if the actor is gone
    pub async fn submit(&self, completion: Completion) -> Result<GameResult, LeaderboardError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(LeaderboardCommand::Submit {
                completion,
                reply: reply_tx,
            })
            .await
            .map_err(|_| LeaderboardError::Unavailable)?;
        reply_rx.await.map_err(|_| LeaderboardError::Unavailable)?
    }

    /// Returns the player's entry and the top of the leaderboard.
    ///
    /// # Errors
    /// - [`LeaderboardError::NotFound`] if the player has no entry
    /// - [`LeaderboardError::Storage`] if the results file can't be read
    /// - [`LeaderboardError::Unavailable`] if the actor is gone
    pub async fn query(&self, player_id: &PlayerId) -> Result<Standings, LeaderboardError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(LeaderboardCommand::Query {
                player_id: player_id.clone(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| LeaderboardError::Unavailable)?;
        reply_rx.await.map_err(|_| LeaderboardError::Unavailable)?
    }

    /// Returns the full ranked set.
    ///
    /// # Errors
    /// - [`LeaderboardError::Storage`] if the results file can't be read
    /// - [`LeaderboardError::Unavailable`] if the actor is gone
    pub async fn snapshot(&self) -> Result<Vec<GameResult>, LeaderboardError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(LeaderboardCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| LeaderboardError::Unavailable)?;
        reply_rx.await.map_err(|_| LeaderboardError::Unavailable)?
    }
}

/// The internal actor state. Runs inside a Tokio task.
struct LeaderboardActor {
    document: JsonDocument<Vec<GameResult>>,
    top_n: usize,
    /// `None` until the results file has been read successfully.
    results: Option<Vec<GameResult>>,
    receiver: mpsc::Receiver<LeaderboardCommand>,
}

impl LeaderboardActor {
    /// Loads the results, then processes commands until every handle is
    /// dropped.
    async fn run(mut self) {
        if let Ok(count) = self.ensure_loaded().await.map(|results| results.len()) {
            tracing::info!(
                path = %self.document.path().display(),
                results = count,
                "leaderboard started"
            );
        }

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                LeaderboardCommand::Submit { completion, reply } => {
                    let result = self.handle_submit(completion).await;
                    let _ = reply.send(result);
                }
                LeaderboardCommand::Query { player_id, reply } => {
                    let result = self.handle_query(&player_id).await;
                    let _ = reply.send(result);
                }
                LeaderboardCommand::Snapshot { reply } => {
                    let result = self.ensure_loaded().await.cloned();
                    let _ = reply.send(result);
                }
            }
        }

        tracing::info!("leaderboard stopped");
    }

    async fn handle_submit(
        &mut self,
        completion: Completion,
    ) -> Result<GameResult, LeaderboardError> {
        let player_id = completion.player_id.clone();
        let completion_time = completion.completion_time;
        // Microsecond precision, the same as the timestamps already on disk.
        let timestamp = Local::now().naive_local().trunc_subsecs(6);
        let entry = GameResult::from_completion(completion, timestamp);

        // Rank into a copy so a failed save leaves memory and disk in step.
        let mut next = self.ensure_loaded().await?.clone();
        ranking::insert_ranked(&mut next, entry);

        if let Err(e) = self.document.save(&next).await {
            tracing::error!(%player_id, error = %e, "failed to persist results");
            return Err(e.into());
        }
        let total = next.len();
        let results = self.results.insert(next);

        // Ties keep insertion order, so the new entry is the last one with
        // this player and time.
        let stored = results
            .iter()
            .rev()
            .find(|r| r.player_id == player_id && r.completion_time == completion_time)
            .cloned()
            .ok_or(LeaderboardError::NotFound(player_id.clone()))?;

        tracing::info!(
            %player_id,
            completion_time = stored.completion_time,
            rank = stored.rank,
            total,
            "result submitted"
        );
        Ok(stored)
    }

    async fn handle_query(
        &mut self,
        player_id: &PlayerId,
    ) -> Result<Standings, LeaderboardError> {
        let top_n = self.top_n;
        let results: &Vec<GameResult> = self.ensure_loaded().await?;
        let current_player = ranking::find(results, player_id)
            .cloned()
            .ok_or_else(|| LeaderboardError::NotFound(player_id.clone()))?;
        Ok(Standings {
            current_player,
            leaderboard: ranking::top(results, top_n).to_vec(),
        })
    }

    /// Returns the ranked set, reading the results file if it hasn't been
    /// read successfully yet.
    async fn ensure_loaded(&mut self) -> Result<&mut Vec<GameResult>, LeaderboardError> {
        let results = match self.results.take() {
            Some(results) => results,
            None => load_results(&self.document).await?,
        };
        Ok(self.results.insert(results))
    }
}

/// Reads and re-ranks the results file.
///
/// A missing file means nothing has been submitted yet. A file that isn't
/// valid JSON is logged and treated as empty; the next submission
/// overwrites it. Any other read failure is returned, so the caller keeps
/// the set unloaded and the file untouched.
async fn load_results(
    document: &JsonDocument<Vec<GameResult>>,
) -> Result<Vec<GameResult>, LeaderboardError> {
    match document.load().await {
        Ok(Some(mut results)) => {
            ranking::rerank(&mut results);
            Ok(results)
        }
        Ok(None) => Ok(Vec::new()),
        Err(e) if e.is_decode() => {
            tracing::warn!(
                path = %document.path().display(),
                error = %e,
                "results file is malformed, starting with no results"
            );
            Ok(Vec::new())
        }
        Err(e) => {
            tracing::error!(
                path = %document.path().display(),
                error = %e,
                "results file unreadable"
            );
            Err(e.into())
        }
    }
}
