//! Ranked results store for qrquest.
//!
//! The leaderboard runs as one Tokio task (actor model) that owns the
//! ranked result set and the results file behind it.
//!
//! # Key types
//!
//! - [`LeaderboardHandle`]: submit completions and query standings
//! - [`Standings`]: a player's own entry plus the top of the board
//! - [`LeaderboardConfig`]: results file path and leaderboard size
//! - [`ranking`]: the sort-and-rank routine

mod board;
mod config;
mod error;
pub mod ranking;

pub use board::{LeaderboardHandle, Standings};
pub use config::LeaderboardConfig;
pub use error::LeaderboardError;
