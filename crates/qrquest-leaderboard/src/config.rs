//! Leaderboard configuration.

use std::path::PathBuf;

/// Configuration for the leaderboard store.
#[derive(Debug, Clone)]
pub struct LeaderboardConfig {
    /// Where the ranked results are persisted.
    ///
    /// Default: `game_results.json` in the working directory.
    pub results_path: PathBuf,

    /// How many entries a query returns as the leaderboard.
    ///
    /// Default: 10.
    pub top_n: usize,
}

impl LeaderboardConfig {
    /// Default config with a different results file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            results_path: path.into(),
            ..Self::default()
        }
    }
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            results_path: PathBuf::from("game_results.json"),
            top_n: 10,
        }
    }
}
