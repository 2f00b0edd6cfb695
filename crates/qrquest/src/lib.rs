//! # qrquest
//!
//! HTTP backend for a timed QR-code scavenger hunt.
//!
//! Players register, get a time budget, and advance one checkpoint per
//! correct QR scan. Finishing within the budget records a result on a
//! persistent leaderboard. The crate wires the session manager, the hint
//! book, and the leaderboard into an axum router.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use qrquest::prelude::*;
//!
//! # async fn start() -> Result<(), QuestError> {
//! let server = QuestServer::builder()
//!     .config(ServerConfig::from_env()?)
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
pub mod cookie;
mod error;
mod handler;
mod server;

pub use config::ServerConfig;
pub use error::QuestError;
pub use handler::AppState;
pub use server::{QuestServer, QuestServerBuilder, router};

pub mod prelude {
    pub use crate::{QuestError, QuestServer, QuestServerBuilder, ServerConfig};
    pub use qrquest_leaderboard::{LeaderboardConfig, LeaderboardHandle};
    pub use qrquest_protocol::{Completion, GameResult, Hint, PlayerId, QrCode};
    pub use qrquest_session::{Clock, ManualClock, SessionConfig, SystemClock};
}
