//! `QuestServer` builder and server loop.
//!
//! This is the entry point for running a qrquest server. It ties together
//! all the layers: HTTP routing → session manager → hint book and
//! leaderboard actors.

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use qrquest_leaderboard::{LeaderboardConfig, LeaderboardHandle};
use qrquest_session::{
    Clock, HintBook, MemorySessionStore, SessionConfig, SessionManager, SystemClock,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};
use crate::{QuestError, ServerConfig};

/// Builds the API router over the given state.
///
/// Exposed so tests can drive the router directly without a socket.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/register", post(handler::register))
        .route("/api/player-state", get(handler::player_state))
        .route("/api/scan", post(handler::scan))
        .route(
            "/api/hints",
            get(handler::get_hints).post(handler::replace_hints),
        )
        .route("/api/results", post(handler::submit_result))
        .route("/api/results/:player_id", get(handler::get_results))
        .route("/api/admin/active-users", get(handler::active_users))
        .route("/api/health", get(handler::health))
        // The frontend is served from another origin and sends the
        // playerId cookie, so credentials must be allowed.
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Builder for configuring and starting a qrquest server.
///
/// # Example
///
/// ```rust,ignore
/// use qrquest::prelude::*;
///
/// let server = QuestServer::builder()
///     .bind("0.0.0.0:8000")
///     .hints_path("hints.json")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct QuestServerBuilder {
    bind_addr: String,
    session_config: SessionConfig,
    hints_path: PathBuf,
    leaderboard_config: LeaderboardConfig,
    clock: Arc<dyn Clock>,
}

impl QuestServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        let defaults = ServerConfig::default();
        Self {
            bind_addr: defaults.bind_addr,
            session_config: SessionConfig::from_minutes(defaults.game_duration_minutes),
            hints_path: defaults.hints_path,
            leaderboard_config: LeaderboardConfig::with_path(defaults.results_path),
            clock: Arc::new(SystemClock),
        }
    }

    /// Applies every setting from a [`ServerConfig`].
    pub fn config(self, config: ServerConfig) -> Self {
        self.bind(&config.bind_addr)
            .session_config(SessionConfig::from_minutes(config.game_duration_minutes))
            .hints_path(config.hints_path)
            .results_path(config.results_path)
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Sets the hints file.
    pub fn hints_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.hints_path = path.into();
        self
    }

    /// Sets the results file, keeping the rest of the leaderboard config.
    pub fn results_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.leaderboard_config.results_path = path.into();
        self
    }

    /// Replaces the time source. Tests use this to fast-forward sessions.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Binds the listener and spawns the hint book and leaderboard actors.
    pub async fn build(self) -> Result<QuestServer, QuestError> {
        let listener = TcpListener::bind(&self.bind_addr).await?;

        let sessions = SessionManager::with_store(
            MemorySessionStore::new(),
            self.session_config,
            self.clock,
        );
        let state = AppState {
            sessions: Arc::new(sessions),
            hints: HintBook::spawn(self.hints_path),
            leaderboard: LeaderboardHandle::spawn(self.leaderboard_config),
        };

        Ok(QuestServer {
            listener,
            router: router(state),
        })
    }
}

impl Default for QuestServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound qrquest server.
///
/// Call [`run()`](Self::run) to start serving requests.
pub struct QuestServer {
    listener: TcpListener,
    router: Router,
}

impl QuestServer {
    /// Creates a new builder.
    pub fn builder() -> QuestServerBuilder {
        QuestServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves requests until the process is terminated.
    pub async fn run(self) -> Result<(), QuestError> {
        self.run_until(std::future::pending()).await
    }

    /// Serves requests until `shutdown` resolves, then lets in-flight
    /// requests finish.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), QuestError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.listener.local_addr()?;
        tracing::info!(%addr, "qrquest server running");

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("qrquest server stopped");
        Ok(())
    }
}
