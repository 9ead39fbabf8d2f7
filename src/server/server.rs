//! Planner server implementation
//!
//! Owns the shared application state and wires the router with the
//! configured middleware.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::Error;
use crate::export::CsvExporter;
use crate::planner::SchedulePlanner;

use super::api::create_router;

// ============================================================================
// App State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The single planner; requests take turns on it
    pub planner: Arc<Mutex<SchedulePlanner>>,

    /// Writes downloaded plans to disk
    pub exporter: CsvExporter,

    /// Group size for requests that omit it
    pub default_players_per_round: usize,

    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    /// Build state from configuration
    pub fn from_config(config: &Config) -> Self {
        Self::with_planner(
            config,
            SchedulePlanner::new(config.algorithm.selection, config.generator_config()),
        )
    }

    /// Build state around an existing planner
    pub fn with_planner(config: &Config, planner: SchedulePlanner) -> Self {
        Self {
            planner: Arc::new(Mutex::new(planner)),
            exporter: CsvExporter::new(&config.export.output_dir),
            default_players_per_round: config.algorithm.players_per_round,
            start_time: Instant::now(),
        }
    }
}

// ============================================================================
// Planner Server
// ============================================================================

/// HTTP front end over one [`SchedulePlanner`]
pub struct PlannerServer {
    config: Config,
    bind_address: SocketAddr,
    state: AppState,
}

impl PlannerServer {
    /// Create a new planner server
    pub fn new(config: Config) -> Result<Self, ServerError> {
        config.validate().map_err(|e| Error::config(format!("{e:#}")))?;
        let bind_address = config
            .bind_addr()
            .map_err(|e| Error::config(format!("{e:#}")))?;

        let state = AppState::from_config(&config);

        Ok(Self {
            config,
            bind_address,
            state,
        })
    }

    /// Get the application state
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let mut router = create_router(self.state.clone());

        if self.config.server.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        if self.config.server.enable_request_logging {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Start the server
    pub async fn start(&self) -> Result<(), ServerError> {
        self.start_with_shutdown(std::future::pending()).await
    }

    /// Start with graceful shutdown
    pub async fn start_with_shutdown(
        &self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let router = self.build_router();

        tracing::info!(
            addr = %self.bind_address,
            selection = %self.config.algorithm.selection,
            "Starting planner server"
        );

        let listener = tokio::net::TcpListener::bind(self.bind_address)
            .await
            .map_err(|e| ServerError::Bind(e.to_string()))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        tracing::info!("Planner server shutdown complete");
        Ok(())
    }

    /// Get server info
    pub fn info(&self) -> ServerInfo {
        ServerInfo {
            bind_address: self.bind_address,
            selection: self.config.algorithm.selection.to_string(),
            export_dir: self.config.export.output_dir.display().to_string(),
            cors_enabled: self.config.server.enable_cors,
            request_logging_enabled: self.config.server.enable_request_logging,
        }
    }
}

/// Server information
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub bind_address: SocketAddr,
    pub selection: String,
    pub export_dir: String,
    pub cors_enabled: bool,
    pub request_logging_enabled: bool,
}

impl ServerInfo {
    /// Format as display string
    pub fn display(&self) -> String {
        format!(
            "Planner Server\n\
             {:-<40}\n\
             Bind Address: {}\n\
             Selection: {}\n\
             Export Dir: {}\n\
             CORS: {}\n\
             Request Logging: {}",
            "",
            self.bind_address,
            self.selection,
            self.export_dir,
            if self.cors_enabled { "enabled" } else { "disabled" },
            if self.request_logging_enabled { "enabled" } else { "disabled" }
        )
    }
}

// ============================================================================
// Server Errors
// ============================================================================

/// Server errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] Error),

    #[error("Failed to bind: {0}")]
    Bind(String),

    #[error("Server error: {0}")]
    Serve(String),
}

// ============================================================================
// Tests
// ============================================================================
