//! HTTP server for the planner
//!
//! Exposes generation and the read-only queries over JSON, plus a CSV
//! download of the last plan.
//!
//! # Routes
//!
//! ```text
//! GET  /planer/health        liveness and uptime
//! POST /planer/generate      generate a plan
//! POST /planer/pairs         rounds of pairs for an even pool
//! GET  /planer/statistics    ledger summary
//! GET  /planer/pairings      recorded groups by frequency
//! GET  /planer/player-usage  rounds per player in the last plan
//! GET  /planer/download      last plan as CSV
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use roundplan::config::Config;
//! use roundplan::server::PlannerServer;
//!
//! let server = PlannerServer::new(Config::default())?;
//! server.start().await?;
//! ```

pub mod api;
pub mod dto;
#[allow(clippy::module_inception)]
pub mod server;

pub use api::create_router;
pub use server::{AppState, PlannerServer, ServerError, ServerInfo};
