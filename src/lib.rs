//! roundplan - Group round planner
//!
//! Assigns players to fixed-size groups across many rounds while keeping
//! repeated groupings rare and participation balanced.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`planner`] - Pairing selection engine (ledger, selectors, orchestrator)
//! - [`config`] - Configuration management and settings
//! - [`error`] - Unified error type
//! - [`export`] - CSV rendering and export
//! - [`server`] - HTTP API over a shared planner
//!
//! # Example
//!
//! ```no_run
//! use roundplan::config::Config;
//! use roundplan::planner::{ScheduleConfig, SchedulePlanner};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let mut planner =
//!         SchedulePlanner::new(config.algorithm.selection, config.generator_config());
//!     let names = vec!["Ann".into(), "Ben".into(), "Cid".into(), "Dee".into()];
//!     let plan = planner.generate(&ScheduleConfig::new(names, 4))?;
//!     println!("{} rounds", plan.rounds.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod planner;
pub mod server;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::export::{render_csv, CsvExporter};
    pub use crate::planner::{
        FrequencyLedger, Group, Plan, PlannerError, PlannerResult, Player, Round, ScheduleConfig,
        SchedulePlanner, SelectionMode, Strategy,
    };
    pub use crate::server::PlannerServer;
}
