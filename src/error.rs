//! Unified error handling for the roundplan crate
//!
//! Wraps the planner's domain errors together with the export and
//! configuration failures the server surfaces, while keeping
//! [`PlannerError`] usable on its own inside the engine.
//!
//! # Usage
//!
//! ```rust,ignore
//! use roundplan::error::{Error, ErrorCategory};
//!
//! fn status_for(err: &Error) -> u16 {
//!     match err.category() {
//!         ErrorCategory::Validation => 400,
//!         _ => 500,
//!     }
//! }
//! ```

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub use crate::planner::error::PlannerError;

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Caller input that can never succeed as given
    Validation,
    /// Internal contract violations between engine components
    Contract,
    /// CSV rendering and export file errors
    Storage,
    /// Configuration validation errors
    Config,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Contract => "contract",
            Self::Storage => "storage",
            Self::Config => "config",
            Self::Other => "other",
        }
    }
}

/// Unified error type for the roundplan crate
#[derive(Error, Debug)]
pub enum Error {
    /// Planner errors (validation, arity, lookups)
    #[error("Planner error: {0}")]
    Planner(#[from] PlannerError),

    /// CSV encoding errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Export directory or file could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Get the error category for handling strategies
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Planner(e) if e.is_validation() => ErrorCategory::Validation,
            Self::Planner(PlannerError::FrequencyLookup { .. }) => ErrorCategory::Other,
            Self::Planner(_) => ErrorCategory::Contract,
            Self::Csv(_) | Self::Export { .. } => ErrorCategory::Storage,
            Self::Config(_) => ErrorCategory::Config,
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an export error for `path`
    pub fn export(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Export {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
