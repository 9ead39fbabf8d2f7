//! Error types for the planner module

use thiserror::Error;

/// Result type for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;

/// Planner-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlannerError {
    /// The schedule request itself is unusable
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// A group of the wrong size was handed to the ledger
    #[error("Invalid group arity: expected {expected} players, got {actual}")]
    InvalidArity { expected: usize, actual: usize },

    /// Requested group size is zero or larger than the pool
    #[error("Invalid group size {size} for a pool of {available} players")]
    InvalidGroupSize { size: usize, available: usize },

    /// Exhaustive selection asked for more players than available
    #[error("Insufficient players: need {required}, have {available}")]
    InsufficientPlayers { required: usize, available: usize },

    /// Perfect pairing needs an even pool
    #[error("Player count must be even for pairing, got {count}")]
    OddPlayerCount { count: usize },

    /// A caller-supplied frequency lookup failed
    #[error("Frequency lookup failed: {reason}")]
    FrequencyLookup { reason: String },
}

impl PlannerError {
    /// Create an invalid configuration error
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Create a frequency lookup error
    pub fn lookup(reason: impl Into<String>) -> Self {
        Self::FrequencyLookup {
            reason: reason.into(),
        }
    }

    /// Whether the error stems from caller input rather than a contract violation
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfiguration { .. } | Self::OddPlayerCount { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_message() {
        let err = PlannerError::invalid_configuration("Duplicate player names are not allowed");
        assert!(err.to_string().contains("Invalid configuration"));
        assert!(err.to_string().contains("Duplicate"));
    }

    #[test]
    fn test_invalid_arity_message() {
        let err = PlannerError::InvalidArity {
            expected: 4,
            actual: 3,
        };
        assert!(err.to_string().contains("expected 4"));
        assert!(err.to_string().contains("got 3"));
    }

    #[test]
    fn test_is_validation() {
        assert!(PlannerError::invalid_configuration("x").is_validation());
        assert!(PlannerError::OddPlayerCount { count: 5 }.is_validation());
        assert!(!PlannerError::InsufficientPlayers {
            required: 4,
            available: 3
        }
        .is_validation());
    }
}
