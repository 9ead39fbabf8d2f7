//! Configuration management for roundplan
//!
//! This module handles loading and validating configuration from environment variables
//! and TOML files. Every section falls back to its defaults when omitted from a file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::planner::{
    GeneratorConfig, SelectionMode, Strategy, DEFAULT_BACKTRACK_DEADLINE_MS,
    DEFAULT_PLAYERS_PER_ROUND, DEFAULT_RESHUFFLE_ATTEMPTS,
};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Selection algorithm configuration
    pub algorithm: AlgorithmConfig,

    /// HTTP server configuration
    pub server: ServerConfig,

    /// CSV export configuration
    pub export: ExportConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Selection algorithm configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgorithmConfig {
    /// Group selector used for every round
    pub selection: SelectionMode,

    /// Seed for the randomized generator (entropy when absent)
    pub seed: Option<u64>,

    /// Shuffles tried per round by shuffle-greedy
    pub reshuffle_attempts: u32,

    /// Backtracking budget per round in milliseconds
    pub backtrack_deadline_ms: u64,

    /// Group size for requests that omit it
    pub players_per_round: usize,
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        Self {
            selection: SelectionMode::Exhaustive,
            seed: None,
            reshuffle_attempts: DEFAULT_RESHUFFLE_ATTEMPTS,
            backtrack_deadline_ms: DEFAULT_BACKTRACK_DEADLINE_MS,
            players_per_round: DEFAULT_PLAYERS_PER_ROUND,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,

    /// Bind port
    pub port: u16,

    /// Enable permissive CORS
    pub enable_cors: bool,

    /// Enable request tracing
    pub enable_request_logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 8080,
            enable_cors: true,
            enable_request_logging: true,
        }
    }
}

/// CSV export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory receiving downloaded plans
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("build/tmp"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let selection = match std::env::var("ROUNDPLAN_SELECTION") {
            Ok(value) => SelectionMode::from_id(&value)
                .with_context(|| format!("Invalid ROUNDPLAN_SELECTION: {value}"))?,
            Err(_) => defaults.algorithm.selection,
        };

        let seed = std::env::var("ROUNDPLAN_SEED")
            .ok()
            .and_then(|v| v.parse::<u64>().ok());

        let reshuffle_attempts = std::env::var("ROUNDPLAN_RESHUFFLE_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults.algorithm.reshuffle_attempts);

        let backtrack_deadline_ms = std::env::var("ROUNDPLAN_BACKTRACK_DEADLINE_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.algorithm.backtrack_deadline_ms);

        let players_per_round = std::env::var("ROUNDPLAN_PLAYERS_PER_ROUND")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(defaults.algorithm.players_per_round);

        let host = std::env::var("ROUNDPLAN_HOST").unwrap_or(defaults.server.host);

        let port = std::env::var("ROUNDPLAN_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(defaults.server.port);

        let output_dir = std::env::var("ROUNDPLAN_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.export.output_dir);

        let log_level = std::env::var("ROUNDPLAN_LOG_LEVEL").unwrap_or(defaults.logging.level);

        let log_format = std::env::var("ROUNDPLAN_LOG_FORMAT").unwrap_or(defaults.logging.format);

        Ok(Self {
            algorithm: AlgorithmConfig {
                selection,
                seed,
                reshuffle_attempts,
                backtrack_deadline_ms,
                players_per_round,
            },
            server: ServerConfig {
                host,
                port,
                ..defaults.server
            },
            export: ExportConfig { output_dir },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.algorithm.reshuffle_attempts == 0 {
            anyhow::bail!("reshuffle_attempts must be greater than 0");
        }

        if self.algorithm.backtrack_deadline_ms == 0 {
            anyhow::bail!("backtrack_deadline_ms must be greater than 0");
        }

        if self.algorithm.players_per_round == 0 {
            anyhow::bail!("players_per_round must be greater than 0");
        }

        if self.server.port == 0 {
            anyhow::bail!("server port must not be 0");
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!(
                "Unknown log format '{}'. Valid options: text, json",
                self.logging.format
            );
        }

        Ok(())
    }

    /// Generator settings derived from the algorithm section
    ///
    /// The strategy follows the selection mode; exhaustive selection keeps
    /// shuffle-greedy for pair rounds.
    #[must_use]
    pub fn generator_config(&self) -> GeneratorConfig {
        let strategy = self
            .algorithm
            .selection
            .strategy()
            .unwrap_or(Strategy::ShuffleGreedy);

        let config = GeneratorConfig::new(strategy)
            .with_reshuffle_attempts(self.algorithm.reshuffle_attempts)
            .with_backtrack_deadline_ms(self.algorithm.backtrack_deadline_ms);

        match self.algorithm.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }

    /// Get backtracking deadline as Duration
    #[must_use]
    pub fn backtrack_deadline(&self) -> Duration {
        Duration::from_millis(self.algorithm.backtrack_deadline_ms)
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| {
                format!(
                    "Invalid bind address: {}:{}",
                    self.server.host, self.server.port
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.algorithm.selection, SelectionMode::Exhaustive);
        assert_eq!(config.algorithm.players_per_round, 4);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.algorithm.reshuffle_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.algorithm.backtrack_deadline_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.format = String::from("yaml");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_generator_config_follows_selection() {
        let mut config = Config::default();
        config.algorithm.selection = SelectionMode::BacktrackRandom;
        config.algorithm.seed = Some(9);
        config.algorithm.backtrack_deadline_ms = 50;

        let generator = config.generator_config();
        assert_eq!(generator.strategy, Strategy::BacktrackRandom);
        assert_eq!(generator.seed, Some(9));
        assert_eq!(generator.backtrack_deadline_ms, 50);

        let exhaustive = Config::default().generator_config();
        assert_eq!(exhaustive.strategy, Strategy::ShuffleGreedy);
        assert_eq!(exhaustive.seed, None);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [algorithm]
            selection = "greedy_shuffle"
            seed = 42
            "#,
        )
        .unwrap();

        assert_eq!(config.algorithm.selection, SelectionMode::GreedyShuffle);
        assert_eq!(config.algorithm.seed, Some(42));
        assert_eq!(config.algorithm.reshuffle_attempts, 200);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.export.output_dir, PathBuf::from("build/tmp"));
    }

    #[test]
    fn test_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr().unwrap().port(), 8080);
        assert_eq!(config.backtrack_deadline(), Duration::from_millis(200));
    }
}
