//! Common test utilities

use chrono::NaiveDate;
use roundplan::config::Config;
use roundplan::server::{AppState, PlannerServer};
use std::path::Path;

/// Player names `Player1..PlayerN`
pub fn player_names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("Player{i}")).collect()
}

/// Fixed first round date
#[allow(dead_code)]
pub fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Server config exporting into `dir`, request logging off
#[allow(dead_code)]
pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.export.output_dir = dir.to_path_buf();
    config.server.enable_request_logging = false;
    config
}

/// Router plus state over a fresh planner
#[allow(dead_code)]
pub fn test_server(dir: &Path) -> (axum::Router, AppState) {
    let server = PlannerServer::new(test_config(dir)).unwrap();
    (server.build_router(), server.state())
}
