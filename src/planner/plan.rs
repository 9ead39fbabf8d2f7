//! Schedule request and result types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::group::Player;

/// Default number of players per round
pub const DEFAULT_PLAYERS_PER_ROUND: usize = 4;

/// Days between consecutive rounds
pub const ROUND_INTERVAL_DAYS: u64 = 7;

/// A schedule generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub player_names: Vec<String>,
    pub number_of_rounds: usize,
    pub players_per_round: usize,
}

impl ScheduleConfig {
    /// Request with the default group size of four
    pub fn new(player_names: Vec<String>, number_of_rounds: usize) -> Self {
        Self {
            player_names,
            number_of_rounds,
            players_per_round: DEFAULT_PLAYERS_PER_ROUND,
        }
    }

    pub fn with_players_per_round(mut self, players_per_round: usize) -> Self {
        self.players_per_round = players_per_round;
        self
    }
}

/// One session with its selected players
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub round_no: u32,
    pub date: NaiveDate,
    pub selected_players: Vec<Player>,
}

impl Round {
    pub fn player_names(&self) -> Vec<&str> {
        self.selected_players.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn includes(&self, player_id: &str) -> bool {
        self.selected_players.iter().any(|p| p.id == player_id)
    }
}

/// A generated schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub players: Vec<Player>,
    pub rounds: Vec<Round>,
    pub number_of_rounds: usize,
    pub created_at: DateTime<Utc>,
}

impl Plan {
    /// Empty plan with a fresh id, stamped now
    pub fn create(players: Vec<Player>, number_of_rounds: usize) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            players,
            rounds: Vec::new(),
            number_of_rounds,
            created_at: Utc::now(),
        }
    }

    /// Players per round, taken from the first round
    pub fn arity(&self) -> usize {
        self.rounds
            .first()
            .map(|r| r.selected_players.len())
            .unwrap_or(0)
    }

    /// Rounds each player appears in, in player order
    pub fn usage_counts(&self) -> Vec<PlayerUsage> {
        self.players
            .iter()
            .map(|player| PlayerUsage {
                name: player.name.clone(),
                count: self.rounds.iter().filter(|r| r.includes(&player.id)).count() as u32,
            })
            .collect()
    }

    /// Display name for an id, falling back to the id itself
    pub fn name_of<'a>(&'a self, player_id: &'a str) -> &'a str {
        self.players
            .iter()
            .find(|p| p.id == player_id)
            .map(|p| p.name.as_str())
            .unwrap_or(player_id)
    }
}

/// Cumulative exposure of one player across a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerUsage {
    pub name: String,
    pub count: u32,
}

/// A recorded group rendered with player names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingView {
    pub players: Vec<String>,
    pub frequency: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> Plan {
        let players = vec![
            Player::new("1", "Alice"),
            Player::new("2", "Bob"),
            Player::new("3", "Carol"),
        ];
        let mut plan = Plan::create(players.clone(), 2);
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        plan.rounds.push(Round {
            round_no: 1,
            date,
            selected_players: vec![players[0].clone(), players[1].clone()],
        });
        plan.rounds.push(Round {
            round_no: 2,
            date: date + chrono::Days::new(ROUND_INTERVAL_DAYS),
            selected_players: vec![players[0].clone(), players[2].clone()],
        });
        plan
    }

    #[test]
    fn test_schedule_config_defaults_to_four() {
        let config = ScheduleConfig::new(vec!["a".into()], 3);
        assert_eq!(config.players_per_round, 4);
        assert_eq!(config.with_players_per_round(2).players_per_round, 2);
    }

    #[test]
    fn test_plan_ids_unique() {
        let a = Plan::create(Vec::new(), 1);
        let b = Plan::create(Vec::new(), 1);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_usage_counts_in_player_order() {
        let plan = sample_plan();
        let usage = plan.usage_counts();
        let pairs: Vec<(&str, u32)> = usage.iter().map(|u| (u.name.as_str(), u.count)).collect();
        assert_eq!(pairs, vec![("Alice", 2), ("Bob", 1), ("Carol", 1)]);
    }

    #[test]
    fn test_name_of_falls_back_to_id() {
        let plan = sample_plan();
        assert_eq!(plan.name_of("2"), "Bob");
        assert_eq!(plan.name_of("unknown"), "unknown");
    }

    #[test]
    fn test_arity_from_rounds() {
        assert_eq!(sample_plan().arity(), 2);
        assert_eq!(Plan::create(Vec::new(), 0).arity(), 0);
    }
}
