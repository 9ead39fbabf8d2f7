//! Wire types for the planner API
//!
//! Field names are camelCase on the wire. Conversions from engine types
//! live here so handlers stay thin.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::planner::{
    Group, LedgerStatistics, PairingView, Plan, Player, PlannerError, PlannerResult, PlayerUsage,
    Round, ScheduleConfig,
};

/// Schedule generation request
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConfigDto {
    pub player_names: Vec<String>,
    pub number_of_rounds: usize,
    /// Falls back to the configured default when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub players_per_round: Option<usize>,
}

impl ScheduleConfigDto {
    pub fn into_config(self, default_players_per_round: usize) -> ScheduleConfig {
        ScheduleConfig::new(self.player_names, self.number_of_rounds)
            .with_players_per_round(self.players_per_round.unwrap_or(default_players_per_round))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDto {
    pub id: String,
    pub name: String,
}

impl From<&Player> for PlayerDto {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundDto {
    pub round_no: u32,
    pub round_date: NaiveDate,
    pub selected_players: Vec<PlayerDto>,
}

impl From<&Round> for RoundDto {
    fn from(round: &Round) -> Self {
        Self {
            round_no: round.round_no,
            round_date: round.date,
            selected_players: round.selected_players.iter().map(PlayerDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDto {
    pub id: String,
    pub players: Vec<PlayerDto>,
    pub rounds: Vec<RoundDto>,
    pub number_of_rounds: usize,
    pub created_at: DateTime<Utc>,
}

impl From<&Plan> for PlanDto {
    fn from(plan: &Plan) -> Self {
        Self {
            id: plan.id.clone(),
            players: plan.players.iter().map(PlayerDto::from).collect(),
            rounds: plan.rounds.iter().map(RoundDto::from).collect(),
            number_of_rounds: plan.number_of_rounds,
            created_at: plan.created_at,
        }
    }
}

/// Ledger summary with absent values reported as zero
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStatsDto {
    pub total_unique_pairings: usize,
    pub total_pairing_records: u64,
    pub max_frequency: u32,
    pub min_frequency: u32,
    pub avg_frequency: f64,
    pub fallback_count: u64,
}

impl ScheduleStatsDto {
    pub fn new(stats: &LedgerStatistics, fallback_count: u64) -> Self {
        Self {
            total_unique_pairings: stats.unique_groups,
            total_pairing_records: stats.total_records,
            max_frequency: stats.max_frequency.unwrap_or(0),
            min_frequency: stats.min_frequency.unwrap_or(0),
            avg_frequency: stats.avg_frequency.unwrap_or(0.0),
            fallback_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingDto {
    pub players: Vec<String>,
    pub frequency: u32,
}

impl From<PairingView> for PairingDto {
    fn from(view: PairingView) -> Self {
        Self {
            players: view.players,
            frequency: view.frequency,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerUsageDto {
    pub name: String,
    pub count: u32,
}

impl From<PlayerUsage> for PlayerUsageDto {
    fn from(usage: PlayerUsage) -> Self {
        Self {
            name: usage.name,
            count: usage.count,
        }
    }
}

/// Pair rounds request
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairRoundsRequest {
    pub player_names: Vec<String>,
    pub number_of_rounds: usize,
}

/// One round of name pairs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairRoundDto {
    pub round_no: u32,
    pub pairs: Vec<Vec<String>>,
}

impl PairRoundDto {
    pub fn from_rounds(rounds: Vec<Vec<Group>>) -> PlannerResult<Vec<Self>> {
        rounds
            .into_iter()
            .enumerate()
            .map(|(i, pairs)| {
                let round_no = u32::try_from(i + 1).map_err(|_| {
                    PlannerError::invalid_configuration(format!(
                        "Round number {} exceeds {}",
                        i + 1,
                        u32::MAX
                    ))
                })?;
                Ok(Self {
                    round_no,
                    pairs: pairs.iter().map(|p| p.members().to_vec()).collect(),
                })
            })
            .collect()
    }
}
