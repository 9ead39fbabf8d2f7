//! Schedule orchestration
//!
//! Drives round-by-round generation: validates the request, resets the
//! session state, materializes players and asks the active selector for
//! one group per round. Every chosen group is recorded in the planner's
//! ledger, so later rounds see what earlier rounds produced.

use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::clock::Clock;
use super::error::{PlannerError, PlannerResult};
use super::exhaustive::ExhaustiveSelector;
use super::group::{first_duplicate, Group, Player};
use super::ledger::{FrequencyLedger, LedgerStatistics};
use super::plan::{PairingView, Plan, PlayerUsage, Round, ScheduleConfig, ROUND_INTERVAL_DAYS};
use super::randomized::{GeneratorConfig, RandomizedGenerator, Strategy};

// ============================================================================
// Selection Mode
// ============================================================================

/// Which selector picks the group for each round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Score every combination (small pools)
    #[default]
    Exhaustive,
    /// Randomized shuffle-greedy
    GreedyShuffle,
    /// Randomized backtracking with deadline
    BacktrackRandom,
}

impl SelectionMode {
    pub fn all() -> Vec<Self> {
        vec![Self::Exhaustive, Self::GreedyShuffle, Self::BacktrackRandom]
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Exhaustive => "exhaustive",
            Self::GreedyShuffle => "greedy_shuffle",
            Self::BacktrackRandom => "backtrack_random",
        }
    }

    /// Generator strategy backing a randomized mode
    pub fn strategy(&self) -> Option<Strategy> {
        match self {
            Self::Exhaustive => None,
            Self::GreedyShuffle => Some(Strategy::ShuffleGreedy),
            Self::BacktrackRandom => Some(Strategy::BacktrackRandom),
        }
    }

    pub fn from_id(id: &str) -> PlannerResult<Self> {
        match id.to_lowercase().replace('-', "_").as_str() {
            "exhaustive" => Ok(Self::Exhaustive),
            "greedy_shuffle" | "shuffle_greedy" | "greedy" => Ok(Self::GreedyShuffle),
            "backtrack_random" | "backtrack" => Ok(Self::BacktrackRandom),
            other => Err(PlannerError::invalid_configuration(format!(
                "Unknown selection mode '{other}'. Valid options: exhaustive, greedy_shuffle, backtrack_random"
            ))),
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for SelectionMode {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s)
    }
}

// ============================================================================
// Schedule Planner
// ============================================================================

/// Owns the per-session state and produces plans
///
/// Not synchronized; callers sharing one planner wrap it in a mutex.
#[derive(Debug)]
pub struct SchedulePlanner {
    mode: SelectionMode,
    ledger: FrequencyLedger,
    selector: ExhaustiveSelector,
    generator: RandomizedGenerator,
    last_plan: Option<Plan>,
}

impl SchedulePlanner {
    /// Create a planner; a randomized mode overrides the generator strategy
    pub fn new(mode: SelectionMode, generator: GeneratorConfig) -> Self {
        let generator = RandomizedGenerator::new(Self::align_generator(mode, generator));
        Self::from_parts(mode, generator)
    }

    /// Create a planner whose backtracking deadline reads `clock`
    pub fn with_clock(mode: SelectionMode, generator: GeneratorConfig, clock: Arc<dyn Clock>) -> Self {
        let generator = RandomizedGenerator::with_clock(Self::align_generator(mode, generator), clock);
        Self::from_parts(mode, generator)
    }

    fn align_generator(mode: SelectionMode, mut config: GeneratorConfig) -> GeneratorConfig {
        if let Some(strategy) = mode.strategy() {
            config.strategy = strategy;
        }
        config
    }

    fn from_parts(mode: SelectionMode, generator: RandomizedGenerator) -> Self {
        Self {
            mode,
            ledger: FrequencyLedger::default(),
            selector: ExhaustiveSelector::new(),
            generator,
            last_plan: None,
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn ledger(&self) -> &FrequencyLedger {
        &self.ledger
    }

    /// Generate a plan whose first round is today
    pub fn generate(&mut self, config: &ScheduleConfig) -> PlannerResult<Plan> {
        self.generate_starting(config, Local::now().date_naive())
    }

    /// Generate a plan whose first round falls on `base_date`
    ///
    /// Rounds follow weekly. On error the previous plan stays available.
    pub fn generate_starting(
        &mut self,
        config: &ScheduleConfig,
        base_date: NaiveDate,
    ) -> PlannerResult<Plan> {
        tracing::info!(
            players = config.player_names.len(),
            rounds = config.number_of_rounds,
            players_per_round = config.players_per_round,
            mode = %self.mode,
            "Generating schedule"
        );

        Self::validate(config)?;
        Self::round_date(base_date, config.number_of_rounds - 1)?;

        let k = config.players_per_round;
        self.ledger.reconfigure(k);
        self.selector.reset();

        let players: Vec<Player> = config
            .player_names
            .iter()
            .map(Player::with_generated_id)
            .collect();

        let mut plan = Plan::create(players.clone(), config.number_of_rounds);

        for index in 0..config.number_of_rounds {
            let date = Self::round_date(base_date, index)?;
            let selected_players = self.select_round(&players, k)?;

            tracing::debug!(
                round = index + 1,
                date = %date,
                players = %selected_players.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", "),
                "Generated round"
            );

            plan.rounds.push(Round {
                round_no: Self::round_no(index)?,
                date,
                selected_players,
            });
        }

        tracing::info!(
            plan_id = %plan.id,
            rounds = plan.rounds.len(),
            unique_groups = self.ledger.len(),
            fallbacks = self.generator.fallback_count(),
            "Schedule generation completed"
        );

        self.last_plan = Some(plan.clone());
        Ok(plan)
    }

    /// Reject requests the selectors cannot satisfy
    pub fn validate(config: &ScheduleConfig) -> PlannerResult<()> {
        Self::validate_names(&config.player_names, config.players_per_round)?;
        Self::validate_round_count(config.number_of_rounds)
    }

    fn validate_round_count(rounds: usize) -> PlannerResult<()> {
        if rounds == 0 {
            return Err(PlannerError::invalid_configuration(
                "Number of rounds must be greater than 0",
            ));
        }
        if u32::try_from(rounds).is_err() {
            return Err(PlannerError::invalid_configuration(format!(
                "Number of rounds must not exceed {}",
                u32::MAX
            )));
        }
        Ok(())
    }

    fn validate_names(names: &[String], per_round: usize) -> PlannerResult<()> {
        if names.is_empty() {
            return Err(PlannerError::invalid_configuration(
                "Player names list cannot be empty",
            ));
        }
        if per_round == 0 {
            return Err(PlannerError::invalid_configuration(
                "Players per round must be greater than 0",
            ));
        }
        if names.len() < per_round {
            return Err(PlannerError::invalid_configuration(format!(
                "At least {per_round} players are required, got {}",
                names.len()
            )));
        }

        if let Some(duplicate) = first_duplicate(names) {
            return Err(PlannerError::invalid_configuration(format!(
                "Duplicate player names are not allowed: '{duplicate}'"
            )));
        }

        Ok(())
    }

    fn round_date(base_date: NaiveDate, index: usize) -> PlannerResult<NaiveDate> {
        u64::try_from(index)
            .ok()
            .and_then(|i| i.checked_mul(ROUND_INTERVAL_DAYS))
            .and_then(|days| base_date.checked_add_days(Days::new(days)))
            .ok_or_else(|| {
                PlannerError::invalid_configuration(format!(
                    "Round {} falls outside the supported date range",
                    index + 1
                ))
            })
    }

    fn round_no(index: usize) -> PlannerResult<u32> {
        index
            .checked_add(1)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| {
                PlannerError::invalid_configuration(format!(
                    "Round number {index} exceeds {}",
                    u32::MAX
                ))
            })
    }

    fn select_round(&mut self, players: &[Player], k: usize) -> PlannerResult<Vec<Player>> {
        if self.mode == SelectionMode::Exhaustive {
            return self.selector.select_group(players, k, &mut self.ledger);
        }

        let ids: Vec<String> = players.iter().map(|p| p.id.clone()).collect();
        let ledger = &self.ledger;
        let chosen = self
            .generator
            .select_group(&ids, k, |group| Ok(ledger.frequency_of(group)))?;

        let group = Group::new(chosen);
        self.ledger.record(&group)?;

        Ok(players
            .iter()
            .filter(|p| group.contains(&p.id))
            .cloned()
            .collect())
    }

    /// Rounds of name pairs covering every player each round
    ///
    /// Uses the generator's own pair history; the ledger and the last plan
    /// are left untouched.
    pub fn generate_pair_rounds(
        &mut self,
        names: &[String],
        rounds: usize,
    ) -> PlannerResult<Vec<Vec<Group>>> {
        Self::validate_names(names, 2)?;
        Self::validate_round_count(rounds)?;

        tracing::info!(
            players = names.len(),
            rounds,
            strategy = %self.generator.strategy(),
            "Generating pair rounds"
        );
        self.generator.generate_schedule(names, rounds)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Ledger summary for the current session
    pub fn statistics(&self) -> LedgerStatistics {
        self.ledger.statistics()
    }

    /// Times the generator fell back from backtracking to shuffling
    pub fn fallback_count(&self) -> u64 {
        self.generator.fallback_count()
    }

    /// Recorded groups by ascending frequency, rendered with names
    pub fn all_pairings_sorted_by_frequency(&self) -> Vec<PairingView> {
        self.ledger
            .all_sorted_by_frequency()
            .into_iter()
            .map(|entry| PairingView {
                players: entry
                    .group
                    .members()
                    .iter()
                    .map(|id| self.display_name(id))
                    .collect(),
                frequency: entry.frequency,
            })
            .collect()
    }

    /// Rounds played per player in the last plan, input order
    pub fn per_player_usage_counts(&self) -> Vec<PlayerUsage> {
        self.last_plan
            .as_ref()
            .map(Plan::usage_counts)
            .unwrap_or_default()
    }

    pub fn last_plan(&self) -> Option<&Plan> {
        self.last_plan.as_ref()
    }

    fn display_name(&self, id: &str) -> String {
        match &self.last_plan {
            Some(plan) => plan.name_of(id).to_string(),
            None => id.to_string(),
        }
    }
}

impl Default for SchedulePlanner {
    fn default() -> Self {
        Self::new(SelectionMode::default(), GeneratorConfig::default())
    }
}
