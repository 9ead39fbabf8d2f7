//! Randomized round generator
//!
//! Builds either a perfect pairing of the whole pool (one per round) or a
//! single group of `k` players, using one of two strategies:
//!
//! - [`Strategy::ShuffleGreedy`]: sample random permutations, slice them
//!   into pairs/groups, keep the attempt with the fewest historical repeats.
//! - [`Strategy::BacktrackRandom`]: randomized, frequency-biased incremental
//!   assignment with chronological backtracking under a hard deadline.
//!   Running out of time is not an error; the generator silently falls back
//!   to shuffle-greedy and counts the fallback.
//!
//! Randomness comes from a ChaCha8 stream, seeded when the configuration
//! carries a seed so that draw sequences are reproducible.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use super::clock::{Clock, SystemClock};
use super::error::{PlannerError, PlannerResult};
use super::group::{first_duplicate, Group};

/// Partial group frequencies above this are skipped during backtracking.
/// Far above anything a real schedule reaches.
pub const PRUNE_FREQUENCY_THRESHOLD: u32 = 1000;

/// Default number of shuffles per round
pub const DEFAULT_RESHUFFLE_ATTEMPTS: u32 = 200;

/// Default backtracking budget per round in milliseconds
pub const DEFAULT_BACKTRACK_DEADLINE_MS: u64 = 200;

/// Pair → times played together within one `generate_schedule` call
pub type PairHistory = HashMap<Group, u32>;

// ============================================================================
// Strategy
// ============================================================================

/// Search strategy for the randomized generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Repeated random shuffles, best attempt wins
    #[default]
    ShuffleGreedy,
    /// Randomized backtracking with deadline and shuffle fallback
    BacktrackRandom,
}

impl Strategy {
    pub fn id(&self) -> &'static str {
        match self {
            Self::ShuffleGreedy => "shuffle_greedy",
            Self::BacktrackRandom => "backtrack_random",
        }
    }

    fn implementation(&self) -> &'static dyn GroupingStrategy {
        match self {
            Self::ShuffleGreedy => &ShuffleGreedy,
            Self::BacktrackRandom => &BacktrackRandom,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Strategy {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "shuffle_greedy" | "greedy_shuffle" | "greedy" | "shuffle" => Ok(Self::ShuffleGreedy),
            "backtrack_random" | "backtrack" => Ok(Self::BacktrackRandom),
            other => Err(PlannerError::invalid_configuration(format!(
                "Unknown strategy '{other}'. Valid options: shuffle_greedy, backtrack_random"
            ))),
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Settings for [`RandomizedGenerator`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub strategy: Strategy,

    /// Fixed seed for reproducible draws; `None` seeds from entropy
    pub seed: Option<u64>,

    /// Shuffles tried per round (clamped to at least 1)
    pub reshuffle_attempts: u32,

    /// Backtracking budget per invocation (clamped to at least 1 ms)
    pub backtrack_deadline_ms: u64,
}

impl GeneratorConfig {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_reshuffle_attempts(mut self, attempts: u32) -> Self {
        self.reshuffle_attempts = attempts;
        self
    }

    pub fn with_backtrack_deadline_ms(mut self, millis: u64) -> Self {
        self.backtrack_deadline_ms = millis;
        self
    }

    fn attempts(&self) -> u32 {
        self.reshuffle_attempts.max(1)
    }

    fn deadline(&self) -> Duration {
        Duration::from_millis(self.backtrack_deadline_ms.max(1))
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::ShuffleGreedy,
            seed: None,
            reshuffle_attempts: DEFAULT_RESHUFFLE_ATTEMPTS,
            backtrack_deadline_ms: DEFAULT_BACKTRACK_DEADLINE_MS,
        }
    }
}

// ============================================================================
// Search context and strategy interface
// ============================================================================

/// Per-invocation search state shared with the strategies
struct SearchContext<'a> {
    rng: &'a mut ChaCha8Rng,
    clock: &'a dyn Clock,
    attempts: u32,
    deadline: Duration,
}

impl<'a> SearchContext<'a> {
    fn start(rng: &'a mut ChaCha8Rng, clock: &'a dyn Clock, attempts: u32, budget: Duration) -> Self {
        let deadline = clock.now() + budget;
        Self {
            rng,
            clock,
            attempts,
            deadline,
        }
    }

    fn expired(&self) -> bool {
        self.clock.now() > self.deadline
    }
}

type FrequencyLookup<'f> = &'f dyn Fn(&Group) -> PlannerResult<u32>;

/// Capability shared by both strategies
///
/// `None` means the strategy gave up (deadline); the generator then falls
/// back to shuffle-greedy.
trait GroupingStrategy: Sync {
    fn arrange_pairs(
        &self,
        ctx: &mut SearchContext<'_>,
        players: &[String],
        history: &PairHistory,
    ) -> Option<Vec<Group>>;

    fn pick_group(
        &self,
        ctx: &mut SearchContext<'_>,
        players: &[String],
        k: usize,
        lookup: FrequencyLookup<'_>,
    ) -> PlannerResult<Option<Vec<String>>>;
}

fn pair_count(history: &PairHistory, pair: &Group) -> u32 {
    history.get(pair).copied().unwrap_or(0)
}

fn slice_into_pairs(order: &[String]) -> Vec<Group> {
    order
        .chunks(2)
        .map(|chunk| Group::new(chunk.iter().cloned()))
        .collect()
}

// ============================================================================
// Shuffle-greedy
// ============================================================================

struct ShuffleGreedy;

impl ShuffleGreedy {
    fn shuffle_pairs(
        &self,
        ctx: &mut SearchContext<'_>,
        players: &[String],
        history: &PairHistory,
    ) -> Vec<Group> {
        let mut working = players.to_vec();
        let mut best: Option<(u64, Vec<Group>)> = None;

        for _ in 0..ctx.attempts {
            working.shuffle(&mut *ctx.rng);
            let pairs = slice_into_pairs(&working);
            let repeats: u64 = pairs
                .iter()
                .map(|p| u64::from(pair_count(history, p)))
                .sum();

            if best.as_ref().map_or(true, |(score, _)| repeats < *score) {
                best = Some((repeats, pairs));
                if repeats == 0 {
                    break;
                }
            }
        }

        match best {
            Some((_, pairs)) => pairs,
            None => {
                working.shuffle(&mut *ctx.rng);
                slice_into_pairs(&working)
            }
        }
    }

    fn shuffle_group(
        &self,
        ctx: &mut SearchContext<'_>,
        players: &[String],
        k: usize,
        lookup: FrequencyLookup<'_>,
    ) -> PlannerResult<Vec<String>> {
        let mut working = players.to_vec();
        let mut best: Option<(u32, Vec<String>)> = None;

        for _ in 0..ctx.attempts {
            working.shuffle(&mut *ctx.rng);
            let candidate = &working[..k];
            let repeats = lookup(&Group::new(candidate.iter().cloned()))?;

            if best.as_ref().map_or(true, |(score, _)| repeats < *score) {
                best = Some((repeats, candidate.to_vec()));
                if repeats == 0 {
                    break;
                }
            }
        }

        Ok(match best {
            Some((_, group)) => group,
            None => {
                working.shuffle(&mut *ctx.rng);
                working[..k].to_vec()
            }
        })
    }
}

impl GroupingStrategy for ShuffleGreedy {
    fn arrange_pairs(
        &self,
        ctx: &mut SearchContext<'_>,
        players: &[String],
        history: &PairHistory,
    ) -> Option<Vec<Group>> {
        Some(self.shuffle_pairs(ctx, players, history))
    }

    fn pick_group(
        &self,
        ctx: &mut SearchContext<'_>,
        players: &[String],
        k: usize,
        lookup: FrequencyLookup<'_>,
    ) -> PlannerResult<Option<Vec<String>>> {
        self.shuffle_group(ctx, players, k, lookup).map(Some)
    }
}

// ============================================================================
// Backtrack-random
// ============================================================================

struct BacktrackRandom;

impl BacktrackRandom {
    fn extend_pairs(
        &self,
        ctx: &mut SearchContext<'_>,
        pool: &[String],
        used: &mut [bool],
        current: &mut Vec<Group>,
        history: &PairHistory,
    ) -> bool {
        if ctx.expired() {
            return false;
        }
        let Some(first) = used.iter().position(|taken| !taken) else {
            return true;
        };

        used[first] = true;
        let anchor = &pool[first];

        let mut candidates: Vec<usize> = ((first + 1)..pool.len()).filter(|&j| !used[j]).collect();
        candidates.shuffle(&mut *ctx.rng);
        // stable: equal frequencies keep their random order
        candidates.sort_by_key(|&j| pair_count(history, &Group::pair(anchor.as_str(), pool[j].as_str())));

        for j in candidates {
            used[j] = true;
            current.push(Group::pair(anchor.as_str(), pool[j].as_str()));

            if self.extend_pairs(ctx, pool, used, current, history) {
                return true;
            }

            current.pop();
            used[j] = false;
            if ctx.expired() {
                break;
            }
        }

        used[first] = false;
        false
    }

    fn extend_group(
        &self,
        ctx: &mut SearchContext<'_>,
        pool: &[String],
        k: usize,
        current: &mut Vec<usize>,
        lookup: FrequencyLookup<'_>,
    ) -> bool {
        if ctx.expired() {
            return false;
        }
        if current.len() == k {
            return true;
        }

        let mut candidates: Vec<(usize, u32)> = (0..pool.len())
            .filter(|i| !current.contains(i))
            .map(|i| {
                let members = current.iter().chain(std::iter::once(&i)).map(|&m| pool[m].as_str());
                let frequency = lookup(&Group::new(members)).unwrap_or_else(|err| {
                    tracing::trace!(error = %err, "Frequency lookup failed, assuming 0");
                    0
                });
                (i, frequency)
            })
            .collect();
        candidates.shuffle(&mut *ctx.rng);
        candidates.sort_by_key(|&(_, frequency)| frequency);

        for (i, frequency) in candidates {
            if frequency > PRUNE_FREQUENCY_THRESHOLD {
                continue;
            }

            current.push(i);
            if self.extend_group(ctx, pool, k, current, lookup) {
                return true;
            }
            current.pop();

            if ctx.expired() {
                return false;
            }
        }

        false
    }
}

impl GroupingStrategy for BacktrackRandom {
    fn arrange_pairs(
        &self,
        ctx: &mut SearchContext<'_>,
        players: &[String],
        history: &PairHistory,
    ) -> Option<Vec<Group>> {
        let mut pool = players.to_vec();
        pool.shuffle(&mut *ctx.rng);

        let mut used = vec![false; pool.len()];
        let mut current = Vec::with_capacity(pool.len() / 2);

        self.extend_pairs(ctx, &pool, &mut used, &mut current, history)
            .then_some(current)
    }

    fn pick_group(
        &self,
        ctx: &mut SearchContext<'_>,
        players: &[String],
        k: usize,
        lookup: FrequencyLookup<'_>,
    ) -> PlannerResult<Option<Vec<String>>> {
        let mut pool = players.to_vec();
        pool.shuffle(&mut *ctx.rng);

        let mut current = Vec::with_capacity(k);
        let found = self.extend_group(ctx, &pool, k, &mut current, lookup);

        Ok(found.then(|| current.iter().map(|&i| pool[i].clone()).collect()))
    }
}

// ============================================================================
// Generator
// ============================================================================

/// Strategy-pluggable randomized generator
#[derive(Debug)]
pub struct RandomizedGenerator {
    config: GeneratorConfig,
    rng: ChaCha8Rng,
    clock: Arc<dyn Clock>,
    fallbacks: u64,
}

impl RandomizedGenerator {
    /// Create a generator reading the system clock
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Create a generator with an injected clock
    pub fn with_clock(config: GeneratorConfig, clock: Arc<dyn Clock>) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Self {
            config,
            rng,
            clock,
            fallbacks: 0,
        }
    }

    /// Shuffle-greedy with defaults and no seed
    pub fn default_greedy() -> Self {
        Self::new(GeneratorConfig::default())
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn strategy(&self) -> Strategy {
        self.config.strategy
    }

    /// How many times backtracking gave up and shuffle-greedy took over
    pub fn fallback_count(&self) -> u64 {
        self.fallbacks
    }

    /// One perfect pairing of `players` per round
    ///
    /// Pair history is local to this call: every pair of a finished round
    /// counts once against the following rounds. The frequency ledger is
    /// neither read nor written.
    pub fn generate_schedule(
        &mut self,
        players: &[String],
        rounds: usize,
    ) -> PlannerResult<Vec<Vec<Group>>> {
        if players.len() % 2 != 0 {
            return Err(PlannerError::OddPlayerCount {
                count: players.len(),
            });
        }
        if let Some(duplicate) = first_duplicate(players) {
            return Err(PlannerError::invalid_configuration(format!(
                "Duplicate player names are not allowed: '{duplicate}'"
            )));
        }

        let mut history = PairHistory::new();
        let mut schedule = Vec::new();

        for round in 0..rounds {
            let pairs = self.arrange_round(players, &history);
            for pair in &pairs {
                *history.entry(pair.clone()).or_insert(0) += 1;
            }

            tracing::debug!(
                round = round + 1,
                pairs = pairs.len(),
                strategy = %self.config.strategy,
                "Generated pairing round"
            );
            schedule.push(pairs);
        }

        Ok(schedule)
    }

    /// Pick `k` players, preferring groups with low historical frequency
    ///
    /// `lookup` reports how often a candidate group has occurred. Its
    /// failures propagate from shuffle-greedy but are read as 0 while
    /// backtracking.
    pub fn select_group<F>(&mut self, players: &[String], k: usize, lookup: F) -> PlannerResult<Vec<String>>
    where
        F: Fn(&Group) -> PlannerResult<u32>,
    {
        if k == 0 || k > players.len() {
            return Err(PlannerError::InvalidGroupSize {
                size: k,
                available: players.len(),
            });
        }

        let strategy = self.config.strategy;
        let mut ctx = SearchContext::start(
            &mut self.rng,
            self.clock.as_ref(),
            self.config.attempts(),
            self.config.deadline(),
        );

        if let Some(group) = strategy.implementation().pick_group(&mut ctx, players, k, &lookup)? {
            return Ok(group);
        }

        let group = ShuffleGreedy.shuffle_group(&mut ctx, players, k, &lookup)?;
        self.fallbacks += 1;
        tracing::debug!(
            k,
            fallbacks = self.fallbacks,
            "Backtracking gave up, used shuffle-greedy group"
        );
        Ok(group)
    }

    fn arrange_round(&mut self, players: &[String], history: &PairHistory) -> Vec<Group> {
        let strategy = self.config.strategy;
        let mut ctx = SearchContext::start(
            &mut self.rng,
            self.clock.as_ref(),
            self.config.attempts(),
            self.config.deadline(),
        );

        if let Some(pairs) = strategy.implementation().arrange_pairs(&mut ctx, players, history) {
            return pairs;
        }

        let pairs = ShuffleGreedy.shuffle_pairs(&mut ctx, players, history);
        self.fallbacks += 1;
        tracing::debug!(
            fallbacks = self.fallbacks,
            "Backtracking gave up, used shuffle-greedy pairing"
        );
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::clock::ManualClock;
    use std::collections::HashSet;

    fn names(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("P{i}")).collect()
    }

    fn assert_perfect_pairing(round: &[Group], players: &[String]) {
        assert_eq!(round.len(), players.len() / 2);
        let covered: HashSet<&String> = round.iter().flat_map(|p| p.members()).collect();
        assert_eq!(covered.len(), players.len());
        assert!(round.iter().all(|p| p.len() == 2));
    }

    fn frozen(config: GeneratorConfig) -> RandomizedGenerator {
        RandomizedGenerator::with_clock(config, Arc::new(ManualClock::new()))
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("greedy_shuffle".parse::<Strategy>().unwrap(), Strategy::ShuffleGreedy);
        assert_eq!("BACKTRACK-RANDOM".parse::<Strategy>().unwrap(), Strategy::BacktrackRandom);
        assert!("simulated_annealing".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_generate_correct_rounds_and_pairs() {
        let players = names(10);
        let mut gen = RandomizedGenerator::new(GeneratorConfig::default().with_seed(7));

        let schedule = gen.generate_schedule(&players, 5).unwrap();
        assert_eq!(schedule.len(), 5);
        for round in &schedule {
            assert_perfect_pairing(round, &players);
        }
    }

    #[test]
    fn test_odd_player_count_rejected() {
        let mut gen = RandomizedGenerator::default_greedy();
        let err = gen.generate_schedule(&names(5), 3).unwrap_err();
        assert_eq!(err, PlannerError::OddPlayerCount { count: 5 });
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let players: Vec<String> = ["Ann", "Ben", "Ann", "Dee"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        for strategy in [Strategy::ShuffleGreedy, Strategy::BacktrackRandom] {
            let mut gen = RandomizedGenerator::new(GeneratorConfig::new(strategy).with_seed(3));
            let err = gen.generate_schedule(&players, 2).unwrap_err();
            assert!(matches!(err, PlannerError::InvalidConfiguration { .. }));
            assert!(err.to_string().contains("'Ann'"));
        }
    }

    #[test]
    fn test_greedy_avoids_repeats_on_fresh_history() {
        let players = names(10);
        let mut gen = RandomizedGenerator::new(GeneratorConfig::default().with_seed(42));

        let schedule = gen.generate_schedule(&players, 5).unwrap();
        let all_pairs: Vec<&Group> = schedule.iter().flatten().collect();
        let unique: HashSet<&Group> = all_pairs.iter().copied().collect();
        assert_eq!(all_pairs.len(), unique.len(), "no pair should repeat in 5 rounds");
    }

    #[test]
    fn test_no_single_pair_dominates() {
        let players = names(10);
        let config = GeneratorConfig::default().with_reshuffle_attempts(500);
        let mut gen = RandomizedGenerator::new(config);

        let schedule = gen.generate_schedule(&players, 30).unwrap();
        let mut counts: HashMap<&Group, u32> = HashMap::new();
        for pair in schedule.iter().flatten() {
            *counts.entry(pair).or_insert(0) += 1;
        }
        let max = counts.values().copied().max().unwrap_or(0);
        assert!(max < 10, "max pair count was {max}");
    }

    #[test]
    fn test_same_seed_reproduces_schedule() {
        let players = names(8);
        let config = GeneratorConfig::default().with_seed(1234);

        let a = RandomizedGenerator::new(config.clone())
            .generate_schedule(&players, 6)
            .unwrap();
        let b = RandomizedGenerator::new(config)
            .generate_schedule(&players, 6)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_backtrack_generates_valid_rounds() {
        let players = names(12);
        let config = GeneratorConfig::new(Strategy::BacktrackRandom).with_seed(3);
        let mut gen = frozen(config);

        let schedule = gen.generate_schedule(&players, 8).unwrap();
        for round in &schedule {
            assert_perfect_pairing(round, &players);
        }
        assert_eq!(gen.fallback_count(), 0);
    }

    #[test]
    fn test_backtrack_prefers_fresh_partners() {
        let players = names(6);
        let config = GeneratorConfig::new(Strategy::BacktrackRandom).with_seed(11);
        let mut gen = frozen(config);

        let schedule = gen.generate_schedule(&players, 2).unwrap();
        let first: HashSet<&Group> = schedule[0].iter().collect();
        // the first anchor always has an unplayed partner available
        assert!(schedule[1].iter().any(|p| !first.contains(p)));
    }

    #[test]
    fn test_backtrack_timeout_falls_back_to_greedy() {
        let players = names(10);
        let config = GeneratorConfig::new(Strategy::BacktrackRandom)
            .with_seed(5)
            .with_backtrack_deadline_ms(200);
        // every clock read moves a full second: the deadline is blown on entry
        let clock = ManualClock::ticking(Duration::from_secs(1));
        let mut gen = RandomizedGenerator::with_clock(config, Arc::new(clock));

        let schedule = gen.generate_schedule(&players, 3).unwrap();
        assert_eq!(schedule.len(), 3);
        for round in &schedule {
            assert_perfect_pairing(round, &players);
        }
        assert_eq!(gen.fallback_count(), 3);
    }

    #[test]
    fn test_backtrack_respects_deadline() {
        let players = names(20);
        let config = GeneratorConfig::new(Strategy::BacktrackRandom)
            .with_seed(9)
            .with_backtrack_deadline_ms(200);
        let clock = ManualClock::ticking(Duration::from_millis(1));
        let handle = clock.clone();
        let mut gen = RandomizedGenerator::with_clock(config, Arc::new(clock));

        // every complete group is over the prune threshold, so the search can
        // only end by exhausting itself or hitting the deadline
        let lookup = |g: &Group| -> PlannerResult<u32> { Ok(if g.len() == 4 { 5000 } else { 0 }) };
        let start = handle.peek();
        let group = gen.select_group(&players, 4, lookup).unwrap();
        let spent = handle.peek() - start;

        assert_eq!(group.len(), 4);
        assert_eq!(gen.fallback_count(), 1);
        // deadline plus the reads of one candidate scan and the greedy fallback
        assert!(spent <= Duration::from_millis(200 + 25 + 250), "spent {spent:?}");
    }

    #[test]
    fn test_select_group_size() {
        let players = names(10);
        let mut gen = RandomizedGenerator::new(GeneratorConfig::default().with_seed(1));

        let group = gen.select_group(&players, 4, |_| Ok(0)).unwrap();
        assert_eq!(group.len(), 4);
        let unique: HashSet<&String> = group.iter().collect();
        assert_eq!(unique.len(), 4);
        assert!(group.iter().all(|p| players.contains(p)));
    }

    #[test]
    fn test_select_group_invalid_size() {
        let players = names(3);
        let mut gen = RandomizedGenerator::default_greedy();

        assert!(matches!(
            gen.select_group(&players, 0, |_| Ok(0)),
            Err(PlannerError::InvalidGroupSize { size: 0, .. })
        ));
        assert!(matches!(
            gen.select_group(&players, 4, |_| Ok(0)),
            Err(PlannerError::InvalidGroupSize { size: 4, available: 3 })
        ));
    }

    #[test]
    fn test_greedy_group_avoids_known_group() {
        let players = names(6);
        let known = Group::new(["P1", "P2", "P3", "P4"]);
        let mut gen = RandomizedGenerator::new(GeneratorConfig::default().with_seed(21));

        for _ in 0..10 {
            let group = gen
                .select_group(&players, 4, |g| Ok(if *g == known { 3 } else { 0 }))
                .unwrap();
            assert_ne!(Group::new(group), known);
        }
    }

    #[test]
    fn test_greedy_group_propagates_lookup_error() {
        let players = names(6);
        let mut gen = RandomizedGenerator::default_greedy();

        let result = gen.select_group(&players, 4, |_| Err(PlannerError::lookup("unavailable")));
        assert!(matches!(result, Err(PlannerError::FrequencyLookup { .. })));
    }

    #[test]
    fn test_backtrack_group_swallows_lookup_error() {
        let players = names(6);
        let config = GeneratorConfig::new(Strategy::BacktrackRandom).with_seed(2);
        let mut gen = frozen(config);

        let group = gen
            .select_group(&players, 4, |_| Err(PlannerError::lookup("unavailable")))
            .unwrap();
        assert_eq!(group.len(), 4);
        assert_eq!(gen.fallback_count(), 0);
    }

    #[test]
    fn test_backtrack_group_prefers_lowest_frequency() {
        let players = names(5);
        let fresh = Group::new(["P1", "P2", "P3", "P5"]);
        let config = GeneratorConfig::new(Strategy::BacktrackRandom).with_seed(17);
        let mut gen = frozen(config);

        // anything involving P4 looks stale, so every level ranks P4 last
        let group = gen
            .select_group(&players, 4, |g| Ok(if g.contains("P4") { 7 } else { 0 }))
            .unwrap();
        assert_eq!(Group::new(group), fresh);
        assert_eq!(gen.fallback_count(), 0);
    }

    #[test]
    fn test_backtrack_group_prunes_to_fallback() {
        let players = names(6);
        let config = GeneratorConfig::new(Strategy::BacktrackRandom).with_seed(4);
        let mut gen = frozen(config);

        let group = gen
            .select_group(&players, 4, |g| Ok(if g.len() == 4 { 5000 } else { 0 }))
            .unwrap();
        assert_eq!(group.len(), 4);
        assert_eq!(gen.fallback_count(), 1);
    }
}
