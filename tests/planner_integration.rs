//! Integration tests for the pairing selection engine
//!
//! These tests verify the complete workflow of:
//! - Plan generation across all selection modes
//! - Ledger bookkeeping and statistics
//! - Randomized generation with deadlines and fallback
//! - Order independence of group frequencies

mod common;

use chrono::Days;
use proptest::prelude::*;
use roundplan::planner::{
    FrequencyLedger, GeneratorConfig, Group, ManualClock, PlannerError, RandomizedGenerator,
    ScheduleConfig, SchedulePlanner, SelectionMode, Strategy,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use common::{base_date, player_names};

// ============================================================================
// Orchestrator Integration Tests
// ============================================================================

#[test]
fn test_plan_shape_for_every_mode() {
    for mode in SelectionMode::all() {
        let mut planner = SchedulePlanner::new(mode, GeneratorConfig::default().with_seed(1));
        let plan = planner
            .generate_starting(&ScheduleConfig::new(player_names(10), 5), base_date())
            .unwrap();

        assert_eq!(plan.rounds.len(), 5, "mode {mode}");
        for (i, round) in plan.rounds.iter().enumerate() {
            assert_eq!(round.round_no as usize, i + 1);
            assert_eq!(round.selected_players.len(), 4);
            assert_eq!(round.date, base_date() + Days::new(7 * i as u64));

            let ids: HashSet<_> = round.selected_players.iter().map(|p| &p.id).collect();
            assert_eq!(ids.len(), 4, "no player twice in a round");
            assert!(round
                .selected_players
                .iter()
                .all(|p| plan.players.contains(p)));
        }

        let dates: Vec<_> = plan.rounds.iter().map(|r| r.date).collect();
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(planner.statistics().total_records, 5);
    }
}

#[test]
fn test_players_keep_input_order_and_fresh_ids() {
    let mut planner = SchedulePlanner::default();
    let names = player_names(6);

    let first = planner.generate(&ScheduleConfig::new(names.clone(), 2)).unwrap();
    let second = planner.generate(&ScheduleConfig::new(names.clone(), 2)).unwrap();

    let ordered: Vec<_> = first.players.iter().map(|p| p.name.clone()).collect();
    assert_eq!(ordered, names);

    let first_ids: HashSet<_> = first.players.iter().map(|p| p.id.clone()).collect();
    assert!(second.players.iter().all(|p| !first_ids.contains(&p.id)));
    assert_ne!(first.id, second.id);
}

#[test]
fn test_exactly_four_players() {
    let mut planner = SchedulePlanner::default();
    planner
        .generate_starting(&ScheduleConfig::new(player_names(4), 7), base_date())
        .unwrap();

    let stats = planner.statistics();
    assert_eq!(stats.unique_groups, 1);
    assert_eq!(stats.total_records, 7);
    assert_eq!(stats.max_frequency, Some(7));
    assert_eq!(stats.min_frequency, Some(7));

    let pairings = planner.all_pairings_sorted_by_frequency();
    assert_eq!(pairings.len(), 1);
    assert_eq!(pairings[0].frequency, 7);
    assert_eq!(pairings[0].players.len(), 4);
}

#[test]
fn test_exhaustive_spreads_groups() {
    let mut planner = SchedulePlanner::default();
    planner
        .generate_starting(&ScheduleConfig::new(player_names(8), 10), base_date())
        .unwrap();

    // 70 possible groups, ten rounds, the exact group tie-break keeps them fresh
    assert_eq!(planner.statistics().max_frequency, Some(1));

    let usage = planner.per_player_usage_counts();
    let max = usage.iter().map(|u| u.count).max().unwrap();
    let min = usage.iter().map(|u| u.count).min().unwrap();
    assert!(max - min <= 1);
}

#[test]
fn test_usage_counts_match_plan() {
    let mut planner = SchedulePlanner::new(
        SelectionMode::GreedyShuffle,
        GeneratorConfig::default().with_seed(99),
    );
    let plan = planner
        .generate(&ScheduleConfig::new(player_names(7), 9))
        .unwrap();

    let mut counted: HashMap<String, u32> = HashMap::new();
    for round in &plan.rounds {
        for player in &round.selected_players {
            *counted.entry(player.name.clone()).or_insert(0) += 1;
        }
    }

    let usage = planner.per_player_usage_counts();
    let names: Vec<_> = usage.iter().map(|u| u.name.clone()).collect();
    assert_eq!(names, player_names(7));
    for entry in usage {
        assert_eq!(entry.count, counted.get(&entry.name).copied().unwrap_or(0));
    }
}

#[test]
fn test_validation_errors() {
    let mut planner = SchedulePlanner::default();

    let three = planner.generate(&ScheduleConfig::new(player_names(3), 1));
    assert!(matches!(three, Err(PlannerError::InvalidConfiguration { .. })));

    let names = vec!["Ann".to_string(), "Ben".into(), "Ann".into(), "Dee".into()];
    let duplicates = planner.generate(&ScheduleConfig::new(names, 1));
    assert!(matches!(duplicates, Err(PlannerError::InvalidConfiguration { .. })));

    let no_rounds = planner.generate(&ScheduleConfig::new(player_names(4), 0));
    assert!(matches!(no_rounds, Err(PlannerError::InvalidConfiguration { .. })));

    assert!(planner.last_plan().is_none());
}

// ============================================================================
// Randomized Generator Integration Tests
// ============================================================================

#[test]
fn test_shuffle_greedy_no_repeats_on_fresh_history() {
    let mut generator =
        RandomizedGenerator::new(GeneratorConfig::new(Strategy::ShuffleGreedy).with_seed(5));
    let schedule = generator.generate_schedule(&player_names(10), 5).unwrap();

    let mut seen = HashSet::new();
    for round in &schedule {
        assert_eq!(round.len(), 5);
        for pair in round {
            assert!(seen.insert(pair.clone()), "pair {pair} repeated");
        }
    }
}

#[test]
fn test_backtrack_deadline_falls_back() {
    let clock = ManualClock::ticking(Duration::from_millis(500));
    let mut generator = RandomizedGenerator::with_clock(
        GeneratorConfig::new(Strategy::BacktrackRandom)
            .with_seed(8)
            .with_backtrack_deadline_ms(100),
        Arc::new(clock),
    );

    let schedule = generator.generate_schedule(&player_names(8), 4).unwrap();
    assert_eq!(schedule.len(), 4);
    assert!(schedule.iter().all(|round| round.len() == 4));
    assert_eq!(generator.fallback_count(), 4);
}

#[test]
fn test_odd_pool_rejected() {
    let mut generator = RandomizedGenerator::default_greedy();
    let err = generator.generate_schedule(&player_names(7), 3).unwrap_err();
    assert_eq!(err, PlannerError::OddPlayerCount { count: 7 });
}

#[test]
fn test_seeded_planners_agree() {
    let build = || {
        SchedulePlanner::new(
            SelectionMode::BacktrackRandom,
            GeneratorConfig::default().with_seed(1234),
        )
    };
    let names = player_names(9);
    let request = ScheduleConfig::new(names, 6);

    let a = build().generate_starting(&request, base_date()).unwrap();
    let b = build().generate_starting(&request, base_date()).unwrap();

    let selection = |plan: &roundplan::planner::Plan| -> Vec<Vec<String>> {
        plan.rounds
            .iter()
            .map(|r| r.player_names().iter().map(|s| s.to_string()).collect())
            .collect()
    };
    assert_eq!(selection(&a), selection(&b));
}

// ============================================================================
// Ledger Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_frequency_ignores_member_order(
        ids in prop::collection::hash_set("[a-z]{1,6}", 4),
        times in 1u32..8,
        rotation in 0usize..4,
    ) {
        let ids: Vec<String> = ids.into_iter().collect();
        let mut ledger = FrequencyLedger::new(4);
        for _ in 0..times {
            ledger.record(&Group::new(ids.iter().cloned())).unwrap();
        }

        let mut rotated = ids.clone();
        rotated.rotate_left(rotation);
        rotated.reverse();

        prop_assert_eq!(ledger.frequency_of(&Group::new(rotated)), times);
        prop_assert_eq!(ledger.statistics().total_records, u64::from(times));
    }

    #[test]
    fn prop_reset_clears_everything(
        groups in prop::collection::vec(prop::collection::hash_set("[a-f]", 2), 1..20),
    ) {
        let mut ledger = FrequencyLedger::new(2);
        for group in &groups {
            ledger.record(&Group::new(group.iter().cloned())).unwrap();
        }
        ledger.reset();

        prop_assert!(ledger.is_empty());
        for group in &groups {
            prop_assert_eq!(ledger.frequency_of(&Group::new(group.iter().cloned())), 0);
        }
    }
}
