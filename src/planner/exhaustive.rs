//! Exhaustive group selector
//!
//! Scores every k-subset of the available players and picks the best one.
//! The ranking is a strict lexicographic key, lower is better:
//!
//! 1. sum of usage counters (spread play opportunities)
//! 2. max usage counter (no single player dominates)
//! 3. ledger frequency of the exact group
//! 4. summed ledger frequency of every sub-pair
//!
//! Cost is O(C(n, k)); meant for small pools (n up to ~15 for k = 4).

use std::collections::HashMap;

use super::error::{PlannerError, PlannerResult};
use super::group::{Group, Player};
use super::ledger::FrequencyLedger;

/// Ranking key of one candidate combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CombinationScore {
    pub usage_sum: u64,
    pub usage_max: u32,
    pub group_frequency: u32,
    pub pair_frequency: u64,
}

/// Full-search selector with per-player fairness counters
#[derive(Debug, Clone, Default)]
pub struct ExhaustiveSelector {
    usage: HashMap<String, u32>,
}

impl ExhaustiveSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the best `k` players and record them
    ///
    /// Records the winning group in `ledger` and bumps each member's usage
    /// counter. Ties keep the earliest combination in enumeration order.
    pub fn select_group(
        &mut self,
        available: &[Player],
        k: usize,
        ledger: &mut FrequencyLedger,
    ) -> PlannerResult<Vec<Player>> {
        if k == 0 {
            return Err(PlannerError::InvalidGroupSize {
                size: k,
                available: available.len(),
            });
        }
        if available.len() < k {
            return Err(PlannerError::InsufficientPlayers {
                required: k,
                available: available.len(),
            });
        }

        for player in available {
            self.usage.entry(player.id.clone()).or_insert(0);
        }

        let mut best: Option<(CombinationScore, Vec<usize>)> = None;
        let mut evaluated = 0usize;

        for_each_combination(available.len(), k, |indices| {
            evaluated += 1;
            let members: Vec<&Player> = indices.iter().map(|&i| &available[i]).collect();
            let score = self.score(&members, ledger);

            let better = match &best {
                Some((best_score, _)) => score < *best_score,
                None => true,
            };
            if better {
                best = Some((score, indices.to_vec()));
            }
        });

        let (score, indices) = best.ok_or(PlannerError::InsufficientPlayers {
            required: k,
            available: available.len(),
        })?;

        let selected: Vec<Player> = indices.iter().map(|&i| available[i].clone()).collect();
        ledger.record(&Group::from_players(&selected))?;
        for player in &selected {
            *self.usage.entry(player.id.clone()).or_insert(0) += 1;
        }

        tracing::debug!(
            combinations = evaluated,
            usage_sum = score.usage_sum,
            group_frequency = score.group_frequency,
            pair_frequency = score.pair_frequency,
            selected = %selected.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", "),
            "Selected group exhaustively"
        );

        Ok(selected)
    }

    /// Score a candidate combination against current state
    pub fn score(&self, members: &[&Player], ledger: &FrequencyLedger) -> CombinationScore {
        let usages: Vec<u32> = members
            .iter()
            .map(|p| self.usage.get(&p.id).copied().unwrap_or(0))
            .collect();

        let group = Group::from_players(members.iter().copied());
        let pair_frequency = group
            .sub_pairs()
            .iter()
            .map(|pair| u64::from(ledger.frequency_of(pair)))
            .sum();

        CombinationScore {
            usage_sum: usages.iter().map(|&u| u64::from(u)).sum(),
            usage_max: usages.iter().copied().max().unwrap_or(0),
            group_frequency: ledger.frequency_of(&group),
            pair_frequency,
        }
    }

    /// Rounds played by a player so far this session
    pub fn usage_of(&self, player_id: &str) -> u32 {
        self.usage.get(player_id).copied().unwrap_or(0)
    }

    /// All fairness counters
    pub fn usage_counts(&self) -> &HashMap<String, u32> {
        &self.usage
    }

    pub fn reset(&mut self) {
        self.usage.clear();
    }
}

/// Visit every k-combination of `0..n` in lexicographic order
fn for_each_combination<F>(n: usize, k: usize, mut visit: F)
where
    F: FnMut(&[usize]),
{
    if k > n {
        return;
    }

    let mut indices: Vec<usize> = (0..k).collect();
    loop {
        visit(&indices);

        // rightmost position that can still advance
        let Some(pos) = (0..k).rev().find(|&i| indices[i] != i + n - k) else {
            return;
        };
        indices[pos] += 1;
        for i in (pos + 1)..k {
            indices[i] = indices[i - 1] + 1;
        }
    }
}
