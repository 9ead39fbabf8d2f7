//! Frequency ledger
//!
//! Tracks how often each exact group has been selected during one
//! generation session. The ledger is the ledger of record for group
//! selection; it is reset before every new schedule.

use serde::Serialize;
use std::collections::HashMap;

use super::error::{PlannerError, PlannerResult};
use super::group::Group;

/// A recorded group together with its occurrence count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupFrequency {
    pub group: Group,
    pub frequency: u32,
}

/// Summary over the ledger contents
///
/// Frequency fields are `None` for an empty ledger and are then omitted
/// from serialized output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerStatistics {
    pub unique_groups: usize,
    pub total_records: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_frequency: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_frequency: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_frequency: Option<f64>,
}

/// Group → occurrence count, remembering first-insertion order
#[derive(Debug, Clone)]
pub struct FrequencyLedger {
    arity: usize,
    index: HashMap<Group, usize>,
    entries: Vec<GroupFrequency>,
}

impl FrequencyLedger {
    /// Create an empty ledger accepting groups of `arity` members
    pub fn new(arity: usize) -> Self {
        Self {
            arity,
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Configured group size
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Record one occurrence of `group`
    pub fn record(&mut self, group: &Group) -> PlannerResult<u32> {
        if group.len() != self.arity {
            return Err(PlannerError::InvalidArity {
                expected: self.arity,
                actual: group.len(),
            });
        }

        let count = match self.index.get(group) {
            Some(&slot) => {
                self.entries[slot].frequency += 1;
                self.entries[slot].frequency
            }
            None => {
                self.index.insert(group.clone(), self.entries.len());
                self.entries.push(GroupFrequency {
                    group: group.clone(),
                    frequency: 1,
                });
                1
            }
        };

        tracing::trace!(group = %group, frequency = count, "Recorded group");
        Ok(count)
    }

    /// Occurrences of `group`, 0 if never recorded
    ///
    /// Groups of any size are accepted; sub-pairs of a 4-player ledger
    /// simply report 0 unless the ledger arity is 2.
    pub fn frequency_of(&self, group: &Group) -> u32 {
        self.index
            .get(group)
            .map(|&slot| self.entries[slot].frequency)
            .unwrap_or(0)
    }

    /// Every recorded group ascending by count, ties in insertion order
    pub fn all_sorted_by_frequency(&self) -> Vec<GroupFrequency> {
        let mut sorted = self.entries.clone();
        // sort_by_key is stable
        sorted.sort_by_key(|entry| entry.frequency);
        sorted
    }

    /// Summary statistics over current contents
    pub fn statistics(&self) -> LedgerStatistics {
        let total_records: u64 = self.entries.iter().map(|e| u64::from(e.frequency)).sum();

        if self.entries.is_empty() {
            return LedgerStatistics::default();
        }

        LedgerStatistics {
            unique_groups: self.entries.len(),
            total_records,
            max_frequency: self.entries.iter().map(|e| e.frequency).max(),
            min_frequency: self.entries.iter().map(|e| e.frequency).min(),
            avg_frequency: Some(total_records as f64 / self.entries.len() as f64),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry
    pub fn reset(&mut self) {
        self.index.clear();
        self.entries.clear();
        tracing::debug!("Frequency ledger reset");
    }

    /// Reset and accept a different group size from now on
    pub fn reconfigure(&mut self, arity: usize) {
        self.reset();
        self.arity = arity;
    }
}

impl Default for FrequencyLedger {
    fn default() -> Self {
        Self::new(4)
    }
}
