//! Player identities and order-independent groups
//!
//! A [`Group`] is the ledger key: the same players in any order must hash
//! and compare equal, so members are canonicalized (sorted, de-duplicated)
//! on construction rather than relying on set semantics at lookup time.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Player
// ============================================================================

/// A participant with an opaque unique id and a display name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
}

impl Player {
    /// Create a player with an explicit id
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Create a player with a freshly generated id
    pub fn with_generated_id(name: impl Into<String>) -> Self {
        Self::new(Uuid::new_v4().to_string(), name)
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// ============================================================================
// Group
// ============================================================================

/// Unordered set of player ids, stored in canonical (sorted) order
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Group(Vec<String>);

impl Group {
    /// Build a group from ids in any order
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut members: Vec<String> = ids.into_iter().map(Into::into).collect();
        members.sort_unstable();
        members.dedup();
        Self(members)
    }

    /// Build a group from players
    pub fn from_players<'a, I>(players: I) -> Self
    where
        I: IntoIterator<Item = &'a Player>,
    {
        Self::new(players.into_iter().map(|p| p.id.as_str()))
    }

    /// Build a two-member group
    pub fn pair(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::new([a.into(), b.into()])
    }

    /// Number of distinct members
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Members in canonical order
    pub fn members(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.binary_search_by(|m| m.as_str().cmp(id)).is_ok()
    }

    /// All two-member sub-groups, C(n, 2) of them
    pub fn sub_pairs(&self) -> Vec<Group> {
        let mut pairs = Vec::with_capacity(self.0.len() * self.0.len().saturating_sub(1) / 2);
        for i in 0..self.0.len() {
            for j in (i + 1)..self.0.len() {
                // already sorted, no need to go through new()
                pairs.push(Group(vec![self.0[i].clone(), self.0[j].clone()]));
            }
        }
        pairs
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("-"))
    }
}

/// First value that occurs twice in `values`, if any
pub fn first_duplicate(values: &[String]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(values.len());
    values
        .iter()
        .map(String::as_str)
        .find(|value| !seen.insert(*value))
}
