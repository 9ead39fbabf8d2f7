//! Pairing selection engine
//!
//! Assigns players to fixed-size groups across many rounds, keeping exact
//! group repeats rare and participation balanced.
//!
//! # Overview
//!
//! A generation session resets the [`FrequencyLedger`], then asks a
//! selector for one group per round. Each chosen group is recorded before
//! the next round is planned, so the ledger always reflects every round
//! generated so far.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────┐
//! │                  SchedulePlanner                   │
//! │   validate → reset → materialize → round loop      │
//! └────────┬───────────────────────────┬───────────────┘
//!          │                           │
//!   ┌──────▼─────────────┐    ┌────────▼─────────────┐
//!   │ ExhaustiveSelector │    │ RandomizedGenerator  │
//!   │ usage + C(n,k)     │    │ shuffle / backtrack  │
//!   └──────┬─────────────┘    └────────┬─────────────┘
//!          │      record / lookup      │
//!          └─────────────┬─────────────┘
//!                 ┌──────▼──────┐
//!                 │  Frequency  │
//!                 │   Ledger    │
//!                 └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`group`] - Players and canonical, order-independent groups
//! - [`ledger`] - Group occurrence counts and statistics
//! - [`exhaustive`] - Full-search selector with usage fairness
//! - [`randomized`] - Shuffle-greedy and deadline-bounded backtracking
//! - [`clock`] - Time source for the backtracking deadline
//! - [`plan`] - Requests, rounds and plans
//! - [`orchestrator`] - Round-by-round generation and queries
//!
//! # Quick Start
//!
//! ```rust
//! use roundplan::planner::{ScheduleConfig, SchedulePlanner};
//!
//! let names: Vec<String> = ["Ann", "Ben", "Cid", "Dee", "Eve"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//!
//! let mut planner = SchedulePlanner::default();
//! let plan = planner.generate(&ScheduleConfig::new(names, 3)).unwrap();
//! assert_eq!(plan.rounds.len(), 3);
//! ```

pub mod clock;
pub mod error;
pub mod exhaustive;
pub mod group;
pub mod ledger;
pub mod orchestrator;
pub mod plan;
pub mod randomized;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{PlannerError, PlannerResult};
pub use exhaustive::{CombinationScore, ExhaustiveSelector};
pub use group::{Group, Player};
pub use ledger::{FrequencyLedger, GroupFrequency, LedgerStatistics};
pub use orchestrator::{SchedulePlanner, SelectionMode};
pub use plan::{
    PairingView, Plan, PlayerUsage, Round, ScheduleConfig, DEFAULT_PLAYERS_PER_ROUND,
    ROUND_INTERVAL_DAYS,
};
pub use randomized::{
    GeneratorConfig, RandomizedGenerator, Strategy, DEFAULT_BACKTRACK_DEADLINE_MS,
    DEFAULT_RESHUFFLE_ATTEMPTS, PRUNE_FREQUENCY_THRESHOLD,
};
