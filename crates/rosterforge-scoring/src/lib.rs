//! Balance scoring for RosterForge.
//!
//! This crate turns a [`Partition`](rosterforge_core::Partition) into a
//! scalar imbalance score:
//! - Per-stat weights (`StatWeights`)
//! - Per-team stat totals (`StatTotals`)
//! - The scorer itself (`BalanceScorer`) and its breakdown (`TeamBalance`)
//! - Scored output combinations (`TeamCombination`)

pub mod balance;
pub mod combination;
pub mod weights;

pub use balance::{BalanceScorer, StatTotals, TeamBalance};
pub use combination::TeamCombination;
pub use weights::StatWeights;
