//! RosterForge Core - Core types for team balancing
//!
//! This crate provides the value types every other RosterForge crate
//! shares:
//! - Players and their rated stats
//! - The player pool of one run
//! - Team shapes and partitions
//! - Grouping constraints with static conflict analysis

pub mod constraint;
pub mod error;
pub mod partition;
pub mod player;
pub mod pool;
pub mod shape;


pub use constraint::{ConstraintConflict, ConstraintSet};
pub use error::{Result, RosterForgeError};
pub use partition::Partition;
pub use player::{Player, PlayerId, PlayerStats, Position, Stat, STAT_MAX, STAT_MIN};
pub use pool::{PlayerPool, PoolSummary, StatSummary};
pub use shape::TeamShape;
