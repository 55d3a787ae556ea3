//! RosterForge Solver Engine
//!
//! This crate turns a player pool into balanced team combinations:
//! - Partition sampling (shuffle and slice, seeded per chunk)
//! - Hard-constraint validation
//! - Diverse top-N selection
//! - Fixed and adaptive sample budgets
//! - The [`TeamBalancer`] engine tying them together

pub mod engine;
pub mod sampler;
pub mod selector;
pub mod stats;
pub mod strategy;
pub mod validator;

pub use engine::{BalanceResult, SolverSettings, TeamBalancer};
pub use sampler::{CombinationSampler, PartitionSampler, ShuffleSampler, CHUNK_SIZE};
pub use selector::{least_overlap, overlap, DiversitySelector, ScoredPartition};
pub use stats::SolveStats;
pub use strategy::SamplingStrategy;
pub use validator::ConstraintValidator;

#[cfg(test)]
mod engine_tests;
