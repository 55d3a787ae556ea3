//! RosterForge - Balanced Team Generation in Rust
//!
//! Split a pool of rated players into equally sized teams whose summed
//! stats are as even as possible, honoring together, separate and pinned
//! constraints.
//!
//! # Example
//!
//! ```rust
//! use rosterforge::prelude::*;
//!
//! let players: Vec<Player> = [4.5, 2.0, 3.0, 3.5, 1.5, 3.5]
//!     .iter()
//!     .zip(1..)
//!     .map(|(&level, id)| {
//!         let stats = PlayerStats::new(level, 3.0, 3.0).unwrap();
//!         Player::new(id, format!("Player {id}"), stats).unwrap()
//!     })
//!     .collect();
//!
//! let config = EngineConfig::new().with_random_seed(1).with_fixed_samples(1_000);
//! let constraints = ConstraintSet::new().separate([1, 6]);
//! let result = rosterforge::balance_with_config(
//!     &players,
//!     TeamShape::new(2, 3).unwrap(),
//!     &constraints,
//!     &config,
//! )
//! .unwrap();
//!
//! let best = result.best().unwrap();
//! assert_ne!(best.partition().team_of(1), best.partition().team_of(6));
//! // 4.5 + 3.0 + 1.5 == 2.0 + 3.5 + 3.5
//! assert_eq!(best.score(), 0.0);
//! ```

// Domain types
pub use rosterforge_core::{
    ConstraintConflict, ConstraintSet, Partition, Player, PlayerId, PlayerPool, PlayerStats,
    PoolSummary, Position, Result, RosterForgeError, Stat, StatSummary, TeamShape, STAT_MAX,
    STAT_MIN,
};

// Scoring
pub use rosterforge_scoring::{BalanceScorer, StatTotals, StatWeights, TeamBalance, TeamCombination};

// Engine
pub use rosterforge_solver::{
    least_overlap, overlap, BalanceResult, CombinationSampler, ConstraintValidator,
    DiversitySelector, PartitionSampler, SamplingStrategy, ShuffleSampler, SolveStats,
    SolverSettings, TeamBalancer,
};

// Configuration
pub use rosterforge_config::{
    ConfigError, EngineConfig, RawConstraints, SamplingConfig, ThreadCount,
};

#[cfg(feature = "console")]
pub use rosterforge_console as console;

mod run;
pub use run::{balance, balance_from_config, balance_with_config, CONFIG_FILE};

pub mod prelude {
    pub use super::{
        BalanceResult, ConstraintSet, EngineConfig, Player, PlayerStats, Position, Stat,
        TeamCombination, TeamShape,
    };
    pub use super::{SolverSettings, TeamBalancer};
}
