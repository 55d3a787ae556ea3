//! Error types for RosterForge

use thiserror::Error;

use crate::player::{PlayerId, Stat};

/// Main error type for RosterForge operations.
///
/// Every variant is a caller error detected before any sampling starts.
/// Running out of samples without finding a valid split is not an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RosterForgeError {
    /// The player count does not match `teams * size`.
    #[error("Invalid shape: expected {expected} players, got {actual}")]
    InvalidShape { expected: usize, actual: usize },

    /// Team count or team size out of bounds.
    #[error("Invalid team shape: {0}")]
    InvalidTeamShape(String),

    /// A stat value outside the allowed range.
    #[error("Stat {stat} = {value} is outside [{min}, {max}]")]
    StatOutOfRange {
        stat: Stat,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Malformed player record.
    #[error("Invalid player: {0}")]
    InvalidPlayer(String),

    /// Two players in one pool share an id.
    #[error("Duplicate player id: {0}")]
    DuplicatePlayerId(PlayerId),

    /// Malformed constraint shape.
    #[error("Invalid constraint: {0}")]
    InvalidConstraint(String),

    /// Error in engine configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for RosterForge operations
pub type Result<T> = std::result::Result<T, RosterForgeError>;
