//! Team shape: how many teams, and how many players per team.

use std::fmt;

use crate::error::{Result, RosterForgeError};

/// Number of teams and fixed team size.
///
/// # Examples
///
/// ```
/// use rosterforge_core::TeamShape;
///
/// let shape = TeamShape::new(2, 6).unwrap();
/// assert_eq!(shape.total_players(), 12);
/// assert!(TeamShape::new(1, 6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeamShape {
    teams: usize,
    size: usize,
}

impl TeamShape {
    /// Creates a shape with at least two teams of at least one player.
    pub fn new(teams: usize, size: usize) -> Result<Self> {
        if teams < 2 {
            return Err(RosterForgeError::InvalidTeamShape(format!(
                "need at least 2 teams, got {teams}"
            )));
        }
        if size < 1 {
            return Err(RosterForgeError::InvalidTeamShape(
                "team size must be at least 1".to_string(),
            ));
        }
        if teams.checked_mul(size).is_none() {
            return Err(RosterForgeError::InvalidTeamShape(format!(
                "{teams} teams of {size} players overflows"
            )));
        }
        Ok(Self { teams, size })
    }

    #[inline]
    pub fn teams(&self) -> usize {
        self.teams
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Players required to fill every team.
    #[inline]
    pub fn total_players(&self) -> usize {
        self.teams * self.size
    }

    /// Fails with `InvalidShape` unless `count` fills the shape exactly.
    pub fn check_player_count(&self, count: usize) -> Result<()> {
        if count == self.total_players() {
            Ok(())
        } else {
            Err(RosterForgeError::InvalidShape {
                expected: self.total_players(),
                actual: count,
            })
        }
    }
}

impl fmt::Display for TeamShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.teams, self.size)
    }
}
