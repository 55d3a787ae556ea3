//! Player model: identity, positions and the three rated stats.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, RosterForgeError};

/// Stable player identifier, unique within one run.
pub type PlayerId = u32;

/// Lower bound for every stat value.
pub const STAT_MIN: f64 = 1.0;

/// Upper bound for every stat value.
pub const STAT_MAX: f64 = 5.0;

/// One of the three comparable player attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Stat {
    Level,
    Stamina,
    Speed,
}

impl Stat {
    /// All stats, in scoring order.
    pub const ALL: [Stat; 3] = [Stat::Level, Stat::Stamina, Stat::Speed];

    pub fn name(self) -> &'static str {
        match self {
            Stat::Level => "level",
            Stat::Stamina => "stamina",
            Stat::Speed => "speed",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rated attributes of a single player.
///
/// All three values lie in `[STAT_MIN, STAT_MAX]`; construction fails
/// otherwise.
///
/// # Examples
///
/// ```
/// use rosterforge_core::{PlayerStats, Stat};
///
/// let stats = PlayerStats::new(3.0, 4.0, 2.5).unwrap();
/// assert_eq!(stats.get(Stat::Stamina), 4.0);
/// assert!(PlayerStats::new(6.0, 4.0, 2.5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PlayerStats {
    level: f64,
    stamina: f64,
    speed: f64,
}

impl PlayerStats {
    /// Creates validated stats.
    pub fn new(level: f64, stamina: f64, speed: f64) -> Result<Self> {
        check_range(Stat::Level, level)?;
        check_range(Stat::Stamina, stamina)?;
        check_range(Stat::Speed, speed)?;
        Ok(Self {
            level,
            stamina,
            speed,
        })
    }

    /// Creates stats with the same value for every attribute.
    pub fn uniform(value: f64) -> Result<Self> {
        Self::new(value, value, value)
    }

    #[inline]
    pub fn level(&self) -> f64 {
        self.level
    }

    #[inline]
    pub fn stamina(&self) -> f64 {
        self.stamina
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    #[inline]
    pub fn get(&self, stat: Stat) -> f64 {
        match stat {
            Stat::Level => self.level,
            Stat::Stamina => self.stamina,
            Stat::Speed => self.speed,
        }
    }

    /// Sum of all three attributes.
    pub fn total(&self) -> f64 {
        self.level + self.stamina + self.speed
    }
}

fn check_range(stat: Stat, value: f64) -> Result<()> {
    if value.is_finite() && (STAT_MIN..=STAT_MAX).contains(&value) {
        Ok(())
    } else {
        Err(RosterForgeError::StatOutOfRange {
            stat,
            value,
            min: STAT_MIN,
            max: STAT_MAX,
        })
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PlayerStats {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct Raw {
            level: f64,
            stamina: f64,
            speed: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        PlayerStats::new(raw.level, raw.stamina, raw.speed).map_err(serde::de::Error::custom)
    }
}

/// Field position tag. Display only; never used in scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Position {
    GK,
    DF,
    MF,
    FW,
    LW,
    RW,
    CM,
    CB,
    LB,
    RB,
}

impl Position {
    pub const ALL: [Position; 10] = [
        Position::GK,
        Position::DF,
        Position::MF,
        Position::FW,
        Position::LW,
        Position::RW,
        Position::CM,
        Position::CB,
        Position::LB,
        Position::RB,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Position::GK => "GK",
            Position::DF => "DF",
            Position::MF => "MF",
            Position::FW => "FW",
            Position::LW => "LW",
            Position::RW => "RW",
            Position::CM => "CM",
            Position::CB => "CB",
            Position::LB => "LB",
            Position::RB => "RB",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Position {
    type Err = RosterForgeError;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim();
        Position::ALL
            .into_iter()
            .find(|p| p.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| RosterForgeError::InvalidPlayer(format!("unknown position '{s}'")))
    }
}

/// A rated player, read-only for the duration of a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Player {
    id: PlayerId,
    name: String,
    positions: Vec<Position>,
    stats: PlayerStats,
}

impl Player {
    /// Creates a player with no position tags.
    pub fn new(id: PlayerId, name: impl Into<String>, stats: PlayerStats) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RosterForgeError::InvalidPlayer(format!(
                "player {id} has an empty name"
            )));
        }
        Ok(Self {
            id,
            name,
            positions: Vec::new(),
            stats,
        })
    }

    /// Replaces the position tags, dropping repeats.
    pub fn with_positions(mut self, positions: impl IntoIterator<Item = Position>) -> Self {
        self.positions.clear();
        for position in positions {
            if !self.positions.contains(&position) {
                self.positions.push(position);
            }
        }
        self
    }

    #[inline]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    #[inline]
    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Player {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct Raw {
            id: PlayerId,
            name: String,
            #[serde(default)]
            positions: Vec<Position>,
            stats: PlayerStats,
        }

        let raw = Raw::deserialize(deserializer)?;
        Player::new(raw.id, raw.name, raw.stats)
            .map(|player| player.with_positions(raw.positions))
            .map_err(serde::de::Error::custom)
    }
}
