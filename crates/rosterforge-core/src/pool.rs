//! The active player pool of a single run.

use std::collections::HashMap;

use crate::error::{Result, RosterForgeError};
use crate::player::{Player, PlayerId, PlayerStats, Stat};

/// Players taking part in one run, indexed by id.
///
/// Preserves the caller's order; ids are unique.
#[derive(Debug, Clone)]
pub struct PlayerPool {
    players: Vec<Player>,
    index: HashMap<PlayerId, usize>,
}

impl PlayerPool {
    /// Builds a pool, rejecting duplicate ids.
    pub fn new(players: Vec<Player>) -> Result<Self> {
        let mut index = HashMap::with_capacity(players.len());
        for (i, player) in players.iter().enumerate() {
            if index.insert(player.id(), i).is_some() {
                return Err(RosterForgeError::DuplicatePlayerId(player.id()));
            }
        }
        Ok(Self { players, index })
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.index.get(&id).map(|&i| &self.players[i])
    }

    pub fn stats(&self, id: PlayerId) -> Option<&PlayerStats> {
        self.get(id).map(Player::stats)
    }

    /// Player ids in pool order.
    pub fn ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(Player::id).collect()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Per-stat min/max/mean over the pool, or `None` for an empty pool.
    pub fn stat_summary(&self) -> Option<PoolSummary> {
        if self.players.is_empty() {
            return None;
        }
        let summarize = |stat: Stat| {
            let values = self.players.iter().map(|p| p.stats().get(stat));
            let (min, max, sum) = values.fold(
                (f64::INFINITY, f64::NEG_INFINITY, 0.0),
                |(min, max, sum), v| (min.min(v), max.max(v), sum + v),
            );
            StatSummary {
                min,
                max,
                mean: sum / self.players.len() as f64,
            }
        };
        Some(PoolSummary {
            player_count: self.players.len(),
            level: summarize(Stat::Level),
            stamina: summarize(Stat::Stamina),
            speed: summarize(Stat::Speed),
        })
    }
}

/// Descriptive statistics of one stat across a pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Descriptive statistics of a whole pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolSummary {
    pub player_count: usize,
    pub level: StatSummary,
    pub stamina: StatSummary,
    pub speed: StatSummary,
}

impl PoolSummary {
    pub fn get(&self, stat: Stat) -> &StatSummary {
        match stat {
            Stat::Level => &self.level,
            Stat::Stamina => &self.stamina,
            Stat::Speed => &self.speed,
        }
    }
}
