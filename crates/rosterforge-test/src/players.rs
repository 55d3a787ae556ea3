//! Player and pool factories.
//!
//! # Example
//!
//! ```
//! use rosterforge_test::players::{ladder_players, pool_of};
//!
//! let players = ladder_players(6);
//! assert_eq!(players.len(), 6);
//! assert_eq!(players[0].id(), 1);
//!
//! let pool = pool_of(players);
//! assert!(pool.contains(6));
//! ```

use rosterforge_core::{Player, PlayerId, PlayerPool, PlayerStats, STAT_MAX, STAT_MIN};

/// Creates a player named after its id.
///
/// # Panics
///
/// Panics if a stat is out of range.
pub fn player(id: PlayerId, level: f64, stamina: f64, speed: f64) -> Player {
    let stats = PlayerStats::new(level, stamina, speed).expect("fixture stats in range");
    Player::new(id, format!("Player {id}"), stats).expect("fixture name is not empty")
}

/// `n` players with ids `1..=n` and every stat set to `value`.
pub fn uniform_players(n: usize, value: f64) -> Vec<Player> {
    (1..=n as PlayerId)
        .map(|id| player(id, value, value, value))
        .collect()
}

/// `n` players with ids `1..=n` whose stats rise evenly across the range.
///
/// Level climbs fastest, speed slowest, so the three stats disagree on
/// which split is most balanced.
pub fn ladder_players(n: usize) -> Vec<Player> {
    let step = if n > 1 {
        (STAT_MAX - STAT_MIN) / (n - 1) as f64
    } else {
        0.0
    };
    (0..n)
        .map(|i| {
            let base = STAT_MIN + step * i as f64;
            let stamina = STAT_MIN + (base - STAT_MIN) * 0.6;
            let speed = STAT_MIN + (base - STAT_MIN) * 0.3;
            player(i as PlayerId + 1, base, stamina, speed)
        })
        .collect()
}

/// Players with ids `1..=levels.len()`, the given levels, and 3.0 for
/// stamina and speed.
pub fn players_from_levels(levels: &[f64]) -> Vec<Player> {
    levels
        .iter()
        .enumerate()
        .map(|(i, &level)| player(i as PlayerId + 1, level, 3.0, 3.0))
        .collect()
}

/// Builds a pool from fixture players.
///
/// # Panics
///
/// Panics on duplicate ids.
pub fn pool_of(players: Vec<Player>) -> PlayerPool {
    PlayerPool::new(players).expect("fixture ids are unique")
}
