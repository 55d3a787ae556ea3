//! Imbalance score for a partition.
//!
//! For every stat, the totals of each team are compared pairwise:
//!
//! ```text
//! score = Σ_stat weight(stat) · Σ_{i<j} |total_i(stat) − total_j(stat)|
//! ```
//!
//! With two teams this is `|ΔLevel| + |ΔStamina| + |ΔSpeed|`. With more
//! teams every unordered pair of teams contributes once. Totals are sorted
//! before the pair sum, so relabeling teams never changes the result, and
//! equal totals give exactly `0.0`.

use rosterforge_core::{Partition, PlayerPool, PlayerStats, Stat};

use crate::combination::TeamCombination;
use crate::weights::StatWeights;

/// Summed stats of one team.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatTotals {
    pub level: f64,
    pub stamina: f64,
    pub speed: f64,
}

impl StatTotals {
    pub fn add(&mut self, stats: &PlayerStats) {
        self.level += stats.level();
        self.stamina += stats.stamina();
        self.speed += stats.speed();
    }

    #[inline]
    pub fn get(&self, stat: Stat) -> f64 {
        match stat {
            Stat::Level => self.level,
            Stat::Stamina => self.stamina,
            Stat::Speed => self.speed,
        }
    }

    /// Totals divided by `players`; zero for an empty team.
    pub fn per_player(&self, players: usize) -> StatTotals {
        if players == 0 {
            return StatTotals::default();
        }
        let n = players as f64;
        StatTotals {
            level: self.level / n,
            stamina: self.stamina / n,
            speed: self.speed / n,
        }
    }
}

/// Weighted per-stat spread and the resulting score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TeamBalance {
    pub level: f64,
    pub stamina: f64,
    pub speed: f64,
    pub score: f64,
}

impl TeamBalance {
    /// Weighted contribution of one stat.
    pub fn get(&self, stat: Stat) -> f64 {
        match stat {
            Stat::Level => self.level,
            Stat::Stamina => self.stamina,
            Stat::Speed => self.speed,
        }
    }

    pub fn is_perfect(&self) -> bool {
        self.score == 0.0
    }
}

/// Scores partitions by weighted pairwise stat differences.
///
/// # Example
///
/// ```
/// use rosterforge_core::{Partition, Player, PlayerPool, PlayerStats};
/// use rosterforge_scoring::{BalanceScorer, StatWeights};
///
/// let stats = |l| PlayerStats::new(l, 3.0, 3.0).unwrap();
/// let pool = PlayerPool::new(vec![
///     Player::new(1, "A", stats(4.0)).unwrap(),
///     Player::new(2, "B", stats(2.0)).unwrap(),
///     Player::new(3, "C", stats(3.0)).unwrap(),
///     Player::new(4, "D", stats(3.5)).unwrap(),
/// ]).unwrap();
///
/// let scorer = BalanceScorer::new(StatWeights::default());
/// let balance = scorer.score(&Partition::new(vec![vec![1, 2], vec![3, 4]]), &pool);
///
/// // Level totals 6.0 vs 6.5; stamina and speed are equal.
/// assert_eq!(balance.score, 0.5);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceScorer {
    weights: StatWeights,
}

impl BalanceScorer {
    pub fn new(weights: StatWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &StatWeights {
        &self.weights
    }

    /// Sums player stats per team.
    ///
    /// Ids missing from `pool` contribute nothing.
    pub fn team_totals(&self, partition: &Partition, pool: &PlayerPool) -> Vec<StatTotals> {
        partition
            .teams()
            .iter()
            .map(|team| {
                let mut totals = StatTotals::default();
                for stats in team.iter().filter_map(|&id| pool.stats(id)) {
                    totals.add(stats);
                }
                totals
            })
            .collect()
    }

    /// Scores precomputed team totals.
    pub fn score_totals(&self, totals: &[StatTotals]) -> TeamBalance {
        let spread = |stat: Stat| {
            let weight = self.weights.get(stat);
            if weight == 0.0 {
                return 0.0;
            }
            let values: Vec<f64> = totals.iter().map(|t| t.get(stat)).collect();
            weight * pairwise_abs_difference(values)
        };
        let level = spread(Stat::Level);
        let stamina = spread(Stat::Stamina);
        let speed = spread(Stat::Speed);
        TeamBalance {
            level,
            stamina,
            speed,
            score: level + stamina + speed,
        }
    }

    pub fn score(&self, partition: &Partition, pool: &PlayerPool) -> TeamBalance {
        self.score_totals(&self.team_totals(partition, pool))
    }

    /// Scores `partition` and wraps it as an output combination.
    pub fn combine(&self, partition: Partition, pool: &PlayerPool) -> TeamCombination {
        let totals = self.team_totals(&partition, pool);
        let balance = self.score_totals(&totals);
        TeamCombination::new(partition, totals, balance)
    }
}

fn pairwise_abs_difference(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    let mut sum = 0.0;
    for (i, &low) in values.iter().enumerate() {
        for &high in &values[i + 1..] {
            sum += high - low;
        }
    }
    sum
}
