//! Scored team combinations returned to callers.

use rosterforge_core::{Partition, PlayerId};

use crate::balance::{StatTotals, TeamBalance};

/// A partition together with its team totals and balance score.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamCombination {
    partition: Partition,
    totals: Vec<StatTotals>,
    balance: TeamBalance,
}

impl TeamCombination {
    pub fn new(partition: Partition, totals: Vec<StatTotals>, balance: TeamBalance) -> Self {
        Self {
            partition,
            totals,
            balance,
        }
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Player ids per team; index 0 is team 1.
    pub fn teams(&self) -> &[Vec<PlayerId>] {
        self.partition.teams()
    }

    pub fn team_count(&self) -> usize {
        self.partition.team_count()
    }

    pub fn totals(&self) -> &[StatTotals] {
        &self.totals
    }

    /// Per-player average stats of each team.
    pub fn averages(&self) -> Vec<StatTotals> {
        self.totals
            .iter()
            .zip(self.partition.teams())
            .map(|(totals, team)| totals.per_player(team.len()))
            .collect()
    }

    pub fn balance(&self) -> &TeamBalance {
        &self.balance
    }

    /// Imbalance score; lower is better.
    #[inline]
    pub fn score(&self) -> f64 {
        self.balance.score
    }
}
