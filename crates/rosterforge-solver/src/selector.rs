//! Greedy diverse top-N selection.
//!
//! Candidates are ranked by score, lowest first, with the draw index as the
//! tie-breaker. The ranking is walked once: a candidate is taken when it is
//! not a relabeling of an earlier one and its overlap with every accepted
//! combination stays within the threshold.

use std::collections::{HashMap, HashSet};

use rosterforge_core::{Partition, PlayerId, TeamShape};
use rosterforge_scoring::TeamBalance;

/// A valid sampled partition and its score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPartition {
    /// Position in the overall draw order.
    pub index: u64,
    pub partition: Partition,
    pub balance: TeamBalance,
}

impl ScoredPartition {
    pub fn new(index: u64, partition: Partition, balance: TeamBalance) -> Self {
        Self {
            index,
            partition,
            balance,
        }
    }

    #[inline]
    pub fn score(&self) -> f64 {
        self.balance.score
    }
}

/// Largest number of players any team of `a` shares with any team of `b`.
///
/// Relabeling the teams of either side leaves the result unchanged.
///
/// ```
/// use rosterforge_core::Partition;
/// use rosterforge_solver::selector::overlap;
///
/// let a = Partition::new(vec![vec![1, 2, 3], vec![4, 5, 6]]);
/// let b = Partition::new(vec![vec![4, 5, 1], vec![2, 3, 6]]);
/// assert_eq!(overlap(&a, &b), 2);
/// ```
pub fn overlap(a: &Partition, b: &Partition) -> usize {
    TeamIndex::new(b).overlap(a)
}

/// Smallest overlap two distinct partitions of `shape` can have.
///
/// Every team of one side is spread over the teams of the other, so some
/// pair always shares at least `ceil(size / teams)` players.
pub fn least_overlap(shape: &TeamShape) -> usize {
    shape.size().div_ceil(shape.teams())
}

/// Team lookup for one accepted partition.
#[derive(Debug)]
struct TeamIndex {
    team_of: HashMap<PlayerId, usize>,
    teams: usize,
}

impl TeamIndex {
    fn new(partition: &Partition) -> Self {
        let team_of = partition
            .teams()
            .iter()
            .enumerate()
            .flat_map(|(t, team)| team.iter().map(move |&id| (id, t)))
            .collect();
        Self {
            team_of,
            teams: partition.team_count(),
        }
    }

    fn overlap(&self, other: &Partition) -> usize {
        let mut shared = vec![0usize; self.teams];
        let mut best = 0;
        for team in other.teams() {
            shared.iter_mut().for_each(|s| *s = 0);
            for id in team {
                if let Some(&t) = self.team_of.get(id) {
                    shared[t] += 1;
                    best = best.max(shared[t]);
                }
            }
        }
        best
    }
}

/// Picks up to `top_n` low-score, mutually distinct combinations.
#[derive(Debug, Clone, Copy)]
pub struct DiversitySelector {
    top_n: usize,
    threshold: f64,
}

impl DiversitySelector {
    /// `threshold` is the largest overlap allowed between two picks.
    pub fn new(top_n: usize, threshold: f64) -> Self {
        Self { top_n, threshold }
    }

    /// Threshold of `ceil(size / 2)`.
    ///
    /// With two teams every pair of distinct splits overlaps by at least
    /// half a team, so a plain `size / 2` would admit nothing after the
    /// first pick when the size is odd.
    pub fn for_shape(top_n: usize, shape: &TeamShape) -> Self {
        Self::new(top_n, shape.size().div_ceil(2) as f64)
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Selects from `candidates`, best first.
    ///
    /// The first pick is always the best-scoring candidate.
    pub fn select<'a>(&self, candidates: &'a [ScoredPartition]) -> Vec<&'a ScoredPartition> {
        self.select_indices(candidates)
            .into_iter()
            .map(|i| &candidates[i])
            .collect()
    }

    /// Like [`select`](Self::select), returning positions in `candidates`.
    pub fn select_indices(&self, candidates: &[ScoredPartition]) -> Vec<usize> {
        let mut ranked: Vec<usize> = (0..candidates.len()).collect();
        ranked.sort_by(|&a, &b| {
            let (a, b) = (&candidates[a], &candidates[b]);
            a.score()
                .total_cmp(&b.score())
                .then_with(|| a.index.cmp(&b.index))
        });

        let mut seen = HashSet::new();
        let mut accepted: Vec<(usize, TeamIndex)> = Vec::with_capacity(self.top_n);
        for position in ranked {
            if accepted.len() >= self.top_n {
                break;
            }
            let partition = &candidates[position].partition;
            if !seen.insert(partition.canonical_key()) {
                continue;
            }
            let diverse = accepted
                .iter()
                .all(|(_, index)| index.overlap(partition) as f64 <= self.threshold);
            if diverse {
                accepted.push((position, TeamIndex::new(partition)));
            }
        }
        accepted.into_iter().map(|(position, _)| position).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(index: u64, teams: &[&[PlayerId]], score: f64) -> ScoredPartition {
        ScoredPartition::new(
            index,
            Partition::new(teams.iter().map(|t| t.to_vec()).collect()),
            TeamBalance {
                score,
                ..Default::default()
            },
        )
    }

    fn indices(picked: &[&ScoredPartition]) -> Vec<u64> {
        picked.iter().map(|c| c.index).collect()
    }

    #[test]
    fn test_overlap_is_label_invariant() {
        let a = Partition::new(vec![vec![1, 2], vec![3, 4]]);
        let b = Partition::new(vec![vec![3, 4], vec![1, 2]]);
        assert_eq!(overlap(&a, &b), 2);
        assert_eq!(overlap(&a, &a), 2);
        let c = Partition::new(vec![vec![1, 3], vec![2, 4]]);
        assert_eq!(overlap(&a, &c), 1);
    }

    #[test]
    fn test_best_first_then_by_index() {
        let candidates = vec![
            candidate(0, &[&[1, 2], &[3, 4]], 2.0),
            candidate(1, &[&[1, 3], &[2, 4]], 1.0),
            candidate(2, &[&[1, 4], &[2, 3]], 1.0),
        ];
        let picked = DiversitySelector::new(3, 2.0).select(&candidates);
        assert_eq!(indices(&picked), vec![1, 2, 0]);
    }

    #[test]
    fn test_relabeled_duplicates_dropped() {
        let candidates = vec![
            candidate(0, &[&[1, 2], &[3, 4]], 0.5),
            candidate(1, &[&[3, 4], &[1, 2]], 0.5),
            candidate(2, &[&[1, 3], &[2, 4]], 1.0),
        ];
        // A threshold above the team size would otherwise admit the copy.
        let picked = DiversitySelector::new(3, 10.0).select(&candidates);
        assert_eq!(indices(&picked), vec![0, 2]);
    }

    #[test]
    fn test_overlapping_candidates_skipped() {
        let candidates = vec![
            candidate(0, &[&[1, 2, 3], &[4, 5, 6]], 0.0),
            // shares {1,2,3} minus one player
            candidate(1, &[&[1, 2, 4], &[3, 5, 6]], 0.1),
            candidate(2, &[&[1, 4, 5], &[2, 3, 6]], 0.2),
        ];
        let picked = DiversitySelector::new(3, 1.5).select(&candidates);
        // overlap 2 is rejected
        assert_eq!(indices(&picked), vec![0]);

        let picked = DiversitySelector::new(3, 2.0).select(&candidates);
        assert_eq!(indices(&picked), vec![0, 1, 2]);
    }

    #[test]
    fn test_least_overlap() {
        assert_eq!(least_overlap(&TeamShape::new(2, 5).unwrap()), 3);
        assert_eq!(least_overlap(&TeamShape::new(2, 6).unwrap()), 3);
        assert_eq!(least_overlap(&TeamShape::new(3, 4).unwrap()), 2);
        assert_eq!(least_overlap(&TeamShape::new(4, 1).unwrap()), 1);
    }

    #[test]
    fn test_default_threshold_admits_odd_team_sizes() {
        // 2v3: the team holding player 1 decides the split
        let teams: [&[PlayerId]; 4] = [&[1, 2, 3], &[1, 2, 4], &[1, 4, 5], &[1, 5, 6]];
        let candidates: Vec<ScoredPartition> = teams
            .iter()
            .enumerate()
            .map(|(i, &first)| {
                let second: Vec<PlayerId> = (1..=6).filter(|id| !first.contains(id)).collect();
                candidate(i as u64, &[first, &second[..]], i as f64)
            })
            .collect();

        let shape = TeamShape::new(2, 3).unwrap();
        let selector = DiversitySelector::for_shape(3, &shape);
        assert_eq!(selector.threshold(), 2.0);
        assert!(selector.threshold() >= least_overlap(&shape) as f64);
        assert_eq!(indices(&selector.select(&candidates)), vec![0, 1, 2]);
    }

    #[test]
    fn test_top_n_limits_output() {
        let candidates = vec![
            candidate(0, &[&[1, 2], &[3, 4]], 0.3),
            candidate(1, &[&[1, 3], &[2, 4]], 0.2),
            candidate(2, &[&[1, 4], &[2, 3]], 0.1),
        ];
        let picked = DiversitySelector::new(1, 2.0).select(&candidates);
        assert_eq!(indices(&picked), vec![2]);
    }

    #[test]
    fn test_empty_input() {
        assert!(DiversitySelector::new(3, 1.0).select(&[]).is_empty());
    }
}
