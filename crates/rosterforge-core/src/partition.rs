//! A split of the player pool into fixed-size teams.

use crate::player::PlayerId;

/// One assignment of every player to exactly one team.
///
/// Team index `i` here is team number `i + 1` in user-facing terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partition {
    teams: Vec<Vec<PlayerId>>,
}

impl Partition {
    pub fn new(teams: Vec<Vec<PlayerId>>) -> Self {
        Self { teams }
    }

    /// Slices `ids` into contiguous chunks of `size`.
    ///
    /// A trailing short chunk is kept as its own team; callers pass a
    /// length that is a multiple of `size`.
    pub fn from_chunks(ids: &[PlayerId], size: usize) -> Self {
        Self {
            teams: ids.chunks(size.max(1)).map(<[PlayerId]>::to_vec).collect(),
        }
    }

    #[inline]
    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn teams(&self) -> &[Vec<PlayerId>] {
        &self.teams
    }

    pub fn team(&self, index: usize) -> Option<&[PlayerId]> {
        self.teams.get(index).map(Vec::as_slice)
    }

    /// Zero-based team index holding `id`.
    pub fn team_of(&self, id: PlayerId) -> Option<usize> {
        self.teams.iter().position(|team| team.contains(&id))
    }

    pub fn player_count(&self) -> usize {
        self.teams.iter().map(Vec::len).sum()
    }

    /// Label-free identity of the split: ids sorted within each team,
    /// then teams sorted.
    pub fn canonical_key(&self) -> Vec<Vec<PlayerId>> {
        let mut key: Vec<Vec<PlayerId>> = self
            .teams
            .iter()
            .map(|team| {
                let mut team = team.clone();
                team.sort_unstable();
                team
            })
            .collect();
        key.sort_unstable();
        key
    }

    pub fn into_teams(self) -> Vec<Vec<PlayerId>> {
        self.teams
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_chunks() {
        let partition = Partition::from_chunks(&[4, 1, 3, 2, 6, 5], 2);
        assert_eq!(partition.team_count(), 3);
        assert_eq!(partition.team(1), Some(&[3, 2][..]));
        assert_eq!(partition.team_of(6), Some(2));
        assert_eq!(partition.team_of(9), None);
        assert_eq!(partition.player_count(), 6);
    }

    #[test]
    fn test_canonical_key_ignores_labels_and_order() {
        let a = Partition::new(vec![vec![3, 1], vec![2, 4]]);
        let b = Partition::new(vec![vec![4, 2], vec![1, 3]]);
        let c = Partition::new(vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(a.canonical_key(), b.canonical_key());
        assert_ne!(a.canonical_key(), c.canonical_key());
    }
}
