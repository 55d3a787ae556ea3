//! Random partition generation.
//!
//! Sampling is decoupled from validation: a [`PartitionSampler`] only has
//! to respect the team shape. [`CombinationSampler`] binds a sampler to a
//! player list and draws reproducible batches.

use std::collections::HashSet;
use std::fmt::Debug;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use rosterforge_core::{Partition, PlayerId, Result, RosterForgeError, TeamShape};

/// Samples drawn per independently seeded chunk.
pub const CHUNK_SIZE: u64 = 4096;

/// Produces shape-respecting partitions of a player list.
pub trait PartitionSampler: Send + Sync + Debug {
    /// Draws one partition of `ids` into `shape.teams()` teams of
    /// `shape.size()` players.
    fn sample<R: Rng + ?Sized>(&self, ids: &[PlayerId], shape: &TeamShape, rng: &mut R)
        -> Partition;
}

/// Uniform shuffle-and-slice sampler.
///
/// Shuffles the ids and cuts the permutation into contiguous teams. Ids
/// within each team come out sorted.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShuffleSampler;

impl PartitionSampler for ShuffleSampler {
    fn sample<R: Rng + ?Sized>(
        &self,
        ids: &[PlayerId],
        shape: &TeamShape,
        rng: &mut R,
    ) -> Partition {
        let mut order = ids.to_vec();
        order.shuffle(rng);
        for team in order.chunks_mut(shape.size()) {
            team.sort_unstable();
        }
        Partition::from_chunks(&order, shape.size())
    }
}

/// A sampler bound to a validated player list and team shape.
///
/// # Example
///
/// ```
/// use rosterforge_core::TeamShape;
/// use rosterforge_solver::sampler::CombinationSampler;
///
/// let shape = TeamShape::new(2, 3).unwrap();
/// let sampler = CombinationSampler::new(vec![1, 2, 3, 4, 5, 6], shape).unwrap();
///
/// let batch = sampler.sample(100, 42);
/// assert_eq!(batch.len(), 100);
/// assert_eq!(batch, sampler.sample(100, 42));
///
/// assert!(CombinationSampler::new(vec![1, 2, 3], shape).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct CombinationSampler<Sm = ShuffleSampler> {
    ids: Vec<PlayerId>,
    shape: TeamShape,
    sampler: Sm,
}

impl CombinationSampler<ShuffleSampler> {
    pub fn new(ids: Vec<PlayerId>, shape: TeamShape) -> Result<Self> {
        Self::with_sampler(ids, shape, ShuffleSampler)
    }
}

impl<Sm: PartitionSampler> CombinationSampler<Sm> {
    /// Fails with `InvalidShape` unless `ids` fills `shape` exactly.
    pub fn with_sampler(ids: Vec<PlayerId>, shape: TeamShape, sampler: Sm) -> Result<Self> {
        shape.check_player_count(ids.len())?;
        let mut seen = HashSet::with_capacity(ids.len());
        if let Some(&dup) = ids.iter().find(|&&id| !seen.insert(id)) {
            return Err(RosterForgeError::DuplicatePlayerId(dup));
        }
        Ok(Self {
            ids,
            shape,
            sampler,
        })
    }

    pub fn ids(&self) -> &[PlayerId] {
        &self.ids
    }

    pub fn shape(&self) -> &TeamShape {
        &self.shape
    }

    pub fn sample_one<R: Rng + ?Sized>(&self, rng: &mut R) -> Partition {
        self.sampler.sample(&self.ids, &self.shape, rng)
    }

    /// Draws `n_samples` partitions, reproducibly for a given `seed`.
    ///
    /// Duplicates are expected when the pool is small.
    pub fn sample(&self, n_samples: u64, seed: u64) -> Vec<Partition> {
        (0..chunk_count(n_samples))
            .flat_map(|chunk| {
                let mut rng = chunk_rng(seed, chunk);
                let len = chunk_len(n_samples, chunk);
                (0..len).map(move |_| self.sample_one(&mut rng))
            })
            .collect()
    }
}

/// Number of chunks needed for `n_samples`.
pub(crate) fn chunk_count(n_samples: u64) -> u64 {
    n_samples.div_ceil(CHUNK_SIZE)
}

/// Samples in chunk `chunk`; only the last chunk may be short.
pub(crate) fn chunk_len(n_samples: u64, chunk: u64) -> u64 {
    (n_samples - chunk * CHUNK_SIZE).min(CHUNK_SIZE)
}

/// Independent stream per chunk, so chunks can run in any order.
pub(crate) fn chunk_rng(seed: u64, chunk: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(chunk);
    rng
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: u32) -> Vec<PlayerId> {
        (1..=n).collect()
    }

    #[test]
    fn test_every_player_placed_once() {
        let shape = TeamShape::new(3, 4).unwrap();
        let sampler = CombinationSampler::new(ids(12), shape).unwrap();
        for partition in sampler.sample(500, 7) {
            assert_eq!(partition.team_count(), 3);
            assert!(partition.teams().iter().all(|t| t.len() == 4));
            let mut all: Vec<PlayerId> = partition.teams().concat();
            all.sort_unstable();
            assert_eq!(all, ids(12));
        }
    }

    #[test]
    fn test_teams_are_sorted() {
        let shape = TeamShape::new(2, 5).unwrap();
        let sampler = CombinationSampler::new(ids(10), shape).unwrap();
        for partition in sampler.sample(50, 3) {
            for team in partition.teams() {
                assert!(team.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn test_invalid_shape() {
        let shape = TeamShape::new(2, 6).unwrap();
        let err = CombinationSampler::new(ids(11), shape).unwrap_err();
        assert_eq!(
            err,
            RosterForgeError::InvalidShape {
                expected: 12,
                actual: 11
            }
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let shape = TeamShape::new(2, 2).unwrap();
        let err = CombinationSampler::new(vec![1, 2, 2, 3], shape).unwrap_err();
        assert_eq!(err, RosterForgeError::DuplicatePlayerId(2));
    }

    #[test]
    fn test_same_seed_same_batch() {
        let shape = TeamShape::new(2, 4).unwrap();
        let sampler = CombinationSampler::new(ids(8), shape).unwrap();
        let n = CHUNK_SIZE + 10;
        assert_eq!(sampler.sample(n, 99), sampler.sample(n, 99));
        assert_ne!(sampler.sample(n, 99), sampler.sample(n, 100));
    }

    #[test]
    fn test_small_pool_reaches_every_split() {
        let shape = TeamShape::new(2, 2).unwrap();
        let sampler = CombinationSampler::new(ids(4), shape).unwrap();
        let distinct: HashSet<_> = sampler
            .sample(1000, 1)
            .iter()
            .map(Partition::canonical_key)
            .collect();
        // {12|34}, {13|24}, {14|23}
        assert_eq!(distinct.len(), 3);
    }

    #[test]
    fn test_chunking() {
        assert_eq!(chunk_count(0), 0);
        assert_eq!(chunk_count(1), 1);
        assert_eq!(chunk_count(CHUNK_SIZE), 1);
        assert_eq!(chunk_count(CHUNK_SIZE + 1), 2);
        assert_eq!(chunk_len(CHUNK_SIZE + 1, 0), CHUNK_SIZE);
        assert_eq!(chunk_len(CHUNK_SIZE + 1, 1), 1);
    }
}
