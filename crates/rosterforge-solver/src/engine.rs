//! The team balancing engine.
//!
//! One call to [`TeamBalancer::solve`] runs the whole pipeline:
//!
//! 1. restrict the constraints to the players present and check them for
//!    provable conflicts,
//! 2. draw partitions in seeded chunks, keeping the valid ones with their
//!    scores,
//! 3. pick diverse low-score combinations, drawing more rounds while the
//!    adaptive strategy wants more results and the last round still
//!    turned up splits not seen before.
//!
//! Chunks are evaluated on rayon. Every chunk has its own RNG stream and
//! results are concatenated in chunk order, so a fixed seed yields the same
//! combinations on any number of threads.

use std::collections::HashSet;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, warn};

use rosterforge_config::{EngineConfig, ThreadCount, DEFAULT_TOP_N};
use rosterforge_core::{
    ConstraintConflict, ConstraintSet, Player, PlayerPool, Result, RosterForgeError, TeamShape,
};
use rosterforge_scoring::{BalanceScorer, StatWeights, TeamCombination};

use crate::sampler::{
    chunk_count, chunk_len, chunk_rng, CombinationSampler, PartitionSampler, ShuffleSampler,
    CHUNK_SIZE,
};
use crate::selector::{least_overlap, DiversitySelector, ScoredPartition};
use crate::stats::SolveStats;
use crate::strategy::SamplingStrategy;
use crate::validator::ConstraintValidator;

/// Engine settings resolved from configuration.
#[derive(Debug, Clone)]
pub struct SolverSettings {
    pub weights: StatWeights,
    pub top_n: usize,
    /// Largest overlap between two results; `None` means half the team
    /// size, rounded up.
    pub diversity_threshold: Option<f64>,
    pub sampling: SamplingStrategy,
    /// Seed for reproducible runs; drawn from the OS when `None`.
    pub random_seed: Option<u64>,
    pub thread_count: ThreadCount,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            weights: StatWeights::default(),
            top_n: DEFAULT_TOP_N,
            diversity_threshold: None,
            sampling: SamplingStrategy::default(),
            random_seed: None,
            thread_count: ThreadCount::Auto,
        }
    }
}

impl SolverSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `config` and converts it.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        let weights = &config.stat_weights;
        Ok(Self {
            weights: StatWeights::new(weights.level, weights.stamina, weights.speed)?,
            top_n: config.top_n,
            diversity_threshold: config.diversity_threshold,
            sampling: SamplingStrategy::from(&config.sampling),
            random_seed: config.random_seed,
            thread_count: config.thread_count,
        })
    }

    pub fn with_weights(mut self, weights: StatWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_diversity_threshold(mut self, threshold: f64) -> Self {
        self.diversity_threshold = Some(threshold);
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingStrategy) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_fixed_samples(self, samples: u64) -> Self {
        self.with_sampling(SamplingStrategy::fixed(samples))
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_thread_count(mut self, thread_count: ThreadCount) -> Self {
        self.thread_count = thread_count;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(RosterForgeError::Config("top_n must be at least 1".into()));
        }
        if let Some(threshold) = self.diversity_threshold {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(RosterForgeError::Config(format!(
                    "diversity_threshold must be a non-negative number, got {threshold}"
                )));
            }
        }
        if self.thread_count == ThreadCount::Count(0) {
            return Err(RosterForgeError::Config(
                "thread_count must be at least 1".into(),
            ));
        }
        self.sampling.validate()
    }

    /// Builds the selector for `shape`.
    ///
    /// An explicit threshold below [`least_overlap`] could never admit a
    /// second result and is rejected when more than one is wanted.
    fn selector(&self, shape: &TeamShape) -> Result<DiversitySelector> {
        let Some(threshold) = self.diversity_threshold else {
            return Ok(DiversitySelector::for_shape(self.top_n, shape));
        };
        let least = least_overlap(shape);
        if self.top_n > 1 && threshold < least as f64 {
            return Err(RosterForgeError::Config(format!(
                "diversity_threshold {threshold} is below {least}, the smallest overlap \
                 two {}x{} splits can have",
                shape.teams(),
                shape.size(),
            )));
        }
        Ok(DiversitySelector::new(self.top_n, threshold))
    }

    fn min_results(&self) -> usize {
        match self.sampling {
            SamplingStrategy::Adaptive {
                min_results: Some(n),
                ..
            } => n.min(self.top_n),
            _ => self.top_n,
        }
    }
}

/// Outcome of one solve run.
#[derive(Debug, Clone)]
pub struct BalanceResult {
    /// Best first. Empty when nothing valid was found.
    pub combinations: Vec<TeamCombination>,
    pub stats: SolveStats,
    /// Set when the constraints were rejected before sampling.
    pub conflict: Option<ConstraintConflict>,
    /// Seed the run used.
    pub seed: u64,
}

impl BalanceResult {
    pub fn is_empty(&self) -> bool {
        self.combinations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.combinations.len()
    }

    pub fn best(&self) -> Option<&TeamCombination> {
        self.combinations.first()
    }
}

/// Samples, filters, scores and selects team combinations.
///
/// # Example
///
/// ```
/// use rosterforge_core::{ConstraintSet, Player, PlayerStats, TeamShape};
/// use rosterforge_solver::{SolverSettings, TeamBalancer};
///
/// let players: Vec<Player> = (1..=8)
///     .map(|id| {
///         let level = 1.0 + (id % 5) as f64;
///         let stats = PlayerStats::new(level, 3.0, 3.0).unwrap();
///         Player::new(id, format!("P{id}"), stats).unwrap()
///     })
///     .collect();
///
/// let balancer = TeamBalancer::new(
///     SolverSettings::new().with_random_seed(7).with_fixed_samples(2_000),
/// );
/// let constraints = ConstraintSet::new().together([1, 2]);
/// let result = balancer
///     .solve(&players, TeamShape::new(2, 4).unwrap(), &constraints)
///     .unwrap();
///
/// let best = result.best().unwrap();
/// let team = best.partition().team_of(1);
/// assert_eq!(team, best.partition().team_of(2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TeamBalancer<Sm = ShuffleSampler> {
    settings: SolverSettings,
    sampler: Sm,
}

impl TeamBalancer<ShuffleSampler> {
    pub fn new(settings: SolverSettings) -> Self {
        Self::with_sampler(settings, ShuffleSampler)
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Ok(Self::new(SolverSettings::from_config(config)?))
    }
}

impl<Sm> TeamBalancer<Sm>
where
    Sm: PartitionSampler + Clone,
{
    pub fn with_sampler(settings: SolverSettings, sampler: Sm) -> Self {
        Self { settings, sampler }
    }

    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    /// Finds up to `top_n` balanced, mutually diverse splits of `players`.
    ///
    /// `players` must fill `shape` exactly. Constraint ids naming absent
    /// players are ignored. Constraints that provably cannot be met give an
    /// empty result with [`BalanceResult::conflict`] set, not an error.
    pub fn solve(
        &self,
        players: &[Player],
        shape: TeamShape,
        constraints: &ConstraintSet,
    ) -> Result<BalanceResult> {
        let settings = &self.settings;
        settings.validate()?;
        shape.check_player_count(players.len())?;
        let selector = settings.selector(&shape)?;
        let pool = PlayerPool::new(players.to_vec())?;

        let mut stats = SolveStats::default();
        stats.start();
        let seed = settings.random_seed.unwrap_or_else(rand::random);

        let (constraints, dropped) = constraints.restricted_to(&pool);
        if !dropped.is_empty() {
            debug!(event = "unknown_ids_dropped", ids = ?dropped);
        }

        info!(
            event = "solve_start",
            players = pool.len(),
            teams = shape.teams(),
            team_size = shape.size(),
            together = constraints.together_groups().len(),
            separate = constraints.separate_groups().len(),
            pinned = constraints.pinned_player_count(),
            seed,
            max_samples = settings.sampling.max_samples(),
        );

        if let Some(conflict) = constraints.find_conflict(&shape) {
            warn!(event = "constraint_conflict", conflict = %conflict);
            stats.finish();
            return Ok(BalanceResult {
                combinations: Vec::new(),
                stats,
                conflict: Some(conflict),
                seed,
            });
        }

        let thread_pool = build_thread_pool(settings.thread_count)?;
        let round = RoundContext {
            sampler: CombinationSampler::with_sampler(
                pool.ids(),
                shape,
                self.sampler.clone(),
            )?,
            validator: ConstraintValidator::new(&constraints),
            scorer: BalanceScorer::new(settings.weights),
            pool: &pool,
        };
        let min_results = settings.min_results();

        // First draw of each distinct split; later copies can never be picked.
        let mut seen = HashSet::new();
        let mut candidates: Vec<ScoredPartition> = Vec::new();
        let mut selected_indices: Vec<usize> = Vec::new();
        for (round_index, samples) in settings.sampling.rounds().enumerate() {
            let round_seed = derive_round_seed(seed, round_index as u64);
            let first_index = stats.samples_drawn;
            let drawn = match (&thread_pool, settings.thread_count) {
                (_, ThreadCount::None) => round.draw(round_seed, samples, first_index, false),
                (Some(threads), _) => {
                    threads.install(|| round.draw(round_seed, samples, first_index, true))
                }
                (None, _) => round.draw(round_seed, samples, first_index, true),
            };
            stats.record_round(samples, drawn.len() as u64);
            let before = candidates.len();
            candidates.extend(
                drawn
                    .into_iter()
                    .filter(|c| seen.insert(c.partition.canonical_key())),
            );
            let new_splits = candidates.len() - before;

            selected_indices = selector.select_indices(&candidates);
            debug!(
                event = "sampling_round",
                round = round_index + 1,
                samples,
                samples_drawn = stats.samples_drawn,
                valid_candidates = stats.valid_candidates,
                new_splits,
                selected = selected_indices.len(),
            );
            if selected_indices.len() >= min_results {
                break;
            }
            if new_splits == 0 && !candidates.is_empty() {
                debug!(event = "splits_exhausted", round = round_index + 1);
                break;
            }
        }

        let combinations: Vec<TeamCombination> = selected_indices
            .into_iter()
            .map(|i| round.scorer.combine(candidates[i].partition.clone(), &pool))
            .collect();
        stats.finish();

        if combinations.is_empty() {
            warn!(
                event = "no_valid_combination",
                samples_drawn = stats.samples_drawn,
            );
        }
        info!(
            event = "solve_end",
            combinations = combinations.len(),
            best_score = combinations.first().map(TeamCombination::score),
            rounds = stats.rounds,
            samples_drawn = stats.samples_drawn,
            valid_candidates = stats.valid_candidates,
            elapsed_ms = stats.elapsed().as_millis() as u64,
        );

        Ok(BalanceResult {
            combinations,
            stats,
            conflict: None,
            seed,
        })
    }
}

/// Read-only state shared by every chunk of a round.
struct RoundContext<'a, Sm> {
    sampler: CombinationSampler<Sm>,
    validator: ConstraintValidator<'a>,
    scorer: BalanceScorer,
    pool: &'a PlayerPool,
}

impl<Sm: PartitionSampler> RoundContext<'_, Sm> {
    /// Draws `samples` partitions and keeps the valid ones, scored.
    fn draw(
        &self,
        seed: u64,
        samples: u64,
        first_index: u64,
        parallel: bool,
    ) -> Vec<ScoredPartition> {
        let chunks = chunk_count(samples);
        let per_chunk: Vec<Vec<ScoredPartition>> = if parallel {
            (0..chunks)
                .into_par_iter()
                .map(|chunk| self.draw_chunk(seed, samples, chunk, first_index))
                .collect()
        } else {
            (0..chunks)
                .map(|chunk| self.draw_chunk(seed, samples, chunk, first_index))
                .collect()
        };
        per_chunk.into_iter().flatten().collect()
    }

    fn draw_chunk(
        &self,
        seed: u64,
        samples: u64,
        chunk: u64,
        first_index: u64,
    ) -> Vec<ScoredPartition> {
        let mut rng = chunk_rng(seed, chunk);
        let base = first_index + chunk * CHUNK_SIZE;
        let mut valid = Vec::new();
        for offset in 0..chunk_len(samples, chunk) {
            let partition = self.sampler.sample_one(&mut rng);
            if self.validator.is_valid(&partition) {
                let balance = self.scorer.score(&partition, self.pool);
                valid.push(ScoredPartition::new(base + offset, partition, balance));
            }
        }
        valid
    }
}

fn build_thread_pool(thread_count: ThreadCount) -> Result<Option<ThreadPool>> {
    match thread_count {
        ThreadCount::Count(n) => ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .map(Some)
            .map_err(|e| RosterForgeError::Config(format!("thread pool: {e}"))),
        ThreadCount::Auto | ThreadCount::None => Ok(None),
    }
}

/// Round 0 uses `seed` itself.
fn derive_round_seed(seed: u64, round: u64) -> u64 {
    seed ^ round.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
