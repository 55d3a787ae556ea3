//! Sample budgets.

use rosterforge_config::{
    SamplingConfig, DEFAULT_GROWTH_FACTOR, DEFAULT_INITIAL_SAMPLES, DEFAULT_MAX_SAMPLES,
};
use rosterforge_core::{Result, RosterForgeError};

/// How many partitions to draw, and when to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingStrategy {
    /// One round of exactly `samples` draws.
    Fixed { samples: u64 },

    /// Rounds of `initial`, `initial * growth_factor`, ... draws until
    /// `min_results` combinations are selected or `max` draws are spent.
    ///
    /// `min_results` defaults to `top_n`.
    Adaptive {
        initial: u64,
        growth_factor: u64,
        max: u64,
        min_results: Option<usize>,
    },
}

impl Default for SamplingStrategy {
    fn default() -> Self {
        SamplingStrategy::Adaptive {
            initial: DEFAULT_INITIAL_SAMPLES,
            growth_factor: DEFAULT_GROWTH_FACTOR,
            max: DEFAULT_MAX_SAMPLES,
            min_results: None,
        }
    }
}

impl SamplingStrategy {
    pub fn fixed(samples: u64) -> Self {
        SamplingStrategy::Fixed { samples }
    }

    /// Total draws this strategy may spend.
    pub fn max_samples(&self) -> u64 {
        match *self {
            SamplingStrategy::Fixed { samples } => samples,
            SamplingStrategy::Adaptive { max, .. } => max,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(RosterForgeError::Config(msg)) };
        match *self {
            SamplingStrategy::Fixed { samples: 0 } => {
                invalid("n_samples must be at least 1".into())
            }
            SamplingStrategy::Fixed { .. } => Ok(()),
            SamplingStrategy::Adaptive {
                initial,
                growth_factor,
                max,
                min_results,
            } => {
                if initial == 0 {
                    invalid("initial_samples must be at least 1".into())
                } else if growth_factor < 2 {
                    invalid(format!("growth_factor must be at least 2, got {growth_factor}"))
                } else if max < initial {
                    invalid(format!(
                        "max_samples ({max}) is below initial_samples ({initial})"
                    ))
                } else if min_results == Some(0) {
                    invalid("min_results must be at least 1".into())
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Round sizes, in order. Never exceeds [`Self::max_samples`] in total.
    pub(crate) fn rounds(&self) -> RoundSizes {
        match *self {
            SamplingStrategy::Fixed { samples } => RoundSizes {
                next: samples,
                growth_factor: 1,
                remaining: samples,
            },
            SamplingStrategy::Adaptive {
                initial,
                growth_factor,
                max,
                ..
            } => RoundSizes {
                next: initial,
                growth_factor,
                remaining: max,
            },
        }
    }
}

impl From<&SamplingConfig> for SamplingStrategy {
    fn from(config: &SamplingConfig) -> Self {
        match config {
            SamplingConfig::Fixed(fixed) => SamplingStrategy::fixed(fixed.n_samples),
            SamplingConfig::Adaptive(adaptive) => SamplingStrategy::Adaptive {
                initial: adaptive.initial_samples(),
                growth_factor: adaptive.growth_factor(),
                max: adaptive.max_samples(),
                min_results: adaptive.min_results,
            },
        }
    }
}

/// Iterator over round sizes.
#[derive(Debug, Clone)]
pub(crate) struct RoundSizes {
    next: u64,
    growth_factor: u64,
    remaining: u64,
}

impl Iterator for RoundSizes {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let size = self.next.min(self.remaining);
        if size == 0 {
            return None;
        }
        self.remaining -= size;
        self.next = if self.growth_factor > 1 {
            self.next.saturating_mul(self.growth_factor)
        } else {
            0
        };
        Some(size)
    }
}
