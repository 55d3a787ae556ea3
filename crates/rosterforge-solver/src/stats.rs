//! Solve statistics.

use std::time::{Duration, Instant};

/// Counters for one solve run.
///
/// # Example
///
/// ```
/// use rosterforge_solver::stats::SolveStats;
///
/// let mut stats = SolveStats::default();
/// stats.start();
/// stats.record_round(10_000, 250);
/// stats.record_round(100_000, 2_600);
/// stats.finish();
///
/// assert_eq!(stats.rounds, 2);
/// assert_eq!(stats.samples_drawn, 110_000);
/// assert_eq!(stats.valid_candidates, 2_850);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SolveStats {
    start_time: Option<Instant>,
    elapsed: Option<Duration>,
    /// Sampling rounds run.
    pub rounds: u32,
    /// Partitions drawn across all rounds.
    pub samples_drawn: u64,
    /// Drawn partitions that passed every constraint.
    pub valid_candidates: u64,
}

impl SolveStats {
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
        self.elapsed = None;
    }

    /// Freezes the elapsed time.
    pub fn finish(&mut self) {
        self.elapsed = Some(self.elapsed());
    }

    pub fn elapsed(&self) -> Duration {
        match (self.elapsed, self.start_time) {
            (Some(frozen), _) => frozen,
            (None, Some(start)) => start.elapsed(),
            (None, None) => Duration::ZERO,
        }
    }

    pub fn record_round(&mut self, samples: u64, valid: u64) {
        self.rounds += 1;
        self.samples_drawn += samples;
        self.valid_candidates += valid;
    }

    /// Share of drawn partitions that were valid.
    pub fn validity_rate(&self) -> f64 {
        if self.samples_drawn == 0 {
            0.0
        } else {
            self.valid_candidates as f64 / self.samples_drawn as f64
        }
    }

    pub fn samples_per_second(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.samples_drawn as f64 / secs
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_rate() {
        let mut stats = SolveStats::default();
        assert_eq!(stats.validity_rate(), 0.0);
        stats.record_round(200, 50);
        assert_eq!(stats.validity_rate(), 0.25);
    }

    #[test]
    fn test_finish_freezes_elapsed() {
        let mut stats = SolveStats::default();
        assert_eq!(stats.elapsed(), Duration::ZERO);
        stats.start();
        stats.finish();
        let frozen = stats.elapsed();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(stats.elapsed(), frozen);
    }
}
