// Per-stat weights applied by the balance scorer.

use rosterforge_core::{Result, RosterForgeError, Stat};

// Multipliers for each stat's contribution to the balance score.
//
// A zero weight removes the stat from scoring entirely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatWeights {
    level: f64,
    stamina: f64,
    speed: f64,
}

impl Default for StatWeights {
    fn default() -> Self {
        Self {
            level: 1.0,
            stamina: 1.0,
            speed: 1.0,
        }
    }
}

impl StatWeights {
    // Creates weights, rejecting negative or non-finite values.
    pub fn new(level: f64, stamina: f64, speed: f64) -> Result<Self> {
        for (stat, weight) in [
            (Stat::Level, level),
            (Stat::Stamina, stamina),
            (Stat::Speed, speed),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(RosterForgeError::Config(format!(
                    "weight for {stat} must be a non-negative number, got {weight}"
                )));
            }
        }
        Ok(Self {
            level,
            stamina,
            speed,
        })
    }

    // Weights that score only the level stat.
    pub fn level_only() -> Self {
        Self {
            level: 1.0,
            stamina: 0.0,
            speed: 0.0,
        }
    }

    #[inline]
    pub fn get(&self, stat: Stat) -> f64 {
        match stat {
            Stat::Level => self.level,
            Stat::Stamina => self.stamina,
            Stat::Speed => self.speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_are_unit() {
        let weights = StatWeights::default();
        assert!(Stat::ALL.iter().all(|&s| weights.get(s) == 1.0));
    }

    #[test]
    fn test_invalid_weights() {
        assert!(StatWeights::new(-0.1, 1.0, 1.0).is_err());
        assert!(StatWeights::new(1.0, f64::INFINITY, 1.0).is_err());
        assert!(StatWeights::new(0.0, 0.0, 2.5).is_ok());
    }
}
