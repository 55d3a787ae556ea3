//! One-call entry points that hide the engine wiring.

use std::io::ErrorKind;
use std::path::Path;

use rosterforge_config::{ConfigError, EngineConfig};
use rosterforge_core::{ConstraintSet, Player, Result, RosterForgeError, TeamShape};
use rosterforge_solver::{BalanceResult, TeamBalancer};

/// Configuration file read by [`balance`].
pub const CONFIG_FILE: &str = "rosterforge.toml";

/// Balances `players` with settings from [`CONFIG_FILE`], or defaults when
/// the file does not exist.
pub fn balance(
    players: &[Player],
    shape: TeamShape,
    constraints: &ConstraintSet,
) -> Result<BalanceResult> {
    let config = load_or_default(CONFIG_FILE)?;
    balance_with_config(players, shape, constraints, &config)
}

/// Balances `players` with an explicit configuration.
pub fn balance_with_config(
    players: &[Player],
    shape: TeamShape,
    constraints: &ConstraintSet,
    config: &EngineConfig,
) -> Result<BalanceResult> {
    #[cfg(feature = "console")]
    rosterforge_console::init();

    TeamBalancer::from_config(config)?.solve(players, shape, constraints)
}

/// Balances `players` using the team shape and constraints stored in
/// `config`.
///
/// Fails with a config error when `config` has no `team_shape`.
pub fn balance_from_config(players: &[Player], config: &EngineConfig) -> Result<BalanceResult> {
    let shape = config
        .team_shape
        .as_ref()
        .ok_or_else(|| RosterForgeError::Config("team_shape is not configured".into()))?
        .to_shape()?;
    let constraints = config.constraint_set()?;
    balance_with_config(players, shape, &constraints, config)
}

fn load_or_default(path: impl AsRef<Path>) -> Result<EngineConfig> {
    match EngineConfig::load(path) {
        Ok(config) => Ok(config),
        Err(ConfigError::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(EngineConfig::default()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosterforge_test::players::{ladder_players, uniform_players};

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = load_or_default("/nonexistent/rosterforge.toml").unwrap();
        assert_eq!(config.top_n, rosterforge_config::DEFAULT_TOP_N);
    }

    #[test]
    fn test_balance_from_config() {
        let config = EngineConfig::from_toml_str(
            r#"
            random_seed = 9
            top_n = 2

            [sampling]
            type = "fixed"
            n_samples = 5000

            [team_shape]
            teams = 2
            size = 4

            [constraints]
            together = [[1, 8]]

            [constraints.pinned]
            "2" = [4]
        "#,
        )
        .unwrap();

        let result = balance_from_config(&ladder_players(8), &config).unwrap();
        assert!(!result.is_empty());
        assert!(result.len() <= 2);
        for combination in &result.combinations {
            let partition = combination.partition();
            assert_eq!(partition.team_of(1), partition.team_of(8));
            assert_eq!(partition.team_of(4), Some(1));
        }
    }

    #[test]
    fn test_balance_from_config_needs_shape() {
        let err = balance_from_config(&uniform_players(4, 3.0), &EngineConfig::new()).unwrap_err();
        assert!(matches!(err, RosterForgeError::Config(_)));
    }
}
