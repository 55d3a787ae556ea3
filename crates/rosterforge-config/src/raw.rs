//! Loose constraint input and its normalization into [`ConstraintSet`].
//!
//! UI layers hand constraints over as nested lists and string-keyed maps.
//! Everything is checked here so the engine only ever sees a typed set.

use std::collections::BTreeMap;

use rosterforge_core::{ConstraintSet, PlayerId};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Grouping constraints as they arrive from outside.
///
/// # Examples
///
/// ```
/// use rosterforge_config::RawConstraints;
///
/// let raw: RawConstraints = toml::from_str(r#"
///     together = [[1, 2]]
///     separate = [[3, 4]]
///
///     [pinned]
///     "1" = [5, 6]
///     "2" = [[7], [8, 9]]
/// "#).unwrap();
///
/// let constraints = raw.normalize(Some(2)).unwrap();
/// assert_eq!(constraints.pinned_player_count(), 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RawConstraints {
    #[serde(default)]
    pub together: Vec<Vec<i64>>,

    #[serde(default)]
    pub separate: Vec<Vec<i64>>,

    #[serde(default)]
    pub pinned: BTreeMap<RawTeamKey, RawIdGroups>,
}

/// A team number key, written either as a number or as a string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawTeamKey {
    Number(i64),
    Text(String),
}

/// One group of ids, or a list of groups.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawIdGroups {
    Flat(Vec<i64>),
    Nested(Vec<Vec<i64>>),
}

impl RawConstraints {
    /// Validates and converts into a [`ConstraintSet`].
    ///
    /// `teams`, when known, bounds the pinned team numbers.
    pub fn normalize(&self, teams: Option<usize>) -> Result<ConstraintSet, ConfigError> {
        let mut set = ConstraintSet::new();
        for group in &self.together {
            set = set.together(player_ids(group)?);
        }
        for group in &self.separate {
            set = set.separate(player_ids(group)?);
        }
        for (key, groups) in &self.pinned {
            let team = team_number(key, teams)?;
            match groups {
                RawIdGroups::Flat(ids) => set = set.pin(team, player_ids(ids)?),
                RawIdGroups::Nested(nested) => {
                    for ids in nested {
                        set = set.pin(team, player_ids(ids)?);
                    }
                }
            }
        }
        Ok(set)
    }
}

fn player_ids(group: &[i64]) -> Result<Vec<PlayerId>, ConfigError> {
    group
        .iter()
        .map(|&id| {
            PlayerId::try_from(id)
                .map_err(|_| ConfigError::Invalid(format!("{id} is not a valid player id")))
        })
        .collect()
}

fn team_number(key: &RawTeamKey, teams: Option<usize>) -> Result<usize, ConfigError> {
    let team = match key {
        RawTeamKey::Number(n) => usize::try_from(*n).ok(),
        RawTeamKey::Text(s) => s.trim().parse::<usize>().ok(),
    }
    .filter(|&t| t >= 1)
    .ok_or_else(|| ConfigError::Invalid(format!("pinned team key {key:?} is not a team number")))?;

    match teams {
        Some(teams) if team > teams => Err(ConfigError::Invalid(format!(
            "pinned team {team} exceeds the {teams} configured teams"
        ))),
        _ => Ok(team),
    }
}
