//! Grouping constraints and their static analysis.
//!
//! A [`ConstraintSet`] is an immutable value passed into each run. Before
//! sampling, the engine restricts it to the active pool and asks
//! [`ConstraintSet::find_conflict`] whether it is provably unsatisfiable.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use crate::player::PlayerId;
use crate::pool::PlayerPool;
use crate::shape::TeamShape;

/// Together, separate and team-pinned player groups.
///
/// Team numbers for pinned groups are 1-based.
///
/// # Examples
///
/// ```
/// use rosterforge_core::ConstraintSet;
///
/// let constraints = ConstraintSet::new()
///     .together([1, 2])
///     .separate([3, 4])
///     .pin(1, [5, 6]);
///
/// assert_eq!(constraints.together_groups().len(), 1);
/// assert_eq!(constraints.pinned_player_count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintSet {
    together: Vec<Vec<PlayerId>>,
    separate: Vec<Vec<PlayerId>>,
    pinned: BTreeMap<usize, Vec<Vec<PlayerId>>>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a group whose members must share a team.
    pub fn together(mut self, ids: impl IntoIterator<Item = PlayerId>) -> Self {
        let group = dedup(ids);
        if !group.is_empty() {
            self.together.push(group);
        }
        self
    }

    /// Adds a group of which no two members may share a team.
    pub fn separate(mut self, ids: impl IntoIterator<Item = PlayerId>) -> Self {
        let group = dedup(ids);
        if !group.is_empty() {
            self.separate.push(group);
        }
        self
    }

    /// Adds a group that must be placed on team number `team` (1-based).
    pub fn pin(mut self, team: usize, ids: impl IntoIterator<Item = PlayerId>) -> Self {
        let group = dedup(ids);
        if !group.is_empty() {
            self.pinned.entry(team).or_default().push(group);
        }
        self
    }

    pub fn together_groups(&self) -> &[Vec<PlayerId>] {
        &self.together
    }

    pub fn separate_groups(&self) -> &[Vec<PlayerId>] {
        &self.separate
    }

    /// Pinned groups as `(team number, ids)`, ordered by team number.
    pub fn pinned_groups(&self) -> impl Iterator<Item = (usize, &[PlayerId])> {
        self.pinned
            .iter()
            .flat_map(|(&team, groups)| groups.iter().map(move |g| (team, g.as_slice())))
    }

    pub fn is_empty(&self) -> bool {
        self.together.is_empty() && self.separate.is_empty() && self.pinned.is_empty()
    }

    /// Number of distinct players pinned to some team.
    pub fn pinned_player_count(&self) -> usize {
        self.pinned_groups()
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Drops ids that are not in `pool`.
    ///
    /// Together and separate groups left with fewer than two players
    /// constrain nothing and are removed. Returns the restricted set and
    /// the sorted, distinct ids that were dropped.
    pub fn restricted_to(&self, pool: &PlayerPool) -> (ConstraintSet, Vec<PlayerId>) {
        let mut dropped = BTreeSet::new();
        let mut keep = |group: &[PlayerId]| -> Vec<PlayerId> {
            group
                .iter()
                .copied()
                .filter(|&id| {
                    let present = pool.contains(id);
                    if !present {
                        dropped.insert(id);
                    }
                    present
                })
                .collect()
        };

        let together = self
            .together
            .iter()
            .map(|g| keep(g))
            .filter(|g| g.len() > 1)
            .collect();
        let separate = self
            .separate
            .iter()
            .map(|g| keep(g))
            .filter(|g| g.len() > 1)
            .collect();
        let mut pinned: BTreeMap<usize, Vec<Vec<PlayerId>>> = BTreeMap::new();
        for (&team, groups) in &self.pinned {
            for group in groups {
                let group = keep(group);
                if !group.is_empty() {
                    pinned.entry(team).or_default().push(group);
                }
            }
        }

        (
            ConstraintSet {
                together,
                separate,
                pinned,
            },
            dropped.into_iter().collect(),
        )
    }

    /// Detects constraint sets that no partition of `shape` can satisfy.
    ///
    /// Together-groups are merged transitively. The check is sound but not
    /// complete: `None` does not guarantee a valid partition exists.
    pub fn find_conflict(&self, shape: &TeamShape) -> Option<ConstraintConflict> {
        for (team, _) in self.pinned_groups() {
            if team == 0 || team > shape.teams() {
                return Some(ConstraintConflict::PinnedTeamOutOfRange {
                    team,
                    teams: shape.teams(),
                });
            }
        }

        let mut pin_of: BTreeMap<PlayerId, usize> = BTreeMap::new();
        for (team, ids) in self.pinned_groups() {
            for &id in ids {
                match pin_of.insert(id, team) {
                    Some(previous) if previous != team => {
                        return Some(ConstraintConflict::PlayerPinnedTwice {
                            player: id,
                            first_team: previous,
                            second_team: team,
                        });
                    }
                    _ => {}
                }
            }
        }

        let mut components = DisjointSet::default();
        for id in self
            .separate
            .iter()
            .flatten()
            .chain(pin_of.keys())
            .copied()
        {
            components.insert(id);
        }
        for group in &self.together {
            for pair in group.windows(2) {
                components.union(pair[0], pair[1]);
            }
            if let [only] = group.as_slice() {
                components.insert(*only);
            }
        }

        let groups = components.groups();
        let mut component_team: HashMap<PlayerId, (usize, PlayerId)> = HashMap::new();
        let mut team_load: BTreeMap<usize, usize> = BTreeMap::new();
        for (root, members) in &groups {
            if members.len() > shape.size() {
                return Some(ConstraintConflict::GroupLargerThanTeam {
                    players: members.len(),
                    size: shape.size(),
                });
            }
            let mut pinned_member: Option<(usize, PlayerId)> = None;
            for &member in members {
                let Some(&team) = pin_of.get(&member) else {
                    continue;
                };
                match pinned_member {
                    Some((other_team, other)) if other_team != team => {
                        return Some(ConstraintConflict::TogetherSplitByPins {
                            first: (other, other_team),
                            second: (member, team),
                        });
                    }
                    Some(_) => {}
                    None => pinned_member = Some((team, member)),
                }
            }
            if let Some(pinned) = pinned_member {
                component_team.insert(*root, pinned);
                *team_load.entry(pinned.0).or_default() += members.len();
            }
        }

        for (&team, &load) in &team_load {
            if load > shape.size() {
                return Some(ConstraintConflict::TeamOverfilled {
                    team,
                    required: load,
                    size: shape.size(),
                });
            }
        }

        for group in &self.separate {
            if group.len() > shape.teams() {
                return Some(ConstraintConflict::SeparateGroupTooLarge {
                    players: group.len(),
                    teams: shape.teams(),
                });
            }
            for (i, &a) in group.iter().enumerate() {
                for &b in &group[i + 1..] {
                    let (root_a, root_b) = (components.find(a), components.find(b));
                    if root_a == root_b {
                        return Some(ConstraintConflict::SeparatedButTogether { first: a, second: b });
                    }
                    if let (Some(&(team_a, _)), Some(&(team_b, _))) =
                        (component_team.get(&root_a), component_team.get(&root_b))
                    {
                        if team_a == team_b {
                            return Some(ConstraintConflict::SeparatedButPinnedTogether {
                                first: a,
                                second: b,
                                team: team_a,
                            });
                        }
                    }
                }
            }
        }

        None
    }
}

/// Why a constraint set cannot be satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintConflict {
    /// A pinned team number outside `1..=teams`.
    PinnedTeamOutOfRange { team: usize, teams: usize },
    /// One player pinned to two different teams.
    PlayerPinnedTwice {
        player: PlayerId,
        first_team: usize,
        second_team: usize,
    },
    /// Players that must be together are pinned to different teams.
    TogetherSplitByPins {
        first: (PlayerId, usize),
        second: (PlayerId, usize),
    },
    /// Merged together-groups hold more players than one team.
    GroupLargerThanTeam { players: usize, size: usize },
    /// More players pinned to a team than it can hold.
    TeamOverfilled {
        team: usize,
        required: usize,
        size: usize,
    },
    /// More players to keep apart than there are teams.
    SeparateGroupTooLarge { players: usize, teams: usize },
    /// Two players must be both apart and together.
    SeparatedButTogether { first: PlayerId, second: PlayerId },
    /// Two players must be apart but are pinned to the same team.
    SeparatedButPinnedTogether {
        first: PlayerId,
        second: PlayerId,
        team: usize,
    },
}

impl fmt::Display for ConstraintConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PinnedTeamOutOfRange { team, teams } => {
                write!(f, "team {team} is pinned but only teams 1..={teams} exist")
            }
            Self::PlayerPinnedTwice {
                player,
                first_team,
                second_team,
            } => write!(
                f,
                "player {player} is pinned to both team {first_team} and team {second_team}"
            ),
            Self::TogetherSplitByPins { first, second } => write!(
                f,
                "players {} and {} must be together but are pinned to teams {} and {}",
                first.0, second.0, first.1, second.1
            ),
            Self::GroupLargerThanTeam { players, size } => write!(
                f,
                "{players} players must be together but a team holds only {size}"
            ),
            Self::TeamOverfilled {
                team,
                required,
                size,
            } => write!(
                f,
                "team {team} needs room for {required} players but holds only {size}"
            ),
            Self::SeparateGroupTooLarge { players, teams } => write!(
                f,
                "{players} players must be kept apart across only {teams} teams"
            ),
            Self::SeparatedButTogether { first, second } => write!(
                f,
                "players {first} and {second} must be both together and apart"
            ),
            Self::SeparatedButPinnedTogether {
                first,
                second,
                team,
            } => write!(
                f,
                "players {first} and {second} must be apart but are both pinned to team {team}"
            ),
        }
    }
}

fn dedup(ids: impl IntoIterator<Item = PlayerId>) -> Vec<PlayerId> {
    let mut seen = BTreeSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Union-find over player ids.
#[derive(Debug, Default)]
struct DisjointSet {
    parent: HashMap<PlayerId, PlayerId>,
}

impl DisjointSet {
    fn insert(&mut self, id: PlayerId) {
        self.parent.entry(id).or_insert(id);
    }

    fn find(&mut self, id: PlayerId) -> PlayerId {
        self.insert(id);
        let mut root = id;
        while self.parent[&root] != root {
            root = self.parent[&root];
        }
        let mut current = id;
        while current != root {
            let next = self.parent[&current];
            self.parent.insert(current, root);
            current = next;
        }
        root
    }

    fn union(&mut self, a: PlayerId, b: PlayerId) {
        let (root_a, root_b) = (self.find(a), self.find(b));
        if root_a != root_b {
            // Smaller id becomes the root so grouping is order-independent.
            let (keep, merge) = if root_a < root_b {
                (root_a, root_b)
            } else {
                (root_b, root_a)
            };
            self.parent.insert(merge, keep);
        }
    }

    /// Root id to sorted member ids.
    fn groups(&mut self) -> BTreeMap<PlayerId, Vec<PlayerId>> {
        let ids: Vec<PlayerId> = self.parent.keys().copied().collect();
        let mut groups: BTreeMap<PlayerId, Vec<PlayerId>> = BTreeMap::new();
        for id in ids {
            let root = self.find(id);
            groups.entry(root).or_default().push(id);
        }
        for members in groups.values_mut() {
            members.sort_unstable();
        }
        groups
    }
}
