//! Hard-constraint checks for sampled partitions.

use rosterforge_core::{ConstraintSet, Partition, PlayerId};

/// Checks partitions against a [`ConstraintSet`].
///
/// Ids that do not appear in the partition are ignored, so a constraint
/// naming absent players never rejects anything.
///
/// # Example
///
/// ```
/// use rosterforge_core::{ConstraintSet, Partition};
/// use rosterforge_solver::ConstraintValidator;
///
/// let constraints = ConstraintSet::new().together([1, 2]).pin(2, [3]);
/// let validator = ConstraintValidator::new(&constraints);
///
/// assert!(validator.is_valid(&Partition::new(vec![vec![1, 2], vec![3, 4]])));
/// assert!(!validator.is_valid(&Partition::new(vec![vec![1, 3], vec![2, 4]])));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ConstraintValidator<'a> {
    constraints: &'a ConstraintSet,
}

impl<'a> ConstraintValidator<'a> {
    pub fn new(constraints: &'a ConstraintSet) -> Self {
        Self { constraints }
    }

    pub fn constraints(&self) -> &'a ConstraintSet {
        self.constraints
    }

    /// True when every together, separate and pinned group holds.
    pub fn is_valid(&self, partition: &Partition) -> bool {
        if self.constraints.is_empty() {
            return true;
        }
        self.pinned_hold(partition)
            && self.together_holds(partition)
            && self.separate_holds(partition)
    }

    fn pinned_hold(&self, partition: &Partition) -> bool {
        self.constraints.pinned_groups().all(|(team, ids)| {
            // Team numbers are 1-based; 0 never matches.
            let Some(index) = team.checked_sub(1) else {
                return !ids.iter().any(|&id| partition.team_of(id).is_some());
            };
            ids.iter()
                .filter_map(|&id| partition.team_of(id))
                .all(|t| t == index)
        })
    }

    fn together_holds(&self, partition: &Partition) -> bool {
        self.constraints.together_groups().iter().all(|group| {
            let mut teams = present_teams(partition, group);
            match teams.next() {
                Some(first) => teams.all(|t| t == first),
                None => true,
            }
        })
    }

    fn separate_holds(&self, partition: &Partition) -> bool {
        let mut used = vec![false; partition.team_count()];
        self.constraints.separate_groups().iter().all(|group| {
            used.iter_mut().for_each(|u| *u = false);
            present_teams(partition, group).all(|t| !std::mem::replace(&mut used[t], true))
        })
    }
}

fn present_teams<'p>(
    partition: &'p Partition,
    group: &'p [PlayerId],
) -> impl Iterator<Item = usize> + 'p {
    group.iter().filter_map(|&id| partition.team_of(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(teams: &[&[PlayerId]]) -> Partition {
        Partition::new(teams.iter().map(|t| t.to_vec()).collect())
    }

    #[test]
    fn test_empty_constraints_accept_everything() {
        let constraints = ConstraintSet::new();
        let validator = ConstraintValidator::new(&constraints);
        assert!(validator.is_valid(&split(&[&[1, 2], &[3, 4]])));
    }

    #[test]
    fn test_together() {
        let constraints = ConstraintSet::new().together([1, 2, 3]);
        let validator = ConstraintValidator::new(&constraints);
        assert!(validator.is_valid(&split(&[&[1, 2, 3], &[4, 5, 6]])));
        assert!(!validator.is_valid(&split(&[&[1, 2, 4], &[3, 5, 6]])));
    }

    #[test]
    fn test_separate() {
        let constraints = ConstraintSet::new().separate([1, 2]);
        let validator = ConstraintValidator::new(&constraints);
        assert!(validator.is_valid(&split(&[&[1, 3], &[2, 4]])));
        assert!(!validator.is_valid(&split(&[&[1, 2], &[3, 4]])));
    }

    #[test]
    fn test_separate_across_three_teams() {
        let constraints = ConstraintSet::new().separate([1, 2, 3]);
        let validator = ConstraintValidator::new(&constraints);
        assert!(validator.is_valid(&split(&[&[1, 4], &[2, 5], &[3, 6]])));
        assert!(!validator.is_valid(&split(&[&[1, 4], &[2, 3], &[5, 6]])));
    }

    #[test]
    fn test_pinned_team_is_one_based() {
        let constraints = ConstraintSet::new().pin(1, [1, 2]).pin(2, [3]);
        let validator = ConstraintValidator::new(&constraints);
        assert!(validator.is_valid(&split(&[&[1, 2], &[3, 4]])));
        assert!(!validator.is_valid(&split(&[&[3, 4], &[1, 2]])));
    }

    #[test]
    fn test_pin_to_missing_team_fails() {
        let constraints = ConstraintSet::new().pin(3, [1]);
        let validator = ConstraintValidator::new(&constraints);
        assert!(!validator.is_valid(&split(&[&[1, 2], &[3, 4]])));
    }

    #[test]
    fn test_absent_ids_are_ignored() {
        let constraints = ConstraintSet::new()
            .together([1, 99])
            .separate([2, 98])
            .pin(2, [97]);
        let validator = ConstraintValidator::new(&constraints);
        assert!(validator.is_valid(&split(&[&[1, 2], &[3, 4]])));
    }

    #[test]
    fn test_all_kinds_combined() {
        let constraints = ConstraintSet::new()
            .together([1, 2])
            .separate([1, 3])
            .pin(2, [4]);
        let validator = ConstraintValidator::new(&constraints);
        assert!(validator.is_valid(&split(&[&[1, 2, 5], &[3, 4, 6]])));
        // 4 on the wrong team
        assert!(!validator.is_valid(&split(&[&[1, 2, 4], &[3, 5, 6]])));
    }
}
