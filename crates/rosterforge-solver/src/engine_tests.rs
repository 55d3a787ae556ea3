//! End-to-end tests for the balancing engine.

use rosterforge_config::{EngineConfig, ThreadCount};
use rosterforge_core::{
    ConstraintConflict, ConstraintSet, Partition, Player, PlayerId, RosterForgeError, TeamShape,
};
use rosterforge_scoring::BalanceScorer;
use rosterforge_test::players::{
    ladder_players, player, players_from_levels, pool_of, uniform_players,
};

use crate::{overlap, SamplingStrategy, SolverSettings, TeamBalancer};

fn shape(teams: usize, size: usize) -> TeamShape {
    TeamShape::new(teams, size).unwrap()
}

fn seeded() -> SolverSettings {
    SolverSettings::new().with_random_seed(42)
}

#[test]
fn test_identical_players_all_score_zero() {
    let players = uniform_players(12, 3.0);
    let result = TeamBalancer::new(seeded())
        .solve(&players, shape(2, 6), &ConstraintSet::new())
        .unwrap();

    assert_eq!(result.len(), 3);
    assert!(result.combinations.iter().all(|c| c.score() == 0.0));
    assert_eq!(result.stats.rounds, 1);
    for (i, a) in result.combinations.iter().enumerate() {
        for b in &result.combinations[i + 1..] {
            assert!(overlap(a.partition(), b.partition()) <= 3);
        }
    }
}

#[test]
fn test_single_valid_split_found() {
    let players = vec![
        player(1, 4.0, 3.0, 2.0),
        player(2, 2.0, 3.0, 4.0),
        player(3, 3.0, 3.0, 3.0),
        player(4, 1.0, 2.0, 5.0),
    ];
    let constraints = ConstraintSet::new().together([1, 2]);
    let result = TeamBalancer::new(seeded().with_fixed_samples(500))
        .solve(&players, shape(2, 2), &constraints)
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(
        result.combinations[0].partition().canonical_key(),
        vec![vec![1, 2], vec![3, 4]]
    );
}

#[test]
fn test_detected_conflict_returns_empty() {
    let players = uniform_players(4, 3.0);
    let constraints = ConstraintSet::new().pin(1, [1, 2]).separate([1, 2]);
    let result = TeamBalancer::new(seeded())
        .solve(&players, shape(2, 2), &constraints)
        .unwrap();

    assert!(result.is_empty());
    assert!(matches!(
        result.conflict,
        Some(ConstraintConflict::SeparatedButPinnedTogether { .. })
    ));
    assert_eq!(result.stats.samples_drawn, 0);
}

#[test]
fn test_unsatisfiable_constraints_exhaust_budget() {
    // Three mutually separated players cannot fit into two teams.
    let players = uniform_players(4, 3.0);
    let constraints = ConstraintSet::new()
        .separate([1, 2])
        .separate([1, 3])
        .separate([2, 3]);
    let result = TeamBalancer::new(seeded().with_fixed_samples(2_000))
        .solve(&players, shape(2, 2), &constraints)
        .unwrap();

    assert!(result.is_empty());
    assert!(result.conflict.is_none());
    assert_eq!(result.stats.samples_drawn, 2_000);
    assert_eq!(result.stats.valid_candidates, 0);
}

#[test]
fn test_adaptive_rounds_until_cap() {
    let players = uniform_players(4, 3.0);
    let constraints = ConstraintSet::new()
        .separate([1, 2])
        .separate([1, 3])
        .separate([2, 3]);
    let settings = seeded().with_sampling(SamplingStrategy::Adaptive {
        initial: 10,
        growth_factor: 2,
        max: 100,
        min_results: None,
    });
    let result = TeamBalancer::new(settings)
        .solve(&players, shape(2, 2), &constraints)
        .unwrap();

    // 10 + 20 + 40 + 30
    assert_eq!(result.stats.rounds, 4);
    assert_eq!(result.stats.samples_drawn, 100);
}

#[test]
fn test_adaptive_stops_once_satisfied() {
    let players = uniform_players(12, 2.0);
    let settings = seeded().with_sampling(SamplingStrategy::Adaptive {
        initial: 500,
        growth_factor: 10,
        max: 100_000,
        min_results: Some(1),
    });
    let result = TeamBalancer::new(settings)
        .solve(&players, shape(3, 4), &ConstraintSet::new())
        .unwrap();

    assert_eq!(result.stats.rounds, 1);
    assert_eq!(result.stats.samples_drawn, 500);
    assert!(!result.is_empty());
}

#[test]
fn test_odd_team_size_returns_top_n() {
    let players = ladder_players(10);
    let result = TeamBalancer::new(seeded())
        .solve(&players, shape(2, 5), &ConstraintSet::new())
        .unwrap();

    assert_eq!(result.len(), 3);
    assert_eq!(result.stats.rounds, 1);
    assert_eq!(result.stats.samples_drawn, 10_000);
    for (i, a) in result.combinations.iter().enumerate() {
        for b in &result.combinations[i + 1..] {
            assert!(overlap(a.partition(), b.partition()) <= 3);
        }
    }
}

#[test]
fn test_unreachable_threshold_rejected() {
    let players = uniform_players(12, 3.0);
    let err = TeamBalancer::new(seeded().with_diversity_threshold(1.5))
        .solve(&players, shape(2, 6), &ConstraintSet::new())
        .unwrap_err();
    assert!(matches!(err, RosterForgeError::Config(_)));

    // a single result needs no diversity
    let result = TeamBalancer::new(seeded().with_diversity_threshold(1.5).with_top_n(1))
        .solve(&players, shape(2, 6), &ConstraintSet::new())
        .unwrap();
    assert_eq!(result.len(), 1);
}

#[test]
fn test_adaptive_stops_when_no_new_splits() {
    // Only [1,3|2,4] and [1,4|2,3] keep 1 and 2 apart.
    let players = players_from_levels(&[4.0, 1.0, 3.0, 2.0]);
    let constraints = ConstraintSet::new().separate([1, 2]);
    let result = TeamBalancer::new(seeded())
        .solve(&players, shape(2, 2), &constraints)
        .unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result.stats.rounds, 2);
    assert_eq!(result.stats.samples_drawn, 110_000);
    let best = result.best().unwrap();
    assert_eq!(best.partition().canonical_key(), vec![vec![1, 4], vec![2, 3]]);
    assert_eq!(best.score(), 2.0);
}

#[test]
fn test_wrong_player_count_is_error() {
    let players = uniform_players(11, 3.0);
    let err = TeamBalancer::new(seeded())
        .solve(&players, shape(2, 6), &ConstraintSet::new())
        .unwrap_err();
    assert_eq!(
        err,
        RosterForgeError::InvalidShape {
            expected: 12,
            actual: 11
        }
    );
}

#[test]
fn test_duplicate_player_is_error() {
    let players = vec![
        player(1, 3.0, 3.0, 3.0),
        player(2, 3.0, 3.0, 3.0),
        player(2, 4.0, 3.0, 3.0),
        player(3, 3.0, 3.0, 3.0),
    ];
    let err = TeamBalancer::new(seeded())
        .solve(&players, shape(2, 2), &ConstraintSet::new())
        .unwrap_err();
    assert_eq!(err, RosterForgeError::DuplicatePlayerId(2));
}

#[test]
fn test_invalid_settings_rejected() {
    let players = uniform_players(4, 3.0);
    let balancer = TeamBalancer::new(seeded().with_top_n(0));
    let err = balancer
        .solve(&players, shape(2, 2), &ConstraintSet::new())
        .unwrap_err();
    assert!(matches!(err, RosterForgeError::Config(_)));
}

#[test]
fn test_same_seed_any_thread_count() {
    let players = ladder_players(12);
    let constraints = ConstraintSet::new().together([1, 12]).separate([2, 11]);
    let run = |threads: ThreadCount| {
        TeamBalancer::new(
            seeded()
                .with_fixed_samples(20_000)
                .with_thread_count(threads),
        )
        .solve(&players, shape(3, 4), &constraints)
        .unwrap()
    };

    let sequential = run(ThreadCount::None);
    assert!(!sequential.is_empty());
    assert_eq!(sequential.combinations, run(ThreadCount::Count(3)).combinations);
    assert_eq!(sequential.combinations, run(ThreadCount::Auto).combinations);
    assert_eq!(sequential.seed, 42);
}

#[test]
fn test_results_sorted_and_constrained() {
    let players = ladder_players(12);
    let constraints = ConstraintSet::new()
        .together([3, 4])
        .separate([1, 2, 5])
        .pin(1, [12])
        .pin(3, [6]);
    let result = TeamBalancer::new(seeded())
        .solve(&players, shape(3, 4), &constraints)
        .unwrap();

    assert!(!result.is_empty());
    let scores: Vec<f64> = result.combinations.iter().map(|c| c.score()).collect();
    assert!(scores.windows(2).all(|w| w[0] <= w[1]));
    for combination in &result.combinations {
        let partition = combination.partition();
        assert_eq!(partition.team_of(3), partition.team_of(4));
        assert_eq!(partition.team_of(12), Some(0));
        assert_eq!(partition.team_of(6), Some(2));
        let separated = [1, 2, 5].map(|id| partition.team_of(id));
        assert_ne!(separated[0], separated[1]);
        assert_ne!(separated[0], separated[2]);
        assert_ne!(separated[1], separated[2]);
    }
}

#[test]
fn test_unknown_constraint_ids_ignored() {
    let players = uniform_players(4, 3.0);
    let constraints = ConstraintSet::new().together([1, 99]).pin(2, [77]);
    let result = TeamBalancer::new(seeded().with_fixed_samples(200))
        .solve(&players, shape(2, 2), &constraints)
        .unwrap();

    assert!(result.conflict.is_none());
    assert_eq!(result.stats.valid_candidates, 200);
    assert!(!result.is_empty());
}

#[test]
fn test_best_matches_exhaustive_minimum() {
    let players = ladder_players(6);
    let pool = pool_of(players.clone());
    let scorer = BalanceScorer::default();

    // Every 3v3 split, with player 1 fixed on the first team.
    let mut best = f64::INFINITY;
    for a in 2..=6 {
        for b in a + 1..=6 {
            let first: Vec<PlayerId> = vec![1, a, b];
            let second: Vec<PlayerId> = (2..=6).filter(|id| *id != a && *id != b).collect();
            let score = scorer.score(&Partition::new(vec![first, second]), &pool).score;
            best = best.min(score);
        }
    }

    let result = TeamBalancer::new(seeded().with_fixed_samples(2_000))
        .solve(&players, shape(2, 3), &ConstraintSet::new())
        .unwrap();
    let found = result.best().unwrap().score();
    assert!((found - best).abs() < 1e-9, "found {found}, best {best}");
}

#[test]
fn test_from_config() {
    let config = EngineConfig::new()
        .with_random_seed(5)
        .with_top_n(2)
        .with_fixed_samples(1_000);
    let balancer = TeamBalancer::from_config(&config).unwrap();
    assert_eq!(balancer.settings().top_n, 2);
    assert_eq!(balancer.settings().random_seed, Some(5));
    assert_eq!(balancer.settings().sampling, SamplingStrategy::fixed(1_000));

    let players: Vec<Player> = ladder_players(8);
    let result = balancer
        .solve(&players, shape(2, 4), &ConstraintSet::new())
        .unwrap();
    assert!(result.len() <= 2);
    assert_eq!(result.stats.samples_drawn, 1_000);

    let bad = EngineConfig::new().with_top_n(0);
    assert!(matches!(
        TeamBalancer::from_config(&bad),
        Err(RosterForgeError::Config(_))
    ));
}
