use stepforge_config::{
    AcceptorConfig, ForagerConfig, LocalSearchConfig, MoveThreadCount, PhaseConfig, SolverConfig,
    TerminationConfig,
};
use stepforge_core::{SimpleScore, StepforgeError};
use stepforge_test::nqueens::NQueensSolution;

use super::*;
use crate::heuristic::selector::SelectionHooks;
use crate::test_utils::{create_nqueens_director, queen_selectors, NQueensDirector, QueenMove};

type QueenFactory = SolverFactory<NQueensSolution, NQueensDirector, QueenMove>;

fn factory(config: SolverConfig) -> QueenFactory {
    SolverFactory::new(config, SelectionHooks::new(), queen_selectors(None))
}

fn hill_climbing_config() -> SolverConfig {
    SolverConfig::new()
        .with_random_seed(7)
        .with_phase(PhaseConfig::LocalSearch(LocalSearchConfig {
            acceptor: Some(AcceptorConfig::HillClimbing),
            ..LocalSearchConfig::default()
        }))
}

#[test]
fn test_default_config_builds_one_local_search_phase() {
    let solver = factory(SolverConfig::new().with_random_seed(0))
        .build_solver()
        .unwrap();
    assert_eq!(solver.phase_count(), 1);
}

#[test]
fn test_hill_climbing_solve_improves_and_stops_at_local_optimum() {
    let mut solver = factory(hill_climbing_config()).build_solver().unwrap();
    let result = solver.solve(create_nqueens_director(&[0, 0, 0, 0])).unwrap();

    assert!(result.score > SimpleScore::of(-6));
    assert!(result.step_count > 0);
    assert_eq!(result.solution.score(), Some(result.score));
}

#[test]
fn test_solver_step_limit_is_respected() {
    let config = SolverConfig::new()
        .with_random_seed(3)
        .with_termination(TerminationConfig {
            step_count_limit: Some(5),
            move_count_limit: Some(5_000),
            ..TerminationConfig::default()
        });
    let mut solver = factory(config).build_solver().unwrap();
    let result = solver
        .solve(create_nqueens_director(&[0, 0, 0, 0, 0, 0]))
        .unwrap();

    assert!(result.step_count <= 5);
}

#[test]
fn test_same_seed_gives_same_solution() {
    let config = SolverConfig::new()
        .with_random_seed(11)
        .with_termination(TerminationConfig {
            step_count_limit: Some(30),
            move_count_limit: Some(5_000),
            ..TerminationConfig::default()
        });
    let solve = || {
        let mut solver = factory(config.clone()).build_solver().unwrap();
        solver
            .solve(create_nqueens_director(&[0, 0, 0, 0, 0, 0]))
            .unwrap()
    };

    let first = solve();
    let second = solve();
    assert_eq!(first.solution.rows(), second.solution.rows());
    assert_eq!(first.score, second.score);
    assert_eq!(first.move_evaluation_count, second.move_evaluation_count);
}

#[test]
fn test_move_thread_config_is_validated() {
    let err = factory(hill_climbing_config().with_move_thread_count(MoveThreadCount::Count(0)))
        .build_solver()
        .unwrap_err();
    assert!(matches!(err, StepforgeError::Config(_)));

    let err = factory(
        hill_climbing_config()
            .with_move_thread_count(MoveThreadCount::Count(4))
            .with_move_thread_buffer_size(2),
    )
    .build_solver()
    .unwrap_err();
    assert!(matches!(err, StepforgeError::Config(_)));
}

#[test]
fn test_zero_accepted_count_limit_is_rejected() {
    let config = SolverConfig::new().with_phase(PhaseConfig::LocalSearch(LocalSearchConfig {
        forager: Some(ForagerConfig {
            accepted_count_limit: Some(0),
            ..ForagerConfig::default()
        }),
        ..LocalSearchConfig::default()
    }));
    let err = factory(config).build_solver().unwrap_err();
    assert!(matches!(err, StepforgeError::Config(_)));
}

#[test]
fn test_invalid_best_score_limit_is_rejected() {
    let config = TerminationConfig {
        best_score_limit: Some("zero".to_string()),
        ..TerminationConfig::default()
    };
    let err = build_termination::<NQueensSolution, NQueensDirector>(&config).unwrap_err();
    assert!(matches!(err, StepforgeError::Config(_)));
}

#[test]
fn test_build_termination_combines_limits() {
    let empty = build_termination::<NQueensSolution, NQueensDirector>(&TerminationConfig::default())
        .unwrap();
    assert!(empty.is_none());

    let config = TerminationConfig {
        step_count_limit: Some(10),
        best_score_limit: Some("0".to_string()),
        ..TerminationConfig::default()
    };
    let termination = build_termination::<NQueensSolution, NQueensDirector>(&config)
        .unwrap()
        .unwrap();
    assert!(format!("{:?}", termination).contains("OrTermination"));
}
