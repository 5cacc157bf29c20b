//! Solves driven by TOML and YAML configuration.

mod common;

use common::{queen_director, queen_selectors, QueenDirector, QueenMove};
use stepforge_config::SolverConfig;
use stepforge_core::{SimpleScore, StepforgeError};
use stepforge_solver::heuristic::selector::SelectionHooks;
use stepforge_solver::heuristic::EitherMove;
use stepforge_solver::SolverFactory;
use stepforge_test::nqueens::NQueensSolution;

type QueenFactory = SolverFactory<NQueensSolution, QueenDirector, QueenMove>;

fn hooks() -> SelectionHooks<NQueensSolution, QueenMove> {
    SelectionHooks::new().with_filter("changes_only", |m: &QueenMove| {
        matches!(m, EitherMove::Change(_))
    })
}

#[test]
fn toml_config_solves_four_queens() {
    let config = SolverConfig::from_toml_str(
        r#"
        environment_mode = "reproducible"
        random_seed = 1
        move_thread_count = { count = 2 }

        [termination]
        best_score_limit = "0"
        step_count_limit = 500
        move_count_limit = 50000

        [[phases]]
        type = "local_search"
        [phases.acceptor]
        type = "late_acceptance"
        late_acceptance_size = 10
        [phases.forager]
        accepted_count_limit = 1
        "#,
    )
    .unwrap();

    let mut solver = QueenFactory::new(config, hooks(), queen_selectors())
        .build_solver()
        .unwrap();
    let result = solver.solve(queen_director(&[0, 0, 0, 0])).unwrap();

    assert!(result.score > SimpleScore::of(-6));
    assert!(result.step_count <= 500);
}

#[test]
fn yaml_config_with_filtered_original_selector() {
    let config = SolverConfig::from_yaml_str(
        r#"
        random_seed: 3
        termination:
          step_count_limit: 25
        phases:
          - type: local_search
            acceptor:
              type: hill_climbing
            move_selector:
              selection_order: original
              filter: changes_only
              selector:
                type: union_move_selector
                selectors:
                  - selector:
                      type: change_move_selector
                  - selector:
                      type: swap_move_selector
        "#,
    )
    .unwrap();

    let mut solver = QueenFactory::new(config, hooks(), queen_selectors())
        .build_solver()
        .unwrap();
    let result = solver.solve(queen_director(&[1, 1, 1, 1, 1])).unwrap();

    assert!(result.score > SimpleScore::of(-10));
}

#[test]
fn unknown_filter_name_is_a_config_error() {
    let config = SolverConfig::from_yaml_str(
        r#"
        phases:
          - type: local_search
            move_selector:
              filter: missing
              selector:
                type: change_move_selector
        "#,
    )
    .unwrap();

    let err = QueenFactory::new(config, hooks(), queen_selectors())
        .build_solver()
        .unwrap_err();
    assert!(matches!(err, StepforgeError::Config(_)));
}
