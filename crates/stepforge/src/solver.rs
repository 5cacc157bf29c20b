//! Solver entry point that hides the factory wiring.

use stepforge_config::SolverConfig;
use stepforge_core::domain::PlanningSolution;
use stepforge_core::{ParseableScore, Result};
use stepforge_scoring::ScoreDirector;
use stepforge_solver::{BaseMoveSelectorBuilder, Move, SelectionHooks, SolveResult, SolverFactory};

/// Builds a solver from `config` and solves the director's working solution.
///
/// # Example
///
/// ```
/// use stepforge::prelude::*;
/// use stepforge::EitherMove;
/// use stepforge_test::nqueens::{
///     calculate_conflicts, get_queen_row, queen_count, row_values, set_queen_row,
///     NQueensSolution,
/// };
///
/// let selectors = BasicVariableMoveSelectors::new(
///     get_queen_row,
///     set_queen_row,
///     queen_count,
///     ValueRange::FromSolution(row_values),
///     0,
///     "row",
/// );
/// let director = SimpleScoreDirector::new(
///     NQueensSolution::with_rows(&[0, 0, 0, 0]),
///     calculate_conflicts as fn(&NQueensSolution) -> SimpleScore,
/// );
/// let config = SolverConfig::from_toml_str(
///     r#"
///     random_seed = 0
///     [termination]
///     step_count_limit = 50
///     move_count_limit = 10000
///     "#,
/// )
/// .unwrap();
///
/// let result = run_solver::<_, _, EitherMove<NQueensSolution, i64>>(
///     config,
///     SelectionHooks::new(),
///     selectors,
///     director,
/// )
/// .unwrap();
/// assert!(result.step_count <= 50);
/// ```
pub fn run_solver<S, D, M>(
    config: SolverConfig,
    hooks: SelectionHooks<S, M>,
    selectors: impl BaseMoveSelectorBuilder<S, D, M> + 'static,
    score_director: D,
) -> Result<SolveResult<S>>
where
    S: PlanningSolution,
    S::Score: ParseableScore,
    D: ScoreDirector<S> + 'static,
    M: Move<S>,
{
    let mut solver = SolverFactory::new(config, hooks, selectors).build_solver()?;
    solver.solve(score_director)
}
