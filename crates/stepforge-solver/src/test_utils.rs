//! Shared fixtures for unit tests in this crate.

use stepforge_core::SimpleScore;
use stepforge_scoring::SimpleScoreDirector;
use stepforge_test::nqueens::{
    calculate_conflicts, get_queen_row, queen_count, row_values, set_queen_row, NQueensSolution,
    QUEEN_DESCRIPTOR_INDEX, ROW_VARIABLE,
};
use stepforge_test::task::{calculate_priority_sum, get_priority, set_priority, TaskSolution};

use stepforge_core::domain::PlanningSolution;

use crate::heuristic::r#move::{ChangeMove, EitherMove, Move, SwapMove};
use crate::heuristic::selector::{BasicVariableMoveSelectors, ValueRange};
use crate::phase::localsearch::Acceptor;
use crate::scope::MoveScope;

pub type NQueensDirector =
    SimpleScoreDirector<NQueensSolution, fn(&NQueensSolution) -> SimpleScore>;

pub type TaskDirector = SimpleScoreDirector<TaskSolution, fn(&TaskSolution) -> SimpleScore>;

pub type QueenChange = ChangeMove<NQueensSolution, i64>;

pub type TaskChange = ChangeMove<TaskSolution, i64>;

pub type QueenMove = EitherMove<NQueensSolution, i64>;

pub fn create_nqueens_director(rows: &[i64]) -> NQueensDirector {
    SimpleScoreDirector::new(
        NQueensSolution::with_rows(rows),
        calculate_conflicts as fn(&NQueensSolution) -> SimpleScore,
    )
}

/// Director whose score is the sum of the task priorities.
pub fn create_task_director(priorities: &[i64]) -> TaskDirector {
    SimpleScoreDirector::new(
        TaskSolution::with_priorities(priorities),
        calculate_priority_sum as fn(&TaskSolution) -> SimpleScore,
    )
}

pub fn queen_change(entity_index: usize, row: i64) -> QueenChange {
    ChangeMove::new(
        entity_index,
        Some(row),
        get_queen_row,
        set_queen_row,
        ROW_VARIABLE,
        QUEEN_DESCRIPTOR_INDEX,
    )
}

pub fn queen_swap(left: usize, right: usize) -> SwapMove<NQueensSolution, i64> {
    SwapMove::new(
        left,
        right,
        get_queen_row,
        set_queen_row,
        ROW_VARIABLE,
        QUEEN_DESCRIPTOR_INDEX,
    )
}

pub fn task_change(entity_index: usize, priority: i64) -> TaskChange {
    ChangeMove::new(
        entity_index,
        Some(priority),
        get_priority,
        set_priority,
        "priority",
        0,
    )
}

/// Change and swap selectors over the queen rows.
///
/// With `fixed_rows` the value range does not depend on the solution, which
/// allows phase and solver caching.
pub fn queen_selectors(fixed_rows: Option<Vec<i64>>) -> BasicVariableMoveSelectors<NQueensSolution, i64> {
    let values = match fixed_rows {
        Some(rows) => ValueRange::Fixed(rows),
        None => ValueRange::FromSolution(row_values),
    };
    BasicVariableMoveSelectors::new(
        get_queen_row,
        set_queen_row,
        queen_count,
        values,
        QUEEN_DESCRIPTOR_INDEX,
        ROW_VARIABLE,
    )
}

/// Short form of a queen move: `('c', entity, row)` or `('s', left, right)`.
pub fn describe(m: &QueenMove) -> (char, usize, i64) {
    match m {
        EitherMove::Change(change) => (
            'c',
            change.entity_index(),
            change.to_value().copied().unwrap_or(-1),
        ),
        EitherMove::Swap(swap) => {
            let entities = swap.entity_indices();
            ('s', entities[0], entities[1] as i64)
        }
    }
}

/// Accepts every doable move.
#[derive(Debug, Default)]
pub struct AcceptAll;

impl<S: PlanningSolution> Acceptor<S> for AcceptAll {
    fn is_accepted<M>(&mut self, _last_step_score: &S::Score, move_scope: &MoveScope<S, M>) -> bool {
        move_scope.is_doable()
    }
}
