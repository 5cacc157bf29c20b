//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use stepforge_core::domain::PlanningSolution;
use stepforge_core::SimpleScore;
use stepforge_scoring::{ScoreDirector, SimpleScoreDirector};
use stepforge_solver::heuristic::selector::{
    BasicVariableMoveSelectors, FixedMoveSelector, MoveSelector, ValueRange,
};
use stepforge_solver::heuristic::{ChangeMove, EitherMove, Move};
use stepforge_solver::phase::localsearch::{
    AcceptedCountForager, Acceptor, LocalSearchDecider, LocalSearchPhase,
    MultiThreadedLocalSearchDecider,
};
use stepforge_solver::scope::MoveScope;
use stepforge_solver::solver::Solver;
use stepforge_solver::termination::StepCountTermination;
use stepforge_test::nqueens::{
    calculate_conflicts, get_queen_row, queen_count, row_values, set_queen_row, NQueensSolution,
    QUEEN_DESCRIPTOR_INDEX, ROW_VARIABLE,
};
use stepforge_test::task::{calculate_priority_sum, get_priority, set_priority, TaskSolution};

pub type QueenDirector = SimpleScoreDirector<NQueensSolution, fn(&NQueensSolution) -> SimpleScore>;
pub type QueenMove = EitherMove<NQueensSolution, i64>;

pub type TaskDirector = SimpleScoreDirector<TaskSolution, fn(&TaskSolution) -> SimpleScore>;
pub type TaskChange = ChangeMove<TaskSolution, i64>;
pub type TaskPhase<Dc> = LocalSearchPhase<TaskSolution, TaskDirector, TaskChange, Dc>;

pub fn queen_director(rows: &[i64]) -> QueenDirector {
    SimpleScoreDirector::new(
        NQueensSolution::with_rows(rows),
        calculate_conflicts as fn(&NQueensSolution) -> SimpleScore,
    )
}

pub fn queen_selectors() -> BasicVariableMoveSelectors<NQueensSolution, i64> {
    BasicVariableMoveSelectors::new(
        get_queen_row,
        set_queen_row,
        queen_count,
        ValueRange::FromSolution(row_values),
        QUEEN_DESCRIPTOR_INDEX,
        ROW_VARIABLE,
    )
}

pub fn task_director(priorities: &[i64]) -> TaskDirector {
    SimpleScoreDirector::new(
        TaskSolution::with_priorities(priorities),
        calculate_priority_sum as fn(&TaskSolution) -> SimpleScore,
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

/// Accepts every doable move.
#[derive(Debug, Default)]
pub struct AcceptAll;

impl<S: PlanningSolution> Acceptor<S> for AcceptAll {
    fn is_accepted<M>(&mut self, _last_step_score: &S::Score, move_scope: &MoveScope<S, M>) -> bool {
        move_scope.is_doable()
    }
}

/// Local search decider over a fixed list of task changes.
pub fn fixed_task_decider<A: Acceptor<TaskSolution>>(
    moves: Vec<TaskChange>,
    acceptor: A,
) -> LocalSearchDecider<
    TaskSolution,
    TaskDirector,
    TaskChange,
    A,
    AcceptedCountForager<TaskSolution, TaskChange>,
> {
    let selector: Box<dyn MoveSelector<TaskSolution, TaskDirector, TaskChange>> =
        Box::new(FixedMoveSelector::new(moves));
    LocalSearchDecider::new(selector, acceptor, AcceptedCountForager::new(usize::MAX))
}

/// Wraps `decider` in a one-phase solver, with move threads if `move_thread_count > 0`.
pub fn task_solver<A>(
    decider: LocalSearchDecider<
        TaskSolution,
        TaskDirector,
        TaskChange,
        A,
        AcceptedCountForager<TaskSolution, TaskChange>,
    >,
    move_thread_count: usize,
    step_count_limit: u64,
) -> Solver<TaskSolution, TaskDirector>
where
    A: Acceptor<TaskSolution> + 'static,
{
    let solver =
        Solver::new().with_termination(Box::new(StepCountTermination::new(step_count_limit)));
    if move_thread_count == 0 {
        solver.with_phase(Box::new(TaskPhase::new(decider)))
    } else {
        let decider =
            MultiThreadedLocalSearchDecider::new(decider, move_thread_count, move_thread_count * 2)
                .expect("valid move thread configuration");
        solver.with_phase(Box::new(TaskPhase::new(decider)))
    }
}

/// A move that is doable but panics when done.
#[derive(Debug, Clone)]
pub struct ExplodingMove {
    entity_indices: Vec<usize>,
}

impl ExplodingMove {
    pub fn new(entity_index: usize) -> Self {
        Self {
            entity_indices: vec![entity_index],
        }
    }
}

impl Move<NQueensSolution> for ExplodingMove {
    type Undo = ();

    fn is_doable<D: ScoreDirector<NQueensSolution>>(&self, _score_director: &D) -> bool {
        true
    }

    fn do_move<D: ScoreDirector<NQueensSolution>>(&self, _score_director: &mut D) {
        panic!("exploding move done on entity {}", self.entity_indices[0]);
    }

    fn undo_move<D: ScoreDirector<NQueensSolution>>(&self, _undo: (), _score_director: &mut D) {}

    fn descriptor_index(&self) -> usize {
        QUEEN_DESCRIPTOR_INDEX
    }

    fn entity_indices(&self) -> &[usize] {
        &self.entity_indices
    }

    fn variable_name(&self) -> &str {
        ROW_VARIABLE
    }
}
