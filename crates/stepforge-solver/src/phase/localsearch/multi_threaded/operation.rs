//! Messages between the deciding thread and move threads.

use std::fmt::{self, Debug};

use stepforge_core::domain::PlanningSolution;

use super::queue::MoveIndexed;

/// Work sent to move threads over the shared operation channel.
pub(crate) enum MoveThreadOperation<S: PlanningSolution, D, M> {
    /// Hands a move thread its own director, then waits for the others.
    Setup { score_director: D },
    /// Commits the winning move of the previous step, then waits for the others.
    ApplyStep {
        step_index: u64,
        step: M,
        step_score: S::Score,
    },
    /// Scores one candidate of the current step and leaves the solution unchanged.
    Evaluate {
        step_index: u64,
        move_index: usize,
        mov: M,
    },
    Destroy,
}

impl<S: PlanningSolution, D, M> MoveThreadOperation<S, D, M> {
    pub(crate) fn is_evaluate(&self) -> bool {
        matches!(self, MoveThreadOperation::Evaluate { .. })
    }
}

impl<S: PlanningSolution, D, M: Debug> Debug for MoveThreadOperation<S, D, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setup { .. } => f.write_str("Setup"),
            Self::ApplyStep {
                step_index,
                step,
                step_score,
            } => f
                .debug_struct("ApplyStep")
                .field("step_index", step_index)
                .field("step", step)
                .field("step_score", step_score)
                .finish(),
            Self::Evaluate {
                step_index,
                move_index,
                mov,
            } => f
                .debug_struct("Evaluate")
                .field("step_index", step_index)
                .field("move_index", move_index)
                .field("mov", mov)
                .finish(),
            Self::Destroy => f.write_str("Destroy"),
        }
    }
}

/// Outcome of one `Evaluate` operation.
///
/// `score` is `None` if the move was not doable. The move is handed back so
/// the deciding thread can commit it without keeping its own copy.
pub struct MoveResult<S: PlanningSolution, M> {
    pub move_thread_index: usize,
    pub step_index: u64,
    pub move_index: usize,
    pub mov: M,
    pub score: Option<S::Score>,
}

impl<S: PlanningSolution, M> MoveIndexed for MoveResult<S, M> {
    fn step_index(&self) -> u64 {
        self.step_index
    }

    fn move_index(&self) -> usize {
        self.move_index
    }
}

impl<S: PlanningSolution, M: Debug> Debug for MoveResult<S, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoveResult")
            .field("move_thread_index", &self.move_thread_index)
            .field("step_index", &self.step_index)
            .field("move_index", &self.move_index)
            .field("mov", &self.mov)
            .field("score", &self.score)
            .finish()
    }
}
