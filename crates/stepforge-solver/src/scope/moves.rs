//! Move-level scope.

use stepforge_core::domain::PlanningSolution;

/// One candidate move of a step, after evaluation.
///
/// `score` is `None` when the move was not doable; such a move never
/// reaches an acceptor or forager.
pub struct MoveScope<S: PlanningSolution, M> {
    pub step_index: u64,
    pub move_index: usize,
    pub mov: M,
    pub score: Option<S::Score>,
    pub accepted: bool,
}

impl<S: PlanningSolution, M> MoveScope<S, M> {
    pub fn new(step_index: u64, move_index: usize, mov: M, score: Option<S::Score>) -> Self {
        Self {
            step_index,
            move_index,
            mov,
            score,
            accepted: false,
        }
    }

    pub fn is_doable(&self) -> bool {
        self.score.is_some()
    }
}

impl<S: PlanningSolution, M: std::fmt::Debug> std::fmt::Debug for MoveScope<S, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoveScope")
            .field("step_index", &self.step_index)
            .field("move_index", &self.move_index)
            .field("mov", &self.mov)
            .field("score", &self.score)
            .field("accepted", &self.accepted)
            .finish()
    }
}

/// Record of one candidate kept on the step scope after the move itself is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveEvaluation<Sc> {
    pub move_index: usize,
    pub score: Option<Sc>,
    pub accepted: bool,
}
