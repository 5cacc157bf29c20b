//! Late acceptance acceptor.

use std::fmt::Debug;

use stepforge_core::domain::PlanningSolution;

use super::Acceptor;
use crate::scope::MoveScope;

/// Late acceptance acceptor - accepts moves that improve on a historical score.
///
/// Maintains a circular buffer of recent step scores and accepts moves that
/// are at least as good as the score from `late_acceptance_size` steps ago.
///
/// # Example
///
/// ```
/// use stepforge_core::SimpleScore;
/// use stepforge_core::PlanningSolution;
/// use stepforge_solver::phase::localsearch::LateAcceptanceAcceptor;
///
/// #[derive(Clone)]
/// struct MySolution;
/// impl PlanningSolution for MySolution {
///     type Score = SimpleScore;
///     fn score(&self) -> Option<Self::Score> { None }
///     fn set_score(&mut self, _: Option<Self::Score>) {}
/// }
///
/// let acceptor = LateAcceptanceAcceptor::<MySolution>::new(400);
/// ```
pub struct LateAcceptanceAcceptor<S: PlanningSolution> {
    late_acceptance_size: usize,
    score_history: Vec<Option<S::Score>>,
    current_index: usize,
}

impl<S: PlanningSolution> Debug for LateAcceptanceAcceptor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LateAcceptanceAcceptor")
            .field("late_acceptance_size", &self.late_acceptance_size)
            .field("current_index", &self.current_index)
            .finish()
    }
}

impl<S: PlanningSolution> Clone for LateAcceptanceAcceptor<S> {
    fn clone(&self) -> Self {
        Self {
            late_acceptance_size: self.late_acceptance_size,
            score_history: self.score_history.clone(),
            current_index: self.current_index,
        }
    }
}

impl<S: PlanningSolution> LateAcceptanceAcceptor<S> {
    /// Default history length.
    pub const DEFAULT_SIZE: usize = 400;

    /// Creates a late acceptance acceptor. A size of 0 is raised to 1.
    pub fn new(late_acceptance_size: usize) -> Self {
        let late_acceptance_size = late_acceptance_size.max(1);
        Self {
            late_acceptance_size,
            score_history: vec![None; late_acceptance_size],
            current_index: 0,
        }
    }
}

impl<S: PlanningSolution> Default for LateAcceptanceAcceptor<S> {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE)
    }
}

impl<S: PlanningSolution> Acceptor<S> for LateAcceptanceAcceptor<S> {
    fn is_accepted<M>(&mut self, last_step_score: &S::Score, move_scope: &MoveScope<S, M>) -> bool {
        let Some(move_score) = move_scope.score else {
            return false;
        };
        if move_score >= *last_step_score {
            return true;
        }

        match &self.score_history[self.current_index] {
            Some(late_score) => move_score >= *late_score,
            None => true,
        }
    }

    fn phase_started(&mut self, initial_score: &S::Score) {
        for slot in &mut self.score_history {
            *slot = Some(*initial_score);
        }
        self.current_index = 0;
    }

    fn step_ended(&mut self, step_score: &S::Score) {
        self.score_history[self.current_index] = Some(*step_score);
        self.current_index = (self.current_index + 1) % self.late_acceptance_size;
    }
}
