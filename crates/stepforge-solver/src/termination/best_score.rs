//! Best score termination.

use stepforge_core::domain::PlanningSolution;
use stepforge_core::score::Score;
use stepforge_scoring::ScoreDirector;

use super::Termination;
use crate::scope::{PhaseScope, SolverScope};

/// Terminates once the best score reaches a target.
///
/// # Example
///
/// ```
/// use stepforge_core::SimpleScore;
/// use stepforge_solver::termination::BestScoreTermination;
///
/// // Stop as soon as a conflict-free solution is found
/// let term = BestScoreTermination::new(SimpleScore::of(0));
/// ```
#[derive(Debug, Clone)]
pub struct BestScoreTermination<Sc: Score> {
    target: Sc,
}

impl<Sc: Score> BestScoreTermination<Sc> {
    pub fn new(target: Sc) -> Self {
        Self { target }
    }
}

impl<S, D> Termination<S, D> for BestScoreTermination<S::Score>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        solver_scope
            .best_score()
            .is_some_and(|best| *best >= self.target)
    }

    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        self.is_solver_terminated(phase_scope.solver_scope())
    }
}
