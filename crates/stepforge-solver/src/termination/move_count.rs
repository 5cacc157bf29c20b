//! Move count termination.

use stepforge_core::domain::PlanningSolution;
use stepforge_scoring::ScoreDirector;

use super::Termination;
use crate::scope::{PhaseScope, SolverScope};

/// Terminates after a number of evaluated moves.
///
/// Unlike a time limit this is reproducible, whatever the machine load.
#[derive(Debug, Clone)]
pub struct MoveCountTermination {
    limit: u64,
}

impl MoveCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Termination<S, D> for MoveCountTermination {
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        solver_scope.move_evaluation_count() >= self.limit
    }

    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        phase_scope.move_evaluation_count() >= self.limit
    }
}
