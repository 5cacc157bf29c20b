//! Composite terminations.

use std::fmt::{self, Debug};

use stepforge_core::domain::PlanningSolution;
use stepforge_scoring::ScoreDirector;

use super::Termination;
use crate::scope::{PhaseScope, SolverScope};

/// Terminates when any child terminates.
pub struct OrTermination<S: PlanningSolution, D: ScoreDirector<S>> {
    terminations: Vec<Box<dyn Termination<S, D>>>,
}

impl<S: PlanningSolution, D: ScoreDirector<S>> OrTermination<S, D> {
    pub fn new(terminations: Vec<Box<dyn Termination<S, D>>>) -> Self {
        Self { terminations }
    }
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Debug for OrTermination<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OrTermination")
            .field(&self.terminations)
            .finish()
    }
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Termination<S, D> for OrTermination<S, D> {
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        self.terminations
            .iter()
            .any(|t| t.is_solver_terminated(solver_scope))
    }

    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        self.terminations
            .iter()
            .any(|t| t.is_phase_terminated(phase_scope))
    }
}

/// Terminates when every child terminates. Without children it never terminates.
pub struct AndTermination<S: PlanningSolution, D: ScoreDirector<S>> {
    terminations: Vec<Box<dyn Termination<S, D>>>,
}

impl<S: PlanningSolution, D: ScoreDirector<S>> AndTermination<S, D> {
    pub fn new(terminations: Vec<Box<dyn Termination<S, D>>>) -> Self {
        Self { terminations }
    }
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Debug for AndTermination<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AndTermination")
            .field(&self.terminations)
            .finish()
    }
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Termination<S, D> for AndTermination<S, D> {
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool {
        !self.terminations.is_empty()
            && self
                .terminations
                .iter()
                .all(|t| t.is_solver_terminated(solver_scope))
    }

    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        !self.terminations.is_empty()
            && self
                .terminations
                .iter()
                .all(|t| t.is_phase_terminated(phase_scope))
    }
}
