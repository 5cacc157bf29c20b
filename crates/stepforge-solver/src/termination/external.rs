//! Termination triggered from outside the solver.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use stepforge_core::domain::PlanningSolution;
use stepforge_scoring::ScoreDirector;

use super::Termination;
use crate::scope::{PhaseScope, SolverScope};

/// Terminates once a shared flag is set, typically from another thread.
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use stepforge_solver::termination::ExternalTermination;
///
/// let flag = Arc::new(AtomicBool::new(false));
/// let term = ExternalTermination::new(Arc::clone(&flag));
/// flag.store(true, Ordering::SeqCst);
/// assert!(term.is_triggered());
/// ```
#[derive(Debug, Clone)]
pub struct ExternalTermination {
    flag: Arc<AtomicBool>,
}

impl ExternalTermination {
    pub fn new(flag: Arc<AtomicBool>) -> Self {
        Self { flag }
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Termination<S, D> for ExternalTermination {
    fn is_solver_terminated(&self, _solver_scope: &SolverScope<S, D>) -> bool {
        self.is_triggered()
    }

    fn is_phase_terminated(&self, _phase_scope: &PhaseScope<'_, S, D>) -> bool {
        self.is_triggered()
    }
}
