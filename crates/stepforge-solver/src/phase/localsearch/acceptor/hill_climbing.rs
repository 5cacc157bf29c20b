//! Hill climbing acceptor.

use stepforge_core::domain::PlanningSolution;

use super::Acceptor;
use crate::scope::MoveScope;

/// Hill climbing acceptor - accepts only improving moves.
///
/// This is the simplest acceptor. It only accepts moves that result
/// in a strictly better score. This can get stuck in local optima.
///
/// # Example
///
/// ```
/// use stepforge_solver::phase::localsearch::HillClimbingAcceptor;
///
/// let acceptor = HillClimbingAcceptor::new();
/// ```
#[derive(Debug, Clone, Default)]
pub struct HillClimbingAcceptor;

impl HillClimbingAcceptor {
    pub fn new() -> Self {
        Self
    }
}

impl<S: PlanningSolution> Acceptor<S> for HillClimbingAcceptor {
    fn is_accepted<M>(&mut self, last_step_score: &S::Score, move_scope: &MoveScope<S, M>) -> bool {
        move_scope
            .score
            .is_some_and(|score| score > *last_step_score)
    }
}
