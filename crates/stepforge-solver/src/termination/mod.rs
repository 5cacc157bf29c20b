//! Termination conditions for phases and solves.
//!
//! Every termination answers for two levels: the whole solve, counted with
//! the solver scope's totals, and a single phase, counted with the phase
//! scope's own numbers. A local search phase stops when its own termination
//! or the solver's termination says so.

mod best_score;
mod composite;
mod external;
mod move_count;
mod step_count;
mod time;
mod unimproved;

use std::fmt::Debug;

use stepforge_core::domain::PlanningSolution;
use stepforge_scoring::ScoreDirector;

use crate::scope::{PhaseScope, SolverScope};

pub use best_score::BestScoreTermination;
pub use composite::{AndTermination, OrTermination};
pub use external::ExternalTermination;
pub use move_count::MoveCountTermination;
pub use step_count::StepCountTermination;
pub use time::TimeTermination;
pub use unimproved::UnimprovedStepCountTermination;

/// Trait for determining when to stop solving.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `D` - The score director type
pub trait Termination<S: PlanningSolution, D: ScoreDirector<S>>: Send + Debug {
    /// Returns true if the whole solve should stop.
    fn is_solver_terminated(&self, solver_scope: &SolverScope<S, D>) -> bool;

    /// Returns true if the current phase should stop.
    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool;
}
