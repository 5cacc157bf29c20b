//! Solver phases
//!
//! Phases are the main building blocks of solving. This crate ships the
//! [`LocalSearchPhase`](localsearch::LocalSearchPhase), which improves an
//! existing solution one step at a time.

pub mod localsearch;

use std::fmt::Debug;

use stepforge_core::domain::PlanningSolution;
use stepforge_core::Result;
use stepforge_scoring::ScoreDirector;

use crate::scope::SolverScope;

/// A phase of the solving process.
///
/// Phases are executed in sequence by the solver. Each phase has its own
/// strategy for exploring solutions.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `D` - The score director type
pub trait Phase<S: PlanningSolution, D: ScoreDirector<S>>: Send + Debug {
    /// Called once per solve, before the first phase runs.
    fn solving_started(&mut self, _solver_scope: &SolverScope<S, D>) {}

    /// Executes this phase.
    ///
    /// The phase modifies the working solution in the solver scope and
    /// updates the best solution when improvements are found. Errors abort
    /// the solve.
    fn solve(&mut self, solver_scope: &mut SolverScope<S, D>, phase_index: usize) -> Result<()>;

    /// Called once per solve, after the last phase ran or failed.
    fn solving_ended(&mut self, _solver_scope: &SolverScope<S, D>) {}

    /// Returns the name of this phase type.
    fn phase_type_name(&self) -> &'static str;
}
