//! Acceptors for local search move acceptance.
//!
//! Acceptors determine whether a move should be accepted based on
//! comparing the resulting score with the previous step's score.

mod configured;
mod hill_climbing;
mod late_acceptance;
mod simulated_annealing;

use std::fmt::Debug;

use stepforge_core::domain::PlanningSolution;

use crate::scope::MoveScope;

pub use configured::ConfiguredAcceptor;
pub use hill_climbing::HillClimbingAcceptor;
pub use late_acceptance::LateAcceptanceAcceptor;
pub use simulated_annealing::SimulatedAnnealingAcceptor;

/// Trait for accepting or rejecting moves in local search.
///
/// Only doable moves reach an acceptor: `move_scope.score` is always set.
/// Acceptors run on the deciding thread, in move index order, so a
/// stateful acceptor behaves the same with or without move threads.
pub trait Acceptor<S: PlanningSolution>: Send + Debug {
    /// Returns true if the evaluated move should be accepted, given the
    /// previous step's score.
    fn is_accepted<M>(&mut self, last_step_score: &S::Score, move_scope: &MoveScope<S, M>) -> bool;

    /// Called when a phase starts.
    fn phase_started(&mut self, _initial_score: &S::Score) {}

    /// Called when a phase ends.
    fn phase_ended(&mut self) {}

    /// Called when a step starts.
    fn step_started(&mut self) {}

    /// Called when a step ends with a committed move.
    fn step_ended(&mut self, _step_score: &S::Score) {}
}
