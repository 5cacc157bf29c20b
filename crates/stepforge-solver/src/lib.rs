//! stepforge solver engine
//!
//! This crate provides the local search step engine:
//! - Moves with explicit undo records, and the move selector pipeline
//! - Acceptors, foragers and termination conditions
//! - Single-threaded and multi-threaded step deciders
//! - The local search phase, the [`Solver`] and its [`SolverFactory`]

pub mod builder;
pub mod heuristic;
pub mod phase;
pub mod scope;
pub mod solver;
pub mod termination;

#[cfg(test)]
mod test_utils;

pub use builder::{build_termination, SolverFactory};
pub use heuristic::{
    BaseMoveSelectorBuilder, BasicVariableMoveSelectors, ChangeMove, ChangeMoveSelector,
    EitherMove, FixedMoveSelector, Move, MoveSelector, MoveSelectorFactory, MoveValue,
    SelectionHooks, SwapMove, SwapMoveSelector, ValueRange,
};
pub use phase::{
    localsearch::{
        AcceptedCountForager, Acceptor, ConfiguredAcceptor, EvaluationAssertions,
        FirstAcceptedForager, HillClimbingAcceptor, LateAcceptanceAcceptor, LocalSearchDecider,
        LocalSearchForager, LocalSearchPhase, LocalSearchStepDecider,
        MultiThreadedLocalSearchDecider, RearrangingBlockingQueue, SimulatedAnnealingAcceptor,
    },
    Phase,
};
pub use scope::{MoveEvaluation, MoveScope, PhaseScope, SolverScope, StepScope};
pub use solver::{SolveResult, Solver};
pub use termination::{
    AndTermination, BestScoreTermination, ExternalTermination, MoveCountTermination,
    OrTermination, StepCountTermination, Termination, TimeTermination,
    UnimprovedStepCountTermination,
};
