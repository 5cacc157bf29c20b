//! Local search phase
//!
//! Improves an existing solution by iteratively applying moves that are
//! accepted according to an acceptance criterion. Each step is decided by
//! a [`LocalSearchStepDecider`], either on the solver thread or spread over
//! move threads.

mod acceptor;
mod decider;
mod evaluation;
mod forager;
mod multi_threaded;
mod phase;

pub use acceptor::{
    Acceptor, ConfiguredAcceptor, HillClimbingAcceptor, LateAcceptanceAcceptor,
    SimulatedAnnealingAcceptor,
};
pub use decider::{LocalSearchDecider, LocalSearchStepDecider};
pub use evaluation::{assert_step_score, evaluate_move, EvaluationAssertions};
pub use forager::{AcceptedCountForager, FirstAcceptedForager, LocalSearchForager};
pub use multi_threaded::{
    MoveIndexed, MoveResult, MultiThreadedLocalSearchDecider, RearrangingBlockingQueue,
    ResultSink, StepBarrier,
};
pub use phase::LocalSearchPhase;
