//! Move threads for the local search decider.
//!
//! The deciding thread sends operations over one bounded channel shared by
//! all move threads and takes results from a [`RearrangingBlockingQueue`].
//! A [`StepBarrier`] keeps the move threads in lockstep: none evaluates a
//! move of step `k` before all of them applied step `k`.

mod barrier;
mod decider;
mod operation;
mod queue;
mod runner;

pub use barrier::StepBarrier;
pub use decider::MultiThreadedLocalSearchDecider;
pub use operation::MoveResult;
pub use queue::{MoveIndexed, RearrangingBlockingQueue, ResultSink};
