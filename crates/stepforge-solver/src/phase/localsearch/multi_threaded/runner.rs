//! Move thread main loop.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crossbeam::channel::Receiver;
use stepforge_core::domain::PlanningSolution;
use stepforge_core::{Result, StepforgeError};
use stepforge_scoring::ScoreDirector;
use tracing::{debug, trace};

use super::barrier::StepBarrier;
use super::operation::{MoveResult, MoveThreadOperation};
use super::queue::ResultSink;
use crate::heuristic::r#move::Move;
use crate::phase::localsearch::evaluation::{
    evaluate_move, panic_message, EvaluationAssertions,
};

/// State owned by one move thread.
struct MoveThreadState<S: PlanningSolution, D> {
    score_director: Option<D>,
    step_index: u64,
    last_step_score: Option<S::Score>,
}

/// Runs operations for one move thread until `Destroy`.
///
/// Any error or panic is reported through the result sink as a
/// [`StepforgeError::MoveThreadFailure`] and breaks the barrier, so the
/// other move threads stop too.
pub(crate) struct MoveThreadRunner<S: PlanningSolution, D, M> {
    move_thread_index: usize,
    operations: Receiver<MoveThreadOperation<S, D, M>>,
    results: ResultSink<MoveResult<S, M>>,
    barrier: Arc<StepBarrier>,
    assertions: EvaluationAssertions,
}

impl<S, D, M> MoveThreadRunner<S, D, M>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    pub(crate) fn new(
        move_thread_index: usize,
        operations: Receiver<MoveThreadOperation<S, D, M>>,
        results: ResultSink<MoveResult<S, M>>,
        barrier: Arc<StepBarrier>,
        assertions: EvaluationAssertions,
    ) -> Self {
        Self {
            move_thread_index,
            operations,
            results,
            barrier,
            assertions,
        }
    }

    /// Runs until `Destroy`, a closed channel, a broken barrier or a failure.
    ///
    /// Returns the score calculation count of this thread's director.
    pub(crate) fn run(self) -> u64 {
        let mut state = MoveThreadState {
            score_director: None,
            step_index: 0,
            last_step_score: None,
        };

        let outcome = catch_unwind(AssertUnwindSafe(|| self.process(&mut state)));
        let failure = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(err)) => Some(err),
            Err(payload) => Some(StepforgeError::Panic(panic_message(payload.as_ref()))),
        };
        if let Some(cause) = failure {
            debug!(
                event = "move_thread_failed",
                move_thread_index = self.move_thread_index,
                error = %cause,
                "Move thread failed"
            );
            self.results.add_failure(StepforgeError::MoveThreadFailure {
                move_thread_index: self.move_thread_index,
                cause: Box::new(cause),
            });
            self.barrier.break_barrier();
        }

        match state.score_director.as_mut() {
            Some(score_director) => {
                score_director.close();
                score_director.calculation_count()
            }
            None => 0,
        }
    }

    fn process(&self, state: &mut MoveThreadState<S, D>) -> Result<()> {
        let move_thread_index = self.move_thread_index;
        loop {
            let Ok(operation) = self.operations.recv() else {
                return Ok(());
            };
            match operation {
                MoveThreadOperation::Setup { mut score_director } => {
                    state.last_step_score = Some(score_director.calculate_score());
                    state.score_director = Some(score_director);
                    state.step_index = 0;
                    trace!(event = "setup", move_thread_index, "Move thread set up");
                    if self.barrier.wait().is_err() {
                        return Ok(());
                    }
                }
                MoveThreadOperation::ApplyStep {
                    step_index,
                    step,
                    step_score,
                } => {
                    let score_director = director(state.score_director.as_mut())?;
                    if step_index != state.step_index + 1 {
                        return Err(StepforgeError::InvariantViolation(format!(
                            "Move thread ({}) at step ({}) cannot apply step ({}).",
                            move_thread_index, state.step_index, step_index
                        )));
                    }
                    let rebased = step.rebase(score_director);
                    let _ = rebased.do_move(score_director);
                    let score = score_director.calculate_score();
                    if self.assertions.step_score_from_scratch {
                        let from_scratch = score_director.calculate_score_from_scratch();
                        if score != step_score || from_scratch != step_score {
                            return Err(StepforgeError::ScoreCorruption(format!(
                                "Move thread ({}) scored step ({}) as ({}) and ({}) from scratch, \
                                 but the deciding thread scored it ({}).",
                                move_thread_index, step_index, score, from_scratch, step_score
                            )));
                        }
                    }
                    state.step_index = step_index;
                    state.last_step_score = Some(score);
                    trace!(
                        event = "apply_step",
                        move_thread_index,
                        step_index,
                        score = %score,
                        "Move thread applied step"
                    );
                    if self.barrier.wait().is_err() {
                        return Ok(());
                    }
                }
                MoveThreadOperation::Evaluate {
                    step_index,
                    move_index,
                    mov,
                } => {
                    let score_director = director(state.score_director.as_mut())?;
                    if step_index != state.step_index {
                        return Err(StepforgeError::InvariantViolation(format!(
                            "Move thread ({}) at step ({}) got move ({}) of step ({}).",
                            move_thread_index, state.step_index, move_index, step_index
                        )));
                    }
                    let last_step_score = state.last_step_score.ok_or_else(|| {
                        StepforgeError::InvalidState("Evaluate before the first score.".to_string())
                    })?;
                    let rebased = mov.rebase(score_director);
                    let score = evaluate_move::<S, D, M>(
                        score_director,
                        &rebased,
                        last_step_score,
                        self.assertions,
                    )?;
                    trace!(
                        event = "evaluate",
                        move_thread_index,
                        step_index,
                        move_index,
                        doable = score.is_some(),
                        "Move thread evaluated move"
                    );
                    self.results.add(MoveResult {
                        move_thread_index,
                        step_index,
                        move_index,
                        mov,
                        score,
                    });
                }
                MoveThreadOperation::Destroy => {
                    trace!(event = "destroy", move_thread_index, "Move thread destroyed");
                    return Ok(());
                }
            }
        }
    }
}

fn director<D>(score_director: Option<&mut D>) -> Result<&mut D> {
    score_director.ok_or_else(|| {
        StepforgeError::InvalidState("A move thread got work before its setup.".to_string())
    })
}
