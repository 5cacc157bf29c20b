//! Local search decider that evaluates moves on move threads.

use std::fmt::{self, Debug};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};
use stepforge_core::domain::PlanningSolution;
use stepforge_core::{Result, StepforgeError};
use stepforge_scoring::ScoreDirector;
use tracing::{debug, warn};

use super::barrier::StepBarrier;
use super::operation::{MoveResult, MoveThreadOperation};
use super::queue::RearrangingBlockingQueue;
use super::runner::MoveThreadRunner;
use crate::heuristic::r#move::Move;
use crate::phase::localsearch::decider::{
    end_step, forage_move, phase_terminated, LocalSearchDecider, LocalSearchStepDecider,
};
use crate::phase::localsearch::evaluation::{panic_message, EvaluationAssertions};
use crate::phase::localsearch::{Acceptor, LocalSearchForager};
use crate::scope::{MoveScope, PhaseScope, SolverScope, StepScope};

/// Threads, channel, result queue and barrier of one phase.
struct MoveThreadPool<S: PlanningSolution, D, M> {
    operations: Sender<MoveThreadOperation<S, D, M>>,
    // Kept by the deciding thread to drain operations that are no longer needed.
    pending: Receiver<MoveThreadOperation<S, D, M>>,
    results: RearrangingBlockingQueue<MoveResult<S, M>>,
    barrier: Arc<StepBarrier>,
    handles: Vec<JoinHandle<u64>>,
    move_thread_count: usize,
}

impl<S, D, M> MoveThreadPool<S, D, M>
where
    S: PlanningSolution,
    D: ScoreDirector<S> + 'static,
    M: Move<S>,
{
    /// Spawns the move threads and queues one `Setup` per thread.
    fn start(
        score_director: &D,
        move_thread_count: usize,
        move_thread_buffer_size: usize,
        assertions: EvaluationAssertions,
    ) -> Result<Self> {
        let (operations, pending) =
            channel::bounded(move_thread_buffer_size + 2 * move_thread_count);
        let mut pool = Self {
            operations,
            pending,
            results: RearrangingBlockingQueue::new(move_thread_buffer_size + move_thread_count),
            barrier: Arc::new(StepBarrier::new(move_thread_count)),
            handles: Vec::with_capacity(move_thread_count),
            move_thread_count,
        };

        for move_thread_index in 0..move_thread_count {
            let runner = MoveThreadRunner::new(
                move_thread_index,
                pool.pending.clone(),
                pool.results.sink(),
                Arc::clone(&pool.barrier),
                assertions,
            );
            let spawned = thread::Builder::new()
                .name(format!("move-thread-{}", move_thread_index))
                .spawn(move || runner.run());
            match spawned {
                Ok(handle) => pool.handles.push(handle),
                Err(err) => {
                    pool.stop(true);
                    return Err(StepforgeError::Internal(format!(
                        "Could not spawn move thread ({}): {}",
                        move_thread_index, err
                    )));
                }
            }
        }

        for _ in 0..move_thread_count {
            pool.send(MoveThreadOperation::Setup {
                score_director: score_director.clone_for_thread(),
            })?;
        }
        Ok(pool)
    }

    fn send(&self, operation: MoveThreadOperation<S, D, M>) -> Result<()> {
        self.operations.send(operation).map_err(|_| {
            StepforgeError::Internal("The move thread operation channel is closed.".to_string())
        })
    }

    /// Drops every queued `Evaluate`. Other operations are queued again in
    /// their original order.
    fn clear_pending_evaluations(&self) -> Result<usize> {
        let mut kept = Vec::new();
        let mut cleared = 0;
        while let Ok(operation) = self.pending.try_recv() {
            if operation.is_evaluate() {
                cleared += 1;
            } else {
                kept.push(operation);
            }
        }
        for operation in kept {
            self.send(operation)?;
        }
        Ok(cleared)
    }

    fn broadcast_apply_step(&self, step_index: u64, step: &M, step_score: S::Score) -> Result<()> {
        for _ in 0..self.move_thread_count {
            self.send(MoveThreadOperation::ApplyStep {
                step_index,
                step: step.clone(),
                step_score,
            })?;
        }
        Ok(())
    }

    /// Sends `Destroy` to every thread and joins them.
    ///
    /// With `abort` the barrier is broken and all queued work dropped first,
    /// so no thread waits for a step that never comes. Returns the summed
    /// score calculation count and the first failure, if any.
    fn stop(&mut self, abort: bool) -> (u64, Option<StepforgeError>) {
        if abort {
            self.barrier.break_barrier();
            self.results.close();
            while self.pending.try_recv().is_ok() {}
        } else if let Err(err) = self.clear_pending_evaluations() {
            warn!(event = "move_threads_drain_failed", error = %err, "Draining move thread operations failed");
        }

        for _ in 0..self.handles.len() {
            if self.operations.send(MoveThreadOperation::Destroy).is_err() {
                break;
            }
        }

        let mut calculation_count = 0;
        let mut join_failure = None;
        for (move_thread_index, handle) in self.handles.drain(..).enumerate() {
            match handle.join() {
                Ok(count) => calculation_count += count,
                Err(payload) => {
                    join_failure.get_or_insert(StepforgeError::MoveThreadFailure {
                        move_thread_index,
                        cause: Box::new(StepforgeError::Panic(panic_message(payload.as_ref()))),
                    });
                }
            }
        }
        let failure = self.results.take_failure().or(join_failure);
        (calculation_count, failure)
    }
}

impl<S: PlanningSolution, D, M> Drop for MoveThreadPool<S, D, M> {
    fn drop(&mut self) {
        if self.handles.is_empty() {
            return;
        }
        warn!(
            event = "move_threads_abandoned",
            move_thread_count = self.handles.len(),
            "Move threads dropped without a phase end, stopping them"
        );
        self.barrier.break_barrier();
        self.results.close();
        while self.pending.try_recv().is_ok() {}
        for _ in 0..self.handles.len() {
            if self.operations.send(MoveThreadOperation::Destroy).is_err() {
                break;
            }
        }
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

/// Multi-threaded decider: candidates are scored on move threads, each with
/// its own clone of the score director, while acceptor and forager stay on
/// the deciding thread.
///
/// Up to `move_thread_buffer_size` moves are in flight. Results come back
/// through a [`RearrangingBlockingQueue`] in move index order, so with the
/// same seed the committed steps are the same as with
/// [`LocalSearchDecider`], whatever the thread count.
///
/// Threads are started at phase start and stopped at phase end by sending
/// one `Destroy` per thread and joining them all.
pub struct MultiThreadedLocalSearchDecider<S, D, M, A, F>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    inner: LocalSearchDecider<S, D, M, A, F>,
    move_thread_count: usize,
    move_thread_buffer_size: usize,
    pool: Option<MoveThreadPool<S, D, M>>,
}

impl<S, D, M, A, F> MultiThreadedLocalSearchDecider<S, D, M, A, F>
where
    S: PlanningSolution,
    D: ScoreDirector<S> + 'static,
    M: Move<S>,
    A: Acceptor<S>,
    F: LocalSearchForager<S, M>,
{
    /// Wraps a single-threaded decider; its selector, acceptor, forager,
    /// termination and assertions are used unchanged.
    pub fn new(
        inner: LocalSearchDecider<S, D, M, A, F>,
        move_thread_count: usize,
        move_thread_buffer_size: usize,
    ) -> Result<Self> {
        if move_thread_count == 0 {
            return Err(StepforgeError::Config(
                "The move_thread_count must be at least 1.".to_string(),
            ));
        }
        if move_thread_buffer_size < move_thread_count {
            return Err(StepforgeError::Config(format!(
                "The move_thread_buffer_size ({}) must be at least the move_thread_count ({}).",
                move_thread_buffer_size, move_thread_count
            )));
        }
        Ok(Self {
            inner,
            move_thread_count,
            move_thread_buffer_size,
            pool: None,
        })
    }

    pub fn move_thread_count(&self) -> usize {
        self.move_thread_count
    }

    pub fn move_thread_buffer_size(&self) -> usize {
        self.move_thread_buffer_size
    }

    /// Returns true while move threads are running.
    pub fn is_running(&self) -> bool {
        self.pool.is_some()
    }

    fn stop_pool(
        &mut self,
        phase_scope: &mut PhaseScope<'_, S, D>,
        abort: bool,
    ) -> Option<StepforgeError> {
        let mut pool = self.pool.take()?;
        let (calculation_count, failure) = pool.stop(abort);
        phase_scope
            .solver_scope_mut()
            .add_child_thread_calculation_count(calculation_count);
        debug!(
            event = "move_threads_stopped",
            move_thread_count = self.move_thread_count,
            calculation_count,
            abort,
            "Move threads stopped"
        );
        failure
    }
}

impl<S, D, M, A, F> Debug for MultiThreadedLocalSearchDecider<S, D, M, A, F>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    A: Debug,
    F: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiThreadedLocalSearchDecider")
            .field("inner", &self.inner)
            .field("move_thread_count", &self.move_thread_count)
            .field("move_thread_buffer_size", &self.move_thread_buffer_size)
            .field("running", &self.pool.is_some())
            .finish()
    }
}

impl<S, D, M, A, F> LocalSearchStepDecider<S, D, M> for MultiThreadedLocalSearchDecider<S, D, M, A, F>
where
    S: PlanningSolution,
    D: ScoreDirector<S> + 'static,
    M: Move<S>,
    A: Acceptor<S>,
    F: LocalSearchForager<S, M>,
{
    fn solving_started(&mut self, solver_scope: &SolverScope<S, D>) {
        self.inner.solving_started(solver_scope);
    }

    fn phase_started(&mut self, phase_scope: &mut PhaseScope<'_, S, D>) -> Result<()> {
        self.inner.check_forager_supports_selector()?;
        if let Some(failure) = self.stop_pool(phase_scope, true) {
            warn!(event = "stale_move_thread_failure", error = %failure, "Discarded a failure of a previous phase");
        }
        self.pool = Some(MoveThreadPool::start(
            phase_scope.score_director(),
            self.move_thread_count,
            self.move_thread_buffer_size,
            self.inner.assertions,
        )?);
        debug!(
            event = "move_threads_started",
            move_thread_count = self.move_thread_count,
            move_thread_buffer_size = self.move_thread_buffer_size,
            "Move threads started"
        );
        self.inner.move_selector.phase_started(phase_scope.score_director());
        self.inner.acceptor.phase_started(&phase_scope.starting_score());
        Ok(())
    }

    fn step_started(&mut self, step_scope: &mut StepScope<'_, '_, S, D, M>) {
        self.inner.step_started(step_scope);
    }

    fn decide_next_step(&mut self, step_scope: &mut StepScope<'_, '_, S, D, M>) -> Result<()> {
        let step_index = step_scope.step_index();
        let buffer_size = self.move_thread_buffer_size;
        let pool = self.pool.as_mut().ok_or_else(|| {
            StepforgeError::InvalidState("Move threads are not started.".to_string())
        })?;
        let LocalSearchDecider {
            move_selector,
            acceptor,
            forager,
            termination,
            ..
        } = &mut self.inner;

        pool.results.start_next_step(step_index)?;

        let mut moves = move_selector.iter_moves(step_scope.score_director());
        let mut selected = 0usize;
        let mut consumed = 0usize;
        let mut exhausted = false;
        loop {
            while !exhausted && selected - consumed < buffer_size {
                match moves.next() {
                    Some(mov) => {
                        pool.send(MoveThreadOperation::Evaluate {
                            step_index,
                            move_index: selected,
                            mov,
                        })?;
                        selected += 1;
                    }
                    None => exhausted = true,
                }
            }
            if consumed == selected
                || phase_terminated(termination.as_deref(), step_scope.phase_scope())
            {
                break;
            }

            let result = pool.results.take()?;
            if result.step_index != step_index || result.move_index != consumed {
                return Err(StepforgeError::InvariantViolation(format!(
                    "Expected move ({}) of step ({}) but move thread ({}) delivered move ({}) of step ({}).",
                    consumed, step_index, result.move_thread_index, result.move_index, result.step_index
                )));
            }
            consumed += 1;
            forage_move(
                acceptor,
                forager,
                step_scope,
                MoveScope::new(step_index, result.move_index, result.mov, result.score),
            );
            if forager.is_quit_early()
                || phase_terminated(termination.as_deref(), step_scope.phase_scope())
            {
                break;
            }
        }
        drop(moves);

        let cleared = pool.clear_pending_evaluations()?;
        if cleared > 0 {
            debug!(
                event = "evaluations_cleared",
                step_index,
                cleared,
                "Cleared evaluations beyond the decided step"
            );
        }

        forager.pick_move(step_scope);
        if let (Some(step), Some(step_score)) = (step_scope.step(), step_scope.step_score()) {
            pool.broadcast_apply_step(step_index + 1, step, *step_score)?;
        }
        Ok(())
    }

    fn step_ended(&mut self, step_scope: &StepScope<'_, '_, S, D, M>) {
        end_step(
            self.inner.move_selector.as_mut(),
            &mut self.inner.acceptor,
            step_scope,
        );
    }

    fn phase_ended(&mut self, phase_scope: &mut PhaseScope<'_, S, D>) -> Result<()> {
        let failure = self.stop_pool(phase_scope, false);
        self.inner.phase_ended(phase_scope)?;
        match failure {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }

    fn phase_aborted(&mut self, phase_scope: &mut PhaseScope<'_, S, D>) {
        if let Some(failure) = self.stop_pool(phase_scope, true) {
            debug!(event = "move_thread_failure_on_abort", error = %failure, "Move thread failure during abort");
        }
        self.inner.phase_aborted(phase_scope);
    }

    fn solving_ended(&mut self, solver_scope: &SolverScope<S, D>) {
        self.inner.solving_ended(solver_scope);
    }

    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        self.inner.is_phase_terminated(phase_scope)
    }

    fn assertions(&self) -> EvaluationAssertions {
        self.inner.assertions
    }
}

#[cfg(test)]
#[path = "decider_tests.rs"]
mod tests;
