//! Result queue that hands move results back in move index order.

use std::collections::{HashMap, VecDeque};
use std::fmt::{self, Debug};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use stepforge_core::{Result, StepforgeError};
use tracing::trace;

/// An element tagged with the step and the selection position it belongs to.
pub trait MoveIndexed {
    fn step_index(&self) -> u64;

    fn move_index(&self) -> usize;
}

struct QueueState<T> {
    filter_step_index: Option<u64>,
    queue: VecDeque<T>,
    failure: Option<StepforgeError>,
    closed: bool,
}

struct Shared<T> {
    capacity: usize,
    state: Mutex<QueueState<T>>,
    not_empty: Condvar,
    not_full: Condvar,
}

impl<T> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn wait<'a, T>(
    condvar: &Condvar,
    guard: MutexGuard<'a, QueueState<T>>,
) -> MutexGuard<'a, QueueState<T>> {
    condvar.wait(guard).unwrap_or_else(PoisonError::into_inner)
}

/// Bounded queue that restores move index order from out-of-order producers.
///
/// Producers add through a [`ResultSink`]; only elements of the step set by
/// the last [`start_next_step`](Self::start_next_step) are kept, everything
/// else is dropped. The consumer side takes `&mut self`, so there is exactly
/// one consumer: it gets move index 0, 1, 2, ... of the current step in that
/// order, whatever order they were added in. Elements that arrive early wait
/// in a backlog on the consumer side.
///
/// A producer can also report a failure, which the next
/// [`take`](Self::take) returns instead of an element.
///
/// # Example
///
/// ```
/// use stepforge_solver::phase::localsearch::{MoveIndexed, RearrangingBlockingQueue};
///
/// struct Item(u64, usize);
///
/// impl MoveIndexed for Item {
///     fn step_index(&self) -> u64 { self.0 }
///     fn move_index(&self) -> usize { self.1 }
/// }
///
/// let mut queue = RearrangingBlockingQueue::new(4);
/// queue.start_next_step(0).unwrap();
/// let sink = queue.sink();
/// sink.add(Item(0, 1));
/// sink.add(Item(0, 0));
/// assert_eq!(queue.take().unwrap().move_index(), 0);
/// assert_eq!(queue.take().unwrap().move_index(), 1);
/// ```
pub struct RearrangingBlockingQueue<T> {
    shared: Arc<Shared<T>>,
    next_index: usize,
    backlog: HashMap<usize, T>,
}

/// Producer handle of a [`RearrangingBlockingQueue`].
pub struct ResultSink<T> {
    shared: Arc<Shared<T>>,
}

impl<T: MoveIndexed> RearrangingBlockingQueue<T> {
    /// Creates a queue holding at most `capacity` undelivered elements.
    ///
    /// Elements parked in the consumer's backlog do not count.
    pub fn new(capacity: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                capacity: capacity.max(1),
                state: Mutex::new(QueueState {
                    filter_step_index: None,
                    queue: VecDeque::new(),
                    failure: None,
                    closed: false,
                }),
                not_empty: Condvar::new(),
                not_full: Condvar::new(),
            }),
            next_index: 0,
            backlog: HashMap::new(),
        }
    }

    pub fn sink(&self) -> ResultSink<T> {
        ResultSink {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Switches to `step_index`: every element of an earlier step, queued
    /// or still being produced, is discarded, and the next
    /// [`take`](Self::take) expects move index 0.
    ///
    /// Step indices must strictly increase.
    pub fn start_next_step(&mut self, step_index: u64) -> Result<()> {
        let mut state = self.shared.lock();
        if let Some(current) = state.filter_step_index {
            if step_index <= current {
                return Err(StepforgeError::InvariantViolation(format!(
                    "The next step index ({}) must be higher than the current step index ({}).",
                    step_index, current
                )));
            }
        }
        state.filter_step_index = Some(step_index);
        let discarded = state.queue.len();
        state.queue.clear();
        drop(state);
        self.shared.not_full.notify_all();

        if discarded > 0 || !self.backlog.is_empty() {
            trace!(
                event = "stale_results_discarded",
                step_index,
                discarded = discarded + self.backlog.len(),
                "Discarded results of an earlier step"
            );
        }
        self.next_index = 0;
        self.backlog.clear();
        Ok(())
    }

    /// Blocks until the element with the next move index is available.
    ///
    /// Returns a reported failure as soon as there is one, or an error if
    /// the queue was closed.
    pub fn take(&mut self) -> Result<T> {
        let expected = self.next_index;
        if let Some(element) = self.backlog.remove(&expected) {
            self.next_index += 1;
            return Ok(element);
        }

        let mut state = self.shared.lock();
        loop {
            if let Some(failure) = state.failure.take() {
                return Err(failure);
            }
            if let Some(element) = state.queue.pop_front() {
                self.shared.not_full.notify_one();
                let move_index = element.move_index();
                if move_index == expected {
                    self.next_index += 1;
                    return Ok(element);
                }
                if move_index < expected || self.backlog.contains_key(&move_index) {
                    return Err(StepforgeError::InvariantViolation(format!(
                        "The move index ({}) was delivered twice in step ({}).",
                        move_index,
                        element.step_index()
                    )));
                }
                self.backlog.insert(move_index, element);
                continue;
            }
            if state.closed {
                return Err(StepforgeError::InvalidState(
                    "The result queue is closed.".to_string(),
                ));
            }
            state = wait(&self.shared.not_empty, state);
        }
    }

    /// Removes a reported failure that no [`take`](Self::take) has returned yet.
    pub fn take_failure(&self) -> Option<StepforgeError> {
        self.shared.lock().failure.take()
    }

    /// Wakes every blocked producer and consumer; later additions are dropped.
    pub fn close(&self) {
        self.shared.lock().closed = true;
        self.shared.not_empty.notify_all();
        self.shared.not_full.notify_all();
    }
}

impl<T: MoveIndexed> ResultSink<T> {
    /// Adds an element of the current step; blocks while the queue is full.
    ///
    /// Elements of any other step are silently dropped.
    pub fn add(&self, element: T) {
        let mut state = self.shared.lock();
        loop {
            if state.closed || state.filter_step_index != Some(element.step_index()) {
                trace!(
                    event = "stale_result_dropped",
                    step_index = element.step_index(),
                    move_index = element.move_index(),
                    "Dropped a result of another step"
                );
                return;
            }
            if state.queue.len() < self.shared.capacity {
                break;
            }
            state = wait(&self.shared.not_full, state);
        }
        state.queue.push_back(element);
        drop(state);
        self.shared.not_empty.notify_one();
    }

    /// Reports a failure to the consumer. Only the first failure is kept.
    pub fn add_failure(&self, failure: StepforgeError) {
        let mut state = self.shared.lock();
        if state.failure.is_none() {
            state.failure = Some(failure);
        }
        drop(state);
        self.shared.not_empty.notify_all();
    }
}

impl<T> Clone for ResultSink<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Debug for RearrangingBlockingQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RearrangingBlockingQueue")
            .field("capacity", &self.shared.capacity)
            .field("next_index", &self.next_index)
            .field("backlog", &self.backlog.len())
            .finish()
    }
}

impl<T> Debug for ResultSink<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSink")
            .field("capacity", &self.shared.capacity)
            .finish()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
