//! Breakable rendezvous barrier for move threads.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use stepforge_core::{Result, StepforgeError};

#[derive(Debug)]
struct BarrierState {
    arrived: usize,
    generation: u64,
    broken: bool,
}

/// Lets no move thread pass until all of them arrived.
///
/// Unlike `std::sync::Barrier` it can be broken: every thread waiting now
/// or later gets [`StepforgeError::Cancelled`], so a failed or aborted
/// phase never leaves a move thread parked.
#[derive(Debug)]
pub struct StepBarrier {
    parties: usize,
    state: Mutex<BarrierState>,
    condvar: Condvar,
}

impl StepBarrier {
    pub fn new(parties: usize) -> Self {
        Self {
            parties: parties.max(1),
            state: Mutex::new(BarrierState {
                arrived: 0,
                generation: 0,
                broken: false,
            }),
            condvar: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BarrierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks until all parties arrived, or the barrier is broken.
    pub fn wait(&self) -> Result<()> {
        let mut state = self.lock();
        if state.broken {
            return Err(StepforgeError::Cancelled);
        }

        state.arrived += 1;
        if state.arrived == self.parties {
            state.arrived = 0;
            state.generation = state.generation.wrapping_add(1);
            drop(state);
            self.condvar.notify_all();
            return Ok(());
        }

        let generation = state.generation;
        while state.generation == generation && !state.broken {
            state = self
                .condvar
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if state.generation != generation {
            Ok(())
        } else {
            Err(StepforgeError::Cancelled)
        }
    }

    pub fn break_barrier(&self) {
        self.lock().broken = true;
        self.condvar.notify_all();
    }

    pub fn is_broken(&self) -> bool {
        self.lock().broken
    }
}
