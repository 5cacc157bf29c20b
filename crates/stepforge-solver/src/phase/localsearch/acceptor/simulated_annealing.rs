//! Simulated annealing acceptor.

use std::fmt::Debug;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use stepforge_core::domain::PlanningSolution;
use stepforge_core::score::Score;

use super::Acceptor;
use crate::scope::MoveScope;

/// Simulated annealing acceptor - accepts worse moves with a probability
/// that shrinks as the temperature cools.
///
/// A move that is worse than the last step by `delta` is accepted with
/// probability `exp(-delta / temperature)`. The temperature is multiplied
/// by the decay rate after every step.
///
/// # Example
///
/// ```
/// use stepforge_solver::phase::localsearch::SimulatedAnnealingAcceptor;
///
/// let acceptor = SimulatedAnnealingAcceptor::new(1.0, 0.99, 42);
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedAnnealingAcceptor {
    starting_temperature: f64,
    current_temperature: f64,
    decay_rate: f64,
    seed: u64,
    rng: ChaCha8Rng,
}

impl SimulatedAnnealingAcceptor {
    pub const DEFAULT_STARTING_TEMPERATURE: f64 = 1.0;
    pub const DEFAULT_DECAY_RATE: f64 = 0.99;

    pub fn new(starting_temperature: f64, decay_rate: f64, seed: u64) -> Self {
        Self {
            starting_temperature,
            current_temperature: starting_temperature,
            decay_rate,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn current_temperature(&self) -> f64 {
        self.current_temperature
    }
}

impl<S: PlanningSolution> Acceptor<S> for SimulatedAnnealingAcceptor {
    fn is_accepted<M>(&mut self, last_step_score: &S::Score, move_scope: &MoveScope<S, M>) -> bool {
        let Some(move_score) = move_scope.score else {
            return false;
        };
        if move_score >= *last_step_score {
            return true;
        }
        if self.current_temperature <= 0.0 {
            return false;
        }

        let delta = (*last_step_score - move_score).to_scalar();
        let acceptance_probability = (-delta / self.current_temperature).exp();
        self.rng.random::<f64>() < acceptance_probability
    }

    fn phase_started(&mut self, _initial_score: &S::Score) {
        self.current_temperature = self.starting_temperature;
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
    }

    fn step_ended(&mut self, _step_score: &S::Score) {
        self.current_temperature *= self.decay_rate;
    }
}
