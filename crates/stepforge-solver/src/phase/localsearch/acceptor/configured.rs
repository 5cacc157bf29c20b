//! Acceptor chosen by configuration.

use std::fmt::Debug;

use stepforge_config::AcceptorConfig;
use stepforge_core::domain::PlanningSolution;

use super::{Acceptor, HillClimbingAcceptor, LateAcceptanceAcceptor, SimulatedAnnealingAcceptor};
use crate::scope::MoveScope;

/// One of the built-in acceptors, picked from an [`AcceptorConfig`].
pub enum ConfiguredAcceptor<S: PlanningSolution> {
    HillClimbing(HillClimbingAcceptor),
    LateAcceptance(LateAcceptanceAcceptor<S>),
    SimulatedAnnealing(SimulatedAnnealingAcceptor),
}

impl<S: PlanningSolution> ConfiguredAcceptor<S> {
    /// Builds the acceptor for `config`; `seed` feeds random acceptors.
    pub fn from_config(config: &AcceptorConfig, seed: u64) -> Self {
        match config {
            AcceptorConfig::HillClimbing => Self::HillClimbing(HillClimbingAcceptor::new()),
            AcceptorConfig::LateAcceptance(late) => Self::LateAcceptance(
                LateAcceptanceAcceptor::new(
                    late.late_acceptance_size
                        .unwrap_or(LateAcceptanceAcceptor::<S>::DEFAULT_SIZE),
                ),
            ),
            AcceptorConfig::SimulatedAnnealing(annealing) => {
                Self::SimulatedAnnealing(SimulatedAnnealingAcceptor::new(
                    annealing
                        .starting_temperature
                        .unwrap_or(SimulatedAnnealingAcceptor::DEFAULT_STARTING_TEMPERATURE),
                    annealing
                        .decay_rate
                        .unwrap_or(SimulatedAnnealingAcceptor::DEFAULT_DECAY_RATE),
                    seed,
                ))
            }
        }
    }
}

impl<S: PlanningSolution> Debug for ConfiguredAcceptor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HillClimbing(a) => a.fmt(f),
            Self::LateAcceptance(a) => a.fmt(f),
            Self::SimulatedAnnealing(a) => a.fmt(f),
        }
    }
}

impl<S: PlanningSolution> Acceptor<S> for ConfiguredAcceptor<S> {
    fn is_accepted<M>(&mut self, last_step_score: &S::Score, move_scope: &MoveScope<S, M>) -> bool {
        match self {
            Self::HillClimbing(a) => Acceptor::<S>::is_accepted(a, last_step_score, move_scope),
            Self::LateAcceptance(a) => a.is_accepted(last_step_score, move_scope),
            Self::SimulatedAnnealing(a) => {
                Acceptor::<S>::is_accepted(a, last_step_score, move_scope)
            }
        }
    }

    fn phase_started(&mut self, initial_score: &S::Score) {
        match self {
            Self::HillClimbing(a) => Acceptor::<S>::phase_started(a, initial_score),
            Self::LateAcceptance(a) => a.phase_started(initial_score),
            Self::SimulatedAnnealing(a) => Acceptor::<S>::phase_started(a, initial_score),
        }
    }

    fn phase_ended(&mut self) {
        match self {
            Self::HillClimbing(a) => Acceptor::<S>::phase_ended(a),
            Self::LateAcceptance(a) => a.phase_ended(),
            Self::SimulatedAnnealing(a) => Acceptor::<S>::phase_ended(a),
        }
    }

    fn step_started(&mut self) {
        match self {
            Self::HillClimbing(a) => Acceptor::<S>::step_started(a),
            Self::LateAcceptance(a) => a.step_started(),
            Self::SimulatedAnnealing(a) => Acceptor::<S>::step_started(a),
        }
    }

    fn step_ended(&mut self, step_score: &S::Score) {
        match self {
            Self::HillClimbing(a) => Acceptor::<S>::step_ended(a, step_score),
            Self::LateAcceptance(a) => a.step_ended(step_score),
            Self::SimulatedAnnealing(a) => Acceptor::<S>::step_ended(a, step_score),
        }
    }
}
