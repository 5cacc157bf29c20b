//! Builder module for constructing solvers from configuration
//!
//! This module provides the wiring between configuration types and
//! the actual solver implementation.

use std::fmt::{self, Debug};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use stepforge_config::{
    AcceptorConfig, LateAcceptanceConfig, LocalSearchConfig, MoveSelectorConfig, PhaseConfig,
    SelectionCacheType, SelectionOrder, SolverConfig, TerminationConfig,
};
use stepforge_core::domain::PlanningSolution;
use stepforge_core::{ParseableScore, Result, StepforgeError};
use stepforge_scoring::ScoreDirector;
use tracing::debug;

use crate::heuristic::r#move::Move;
use crate::heuristic::selector::{BaseMoveSelectorBuilder, MoveSelectorFactory, SelectionHooks};
use crate::phase::localsearch::{
    AcceptedCountForager, ConfiguredAcceptor, EvaluationAssertions, LocalSearchDecider,
    LocalSearchPhase, MultiThreadedLocalSearchDecider,
};
use crate::phase::Phase;
use crate::solver::Solver;
use crate::termination::{
    BestScoreTermination, MoveCountTermination, OrTermination, StepCountTermination,
    Termination, TimeTermination, UnimprovedStepCountTermination,
};

/// Builds [`Solver`]s from a [`SolverConfig`].
///
/// Named filters, sorters and weights in the selector configs are looked up
/// in `hooks`; the leaves of every selector tree come from `base`.
pub struct SolverFactory<S, D, M>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    config: SolverConfig,
    hooks: SelectionHooks<S, M>,
    base: Box<dyn BaseMoveSelectorBuilder<S, D, M>>,
}

impl<S, D, M> SolverFactory<S, D, M>
where
    S: PlanningSolution,
    S::Score: ParseableScore,
    D: ScoreDirector<S> + 'static,
    M: Move<S>,
{
    pub fn new(
        config: SolverConfig,
        hooks: SelectionHooks<S, M>,
        base: impl BaseMoveSelectorBuilder<S, D, M> + 'static,
    ) -> Self {
        Self {
            config,
            hooks,
            base: Box::new(base),
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Builds a solver with one phase per configured phase.
    ///
    /// Without phases a single local search phase with default settings is
    /// built. A non-reproducible config without a seed draws a fresh one.
    pub fn build_solver(&self) -> Result<Solver<S, D>> {
        let seed = self
            .config
            .resolved_random_seed()
            .unwrap_or_else(rand::random::<u64>);
        let mut seeds = ChaCha8Rng::seed_from_u64(seed);

        let move_threads = match self.config.resolved_move_thread_count()? {
            Some(count) => Some((count, self.config.resolved_move_thread_buffer_size(count)?)),
            None => None,
        };
        let assertions = EvaluationAssertions::from_environment_mode(self.config.environment_mode);
        debug!(
            event = "build_solver",
            seed,
            environment_mode = ?self.config.environment_mode,
            move_threads = ?move_threads,
            "Building solver"
        );

        let default_phases = [PhaseConfig::LocalSearch(LocalSearchConfig::default())];
        let phase_configs = if self.config.phases.is_empty() {
            &default_phases[..]
        } else {
            &self.config.phases[..]
        };

        let mut solver = Solver::new();
        for phase_config in phase_configs {
            let phase = match phase_config {
                PhaseConfig::LocalSearch(config) => self.build_local_search_phase(
                    config,
                    seeds.random(),
                    move_threads,
                    assertions,
                )?,
            };
            solver = solver.with_phase(phase);
        }
        if let Some(termination) = self.config.termination.as_ref() {
            if let Some(termination) = build_termination::<S, D>(termination)? {
                solver = solver.with_termination(termination);
            }
        }
        Ok(solver)
    }

    fn build_local_search_phase(
        &self,
        config: &LocalSearchConfig,
        seed: u64,
        move_threads: Option<(usize, usize)>,
        assertions: EvaluationAssertions,
    ) -> Result<Box<dyn Phase<S, D>>> {
        let mut seeds = ChaCha8Rng::seed_from_u64(seed);
        let acceptor_config = config
            .acceptor
            .clone()
            .unwrap_or_else(|| AcceptorConfig::LateAcceptance(LateAcceptanceConfig::default()));
        let forager_config = config.forager.clone().unwrap_or_default();
        let accepted_count_limit = forager_config
            .accepted_count_limit
            .unwrap_or_else(|| acceptor_config.default_accepted_count_limit());
        if accepted_count_limit == 0 {
            return Err(StepforgeError::Config(
                "The accepted_count_limit must be at least 1.".to_string(),
            ));
        }

        let acceptor = ConfiguredAcceptor::from_config(&acceptor_config, seeds.random());
        let forager = AcceptedCountForager::new(accepted_count_limit)
            .with_pick_early_type(forager_config.pick_early_type.unwrap_or_default());

        // A limited forager quits on its own, so it can walk a never ending random selector.
        let inherited_order = if accepted_count_limit < usize::MAX {
            SelectionOrder::Random
        } else {
            SelectionOrder::Original
        };
        let selector_config = config.move_selector.clone().unwrap_or_else(|| {
            MoveSelectorConfig::union(vec![MoveSelectorConfig::change(), MoveSelectorConfig::swap()])
        });
        let mut selector_factory =
            MoveSelectorFactory::new(&self.hooks, self.base.as_ref(), seeds.random());
        let move_selector = selector_factory.build_move_selector(
            &selector_config,
            SelectionCacheType::JustInTime,
            inherited_order,
        )?;

        let mut decider =
            LocalSearchDecider::new(move_selector, acceptor, forager).with_assertions(assertions);
        if let Some(termination) = config.termination.as_ref() {
            if let Some(termination) = build_termination::<S, D>(termination)? {
                decider = decider.with_termination(termination);
            }
        }
        decider.check_forager_supports_selector()?;

        let phase: Box<dyn Phase<S, D>> = match move_threads {
            Some((move_thread_count, move_thread_buffer_size)) => {
                let decider = MultiThreadedLocalSearchDecider::new(
                    decider,
                    move_thread_count,
                    move_thread_buffer_size,
                )?;
                Box::new(LocalSearchPhase::<S, D, M, _>::new(decider))
            }
            None => Box::new(LocalSearchPhase::<S, D, M, _>::new(decider)),
        };
        Ok(phase)
    }
}

impl<S, D, M> Debug for SolverFactory<S, D, M>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverFactory")
            .field("config", &self.config)
            .field("hooks", &self.hooks)
            .finish()
    }
}

/// Builds the termination for `config`, any configured limit ending the solve.
///
/// Returns `None` if no limit is set.
pub fn build_termination<S, D>(
    config: &TerminationConfig,
) -> Result<Option<Box<dyn Termination<S, D>>>>
where
    S: PlanningSolution,
    S::Score: ParseableScore,
    D: ScoreDirector<S> + 'static,
{
    let mut terminations: Vec<Box<dyn Termination<S, D>>> = Vec::new();
    if let Some(limit) = config.time_limit() {
        terminations.push(Box::new(TimeTermination::new(limit)));
    }
    if let Some(limit) = config.step_count_limit {
        terminations.push(Box::new(StepCountTermination::new(limit)));
    }
    if let Some(limit) = config.unimproved_step_count_limit {
        terminations.push(Box::new(UnimprovedStepCountTermination::new(limit)));
    }
    if let Some(limit) = config.move_count_limit {
        terminations.push(Box::new(MoveCountTermination::new(limit)));
    }
    if let Some(limit) = config.best_score_limit.as_deref() {
        let target = S::Score::parse(limit).map_err(|err| {
            StepforgeError::Config(format!("The best_score_limit ({}) is invalid: {}", limit, err))
        })?;
        terminations.push(Box::new(BestScoreTermination::new(target)));
    }

    Ok(match terminations.len() {
        0 => None,
        1 => terminations.pop(),
        _ => Some(Box::new(OrTermination::new(terminations))),
    })
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
