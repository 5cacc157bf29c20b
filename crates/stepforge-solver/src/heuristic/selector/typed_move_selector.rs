//! Move selector trait.

use std::fmt::Debug;

use stepforge_config::SelectionCacheType;
use stepforge_core::domain::PlanningSolution;
use stepforge_scoring::ScoreDirector;

use crate::heuristic::r#move::Move;

/// Produces the candidate moves of a step.
///
/// Selectors compose: decorators wrap a base selector and the factory
/// returns the whole pipeline as a `Box<dyn MoveSelector<S, D, M>>`.
///
/// The iterator returned by [`iter_moves`](MoveSelector::iter_moves) borrows
/// the selector but not the score director: the decider mutates the working
/// solution while it pulls moves. Anything a selector needs from the
/// solution is read when the iterator is created or when a cache is built.
///
/// Lifecycle hooks run in the order `solving_started`, `phase_started`,
/// `step_started`, `step_ended`, `phase_ended`, `solving_ended`. Caching
/// selectors build and drop their cache in the hooks that match their
/// [`cache_type`](MoveSelector::cache_type).
pub trait MoveSelector<S, D, M>: Send + Debug
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    /// Returns the moves of the current step.
    fn iter_moves<'a>(&'a mut self, score_director: &D) -> Box<dyn Iterator<Item = M> + 'a>;

    /// Number of distinct moves, or the size of the pool random picks come from.
    fn size(&self, score_director: &D) -> usize;

    /// Returns true if [`iter_moves`](MoveSelector::iter_moves) never runs dry.
    fn is_never_ending(&self) -> bool {
        false
    }

    /// Lifecycle span over which this selector's moves stay materialized.
    fn cache_type(&self) -> SelectionCacheType {
        SelectionCacheType::JustInTime
    }

    /// Returns true if the moves do not depend on the working solution,
    /// so they may be cached for a whole phase or solve.
    fn supports_phase_and_solver_caching(&self) -> bool {
        false
    }

    fn solving_started(&mut self, _score_director: &D) {}

    fn phase_started(&mut self, _score_director: &D) {}

    fn step_started(&mut self, _score_director: &D) {}

    fn step_ended(&mut self) {}

    fn phase_ended(&mut self) {}

    fn solving_ended(&mut self) {}
}

impl<S, D, M> MoveSelector<S, D, M> for Box<dyn MoveSelector<S, D, M>>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    fn iter_moves<'a>(&'a mut self, score_director: &D) -> Box<dyn Iterator<Item = M> + 'a> {
        (**self).iter_moves(score_director)
    }

    fn size(&self, score_director: &D) -> usize {
        (**self).size(score_director)
    }

    fn is_never_ending(&self) -> bool {
        (**self).is_never_ending()
    }

    fn cache_type(&self) -> SelectionCacheType {
        (**self).cache_type()
    }

    fn supports_phase_and_solver_caching(&self) -> bool {
        (**self).supports_phase_and_solver_caching()
    }

    fn solving_started(&mut self, score_director: &D) {
        (**self).solving_started(score_director)
    }

    fn phase_started(&mut self, score_director: &D) {
        (**self).phase_started(score_director)
    }

    fn step_started(&mut self, score_director: &D) {
        (**self).step_started(score_director)
    }

    fn step_ended(&mut self) {
        (**self).step_ended()
    }

    fn phase_ended(&mut self) {
        (**self).phase_ended()
    }

    fn solving_ended(&mut self) {
        (**self).solving_ended()
    }
}
