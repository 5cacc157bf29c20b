use std::fmt;

use stepforge_config::SelectionCacheType;
use stepforge_core::domain::PlanningSolution;
use stepforge_scoring::ScoreDirector;
use tracing::debug;

use crate::heuristic::r#move::Move;
use crate::heuristic::selector::hooks::MoveFilter;
use crate::heuristic::selector::MoveSelector;

/// Consecutive rejections per move of the child before a never-ending
/// filtered selection gives up.
const BAIL_OUT_MULTIPLIER: usize = 10;
const BAIL_OUT_MINIMUM: usize = 100;

/// Drops the moves a filter rejects.
///
/// Over a never-ending child the selection ends once the filter has
/// rejected too many moves in a row, instead of spinning forever.
pub struct FilteringMoveSelector<S, D, M> {
    inner: Box<dyn MoveSelector<S, D, M>>,
    filter: MoveFilter<M>,
}

impl<S, D, M> FilteringMoveSelector<S, D, M> {
    pub fn new(inner: Box<dyn MoveSelector<S, D, M>>, filter: MoveFilter<M>) -> Self {
        Self { inner, filter }
    }
}

impl<S, D, M> fmt::Debug for FilteringMoveSelector<S, D, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilteringMoveSelector")
            .field("inner", &self.inner)
            .finish()
    }
}

impl<S, D, M> MoveSelector<S, D, M> for FilteringMoveSelector<S, D, M>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    fn iter_moves<'a>(&'a mut self, score_director: &D) -> Box<dyn Iterator<Item = M> + 'a> {
        let filter = self.filter;
        if !self.inner.is_never_ending() {
            return Box::new(
                self.inner
                    .iter_moves(score_director)
                    .filter(move |m| filter(m)),
            );
        }

        let bail_out = self
            .inner
            .size(score_director)
            .saturating_mul(BAIL_OUT_MULTIPLIER)
            .max(BAIL_OUT_MINIMUM);
        let mut moves = self.inner.iter_moves(score_director);
        Box::new(std::iter::from_fn(move || {
            for _ in 0..bail_out {
                let m = moves.next()?;
                if filter(&m) {
                    return Some(m);
                }
            }
            debug!(bail_out, "Filter rejected every candidate, ending selection");
            None
        }))
    }

    fn size(&self, score_director: &D) -> usize {
        self.inner.size(score_director)
    }

    fn is_never_ending(&self) -> bool {
        self.inner.is_never_ending()
    }

    fn cache_type(&self) -> SelectionCacheType {
        self.inner.cache_type()
    }

    fn supports_phase_and_solver_caching(&self) -> bool {
        self.inner.supports_phase_and_solver_caching()
    }

    fn solving_started(&mut self, score_director: &D) {
        self.inner.solving_started(score_director);
    }

    fn phase_started(&mut self, score_director: &D) {
        self.inner.phase_started(score_director);
    }

    fn step_started(&mut self, score_director: &D) {
        self.inner.step_started(score_director);
    }

    fn step_ended(&mut self) {
        self.inner.step_ended();
    }

    fn phase_ended(&mut self) {
        self.inner.phase_ended();
    }

    fn solving_ended(&mut self) {
        self.inner.solving_ended();
    }
}
