use std::fmt;

use stepforge_config::SelectionCacheType;
use stepforge_core::domain::PlanningSolution;
use stepforge_scoring::ScoreDirector;

use crate::heuristic::r#move::Move;
use crate::heuristic::selector::MoveSelector;

/// Stops a selection after a fixed number of moves.
pub struct SelectedCountLimitMoveSelector<S, D, M> {
    inner: Box<dyn MoveSelector<S, D, M>>,
    limit: usize,
}

impl<S, D, M> SelectedCountLimitMoveSelector<S, D, M> {
    pub fn new(inner: Box<dyn MoveSelector<S, D, M>>, limit: usize) -> Self {
        Self { inner, limit }
    }
}

impl<S, D, M> fmt::Debug for SelectedCountLimitMoveSelector<S, D, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedCountLimitMoveSelector")
            .field("inner", &self.inner)
            .field("limit", &self.limit)
            .finish()
    }
}

impl<S, D, M> MoveSelector<S, D, M> for SelectedCountLimitMoveSelector<S, D, M>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    fn iter_moves<'a>(&'a mut self, score_director: &D) -> Box<dyn Iterator<Item = M> + 'a> {
        Box::new(self.inner.iter_moves(score_director).take(self.limit))
    }

    fn size(&self, score_director: &D) -> usize {
        self.inner.size(score_director).min(self.limit)
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
