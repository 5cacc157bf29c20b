use std::fmt;

use rand::seq::SliceRandom;
use stepforge_config::SelectionCacheType;
use stepforge_core::domain::PlanningSolution;
use stepforge_scoring::ScoreDirector;
use tracing::trace;

use super::collect_moves;
use crate::heuristic::r#move::Move;
use crate::heuristic::selector::random::SelectionRandom;
use crate::heuristic::selector::MoveSelector;

/// Yields every cached move once, in a fresh random order per iteration.
pub struct ShufflingMoveSelector<S, D, M> {
    inner: Box<dyn MoveSelector<S, D, M>>,
    cache_type: SelectionCacheType,
    random: SelectionRandom,
    cached: Option<Vec<M>>,
}

impl<S, D, M> ShufflingMoveSelector<S, D, M>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    pub fn new(
        inner: Box<dyn MoveSelector<S, D, M>>,
        cache_type: SelectionCacheType,
        seed: u64,
    ) -> Self {
        Self {
            inner,
            cache_type,
            random: SelectionRandom::new(seed),
            cached: None,
        }
    }

    fn construct_cache(&mut self, score_director: &D) {
        let moves = collect_moves(self.inner.as_mut(), score_director);
        trace!(cache_size = moves.len(), cache_type = ?self.cache_type, "Shuffle cache built");
        self.cached = Some(moves);
    }

    fn dispose_cache(&mut self) {
        self.cached = None;
    }
}

impl<S, D, M> fmt::Debug for ShufflingMoveSelector<S, D, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShufflingMoveSelector")
            .field("inner", &self.inner)
            .field("cache_type", &self.cache_type)
            .finish()
    }
}

impl<S, D, M> MoveSelector<S, D, M> for ShufflingMoveSelector<S, D, M>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    fn iter_moves<'a>(&'a mut self, score_director: &D) -> Box<dyn Iterator<Item = M> + 'a> {
        if self.cached.is_none() {
            self.construct_cache(score_director);
        }
        let moves = self.cached.get_or_insert_with(Vec::new);
        moves.shuffle(self.random.rng());
        Box::new(moves.iter().cloned())
    }

    fn size(&self, score_director: &D) -> usize {
        match &self.cached {
            Some(moves) => moves.len(),
            None => self.inner.size(score_director),
        }
    }

    fn step_started(&mut self, score_director: &D) {
        self.inner.step_started(score_director);
        self.random.step_started();
        if self.cache_type == SelectionCacheType::Step {
            self.construct_cache(score_director);
        }
    }

    impl_cache_lifecycle!();
}
