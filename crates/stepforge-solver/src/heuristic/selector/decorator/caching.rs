use std::fmt;

use rand::Rng;
use stepforge_config::SelectionCacheType;
use stepforge_core::domain::PlanningSolution;
use stepforge_scoring::ScoreDirector;
use tracing::trace;

use super::collect_moves;
use crate::heuristic::r#move::Move;
use crate::heuristic::selector::random::SelectionRandom;
use crate::heuristic::selector::MoveSelector;

/// Materializes the moves of its child for the span of its cache type.
///
/// In original order the cache is replayed as is. With random selection
/// every pick is an independent draw from the cache.
pub struct CachingMoveSelector<S, D, M> {
    inner: Box<dyn MoveSelector<S, D, M>>,
    cache_type: SelectionCacheType,
    random: Option<SelectionRandom>,
    cached: Option<Vec<M>>,
}

impl<S, D, M> CachingMoveSelector<S, D, M>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    pub fn new(inner: Box<dyn MoveSelector<S, D, M>>, cache_type: SelectionCacheType) -> Self {
        Self {
            inner,
            cache_type,
            random: None,
            cached: None,
        }
    }

    pub fn with_random_selection(mut self, seed: u64) -> Self {
        self.random = Some(SelectionRandom::new(seed));
        self
    }

    fn construct_cache(&mut self, score_director: &D) {
        let moves = collect_moves(self.inner.as_mut(), score_director);
        trace!(cache_size = moves.len(), cache_type = ?self.cache_type, "Move cache built");
        self.cached = Some(moves);
    }

    fn dispose_cache(&mut self) {
        self.cached = None;
    }
}

impl<S, D, M> fmt::Debug for CachingMoveSelector<S, D, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachingMoveSelector")
            .field("inner", &self.inner)
            .field("cache_type", &self.cache_type)
            .field("random", &self.random.is_some())
            .finish()
    }
}

impl<S, D, M> MoveSelector<S, D, M> for CachingMoveSelector<S, D, M>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    fn iter_moves<'a>(&'a mut self, score_director: &D) -> Box<dyn Iterator<Item = M> + 'a> {
        if self.cached.is_none() {
            self.construct_cache(score_director);
        }
        let moves = self.cached.as_deref().unwrap_or_default();
        match self.random.as_mut() {
            None => Box::new(moves.iter().cloned()),
            Some(_) if moves.is_empty() => Box::new(std::iter::empty()),
            Some(random) => Box::new(std::iter::from_fn(move || {
                let index = random.rng().random_range(0..moves.len());
                Some(moves[index].clone())
            })),
        }
    }

    fn size(&self, score_director: &D) -> usize {
        match &self.cached {
            Some(moves) => moves.len(),
            None => self.inner.size(score_director),
        }
    }

    fn is_never_ending(&self) -> bool {
        self.random.is_some()
    }

    fn step_started(&mut self, score_director: &D) {
        self.inner.step_started(score_director);
        if let Some(random) = self.random.as_mut() {
            random.step_started();
        }
        if self.cache_type == SelectionCacheType::Step {
            self.construct_cache(score_director);
        }
    }

    impl_cache_lifecycle!();
}
