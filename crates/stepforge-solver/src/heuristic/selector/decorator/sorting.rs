use std::cmp::Ordering;
use std::fmt;

use stepforge_config::{SelectionCacheType, SorterOrder};
use stepforge_core::domain::PlanningSolution;
use stepforge_scoring::ScoreDirector;
use tracing::trace;

use super::collect_moves;
use crate::heuristic::r#move::Move;
use crate::heuristic::selector::hooks::{MoveComparator, MoveListSorter, MoveSorterWeight};
use crate::heuristic::selector::MoveSelector;

/// How a [`SortingMoveSelector`] orders its cache.
pub enum MoveSorter<S, M> {
    Comparator(MoveComparator<M>, SorterOrder),
    Weight(MoveSorterWeight<S, M>, SorterOrder),
    Custom(MoveListSorter<S, M>),
}

impl<S, M> MoveSorter<S, M> {
    /// Sorts `moves` in place. Equal moves keep their relative order.
    pub fn sort(&self, solution: &S, moves: &mut Vec<M>) {
        match self {
            MoveSorter::Comparator(compare, order) => {
                moves.sort_by(|a, b| directed(compare(a, b), *order));
            }
            MoveSorter::Weight(weight, order) => {
                let mut keyed: Vec<(i64, M)> =
                    moves.drain(..).map(|m| (weight(solution, &m), m)).collect();
                keyed.sort_by(|a, b| directed(a.0.cmp(&b.0), *order));
                moves.extend(keyed.into_iter().map(|(_, m)| m));
            }
            MoveSorter::Custom(sorter) => sorter(solution, moves),
        }
    }
}

fn directed(ordering: Ordering, order: SorterOrder) -> Ordering {
    match order {
        SorterOrder::Ascending => ordering,
        SorterOrder::Descending => ordering.reverse(),
    }
}

impl<S, M> fmt::Debug for MoveSorter<S, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveSorter::Comparator(_, order) => f.debug_tuple("Comparator").field(order).finish(),
            MoveSorter::Weight(_, order) => f.debug_tuple("Weight").field(order).finish(),
            MoveSorter::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// Caches the moves of its child and yields them sorted.
pub struct SortingMoveSelector<S, D, M> {
    inner: Box<dyn MoveSelector<S, D, M>>,
    cache_type: SelectionCacheType,
    sorter: MoveSorter<S, M>,
    cached: Option<Vec<M>>,
}

impl<S, D, M> SortingMoveSelector<S, D, M>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    pub fn new(
        inner: Box<dyn MoveSelector<S, D, M>>,
        cache_type: SelectionCacheType,
        sorter: MoveSorter<S, M>,
    ) -> Self {
        Self {
            inner,
            cache_type,
            sorter,
            cached: None,
        }
    }

    fn construct_cache(&mut self, score_director: &D) {
        let mut moves = collect_moves(self.inner.as_mut(), score_director);
        self.sorter.sort(score_director.working_solution(), &mut moves);
        trace!(cache_size = moves.len(), cache_type = ?self.cache_type, "Sorted move cache built");
        self.cached = Some(moves);
    }

    fn dispose_cache(&mut self) {
        self.cached = None;
    }
}

impl<S, D, M> fmt::Debug for SortingMoveSelector<S, D, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortingMoveSelector")
            .field("inner", &self.inner)
            .field("cache_type", &self.cache_type)
            .field("sorter", &self.sorter)
            .finish()
    }
}

impl<S, D, M> MoveSelector<S, D, M> for SortingMoveSelector<S, D, M>
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
        if self.cache_type == SelectionCacheType::Step {
            self.construct_cache(score_director);
        }
    }

    impl_cache_lifecycle!();
}
