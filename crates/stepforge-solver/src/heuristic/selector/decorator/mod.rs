//! Decorators wrapping a move selector.
//!
//! Cached decorators materialize the moves of their child at the lifecycle
//! event matching their cache type and drop them at the matching end event.
//! A cache that was not built yet when moves are requested is built on
//! demand, so a selector used outside a solver still works.

/// Generates `cache_type` and the lifecycle hooks of a caching decorator,
/// except `step_started` which each decorator writes itself.
///
/// The decorator needs fields `inner` and `cache_type` and inherent methods
/// `construct_cache(&mut self, &D)` and `dispose_cache(&mut self)`.
macro_rules! impl_cache_lifecycle {
    () => {
        fn cache_type(&self) -> SelectionCacheType {
            self.cache_type
        }

        fn supports_phase_and_solver_caching(&self) -> bool {
            self.inner.supports_phase_and_solver_caching()
        }

        fn solving_started(&mut self, score_director: &D) {
            self.inner.solving_started(score_director);
            if self.cache_type == SelectionCacheType::Solver {
                self.construct_cache(score_director);
            }
        }

        fn phase_started(&mut self, score_director: &D) {
            self.inner.phase_started(score_director);
            if self.cache_type == SelectionCacheType::Phase {
                self.construct_cache(score_director);
            }
        }

        fn step_ended(&mut self) {
            if self.cache_type == SelectionCacheType::Step {
                self.dispose_cache();
            }
            self.inner.step_ended();
        }

        fn phase_ended(&mut self) {
            if self.cache_type == SelectionCacheType::Phase {
                self.dispose_cache();
            }
            self.inner.phase_ended();
        }

        fn solving_ended(&mut self) {
            if self.cache_type == SelectionCacheType::Solver {
                self.dispose_cache();
            }
            self.inner.solving_ended();
        }
    };
}

mod caching;
mod count_limit;
mod filtering;
mod probability;
mod shuffling;
mod sorting;
mod union;

#[cfg(test)]
mod tests;

pub use caching::CachingMoveSelector;
pub use count_limit::SelectedCountLimitMoveSelector;
pub use filtering::FilteringMoveSelector;
pub use probability::ProbabilityMoveSelector;
pub use shuffling::ShufflingMoveSelector;
pub use sorting::{MoveSorter, SortingMoveSelector};
pub use union::UnionMoveSelector;

use stepforge_core::domain::PlanningSolution;
use stepforge_scoring::ScoreDirector;

use super::MoveSelector;
use crate::heuristic::r#move::Move;

/// Drains a child selector into a list.
///
/// A never-ending child is cut off after one pass worth of moves.
fn collect_moves<S, D, M>(inner: &mut dyn MoveSelector<S, D, M>, score_director: &D) -> Vec<M>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    if inner.is_never_ending() {
        let size = inner.size(score_director);
        inner.iter_moves(score_director).take(size).collect()
    } else {
        inner.iter_moves(score_director).collect()
    }
}
