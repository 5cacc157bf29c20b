use std::fmt;

use rand::Rng;
use stepforge_config::SelectionCacheType;
use stepforge_core::domain::PlanningSolution;
use stepforge_scoring::ScoreDirector;
use tracing::{trace, warn};

use super::collect_moves;
use crate::heuristic::r#move::Move;
use crate::heuristic::selector::hooks::MoveProbabilityWeight;
use crate::heuristic::selector::random::SelectionRandom;
use crate::heuristic::selector::MoveSelector;

struct WeightedMoves<M> {
    moves: Vec<M>,
    cumulative: Vec<f64>,
}

impl<M> WeightedMoves<M> {
    fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }
}

/// Picks cached moves at random, proportionally to their weight.
///
/// Moves with a zero weight are never picked. The selection never runs dry
/// unless every weight is zero.
pub struct ProbabilityMoveSelector<S, D, M> {
    inner: Box<dyn MoveSelector<S, D, M>>,
    cache_type: SelectionCacheType,
    weight: MoveProbabilityWeight<S, M>,
    random: SelectionRandom,
    cached: Option<WeightedMoves<M>>,
}

impl<S, D, M> ProbabilityMoveSelector<S, D, M>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    pub fn new(
        inner: Box<dyn MoveSelector<S, D, M>>,
        cache_type: SelectionCacheType,
        weight: MoveProbabilityWeight<S, M>,
        seed: u64,
    ) -> Self {
        Self {
            inner,
            cache_type,
            weight,
            random: SelectionRandom::new(seed),
            cached: None,
        }
    }

    fn construct_cache(&mut self, score_director: &D) {
        let moves = collect_moves(self.inner.as_mut(), score_director);
        let solution = score_director.working_solution();
        let mut cumulative = Vec::with_capacity(moves.len());
        let mut total = 0.0;
        for m in &moves {
            let weight = (self.weight)(solution, m);
            if weight.is_nan() || weight < 0.0 {
                warn!(?m, weight, "Move has an invalid probability weight, using 0");
            } else {
                total += weight;
            }
            cumulative.push(total);
        }
        trace!(cache_size = moves.len(), total_weight = total, "Probability cache built");
        self.cached = Some(WeightedMoves { moves, cumulative });
    }

    fn dispose_cache(&mut self) {
        self.cached = None;
    }
}

impl<S, D, M> fmt::Debug for ProbabilityMoveSelector<S, D, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbabilityMoveSelector")
            .field("inner", &self.inner)
            .field("cache_type", &self.cache_type)
            .finish()
    }
}

impl<S, D, M> MoveSelector<S, D, M> for ProbabilityMoveSelector<S, D, M>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    fn iter_moves<'a>(&'a mut self, score_director: &D) -> Box<dyn Iterator<Item = M> + 'a> {
        if self.cached.is_none() {
            self.construct_cache(score_director);
        }
        let Some(weighted) = self.cached.as_ref() else {
            return Box::new(std::iter::empty());
        };
        let total = weighted.total();
        if weighted.moves.is_empty() || total <= 0.0 {
            return Box::new(std::iter::empty());
        }

        let random = &mut self.random;
        let last = weighted.moves.len() - 1;
        Box::new(std::iter::from_fn(move || {
            let target = random.rng().random::<f64>() * total;
            let index = weighted.cumulative.partition_point(|&c| c <= target).min(last);
            Some(weighted.moves[index].clone())
        }))
    }

    fn size(&self, score_director: &D) -> usize {
        match &self.cached {
            Some(weighted) => weighted.moves.len(),
            None => self.inner.size(score_director),
        }
    }

    fn is_never_ending(&self) -> bool {
        true
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
