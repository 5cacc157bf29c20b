//! Selector over a fixed list of moves.

use rand::Rng;
use stepforge_config::SelectionCacheType;
use stepforge_core::domain::PlanningSolution;
use stepforge_scoring::ScoreDirector;

use super::random::SelectionRandom;
use super::MoveSelector;
use crate::heuristic::r#move::Move;

/// Yields a list of moves given up front.
///
/// The list is its own cache, valid for the whole solve.
#[derive(Debug, Clone)]
pub struct FixedMoveSelector<M> {
    moves: Vec<M>,
    random: Option<SelectionRandom>,
}

impl<M> FixedMoveSelector<M> {
    pub fn new(moves: Vec<M>) -> Self {
        Self {
            moves,
            random: None,
        }
    }

    pub fn with_random_selection(mut self, seed: u64) -> Self {
        self.random = Some(SelectionRandom::new(seed));
        self
    }

    pub fn moves(&self) -> &[M] {
        &self.moves
    }
}

impl<S, D, M> MoveSelector<S, D, M> for FixedMoveSelector<M>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    fn iter_moves<'a>(&'a mut self, _score_director: &D) -> Box<dyn Iterator<Item = M> + 'a> {
        let moves = &self.moves;
        match self.random.as_mut() {
            None => Box::new(moves.iter().cloned()),
            Some(_) if moves.is_empty() => Box::new(std::iter::empty()),
            Some(random) => Box::new(std::iter::from_fn(move || {
                let index = random.rng().random_range(0..moves.len());
                Some(moves[index].clone())
            })),
        }
    }

    fn size(&self, _score_director: &D) -> usize {
        self.moves.len()
    }

    fn is_never_ending(&self) -> bool {
        self.random.is_some()
    }

    fn cache_type(&self) -> SelectionCacheType {
        SelectionCacheType::Solver
    }

    fn supports_phase_and_solver_caching(&self) -> bool {
        true
    }

    fn step_started(&mut self, _score_director: &D) {
        if let Some(random) = self.random.as_mut() {
            random.step_started();
        }
    }
}
