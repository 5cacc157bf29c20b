use std::fmt;

use rand::Rng;
use stepforge_config::SelectionCacheType;
use stepforge_core::domain::PlanningSolution;
use stepforge_scoring::ScoreDirector;

use crate::heuristic::r#move::Move;
use crate::heuristic::selector::random::SelectionRandom;
use crate::heuristic::selector::MoveSelector;

/// Combines the moves of several child selectors.
///
/// In original order the children are concatenated. With random selection
/// each pick first chooses a child, weighted by its size, and a child that
/// runs dry is left out of later picks.
pub struct UnionMoveSelector<S, D, M> {
    children: Vec<Box<dyn MoveSelector<S, D, M>>>,
    random: Option<SelectionRandom>,
}

impl<S, D, M> UnionMoveSelector<S, D, M> {
    pub fn new(children: Vec<Box<dyn MoveSelector<S, D, M>>>) -> Self {
        Self {
            children,
            random: None,
        }
    }

    pub fn with_random_selection(mut self, seed: u64) -> Self {
        self.random = Some(SelectionRandom::new(seed));
        self
    }
}

impl<S, D, M> fmt::Debug for UnionMoveSelector<S, D, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnionMoveSelector")
            .field("children", &self.children)
            .field("random", &self.random.is_some())
            .finish()
    }
}

impl<S, D, M> MoveSelector<S, D, M> for UnionMoveSelector<S, D, M>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    fn iter_moves<'a>(&'a mut self, score_director: &D) -> Box<dyn Iterator<Item = M> + 'a> {
        let sizes: Vec<usize> = self
            .children
            .iter()
            .map(|child| child.size(score_director))
            .collect();
        let iterators: Vec<Box<dyn Iterator<Item = M> + 'a>> = self
            .children
            .iter_mut()
            .map(|child| child.iter_moves(score_director))
            .collect();

        let Some(random) = self.random.as_mut() else {
            return Box::new(iterators.into_iter().flatten());
        };

        let mut active: Vec<(usize, Box<dyn Iterator<Item = M> + 'a>)> = sizes
            .into_iter()
            .zip(iterators)
            .filter(|(size, _)| *size > 0)
            .collect();
        Box::new(std::iter::from_fn(move || {
            while !active.is_empty() {
                let total: usize = active.iter().map(|(size, _)| size).sum();
                let mut target = random.rng().random_range(0..total);
                let mut chosen = 0;
                for (i, (size, _)) in active.iter().enumerate() {
                    if target < *size {
                        chosen = i;
                        break;
                    }
                    target -= size;
                }
                match active[chosen].1.next() {
                    Some(m) => return Some(m),
                    None => {
                        active.remove(chosen);
                    }
                }
            }
            None
        }))
    }

    fn size(&self, score_director: &D) -> usize {
        self.children
            .iter()
            .map(|child| child.size(score_director))
            .sum()
    }

    fn is_never_ending(&self) -> bool {
        self.random.is_some() || self.children.iter().any(|child| child.is_never_ending())
    }

    fn cache_type(&self) -> SelectionCacheType {
        self.children
            .iter()
            .map(|child| child.cache_type())
            .min()
            .unwrap_or_default()
    }

    fn supports_phase_and_solver_caching(&self) -> bool {
        self.children
            .iter()
            .all(|child| child.supports_phase_and_solver_caching())
    }

    fn solving_started(&mut self, score_director: &D) {
        for child in &mut self.children {
            child.solving_started(score_director);
        }
    }

    fn phase_started(&mut self, score_director: &D) {
        for child in &mut self.children {
            child.phase_started(score_director);
        }
    }

    fn step_started(&mut self, score_director: &D) {
        if let Some(random) = self.random.as_mut() {
            random.step_started();
        }
        for child in &mut self.children {
            child.step_started(score_director);
        }
    }

    fn step_ended(&mut self) {
        for child in &mut self.children {
            child.step_ended();
        }
    }

    fn phase_ended(&mut self) {
        for child in &mut self.children {
            child.phase_ended();
        }
    }

    fn solving_ended(&mut self) {
        for child in &mut self.children {
            child.solving_ended();
        }
    }
}
