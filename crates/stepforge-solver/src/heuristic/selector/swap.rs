//! Swap move selector for one basic planning variable.

use std::fmt::{self, Debug};

use rand::Rng;
use stepforge_core::domain::PlanningSolution;
use stepforge_scoring::ScoreDirector;

use super::random::SelectionRandom;
use super::MoveSelector;
use crate::heuristic::r#move::{Move, MoveValue, SwapMove};

/// Generates a [`SwapMove`] for every unordered pair of distinct entities.
pub struct SwapMoveSelector<S, V> {
    getter: fn(&S, usize) -> Option<V>,
    setter: fn(&mut S, usize, Option<V>),
    entity_count: fn(&S) -> usize,
    descriptor_index: usize,
    variable_name: &'static str,
    random: Option<SelectionRandom>,
}

impl<S, V> Debug for SwapMoveSelector<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwapMoveSelector")
            .field("descriptor_index", &self.descriptor_index)
            .field("variable_name", &self.variable_name)
            .field("random", &self.random.is_some())
            .finish()
    }
}

impl<S, V> SwapMoveSelector<S, V> {
    pub fn new(
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        entity_count: fn(&S) -> usize,
        descriptor_index: usize,
        variable_name: &'static str,
    ) -> Self {
        Self {
            getter,
            setter,
            entity_count,
            descriptor_index,
            variable_name,
            random: None,
        }
    }

    pub fn with_random_selection(mut self, seed: u64) -> Self {
        self.random = Some(SelectionRandom::new(seed));
        self
    }
}

impl<S, D, M, V> MoveSelector<S, D, M> for SwapMoveSelector<S, V>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S> + From<SwapMove<S, V>>,
    V: MoveValue,
{
    fn iter_moves<'a>(&'a mut self, score_director: &D) -> Box<dyn Iterator<Item = M> + 'a> {
        let entity_count = (self.entity_count)(score_director.working_solution());
        let (getter, setter) = (self.getter, self.setter);
        let (descriptor_index, variable_name) = (self.descriptor_index, self.variable_name);
        let make = move |left: usize, right: usize| {
            M::from(SwapMove::new(
                left,
                right,
                getter,
                setter,
                variable_name,
                descriptor_index,
            ))
        };

        match self.random.as_mut() {
            None => Box::new((0..entity_count).flat_map(move |left| {
                (left + 1..entity_count).map(move |right| make(left, right))
            })),
            Some(_) if entity_count < 2 => Box::new(std::iter::empty()),
            Some(random) => Box::new(std::iter::from_fn(move || {
                let rng = random.rng();
                let left = rng.random_range(0..entity_count);
                let mut right = rng.random_range(0..entity_count - 1);
                if right >= left {
                    right += 1;
                }
                Some(make(left, right))
            })),
        }
    }

    fn size(&self, score_director: &D) -> usize {
        let n = (self.entity_count)(score_director.working_solution());
        n * n.saturating_sub(1) / 2
    }

    fn is_never_ending(&self) -> bool {
        self.random.is_some()
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
