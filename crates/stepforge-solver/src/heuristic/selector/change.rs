//! Change move selector for one basic planning variable.

use std::fmt::{self, Debug};

use rand::Rng;
use stepforge_core::domain::PlanningSolution;
use stepforge_scoring::ScoreDirector;

use super::random::SelectionRandom;
use super::MoveSelector;
use crate::heuristic::r#move::{ChangeMove, Move, MoveValue};

/// Where the candidate values of a variable come from.
pub enum ValueRange<S, V> {
    /// The same values for every solution.
    Fixed(Vec<V>),
    /// Values read from the working solution.
    FromSolution(fn(&S) -> Vec<V>),
}

impl<S, V: Clone> ValueRange<S, V> {
    fn resolve(&self, solution: &S) -> Vec<V> {
        match self {
            ValueRange::Fixed(values) => values.clone(),
            ValueRange::FromSolution(extract) => extract(solution),
        }
    }
}

impl<S, V: Clone> Clone for ValueRange<S, V> {
    fn clone(&self) -> Self {
        match self {
            ValueRange::Fixed(values) => ValueRange::Fixed(values.clone()),
            ValueRange::FromSolution(extract) => ValueRange::FromSolution(*extract),
        }
    }
}

impl<S, V: Debug> Debug for ValueRange<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueRange::Fixed(values) => f.debug_tuple("Fixed").field(values).finish(),
            ValueRange::FromSolution(_) => f.write_str("FromSolution"),
        }
    }
}

/// Generates a [`ChangeMove`] for every (entity, value) pair.
///
/// In original order the moves go entity by entity, values in range order.
/// In random order every pick is an independent (entity, value) draw and
/// the selector never runs dry.
pub struct ChangeMoveSelector<S, V> {
    getter: fn(&S, usize) -> Option<V>,
    setter: fn(&mut S, usize, Option<V>),
    entity_count: fn(&S) -> usize,
    values: ValueRange<S, V>,
    descriptor_index: usize,
    variable_name: &'static str,
    random: Option<SelectionRandom>,
}

impl<S, V: Debug> Debug for ChangeMoveSelector<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeMoveSelector")
            .field("descriptor_index", &self.descriptor_index)
            .field("variable_name", &self.variable_name)
            .field("values", &self.values)
            .field("random", &self.random.is_some())
            .finish()
    }
}

impl<S, V> ChangeMoveSelector<S, V> {
    pub fn new(
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        entity_count: fn(&S) -> usize,
        values: ValueRange<S, V>,
        descriptor_index: usize,
        variable_name: &'static str,
    ) -> Self {
        Self {
            getter,
            setter,
            entity_count,
            values,
            descriptor_index,
            variable_name,
            random: None,
        }
    }

    /// Switches to independent random picks seeded with `seed`.
    pub fn with_random_selection(mut self, seed: u64) -> Self {
        self.random = Some(SelectionRandom::new(seed));
        self
    }
}

impl<S, D, M, V> MoveSelector<S, D, M> for ChangeMoveSelector<S, V>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S> + From<ChangeMove<S, V>>,
    V: MoveValue,
{
    fn iter_moves<'a>(&'a mut self, score_director: &D) -> Box<dyn Iterator<Item = M> + 'a> {
        let solution = score_director.working_solution();
        let entity_count = (self.entity_count)(solution);
        let values = self.values.resolve(solution);
        let value_count = values.len();
        let (getter, setter) = (self.getter, self.setter);
        let (descriptor_index, variable_name) = (self.descriptor_index, self.variable_name);
        let make = move |entity_index: usize, value: V| {
            M::from(ChangeMove::new(
                entity_index,
                Some(value),
                getter,
                setter,
                variable_name,
                descriptor_index,
            ))
        };

        match self.random.as_mut() {
            None => Box::new(
                (0..entity_count * value_count)
                    .map(move |i| make(i / value_count, values[i % value_count].clone())),
            ),
            Some(_) if entity_count == 0 || value_count == 0 => Box::new(std::iter::empty()),
            Some(random) => Box::new(std::iter::from_fn(move || {
                let rng = random.rng();
                let entity_index = rng.random_range(0..entity_count);
                let value = values[rng.random_range(0..value_count)].clone();
                Some(make(entity_index, value))
            })),
        }
    }

    fn size(&self, score_director: &D) -> usize {
        let solution = score_director.working_solution();
        (self.entity_count)(solution) * self.values.resolve(solution).len()
    }

    fn is_never_ending(&self) -> bool {
        self.random.is_some()
    }

    fn supports_phase_and_solver_caching(&self) -> bool {
        matches!(self.values, ValueRange::Fixed(_))
    }

    fn step_started(&mut self, _score_director: &D) {
        if let Some(random) = self.random.as_mut() {
            random.step_started();
        }
    }
}
