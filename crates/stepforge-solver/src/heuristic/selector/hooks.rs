//! Named filter, sorter and weight functions referenced by selector configs.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use stepforge_core::{Result, StepforgeError};

/// Accepts or rejects a move.
pub type MoveFilter<M> = fn(&M) -> bool;

/// Total order between two moves.
pub type MoveComparator<M> = fn(&M, &M) -> Ordering;

/// Sort key of a move, smallest first in ascending order.
pub type MoveSorterWeight<S, M> = fn(&S, &M) -> i64;

/// Reorders a list of moves in place.
pub type MoveListSorter<S, M> = fn(&S, &mut Vec<M>);

/// Relative probability of picking a move. Negative weights count as zero.
pub type MoveProbabilityWeight<S, M> = fn(&S, &M) -> f64;

/// Registry the selector factory resolves config names against.
///
/// ```
/// use stepforge_solver::heuristic::selector::SelectionHooks;
///
/// let hooks: SelectionHooks<(), u32> = SelectionHooks::new()
///     .with_filter("even", |m: &u32| m % 2 == 0)
///     .with_comparator("natural", |a: &u32, b: &u32| a.cmp(b));
///
/// assert!(hooks.filter("even").is_ok());
/// assert!(hooks.filter("odd").is_err());
/// ```
pub struct SelectionHooks<S, M> {
    filters: HashMap<String, MoveFilter<M>>,
    comparators: HashMap<String, MoveComparator<M>>,
    sorter_weights: HashMap<String, MoveSorterWeight<S, M>>,
    sorters: HashMap<String, MoveListSorter<S, M>>,
    probability_weights: HashMap<String, MoveProbabilityWeight<S, M>>,
}

impl<S, M> SelectionHooks<S, M> {
    pub fn new() -> Self {
        Self {
            filters: HashMap::new(),
            comparators: HashMap::new(),
            sorter_weights: HashMap::new(),
            sorters: HashMap::new(),
            probability_weights: HashMap::new(),
        }
    }

    pub fn with_filter(mut self, name: impl Into<String>, filter: MoveFilter<M>) -> Self {
        self.filters.insert(name.into(), filter);
        self
    }

    pub fn with_comparator(
        mut self,
        name: impl Into<String>,
        comparator: MoveComparator<M>,
    ) -> Self {
        self.comparators.insert(name.into(), comparator);
        self
    }

    pub fn with_sorter_weight(
        mut self,
        name: impl Into<String>,
        weight: MoveSorterWeight<S, M>,
    ) -> Self {
        self.sorter_weights.insert(name.into(), weight);
        self
    }

    pub fn with_sorter(mut self, name: impl Into<String>, sorter: MoveListSorter<S, M>) -> Self {
        self.sorters.insert(name.into(), sorter);
        self
    }

    pub fn with_probability_weight(
        mut self,
        name: impl Into<String>,
        weight: MoveProbabilityWeight<S, M>,
    ) -> Self {
        self.probability_weights.insert(name.into(), weight);
        self
    }

    pub fn filter(&self, name: &str) -> Result<MoveFilter<M>> {
        lookup(&self.filters, "filter", name)
    }

    pub fn comparator(&self, name: &str) -> Result<MoveComparator<M>> {
        lookup(&self.comparators, "sorter_comparator", name)
    }

    pub fn sorter_weight(&self, name: &str) -> Result<MoveSorterWeight<S, M>> {
        lookup(&self.sorter_weights, "sorter_weight_factory", name)
    }

    pub fn sorter(&self, name: &str) -> Result<MoveListSorter<S, M>> {
        lookup(&self.sorters, "sorter", name)
    }

    pub fn probability_weight(&self, name: &str) -> Result<MoveProbabilityWeight<S, M>> {
        lookup(&self.probability_weights, "probability_weight_factory", name)
    }
}

fn lookup<F: Copy>(registry: &HashMap<String, F>, kind: &str, name: &str) -> Result<F> {
    registry.get(name).copied().ok_or_else(|| {
        let mut known: Vec<&str> = registry.keys().map(String::as_str).collect();
        known.sort_unstable();
        StepforgeError::Config(format!(
            "The {} ({}) is not registered. Registered names: {:?}.",
            kind, name, known
        ))
    })
}

impl<S, M> Default for SelectionHooks<S, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, M> fmt::Debug for SelectionHooks<S, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |registry: Vec<&String>| {
            let mut names: Vec<String> = registry.into_iter().cloned().collect();
            names.sort_unstable();
            names
        };
        f.debug_struct("SelectionHooks")
            .field("filters", &names(self.filters.keys().collect()))
            .field("comparators", &names(self.comparators.keys().collect()))
            .field("sorter_weights", &names(self.sorter_weights.keys().collect()))
            .field("sorters", &names(self.sorters.keys().collect()))
            .field(
                "probability_weights",
                &names(self.probability_weights.keys().collect()),
            )
            .finish()
    }
}
