//! Builders for the base selectors at the leaves of a selector tree.

use std::fmt;

use stepforge_config::MoveSelectorKind;
use stepforge_core::domain::PlanningSolution;
use stepforge_core::{Result, StepforgeError};
use stepforge_scoring::ScoreDirector;

use super::change::{ChangeMoveSelector, ValueRange};
use super::swap::SwapMoveSelector;
use super::MoveSelector;
use crate::heuristic::r#move::{ChangeMove, Move, MoveValue, SwapMove};

/// Turns a leaf of a selector config into a selector.
///
/// Unions are assembled by the factory itself; a builder only sees the
/// leaf kinds.
pub trait BaseMoveSelectorBuilder<S, D, M>: Send + Sync
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    fn build_base(
        &self,
        kind: &MoveSelectorKind,
        random_selection: bool,
        seed: u64,
    ) -> Result<Box<dyn MoveSelector<S, D, M>>>;

    /// Returns true if the selector for `kind` keeps its moves for the
    /// whole solve anyway, so random picks can happen on the base itself.
    fn is_base_inherently_cached(&self, _kind: &MoveSelectorKind) -> bool {
        false
    }
}

/// Change and swap selectors for a single basic planning variable.
pub struct BasicVariableMoveSelectors<S, V> {
    getter: fn(&S, usize) -> Option<V>,
    setter: fn(&mut S, usize, Option<V>),
    entity_count: fn(&S) -> usize,
    values: ValueRange<S, V>,
    descriptor_index: usize,
    variable_name: &'static str,
}

impl<S, V> BasicVariableMoveSelectors<S, V> {
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
        }
    }

    fn check_variable(&self, requested: Option<&str>) -> Result<()> {
        match requested {
            Some(name) if name != self.variable_name => Err(StepforgeError::Config(format!(
                "The variable_name ({}) does not match the planning variable ({}).",
                name, self.variable_name
            ))),
            _ => Ok(()),
        }
    }
}

impl<S, V: fmt::Debug> fmt::Debug for BasicVariableMoveSelectors<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicVariableMoveSelectors")
            .field("descriptor_index", &self.descriptor_index)
            .field("variable_name", &self.variable_name)
            .field("values", &self.values)
            .finish()
    }
}

impl<S, D, M, V> BaseMoveSelectorBuilder<S, D, M> for BasicVariableMoveSelectors<S, V>
where
    S: PlanningSolution,
    D: ScoreDirector<S> + 'static,
    M: Move<S> + From<ChangeMove<S, V>> + From<SwapMove<S, V>>,
    V: MoveValue,
{
    fn build_base(
        &self,
        kind: &MoveSelectorKind,
        random_selection: bool,
        seed: u64,
    ) -> Result<Box<dyn MoveSelector<S, D, M>>> {
        match kind {
            MoveSelectorKind::ChangeMoveSelector(config) => {
                self.check_variable(config.variable_name.as_deref())?;
                let selector = ChangeMoveSelector::new(
                    self.getter,
                    self.setter,
                    self.entity_count,
                    self.values.clone(),
                    self.descriptor_index,
                    self.variable_name,
                );
                Ok(if random_selection {
                    Box::new(selector.with_random_selection(seed))
                } else {
                    Box::new(selector)
                })
            }
            MoveSelectorKind::SwapMoveSelector(config) => {
                self.check_variable(config.variable_name.as_deref())?;
                let selector = SwapMoveSelector::new(
                    self.getter,
                    self.setter,
                    self.entity_count,
                    self.descriptor_index,
                    self.variable_name,
                );
                Ok(if random_selection {
                    Box::new(selector.with_random_selection(seed))
                } else {
                    Box::new(selector)
                })
            }
            MoveSelectorKind::UnionMoveSelector(_) => Err(StepforgeError::Config(
                "A union move selector has no base selector of its own.".to_string(),
            )),
        }
    }
}
