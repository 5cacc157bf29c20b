//! SwapMove - exchanges the values of two entities.

use std::fmt::{self, Debug};

use serde::{Deserialize, Serialize};
use stepforge_core::domain::PlanningSolution;
use stepforge_scoring::ScoreDirector;

use super::{ChangeUndo, Move, MoveValue};

/// A move that swaps one variable's values between two entities.
pub struct SwapMove<S, V> {
    entity_indices: [usize; 2],
    getter: fn(&S, usize) -> Option<V>,
    setter: fn(&mut S, usize, Option<V>),
    variable_name: &'static str,
    descriptor_index: usize,
}

/// Reverts a [`SwapMove`]: both entities get their old value back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapUndo<V> {
    pub left: ChangeUndo<V>,
    pub right: ChangeUndo<V>,
}

impl<V: MoveValue> SwapUndo<V> {
    pub(crate) fn restore<S, D>(
        self,
        setter: fn(&mut S, usize, Option<V>),
        variable_name: &str,
        score_director: &mut D,
    ) where
        S: PlanningSolution,
        D: ScoreDirector<S>,
    {
        self.left.restore(setter, variable_name, score_director);
        self.right.restore(setter, variable_name, score_director);
    }
}

impl<S, V> Clone for SwapMove<S, V> {
    fn clone(&self) -> Self {
        Self {
            entity_indices: self.entity_indices,
            getter: self.getter,
            setter: self.setter,
            variable_name: self.variable_name,
            descriptor_index: self.descriptor_index,
        }
    }
}

impl<S, V> Debug for SwapMove<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwapMove")
            .field("left_entity_index", &self.entity_indices[0])
            .field("right_entity_index", &self.entity_indices[1])
            .field("descriptor_index", &self.descriptor_index)
            .field("variable_name", &self.variable_name)
            .finish()
    }
}

impl<S, V> SwapMove<S, V> {
    pub fn new(
        left_entity_index: usize,
        right_entity_index: usize,
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        variable_name: &'static str,
        descriptor_index: usize,
    ) -> Self {
        Self {
            entity_indices: [left_entity_index, right_entity_index],
            getter,
            setter,
            variable_name,
            descriptor_index,
        }
    }

    pub fn left_entity_index(&self) -> usize {
        self.entity_indices[0]
    }

    pub fn right_entity_index(&self) -> usize {
        self.entity_indices[1]
    }

    pub(crate) fn setter(&self) -> fn(&mut S, usize, Option<V>) {
        self.setter
    }

    fn assign<D>(&self, score_director: &mut D, entity_index: usize, value: Option<V>) -> ChangeUndo<V>
    where
        S: PlanningSolution,
        V: MoveValue,
        D: ScoreDirector<S>,
    {
        let old_value = (self.getter)(score_director.working_solution(), entity_index);
        score_director.before_variable_changed(
            self.descriptor_index,
            entity_index,
            self.variable_name,
        );
        (self.setter)(score_director.working_solution_mut(), entity_index, value);
        score_director.after_variable_changed(
            self.descriptor_index,
            entity_index,
            self.variable_name,
        );
        ChangeUndo {
            descriptor_index: self.descriptor_index,
            entity_index,
            old_value,
        }
    }
}

impl<S, V> Move<S> for SwapMove<S, V>
where
    S: PlanningSolution,
    V: MoveValue,
{
    type Undo = SwapUndo<V>;

    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        let [left, right] = self.entity_indices;
        if left == right {
            return false;
        }
        let solution = score_director.working_solution();
        (self.getter)(solution, left) != (self.getter)(solution, right)
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) -> SwapUndo<V> {
        let [left, right] = self.entity_indices;
        let left_value = (self.getter)(score_director.working_solution(), left);
        let right_value = (self.getter)(score_director.working_solution(), right);

        let left_undo = self.assign(score_director, left, right_value);
        let right_undo = self.assign(score_director, right, left_value);
        SwapUndo {
            left: left_undo,
            right: right_undo,
        }
    }

    fn undo_move<D: ScoreDirector<S>>(&self, undo: SwapUndo<V>, score_director: &mut D) {
        undo.restore(self.setter, self.variable_name, score_director);
    }

    fn descriptor_index(&self) -> usize {
        self.descriptor_index
    }

    fn entity_indices(&self) -> &[usize] {
        &self.entity_indices
    }

    fn variable_name(&self) -> &str {
        self.variable_name
    }
}
