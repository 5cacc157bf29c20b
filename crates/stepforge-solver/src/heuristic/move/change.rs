//! ChangeMove - assigns a value to a planning variable.

use std::fmt::{self, Debug};

use serde::{Deserialize, Serialize};
use stepforge_core::domain::PlanningSolution;
use stepforge_scoring::ScoreDirector;

use super::{Move, MoveValue};

/// A move that assigns a value to an entity's variable.
///
/// The variable is reached through typed function pointers, so the move
/// stays `Copy`-cheap to clone and never erases the solution type.
pub struct ChangeMove<S, V> {
    entity_index: [usize; 1],
    to_value: Option<V>,
    getter: fn(&S, usize) -> Option<V>,
    setter: fn(&mut S, usize, Option<V>),
    variable_name: &'static str,
    descriptor_index: usize,
}

/// Reverts a [`ChangeMove`] by restoring the previous value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeUndo<V> {
    pub descriptor_index: usize,
    pub entity_index: usize,
    pub old_value: Option<V>,
}

impl<V: MoveValue> ChangeUndo<V> {
    pub(crate) fn restore<S, D>(
        self,
        setter: fn(&mut S, usize, Option<V>),
        variable_name: &str,
        score_director: &mut D,
    ) where
        S: PlanningSolution,
        D: ScoreDirector<S>,
    {
        score_director.before_variable_changed(
            self.descriptor_index,
            self.entity_index,
            variable_name,
        );
        setter(
            score_director.working_solution_mut(),
            self.entity_index,
            self.old_value,
        );
        score_director.after_variable_changed(
            self.descriptor_index,
            self.entity_index,
            variable_name,
        );
    }
}

impl<S, V: Clone> Clone for ChangeMove<S, V> {
    fn clone(&self) -> Self {
        Self {
            entity_index: self.entity_index,
            to_value: self.to_value.clone(),
            getter: self.getter,
            setter: self.setter,
            variable_name: self.variable_name,
            descriptor_index: self.descriptor_index,
        }
    }
}

impl<S, V: Debug> Debug for ChangeMove<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeMove")
            .field("entity_index", &self.entity_index[0])
            .field("descriptor_index", &self.descriptor_index)
            .field("variable_name", &self.variable_name)
            .field("to_value", &self.to_value)
            .finish()
    }
}

impl<S, V> ChangeMove<S, V> {
    pub fn new(
        entity_index: usize,
        to_value: Option<V>,
        getter: fn(&S, usize) -> Option<V>,
        setter: fn(&mut S, usize, Option<V>),
        variable_name: &'static str,
        descriptor_index: usize,
    ) -> Self {
        Self {
            entity_index: [entity_index],
            to_value,
            getter,
            setter,
            variable_name,
            descriptor_index,
        }
    }

    pub fn entity_index(&self) -> usize {
        self.entity_index[0]
    }

    pub fn to_value(&self) -> Option<&V> {
        self.to_value.as_ref()
    }

    pub(crate) fn setter(&self) -> fn(&mut S, usize, Option<V>) {
        self.setter
    }
}

impl<S, V> Move<S> for ChangeMove<S, V>
where
    S: PlanningSolution,
    V: MoveValue,
{
    type Undo = ChangeUndo<V>;

    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        let current = (self.getter)(score_director.working_solution(), self.entity_index[0]);
        current != self.to_value
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) -> ChangeUndo<V> {
        let entity_index = self.entity_index[0];
        let old_value = (self.getter)(score_director.working_solution(), entity_index);

        score_director.before_variable_changed(
            self.descriptor_index,
            entity_index,
            self.variable_name,
        );
        (self.setter)(
            score_director.working_solution_mut(),
            entity_index,
            self.to_value.clone(),
        );
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

    fn undo_move<D: ScoreDirector<S>>(&self, undo: ChangeUndo<V>, score_director: &mut D) {
        undo.restore(self.setter, self.variable_name, score_director);
    }

    fn descriptor_index(&self) -> usize {
        self.descriptor_index
    }

    fn entity_indices(&self) -> &[usize] {
        &self.entity_index
    }

    fn variable_name(&self) -> &str {
        self.variable_name
    }
}
