//! EitherMove - a change or a swap over the same variable.
//!
//! Union selectors mixing change and swap moves need one concrete move type.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use stepforge_core::domain::PlanningSolution;
use stepforge_scoring::ScoreDirector;

use super::{ChangeMove, ChangeUndo, Move, MoveValue, SwapMove, SwapUndo};

pub enum EitherMove<S, V> {
    Change(ChangeMove<S, V>),
    Swap(SwapMove<S, V>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EitherUndo<V> {
    Change(ChangeUndo<V>),
    Swap(SwapUndo<V>),
}

impl<S, V: Debug> Debug for EitherMove<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EitherMove::Change(m) => m.fmt(f),
            EitherMove::Swap(m) => m.fmt(f),
        }
    }
}

impl<S, V: Clone> Clone for EitherMove<S, V> {
    fn clone(&self) -> Self {
        match self {
            EitherMove::Change(m) => EitherMove::Change(m.clone()),
            EitherMove::Swap(m) => EitherMove::Swap(m.clone()),
        }
    }
}

impl<S, V> From<ChangeMove<S, V>> for EitherMove<S, V> {
    fn from(m: ChangeMove<S, V>) -> Self {
        EitherMove::Change(m)
    }
}

impl<S, V> From<SwapMove<S, V>> for EitherMove<S, V> {
    fn from(m: SwapMove<S, V>) -> Self {
        EitherMove::Swap(m)
    }
}

impl<S, V> Move<S> for EitherMove<S, V>
where
    S: PlanningSolution,
    V: MoveValue,
{
    type Undo = EitherUndo<V>;

    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool {
        match self {
            EitherMove::Change(m) => m.is_doable(score_director),
            EitherMove::Swap(m) => m.is_doable(score_director),
        }
    }

    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) -> EitherUndo<V> {
        match self {
            EitherMove::Change(m) => EitherUndo::Change(m.do_move(score_director)),
            EitherMove::Swap(m) => EitherUndo::Swap(m.do_move(score_director)),
        }
    }

    // Both variants write through the same setter, so the record applies
    // whichever variant produced it.
    fn undo_move<D: ScoreDirector<S>>(&self, undo: EitherUndo<V>, score_director: &mut D) {
        let setter = match self {
            EitherMove::Change(m) => m.setter(),
            EitherMove::Swap(m) => m.setter(),
        };
        let variable_name = self.variable_name();
        match undo {
            EitherUndo::Change(u) => u.restore(setter, variable_name, score_director),
            EitherUndo::Swap(u) => u.restore(setter, variable_name, score_director),
        }
    }

    fn descriptor_index(&self) -> usize {
        match self {
            EitherMove::Change(m) => m.descriptor_index(),
            EitherMove::Swap(m) => m.descriptor_index(),
        }
    }

    fn entity_indices(&self) -> &[usize] {
        match self {
            EitherMove::Change(m) => m.entity_indices(),
            EitherMove::Swap(m) => m.entity_indices(),
        }
    }

    fn variable_name(&self) -> &str {
        match self {
            EitherMove::Change(m) => m.variable_name(),
            EitherMove::Swap(m) => m.variable_name(),
        }
    }
}
