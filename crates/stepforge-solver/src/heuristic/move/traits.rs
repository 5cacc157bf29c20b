//! Move trait definition.

use std::fmt::Debug;

use stepforge_core::domain::PlanningSolution;
use stepforge_scoring::ScoreDirector;

/// Bounds for a planning variable value carried by a move.
pub trait MoveValue: Clone + PartialEq + Debug + Send + Sync + 'static {}

impl<T: Clone + PartialEq + Debug + Send + Sync + 'static> MoveValue for T {}

/// A reversible change to one or more planning variables.
///
/// Moves are generic over the score director so the same move runs against
/// the solver thread's director and against a move thread's clone.
///
/// # Implementation Notes
/// - `do_move` returns everything needed to revert it; `undo_move` consumes
///   that record and must leave the solution exactly as before `do_move`
/// - Moves are cloned once per move thread when a step is applied, so they
///   should stay small
pub trait Move<S: PlanningSolution>: Clone + Send + Sync + Debug + 'static {
    /// Reverse delta produced by [`do_move`](Move::do_move).
    type Undo: Send + Debug;

    /// Returns true if this move changes anything in the current state.
    fn is_doable<D: ScoreDirector<S>>(&self, score_director: &D) -> bool;

    /// Executes this move, returning its undo record.
    fn do_move<D: ScoreDirector<S>>(&self, score_director: &mut D) -> Self::Undo;

    /// Reverts a previous [`do_move`](Move::do_move) of this move.
    fn undo_move<D: ScoreDirector<S>>(&self, undo: Self::Undo, score_director: &mut D);

    /// Translates this move to another director's working solution.
    ///
    /// Index-based moves are valid on every clone, so the default is a copy.
    fn rebase<D: ScoreDirector<S>>(&self, _destination: &D) -> Self {
        self.clone()
    }

    /// Returns the descriptor index of the entity type this move affects.
    fn descriptor_index(&self) -> usize;

    /// Returns the entity indices involved in this move.
    fn entity_indices(&self) -> &[usize];

    /// Returns the variable name this move affects.
    fn variable_name(&self) -> &str;
}
