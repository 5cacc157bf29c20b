//! Heuristic components for solving
//!
//! This module contains:
//! - Moves: Operations that modify planning variables, with undo records
//! - Selectors: Components that generate, decorate and order moves

pub mod r#move;
pub mod selector;

// Re-export move types
pub use r#move::{ChangeMove, EitherMove, Move, MoveValue, SwapMove};

// Re-export selector types
pub use selector::{
    BaseMoveSelectorBuilder, BasicVariableMoveSelectors, ChangeMoveSelector, FixedMoveSelector,
    MoveSelector, MoveSelectorFactory, SelectionHooks, SwapMoveSelector, ValueRange,
};
