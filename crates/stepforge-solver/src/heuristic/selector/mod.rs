//! Move selectors.
//!
//! A selector tree is built from a [`MoveSelectorConfig`] by the
//! [`MoveSelectorFactory`]: base selectors generate moves, decorators
//! filter, sort, weight, shuffle, cache and limit them.
//!
//! [`MoveSelectorConfig`]: stepforge_config::MoveSelectorConfig

mod base;
mod change;
pub mod decorator;
mod factory;
mod fixed;
mod hooks;
mod random;
mod swap;
mod typed_move_selector;

#[cfg(test)]
mod tests;

pub use base::{BaseMoveSelectorBuilder, BasicVariableMoveSelectors};
pub use change::{ChangeMoveSelector, ValueRange};
pub use factory::MoveSelectorFactory;
pub use fixed::FixedMoveSelector;
pub use hooks::{
    MoveComparator, MoveFilter, MoveListSorter, MoveProbabilityWeight, MoveSorterWeight,
    SelectionHooks,
};
pub use random::SelectionRandom;
pub use stepforge_config::{SelectionCacheType, SelectionOrder, SorterOrder};
pub use swap::SwapMoveSelector;
pub use typed_move_selector::MoveSelector;
