//! Moves and their undo records.
//!
//! A move changes planning variables through a score director and returns
//! an undo record describing the reverse change. Undo records are plain
//! data: applying one is an explicit call, never a captured closure.

mod change;
mod either;
mod swap;
mod traits;


pub use change::{ChangeMove, ChangeUndo};
pub use either::{EitherMove, EitherUndo};
pub use swap::{SwapMove, SwapUndo};
pub use traits::{Move, MoveValue};
