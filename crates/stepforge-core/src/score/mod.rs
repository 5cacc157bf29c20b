//! Score types for representing solution quality.
//!
//! Higher scores are better. Scores are small `Copy` values so that move
//! threads can hand them back to the deciding thread without allocation.

#[macro_use]
mod macros;

mod hard_soft;
mod simple;
mod traits;

#[cfg(test)]
mod tests;

pub use hard_soft::HardSoftScore;
pub use simple::SimpleScore;
pub use traits::{ParseableScore, Score, ScoreParseError};
