//! Domain model traits.

mod traits;

pub use traits::PlanningSolution;
