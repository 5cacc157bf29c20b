//! stepforge core - score types, domain traits and the error taxonomy.
//!
//! Every other crate in the workspace builds on the abstractions here:
//! - [`Score`] implementations compare candidate solutions
//! - [`PlanningSolution`] is the mutable state a local search improves
//! - [`StepforgeError`] classifies everything that can abort a solve

pub mod domain;
pub mod error;
pub mod score;

pub use domain::PlanningSolution;
pub use error::{Result, StepforgeError};
pub use score::{HardSoftScore, ParseableScore, Score, ScoreParseError, SimpleScore};
