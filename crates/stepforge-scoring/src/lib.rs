//! Score directors own the working solution and compute its score.
//!
//! The search loop never touches a solution directly: every change goes
//! through a [`ScoreDirector`] so that the director knows which parts of the
//! score are stale.

pub mod director;

pub use director::{ScoreDirector, SimpleScoreDirector};
