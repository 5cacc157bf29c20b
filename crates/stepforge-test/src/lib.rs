//! Shared test fixtures for stepforge crates.
//!
//! Only data types and pure functions live here. The crate depends on
//! `stepforge-core` alone so that `stepforge-scoring` can use it as a
//! dev-dependency without a cycle.
//!
//! - [`nqueens`] - N-Queens board with a conflict-counting score
//! - [`task`] - tasks whose score is the sum of their priorities

pub mod nqueens;
pub mod task;

pub use nqueens::{NQueensSolution, Queen};
pub use task::{Task, TaskSolution};
