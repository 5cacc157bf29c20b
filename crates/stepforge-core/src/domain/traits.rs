//! Core domain traits for defining planning problems.

use crate::score::Score;

/// Marker trait for planning solutions.
///
/// A planning solution holds the planning entities whose variables a local
/// search changes, together with the score of the last evaluation. Solutions
/// are cloned once per move thread, so cloning must produce a fully
/// independent copy.
///
/// # Example
///
/// ```
/// use stepforge_core::{PlanningSolution, SimpleScore};
///
/// #[derive(Clone)]
/// struct Schedule {
///     slots: Vec<Option<usize>>,
///     score: Option<SimpleScore>,
/// }
///
/// impl PlanningSolution for Schedule {
///     type Score = SimpleScore;
///
///     fn score(&self) -> Option<Self::Score> {
///         self.score
///     }
///
///     fn set_score(&mut self, score: Option<Self::Score>) {
///         self.score = score;
///     }
/// }
/// ```
pub trait PlanningSolution: Clone + Send + Sync + 'static {
    /// The score type used to evaluate this solution.
    type Score: Score;

    /// Returns the current score of this solution, if calculated.
    fn score(&self) -> Option<Self::Score>;

    /// Sets the score of this solution.
    fn set_score(&mut self, score: Option<Self::Score>);

    /// Returns true if all planning variables have been assigned.
    fn is_initialized(&self) -> bool {
        true
    }
}
