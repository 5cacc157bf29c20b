//! Score director trait.

use stepforge_core::domain::PlanningSolution;

/// Owner of the mutable working solution.
///
/// Moves notify the director around each variable change through
/// [`before_variable_changed`](ScoreDirector::before_variable_changed) and
/// [`after_variable_changed`](ScoreDirector::after_variable_changed); the
/// director uses those notifications to keep its score up to date.
///
/// Move threads get their own director through
/// [`clone_for_thread`](ScoreDirector::clone_for_thread), so a director is
/// never shared between threads.
pub trait ScoreDirector<S: PlanningSolution>: Send {
    /// Returns the working solution.
    fn working_solution(&self) -> &S;

    /// Returns a mutable reference to the working solution.
    fn working_solution_mut(&mut self) -> &mut S;

    /// Calculates the score of the working solution, incrementally if possible.
    fn calculate_score(&mut self) -> S::Score;

    /// Calculates the score ignoring any incremental state.
    ///
    /// Diagnostic environment modes compare this against
    /// [`calculate_score`](ScoreDirector::calculate_score) to detect corrupted
    /// incremental state.
    fn calculate_score_from_scratch(&mut self) -> S::Score {
        self.calculate_score()
    }

    /// Clones the working solution.
    fn clone_working_solution(&self) -> S;

    /// Called before a planning variable is changed.
    fn before_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    );

    /// Called after a planning variable is changed.
    fn after_variable_changed(
        &mut self,
        descriptor_index: usize,
        entity_index: usize,
        variable_name: &str,
    );

    /// Number of score calculations done by this director.
    fn calculation_count(&self) -> u64;

    /// Creates an independent director over a copy of the working solution.
    ///
    /// The copy must not share mutable state with `self`.
    fn clone_for_thread(&self) -> Self
    where
        Self: Sized;

    /// Releases resources held by this director.
    fn close(&mut self) {}

    /// Returns true if this director calculates scores incrementally.
    fn is_incremental(&self) -> bool {
        false
    }
}
