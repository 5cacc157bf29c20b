//! Simple score director with full recalculation.

use std::fmt::{self, Debug};

use stepforge_core::domain::PlanningSolution;

use super::traits::ScoreDirector;

/// A score director that recalculates the full score whenever the working
/// solution changed since the last calculation.
///
/// The calculator is a concrete generic parameter. It must be `Clone` so
/// that move threads can each get their own director.
///
/// # Example
///
/// ```
/// use stepforge_core::{PlanningSolution, SimpleScore};
/// use stepforge_scoring::{ScoreDirector, SimpleScoreDirector};
///
/// #[derive(Clone)]
/// struct Counter {
///     value: i64,
///     score: Option<SimpleScore>,
/// }
///
/// impl PlanningSolution for Counter {
///     type Score = SimpleScore;
///     fn score(&self) -> Option<SimpleScore> { self.score }
///     fn set_score(&mut self, score: Option<SimpleScore>) { self.score = score; }
/// }
///
/// let mut director = SimpleScoreDirector::new(
///     Counter { value: -4, score: None },
///     |c: &Counter| SimpleScore::of(c.value),
/// );
/// assert_eq!(director.calculate_score(), SimpleScore::of(-4));
/// ```
pub struct SimpleScoreDirector<S: PlanningSolution, C> {
    working_solution: S,
    score_calculator: C,
    score_dirty: bool,
    cached_score: Option<S::Score>,
    calculation_count: u64,
}

impl<S, C> SimpleScoreDirector<S, C>
where
    S: PlanningSolution,
    C: Fn(&S) -> S::Score + Send + Clone,
{
    pub fn new(solution: S, score_calculator: C) -> Self {
        SimpleScoreDirector {
            working_solution: solution,
            score_calculator,
            score_dirty: true,
            cached_score: None,
            calculation_count: 0,
        }
    }

    /// Consumes the director, returning the working solution.
    pub fn into_working_solution(self) -> S {
        self.working_solution
    }

    fn mark_dirty(&mut self) {
        self.score_dirty = true;
    }

    fn recalculate(&mut self) -> S::Score {
        self.calculation_count += 1;
        (self.score_calculator)(&self.working_solution)
    }
}

impl<S, C> ScoreDirector<S> for SimpleScoreDirector<S, C>
where
    S: PlanningSolution,
    C: Fn(&S) -> S::Score + Send + Clone,
{
    fn working_solution(&self) -> &S {
        &self.working_solution
    }

    fn working_solution_mut(&mut self) -> &mut S {
        self.mark_dirty();
        &mut self.working_solution
    }

    fn calculate_score(&mut self) -> S::Score {
        if !self.score_dirty {
            if let Some(score) = self.cached_score {
                return score;
            }
        }

        let score = self.recalculate();
        self.working_solution.set_score(Some(score));
        self.cached_score = Some(score);
        self.score_dirty = false;
        score
    }

    // Bypasses the cache, so a change made without notification shows up
    // as a mismatch.
    fn calculate_score_from_scratch(&mut self) -> S::Score {
        self.recalculate()
    }

    fn clone_working_solution(&self) -> S {
        self.working_solution.clone()
    }

    fn before_variable_changed(
        &mut self,
        _descriptor_index: usize,
        _entity_index: usize,
        _variable_name: &str,
    ) {
        self.mark_dirty();
    }

    fn after_variable_changed(
        &mut self,
        _descriptor_index: usize,
        _entity_index: usize,
        _variable_name: &str,
    ) {
        // Already marked dirty in before_variable_changed
    }

    fn calculation_count(&self) -> u64 {
        self.calculation_count
    }

    fn clone_for_thread(&self) -> Self {
        SimpleScoreDirector {
            working_solution: self.working_solution.clone(),
            score_calculator: self.score_calculator.clone(),
            score_dirty: self.score_dirty,
            cached_score: self.cached_score,
            calculation_count: 0,
        }
    }
}

impl<S: PlanningSolution, C> Debug for SimpleScoreDirector<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleScoreDirector")
            .field("score_dirty", &self.score_dirty)
            .field("cached_score", &self.cached_score)
            .field("calculation_count", &self.calculation_count)
            .finish()
    }
}
