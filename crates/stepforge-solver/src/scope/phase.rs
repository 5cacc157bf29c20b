//! Phase-level scope.

use std::time::{Duration, Instant};

use stepforge_core::domain::PlanningSolution;
use stepforge_scoring::ScoreDirector;

use super::SolverScope;

/// Scope for a single phase of solving.
pub struct PhaseScope<'a, S: PlanningSolution, D: ScoreDirector<S>> {
    solver_scope: &'a mut SolverScope<S, D>,
    phase_index: usize,
    starting_score: S::Score,
    last_completed_step_score: S::Score,
    step_count: u64,
    best_improved_step_count: u64,
    move_evaluation_count: u64,
    start_time: Instant,
}

impl<'a, S: PlanningSolution, D: ScoreDirector<S>> PhaseScope<'a, S, D> {
    pub fn new(solver_scope: &'a mut SolverScope<S, D>, phase_index: usize) -> Self {
        let starting_score = solver_scope.calculate_score();
        Self {
            solver_scope,
            phase_index,
            starting_score,
            last_completed_step_score: starting_score,
            step_count: 0,
            best_improved_step_count: 0,
            move_evaluation_count: 0,
            start_time: Instant::now(),
        }
    }

    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    /// Score of the working solution when this phase started.
    pub fn starting_score(&self) -> S::Score {
        self.starting_score
    }

    /// Score of the working solution after the last committed step.
    pub fn last_completed_step_score(&self) -> S::Score {
        self.last_completed_step_score
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Number of steps completed in this phase.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Steps taken in this phase since the best score last improved.
    pub fn unimproved_step_count(&self) -> u64 {
        self.step_count - self.best_improved_step_count
    }

    pub fn move_evaluation_count(&self) -> u64 {
        self.move_evaluation_count
    }

    pub fn add_move_evaluation_count(&mut self, count: u64) {
        self.move_evaluation_count += count;
        self.solver_scope.add_move_evaluation_count(count);
    }

    /// Seals a committed step: advances the counters and updates the best solution.
    pub fn complete_step(&mut self, step_score: S::Score) {
        self.step_count += 1;
        self.solver_scope.increment_step_count();
        self.last_completed_step_score = step_score;
        if self.solver_scope.update_best_solution() {
            self.best_improved_step_count = self.step_count;
        }
    }

    pub fn best_score(&self) -> Option<&S::Score> {
        self.solver_scope.best_score()
    }

    pub fn solver_scope(&self) -> &SolverScope<S, D> {
        self.solver_scope
    }

    pub fn solver_scope_mut(&mut self) -> &mut SolverScope<S, D> {
        self.solver_scope
    }

    pub fn score_director(&self) -> &D {
        self.solver_scope.score_director()
    }

    pub fn score_director_mut(&mut self) -> &mut D {
        self.solver_scope.score_director_mut()
    }

    pub fn calculate_score(&mut self) -> S::Score {
        self.solver_scope.calculate_score()
    }
}
