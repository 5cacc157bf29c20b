//! Solver-level scope.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use stepforge_core::domain::PlanningSolution;
use stepforge_scoring::ScoreDirector;

use crate::termination::Termination;

/// Top-level scope for the entire solving process.
///
/// Owns the score director of the solver thread. Move threads work on
/// clones of it and report their score calculation counts back here when
/// they shut down.
pub struct SolverScope<S: PlanningSolution, D: ScoreDirector<S>> {
    score_director: D,
    best_solution: Option<S>,
    best_score: Option<S::Score>,
    start_time: Option<Instant>,
    total_step_count: u64,
    best_improved_step_count: u64,
    move_evaluation_count: u64,
    child_thread_calculation_count: u64,
    terminate_early_flag: Option<Arc<AtomicBool>>,
    termination: Option<Box<dyn Termination<S, D>>>,
}

impl<S: PlanningSolution, D: ScoreDirector<S>> SolverScope<S, D> {
    pub fn new(score_director: D) -> Self {
        Self {
            score_director,
            best_solution: None,
            best_score: None,
            start_time: None,
            total_step_count: 0,
            best_improved_step_count: 0,
            move_evaluation_count: 0,
            child_thread_calculation_count: 0,
            terminate_early_flag: None,
            termination: None,
        }
    }

    /// Sets the termination checked for the whole solve.
    pub fn with_termination(mut self, termination: Box<dyn Termination<S, D>>) -> Self {
        self.termination = Some(termination);
        self
    }

    /// Removes the solver termination, leaving the solve unbounded.
    pub fn take_termination(&mut self) -> Option<Box<dyn Termination<S, D>>> {
        self.termination.take()
    }

    pub fn start_solving(&mut self) {
        self.start_time = Some(Instant::now());
        self.total_step_count = 0;
        self.best_improved_step_count = 0;
        self.move_evaluation_count = 0;
        self.child_thread_calculation_count = 0;
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.start_time.map(|t| t.elapsed())
    }

    pub fn score_director(&self) -> &D {
        &self.score_director
    }

    pub fn score_director_mut(&mut self) -> &mut D {
        &mut self.score_director
    }

    pub fn working_solution(&self) -> &S {
        self.score_director.working_solution()
    }

    pub fn calculate_score(&mut self) -> S::Score {
        self.score_director.calculate_score()
    }

    pub fn best_solution(&self) -> Option<&S> {
        self.best_solution.as_ref()
    }

    pub fn best_score(&self) -> Option<&S::Score> {
        self.best_score.as_ref()
    }

    /// Records the working solution as best if it beats the current best.
    ///
    /// Returns true if the best solution changed.
    pub fn update_best_solution(&mut self) -> bool {
        let current_score = self.score_director.calculate_score();
        let is_better = match &self.best_score {
            None => true,
            Some(best) => current_score > *best,
        };

        if is_better {
            let mut solution = self.score_director.clone_working_solution();
            solution.set_score(Some(current_score));
            self.best_solution = Some(solution);
            self.best_score = Some(current_score);
            self.best_improved_step_count = self.total_step_count;
        }
        is_better
    }

    pub fn increment_step_count(&mut self) -> u64 {
        self.total_step_count += 1;
        self.total_step_count
    }

    pub fn total_step_count(&self) -> u64 {
        self.total_step_count
    }

    /// Steps taken since the best score last improved.
    pub fn unimproved_step_count(&self) -> u64 {
        self.total_step_count - self.best_improved_step_count
    }

    pub fn add_move_evaluation_count(&mut self, count: u64) {
        self.move_evaluation_count += count;
    }

    /// Number of candidate moves evaluated so far, across all phases.
    pub fn move_evaluation_count(&self) -> u64 {
        self.move_evaluation_count
    }

    pub fn add_child_thread_calculation_count(&mut self, count: u64) {
        self.child_thread_calculation_count += count;
    }

    /// Score calculations of the solver thread plus those of finished move threads.
    pub fn score_calculation_count(&self) -> u64 {
        self.score_director.calculation_count() + self.child_thread_calculation_count
    }

    pub fn set_terminate_early_flag(&mut self, flag: Arc<AtomicBool>) {
        self.terminate_early_flag = Some(flag);
    }

    pub fn is_terminate_early(&self) -> bool {
        self.terminate_early_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Returns true once the solve must stop: the terminate early flag is
    /// set or the solver termination fires.
    pub fn is_solver_terminated(&self) -> bool {
        self.is_terminate_early()
            || self
                .termination
                .as_ref()
                .is_some_and(|termination| termination.is_solver_terminated(self))
    }

    pub fn take_best_or_working_solution(self) -> S {
        match self.best_solution {
            Some(solution) => solution,
            None => self.score_director.clone_working_solution(),
        }
    }
}
