//! Step-level scope.

use stepforge_core::domain::PlanningSolution;
use stepforge_scoring::ScoreDirector;

use super::{MoveEvaluation, PhaseScope};

/// Scope for a single step within a phase.
///
/// Exactly one step scope is open per decider at a time: it mutably
/// borrows the phase scope for its whole life.
pub struct StepScope<'a, 'b, S: PlanningSolution, D: ScoreDirector<S>, M> {
    phase_scope: &'a mut PhaseScope<'b, S, D>,
    step_index: u64,
    step: Option<M>,
    step_score: Option<S::Score>,
    evaluations: Vec<MoveEvaluation<S::Score>>,
    selected_move_count: u64,
    accepted_move_count: u64,
}

impl<'a, 'b, S: PlanningSolution, D: ScoreDirector<S>, M> StepScope<'a, 'b, S, D, M> {
    pub fn new(phase_scope: &'a mut PhaseScope<'b, S, D>) -> Self {
        let step_index = phase_scope.step_count();
        Self {
            phase_scope,
            step_index,
            step: None,
            step_score: None,
            evaluations: Vec::new(),
            selected_move_count: 0,
            accepted_move_count: 0,
        }
    }

    /// Index of this step within the phase, starting at 0.
    pub fn step_index(&self) -> u64 {
        self.step_index
    }

    /// The winning move, once picked.
    pub fn step(&self) -> Option<&M> {
        self.step.as_ref()
    }

    pub fn step_score(&self) -> Option<&S::Score> {
        self.step_score.as_ref()
    }

    pub fn set_step(&mut self, step: M, score: S::Score) {
        self.step = Some(step);
        self.step_score = Some(score);
    }

    pub fn take_step(&mut self) -> Option<(M, S::Score)> {
        let step = self.step.take()?;
        let score = self.step_score?;
        Some((step, score))
    }

    /// Records an evaluated candidate. Not doable candidates are recorded too.
    pub fn record_evaluation(&mut self, move_index: usize, score: Option<S::Score>, accepted: bool) {
        self.selected_move_count += 1;
        if accepted {
            self.accepted_move_count += 1;
        }
        self.evaluations.push(MoveEvaluation {
            move_index,
            score,
            accepted,
        });
    }

    pub fn evaluations(&self) -> &[MoveEvaluation<S::Score>] {
        &self.evaluations
    }

    pub fn selected_move_count(&self) -> u64 {
        self.selected_move_count
    }

    pub fn accepted_move_count(&self) -> u64 {
        self.accepted_move_count
    }

    pub fn phase_scope(&self) -> &PhaseScope<'b, S, D> {
        self.phase_scope
    }

    pub fn phase_scope_mut(&mut self) -> &mut PhaseScope<'b, S, D> {
        self.phase_scope
    }

    pub fn score_director(&self) -> &D {
        self.phase_scope.score_director()
    }

    pub fn score_director_mut(&mut self) -> &mut D {
        self.phase_scope.score_director_mut()
    }
}
