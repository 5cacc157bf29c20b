//! Foragers for local search move selection
//!
//! Foragers collect accepted moves during a step and select the
//! one to apply.

use std::fmt::{self, Debug};

use stepforge_config::PickEarlyType;
use stepforge_core::domain::PlanningSolution;
use stepforge_scoring::ScoreDirector;

use crate::heuristic::r#move::Move;
use crate::scope::{MoveScope, StepScope};

/// Trait for collecting and selecting moves in local search.
///
/// Foragers are responsible for:
/// - Collecting accepted moves during move evaluation
/// - Deciding when to quit evaluating early
/// - Selecting the winning move of the step
pub trait LocalSearchForager<S, M>: Send + Debug
where
    S: PlanningSolution,
    M: Move<S>,
{
    /// Resets the forager for a new step.
    fn step_started(&mut self, best_score: S::Score, last_step_score: S::Score);

    /// Offers an evaluated, doable move. Rejected moves are counted only.
    fn add_move(&mut self, move_scope: MoveScope<S, M>);

    /// Returns true once evaluating more moves cannot change the pick.
    fn is_quit_early(&self) -> bool;

    /// Returns true if this forager quits on its own when the move
    /// selector never runs out of moves.
    fn supports_never_ending_move_selector(&self) -> bool {
        true
    }

    /// Picks the winning move and records it on the step scope.
    ///
    /// Returns `None` if no move was accepted.
    fn pick_move<D: ScoreDirector<S>>(
        &mut self,
        step_scope: &mut StepScope<'_, '_, S, D, M>,
    ) -> Option<MoveScope<S, M>>;
}

/// Collects up to a limit of accepted moves and picks the highest score.
///
/// Among moves with the same score the earliest one wins, so the pick only
/// depends on the move order. A pick early type ends the step at the first
/// accepted move that improves on the best or the last step score.
pub struct AcceptedCountForager<S: PlanningSolution, M> {
    accepted_count_limit: usize,
    pick_early_type: PickEarlyType,
    best_score: Option<S::Score>,
    last_step_score: Option<S::Score>,
    selected_count: usize,
    accepted_count: usize,
    best_accepted: Option<MoveScope<S, M>>,
    early_picked: bool,
}

impl<S: PlanningSolution, M> AcceptedCountForager<S, M> {
    /// Creates a forager that quits after `accepted_count_limit` accepted moves.
    pub fn new(accepted_count_limit: usize) -> Self {
        Self {
            accepted_count_limit,
            pick_early_type: PickEarlyType::Never,
            best_score: None,
            last_step_score: None,
            selected_count: 0,
            accepted_count: 0,
            best_accepted: None,
            early_picked: false,
        }
    }

    pub fn with_pick_early_type(mut self, pick_early_type: PickEarlyType) -> Self {
        self.pick_early_type = pick_early_type;
        self
    }

    /// Number of moves offered during the current step, accepted or not.
    pub fn selected_count(&self) -> usize {
        self.selected_count
    }

    fn is_picked_early(&self, score: S::Score) -> bool {
        let reference = match self.pick_early_type {
            PickEarlyType::Never => return false,
            PickEarlyType::FirstBestScoreImproving => self.best_score,
            PickEarlyType::FirstLastStepScoreImproving => self.last_step_score,
        };
        reference.is_some_and(|reference| score > reference)
    }
}

impl<S: PlanningSolution, M> Debug for AcceptedCountForager<S, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcceptedCountForager")
            .field("accepted_count_limit", &self.accepted_count_limit)
            .field("pick_early_type", &self.pick_early_type)
            .field("accepted_count", &self.accepted_count)
            .finish()
    }
}

impl<S, M> LocalSearchForager<S, M> for AcceptedCountForager<S, M>
where
    S: PlanningSolution,
    M: Move<S>,
{
    fn step_started(&mut self, best_score: S::Score, last_step_score: S::Score) {
        self.best_score = Some(best_score);
        self.last_step_score = Some(last_step_score);
        self.selected_count = 0;
        self.accepted_count = 0;
        self.best_accepted = None;
        self.early_picked = false;
    }

    fn add_move(&mut self, move_scope: MoveScope<S, M>) {
        self.selected_count += 1;
        if !move_scope.accepted {
            return;
        }
        let Some(score) = move_scope.score else {
            return;
        };
        self.accepted_count += 1;

        if self.is_picked_early(score) {
            self.early_picked = true;
            self.best_accepted = Some(move_scope);
            return;
        }
        let is_better = match self.best_accepted.as_ref().and_then(|best| best.score) {
            Some(best) => score > best,
            None => true,
        };
        if is_better {
            self.best_accepted = Some(move_scope);
        }
    }

    fn is_quit_early(&self) -> bool {
        self.early_picked || self.accepted_count >= self.accepted_count_limit
    }

    fn supports_never_ending_move_selector(&self) -> bool {
        self.accepted_count_limit < usize::MAX
    }

    fn pick_move<D: ScoreDirector<S>>(
        &mut self,
        step_scope: &mut StepScope<'_, '_, S, D, M>,
    ) -> Option<MoveScope<S, M>> {
        let picked = self.best_accepted.take()?;
        let score = picked.score?;
        step_scope.set_step(picked.mov.clone(), score);
        Some(picked)
    }
}

/// Picks the first accepted move and quits right away.
pub struct FirstAcceptedForager<S: PlanningSolution, M> {
    accepted: Option<MoveScope<S, M>>,
}

impl<S: PlanningSolution, M> FirstAcceptedForager<S, M> {
    pub fn new() -> Self {
        Self { accepted: None }
    }
}

impl<S: PlanningSolution, M> Default for FirstAcceptedForager<S, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PlanningSolution, M> Debug for FirstAcceptedForager<S, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirstAcceptedForager")
            .field("has_move", &self.accepted.is_some())
            .finish()
    }
}

impl<S, M> LocalSearchForager<S, M> for FirstAcceptedForager<S, M>
where
    S: PlanningSolution,
    M: Move<S>,
{
    fn step_started(&mut self, _best_score: S::Score, _last_step_score: S::Score) {
        self.accepted = None;
    }

    fn add_move(&mut self, move_scope: MoveScope<S, M>) {
        if self.accepted.is_none() && move_scope.accepted && move_scope.score.is_some() {
            self.accepted = Some(move_scope);
        }
    }

    fn is_quit_early(&self) -> bool {
        self.accepted.is_some()
    }

    fn pick_move<D: ScoreDirector<S>>(
        &mut self,
        step_scope: &mut StepScope<'_, '_, S, D, M>,
    ) -> Option<MoveScope<S, M>> {
        let picked = self.accepted.take()?;
        let score = picked.score?;
        step_scope.set_step(picked.mov.clone(), score);
        Some(picked)
    }
}

#[cfg(test)]
#[path = "forager_tests.rs"]
mod tests;
