//! Step deciders for local search.
//!
//! A decider evaluates the candidate moves of one step and records the
//! winner on the step scope. The phase commits it. Two deciders exist:
//! [`LocalSearchDecider`] evaluates on the solver thread, and
//! [`MultiThreadedLocalSearchDecider`](super::MultiThreadedLocalSearchDecider)
//! spreads the evaluations over move threads. Both feed the acceptor and
//! forager in move index order, so they pick the same winners.

use std::fmt::{self, Debug};
use std::panic::{catch_unwind, AssertUnwindSafe};

use stepforge_core::domain::PlanningSolution;
use stepforge_core::{Result, StepforgeError};
use stepforge_scoring::ScoreDirector;
use tracing::trace;

use super::evaluation::{evaluate_move, panic_message, EvaluationAssertions};
use super::{Acceptor, LocalSearchForager};
use crate::heuristic::r#move::Move;
use crate::heuristic::selector::MoveSelector;
use crate::scope::{MoveScope, PhaseScope, SolverScope, StepScope};
use crate::termination::Termination;

/// The part of a local search phase that decides each step.
///
/// The phase calls the lifecycle methods in this order: `solving_started`,
/// then per phase `phase_started`, per step `step_started`,
/// `decide_next_step`, `step_ended`, and finally `phase_ended` (or
/// `phase_aborted` when the phase fails) and `solving_ended`.
pub trait LocalSearchStepDecider<S, D, M>: Send + Debug
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    fn solving_started(&mut self, solver_scope: &SolverScope<S, D>);

    fn phase_started(&mut self, phase_scope: &mut PhaseScope<'_, S, D>) -> Result<()>;

    fn step_started(&mut self, step_scope: &mut StepScope<'_, '_, S, D, M>);

    /// Evaluates candidates until the selector runs out, the forager quits
    /// early or the phase terminates, then records the picked move (if any)
    /// on the step scope. The working solution is unchanged afterwards.
    fn decide_next_step(&mut self, step_scope: &mut StepScope<'_, '_, S, D, M>) -> Result<()>;

    /// Called after the phase committed the step, or found no winner.
    fn step_ended(&mut self, step_scope: &StepScope<'_, '_, S, D, M>);

    fn phase_ended(&mut self, phase_scope: &mut PhaseScope<'_, S, D>) -> Result<()>;

    /// Called instead of `phase_ended` when the phase fails.
    fn phase_aborted(&mut self, _phase_scope: &mut PhaseScope<'_, S, D>) {}

    fn solving_ended(&mut self, solver_scope: &SolverScope<S, D>);

    /// Returns true if the phase or the whole solve must stop.
    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool;

    fn assertions(&self) -> EvaluationAssertions;
}

/// Single-threaded decider: every candidate is done, scored and undone on
/// the solver thread's own score director.
///
/// A panic while evaluating a candidate fails the step with
/// [`StepforgeError::Panic`], as it would on a move thread.
pub struct LocalSearchDecider<S, D, M, A, F>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    pub(crate) move_selector: Box<dyn MoveSelector<S, D, M>>,
    pub(crate) acceptor: A,
    pub(crate) forager: F,
    pub(crate) termination: Option<Box<dyn Termination<S, D>>>,
    pub(crate) assertions: EvaluationAssertions,
}

impl<S, D, M, A, F> LocalSearchDecider<S, D, M, A, F>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    A: Acceptor<S>,
    F: LocalSearchForager<S, M>,
{
    pub fn new(move_selector: Box<dyn MoveSelector<S, D, M>>, acceptor: A, forager: F) -> Self {
        Self {
            move_selector,
            acceptor,
            forager,
            termination: None,
            assertions: EvaluationAssertions::none(),
        }
    }

    /// Sets the termination of this phase. The solver termination is always checked too.
    pub fn with_termination(mut self, termination: Box<dyn Termination<S, D>>) -> Self {
        self.termination = Some(termination);
        self
    }

    pub fn with_assertions(mut self, assertions: EvaluationAssertions) -> Self {
        self.assertions = assertions;
        self
    }

    pub fn acceptor(&self) -> &A {
        &self.acceptor
    }

    pub fn forager(&self) -> &F {
        &self.forager
    }

    pub(crate) fn check_forager_supports_selector(&self) -> Result<()> {
        if self.move_selector.is_never_ending() && !self.forager.supports_never_ending_move_selector()
        {
            return Err(StepforgeError::Config(format!(
                "The move selector ({:?}) never ends, but the forager ({:?}) would evaluate moves forever. \
                 Configure an accepted_count_limit or use a non-random selection order.",
                self.move_selector, self.forager
            )));
        }
        Ok(())
    }
}

impl<S, D, M, A, F> Debug for LocalSearchDecider<S, D, M, A, F>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    A: Debug,
    F: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSearchDecider")
            .field("move_selector", &self.move_selector)
            .field("acceptor", &self.acceptor)
            .field("forager", &self.forager)
            .field("termination", &self.termination)
            .field("assertions", &self.assertions)
            .finish()
    }
}

impl<S, D, M, A, F> LocalSearchStepDecider<S, D, M> for LocalSearchDecider<S, D, M, A, F>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    A: Acceptor<S>,
    F: LocalSearchForager<S, M>,
{
    fn solving_started(&mut self, solver_scope: &SolverScope<S, D>) {
        self.move_selector
            .solving_started(solver_scope.score_director());
    }

    fn phase_started(&mut self, phase_scope: &mut PhaseScope<'_, S, D>) -> Result<()> {
        self.check_forager_supports_selector()?;
        self.move_selector.phase_started(phase_scope.score_director());
        self.acceptor.phase_started(&phase_scope.starting_score());
        Ok(())
    }

    fn step_started(&mut self, step_scope: &mut StepScope<'_, '_, S, D, M>) {
        start_step(
            self.move_selector.as_mut(),
            &mut self.acceptor,
            &mut self.forager,
            step_scope,
        );
    }

    fn decide_next_step(&mut self, step_scope: &mut StepScope<'_, '_, S, D, M>) -> Result<()> {
        let step_index = step_scope.step_index();
        let last_step_score = step_scope.phase_scope().last_completed_step_score();
        let Self {
            move_selector,
            acceptor,
            forager,
            termination,
            assertions,
        } = self;

        let moves = move_selector.iter_moves(step_scope.score_director());
        for (move_index, mov) in moves.enumerate() {
            let score = catch_unwind(AssertUnwindSafe(|| {
                evaluate_move::<S, D, M>(
                    step_scope.score_director_mut(),
                    &mov,
                    last_step_score,
                    *assertions,
                )
            }))
            .unwrap_or_else(|payload| Err(StepforgeError::Panic(panic_message(payload.as_ref()))))?;
            forage_move(
                acceptor,
                forager,
                step_scope,
                MoveScope::new(step_index, move_index, mov, score),
            );
            if forager.is_quit_early()
                || phase_terminated(termination.as_deref(), step_scope.phase_scope())
            {
                break;
            }
        }

        forager.pick_move(step_scope);
        Ok(())
    }

    fn step_ended(&mut self, step_scope: &StepScope<'_, '_, S, D, M>) {
        end_step(self.move_selector.as_mut(), &mut self.acceptor, step_scope);
    }

    fn phase_ended(&mut self, _phase_scope: &mut PhaseScope<'_, S, D>) -> Result<()> {
        self.move_selector.phase_ended();
        self.acceptor.phase_ended();
        Ok(())
    }

    fn phase_aborted(&mut self, _phase_scope: &mut PhaseScope<'_, S, D>) {
        self.move_selector.phase_ended();
        self.acceptor.phase_ended();
    }

    fn solving_ended(&mut self, _solver_scope: &SolverScope<S, D>) {
        self.move_selector.solving_ended();
    }

    fn is_phase_terminated(&self, phase_scope: &PhaseScope<'_, S, D>) -> bool {
        phase_terminated(self.termination.as_deref(), phase_scope)
    }

    fn assertions(&self) -> EvaluationAssertions {
        self.assertions
    }
}

/// True if the solve is over or the phase's own termination fired.
pub(crate) fn phase_terminated<S, D>(
    termination: Option<&dyn Termination<S, D>>,
    phase_scope: &PhaseScope<'_, S, D>,
) -> bool
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    phase_scope.solver_scope().is_solver_terminated()
        || termination.is_some_and(|termination| termination.is_phase_terminated(phase_scope))
}

pub(crate) fn start_step<S, D, M, A, F>(
    move_selector: &mut dyn MoveSelector<S, D, M>,
    acceptor: &mut A,
    forager: &mut F,
    step_scope: &mut StepScope<'_, '_, S, D, M>,
) where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    A: Acceptor<S>,
    F: LocalSearchForager<S, M>,
{
    let phase_scope = step_scope.phase_scope();
    let last_step_score = phase_scope.last_completed_step_score();
    let best_score = phase_scope.best_score().copied().unwrap_or(last_step_score);

    move_selector.step_started(step_scope.score_director());
    acceptor.step_started();
    forager.step_started(best_score, last_step_score);
}

pub(crate) fn end_step<S, D, M, A>(
    move_selector: &mut dyn MoveSelector<S, D, M>,
    acceptor: &mut A,
    step_scope: &StepScope<'_, '_, S, D, M>,
) where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    A: Acceptor<S>,
{
    move_selector.step_ended();
    if let Some(step_score) = step_scope.step_score() {
        acceptor.step_ended(step_score);
    }
}

/// Hands one evaluated candidate to the acceptor and forager.
///
/// Not doable candidates are recorded on the step scope but never reach
/// the acceptor or the forager.
pub(crate) fn forage_move<S, D, M, A, F>(
    acceptor: &mut A,
    forager: &mut F,
    step_scope: &mut StepScope<'_, '_, S, D, M>,
    mut move_scope: MoveScope<S, M>,
) where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    A: Acceptor<S>,
    F: LocalSearchForager<S, M>,
{
    let Some(score) = move_scope.score else {
        trace!(
            event = "move_not_doable",
            step_index = move_scope.step_index,
            move_index = move_scope.move_index,
            "Move not doable"
        );
        step_scope.record_evaluation(move_scope.move_index, None, false);
        return;
    };

    let last_step_score = step_scope.phase_scope().last_completed_step_score();
    move_scope.accepted = acceptor.is_accepted(&last_step_score, &move_scope);
    trace!(
        event = "move_evaluated",
        step_index = move_scope.step_index,
        move_index = move_scope.move_index,
        score = %score,
        accepted = move_scope.accepted,
        "Move evaluated"
    );

    step_scope.record_evaluation(move_scope.move_index, Some(score), move_scope.accepted);
    step_scope.phase_scope_mut().add_move_evaluation_count(1);
    forager.add_move(move_scope);
}
