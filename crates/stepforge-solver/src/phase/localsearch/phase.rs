//! Local search phase implementation.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use stepforge_core::domain::PlanningSolution;
use stepforge_core::Result;
use stepforge_scoring::ScoreDirector;
use tracing::{debug, info};

use super::evaluation::assert_step_score;
use super::LocalSearchStepDecider;
use crate::heuristic::r#move::Move;
use crate::phase::Phase;
use crate::scope::{PhaseScope, SolverScope, StepScope};

/// Local search phase that improves an existing solution.
///
/// Each step:
/// 1. The decider evaluates candidate moves and picks a winner
/// 2. The winner is done on the solver thread's score director
/// 3. The step score is recorded and the best solution updated
///
/// The phase ends when its decider reports termination or a step finds no
/// accepted move.
///
/// # Type Parameters
/// * `S` - The planning solution type
/// * `D` - The score director type
/// * `M` - The move type
/// * `Dc` - The step decider type
pub struct LocalSearchPhase<S, D, M, Dc> {
    decider: Dc,
    _phantom: PhantomData<fn() -> (S, D, M)>,
}

impl<S, D, M, Dc> LocalSearchPhase<S, D, M, Dc>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    Dc: LocalSearchStepDecider<S, D, M>,
{
    pub fn new(decider: Dc) -> Self {
        Self {
            decider,
            _phantom: PhantomData,
        }
    }

    pub fn decider(&self) -> &Dc {
        &self.decider
    }

    fn run_steps(&mut self, phase_scope: &mut PhaseScope<'_, S, D>) -> Result<()> {
        let assertions = self.decider.assertions();
        while !self.decider.is_phase_terminated(phase_scope) {
            let mut step_scope = StepScope::new(phase_scope);
            self.decider.step_started(&mut step_scope);
            self.decider.decide_next_step(&mut step_scope)?;

            let step_index = step_scope.step_index();
            let Some((step, evaluated_score)) = step_scope.take_step() else {
                self.decider.step_ended(&step_scope);
                debug!(
                    event = "no_step",
                    step_index,
                    selected_moves = step_scope.selected_move_count(),
                    "No accepted move, ending phase"
                );
                break;
            };

            let _ = step.do_move(step_scope.score_director_mut());
            let step_score = step_scope.score_director_mut().calculate_score();
            if assertions.step_score_from_scratch {
                assert_step_score::<S, D>(
                    step_scope.score_director_mut(),
                    step_index,
                    step_score,
                    evaluated_score,
                )?;
            }
            step_scope.set_step(step, step_score);
            self.decider.step_ended(&step_scope);

            debug!(
                event = "step",
                step_index,
                score = %step_score,
                selected_moves = step_scope.selected_move_count(),
                accepted_moves = step_scope.accepted_move_count(),
                "Local search step"
            );
            phase_scope.complete_step(step_score);
        }
        Ok(())
    }
}

impl<S, D, M, Dc: Debug> Debug for LocalSearchPhase<S, D, M, Dc> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSearchPhase")
            .field("decider", &self.decider)
            .finish()
    }
}

impl<S, D, M, Dc> Phase<S, D> for LocalSearchPhase<S, D, M, Dc>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
    Dc: LocalSearchStepDecider<S, D, M>,
{
    fn solving_started(&mut self, solver_scope: &SolverScope<S, D>) {
        self.decider.solving_started(solver_scope);
    }

    fn solve(&mut self, solver_scope: &mut SolverScope<S, D>, phase_index: usize) -> Result<()> {
        let mut phase_scope = PhaseScope::new(solver_scope, phase_index);
        info!(
            event = "phase_start",
            phase = "LocalSearch",
            phase_index,
            starting_score = %phase_scope.starting_score(),
            "Local search phase started"
        );

        let outcome = self
            .decider
            .phase_started(&mut phase_scope)
            .and_then(|()| self.run_steps(&mut phase_scope));
        if let Err(err) = outcome {
            self.decider.phase_aborted(&mut phase_scope);
            return Err(err);
        }
        self.decider.phase_ended(&mut phase_scope)?;

        info!(
            event = "phase_end",
            phase = "LocalSearch",
            phase_index,
            steps = phase_scope.step_count(),
            moves_evaluated = phase_scope.move_evaluation_count(),
            duration_ms = phase_scope.elapsed().as_millis() as u64,
            score = %phase_scope.last_completed_step_score(),
            "Local search phase ended"
        );
        Ok(())
    }

    fn solving_ended(&mut self, solver_scope: &SolverScope<S, D>) {
        self.decider.solving_ended(solver_scope);
    }

    fn phase_type_name(&self) -> &'static str {
        "LocalSearch"
    }
}
