//! Solver implementation.

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use stepforge_core::domain::PlanningSolution;
use stepforge_core::Result;
use stepforge_scoring::ScoreDirector;
use tracing::{debug, info};

use crate::phase::Phase;
use crate::scope::SolverScope;
use crate::termination::Termination;

/// Outcome of one [`Solver::solve`] call.
#[derive(Debug, Clone)]
pub struct SolveResult<S: PlanningSolution> {
    /// The best solution found, with its score set.
    pub solution: S,
    pub score: S::Score,
    /// Steps committed over all phases.
    pub step_count: u64,
    /// Doable moves evaluated over all phases.
    pub move_evaluation_count: u64,
    /// Score calculations of the solver thread and all move threads.
    pub score_calculation_count: u64,
}

/// The main solver that optimizes planning solutions.
///
/// Runs its phases in order over one score director. The solver
/// termination is checked before each phase and, through the phase's
/// decider, between evaluated moves.
///
/// # Example
///
/// ```
/// use stepforge_core::domain::PlanningSolution;
/// use stepforge_core::{Result, SimpleScore};
/// use stepforge_scoring::{ScoreDirector, SimpleScoreDirector};
/// use stepforge_solver::phase::Phase;
/// use stepforge_solver::scope::SolverScope;
/// use stepforge_solver::solver::Solver;
/// use stepforge_solver::termination::StepCountTermination;
///
/// #[derive(Clone, Debug)]
/// struct MySolution { score: Option<SimpleScore> }
///
/// impl PlanningSolution for MySolution {
///     type Score = SimpleScore;
///     fn score(&self) -> Option<Self::Score> { self.score }
///     fn set_score(&mut self, score: Option<Self::Score>) { self.score = score; }
/// }
///
/// #[derive(Debug)]
/// struct NoOpPhase;
///
/// impl<S: PlanningSolution, D: ScoreDirector<S>> Phase<S, D> for NoOpPhase {
///     fn solve(&mut self, _: &mut SolverScope<S, D>, _: usize) -> Result<()> { Ok(()) }
///     fn phase_type_name(&self) -> &'static str { "NoOp" }
/// }
///
/// type MyDirector = SimpleScoreDirector<MySolution, fn(&MySolution) -> SimpleScore>;
///
/// let mut solver: Solver<MySolution, MyDirector> = Solver::new()
///     .with_phase(Box::new(NoOpPhase))
///     .with_termination(Box::new(StepCountTermination::new(10)));
///
/// let director = SimpleScoreDirector::new(
///     MySolution { score: None },
///     (|_: &MySolution| SimpleScore::of(-2)) as fn(&MySolution) -> SimpleScore,
/// );
/// let result = solver.solve(director).unwrap();
/// assert_eq!(result.score, SimpleScore::of(-2));
/// assert_eq!(result.step_count, 0);
/// ```
pub struct Solver<S: PlanningSolution, D: ScoreDirector<S>> {
    phases: Vec<Box<dyn Phase<S, D>>>,
    termination: Option<Box<dyn Termination<S, D>>>,
    terminate_early_flag: Arc<AtomicBool>,
    solving: Arc<AtomicBool>,
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Debug for Solver<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solver")
            .field("phases", &self.phases)
            .field("termination", &self.termination)
            .finish()
    }
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Default for Solver<S, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PlanningSolution, D: ScoreDirector<S>> Solver<S, D> {
    /// Creates a solver without phases or termination.
    pub fn new() -> Self {
        Self {
            phases: Vec::new(),
            termination: None,
            terminate_early_flag: Arc::new(AtomicBool::new(false)),
            solving: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_phase(mut self, phase: Box<dyn Phase<S, D>>) -> Self {
        self.phases.push(phase);
        self
    }

    /// Sets the termination of the whole solve.
    pub fn with_termination(mut self, termination: Box<dyn Termination<S, D>>) -> Self {
        self.termination = Some(termination);
        self
    }

    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    /// Requests early termination of the solving process.
    ///
    /// Returns false if no solve is running.
    pub fn terminate_early(&self) -> bool {
        if self.solving.load(Ordering::SeqCst) {
            self.terminate_early_flag.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    /// Flag another thread can set to stop the running solve.
    pub fn terminate_early_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.terminate_early_flag)
    }

    /// Returns true if the solver is currently solving.
    pub fn is_solving(&self) -> bool {
        self.solving.load(Ordering::SeqCst)
    }

    /// Solves using the provided score director.
    ///
    /// Every phase gets `solving_started` and `solving_ended`, also when a
    /// phase fails. The first error aborts the solve.
    pub fn solve(&mut self, score_director: D) -> Result<SolveResult<S>> {
        self.solving.store(true, Ordering::SeqCst);
        self.terminate_early_flag.store(false, Ordering::SeqCst);

        let mut solver_scope = SolverScope::new(score_director);
        if let Some(termination) = self.termination.take() {
            solver_scope = solver_scope.with_termination(termination);
        }
        solver_scope.set_terminate_early_flag(Arc::clone(&self.terminate_early_flag));
        solver_scope.start_solving();
        solver_scope.update_best_solution();
        info!(
            event = "solve_start",
            phases = self.phases.len(),
            score = ?solver_scope.best_score(),
            "Solving started"
        );

        for phase in &mut self.phases {
            phase.solving_started(&solver_scope);
        }
        let outcome = self.run_phases(&mut solver_scope);
        for phase in &mut self.phases {
            phase.solving_ended(&solver_scope);
        }
        self.termination = solver_scope.take_termination();
        self.solving.store(false, Ordering::SeqCst);
        outcome?;

        let score = solver_scope
            .best_score()
            .copied()
            .unwrap_or_else(|| solver_scope.calculate_score());
        let step_count = solver_scope.total_step_count();
        let move_evaluation_count = solver_scope.move_evaluation_count();
        let score_calculation_count = solver_scope.score_calculation_count();
        info!(
            event = "solve_end",
            steps = step_count,
            moves_evaluated = move_evaluation_count,
            score_calculations = score_calculation_count,
            duration_ms = solver_scope
                .elapsed()
                .map_or(0, |elapsed| elapsed.as_millis() as u64),
            score = %score,
            "Solving ended"
        );

        Ok(SolveResult {
            solution: solver_scope.take_best_or_working_solution(),
            score,
            step_count,
            move_evaluation_count,
            score_calculation_count,
        })
    }

    fn run_phases(&mut self, solver_scope: &mut SolverScope<S, D>) -> Result<()> {
        for (phase_index, phase) in self.phases.iter_mut().enumerate() {
            if solver_scope.is_solver_terminated() {
                debug!(
                    event = "phase_skipped",
                    phase_index,
                    phase = phase.phase_type_name(),
                    "Solver terminated before phase"
                );
                break;
            }
            phase.solve(solver_scope, phase_index)?;
        }
        Ok(())
    }
}
