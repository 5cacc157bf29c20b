//! Move threads must not change what the solver does.

mod common;

use std::sync::{Arc, Mutex};

use common::{queen_director, queen_selectors, QueenDirector, QueenMove};
use stepforge_config::{
    AcceptorConfig, EnvironmentMode, LocalSearchConfig, MoveSelectorConfig, MoveThreadCount,
    PhaseConfig, SolverConfig, TerminationConfig,
};
use stepforge_core::SimpleScore;
use stepforge_scoring::ScoreDirector;
use stepforge_solver::heuristic::selector::{
    MoveSelectorFactory, SelectionCacheType, SelectionHooks, SelectionOrder,
};
use stepforge_solver::phase::localsearch::{
    AcceptedCountForager, Acceptor, HillClimbingAcceptor, LateAcceptanceAcceptor,
    LocalSearchDecider, LocalSearchForager, LocalSearchPhase, MultiThreadedLocalSearchDecider,
};
use stepforge_solver::phase::Phase;
use stepforge_solver::scope::{MoveScope, StepScope};
use stepforge_solver::termination::{
    MoveCountTermination, OrTermination, StepCountTermination, Termination,
};
use stepforge_solver::{SolveResult, Solver, SolverFactory};
use stepforge_test::nqueens::NQueensSolution;

type StepLog = Arc<Mutex<Vec<String>>>;

/// Forager that logs every move it picks as the step.
#[derive(Debug)]
struct RecordingForager {
    inner: AcceptedCountForager<NQueensSolution, QueenMove>,
    steps: StepLog,
}

impl LocalSearchForager<NQueensSolution, QueenMove> for RecordingForager {
    fn step_started(&mut self, best_score: SimpleScore, last_step_score: SimpleScore) {
        self.inner.step_started(best_score, last_step_score);
    }

    fn add_move(&mut self, move_scope: MoveScope<NQueensSolution, QueenMove>) {
        self.inner.add_move(move_scope);
    }

    fn is_quit_early(&self) -> bool {
        self.inner.is_quit_early()
    }

    fn supports_never_ending_move_selector(&self) -> bool {
        self.inner.supports_never_ending_move_selector()
    }

    fn pick_move<D: ScoreDirector<NQueensSolution>>(
        &mut self,
        step_scope: &mut StepScope<'_, '_, NQueensSolution, D, QueenMove>,
    ) -> Option<MoveScope<NQueensSolution, QueenMove>> {
        let picked = self.inner.pick_move(step_scope);
        if let Some(picked) = &picked {
            self.steps.lock().unwrap().push(format!(
                "{} #{} {:?} {:?}",
                picked.step_index, picked.move_index, picked.mov, picked.score
            ));
        }
        picked
    }
}

/// Solves `rows` with a hand-built phase and returns the committed steps.
fn recorded_steps<A>(
    acceptor: A,
    accepted_count_limit: usize,
    selection_order: SelectionOrder,
    move_thread_count: usize,
    rows: &[i64],
) -> Vec<String>
where
    A: Acceptor<NQueensSolution> + 'static,
{
    let hooks = SelectionHooks::new();
    let base = queen_selectors();
    let selector = MoveSelectorFactory::new(&hooks, &base, 7)
        .build_move_selector(
            &MoveSelectorConfig::union(vec![MoveSelectorConfig::change(), MoveSelectorConfig::swap()]),
            SelectionCacheType::JustInTime,
            selection_order,
        )
        .unwrap();
    let steps = StepLog::default();
    let forager = RecordingForager {
        inner: AcceptedCountForager::new(accepted_count_limit),
        steps: Arc::clone(&steps),
    };
    let decider = LocalSearchDecider::new(selector, acceptor, forager);
    let phase: Box<dyn Phase<NQueensSolution, QueenDirector>> = if move_thread_count == 0 {
        Box::new(LocalSearchPhase::<NQueensSolution, QueenDirector, QueenMove, _>::new(decider))
    } else {
        let decider =
            MultiThreadedLocalSearchDecider::new(decider, move_thread_count, move_thread_count * 2)
                .unwrap();
        Box::new(LocalSearchPhase::<NQueensSolution, QueenDirector, QueenMove, _>::new(decider))
    };
    let limits: Vec<Box<dyn Termination<NQueensSolution, QueenDirector>>> = vec![
        Box::new(StepCountTermination::new(50)),
        Box::new(MoveCountTermination::new(20_000)),
    ];
    let mut solver = Solver::new()
        .with_phase(phase)
        .with_termination(Box::new(OrTermination::new(limits)));
    solver.solve(queen_director(rows)).unwrap();

    let steps = steps.lock().unwrap().clone();
    steps
}

fn solve(config: &SolverConfig, rows: &[i64]) -> SolveResult<NQueensSolution> {
    let factory: SolverFactory<NQueensSolution, QueenDirector, QueenMove> =
        SolverFactory::new(config.clone(), SelectionHooks::new(), queen_selectors());
    let mut solver = factory.build_solver().unwrap();
    solver.solve(queen_director(rows)).unwrap()
}

fn assert_same_run(single: &SolveResult<NQueensSolution>, multi: &SolveResult<NQueensSolution>) {
    assert_eq!(multi.solution.rows(), single.solution.rows());
    assert_eq!(multi.score, single.score);
    assert_eq!(multi.step_count, single.step_count);
    assert_eq!(multi.move_evaluation_count, single.move_evaluation_count);
}

fn limited(step_count_limit: u64) -> TerminationConfig {
    TerminationConfig {
        step_count_limit: Some(step_count_limit),
        move_count_limit: Some(20_000),
        ..TerminationConfig::default()
    }
}

#[test]
fn random_late_acceptance_is_identical_with_move_threads() {
    let config = SolverConfig::new()
        .with_environment_mode(EnvironmentMode::Reproducible)
        .with_random_seed(42)
        .with_termination(limited(60));
    let rows = [0, 0, 0, 0, 0, 0, 0, 0];
    let single = solve(&config, &rows);

    for move_thread_count in [1, 2, 4] {
        let multi = solve(
            &config
                .clone()
                .with_move_thread_count(MoveThreadCount::Count(move_thread_count)),
            &rows,
        );
        assert_same_run(&single, &multi);
    }
}

#[test]
fn original_order_hill_climbing_is_identical_with_move_threads() {
    let config = SolverConfig::new()
        .with_random_seed(5)
        .with_termination(limited(40))
        .with_phase(PhaseConfig::LocalSearch(LocalSearchConfig {
            acceptor: Some(AcceptorConfig::HillClimbing),
            ..LocalSearchConfig::default()
        }));
    let rows = [3, 3, 3, 3, 3, 3];
    let single = solve(&config, &rows);
    assert!(single.step_count > 0);

    for move_thread_count in [1, 2, 4] {
        let multi = solve(
            &config
                .clone()
                .with_move_thread_count(MoveThreadCount::Count(move_thread_count))
                .with_move_thread_buffer_size(move_thread_count),
            &rows,
        );
        assert_same_run(&single, &multi);
    }
}

#[test]
fn random_late_acceptance_commits_the_same_steps_with_move_threads() {
    let rows = [0, 0, 0, 0, 0, 0, 0];
    let single = recorded_steps(
        LateAcceptanceAcceptor::new(20),
        1,
        SelectionOrder::Random,
        0,
        &rows,
    );
    assert!(!single.is_empty());

    for move_thread_count in [1, 2, 4] {
        let multi = recorded_steps(
            LateAcceptanceAcceptor::new(20),
            1,
            SelectionOrder::Random,
            move_thread_count,
            &rows,
        );
        assert_eq!(multi, single, "move_thread_count = {}", move_thread_count);
    }
}

#[test]
fn original_order_hill_climbing_commits_the_same_steps_with_move_threads() {
    let rows = [2, 2, 2, 2, 2, 2];
    let single = recorded_steps(
        HillClimbingAcceptor::new(),
        usize::MAX,
        SelectionOrder::Original,
        0,
        &rows,
    );
    assert!(!single.is_empty());

    for move_thread_count in [1, 2, 4] {
        let multi = recorded_steps(
            HillClimbingAcceptor::new(),
            usize::MAX,
            SelectionOrder::Original,
            move_thread_count,
            &rows,
        );
        assert_eq!(multi, single, "move_thread_count = {}", move_thread_count);
    }
}

#[test]
fn asserted_mode_passes_with_move_threads() {
    let config = SolverConfig::new()
        .with_environment_mode(EnvironmentMode::FullAssert)
        .with_termination(limited(20))
        .with_move_thread_count(MoveThreadCount::Count(2));

    let result = solve(&config, &[0, 1, 0, 1, 0]);
    assert!(result.step_count <= 20);
}
