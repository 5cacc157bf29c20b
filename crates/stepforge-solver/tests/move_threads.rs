//! Move thread failures and teardown.

mod common;

use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

use common::{
    fixed_task_decider, queen_director, task_change, task_director, task_solver, AcceptAll,
    ExplodingMove, QueenDirector,
};
use stepforge_core::{SimpleScore, StepforgeError};
use stepforge_solver::heuristic::selector::{FixedMoveSelector, MoveSelector};
use stepforge_solver::phase::localsearch::{
    AcceptedCountForager, LocalSearchDecider, LocalSearchPhase, MultiThreadedLocalSearchDecider,
};
use stepforge_solver::phase::Phase;
use stepforge_solver::solver::Solver;
use stepforge_solver::termination::StepCountTermination;
use stepforge_test::nqueens::NQueensSolution;

type ExplodingPhase<Dc> = LocalSearchPhase<NQueensSolution, QueenDirector, ExplodingMove, Dc>;

/// Solver over four exploding moves; `move_thread_count` 0 decides on the
/// solver thread.
fn exploding_solver(move_thread_count: usize) -> Solver<NQueensSolution, QueenDirector> {
    let moves = (0..4).map(ExplodingMove::new).collect();
    let selector: Box<dyn MoveSelector<NQueensSolution, QueenDirector, ExplodingMove>> =
        Box::new(FixedMoveSelector::new(moves));
    let decider =
        LocalSearchDecider::new(selector, AcceptAll, AcceptedCountForager::new(usize::MAX));
    let phase: Box<dyn Phase<NQueensSolution, QueenDirector>> = if move_thread_count == 0 {
        Box::new(ExplodingPhase::new(decider))
    } else {
        let decider =
            MultiThreadedLocalSearchDecider::new(decider, move_thread_count, move_thread_count * 2)
                .unwrap();
        Box::new(ExplodingPhase::new(decider))
    };
    Solver::new()
        .with_phase(phase)
        .with_termination(Box::new(StepCountTermination::new(3)))
}

#[test]
fn move_thread_panic_fails_the_solve() {
    let mut solver = exploding_solver(2);

    let err = solver.solve(queen_director(&[0, 1, 2, 3])).unwrap_err();

    assert!(matches!(err, StepforgeError::MoveThreadFailure { .. }));
    let StepforgeError::Panic(message) = err.root_cause() else {
        panic!("expected a panic as root cause, got {:?}", err);
    };
    assert!(message.contains("exploding move"));
    assert!(!solver.is_solving());
}

#[test]
fn solver_thread_panic_fails_the_solve() {
    let mut solver = exploding_solver(0);

    let err = solver.solve(queen_director(&[0, 1, 2, 3])).unwrap_err();

    let StepforgeError::Panic(message) = &err else {
        panic!("expected a panic, got {:?}", err);
    };
    assert!(message.contains("exploding move done on entity 0"));
    assert!(!solver.is_solving());

    // Same root cause as on a move thread.
    let threaded = exploding_solver(1)
        .solve(queen_director(&[0, 1, 2, 3]))
        .unwrap_err();
    assert_eq!(err.root_cause().to_string(), threaded.root_cause().to_string());
}

#[test]
fn failed_solve_can_be_repeated() {
    let mut solver = exploding_solver(3);
    for _ in 0..3 {
        let err = solver.solve(queen_director(&[0, 1, 2, 3])).unwrap_err();
        assert!(matches!(err.root_cause(), StepforgeError::Panic(_)));
    }
}

#[test]
fn repeated_solves_reuse_the_solver() {
    let mut solver = task_solver(
        fixed_task_decider(
            vec![task_change(0, -3), task_change(0, -1), task_change(1, -2)],
            AcceptAll,
        ),
        2,
        1,
    );

    for _ in 0..5 {
        let result = solver.solve(task_director(&[-9, -9])).unwrap();
        assert_eq!(result.score, SimpleScore::of(-10));
        // Solver thread plus at least one calculation per evaluated move.
        assert!(result.score_calculation_count > result.move_evaluation_count);
    }
}

#[test]
fn terminate_early_flag_stops_a_long_solve() {
    // Priorities cycle forever under accept-all with no step limit.
    let moves = vec![task_change(0, -1), task_change(0, -2)];
    let mut solver = task_solver(fixed_task_decider(moves, AcceptAll), 2, u64::MAX);
    let flag = solver.terminate_early_flag();

    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        flag.store(true, Ordering::SeqCst);
    });
    let result = solver.solve(task_director(&[-5])).unwrap();
    stopper.join().unwrap();

    assert!(result.step_count > 0);
    assert_eq!(result.score, SimpleScore::of(-1));
}
