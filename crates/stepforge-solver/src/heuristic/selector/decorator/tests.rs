//! Tests for selector decorators.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;

use stepforge_config::{SelectionCacheType, SorterOrder};
use stepforge_scoring::ScoreDirector;
use stepforge_test::nqueens::NQueensSolution;

use super::*;
use crate::heuristic::selector::{FixedMoveSelector, MoveSelector};
use crate::test_utils::{create_nqueens_director, queen_change, NQueensDirector, QueenChange};

type QueenChangeSelector = Box<dyn MoveSelector<NQueensSolution, NQueensDirector, QueenChange>>;

/// Fixed moves that count how often they were drained.
#[derive(Debug)]
struct CountingSelector {
    moves: Vec<QueenChange>,
    drains: Arc<AtomicUsize>,
}

impl<D: ScoreDirector<NQueensSolution>> MoveSelector<NQueensSolution, D, QueenChange>
    for CountingSelector
{
    fn iter_moves<'a>(
        &'a mut self,
        _score_director: &D,
    ) -> Box<dyn Iterator<Item = QueenChange> + 'a> {
        self.drains.fetch_add(1, AtomicOrdering::SeqCst);
        Box::new(self.moves.iter().cloned())
    }

    fn size(&self, _score_director: &D) -> usize {
        self.moves.len()
    }

    fn supports_phase_and_solver_caching(&self) -> bool {
        true
    }
}

fn counting(moves: Vec<QueenChange>) -> (QueenChangeSelector, Arc<AtomicUsize>) {
    let drains = Arc::new(AtomicUsize::new(0));
    let selector = CountingSelector {
        moves,
        drains: Arc::clone(&drains),
    };
    (Box::new(selector), drains)
}

fn fixed(moves: Vec<QueenChange>) -> QueenChangeSelector {
    Box::new(FixedMoveSelector::new(moves))
}

fn entities(
    selector: &mut QueenChangeSelector,
    director: &NQueensDirector,
    limit: usize,
) -> Vec<usize> {
    selector
        .iter_moves(director)
        .take(limit)
        .map(|m| m.entity_index())
        .collect()
}

fn by_entity(a: &QueenChange, b: &QueenChange) -> Ordering {
    a.entity_index().cmp(&b.entity_index())
}

fn never(_: &QueenChange) -> bool {
    false
}

fn zero_weight(_: &NQueensSolution, _: &QueenChange) -> f64 {
    0.0
}

#[test]
fn test_step_cache_rebuilds_every_step() {
    let director = create_nqueens_director(&[0, 1, 2]);
    let (inner, drains) = counting(vec![queen_change(0, 1), queen_change(1, 2)]);
    let mut selector: QueenChangeSelector =
        Box::new(CachingMoveSelector::new(inner, SelectionCacheType::Step));

    selector.phase_started(&director);
    selector.step_started(&director);
    assert_eq!(entities(&mut selector, &director, 10), vec![0, 1]);
    assert_eq!(entities(&mut selector, &director, 10), vec![0, 1]);
    assert_eq!(drains.load(AtomicOrdering::SeqCst), 1);

    selector.step_ended();
    selector.step_started(&director);
    entities(&mut selector, &director, 10);
    assert_eq!(drains.load(AtomicOrdering::SeqCst), 2);
}

#[test]
fn test_phase_cache_survives_steps() {
    let director = create_nqueens_director(&[0, 1, 2]);
    let (inner, drains) = counting(vec![queen_change(0, 1)]);
    let mut selector: QueenChangeSelector =
        Box::new(CachingMoveSelector::new(inner, SelectionCacheType::Phase));

    selector.phase_started(&director);
    for _ in 0..3 {
        selector.step_started(&director);
        entities(&mut selector, &director, 10);
        selector.step_ended();
    }
    assert_eq!(drains.load(AtomicOrdering::SeqCst), 1);

    selector.phase_ended();
    selector.phase_started(&director);
    assert_eq!(drains.load(AtomicOrdering::SeqCst), 2);
}

#[test]
fn test_sorting_by_comparator_both_directions() {
    let director = create_nqueens_director(&[0, 1, 2]);
    let moves = vec![queen_change(2, 0), queen_change(0, 2), queen_change(1, 0)];

    let mut ascending: QueenChangeSelector = Box::new(SortingMoveSelector::new(
        fixed(moves.clone()),
        SelectionCacheType::Step,
        MoveSorter::Comparator(by_entity, SorterOrder::Ascending),
    ));
    let mut descending: QueenChangeSelector = Box::new(SortingMoveSelector::new(
        fixed(moves),
        SelectionCacheType::Step,
        MoveSorter::Comparator(by_entity, SorterOrder::Descending),
    ));

    assert_eq!(entities(&mut ascending, &director, 10), vec![0, 1, 2]);
    assert_eq!(entities(&mut descending, &director, 10), vec![2, 1, 0]);
}

#[test]
fn test_filter_over_never_ending_selection_bails_out() {
    let director = create_nqueens_director(&[0, 1, 2]);
    let inner: QueenChangeSelector =
        Box::new(FixedMoveSelector::new(vec![queen_change(0, 1)]).with_random_selection(3));
    let mut selector: QueenChangeSelector = Box::new(FilteringMoveSelector::new(inner, never));

    assert!(selector.is_never_ending());
    assert!(entities(&mut selector, &director, 10).is_empty());
}

#[test]
fn test_probability_with_zero_total_weight_is_empty() {
    let director = create_nqueens_director(&[0, 1, 2]);
    let mut selector: QueenChangeSelector = Box::new(ProbabilityMoveSelector::new(
        fixed(vec![queen_change(0, 1), queen_change(1, 2)]),
        SelectionCacheType::Step,
        zero_weight,
        5,
    ));
    selector.step_started(&director);

    assert!(entities(&mut selector, &director, 10).is_empty());
}

#[test]
fn test_random_union_drains_every_child() {
    let director = create_nqueens_director(&[0, 1, 2, 3]);
    let children = vec![
        fixed(vec![queen_change(0, 1), queen_change(1, 2)]),
        fixed(vec![queen_change(2, 3)]),
        fixed(Vec::new()),
    ];
    let mut selector: QueenChangeSelector =
        Box::new(UnionMoveSelector::new(children).with_random_selection(11));
    selector.step_started(&director);

    let mut picked = entities(&mut selector, &director, 10);
    picked.sort_unstable();

    assert_eq!(picked, vec![0, 1, 2]);
}

#[test]
fn test_count_limit_on_never_ending_selection() {
    let director = create_nqueens_director(&[0, 1, 2]);
    let inner: QueenChangeSelector =
        Box::new(FixedMoveSelector::new(vec![queen_change(0, 1)]).with_random_selection(3));
    let mut selector: QueenChangeSelector =
        Box::new(SelectedCountLimitMoveSelector::new(inner, 7));

    assert_eq!(entities(&mut selector, &director, 100).len(), 7);
    assert!(!selector.is_never_ending());
}
