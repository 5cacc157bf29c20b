//! Tests for base selectors and the selector factory.

use stepforge_config::MoveSelectorConfig;
use stepforge_core::{Result, StepforgeError};
use stepforge_test::nqueens::{
    get_queen_row, queen_count, row_values, set_queen_row, NQueensSolution,
};

use super::*;
use crate::heuristic::r#move::Move;
use crate::test_utils::{
    create_nqueens_director, describe, queen_selectors, NQueensDirector, QueenChange, QueenMove,
};

type QueenSelector = Box<dyn MoveSelector<NQueensSolution, NQueensDirector, QueenMove>>;

fn build(
    config: &MoveSelectorConfig,
    hooks: &SelectionHooks<NQueensSolution, QueenMove>,
    fixed_rows: Option<Vec<i64>>,
    inherited_order: SelectionOrder,
) -> Result<QueenSelector> {
    let base = queen_selectors(fixed_rows);
    let mut factory = MoveSelectorFactory::new(hooks, &base, 42);
    factory.build_move_selector(config, SelectionCacheType::JustInTime, inherited_order)
}

fn build_original(config: &MoveSelectorConfig) -> Result<QueenSelector> {
    build(config, &SelectionHooks::new(), None, SelectionOrder::Original)
}

fn change_pairs(
    selector: &mut impl MoveSelector<NQueensSolution, NQueensDirector, QueenChange>,
    director: &NQueensDirector,
) -> Vec<(usize, i64)> {
    selector
        .iter_moves(director)
        .map(|m| (m.entity_index(), m.to_value().copied().unwrap_or(-1)))
        .collect()
}

fn skip_first_queen(m: &QueenMove) -> bool {
    m.entity_indices()[0] != 0
}

fn row_weight(_: &NQueensSolution, m: &QueenMove) -> i64 {
    describe(m).2
}

fn zero_for_first_queen(_: &NQueensSolution, m: &QueenMove) -> f64 {
    if m.entity_indices()[0] == 0 {
        0.0
    } else {
        1.0
    }
}

#[test]
fn test_change_selector_walks_entities_then_values() {
    let director = create_nqueens_director(&[0, 1]);
    let mut selector = ChangeMoveSelector::new(
        get_queen_row,
        set_queen_row,
        queen_count,
        ValueRange::FromSolution(row_values),
        0,
        "row",
    );

    assert_eq!(
        change_pairs(&mut selector, &director),
        vec![(0, 0), (0, 1), (1, 0), (1, 1)]
    );
    assert_eq!(
        MoveSelector::<_, _, QueenChange>::size(&selector, &director),
        4
    );
}

#[test]
fn test_swap_selector_yields_each_pair_once() {
    let director = create_nqueens_director(&[0, 1, 2]);
    let mut selector = SwapMoveSelector::new(get_queen_row, set_queen_row, queen_count, 0, "row");

    let pairs: Vec<(char, usize, i64)> =
        MoveSelector::<_, NQueensDirector, QueenMove>::iter_moves(&mut selector, &director)
            .map(|m| describe(&m))
            .collect();

    assert_eq!(pairs, vec![('s', 0, 1), ('s', 0, 2), ('s', 1, 2)]);
}

#[test]
fn test_random_change_selector_is_reproducible() {
    let director = create_nqueens_director(&[0, 1, 2, 3]);
    let new_selector = || {
        ChangeMoveSelector::new(
            get_queen_row,
            set_queen_row,
            queen_count,
            ValueRange::FromSolution(row_values),
            0,
            "row",
        )
        .with_random_selection(9)
    };
    let mut a = new_selector();
    let mut b = new_selector();

    MoveSelector::<_, _, QueenChange>::step_started(&mut a, &director);
    MoveSelector::<_, _, QueenChange>::step_started(&mut b, &director);
    let first: Vec<_> = change_pairs_limited(&mut a, &director, 20);
    let second: Vec<_> = change_pairs_limited(&mut b, &director, 20);

    assert_eq!(first, second);
    assert!(MoveSelector::<_, NQueensDirector, QueenChange>::is_never_ending(&a));
}

fn change_pairs_limited(
    selector: &mut impl MoveSelector<NQueensSolution, NQueensDirector, QueenChange>,
    director: &NQueensDirector,
    limit: usize,
) -> Vec<(usize, i64)> {
    selector
        .iter_moves(director)
        .take(limit)
        .map(|m| (m.entity_index(), m.to_value().copied().unwrap_or(-1)))
        .collect()
}

#[test]
fn test_original_union_keeps_child_order() {
    let director = create_nqueens_director(&[0, 1, 2]);
    let config = MoveSelectorConfig::union(vec![
        MoveSelectorConfig::change(),
        MoveSelectorConfig::swap(),
    ]);
    let mut selector = build_original(&config).unwrap();

    let moves: Vec<_> = selector.iter_moves(&director).map(|m| describe(&m)).collect();

    let mut expected = Vec::new();
    for entity in 0..3 {
        for row in 0..3 {
            expected.push(('c', entity, row));
        }
    }
    expected.extend([('s', 0, 1), ('s', 0, 2), ('s', 1, 2)]);
    assert_eq!(moves, expected);
    assert_eq!(selector.size(&director), 12);
}

#[test]
fn test_random_union_is_never_ending_and_seeded() {
    let director = create_nqueens_director(&[0, 1, 2, 3]);
    let config = MoveSelectorConfig::union(vec![
        MoveSelectorConfig::change(),
        MoveSelectorConfig::swap(),
    ]);
    let hooks = SelectionHooks::new();
    let mut a = build(&config, &hooks, None, SelectionOrder::Random).unwrap();
    let mut b = build(&config, &hooks, None, SelectionOrder::Random).unwrap();
    a.step_started(&director);
    b.step_started(&director);

    let first: Vec<_> = a.iter_moves(&director).take(100).map(|m| describe(&m)).collect();
    let second: Vec<_> = b.iter_moves(&director).take(100).map(|m| describe(&m)).collect();

    assert!(a.is_never_ending());
    assert_eq!(first, second);
    assert!(first.iter().any(|m| m.0 == 'c'));
    assert!(first.iter().any(|m| m.0 == 's'));
}

#[test]
fn test_sorted_order_without_cache_is_rejected() {
    let config = MoveSelectorConfig::change()
        .with_selection_order(SelectionOrder::Sorted)
        .with_sorter_weight_factory("row");

    let err = build_original(&config).unwrap_err();

    assert!(matches!(err, StepforgeError::Config(_)));
}

#[test]
fn test_sorted_by_weight_descending() {
    let director = create_nqueens_director(&[0, 1, 2]);
    let hooks = SelectionHooks::new().with_sorter_weight("row", row_weight);
    let config = MoveSelectorConfig::change()
        .with_cache_type(SelectionCacheType::Step)
        .with_selection_order(SelectionOrder::Sorted)
        .with_sorter_weight_factory("row")
        .with_sorter_order(SorterOrder::Descending);
    let mut selector = build(&config, &hooks, None, SelectionOrder::Original).unwrap();
    selector.step_started(&director);

    let moves: Vec<_> = selector.iter_moves(&director).map(|m| describe(&m)).collect();

    assert_eq!(moves.len(), 9);
    assert_eq!(&moves[..3], &[('c', 0, 2), ('c', 1, 2), ('c', 2, 2)]);
    assert_eq!(moves[8], ('c', 2, 0));
}

#[test]
fn test_phase_cache_needs_solution_independent_moves() {
    let config = MoveSelectorConfig::change().with_cache_type(SelectionCacheType::Phase);
    let hooks = SelectionHooks::new();

    let err = build(&config, &hooks, None, SelectionOrder::Original).unwrap_err();
    assert!(matches!(err, StepforgeError::Config(_)));

    let selector = build(&config, &hooks, Some(vec![0, 1, 2]), SelectionOrder::Original).unwrap();
    assert_eq!(selector.cache_type(), SelectionCacheType::Phase);
}

#[test]
fn test_nested_selectors_inherit_minimum_cache_type() {
    let config = MoveSelectorConfig::union(vec![
        MoveSelectorConfig::change().with_cache_type(SelectionCacheType::JustInTime),
        MoveSelectorConfig::swap(),
    ])
    .with_cache_type(SelectionCacheType::Phase);

    let selector = build(
        &config,
        &SelectionHooks::new(),
        Some(vec![0, 1]),
        SelectionOrder::Original,
    )
    .unwrap();

    assert!(selector.cache_type() >= SelectionCacheType::Phase);
}

#[test]
fn test_unknown_filter_name_is_rejected() {
    let config = MoveSelectorConfig::change().with_filter("missing");

    let err = build_original(&config).unwrap_err();

    assert!(err.to_string().contains("missing"));
}

#[test]
fn test_probability_weight_needs_probabilistic_order() {
    let config = MoveSelectorConfig::change()
        .with_cache_type(SelectionCacheType::Step)
        .with_probability_weight_factory("weight");

    assert!(matches!(
        build_original(&config).unwrap_err(),
        StepforgeError::Config(_)
    ));
}

#[test]
fn test_selected_count_limit_inside_cached_parent_is_rejected() {
    let config = MoveSelectorConfig::union(vec![
        MoveSelectorConfig::change().with_selected_count_limit(2)
    ])
    .with_cache_type(SelectionCacheType::Step);

    assert!(matches!(
        build_original(&config).unwrap_err(),
        StepforgeError::Config(_)
    ));
}

#[test]
fn test_selected_count_limit_caps_selection() {
    let director = create_nqueens_director(&[0, 1, 2]);
    let config = MoveSelectorConfig::change().with_selected_count_limit(4);
    let mut selector = build_original(&config).unwrap();

    assert_eq!(selector.iter_moves(&director).count(), 4);
    assert_eq!(selector.size(&director), 4);
}

#[test]
fn test_filter_drops_rejected_moves() {
    let director = create_nqueens_director(&[0, 1, 2]);
    let hooks = SelectionHooks::new().with_filter("skip_first_queen", skip_first_queen);
    let config = MoveSelectorConfig::change().with_filter("skip_first_queen");
    let mut selector = build(&config, &hooks, None, SelectionOrder::Original).unwrap();

    let moves: Vec<_> = selector.iter_moves(&director).map(|m| describe(&m)).collect();

    assert_eq!(moves.len(), 6);
    assert!(moves.iter().all(|m| m.1 != 0));
}

#[test]
fn test_shuffled_selection_is_a_permutation() {
    let director = create_nqueens_director(&[0, 1, 2]);
    let config = MoveSelectorConfig::change()
        .with_cache_type(SelectionCacheType::Step)
        .with_selection_order(SelectionOrder::Shuffled);
    let mut selector = build_original(&config).unwrap();
    selector.step_started(&director);

    let mut moves: Vec<_> = selector.iter_moves(&director).map(|m| describe(&m)).collect();
    moves.sort();

    let mut expected = Vec::new();
    for entity in 0..3 {
        for row in 0..3 {
            expected.push(('c', entity, row));
        }
    }
    assert_eq!(moves, expected);
}

#[test]
fn test_probabilistic_selection_skips_zero_weights() {
    let director = create_nqueens_director(&[0, 1, 2]);
    let hooks = SelectionHooks::new().with_probability_weight("weight", zero_for_first_queen);
    let config = MoveSelectorConfig::change()
        .with_cache_type(SelectionCacheType::Step)
        .with_selection_order(SelectionOrder::Probabilistic)
        .with_probability_weight_factory("weight");
    let mut selector = build(&config, &hooks, None, SelectionOrder::Original).unwrap();
    selector.step_started(&director);

    let moves: Vec<_> = selector.iter_moves(&director).take(200).map(|m| describe(&m)).collect();

    assert!(selector.is_never_ending());
    assert_eq!(moves.len(), 200);
    assert!(moves.iter().all(|m| m.1 != 0));
}

#[test]
fn test_cached_random_selection_replays_cache() {
    let director = create_nqueens_director(&[0, 1, 2]);
    let config = MoveSelectorConfig::change()
        .with_cache_type(SelectionCacheType::Step)
        .with_selection_order(SelectionOrder::Random);
    let mut selector = build_original(&config).unwrap();
    selector.step_started(&director);

    let moves: Vec<_> = selector.iter_moves(&director).take(30).map(|m| describe(&m)).collect();

    assert!(selector.is_never_ending());
    assert_eq!(moves.len(), 30);
    assert!(moves.iter().all(|m| m.0 == 'c' && m.1 < 3 && (0..3).contains(&m.2)));
}

#[test]
fn test_selector_config_from_toml() {
    let director = create_nqueens_director(&[0, 1, 2]);
    let config: MoveSelectorConfig = toml::from_str(
        r#"
        selection_order = "original"
        [selector]
        type = "union_move_selector"
        [[selector.selectors]]
        [selector.selectors.selector]
        type = "swap_move_selector"
        "#,
    )
    .unwrap();
    let mut selector = build(&config, &SelectionHooks::new(), None, SelectionOrder::Random).unwrap();

    assert_eq!(selector.iter_moves(&director).count(), 3);
}

proptest::proptest! {
    #[test]
    fn test_original_union_follows_source_order(
        rows in proptest::collection::vec(0i64..8, 0..7),
        values in proptest::collection::vec(-3i64..9, 0..6),
    ) {
        let config = MoveSelectorConfig::union(vec![
            MoveSelectorConfig::change(),
            MoveSelectorConfig::swap(),
        ]);
        let mut selector = build(
            &config,
            &SelectionHooks::new(),
            Some(values.clone()),
            SelectionOrder::Original,
        )
        .unwrap();
        let director = create_nqueens_director(&rows);
        selector.phase_started(&director);
        selector.step_started(&director);

        let mut expected = Vec::new();
        for entity in 0..rows.len() {
            for &value in &values {
                expected.push(('c', entity, value));
            }
        }
        for left in 0..rows.len() {
            for right in left + 1..rows.len() {
                expected.push(('s', left, right as i64));
            }
        }

        let actual: Vec<_> = selector.iter_moves(&director).map(|m| describe(&m)).collect();
        proptest::prop_assert_eq!(actual, expected);
    }
}
