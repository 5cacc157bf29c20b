//! Tests for solver configuration.

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        environment_mode = "full_assert"
        random_seed = 42
        move_thread_count = { count = 3 }

        [termination]
        seconds_spent_limit = 30

        [[phases]]
        type = "local_search"
        [phases.acceptor]
        type = "late_acceptance"
        late_acceptance_size = 400
        [phases.forager]
        accepted_count_limit = 4
        pick_early_type = "first_last_step_score_improving"
        [phases.move_selector]
        cache_type = "phase"
        selection_order = "random"
        [phases.move_selector.selector]
        type = "union_move_selector"
        [[phases.move_selector.selector.selectors]]
        filter = "not_same_value"
        [phases.move_selector.selector.selectors.selector]
        type = "change_move_selector"
        [[phases.move_selector.selector.selectors]]
        selected_count_limit = 10
        [phases.move_selector.selector.selectors.selector]
        type = "swap_move_selector"
    "#;

    let config = SolverConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.environment_mode, EnvironmentMode::FullAssert);
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.move_thread_count, MoveThreadCount::Count(3));
    assert_eq!(config.resolved_move_thread_count().unwrap(), Some(3));
    assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));

    let PhaseConfig::LocalSearch(local_search) = &config.phases[0];
    let forager = local_search.forager.as_ref().unwrap();
    assert_eq!(forager.accepted_count_limit, Some(4));
    assert_eq!(
        forager.pick_early_type,
        Some(PickEarlyType::FirstLastStepScoreImproving)
    );

    let move_selector = local_search.move_selector.as_ref().unwrap();
    assert_eq!(move_selector.cache_type, Some(SelectionCacheType::Phase));
    assert_eq!(move_selector.selection_order, Some(SelectionOrder::Random));
    let MoveSelectorKind::UnionMoveSelector(union) = &move_selector.selector else {
        panic!("expected a union move selector");
    };
    assert_eq!(union.selectors.len(), 2);
    assert_eq!(union.selectors[0].filter.as_deref(), Some("not_same_value"));
    assert_eq!(union.selectors[1].selected_count_limit, Some(10));
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        environment_mode: reproducible
        random_seed: 42
        move_thread_count: auto
        move_thread_buffer_size: 16
        termination:
          step_count_limit: 100
        phases:
          - type: local_search
            acceptor:
              type: simulated_annealing
              starting_temperature: 2.5
            move_selector:
              selection_order: sorted
              cache_type: step
              sorter_weight_factory: by_entity
              sorter_order: descending
              selector:
                type: change_move_selector
    "#;

    let config = SolverConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.environment_mode, EnvironmentMode::Reproducible);
    assert_eq!(config.move_thread_count, MoveThreadCount::Auto);
    assert_eq!(config.move_thread_buffer_size, Some(16));
    assert_eq!(config.resolved_move_thread_buffer_size(4).unwrap(), 16);

    let PhaseConfig::LocalSearch(local_search) = &config.phases[0];
    let Some(AcceptorConfig::SimulatedAnnealing(sa)) = &local_search.acceptor else {
        panic!("expected simulated annealing");
    };
    assert_eq!(sa.starting_temperature, Some(2.5));
    let move_selector = local_search.move_selector.as_ref().unwrap();
    assert_eq!(move_selector.sorter_order, Some(SorterOrder::Descending));
    assert!(move_selector.has_sorting());
}

#[test]
fn test_invalid_config_is_reported() {
    let err = SolverConfig::from_toml_str("move_thread_count = \"many\"").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));

    let stepforge: StepforgeError = err.into();
    assert!(matches!(stepforge, StepforgeError::Config(_)));
}

#[test]
fn test_builder() {
    let config = SolverConfig::new()
        .with_random_seed(123)
        .with_termination_seconds(60)
        .with_move_thread_count(MoveThreadCount::Count(2))
        .with_phase(PhaseConfig::LocalSearch(LocalSearchConfig::default()));

    assert_eq!(config.random_seed, Some(123));
    assert_eq!(config.time_limit(), Some(Duration::from_secs(60)));
    assert_eq!(config.resolved_move_thread_buffer_size(2).unwrap(), 20);
    assert_eq!(config.phases.len(), 1);
}

#[test]
fn test_buffer_must_cover_move_threads() {
    let config = SolverConfig::new()
        .with_move_thread_count(MoveThreadCount::Count(4))
        .with_move_thread_buffer_size(3);
    assert!(matches!(
        config.resolved_move_thread_buffer_size(4),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_move_thread_count_resolution() {
    assert_eq!(MoveThreadCount::None.resolve().unwrap(), None);
    assert_eq!(MoveThreadCount::Count(3).resolve().unwrap(), Some(3));
    assert!(MoveThreadCount::Count(0).resolve().is_err());

    let auto = MoveThreadCount::Auto.resolve().unwrap();
    if let Some(count) = auto {
        assert!((2..=MoveThreadCount::AUTO_LIMIT).contains(&count));
    }
}

#[test]
fn test_random_seed_resolution() {
    assert_eq!(SolverConfig::new().resolved_random_seed(), None);
    assert_eq!(
        SolverConfig::new()
            .with_environment_mode(EnvironmentMode::Reproducible)
            .resolved_random_seed(),
        Some(0)
    );
    assert_eq!(
        SolverConfig::new().with_random_seed(9).resolved_random_seed(),
        Some(9)
    );
}

#[test]
fn test_environment_mode_assertions() {
    assert!(!EnvironmentMode::Reproducible.is_asserted());
    assert!(EnvironmentMode::FastAssert.is_asserted());
    assert!(!EnvironmentMode::FastAssert.is_fully_asserted());
    assert!(EnvironmentMode::FullAssert.is_fully_asserted());
}

#[test]
fn test_cache_type_resolution_is_monotonic() {
    use SelectionCacheType::*;

    assert_eq!(SelectionCacheType::resolve(Some(JustInTime), Phase), Phase);
    assert_eq!(SelectionCacheType::resolve(None, Step), Step);
    assert_eq!(SelectionCacheType::resolve(Some(Solver), Step), Solver);
    for requested in [JustInTime, Step, Phase, Solver] {
        for minimum in [JustInTime, Step, Phase, Solver] {
            assert!(SelectionCacheType::resolve(Some(requested), minimum) >= minimum);
        }
    }
    assert!(JustInTime.is_not_cached());
    assert!(Step.is_cached());
}

#[test]
fn test_selection_order_resolution() {
    assert_eq!(
        SelectionOrder::Inherit.resolve(SelectionOrder::Original),
        SelectionOrder::Original
    );
    assert_eq!(
        SelectionOrder::Inherit.resolve(SelectionOrder::Inherit),
        SelectionOrder::Random
    );
    assert_eq!(
        SelectionOrder::Sorted.resolve(SelectionOrder::Random),
        SelectionOrder::Sorted
    );
    assert!(SelectionOrder::Shuffled.requires_caching());
    assert!(!SelectionOrder::Random.requires_caching());
    assert!(SelectionOrder::Random.to_random_selection().unwrap());
    assert!(SelectionOrder::Sorted.to_random_selection().is_err());
}

#[test]
fn test_termination_config() {
    let termination = TerminationConfig {
        seconds_spent_limit: Some(1),
        milliseconds_spent_limit: Some(500),
        ..Default::default()
    };
    assert_eq!(termination.time_limit(), Some(Duration::from_millis(1500)));
    assert!(!termination.is_empty());
    assert!(TerminationConfig::default().is_empty());
}
