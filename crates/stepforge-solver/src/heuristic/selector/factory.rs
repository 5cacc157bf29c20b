//! Builds selector trees from configuration.

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use stepforge_config::{
    MoveSelectorConfig, MoveSelectorKind, SelectionCacheType, SelectionOrder, SorterOrder,
};
use stepforge_core::domain::PlanningSolution;
use stepforge_core::{Result, StepforgeError};
use stepforge_scoring::ScoreDirector;
use tracing::debug;

use super::base::BaseMoveSelectorBuilder;
use super::decorator::{
    CachingMoveSelector, FilteringMoveSelector, MoveSorter, ProbabilityMoveSelector,
    SelectedCountLimitMoveSelector, ShufflingMoveSelector, SortingMoveSelector,
    UnionMoveSelector,
};
use super::hooks::SelectionHooks;
use super::MoveSelector;
use crate::heuristic::r#move::Move;

/// Builds a [`MoveSelector`] tree from a [`MoveSelectorConfig`].
///
/// Decorators are stacked in a fixed order around the base selector:
/// filtering, sorting, probability, shuffling, caching and finally the
/// selected count limit. Every random selector gets its own seed drawn from
/// the factory's seed, so a given seed always builds the same tree.
pub struct MoveSelectorFactory<'a, S, D, M> {
    hooks: &'a SelectionHooks<S, M>,
    base: &'a dyn BaseMoveSelectorBuilder<S, D, M>,
    seeds: ChaCha8Rng,
}

impl<'a, S, D, M> MoveSelectorFactory<'a, S, D, M>
where
    S: PlanningSolution,
    D: ScoreDirector<S> + 'static,
    M: Move<S>,
{
    pub fn new(
        hooks: &'a SelectionHooks<S, M>,
        base: &'a dyn BaseMoveSelectorBuilder<S, D, M>,
        seed: u64,
    ) -> Self {
        Self {
            hooks,
            base,
            seeds: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Builds the selector for `config`.
    ///
    /// `minimum_cache_type` is the cache type an enclosing selector demands;
    /// `inherited_order` resolves an `Inherit` selection order.
    pub fn build_move_selector(
        &mut self,
        config: &MoveSelectorConfig,
        minimum_cache_type: SelectionCacheType,
        inherited_order: SelectionOrder,
    ) -> Result<Box<dyn MoveSelector<S, D, M>>> {
        let order = config
            .selection_order
            .unwrap_or_default()
            .resolve(inherited_order);
        let cache_type = SelectionCacheType::resolve(config.cache_type, minimum_cache_type);

        validate_cache_type_versus_order(cache_type, order)?;
        validate_sorting(config, order)?;
        validate_probability(config, order)?;
        validate_selected_count_limit(config, minimum_cache_type)?;

        let random_selection = self.determine_base_random_selection(config, cache_type, order);
        let base = self.build_base(config, cache_type, random_selection)?;
        if cache_type > SelectionCacheType::Step && !base.supports_phase_and_solver_caching() {
            return Err(StepforgeError::Config(format!(
                "The move selector ({:?}) does not support the cache type ({:?}): \
                 its moves depend on the working solution.",
                base, cache_type
            )));
        }

        let selector = self.decorate(config, base, cache_type, order)?;
        debug!(
            order = ?order,
            cache_type = ?cache_type,
            random_selection,
            "Built move selector"
        );
        Ok(selector)
    }

    fn determine_base_random_selection(
        &self,
        config: &MoveSelectorConfig,
        cache_type: SelectionCacheType,
        order: SelectionOrder,
    ) -> bool {
        match order {
            SelectionOrder::Random => {
                cache_type.is_not_cached()
                    || (self.is_inherently_cached(&config.selector) && config.filter.is_none())
            }
            _ => false,
        }
    }

    fn is_inherently_cached(&self, kind: &MoveSelectorKind) -> bool {
        match kind {
            MoveSelectorKind::UnionMoveSelector(_) => false,
            other => self.base.is_base_inherently_cached(other),
        }
    }

    fn build_base(
        &mut self,
        config: &MoveSelectorConfig,
        cache_type: SelectionCacheType,
        random_selection: bool,
    ) -> Result<Box<dyn MoveSelector<S, D, M>>> {
        match &config.selector {
            MoveSelectorKind::UnionMoveSelector(union) => {
                if union.selectors.is_empty() {
                    return Err(StepforgeError::Config(
                        "A union move selector needs at least one child selector.".to_string(),
                    ));
                }
                let child_order = SelectionOrder::from_random_selection(random_selection);
                let children = union
                    .selectors
                    .iter()
                    .map(|child| self.build_move_selector(child, cache_type, child_order))
                    .collect::<Result<Vec<_>>>()?;
                let selector = UnionMoveSelector::new(children);
                Ok(if random_selection {
                    Box::new(selector.with_random_selection(self.next_seed()))
                } else {
                    Box::new(selector)
                })
            }
            kind => {
                let seed = self.next_seed();
                self.base.build_base(kind, random_selection, seed)
            }
        }
    }

    fn decorate(
        &mut self,
        config: &MoveSelectorConfig,
        base: Box<dyn MoveSelector<S, D, M>>,
        cache_type: SelectionCacheType,
        order: SelectionOrder,
    ) -> Result<Box<dyn MoveSelector<S, D, M>>> {
        let mut selector = base;

        if let Some(name) = &config.filter {
            let filter = self.hooks.filter(name)?;
            selector = Box::new(FilteringMoveSelector::new(selector, filter));
        }

        match order {
            SelectionOrder::Sorted => {
                let sorter = self.resolve_sorter(config)?;
                selector = Box::new(SortingMoveSelector::new(selector, cache_type, sorter));
            }
            SelectionOrder::Probabilistic => {
                let name = config.probability_weight_factory.as_deref().unwrap_or_default();
                let weight = self.hooks.probability_weight(name)?;
                let seed = self.next_seed();
                selector = Box::new(ProbabilityMoveSelector::new(
                    selector, cache_type, weight, seed,
                ));
            }
            SelectionOrder::Shuffled => {
                let seed = self.next_seed();
                selector = Box::new(ShufflingMoveSelector::new(selector, cache_type, seed));
            }
            _ => {}
        }

        let random_replay = order == SelectionOrder::Random && !selector.is_never_ending();
        if cache_type.is_cached() && (cache_type > selector.cache_type() || random_replay) {
            let caching = CachingMoveSelector::new(selector, cache_type);
            selector = if random_replay {
                Box::new(caching.with_random_selection(self.next_seed()))
            } else {
                Box::new(caching)
            };
        }

        if let Some(limit) = config.selected_count_limit {
            selector = Box::new(SelectedCountLimitMoveSelector::new(selector, limit));
        }
        Ok(selector)
    }

    fn resolve_sorter(&self, config: &MoveSelectorConfig) -> Result<MoveSorter<S, M>> {
        let sorter_order = config.sorter_order.unwrap_or(SorterOrder::Ascending);
        if let Some(name) = &config.sorter_comparator {
            Ok(MoveSorter::Comparator(self.hooks.comparator(name)?, sorter_order))
        } else if let Some(name) = &config.sorter_weight_factory {
            Ok(MoveSorter::Weight(self.hooks.sorter_weight(name)?, sorter_order))
        } else if let Some(name) = &config.sorter {
            Ok(MoveSorter::Custom(self.hooks.sorter(name)?))
        } else {
            Err(StepforgeError::Config(
                "The sorted selection order needs a sorter_comparator, a \
                 sorter_weight_factory or a sorter."
                    .to_string(),
            ))
        }
    }

    fn next_seed(&mut self) -> u64 {
        self.seeds.random()
    }
}

impl<S, D, M> fmt::Debug for MoveSelectorFactory<'_, S, D, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoveSelectorFactory")
            .field("hooks", &self.hooks)
            .finish()
    }
}

fn validate_cache_type_versus_order(
    cache_type: SelectionCacheType,
    order: SelectionOrder,
) -> Result<()> {
    if order.requires_caching() && cache_type.is_not_cached() {
        return Err(StepforgeError::Config(format!(
            "The selection order ({:?}) needs a cached selection, but the cache type is ({:?}).",
            order, cache_type
        )));
    }
    Ok(())
}

fn validate_sorting(config: &MoveSelectorConfig, order: SelectionOrder) -> Result<()> {
    if order != SelectionOrder::Sorted {
        if config.has_sorting() {
            return Err(StepforgeError::Config(format!(
                "Sorting options are only allowed with the sorted selection order, not ({:?}).",
                order
            )));
        }
        return Ok(());
    }

    let sorter_count = [
        config.sorter_comparator.is_some(),
        config.sorter_weight_factory.is_some(),
        config.sorter.is_some(),
    ]
    .into_iter()
    .filter(|set| *set)
    .count();
    if sorter_count != 1 {
        return Err(StepforgeError::Config(format!(
            "The sorted selection order needs exactly one of sorter_comparator, \
             sorter_weight_factory or sorter, but {} are set.",
            sorter_count
        )));
    }
    if config.sorter.is_some() && config.sorter_order.is_some() {
        return Err(StepforgeError::Config(
            "A custom sorter decides its own order; remove the sorter_order.".to_string(),
        ));
    }
    Ok(())
}

fn validate_probability(config: &MoveSelectorConfig, order: SelectionOrder) -> Result<()> {
    let has_weight = config.probability_weight_factory.is_some();
    match (order == SelectionOrder::Probabilistic, has_weight) {
        (true, false) => Err(StepforgeError::Config(
            "The probabilistic selection order needs a probability_weight_factory.".to_string(),
        )),
        (false, true) => Err(StepforgeError::Config(format!(
            "A probability_weight_factory is only allowed with the probabilistic selection \
             order, not ({:?}).",
            order
        ))),
        _ => Ok(()),
    }
}

fn validate_selected_count_limit(
    config: &MoveSelectorConfig,
    minimum_cache_type: SelectionCacheType,
) -> Result<()> {
    if config.selected_count_limit.is_some() && minimum_cache_type.is_cached() {
        return Err(StepforgeError::Config(format!(
            "A selected_count_limit cannot be used inside a selector cached at ({:?}).",
            minimum_cache_type
        )));
    }
    Ok(())
}
