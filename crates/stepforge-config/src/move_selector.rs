//! Move selector configuration.

use serde::{Deserialize, Serialize};

use crate::selection::{SelectionCacheType, SelectionOrder, SorterOrder};

/// One node of a move selector tree.
///
/// The decorator options are shared by every selector kind. Filters, sorters
/// and weight functions are referenced by name and resolved at build time
/// against a registry supplied by the caller.
///
/// ```
/// use stepforge_config::{MoveSelectorConfig, MoveSelectorKind, SelectionOrder};
///
/// let config: MoveSelectorConfig = toml::from_str(r#"
///     selection_order = "shuffled"
///     cache_type = "step"
///     [selector]
///     type = "change_move_selector"
/// "#).unwrap();
///
/// assert_eq!(config.selection_order, Some(SelectionOrder::Shuffled));
/// assert!(matches!(config.selector, MoveSelectorKind::ChangeMoveSelector(_)));
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MoveSelectorConfig {
    /// Which moves the base selector generates.
    pub selector: MoveSelectorKind,

    #[serde(default)]
    pub cache_type: Option<SelectionCacheType>,

    #[serde(default)]
    pub selection_order: Option<SelectionOrder>,

    /// Name of a registered move filter.
    #[serde(default)]
    pub filter: Option<String>,

    /// Name of a registered move comparator.
    #[serde(default)]
    pub sorter_comparator: Option<String>,

    /// Name of a registered sort weight function.
    #[serde(default)]
    pub sorter_weight_factory: Option<String>,

    /// Name of a registered custom sorter.
    #[serde(default)]
    pub sorter: Option<String>,

    #[serde(default)]
    pub sorter_order: Option<SorterOrder>,

    /// Name of a registered probability weight function.
    #[serde(default)]
    pub probability_weight_factory: Option<String>,

    #[serde(default)]
    pub selected_count_limit: Option<usize>,
}

impl MoveSelectorConfig {
    pub fn new(selector: MoveSelectorKind) -> Self {
        Self {
            selector,
            cache_type: None,
            selection_order: None,
            filter: None,
            sorter_comparator: None,
            sorter_weight_factory: None,
            sorter: None,
            sorter_order: None,
            probability_weight_factory: None,
            selected_count_limit: None,
        }
    }

    pub fn change() -> Self {
        Self::new(MoveSelectorKind::ChangeMoveSelector(ChangeMoveConfig::default()))
    }

    pub fn swap() -> Self {
        Self::new(MoveSelectorKind::SwapMoveSelector(SwapMoveConfig::default()))
    }

    pub fn union(selectors: Vec<MoveSelectorConfig>) -> Self {
        Self::new(MoveSelectorKind::UnionMoveSelector(UnionMoveSelectorConfig {
            selectors,
        }))
    }

    pub fn with_cache_type(mut self, cache_type: SelectionCacheType) -> Self {
        self.cache_type = Some(cache_type);
        self
    }

    pub fn with_selection_order(mut self, selection_order: SelectionOrder) -> Self {
        self.selection_order = Some(selection_order);
        self
    }

    pub fn with_filter(mut self, name: impl Into<String>) -> Self {
        self.filter = Some(name.into());
        self
    }

    pub fn with_sorter_comparator(mut self, name: impl Into<String>) -> Self {
        self.sorter_comparator = Some(name.into());
        self
    }

    pub fn with_sorter_weight_factory(mut self, name: impl Into<String>) -> Self {
        self.sorter_weight_factory = Some(name.into());
        self
    }

    pub fn with_sorter(mut self, name: impl Into<String>) -> Self {
        self.sorter = Some(name.into());
        self
    }

    pub fn with_sorter_order(mut self, sorter_order: SorterOrder) -> Self {
        self.sorter_order = Some(sorter_order);
        self
    }

    pub fn with_probability_weight_factory(mut self, name: impl Into<String>) -> Self {
        self.probability_weight_factory = Some(name.into());
        self
    }

    pub fn with_selected_count_limit(mut self, limit: usize) -> Self {
        self.selected_count_limit = Some(limit);
        self
    }

    /// Returns true if any sorting option is set.
    pub fn has_sorting(&self) -> bool {
        self.sorter_comparator.is_some()
            || self.sorter_weight_factory.is_some()
            || self.sorter.is_some()
            || self.sorter_order.is_some()
    }
}

/// Base selector kinds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MoveSelectorKind {
    /// Assign a value to one entity's variable.
    ChangeMoveSelector(ChangeMoveConfig),

    /// Exchange the variable values of two entities.
    SwapMoveSelector(SwapMoveConfig),

    /// Concatenation of child selectors.
    UnionMoveSelector(UnionMoveSelectorConfig),
}

/// Change move configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ChangeMoveConfig {
    /// Planning variable to change; the only one when omitted.
    pub variable_name: Option<String>,
}

/// Swap move configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SwapMoveConfig {
    pub variable_name: Option<String>,
}

/// Union move selector configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UnionMoveSelectorConfig {
    pub selectors: Vec<MoveSelectorConfig>,
}
