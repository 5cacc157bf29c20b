//! Selection order and cache type of a selector.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// How long a selector's materialized candidate list stays valid.
///
/// The variants are ordered: a later variant keeps its cache for a longer
/// lifecycle span. A nested selector never resolves to a cache type lower
/// than the minimum its parent requests.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SelectionCacheType {
    /// Moves are generated while iterating; nothing is materialized.
    #[default]
    JustInTime,

    /// Moves are materialized at step start and dropped at step end.
    Step,

    /// Moves are materialized at phase start and dropped at phase end.
    Phase,

    /// Moves are materialized once per solve.
    Solver,
}

impl SelectionCacheType {
    /// Resolves a requested cache type against a minimum.
    ///
    /// ```
    /// use stepforge_config::SelectionCacheType;
    ///
    /// let resolved = SelectionCacheType::resolve(
    ///     Some(SelectionCacheType::JustInTime),
    ///     SelectionCacheType::Phase,
    /// );
    /// assert_eq!(resolved, SelectionCacheType::Phase);
    /// ```
    pub fn resolve(requested: Option<SelectionCacheType>, minimum: SelectionCacheType) -> Self {
        Self::max(requested.unwrap_or_default(), minimum)
    }

    pub fn max(a: SelectionCacheType, b: SelectionCacheType) -> Self {
        if a >= b {
            a
        } else {
            b
        }
    }

    /// Returns true for every cache type that materializes moves.
    pub fn is_cached(self) -> bool {
        self != SelectionCacheType::JustInTime
    }

    pub fn is_not_cached(self) -> bool {
        !self.is_cached()
    }
}

/// The order in which a selector walks its candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOrder {
    /// Take the order of the enclosing selector; random at the top level.
    #[default]
    Inherit,

    /// Candidates in the order the base source produces them.
    Original,

    /// Sorted by a comparator, a weight function or a custom sorter.
    /// Requires a cache type of at least `Step`.
    Sorted,

    /// Independent random picks; the same candidate may come up again.
    Random,

    /// A random permutation of the cached candidates.
    /// Requires a cache type of at least `Step`.
    Shuffled,

    /// Random picks weighted by a probability weight function.
    /// Requires a cache type of at least `Step`.
    Probabilistic,
}

impl SelectionOrder {
    /// Resolves `Inherit` against the enclosing selector's order.
    pub fn resolve(self, inherited: SelectionOrder) -> SelectionOrder {
        match self {
            SelectionOrder::Inherit => match inherited {
                SelectionOrder::Inherit => SelectionOrder::Random,
                other => other,
            },
            other => other,
        }
    }

    /// Returns true if this order needs the candidates materialized first.
    pub fn requires_caching(self) -> bool {
        matches!(
            self,
            SelectionOrder::Sorted | SelectionOrder::Shuffled | SelectionOrder::Probabilistic
        )
    }

    pub fn from_random_selection(random: bool) -> Self {
        if random {
            SelectionOrder::Random
        } else {
            SelectionOrder::Original
        }
    }

    /// Converts `Random` and `Original` to a random selection flag.
    pub fn to_random_selection(self) -> Result<bool, ConfigError> {
        match self {
            SelectionOrder::Random => Ok(true),
            SelectionOrder::Original => Ok(false),
            other => Err(ConfigError::Invalid(format!(
                "The selection order ({:?}) cannot be converted to a random selection flag.",
                other
            ))),
        }
    }
}

/// Direction of a sorted selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SorterOrder {
    #[default]
    Ascending,
    Descending,
}
