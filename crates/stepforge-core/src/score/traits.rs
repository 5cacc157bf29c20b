//! Core Score trait definition

use std::fmt::{Debug, Display};
use std::ops::{Add, Neg, Sub};

/// Core trait for all score types.
///
/// Scores are totally ordered; when a score has several levels the
/// higher-priority level is compared first. Everything the search loop does
/// with a score (acceptance, foraging, termination, assertions) goes through
/// `Ord` and `Eq`.
pub trait Score:
    Copy
    + Debug
    + Display
    + Default
    + Send
    + Sync
    + Eq
    + Ord
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + 'static
{
    /// Returns true if all hard constraints are satisfied.
    fn is_feasible(&self) -> bool;

    /// Returns the zero score (identity element for addition).
    fn zero() -> Self;

    /// Returns the number of score levels.
    fn levels_count() -> usize;

    /// Returns the level values, highest priority first.
    fn to_level_numbers(&self) -> Vec<i64>;

    /// Collapses all levels into one weighted number.
    ///
    /// Only meant for heuristics that need a magnitude, such as the
    /// simulated annealing acceptance probability.
    fn to_scalar(&self) -> f64;

    /// Returns true if this score is better than the other score.
    fn is_better_than(&self, other: &Self) -> bool {
        self > other
    }
}

/// Scores that can be read from configuration strings.
pub trait ParseableScore: Score {
    /// Parses a score such as `"-3"` or `"0hard/-120soft"`.
    fn parse(s: &str) -> Result<Self, ScoreParseError>;

    /// Returns the string form accepted by [`ParseableScore::parse`].
    fn to_string_repr(&self) -> String;
}

/// Error when parsing a score from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreParseError {
    pub message: String,
}

impl std::fmt::Display for ScoreParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Score parse error: {}", self.message)
    }
}

impl std::error::Error for ScoreParseError {}
