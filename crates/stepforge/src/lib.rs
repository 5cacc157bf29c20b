//! stepforge - a local search step engine in Rust
//!
//! Builds a solver from a [`SolverConfig`] and runs it over a score
//! director. Move evaluation can be spread over move threads without
//! changing which moves are picked.
//!
//! # Example
//!
//! ```rust
//! use stepforge::prelude::*;
//!
//! // Score types are re-exported
//! let score = HardSoftScore::of(0, -100);
//! assert_eq!(score.hard(), 0);
//! assert_eq!(score.soft(), -100);
//! ```

// Score types and domain traits
pub use stepforge_core::score::{HardSoftScore, ParseableScore, Score, SimpleScore};
pub use stepforge_core::{PlanningSolution, Result, StepforgeError};

// Score directors
pub use stepforge_scoring::{ScoreDirector, SimpleScoreDirector};

// Configuration
pub use stepforge_config::{
    AcceptorConfig, EnvironmentMode, ForagerConfig, LocalSearchConfig, MoveSelectorConfig,
    MoveThreadCount, PhaseConfig, SolverConfig, TerminationConfig,
};

// Solver engine
pub use stepforge_solver::{
    BaseMoveSelectorBuilder, BasicVariableMoveSelectors, ChangeMove, EitherMove, Move,
    MoveSelector, SelectionHooks, SolveResult, Solver, SolverFactory, SwapMove, ValueRange,
};

/// Full solver engine API: phases, deciders, scopes and terminations.
pub use stepforge_solver as engine;

pub mod console;
pub use console::init_console_logging;

mod solver;
pub use solver::run_solver;

pub mod prelude {
    pub use super::{
        init_console_logging, run_solver, BasicVariableMoveSelectors, HardSoftScore,
        PlanningSolution, Score,
        ScoreDirector, SelectionHooks, SimpleScore, SimpleScoreDirector, SolverConfig,
        ValueRange,
    };
}
