//! Error types for stepforge

use thiserror::Error;

/// Main error type for stepforge operations.
#[derive(Debug, Error)]
pub enum StepforgeError {
    /// Invalid or conflicting configuration, reported before any search starts.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A diagnostic assertion found a score that disagrees with its expected value.
    #[error("Score corruption: {0}")]
    ScoreCorruption(String),

    /// An internal invariant of the search loop does not hold.
    #[error("Impossible situation: {0}")]
    InvariantViolation(String),

    /// A move thread failed; the original fault is kept as the source.
    #[error("Move thread ({move_thread_index}) failed")]
    MoveThreadFailure {
        move_thread_index: usize,
        #[source]
        cause: Box<StepforgeError>,
    },

    /// A panic captured on a worker thread.
    #[error("Panic: {0}")]
    Panic(String),

    /// Solver was cancelled before completion
    #[error("Solver was cancelled")]
    Cancelled,

    /// Invalid operation for current solver state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StepforgeError {
    /// Returns true if this error means the move or score model is broken.
    pub fn is_fatal_invariant(&self) -> bool {
        match self {
            StepforgeError::ScoreCorruption(_) | StepforgeError::InvariantViolation(_) => true,
            StepforgeError::MoveThreadFailure { cause, .. } => cause.is_fatal_invariant(),
            _ => false,
        }
    }

    /// Unwraps move thread failures down to the fault that started them.
    pub fn root_cause(&self) -> &StepforgeError {
        match self {
            StepforgeError::MoveThreadFailure { cause, .. } => cause.root_cause(),
            other => other,
        }
    }
}

/// Result type alias for stepforge operations
pub type Result<T> = std::result::Result<T, StepforgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_thread_failure_keeps_source() {
        let err = StepforgeError::MoveThreadFailure {
            move_thread_index: 2,
            cause: Box::new(StepforgeError::ScoreCorruption("off by one".to_string())),
        };

        assert_eq!(err.to_string(), "Move thread (2) failed");
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("Score corruption: off by one"));
        assert!(err.is_fatal_invariant());
        assert!(matches!(err.root_cause(), StepforgeError::ScoreCorruption(_)));
    }

    #[test]
    fn test_panic_is_not_an_invariant() {
        let err = StepforgeError::Panic("boom".to_string());
        assert!(!err.is_fatal_invariant());
        assert_eq!(err.to_string(), "Panic: boom");
    }
}
