//! Tentative move evaluation shared by the solver thread and move threads.

use std::any::Any;

use stepforge_config::EnvironmentMode;
use stepforge_core::domain::PlanningSolution;
use stepforge_core::{Result, StepforgeError};
use stepforge_scoring::ScoreDirector;

use crate::heuristic::r#move::Move;

/// Score assertions switched on by the environment mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationAssertions {
    /// Recalculate every move score from scratch and compare.
    pub move_score_from_scratch: bool,
    /// After undoing a move, the score must equal the last step score.
    pub expected_undo_move_score: bool,
    /// Recalculate every committed step score from scratch and compare.
    pub step_score_from_scratch: bool,
}

impl EvaluationAssertions {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_environment_mode(mode: EnvironmentMode) -> Self {
        Self {
            move_score_from_scratch: mode.is_fully_asserted(),
            expected_undo_move_score: mode.is_asserted(),
            step_score_from_scratch: mode.is_asserted(),
        }
    }
}

/// Does, scores and undoes one move.
///
/// Returns `Ok(None)` if the move is not doable. The working solution is
/// back at its step baseline when this returns, on success and on error.
pub fn evaluate_move<S, D, M>(
    score_director: &mut D,
    mov: &M,
    last_step_score: S::Score,
    assertions: EvaluationAssertions,
) -> Result<Option<S::Score>>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
    M: Move<S>,
{
    if !mov.is_doable(score_director) {
        return Ok(None);
    }

    let undo = mov.do_move(score_director);
    let score = score_director.calculate_score();

    if assertions.move_score_from_scratch {
        let from_scratch = score_director.calculate_score_from_scratch();
        if from_scratch != score {
            mov.undo_move(undo, score_director);
            return Err(StepforgeError::ScoreCorruption(format!(
                "The move score ({}) differs from the score recalculated from scratch ({}) after doing {:?}.",
                score, from_scratch, mov
            )));
        }
    }

    mov.undo_move(undo, score_director);

    if assertions.expected_undo_move_score {
        let undo_score = score_director.calculate_score();
        if undo_score != last_step_score {
            return Err(StepforgeError::ScoreCorruption(format!(
                "Undoing {:?} left the score at ({}) instead of the last step score ({}).",
                mov, undo_score, last_step_score
            )));
        }
    }

    Ok(Some(score))
}

/// Checks a committed step's score against a from-scratch recalculation
/// and against the score the move had during evaluation.
pub fn assert_step_score<S, D>(
    score_director: &mut D,
    step_index: u64,
    step_score: S::Score,
    evaluated_score: S::Score,
) -> Result<()>
where
    S: PlanningSolution,
    D: ScoreDirector<S>,
{
    if step_score != evaluated_score {
        return Err(StepforgeError::ScoreCorruption(format!(
            "Step ({}) scored ({}) when committed but ({}) when evaluated.",
            step_index, step_score, evaluated_score
        )));
    }
    let from_scratch = score_director.calculate_score_from_scratch();
    if from_scratch != step_score {
        return Err(StepforgeError::ScoreCorruption(format!(
            "Step ({}) scored ({}) but ({}) when recalculated from scratch.",
            step_index, step_score, from_scratch
        )));
    }
    Ok(())
}

/// Text of a panic payload, for `&str` and `String` payloads.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
