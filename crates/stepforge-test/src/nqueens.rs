//! N-Queens test fixtures.
//!
//! ```
//! use stepforge_test::nqueens::{calculate_conflicts, NQueensSolution};
//! use stepforge_core::SimpleScore;
//!
//! let solved = NQueensSolution::with_rows(&[1, 3, 0, 2]);
//! assert_eq!(calculate_conflicts(&solved), SimpleScore::of(0));
//! ```

use stepforge_core::{PlanningSolution, SimpleScore};

/// Descriptor index of the queen entity class.
pub const QUEEN_DESCRIPTOR_INDEX: usize = 0;

/// Name of the queen planning variable.
pub const ROW_VARIABLE: &str = "row";

/// A queen fixed to a column; its row is the planning variable.
#[derive(Clone, Debug, PartialEq)]
pub struct Queen {
    pub column: i64,
    pub row: Option<i64>,
}

#[derive(Clone, Debug)]
pub struct NQueensSolution {
    pub queens: Vec<Queen>,
    pub score: Option<SimpleScore>,
}

impl NQueensSolution {
    /// Queens in columns `0..n`, all rows unassigned.
    pub fn uninitialized(n: usize) -> Self {
        Self::with_optional_rows(&vec![None; n])
    }

    /// Queens in columns `0..rows.len()` at the given rows.
    pub fn with_rows(rows: &[i64]) -> Self {
        let rows: Vec<Option<i64>> = rows.iter().copied().map(Some).collect();
        Self::with_optional_rows(&rows)
    }

    pub fn with_optional_rows(rows: &[Option<i64>]) -> Self {
        let queens = rows
            .iter()
            .enumerate()
            .map(|(column, &row)| Queen {
                column: column as i64,
                row,
            })
            .collect();
        Self {
            queens,
            score: None,
        }
    }

    /// Current rows, in column order.
    pub fn rows(&self) -> Vec<Option<i64>> {
        self.queens.iter().map(|q| q.row).collect()
    }
}

impl PlanningSolution for NQueensSolution {
    type Score = SimpleScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }

    fn is_initialized(&self) -> bool {
        self.queens.iter().all(|q| q.row.is_some())
    }
}

pub fn queen_count(s: &NQueensSolution) -> usize {
    s.queens.len()
}

/// Row domain `0..n`.
pub fn row_values(s: &NQueensSolution) -> Vec<i64> {
    (0..s.queens.len() as i64).collect()
}

pub fn get_queen_row(s: &NQueensSolution, idx: usize) -> Option<i64> {
    s.queens.get(idx).and_then(|q| q.row)
}

pub fn set_queen_row(s: &mut NQueensSolution, idx: usize, v: Option<i64>) {
    if let Some(queen) = s.queens.get_mut(idx) {
        queen.row = v;
    }
}

/// Negative count of row and diagonal conflicts between assigned queens.
pub fn calculate_conflicts(solution: &NQueensSolution) -> SimpleScore {
    let queens = &solution.queens;
    let mut conflicts = 0i64;

    for (i, left) in queens.iter().enumerate() {
        for right in &queens[i + 1..] {
            if let (Some(left_row), Some(right_row)) = (left.row, right.row) {
                if left_row == right_row {
                    conflicts += 1;
                }
                if (left_row - right_row).abs() == (right.column - left.column).abs() {
                    conflicts += 1;
                }
            }
        }
    }

    SimpleScore::of(-conflicts)
}
