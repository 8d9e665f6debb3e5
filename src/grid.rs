//! The 9×9 Sudoku matrix shared by extraction and solving.
//!
//! The wire shape at the service boundary is a row-major 9×9 array of
//! integers with `0` reserved for "unknown/empty"; the serde representation
//! matches it exactly.

use crate::error::ExtractError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 9×9 matrix of digits, `0` meaning empty.
///
/// Invariant while solving: no two equal non-zero values share a row, column
/// or 3×3 box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SudokuGrid(pub [[u8; 9]; 9]);

impl SudokuGrid {
    /// Grid with every cell empty.
    pub fn empty() -> Self {
        Self([[0; 9]; 9])
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.0[row][col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.0[row][col] = value;
    }

    /// First empty cell in row-major order, if any.
    pub fn first_empty(&self) -> Option<(usize, usize)> {
        for row in 0..9 {
            for col in 0..9 {
                if self.0[row][col] == 0 {
                    return Some((row, col));
                }
            }
        }
        None
    }

    /// Whether `value` may be placed at (row, col) without clashing with the
    /// cell's row, column or containing 3×3 box.
    pub fn is_legal_placement(&self, row: usize, col: usize, value: u8) -> bool {
        for i in 0..9 {
            if self.0[row][i] == value || self.0[i][col] == value {
                return false;
            }
        }
        let box_row = 3 * (row / 3);
        let box_col = 3 * (col / 3);
        for r in box_row..box_row + 3 {
            for c in box_col..box_col + 3 {
                if self.0[r][c] == value {
                    return false;
                }
            }
        }
        true
    }

    /// Whether every filled cell respects the row/column/box constraints.
    pub fn is_valid(&self) -> bool {
        for row in 0..9 {
            for col in 0..9 {
                let v = self.0[row][col];
                if v == 0 {
                    continue;
                }
                // Temporarily clear the cell so it does not clash with itself.
                let mut probe = *self;
                probe.0[row][col] = 0;
                if !probe.is_legal_placement(row, col, v) {
                    return false;
                }
            }
        }
        true
    }

    /// Whether the grid is completely filled and valid.
    pub fn is_solved(&self) -> bool {
        self.first_empty().is_none() && self.is_valid()
    }
}

/// Build a grid from classifier predictions and the linear cell positions
/// they came from.
///
/// `positions` are row-major indices in `0..81`; `grid[p / 9][p % 9]`
/// receives the matching digit. No Sudoku legality check happens here; that
/// is the solver's job. Mismatched lengths and out-of-range positions are
/// contract violations upstream and fail with
/// [`ExtractError::ShapeMismatch`] / [`ExtractError::PositionOutOfRange`].
pub fn assemble(predictions: &[u8], positions: &[usize]) -> Result<SudokuGrid, ExtractError> {
    if predictions.len() != positions.len() {
        return Err(ExtractError::ShapeMismatch {
            predictions: predictions.len(),
            positions: positions.len(),
        });
    }
    let mut grid = SudokuGrid::empty();
    for (&digit, &pos) in predictions.iter().zip(positions) {
        if pos >= 81 {
            return Err(ExtractError::PositionOutOfRange { position: pos });
        }
        grid.set(pos / 9, pos % 9, digit);
    }
    Ok(grid)
}

impl fmt::Display for SudokuGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row_idx, row) in self.0.iter().enumerate() {
            if row_idx > 0 && row_idx % 3 == 0 {
                writeln!(f, "------+-------+------")?;
            }
            for (col_idx, &v) in row.iter().enumerate() {
                if col_idx > 0 {
                    write!(f, "{}", if col_idx % 3 == 0 { " | " } else { " " })?;
                }
                if v == 0 {
                    write!(f, ".")?;
                } else {
                    write!(f, "{v}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assemble_places_digits_at_positions() {
        let grid = assemble(&[5, 3, 9], &[0, 10, 80]).unwrap();
        assert_eq!(grid.get(0, 0), 5);
        assert_eq!(grid.get(1, 1), 3);
        assert_eq!(grid.get(8, 8), 9);
        let placed = 3;
        let zeros = grid
            .0
            .iter()
            .flatten()
            .filter(|&&v| v == 0)
            .count();
        assert_eq!(zeros, 81 - placed);
    }

    #[test]
    fn assemble_rejects_mismatched_lengths() {
        let err = assemble(&[5, 3], &[0]).unwrap_err();
        assert_eq!(
            err,
            ExtractError::ShapeMismatch {
                predictions: 2,
                positions: 1
            }
        );
    }

    #[test]
    fn assemble_rejects_out_of_range_positions() {
        let err = assemble(&[4], &[81]).unwrap_err();
        assert_eq!(err, ExtractError::PositionOutOfRange { position: 81 });
    }

    #[test]
    fn assemble_of_nothing_is_the_empty_grid() {
        let grid = assemble(&[], &[]).unwrap();
        assert_eq!(grid, SudokuGrid::empty());
    }

    #[test]
    fn legality_checks_row_column_and_box() {
        let mut grid = SudokuGrid::empty();
        grid.set(0, 0, 5);
        assert!(!grid.is_legal_placement(0, 8, 5), "same row");
        assert!(!grid.is_legal_placement(8, 0, 5), "same column");
        assert!(!grid.is_legal_placement(1, 1, 5), "same box");
        assert!(grid.is_legal_placement(1, 1, 6));
        assert!(grid.is_legal_placement(4, 4, 5));
    }

    #[test]
    fn validity_detects_duplicates() {
        let mut grid = SudokuGrid::empty();
        grid.set(3, 2, 7);
        grid.set(3, 6, 7);
        assert!(!grid.is_valid());
    }

    #[test]
    fn serde_shape_is_a_nested_array() {
        let mut grid = SudokuGrid::empty();
        grid.set(0, 1, 4);
        let json = serde_json::to_string(&grid).unwrap();
        assert!(json.starts_with("[[0,4,0"), "got {json}");
        let back: SudokuGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
    }
}
