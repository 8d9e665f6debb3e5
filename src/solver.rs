//! Depth-first backtracking completion of a partial grid.
//!
//! The search scans row-major for the first empty cell, tries candidates
//! 1..=9 in ascending order against the row/column/box constraints, and
//! recurses. A dead end resets the cell to 0 and backtracks. There is no
//! constraint propagation; well-posed puzzles prune quickly through early
//! conflicts, and recursion depth is bounded by the 81 cells.
//!
//! Unsatisfiable input is a legitimate outcome, reported as `false` with the
//! grid restored to its original partial state. The bounded variant guards
//! against adversarial inputs: exceeding the step budget surfaces
//! [`SearchAborted`], which proves nothing about feasibility.

use crate::error::SearchAborted;
use crate::grid::SudokuGrid;

/// Step budget for [`solve_bounded`]. One step is one candidate placement.
#[derive(Clone, Copy, Debug)]
pub struct SearchBudget {
    pub max_steps: u64,
}

impl Default for SearchBudget {
    fn default() -> Self {
        // Generous enough for any well-posed puzzle.
        Self {
            max_steps: 10_000_000,
        }
    }
}

/// Complete `grid` in place. Returns `true` when a full valid completion was
/// found (the grid now holds it) and `false` when the puzzle is
/// unsatisfiable (the grid is unchanged).
pub fn solve(grid: &mut SudokuGrid) -> bool {
    let mut steps = 0u64;
    // Unbounded search cannot abort.
    search(grid, &mut steps, u64::MAX).unwrap_or(false)
}

/// Like [`solve`], but gives up after `budget.max_steps` candidate
/// placements. On abort the grid is restored to its input state.
pub fn solve_bounded(grid: &mut SudokuGrid, budget: SearchBudget) -> Result<bool, SearchAborted> {
    let mut steps = 0u64;
    search(grid, &mut steps, budget.max_steps)
}

fn search(grid: &mut SudokuGrid, steps: &mut u64, max_steps: u64) -> Result<bool, SearchAborted> {
    let Some((row, col)) = grid.first_empty() else {
        return Ok(true);
    };
    for value in 1..=9u8 {
        if !grid.is_legal_placement(row, col, value) {
            continue;
        }
        *steps += 1;
        if *steps > max_steps {
            // Undo before unwinding so the caller sees the original grid.
            return Err(SearchAborted { steps: *steps });
        }
        grid.set(row, col, value);
        match search(grid, steps, max_steps) {
            Ok(true) => return Ok(true),
            Ok(false) => grid.set(row, col, 0),
            Err(aborted) => {
                grid.set(row, col, 0);
                return Err(aborted);
            }
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical_puzzle() -> SudokuGrid {
        SudokuGrid([
            [5, 3, 0, 0, 7, 0, 0, 0, 0],
            [6, 0, 0, 1, 9, 5, 0, 0, 0],
            [0, 9, 8, 0, 0, 0, 0, 6, 0],
            [8, 0, 0, 0, 6, 0, 0, 0, 3],
            [4, 0, 0, 8, 0, 3, 0, 0, 1],
            [7, 0, 0, 0, 2, 0, 0, 0, 6],
            [0, 6, 0, 0, 0, 0, 2, 8, 0],
            [0, 0, 0, 4, 1, 9, 0, 0, 5],
            [0, 0, 0, 0, 8, 0, 0, 7, 9],
        ])
    }

    #[test]
    fn solves_the_canonical_puzzle() {
        let mut grid = canonical_puzzle();
        assert!(solve(&mut grid));
        assert!(grid.is_solved());
        // Givens are untouched.
        assert_eq!(grid.get(0, 0), 5);
        assert_eq!(grid.get(8, 8), 9);
    }

    #[test]
    fn contradictory_grid_is_left_unchanged() {
        let mut grid = canonical_puzzle();
        grid.set(0, 8, 5); // second 5 in the top row
        let original = grid;
        assert!(!solve(&mut grid));
        assert_eq!(grid, original, "failed search must not leave digits behind");
    }

    #[test]
    fn solved_grid_is_idempotent() {
        let mut grid = canonical_puzzle();
        assert!(solve(&mut grid));
        let solved = grid;
        assert!(solve(&mut grid));
        assert_eq!(grid, solved);
    }

    #[test]
    fn bounded_search_aborts_and_restores() {
        let mut grid = SudokuGrid::empty();
        let original = grid;
        let result = solve_bounded(&mut grid, SearchBudget { max_steps: 10 });
        assert!(matches!(result, Err(SearchAborted { .. })));
        assert_eq!(grid, original, "aborted search must restore the grid");
    }

    #[test]
    fn bounded_search_solves_within_a_generous_budget() {
        let mut grid = canonical_puzzle();
        let result = solve_bounded(&mut grid, SearchBudget::default());
        assert_eq!(result, Ok(true));
        assert!(grid.is_solved());
    }
}
