//! Error taxonomy for the extraction pipeline and the bounded solver.
//!
//! Extraction failures abort the whole call: a malformed rectification
//! invalidates every downstream cell coordinate, so no partial grid is ever
//! returned. Per-cell ambiguities (no digit blob found inside a cell) are
//! *not* errors; they are resolved locally by treating the cell as empty.
//! The solver likewise never errors for an unsatisfiable puzzle; it returns
//! `false` so callers can tell "no solution exists" apart from "something is
//! broken".

use std::fmt;

/// Reason the rectifier could not isolate a clean puzzle quadrilateral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridNotFound {
    /// The binarised photo contained no foreground regions at all.
    NoContours,
    /// The largest contour did not reduce to a 4-vertex polygon.
    NotQuadrilateral { vertices: usize },
    /// The rectified destination is too small to hold 81 cells.
    DegenerateSize { width: usize, height: usize },
    /// The 4-point projective transform could not be computed.
    ProjectionFailed,
}

/// Fatal failures of the extraction pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractError {
    /// The rectifier could not isolate a 4-sided candidate region.
    GridNotFound(GridNotFound),
    /// The assembler received mismatched prediction/position lengths.
    /// This indicates a contract violation upstream, not a bad photo.
    ShapeMismatch { predictions: usize, positions: usize },
    /// The assembler received a cell position outside `0..81`.
    /// Like `ShapeMismatch`, a contract violation upstream.
    PositionOutOfRange { position: usize },
}

impl fmt::Display for GridNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoContours => write!(f, "no foreground contours in the photo"),
            Self::NotQuadrilateral { vertices } => {
                write!(f, "grid boundary is not a quadrilateral ({vertices} vertices)")
            }
            Self::DegenerateSize { width, height } => {
                write!(f, "rectified grid too small for 81 cells ({width}x{height})")
            }
            Self::ProjectionFailed => write!(f, "projective transform is degenerate"),
        }
    }
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GridNotFound(reason) => write!(f, "grid not found: {reason}"),
            Self::ShapeMismatch {
                predictions,
                positions,
            } => write!(
                f,
                "shape mismatch: {predictions} predictions vs {positions} positions"
            ),
            Self::PositionOutOfRange { position } => {
                write!(f, "cell position {position} outside the 9x9 grid")
            }
        }
    }
}

impl std::error::Error for ExtractError {}

impl From<GridNotFound> for ExtractError {
    fn from(reason: GridNotFound) -> Self {
        Self::GridNotFound(reason)
    }
}

/// The bounded backtracking search ran out of its step budget.
///
/// Distinguished from an unsatisfiable puzzle: exhausting the budget proves
/// nothing about feasibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchAborted {
    /// Steps consumed before the search gave up.
    pub steps: u64,
}

impl fmt::Display for SearchAborted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "search aborted after {} steps", self.steps)
    }
}

impl std::error::Error for SearchAborted {}
