#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod config;
pub mod error;
pub mod grid;
pub mod image;
pub mod pipeline;
pub mod solver;

// Stage modules – still public, but considered unstable internals.
pub mod cells;
pub mod digit;
pub mod rectify;

// --- High-level re-exports -------------------------------------------------

// Main entry points: extractor + solver + the shared grid type.
pub use crate::grid::{assemble, SudokuGrid};
pub use crate::pipeline::{DigitClassifier, ExtractReport, SudokuExtractor};
pub use crate::solver::{solve, solve_bounded, SearchBudget};

pub use crate::config::ExtractParams;
pub use crate::error::{ExtractError, GridNotFound, SearchAborted};

// Reference asset for cell normalisation.
pub use crate::digit::histogram::{load_reference_histogram, ReferenceCdf};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use sudoku_scan::prelude::*;
///
/// # fn main() {
/// let (w, h) = (640usize, 480usize);
/// let rgb = vec![255u8; w * h * 3];
/// let photo = RgbU8 { w, h, data: &rgb };
///
/// let extractor = SudokuExtractor::new(ExtractParams::default(), ReferenceCdf::uniform());
///
/// struct AlwaysOne;
/// impl DigitClassifier for AlwaysOne {
///     fn classify(&self, _digit: &sudoku_scan::digit::NormalizedDigit) -> u8 {
///         1
///     }
/// }
///
/// match extractor.process(photo, &AlwaysOne) {
///     Ok(report) => println!("filled={} latency_ms={:.3}", report.filled_cells, report.latency_ms),
///     Err(err) => eprintln!("{err}"),
/// }
/// # }
/// ```
pub mod prelude {
    pub use crate::config::ExtractParams;
    pub use crate::digit::histogram::ReferenceCdf;
    pub use crate::image::RgbU8;
    pub use crate::{solve, DigitClassifier, SudokuExtractor, SudokuGrid};
}
