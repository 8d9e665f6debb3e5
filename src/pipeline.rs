//! End-to-end extraction pipeline.
//!
//! [`SudokuExtractor`] wires the stages together: rectify the photo, slice
//! it into cells, normalise the filled ones, hand each normalised image to
//! the external classifier, and assemble the answers into a [`SudokuGrid`].
//! Every stage is synchronous and side-effect-free; the only external call
//! is the classifier collaborator. Stage failures abort the whole call; a
//! partial grid is never returned.

use crate::cells::{segment, Cell};
use crate::config::ExtractParams;
use crate::digit::histogram::ReferenceCdf;
use crate::digit::{normalize, NormalizedDigit};
use crate::error::ExtractError;
use crate::grid::{assemble, SudokuGrid};
use crate::image::RgbU8;
use crate::rectify::rectify;
use log::debug;
use serde::Serialize;
use std::time::Instant;

/// External digit-classification collaborator.
///
/// Implementations must be deterministic for a given input and must never
/// mutate the buffer. Returned digits are in `1..=9`.
pub trait DigitClassifier {
    fn classify(&self, digit: &NormalizedDigit) -> u8;
}

/// Outcome of a successful extraction, with stage timings in the style of
/// the rest of the crate's diagnostics.
#[derive(Clone, Debug, Serialize)]
pub struct ExtractReport {
    pub grid: SudokuGrid,
    /// Cells the fill heuristic flagged, before normalisation.
    pub filled_cells: usize,
    /// Cells that survived normalisation and were classified.
    pub recognized_cells: usize,
    pub rectified_size: (usize, usize),
    pub rectify_ms: f64,
    pub segment_ms: f64,
    pub normalize_ms: f64,
    pub latency_ms: f64,
}

/// Extraction pipeline bound to a parameter set and a histogram reference.
pub struct SudokuExtractor {
    params: ExtractParams,
    reference: ReferenceCdf,
}

impl SudokuExtractor {
    pub fn new(params: ExtractParams, reference: ReferenceCdf) -> Self {
        Self { params, reference }
    }

    pub fn params(&self) -> &ExtractParams {
        &self.params
    }

    /// Run the full photo-to-grid pipeline.
    pub fn process(
        &self,
        photo: RgbU8<'_>,
        classifier: &dyn DigitClassifier,
    ) -> Result<ExtractReport, ExtractError> {
        let total_start = Instant::now();

        let rectify_start = Instant::now();
        let rectified = rectify(photo, &self.params.rectify)?;
        let rectify_ms = rectify_start.elapsed().as_secs_f64() * 1000.0;

        let segment_start = Instant::now();
        let cells = segment(&rectified, &self.params.segment, &self.params.fill);
        let filled_cells = cells.iter().filter(|c| c.filled).count();
        let segment_ms = segment_start.elapsed().as_secs_f64() * 1000.0;

        let normalize_start = Instant::now();
        let (digits, positions) = self.classify_filled(&cells, classifier);
        let normalize_ms = normalize_start.elapsed().as_secs_f64() * 1000.0;

        let grid = assemble(&digits, &positions)?;
        let latency_ms = total_start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "extract: {}x{} rectified, {} filled, {} recognized, {:.2} ms",
            rectified.w,
            rectified.h,
            filled_cells,
            digits.len(),
            latency_ms
        );

        Ok(ExtractReport {
            grid,
            filled_cells,
            recognized_cells: digits.len(),
            rectified_size: (rectified.w, rectified.h),
            rectify_ms,
            segment_ms,
            normalize_ms,
            latency_ms,
        })
    }

    /// Normalise each filled cell and classify it, keeping digits and their
    /// cell positions aligned. Cells whose normalisation finds no digit blob
    /// are retroactively treated as empty.
    fn classify_filled(
        &self,
        cells: &[Cell],
        classifier: &dyn DigitClassifier,
    ) -> (Vec<u8>, Vec<usize>) {
        let mut digits = Vec::new();
        let mut positions = Vec::new();
        for cell in cells.iter().filter(|c| c.filled) {
            match normalize(&cell.pixels, &self.params.normalize, &self.reference) {
                Some(normalized) => {
                    digits.push(classifier.classify(&normalized));
                    positions.push(cell.index);
                }
                None => {
                    debug!("extract: cell {} had no digit blob, treated as empty", cell.index);
                }
            }
        }
        (digits, positions)
    }
}
