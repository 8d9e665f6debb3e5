//! Cell slicing and fill detection on the rectified grid.
//!
//! The rectified color buffer is converted to intensity, smoothed and masked
//! against a fixed global background threshold. The mask is multiplicative:
//! bright paper goes to zero while digit strokes keep their grayscale
//! values, which downstream normalisation depends on. The buffer is then cut
//! into a 9×9 lattice by integer division, each cell is inset by a small
//! fraction per side to discard grid-line pixels, and the fill heuristic
//! labels it filled or empty.
//!
//! Output ordering is the contract the assembler depends on: row-major with
//! `index = row * 9 + col`, matching `SudokuGrid` indexing.

pub mod fill;

use crate::config::{FillParams, SegmentParams};
use crate::image::ops::{gaussian_blur, luma, GAUSSIAN_5TAP};
use crate::image::{GrayImage, RgbImage};
use log::debug;

/// Cells per grid side.
pub const GRID_SIDE: usize = 9;
/// Total cells in a grid.
pub const GRID_CELLS: usize = GRID_SIDE * GRID_SIDE;

/// One of the 81 sub-regions of a rectified grid.
#[derive(Clone, Debug)]
pub struct Cell {
    /// Row-major linear index in `0..81`.
    pub index: usize,
    /// Background-masked grayscale pixels, grid-line inset already applied.
    pub pixels: GrayImage,
    /// Whether the fill heuristic saw a digit in this cell.
    pub filled: bool,
}

/// Slice a rectified grid into 81 cells in row-major order.
pub fn segment(
    rectified: &RgbImage,
    params: &SegmentParams,
    fill_params: &FillParams,
) -> Vec<Cell> {
    let gray = luma(rectified.as_view());
    let blurred = gaussian_blur(&gray, GAUSSIAN_5TAP);
    let masked = mask_background(&blurred, params.background_thresh);

    let cell_w = masked.w / GRID_SIDE;
    let cell_h = masked.h / GRID_SIDE;
    let inset_x = (cell_w as f32 * params.inset_fraction) as usize;
    let inset_y = (cell_h as f32 * params.inset_fraction) as usize;

    let mut cells = Vec::with_capacity(GRID_CELLS);
    for row in 0..GRID_SIDE {
        for col in 0..GRID_SIDE {
            let x0 = col * cell_w + inset_x;
            let y0 = row * cell_h + inset_y;
            let cw = cell_w - 2 * inset_x;
            let ch = cell_h - 2 * inset_y;
            let pixels = masked.crop(x0, y0, cw, ch);
            let filled = fill::is_filled(&pixels, fill_params);
            cells.push(Cell {
                index: row * GRID_SIDE + col,
                pixels,
                filled,
            });
        }
    }
    debug!(
        "segment: {}x{} cells, {} filled",
        cell_w,
        cell_h,
        cells.iter().filter(|c| c.filled).count()
    );
    cells
}

/// Zero every pixel above the background threshold, keeping the grayscale
/// values of darker (stroke) pixels.
fn mask_background(gray: &GrayImage, thresh: u8) -> GrayImage {
    let mut out = gray.clone();
    for v in &mut out.data {
        if *v > thresh {
            *v = 0;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bright 9k×9k grid with a dark blob drawn in the middle of the listed
    /// cells. Blob intensity 90 survives the background mask and exceeds the
    /// fill brightness cutoff.
    fn grid_with_blobs(k: usize, blobs: &[(usize, usize)]) -> RgbImage {
        let side = GRID_SIDE * k;
        let mut img = RgbImage::new(side, side);
        for i in 0..img.data.len() {
            img.data[i] = 230;
        }
        for &(row, col) in blobs {
            let cy = row * k + k / 2;
            let cx = col * k + k / 2;
            let r = k / 4;
            for y in cy.saturating_sub(r)..(cy + r).min(side) {
                for x in cx.saturating_sub(r)..(cx + r).min(side) {
                    img.set_rgb(x, y, [90, 90, 90]);
                }
            }
        }
        img
    }

    #[test]
    fn returns_81_cells_row_major() {
        let img = grid_with_blobs(18, &[]);
        let cells = segment(&img, &SegmentParams::default(), &FillParams::default());
        assert_eq!(cells.len(), GRID_CELLS);
        for (i, cell) in cells.iter().enumerate() {
            assert_eq!(cell.index, i);
        }
    }

    #[test]
    fn blob_lands_in_the_matching_cell() {
        let img = grid_with_blobs(30, &[(2, 3), (8, 8)]);
        let cells = segment(&img, &SegmentParams::default(), &FillParams::default());
        let filled: Vec<usize> = cells.iter().filter(|c| c.filled).map(|c| c.index).collect();
        assert_eq!(filled, vec![2 * GRID_SIDE + 3, 8 * GRID_SIDE + 8]);
    }

    #[test]
    fn bright_background_is_masked_to_zero() {
        let img = grid_with_blobs(18, &[]);
        let cells = segment(&img, &SegmentParams::default(), &FillParams::default());
        assert!(cells.iter().all(|c| c.pixels.data.iter().all(|&v| v == 0)));
    }

    #[test]
    fn inset_shrinks_cell_buffers() {
        let img = grid_with_blobs(40, &[]);
        let cells = segment(&img, &SegmentParams::default(), &FillParams::default());
        // 40px cells with a 5% inset lose 2px per side.
        assert_eq!(cells[0].pixels.w, 36);
        assert_eq!(cells[0].pixels.h, 36);
    }
}
