//! Filled/empty decision for a single cell.

use crate::config::FillParams;
use crate::image::GrayImage;

/// Decide whether a cell contains a digit.
///
/// Only the central sub-region of the cell is inspected so residual border
/// noise never votes. A pixel counts as bright when it strictly exceeds
/// `brightness_thresh`; the cell counts as filled when the bright fraction
/// strictly exceeds `min_bright_fraction`. A cell sitting exactly on the
/// fraction is therefore classified empty.
pub fn is_filled(cell: &GrayImage, params: &FillParams) -> bool {
    let y0 = (cell.h as f32 * params.center_low) as usize;
    let y1 = (cell.h as f32 * params.center_high) as usize;
    let x0 = (cell.w as f32 * params.center_low) as usize;
    let x1 = (cell.w as f32 * params.center_high) as usize;
    if y1 <= y0 || x1 <= x0 {
        return false;
    }

    let mut bright = 0usize;
    for y in y0..y1 {
        for &v in &cell.row(y)[x0..x1] {
            if v > params.brightness_thresh {
                bright += 1;
            }
        }
    }
    let total = (y1 - y0) * (x1 - x0);
    (bright as f32 / total as f32) > params.min_bright_fraction
}
