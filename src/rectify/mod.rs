//! Puzzle localisation and perspective rectification.
//!
//! Stages
//! - Convert the photo to intensity and smooth it with a small Gaussian.
//! - Binarise with a locally-normalised threshold (inverted, so dark grid
//!   lines become foreground) to cope with uneven illumination.
//! - Trace external contours and keep the one enclosing the largest area;
//!   ties go to the first contour in row-major discovery order.
//! - Reduce the winner to a polygon at 2% of its perimeter; anything other
//!   than exactly four vertices means the boundary is not a clean
//!   quadrilateral.
//! - Order the corners canonically, size the destination from the longer
//!   opposite sides, and resample the color photo through a 4-point
//!   projective transform.
//!
//! Any failure aborts the whole extraction: a bad rectification invalidates
//! every downstream cell coordinate.

pub mod contours;
pub mod quad;
pub mod warp;

use crate::config::RectifyParams;
use crate::error::{ExtractError, GridNotFound};
use crate::image::ops::{gaussian_blur, luma, GAUSSIAN_5TAP};
use crate::image::{RgbImage, RgbU8};
use contours::{adaptive_mask, trace_external_contours, Contour};
use log::debug;
use quad::{approx_polygon, order_corners, Quad};

/// Locate the puzzle quadrilateral in `photo` and return it plus the
/// rectified top-down color buffer.
pub fn rectify(photo: RgbU8<'_>, params: &RectifyParams) -> Result<RgbImage, ExtractError> {
    let quad = locate_grid(photo, params)?;
    let (dst_w, dst_h) = quad.dest_size();
    if dst_w < params.min_side || dst_h < params.min_side {
        return Err(GridNotFound::DegenerateSize {
            width: dst_w,
            height: dst_h,
        }
        .into());
    }

    let h = warp::homography_to_quad(&quad, dst_w, dst_h)
        .ok_or(GridNotFound::ProjectionFailed)?;
    debug!("rectify: quad={quad:?} dest={dst_w}x{dst_h}");
    Ok(warp::warp_rgb(photo, &h, dst_w, dst_h))
}

/// Find the four ordered corners of the puzzle boundary.
pub fn locate_grid(photo: RgbU8<'_>, params: &RectifyParams) -> Result<Quad, ExtractError> {
    let gray = luma(photo);
    let blurred = gaussian_blur(&gray, GAUSSIAN_5TAP);
    let mask = adaptive_mask(&blurred, params.adaptive_block, params.adaptive_offset);

    let contours = trace_external_contours(&mask);
    if contours.is_empty() {
        return Err(GridNotFound::NoContours.into());
    }
    let candidate = largest_contour(&contours);
    debug!(
        "rectify: {} contours, largest area {:.1}",
        contours.len(),
        candidate.area()
    );

    let tolerance = params.approx_tolerance * candidate.perimeter();
    let polygon = approx_polygon(&candidate.points, tolerance);
    if polygon.len() != 4 {
        return Err(GridNotFound::NotQuadrilateral {
            vertices: polygon.len(),
        }
        .into());
    }

    Ok(order_corners([polygon[0], polygon[1], polygon[2], polygon[3]]))
}

/// Strictly largest enclosed area; the first contour in discovery order wins
/// ties, which keeps selection deterministic.
fn largest_contour(contours: &[Contour]) -> &Contour {
    let mut best = &contours[0];
    let mut best_area = best.area();
    for c in &contours[1..] {
        let area = c.area();
        if area > best_area {
            best = c;
            best_area = area;
        }
    }
    best
}
