//! Tunable thresholds for every extraction stage.
//!
//! All cutoffs are plain data threaded through the stages rather than
//! module-level constants, so each stage stays pure and can be tested with
//! synthetic inputs. Defaults match the constants the pipeline was tuned
//! with; a JSON file can override any subset of them.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Parameters for locating and rectifying the puzzle quadrilateral.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RectifyParams {
    /// Side length of the local window used by adaptive thresholding (odd).
    pub adaptive_block: usize,
    /// Offset subtracted from the local mean before comparing.
    pub adaptive_offset: f32,
    /// Polygon approximation tolerance as a fraction of contour perimeter.
    pub approx_tolerance: f32,
    /// Minimum rectified side length; anything smaller cannot hold 81 cells.
    pub min_side: usize,
}

impl Default for RectifyParams {
    fn default() -> Self {
        Self {
            adaptive_block: 11,
            adaptive_offset: 2.0,
            approx_tolerance: 0.02,
            min_side: 9,
        }
    }
}

/// Parameters for slicing the rectified grid into 81 cells.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SegmentParams {
    /// Global intensity cutoff separating background from digit strokes.
    /// Pixels above it are masked to zero; pixels at or below keep their
    /// grayscale value.
    pub background_thresh: u8,
    /// Fraction of each cell side cropped inward to drop grid-line pixels.
    pub inset_fraction: f32,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            background_thresh: 128,
            inset_fraction: 0.05,
        }
    }
}

/// Parameters for the filled/empty cell heuristic.
///
/// A cell counts as filled when, inside the central sub-region
/// `[center_low, center_high)` of both axes, strictly more than
/// `min_bright_fraction` of the pixels exceed `brightness_thresh`.
/// A cell sitting exactly on the fraction is classified empty.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FillParams {
    pub center_low: f32,
    pub center_high: f32,
    pub brightness_thresh: u8,
    pub min_bright_fraction: f32,
}

impl Default for FillParams {
    fn default() -> Self {
        Self {
            center_low: 0.30,
            center_high: 0.70,
            brightness_thresh: 50,
            min_bright_fraction: 0.10,
        }
    }
}

/// Parameters for normalising a filled cell into classifier input.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct NormalizeParams {
    /// Lower percentile for intensity outlier clipping.
    pub clip_low_pct: f32,
    /// Upper percentile for intensity outlier clipping.
    pub clip_high_pct: f32,
    /// Output side length expected by the classifier.
    pub out_side: usize,
}

impl Default for NormalizeParams {
    fn default() -> Self {
        Self {
            clip_low_pct: 2.0,
            clip_high_pct: 98.0,
            out_side: 28,
        }
    }
}

/// All extraction-stage parameters bundled together.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExtractParams {
    pub rectify: RectifyParams,
    pub segment: SegmentParams,
    pub fill: FillParams,
    pub normalize: NormalizeParams,
}

/// Load extraction parameters from a JSON file. Missing fields fall back to
/// their defaults.
pub fn load_params(path: &Path) -> Result<ExtractParams, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
