//! Histogram matching against a precomputed reference distribution.
//!
//! The external classifier was calibrated on a particular stroke-intensity
//! distribution. Mapping each cell's cumulative distribution onto the
//! reference cumulative distribution makes the normalised cells
//! statistically comparable to that calibration set. The reference is an
//! external asset: a 256-bin histogram loaded once at startup and treated as
//! immutable configuration from then on.

use crate::image::GrayImage;
use std::fs;
use std::path::Path;

pub const BINS: usize = 256;

/// Normalised cumulative distribution over the 256 intensity bins.
#[derive(Clone, Debug)]
pub struct ReferenceCdf {
    cdf: [f32; BINS],
}

impl ReferenceCdf {
    /// Build from a raw 256-bin histogram (any non-negative scale).
    pub fn from_histogram(hist: &[f32]) -> Result<Self, String> {
        if hist.len() != BINS {
            return Err(format!("reference histogram must have {BINS} bins, got {}", hist.len()));
        }
        let total: f32 = hist.iter().sum();
        if !(total > 0.0) || hist.iter().any(|&v| v < 0.0 || !v.is_finite()) {
            return Err("reference histogram must be non-negative with positive mass".to_string());
        }
        let mut cdf = [0.0f32; BINS];
        let mut run = 0.0f32;
        for (i, &v) in hist.iter().enumerate() {
            run += v;
            cdf[i] = run / total;
        }
        Ok(Self { cdf })
    }

    /// Uniform reference: histogram matching against it becomes histogram
    /// equalisation. Handy for tests and as a neutral default.
    pub fn uniform() -> Self {
        let mut cdf = [0.0f32; BINS];
        for (i, v) in cdf.iter_mut().enumerate() {
            *v = (i + 1) as f32 / BINS as f32;
        }
        Self { cdf }
    }

    /// Cumulative mass at and below `bin`.
    #[inline]
    pub fn at(&self, bin: usize) -> f32 {
        self.cdf[bin]
    }

    /// Smallest intensity whose cumulative mass reaches `mass`.
    fn quantile(&self, mass: f32) -> u8 {
        match self
            .cdf
            .iter()
            .position(|&c| c >= mass)
        {
            Some(i) => i as u8,
            None => (BINS - 1) as u8,
        }
    }
}

/// Load a 256-bin reference histogram from a JSON array of numbers.
pub fn load_reference_histogram(path: &Path) -> Result<ReferenceCdf, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read histogram {}: {e}", path.display()))?;
    let hist: Vec<f32> = serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse histogram {}: {e}", path.display()))?;
    ReferenceCdf::from_histogram(&hist)
}

/// Remap image intensities so their cumulative distribution follows the
/// reference.
pub fn match_histogram(img: &GrayImage, reference: &ReferenceCdf) -> GrayImage {
    let total = (img.w * img.h) as f32;
    if total == 0.0 {
        return img.clone();
    }
    let mut hist = [0u32; BINS];
    for &v in &img.data {
        hist[v as usize] += 1;
    }
    let mut mapping = [0u8; BINS];
    let mut run = 0u32;
    for i in 0..BINS {
        run += hist[i];
        let mass = run as f32 / total;
        mapping[i] = reference.quantile(mass);
    }
    let mut out = img.clone();
    for v in &mut out.data {
        *v = mapping[*v as usize];
    }
    out
}

/// Clip intensities to the `[low_pct, high_pct]` percentile range of the
/// image, suppressing local lighting outliers.
pub fn percentile_clip(img: &GrayImage, low_pct: f32, high_pct: f32) -> GrayImage {
    let n = img.data.len();
    if n == 0 {
        return img.clone();
    }
    let mut sorted = img.data.clone();
    sorted.sort_unstable();
    let rank = |pct: f32| -> u8 {
        let idx = (pct / 100.0 * (n - 1) as f32).round() as usize;
        sorted[idx.min(n - 1)]
    };
    let lo = rank(low_pct);
    let hi = rank(high_pct);
    let mut out = img.clone();
    for v in &mut out.data {
        *v = (*v).clamp(lo, hi);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_rejects_wrong_bin_count() {
        assert!(ReferenceCdf::from_histogram(&[1.0; 10]).is_err());
    }

    #[test]
    fn reference_rejects_zero_mass() {
        assert!(ReferenceCdf::from_histogram(&[0.0; BINS]).is_err());
    }

    #[test]
    fn matching_to_own_distribution_is_near_identity() {
        // Two-level image matched against its own histogram keeps its levels
        // (up to the quantile granularity of the CDF lookup).
        let mut hist = [0.0f32; BINS];
        hist[40] = 3.0;
        hist[200] = 1.0;
        let reference = ReferenceCdf::from_histogram(&hist).unwrap();
        let img = GrayImage::from_raw(2, 2, vec![40, 40, 40, 200]);
        let matched = match_histogram(&img, &reference);
        assert_eq!(matched.data, vec![40, 40, 40, 200]);
    }

    #[test]
    fn equalisation_spreads_a_dark_image() {
        let img = GrayImage::from_raw(2, 2, vec![10, 20, 30, 40]);
        let matched = match_histogram(&img, &ReferenceCdf::uniform());
        // Each level holds a quarter of the mass; equalisation spreads them
        // across the full range.
        assert_eq!(matched.data, vec![63, 127, 191, 255]);
    }

    #[test]
    fn reference_loads_from_a_json_array() {
        let hist: Vec<f32> = (0..BINS).map(|i| if i < 128 { 2.0 } else { 1.0 }).collect();
        let path = std::env::temp_dir().join("sudoku_scan_hist_test.json");
        std::fs::write(&path, serde_json::to_string(&hist).unwrap()).unwrap();
        let reference = load_reference_histogram(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert!((reference.at(BINS - 1) - 1.0).abs() < 1e-6);
        assert!((reference.at(127) - 2.0 / 3.0).abs() < 1e-3);
    }

    #[test]
    fn percentile_clip_limits_outliers() {
        let mut data = vec![100u8; 100];
        data[0] = 0;
        data[99] = 255;
        let img = GrayImage::from_raw(10, 10, data);
        let clipped = percentile_clip(&img, 2.0, 98.0);
        assert!(clipped.data.iter().all(|&v| v == 100));
    }
}
