//! Normalisation of a filled cell into canonical classifier input.
//!
//! Input is the background-masked cell produced by segmentation: paper is
//! already zero and the stroke keeps its grayscale values, so the polarity
//! is already stroke-bright. Steps, in order: a light Gaussian smooth,
//! percentile outlier clipping, Otsu scrubbing of residual background
//! noise, a 3×3 opening plus largest-blob selection to drop grid-line
//! artifacts, centroid centering,
//! bilinear resize to the classifier's input side, histogram matching
//! against the reference distribution, and min-max scaling to the
//! classifier's zero-centred input convention.
//!
//! When no blob survives the opening there is no digit candidate; the cell
//! is treated as empty retroactively. That is a deliberate policy branch,
//! not a swallowed error.

pub mod histogram;
pub mod morph;

use crate::config::NormalizeParams;
use crate::image::ops::{gaussian_blur, resize_bilinear, translate, GAUSSIAN_3TAP};
use crate::image::GrayImage;
use histogram::{match_histogram, percentile_clip, ReferenceCdf};
use log::debug;
use morph::{keep_largest_blob, opening};

/// Fixed-size single-channel float image in the classifier's input scale
/// (zero-centred, values in [-1, 1]).
#[derive(Clone, Debug)]
pub struct NormalizedDigit {
    pub side: usize,
    pub data: Vec<f32>,
}

/// Normalise a filled, background-masked cell. Returns `None` when no digit
/// blob survives the border-removal stage; the caller must then treat the
/// cell as empty.
pub fn normalize(
    cell: &GrayImage,
    params: &NormalizeParams,
    reference: &ReferenceCdf,
) -> Option<NormalizedDigit> {
    let smoothed = gaussian_blur(cell, GAUSSIAN_3TAP);
    let clipped = percentile_clip(&smoothed, params.clip_low_pct, params.clip_high_pct);

    // The mask leaves the stroke bright on a zero background; the Otsu
    // split scrubs whatever dim residue the global mask let through.
    let split = otsu_threshold(&clipped);
    let mut scrubbed = clipped;
    for v in &mut scrubbed.data {
        if *v <= split {
            *v = 0;
        }
    }

    let opened = opening(&scrubbed);
    let Some(digit) = keep_largest_blob(&scrubbed, &opened) else {
        debug!("normalize: no digit blob after opening, treating cell as empty");
        return None;
    };

    let centered = center_on_centroid(&digit);
    let resized = resize_bilinear(&centered, params.out_side, params.out_side);
    let matched = match_histogram(&resized, reference);
    Some(to_classifier_scale(&matched, params.out_side))
}

/// Otsu's threshold: the intensity split maximising between-class variance.
pub fn otsu_threshold(img: &GrayImage) -> u8 {
    let mut hist = [0u32; 256];
    for &v in &img.data {
        hist[v as usize] += 1;
    }
    let total = img.data.len() as f64;
    if total == 0.0 {
        return 0;
    }
    let weighted_sum: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut best_t = 0u8;
    let mut best_var = -1.0f64;
    let mut w0 = 0.0f64;
    let mut sum0 = 0.0f64;
    for t in 0..256 {
        w0 += hist[t] as f64;
        if w0 == 0.0 {
            continue;
        }
        let w1 = total - w0;
        if w1 == 0.0 {
            break;
        }
        sum0 += t as f64 * hist[t] as f64;
        let mu0 = sum0 / w0;
        let mu1 = (weighted_sum - sum0) / w1;
        let var = w0 * w1 * (mu0 - mu1) * (mu0 - mu1);
        if var > best_var {
            best_var = var;
            best_t = t as u8;
        }
    }
    best_t
}

/// Translate the image so the intensity centroid of its binarised mask lands
/// on the image centre. An empty mask leaves the image unshifted.
fn center_on_centroid(img: &GrayImage) -> GrayImage {
    let split = otsu_threshold(img);
    let mut sum_x = 0u64;
    let mut sum_y = 0u64;
    let mut count = 0u64;
    for y in 0..img.h {
        for x in 0..img.w {
            if img.get(x, y) > split {
                sum_x += x as u64;
                sum_y += y as u64;
                count += 1;
            }
        }
    }
    if count == 0 {
        return img.clone();
    }
    let cx = (sum_x / count) as isize;
    let cy = (sum_y / count) as isize;
    let dx = img.w as isize / 2 - cx;
    let dy = img.h as isize / 2 - cy;
    if dx == 0 && dy == 0 {
        return img.clone();
    }
    translate(img, dx, dy)
}

/// Min-max normalise to [0, 1], then rescale to the classifier's training
/// convention of zero-centred [-1, 1].
fn to_classifier_scale(img: &GrayImage, side: usize) -> NormalizedDigit {
    let min = img.data.iter().copied().min().unwrap_or(0) as f32;
    let max = img.data.iter().copied().max().unwrap_or(0) as f32;
    let range = max - min;
    let data = img
        .data
        .iter()
        .map(|&v| {
            let unit = if range > 0.0 { (v as f32 - min) / range } else { 0.0 };
            (unit - 0.5) / 0.5
        })
        .collect();
    NormalizedDigit { side, data }
}
