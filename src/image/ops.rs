//! Basic raster operations used across the pipeline: grayscale conversion,
//! separable Gaussian smoothing, bilinear resizing and integer translation.
//!
//! Borders are clamped (edge pixels repeat) so kernel passes never shrink
//! the image.

use super::{GrayImage, RgbU8};

/// Normalised 3-tap Gaussian kernel `[1, 2, 1] / 4`.
pub const GAUSSIAN_3TAP: &[f32] = &[0.25, 0.5, 0.25];

/// Normalised 5-tap Gaussian kernel `[1, 4, 6, 4, 1] / 16`.
pub const GAUSSIAN_5TAP: &[f32] = &[0.0625, 0.25, 0.375, 0.25, 0.0625];

/// Convert an interleaved RGB view to 8-bit intensity (Rec. 601 weights).
pub fn luma(photo: RgbU8<'_>) -> GrayImage {
    let mut out = GrayImage::new(photo.w, photo.h);
    for y in 0..photo.h {
        for x in 0..photo.w {
            let [r, g, b] = photo.rgb(x, y);
            let v = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
            out.set(x, y, v.round().clamp(0.0, 255.0) as u8);
        }
    }
    out
}

/// Smooth an image with a symmetric separable kernel (two 1D passes).
pub fn gaussian_blur(src: &GrayImage, taps: &[f32]) -> GrayImage {
    assert!(!taps.is_empty(), "kernel must provide at least one tap");
    if src.w == 0 || src.h == 0 {
        return src.clone();
    }
    let radius = taps.len() / 2;

    // Horizontal pass into a float scratch buffer, then vertical pass.
    let mut horiz = vec![0.0f32; src.w * src.h];
    for y in 0..src.h {
        let row = src.row(y);
        let out_row = &mut horiz[y * src.w..(y + 1) * src.w];
        for x in 0..src.w {
            let mut acc = 0.0f32;
            for (k, &tap) in taps.iter().enumerate() {
                let sx = clamp_offset(x, k as isize - radius as isize, src.w);
                acc += tap * row[sx] as f32;
            }
            out_row[x] = acc;
        }
    }

    let mut out = GrayImage::new(src.w, src.h);
    for y in 0..src.h {
        for x in 0..src.w {
            let mut acc = 0.0f32;
            for (k, &tap) in taps.iter().enumerate() {
                let sy = clamp_offset(y, k as isize - radius as isize, src.h);
                acc += tap * horiz[sy * src.w + x];
            }
            out.set(x, y, acc.round().clamp(0.0, 255.0) as u8);
        }
    }
    out
}

/// Resize with bilinear interpolation to `ow × oh`.
pub fn resize_bilinear(src: &GrayImage, ow: usize, oh: usize) -> GrayImage {
    assert!(ow > 0 && oh > 0, "target dimensions must be positive");
    let mut out = GrayImage::new(ow, oh);
    if src.w == 0 || src.h == 0 {
        return out;
    }
    let sx_scale = src.w as f32 / ow as f32;
    let sy_scale = src.h as f32 / oh as f32;
    for y in 0..oh {
        // Sample at pixel centres so scale factors stay symmetric.
        let fy = ((y as f32 + 0.5) * sy_scale - 0.5).max(0.0);
        let y0 = (fy as usize).min(src.h - 1);
        let y1 = (y0 + 1).min(src.h - 1);
        let wy = fy - y0 as f32;
        for x in 0..ow {
            let fx = ((x as f32 + 0.5) * sx_scale - 0.5).max(0.0);
            let x0 = (fx as usize).min(src.w - 1);
            let x1 = (x0 + 1).min(src.w - 1);
            let wx = fx - x0 as f32;

            let top = src.get(x0, y0) as f32 * (1.0 - wx) + src.get(x1, y0) as f32 * wx;
            let bot = src.get(x0, y1) as f32 * (1.0 - wx) + src.get(x1, y1) as f32 * wx;
            let v = top * (1.0 - wy) + bot * wy;
            out.set(x, y, v.round().clamp(0.0, 255.0) as u8);
        }
    }
    out
}

/// Shift an image by an integer offset, filling uncovered pixels with zero.
pub fn translate(src: &GrayImage, dx: isize, dy: isize) -> GrayImage {
    let mut out = GrayImage::new(src.w, src.h);
    for y in 0..src.h {
        let sy = y as isize - dy;
        if sy < 0 || sy >= src.h as isize {
            continue;
        }
        for x in 0..src.w {
            let sx = x as isize - dx;
            if sx < 0 || sx >= src.w as isize {
                continue;
            }
            out.set(x, y, src.get(sx as usize, sy as usize));
        }
    }
    out
}

#[inline]
fn clamp_offset(base: usize, offset: isize, upper: usize) -> usize {
    let idx = base as isize + offset;
    if idx < 0 {
        0
    } else if idx as usize >= upper {
        upper - 1
    } else {
        idx as usize
    }
}
