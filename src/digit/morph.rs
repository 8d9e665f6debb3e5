//! Grayscale morphology and connected-component selection.
//!
//! The puzzle's grid lines survive cell cropping as thin streaks along the
//! borders. A 3×3 opening erases anything thinner than the structuring
//! element, and keeping only the largest connected blob afterwards leaves
//! the digit stroke alone.

use crate::image::GrayImage;

/// Morphological opening: erosion followed by dilation with a 3×3 window.
pub fn opening(src: &GrayImage) -> GrayImage {
    dilate(&erode(src))
}

/// Grayscale erosion: each pixel becomes the minimum of its 3×3
/// neighbourhood (window clipped at the borders).
pub fn erode(src: &GrayImage) -> GrayImage {
    morph(src, |acc, v| acc.min(v), u8::MAX)
}

/// Grayscale dilation: each pixel becomes the maximum of its 3×3
/// neighbourhood (window clipped at the borders).
pub fn dilate(src: &GrayImage) -> GrayImage {
    morph(src, |acc, v| acc.max(v), u8::MIN)
}

fn morph(src: &GrayImage, fold: impl Fn(u8, u8) -> u8, init: u8) -> GrayImage {
    let mut out = GrayImage::new(src.w, src.h);
    for y in 0..src.h {
        let y0 = y.saturating_sub(1);
        let y1 = (y + 1).min(src.h.saturating_sub(1));
        for x in 0..src.w {
            let x0 = x.saturating_sub(1);
            let x1 = (x + 1).min(src.w.saturating_sub(1));
            let mut acc = init;
            for ny in y0..=y1 {
                for nx in x0..=x1 {
                    acc = fold(acc, src.get(nx, ny));
                }
            }
            out.set(x, y, acc);
        }
    }
    out
}

/// Keep only the pixels belonging to the largest connected non-zero blob of
/// `opened`, reading the kept values from `source` (the pre-opening image so
/// stroke intensities are preserved).
///
/// Components use 8-connectivity; size is the pixel count, and the first
/// blob in row-major discovery order wins ties. Returns `None` when the
/// opened image has no foreground at all; the caller treats that cell as
/// empty.
pub fn keep_largest_blob(source: &GrayImage, opened: &GrayImage) -> Option<GrayImage> {
    debug_assert_eq!((source.w, source.h), (opened.w, opened.h));
    let (w, h) = (opened.w, opened.h);
    let mut labels = vec![0u32; w * h];
    let mut next_label = 0u32;
    let mut best_label = 0u32;
    let mut best_size = 0usize;
    let mut stack = Vec::new();

    for start in 0..w * h {
        if opened.data[start] == 0 || labels[start] != 0 {
            continue;
        }
        next_label += 1;
        let label = next_label;
        let mut size = 0usize;
        labels[start] = label;
        stack.push(start);
        while let Some(idx) = stack.pop() {
            size += 1;
            let x = (idx % w) as isize;
            let y = (idx / w) as isize;
            for dy in -1..=1isize {
                for dx in -1..=1isize {
                    let (nx, ny) = (x + dx, y + dy);
                    if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                        continue;
                    }
                    let nidx = ny as usize * w + nx as usize;
                    if opened.data[nidx] != 0 && labels[nidx] == 0 {
                        labels[nidx] = label;
                        stack.push(nidx);
                    }
                }
            }
        }
        if size > best_size {
            best_size = size;
            best_label = label;
        }
    }

    if best_label == 0 {
        return None;
    }
    let mut out = GrayImage::new(w, h);
    for i in 0..w * h {
        if labels[i] == best_label {
            out.data[i] = source.data[i];
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_removes_one_pixel_wide_line() {
        let mut img = GrayImage::new(12, 12);
        for y in 0..12 {
            img.set(0, y, 200); // border artifact one pixel wide
        }
        let opened = opening(&img);
        assert!(opened.data.iter().all(|&v| v == 0));
    }

    #[test]
    fn opening_keeps_a_thick_stroke() {
        let mut img = GrayImage::new(12, 12);
        for y in 2..10 {
            for x in 4..8 {
                img.set(x, y, 180);
            }
        }
        let opened = opening(&img);
        assert!(opened.get(5, 5) > 0, "stroke interior should survive");
    }

    #[test]
    fn largest_blob_wins() {
        let mut img = GrayImage::new(16, 8);
        // Small blob left, larger blob right.
        for y in 2..4 {
            for x in 1..3 {
                img.set(x, y, 100);
            }
        }
        for y in 1..7 {
            for x in 8..14 {
                img.set(x, y, 150);
            }
        }
        let kept = keep_largest_blob(&img, &img).unwrap();
        assert_eq!(kept.get(2, 2), 0, "small blob should be erased");
        assert_eq!(kept.get(10, 3), 150, "large blob should survive");
    }

    #[test]
    fn empty_foreground_yields_none() {
        let img = GrayImage::new(8, 8);
        assert!(keep_largest_blob(&img, &img).is_none());
    }
}
