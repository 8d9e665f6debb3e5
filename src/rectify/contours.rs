//! Foreground binarisation and external contour extraction.
//!
//! Photographs have uneven illumination, so the mask is built with a
//! locally-normalised threshold (pixel vs. mean of its neighbourhood) rather
//! than a single global cutoff. Connected foreground regions are discovered
//! by a row-major scan with an explicit flood-fill stack, and the outer
//! boundary of each region is walked with Moore neighbour tracing. The scan
//! order makes contour enumeration deterministic.

use crate::image::GrayImage;

/// Closed outer boundary of one connected foreground region.
///
/// Points are pixel centres in trace order.
#[derive(Clone, Debug)]
pub struct Contour {
    pub points: Vec<[f32; 2]>,
}

impl Contour {
    /// Enclosed area via the shoelace formula.
    pub fn area(&self) -> f32 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut acc = 0.0f32;
        for i in 0..n {
            let [x0, y0] = self.points[i];
            let [x1, y1] = self.points[(i + 1) % n];
            acc += x0 * y1 - x1 * y0;
        }
        acc.abs() * 0.5
    }

    /// Closed arc length of the boundary.
    pub fn perimeter(&self) -> f32 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        let mut acc = 0.0f32;
        for i in 0..n {
            let [x0, y0] = self.points[i];
            let [x1, y1] = self.points[(i + 1) % n];
            acc += ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
        }
        acc
    }
}

/// Binarise with a locally-normalised threshold and invert, so dark puzzle
/// lines become foreground (1) and bright paper becomes background (0).
///
/// A pixel is foreground when its value falls below the mean of its
/// `block × block` neighbourhood by more than `offset`.
pub fn adaptive_mask(gray: &GrayImage, block: usize, offset: f32) -> GrayImage {
    assert!(block >= 3 && block % 2 == 1, "block must be odd and >= 3");
    let (w, h) = (gray.w, gray.h);
    let mut mask = GrayImage::new(w, h);
    if w == 0 || h == 0 {
        return mask;
    }

    // Summed-area table with a one-pixel zero border.
    let iw = w + 1;
    let mut integral = vec![0u64; iw * (h + 1)];
    for y in 0..h {
        let row = gray.row(y);
        let mut run = 0u64;
        for x in 0..w {
            run += row[x] as u64;
            integral[(y + 1) * iw + x + 1] = integral[y * iw + x + 1] + run;
        }
    }

    let half = (block / 2) as isize;
    for y in 0..h {
        let y0 = (y as isize - half).max(0) as usize;
        let y1 = ((y as isize + half) as usize).min(h - 1);
        for x in 0..w {
            let x0 = (x as isize - half).max(0) as usize;
            let x1 = ((x as isize + half) as usize).min(w - 1);
            let count = ((x1 - x0 + 1) * (y1 - y0 + 1)) as f32;
            let sum = integral[(y1 + 1) * iw + x1 + 1] + integral[y0 * iw + x0]
                - integral[y0 * iw + x1 + 1]
                - integral[(y1 + 1) * iw + x0];
            let mean = sum as f32 / count;
            if (gray.get(x, y) as f32) < mean - offset {
                mask.set(x, y, 1);
            }
        }
    }
    mask
}

// Clockwise 8-neighbourhood starting west (y grows downward).
const MOORE: [(i32, i32); 8] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
];

/// Trace the outer boundary of every connected foreground region in `mask`
/// (non-zero = foreground, 8-connectivity). Regions are returned in
/// row-major discovery order of their topmost-leftmost pixel.
pub fn trace_external_contours(mask: &GrayImage) -> Vec<Contour> {
    let (w, h) = (mask.w, mask.h);
    let mut labels = vec![0u32; w * h];
    let mut contours = Vec::new();
    let mut stack: Vec<usize> = Vec::new();
    let mut next_label = 0u32;

    for start in 0..w * h {
        if mask.data[start] == 0 || labels[start] != 0 {
            continue;
        }
        next_label += 1;
        let label = next_label;

        // Flood-fill the component so later scan positions skip it.
        let mut size = 0usize;
        labels[start] = label;
        stack.push(start);
        while let Some(idx) = stack.pop() {
            size += 1;
            let x = (idx % w) as i32;
            let y = (idx / w) as i32;
            for (dx, dy) in MOORE {
                let nx = x + dx;
                let ny = y + dy;
                if nx < 0 || ny < 0 || nx >= w as i32 || ny >= h as i32 {
                    continue;
                }
                let nidx = ny as usize * w + nx as usize;
                if mask.data[nidx] != 0 && labels[nidx] == 0 {
                    labels[nidx] = label;
                    stack.push(nidx);
                }
            }
        }

        let sx = (start % w) as i32;
        let sy = (start / w) as i32;
        contours.push(trace_boundary(&labels, w, h, label, sx, sy, size));
    }
    contours
}

/// Moore neighbour tracing from the topmost-leftmost pixel of a component.
///
/// The start pixel has no component neighbours to its west or in any earlier
/// row, so the trace always begins by scanning clockwise from the west. The
/// walk keeps the last examined background pixel as its backtrack anchor and
/// terminates on the first return to the start pixel, with an iteration cap
/// as a safety net on pathological masks.
fn trace_boundary(
    labels: &[u32],
    w: usize,
    h: usize,
    label: u32,
    sx: i32,
    sy: i32,
    size: usize,
) -> Contour {
    let inside = |x: i32, y: i32| -> bool {
        x >= 0
            && y >= 0
            && x < w as i32
            && y < h as i32
            && labels[y as usize * w + x as usize] == label
    };
    let dir_index = |dx: i32, dy: i32| -> usize {
        MOORE
            .iter()
            .position(|&d| d == (dx, dy))
            .unwrap_or(0)
    };

    let mut points = vec![[sx as f32, sy as f32]];
    let (mut px, mut py) = (sx, sy);
    // Backtrack anchor: the background pixel the current pixel was entered
    // from. The west neighbour of the start pixel is background by the scan
    // order.
    let (mut bx, mut by) = (sx - 1, sy);
    let cap = 4 * size + 8;

    for _ in 0..cap {
        let bdir = dir_index(bx - px, by - py);
        let mut found = None;
        for step in 1..=8 {
            let dir = (bdir + step) % 8;
            let (dx, dy) = MOORE[dir];
            let (nx, ny) = (px + dx, py + dy);
            if inside(nx, ny) {
                // The neighbour examined just before the hit is background;
                // it becomes the next backtrack anchor.
                let prev = (bdir + step - 1) % 8;
                let (pdx, pdy) = MOORE[prev];
                found = Some((nx, ny, px + pdx, py + pdy));
                break;
            }
        }
        let Some((nx, ny, nbx, nby)) = found else {
            break; // isolated pixel
        };
        if nx == sx && ny == sy {
            break; // boundary closed
        }
        px = nx;
        py = ny;
        bx = nbx;
        by = nby;
        points.push([px as f32, py as f32]);
    }

    Contour { points }
}
