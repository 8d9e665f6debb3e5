//! Projective transform estimation and resampling.
//!
//! The homography is estimated from the four ordered corners with a DLT
//! solve (Hartley-normalised, smallest eigenvector of AᵀA) and maps
//! destination rectangle coordinates back into the source photo, so the warp
//! is a straight gather with bilinear sampling.

use super::quad::Quad;
use crate::image::{RgbImage, RgbU8};
use nalgebra::{Matrix3, SymmetricEigen, Vector3};

/// Compute the homography mapping the corners of a `dst_w × dst_h` rectangle
/// onto the ordered source quadrilateral.
///
/// Returns `None` when the system is numerically degenerate (collinear or
/// coincident corners).
pub fn homography_to_quad(quad: &Quad, dst_w: usize, dst_h: usize) -> Option<Matrix3<f64>> {
    let wm1 = (dst_w - 1) as f64;
    let hm1 = (dst_h - 1) as f64;
    let src = [[0.0, 0.0], [wm1, 0.0], [wm1, hm1], [0.0, hm1]];
    let dst: Vec<[f64; 2]> = quad
        .corners()
        .iter()
        .map(|p| [p[0] as f64, p[1] as f64])
        .collect();
    estimate_homography(&src, &dst)
}

/// Project a point through a homography; `None` when it maps to infinity.
pub fn project(h: &Matrix3<f64>, x: f64, y: f64) -> Option<[f64; 2]> {
    let v = h * Vector3::new(x, y, 1.0);
    let w = v[2];
    if !w.is_finite() || w.abs() < 1e-12 {
        return None;
    }
    Some([v[0] / w, v[1] / w])
}

/// Resample the photo through `h` into a `dst_w × dst_h` buffer with
/// bilinear interpolation. Samples falling outside the photo become black.
pub fn warp_rgb(photo: RgbU8<'_>, h: &Matrix3<f64>, dst_w: usize, dst_h: usize) -> RgbImage {
    let mut out = RgbImage::new(dst_w, dst_h);
    for y in 0..dst_h {
        for x in 0..dst_w {
            let Some([sx, sy]) = project(h, x as f64, y as f64) else {
                continue;
            };
            if let Some(px) = sample_bilinear(photo, sx, sy) {
                out.set_rgb(x, y, px);
            }
        }
    }
    out
}

fn sample_bilinear(photo: RgbU8<'_>, x: f64, y: f64) -> Option<[u8; 3]> {
    if x < 0.0 || y < 0.0 || x > (photo.w - 1) as f64 || y > (photo.h - 1) as f64 {
        return None;
    }
    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(photo.w - 1);
    let y1 = (y0 + 1).min(photo.h - 1);
    let wx = (x - x0 as f64) as f32;
    let wy = (y - y0 as f64) as f32;

    let mut px = [0u8; 3];
    let a = photo.rgb(x0, y0);
    let b = photo.rgb(x1, y0);
    let c = photo.rgb(x0, y1);
    let d = photo.rgb(x1, y1);
    for ch in 0..3 {
        let top = a[ch] as f32 * (1.0 - wx) + b[ch] as f32 * wx;
        let bot = c[ch] as f32 * (1.0 - wx) + d[ch] as f32 * wx;
        px[ch] = (top * (1.0 - wy) + bot * wy).round().clamp(0.0, 255.0) as u8;
    }
    Some(px)
}

/// DLT homography from exactly four correspondences with Hartley
/// normalisation. The solution is the eigenvector of AᵀA with the smallest
/// eigenvalue.
fn estimate_homography(src: &[[f64; 2]; 4], dst: &[[f64; 2]]) -> Option<Matrix3<f64>> {
    let (t_src, src_n) = normalize_points(src);
    let (t_dst, dst_n) = normalize_points(dst);

    let mut a = [[0.0f64; 9]; 8];
    for i in 0..4 {
        let (sx, sy) = (src_n[i][0], src_n[i][1]);
        let (dx, dy) = (dst_n[i][0], dst_n[i][1]);
        a[2 * i] = [0.0, 0.0, 0.0, -sx, -sy, -1.0, dy * sx, dy * sy, dy];
        a[2 * i + 1] = [sx, sy, 1.0, 0.0, 0.0, 0.0, -dx * sx, -dx * sy, -dx];
    }

    let mut ata = nalgebra::SMatrix::<f64, 9, 9>::zeros();
    for row in &a {
        for i in 0..9 {
            for j in 0..9 {
                ata[(i, j)] += row[i] * row[j];
            }
        }
    }

    let eig = SymmetricEigen::new(ata);
    let mut min_idx = 0;
    let mut min_val = eig.eigenvalues[0].abs();
    for i in 1..9 {
        let v = eig.eigenvalues[i].abs();
        if v < min_val {
            min_val = v;
            min_idx = i;
        }
    }
    let hv = eig.eigenvectors.column(min_idx);
    let h_norm = Matrix3::new(hv[0], hv[1], hv[2], hv[3], hv[4], hv[5], hv[6], hv[7], hv[8]);

    let t_dst_inv = t_dst.try_inverse()?;
    let h = t_dst_inv * h_norm * t_src;

    let scale = h[(2, 2)];
    if !scale.is_finite() || scale.abs() < 1e-12 {
        return None;
    }
    Some(h / scale)
}

/// Hartley normalisation: centroid to origin, mean distance √2.
fn normalize_points(pts: &[[f64; 2]]) -> (Matrix3<f64>, Vec<[f64; 2]>) {
    let n = pts.len() as f64;
    let cx: f64 = pts.iter().map(|p| p[0]).sum::<f64>() / n;
    let cy: f64 = pts.iter().map(|p| p[1]).sum::<f64>() / n;
    let mean_dist: f64 = pts
        .iter()
        .map(|p| ((p[0] - cx).powi(2) + (p[1] - cy).powi(2)).sqrt())
        .sum::<f64>()
        / n;
    let s = if mean_dist > 1e-15 {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };
    let t = Matrix3::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0);
    let normalized = pts.iter().map(|p| [s * (p[0] - cx), s * (p[1] - cy)]).collect();
    (t, normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_quad_maps_corners_exactly() {
        let quad = Quad {
            tl: [0.0, 0.0],
            tr: [99.0, 0.0],
            br: [99.0, 49.0],
            bl: [0.0, 49.0],
        };
        let h = homography_to_quad(&quad, 100, 50).unwrap();
        for (src, dst) in [
            ([0.0, 0.0], [0.0, 0.0]),
            ([99.0, 0.0], [99.0, 0.0]),
            ([99.0, 49.0], [99.0, 49.0]),
            ([0.0, 49.0], [0.0, 49.0]),
        ] {
            let p = project(&h, src[0], src[1]).unwrap();
            assert!((p[0] - dst[0]).abs() < 1e-6 && (p[1] - dst[1]).abs() < 1e-6);
        }
    }

    #[test]
    fn skewed_quad_corners_land_on_quad() {
        let quad = Quad {
            tl: [12.0, 8.0],
            tr: [208.0, 15.0],
            br: [215.0, 190.0],
            bl: [5.0, 201.0],
        };
        let h = homography_to_quad(&quad, 200, 200).unwrap();
        let tl = project(&h, 0.0, 0.0).unwrap();
        let br = project(&h, 199.0, 199.0).unwrap();
        assert!((tl[0] - 12.0).abs() < 1e-4 && (tl[1] - 8.0).abs() < 1e-4);
        assert!((br[0] - 215.0).abs() < 1e-4 && (br[1] - 190.0).abs() < 1e-4);
    }

    #[test]
    fn projection_to_infinity_is_none() {
        let h = Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0);
        assert!(project(&h, 3.0, 4.0).is_none());
    }
}
