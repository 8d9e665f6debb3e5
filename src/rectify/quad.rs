//! Polygon reduction and canonical corner ordering for the puzzle boundary.

use serde::Serialize;

/// Ordered corners of the detected puzzle boundary.
///
/// Canonical order is {top-left, top-right, bottom-right, bottom-left}. The
/// corners must be non-collinear and form a convex simple polygon.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Quad {
    pub tl: [f32; 2],
    pub tr: [f32; 2],
    pub br: [f32; 2],
    pub bl: [f32; 2],
}

impl Quad {
    /// Corners in canonical order.
    pub fn corners(&self) -> [[f32; 2]; 4] {
        [self.tl, self.tr, self.br, self.bl]
    }

    /// Destination size of the rectified buffer: width is the longer of the
    /// two horizontal sides, height the longer of the two vertical sides,
    /// each floored and at least 1.
    pub fn dest_size(&self) -> (usize, usize) {
        let width = distance(self.br, self.bl).max(distance(self.tr, self.tl));
        let height = distance(self.tr, self.br).max(distance(self.tl, self.bl));
        ((width as usize).max(1), (height as usize).max(1))
    }
}

/// Order four corner points into canonical {TL, TR, BR, BL}:
/// TL minimises x+y, BR maximises x+y, TR minimises x−y, BL maximises x−y.
pub fn order_corners(pts: [[f32; 2]; 4]) -> Quad {
    let sum = |p: [f32; 2]| p[0] + p[1];
    let diff = |p: [f32; 2]| p[0] - p[1];

    let mut tl = pts[0];
    let mut tr = pts[0];
    let mut br = pts[0];
    let mut bl = pts[0];
    for &p in &pts[1..] {
        if sum(p) < sum(tl) {
            tl = p;
        }
        if sum(p) > sum(br) {
            br = p;
        }
        if diff(p) > diff(tr) {
            tr = p;
        }
        if diff(p) < diff(bl) {
            bl = p;
        }
    }
    Quad { tl, tr, br, bl }
}

/// Reduce a closed contour to a polygon with fewer vertices using
/// Ramer–Douglas–Peucker at the given absolute tolerance.
///
/// The curve is split at the point farthest from the first point, each half
/// is simplified as an open polyline, and the shared endpoints are merged.
pub fn approx_polygon(points: &[[f32; 2]], epsilon: f32) -> Vec<[f32; 2]> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let anchor = points[0];
    let mut far = 0;
    let mut far_d = 0.0f32;
    for (i, &p) in points.iter().enumerate() {
        let d = distance(anchor, p);
        if d > far_d {
            far_d = d;
            far = i;
        }
    }
    if far == 0 {
        // All points coincide.
        return vec![anchor];
    }

    let first_half = rdp(&points[..=far], epsilon);
    let mut wrapped: Vec<[f32; 2]> = points[far..].to_vec();
    wrapped.push(anchor);
    let second_half = rdp(&wrapped, epsilon);

    // Drop the duplicated split point and the duplicated closing anchor.
    let mut out = first_half;
    out.extend_from_slice(&second_half[1..second_half.len() - 1]);
    out
}

/// Classic recursive Ramer–Douglas–Peucker on an open polyline. Endpoints
/// are always kept.
fn rdp(points: &[[f32; 2]], epsilon: f32) -> Vec<[f32; 2]> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let first = points[0];
    let last = points[points.len() - 1];
    let mut far = 0;
    let mut far_d = 0.0f32;
    for (i, &p) in points.iter().enumerate().skip(1).take(points.len() - 2) {
        let d = point_segment_distance(p, first, last);
        if d > far_d {
            far_d = d;
            far = i;
        }
    }
    if far_d <= epsilon {
        return vec![first, last];
    }
    let mut left = rdp(&points[..=far], epsilon);
    let right = rdp(&points[far..], epsilon);
    left.pop();
    left.extend_from_slice(&right);
    left
}

pub(crate) fn distance(a: [f32; 2], b: [f32; 2]) -> f32 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
}

fn point_segment_distance(p: [f32; 2], a: [f32; 2], b: [f32; 2]) -> f32 {
    let abx = b[0] - a[0];
    let aby = b[1] - a[1];
    let len_sq = abx * abx + aby * aby;
    if len_sq <= f32::EPSILON {
        return distance(p, a);
    }
    let t = ((p[0] - a[0]) * abx + (p[1] - a[1]) * aby) / len_sq;
    let t = t.clamp(0.0, 1.0);
    let proj = [a[0] + t * abx, a[1] + t * aby];
    distance(p, proj)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_of_axis_aligned_rect() {
        let quad = order_corners([[10.0, 0.0], [0.0, 0.0], [0.0, 5.0], [10.0, 5.0]]);
        assert_eq!(quad.tl, [0.0, 0.0]);
        assert_eq!(quad.tr, [10.0, 0.0]);
        assert_eq!(quad.br, [10.0, 5.0]);
        assert_eq!(quad.bl, [0.0, 5.0]);
    }

    #[test]
    fn ordering_uses_each_point_once_for_valid_quads() {
        // A skewed but convex quadrilateral.
        let pts = [[3.0, 1.0], [11.0, 2.0], [12.0, 9.0], [2.0, 8.0]];
        let quad = order_corners(pts);
        let ordered = quad.corners();
        for p in pts {
            assert_eq!(
                ordered.iter().filter(|&&q| q == p).count(),
                1,
                "point {p:?} should appear exactly once"
            );
        }
        // TL always has the minimum coordinate sum.
        let min_sum = pts.iter().map(|p| p[0] + p[1]).fold(f32::MAX, f32::min);
        assert_eq!(quad.tl[0] + quad.tl[1], min_sum);
    }

    #[test]
    fn dest_size_takes_longer_opposite_sides() {
        let quad = Quad {
            tl: [0.0, 0.0],
            tr: [100.0, 0.0],
            br: [90.0, 45.0],
            bl: [0.0, 50.0],
        };
        let (w, h) = quad.dest_size();
        assert_eq!(w, 100); // top edge longer than bottom
        assert_eq!(h, 50); // left edge longer than right
    }

    #[test]
    fn rectangle_contour_reduces_to_four_vertices() {
        // Dense samples along a 40x20 rectangle boundary.
        let mut pts = Vec::new();
        for x in 0..40 {
            pts.push([x as f32, 0.0]);
        }
        for y in 0..20 {
            pts.push([40.0, y as f32]);
        }
        for x in (1..=40).rev() {
            pts.push([x as f32, 20.0]);
        }
        for y in (1..=20).rev() {
            pts.push([0.0, y as f32]);
        }
        let perimeter = 2.0 * (40.0 + 20.0);
        let approx = approx_polygon(&pts, 0.02 * perimeter);
        assert_eq!(approx.len(), 4, "got {approx:?}");
    }

    #[test]
    fn jagged_contour_keeps_more_than_four_vertices() {
        // A staircase cannot be explained by a quadrilateral at tight tolerance.
        let mut pts = Vec::new();
        for i in 0..10 {
            pts.push([i as f32 * 10.0, 0.0]);
            pts.push([i as f32 * 10.0 + 5.0, 25.0]);
        }
        let approx = approx_polygon(&pts, 1.0);
        assert!(approx.len() > 4, "staircase collapsed to {}", approx.len());
    }
}
