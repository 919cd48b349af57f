//! Closed-polyline simplification using the Ramer-Douglas-Peucker
//! algorithm.
//!
//! The contour is a closed curve, so the classic open-path RDP (which
//! pins the first and last points) would never consider the wraparound
//! edge. Instead the ring is split at the point farthest from point 0,
//! and both halves are simplified -- the second half against an appended
//! sentinel copy of point 0, which covers the wraparound edge.
//!
//! The absolute tolerance is derived by the caller as
//! `epsilon_factor * perimeter`, so simplification aggressiveness
//! scales with contour size.

use crate::types::Point;

/// Perimeter of a closed polyline, wraparound edge included.
///
/// Fewer than 2 points have no edges and a zero perimeter.
#[must_use]
pub fn closed_perimeter(points: &[Point]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let wrap = match (points.last(), points.first()) {
        (Some(&last), Some(&first)) => last.distance(first),
        _ => 0.0,
    };
    points.windows(2).map(|w| w[0].distance(w[1])).sum::<f64>() + wrap
}

/// Simplify a closed polyline with absolute tolerance `tolerance`.
///
/// Returns the surviving vertices in input order. Inputs with fewer
/// than 3 points are returned unchanged. The output may drop below 3
/// vertices for near-degenerate rings; the caller is responsible for
/// rejecting those.
#[must_use = "returns the simplified vertex sequence"]
pub fn simplify_closed(points: &[Point], tolerance: f64) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    // Split the ring at the vertex farthest from point 0.
    let mut far = 0;
    let mut far_dist = 0.0;
    for (i, p) in points.iter().enumerate() {
        let d = points[0].distance_squared(*p);
        if d > far_dist {
            far_dist = d;
            far = i;
        }
    }
    if far == 0 {
        // Every point coincides with point 0.
        return vec![points[0]];
    }

    // Extended ring with a sentinel copy of point 0 at the end, so the
    // second half simplifies across the wraparound edge.
    let mut ext = points.to_vec();
    ext.push(points[0]);

    let mut kept = vec![false; ext.len()];
    kept[0] = true;
    kept[far] = true;
    kept[n] = true; // sentinel, not emitted

    rdp_recurse(&ext, 0, far, tolerance, &mut kept);
    rdp_recurse(&ext, far, n, tolerance, &mut kept);

    points
        .iter()
        .zip(&kept)
        .filter(|&(_, k)| *k)
        .map(|(&p, _)| p)
        .collect()
}

/// Recursive step of the Ramer-Douglas-Peucker algorithm.
///
/// Finds the point between `start` and `end` that is farthest from the
/// line segment between them. If that distance exceeds `tolerance`, the
/// point is kept and both sub-segments are processed recursively.
fn rdp_recurse(points: &[Point], start: usize, end: usize, tolerance: f64, kept: &mut [bool]) {
    if end <= start + 1 {
        return;
    }

    let mut max_dist = 0.0;
    let mut max_idx = start;

    for i in (start + 1)..end {
        let d = perpendicular_distance(points[i], points[start], points[end]);
        if d > max_dist {
            max_dist = d;
            max_idx = i;
        }
    }

    if max_dist > tolerance {
        kept[max_idx] = true;
        rdp_recurse(points, start, max_idx, tolerance, kept);
        rdp_recurse(points, max_idx, end, tolerance, kept);
    }
}

/// Perpendicular distance from point `p` to the line defined by `a` and `b`.
///
/// Uses the formula: |cross(b-a, p-a)| / |b-a|.
/// When `a` and `b` coincide, returns the distance from `p` to `a`.
fn perpendicular_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_sq = dx.mul_add(dx, dy * dy);

    if length_sq == 0.0 {
        // a and b are the same point.
        return p.distance(a);
    }

    let cross = dx.mul_add(a.y - p.y, -(dy * (a.x - p.x)));
    cross.abs() / length_sq.sqrt()
}
