//! Corner closing: square near-perpendicular corners with short edges.
//!
//! Contour tracing tends to cut corners, replacing a crisp right angle
//! with a short diagonal notch. For every vertex whose incoming and
//! outgoing edges are both shorter than the threshold and meet at
//! roughly a right angle, the vertex is moved to the axis-aligned
//! intersection of its two edges: `(next.x, prev.y)` when the incoming
//! edge runs mostly horizontal and the outgoing mostly vertical, and
//! `(prev.x, next.y)` for the opposite orientation. Corners whose edges
//! are both diagonal are left alone.
//!
//! Each vertex is evaluated against the *original* neighbor positions,
//! never against already-adjusted ones, so the transform is
//! order-independent within a single call and the point count never
//! changes.

use crate::types::Point;

/// A corner qualifies when `|v1 . v2|` is below this bound, i.e. the
/// edge directions are within roughly 17 degrees of perpendicular.
pub const DOT_THRESHOLD: f64 = 0.3;

/// Close near-perpendicular corners of a closed contour.
///
/// Returns a fresh point sequence with the same length as the input.
/// A threshold of zero (or below) and inputs with fewer than 3 points
/// are returned unchanged.
#[must_use = "returns the corner-closed point sequence"]
pub fn close_corners(points: &[Point], threshold_px: f64) -> Vec<Point> {
    if threshold_px <= 0.0 || points.len() < 3 {
        return points.to_vec();
    }

    let n = points.len();
    (0..n)
        .map(|idx| {
            let prev = points[(idx + n - 1) % n];
            let current = points[idx];
            let next = points[(idx + 1) % n];
            close_corner(prev, current, next, threshold_px).unwrap_or(current)
        })
        .collect()
}

/// Adjusted position for one corner, or `None` when the corner does
/// not qualify.
///
/// The replacement point is the axis-aligned intersection of the two
/// edge lines, which squares the corner cut back into a right angle.
/// A vertex already sitting on that intersection (a true right angle)
/// maps onto itself.
fn close_corner(prev: Point, current: Point, next: Point, threshold_px: f64) -> Option<Point> {
    let in_len = prev.distance(current);
    let out_len = current.distance(next);
    if in_len == 0.0 || out_len == 0.0 {
        return None;
    }
    if in_len >= threshold_px || out_len >= threshold_px {
        return None;
    }

    // Unit vectors from the vertex toward each neighbor.
    let v1 = Point::new((prev.x - current.x) / in_len, (prev.y - current.y) / in_len);
    let v2 = Point::new((next.x - current.x) / out_len, (next.y - current.y) / out_len);
    let dot = v1.x.mul_add(v2.x, v1.y * v2.y);
    if dot.abs() >= DOT_THRESHOLD {
        return None;
    }

    let prev_horizontal = v1.x.abs() > v1.y.abs();
    let next_horizontal = v2.x.abs() > v2.y.abs();
    match (prev_horizontal, next_horizontal) {
        (true, false) => Some(Point::new(next.x, prev.y)),
        (false, true) => Some(Point::new(prev.x, next.y)),
        // Both edges lean the same way: no axis-aligned corner to
        // square to.
        _ => None,
    }
}
