//! Grid snapping: round coordinates to the nearest grid multiple.
//!
//! Each coordinate is snapped independently to `round(v / grid) * grid`.
//! Consecutive points that snap to the same location are deduplicated
//! (compared against the immediately preceding *emitted* point only),
//! and a trailing point that coincides with the first is dropped so the
//! implicit closure edge is not doubled.

use crate::types::Point;

/// Snap a closed contour's points to a grid.
///
/// Returns a fresh, deduplicated point sequence. A grid size of zero
/// (or below) is the identity. The caller is responsible for rejecting
/// the contour when fewer than 3 distinct points remain.
#[must_use = "returns the snapped point sequence"]
pub fn snap_to_grid(points: &[Point], grid_size_px: f64) -> Vec<Point> {
    if grid_size_px <= 0.0 {
        return points.to_vec();
    }

    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        let snapped = Point::new(
            (p.x / grid_size_px).round() * grid_size_px,
            (p.y / grid_size_px).round() * grid_size_px,
        );
        // Snapped coordinates are exact grid multiples, so direct
        // equality is reliable here.
        if out.last() != Some(&snapped) {
            out.push(snapped);
        }
    }

    // The last point closing onto the first duplicates the implicit
    // wraparound edge.
    if out.len() > 1 && out.first() == out.last() {
        out.pop();
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn zero_grid_is_identity() {
        let input = pts(&[(0.3, 0.7), (5.1, 0.2), (5.0, 4.9)]);
        assert_eq!(snap_to_grid(&input, 0.0), input);
    }

    #[test]
    fn coordinates_snap_to_nearest_multiple() {
        let input = pts(&[(0.4, 0.6), (4.9, 0.1), (5.2, 4.8)]);
        let out = snap_to_grid(&input, 1.0);
        assert_eq!(out, pts(&[(0.0, 1.0), (5.0, 0.0), (5.0, 5.0)]));
    }

    #[test]
    fn outputs_are_exact_grid_multiples() {
        let input = pts(&[(0.37, 11.62), (103.2, 0.49), (55.5, 77.7), (12.01, 90.9)]);
        let grid = 2.5;
        for p in snap_to_grid(&input, grid) {
            assert!((p.x / grid).fract().abs() < f64::EPSILON, "x not on grid: {}", p.x);
            assert!((p.y / grid).fract().abs() < f64::EPSILON, "y not on grid: {}", p.y);
        }
    }

    #[test]
    fn consecutive_duplicates_collapse() {
        // Middle points all snap to (5, 0).
        let input = pts(&[(0.0, 0.0), (4.9, 0.1), (5.1, 0.2), (5.0, 0.4), (5.0, 5.0)]);
        let out = snap_to_grid(&input, 1.0);
        assert_eq!(out, pts(&[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)]));
    }

    #[test]
    fn nonadjacent_duplicates_survive() {
        // The contour revisits (0, 0)'s cell mid-sequence; only
        // *consecutive* duplicates are collapsed.
        let input = pts(&[(0.0, 0.0), (5.0, 0.1), (0.1, 0.2), (5.0, 5.0), (0.0, 5.0)]);
        let out = snap_to_grid(&input, 1.0);
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn trailing_closure_duplicate_is_dropped() {
        let input = pts(&[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0), (0.1, 0.1)]);
        let out = snap_to_grid(&input, 1.0);
        assert_eq!(out, pts(&[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)]));
    }

    #[test]
    fn tiny_contour_collapses_below_floor() {
        // Everything lands in one cell: the caller must reject this.
        let input = pts(&[(0.1, 0.1), (0.2, 0.3), (0.4, 0.2)]);
        let out = snap_to_grid(&input, 10.0);
        assert_eq!(out.len(), 1);
    }
}
