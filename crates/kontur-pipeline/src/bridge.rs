//! Vertex bridging: collapse near-coincident non-adjacent vertices.
//!
//! When two non-adjacent vertices of a closed contour sit closer than
//! the bridge threshold, the shorter of the two arcs connecting them is
//! deleted, turning a spur or a near-duplicate vertex run into a single
//! edge. The scan restarts after every collapse, and the first
//! qualifying pair in iteration order wins (outer index `i`, inner
//! index `j` -- this tie-break is observable and deliberate, since the
//! algorithm defines no canonical preference).
//!
//! Bridging is not guaranteed to converge for pathological inputs, so
//! the collapse loop is capped at [`MAX_PASSES`] iterations.

use crate::types::Point;

/// Maximum number of collapse passes before bridging gives up.
pub const MAX_PASSES: usize = 10;

/// Minimum number of points a closed contour must keep.
const MIN_POINTS: usize = 3;

/// Bridge near-coincident vertex pairs of a closed contour.
///
/// Returns a fresh point sequence; the input is never mutated. A
/// threshold of zero (or below) and inputs with fewer than 3 points are
/// returned unchanged. The output never has fewer than 3 points when
/// the input had at least 3 -- a collapse that would cross that floor is
/// skipped.
#[must_use = "returns the bridged point sequence"]
pub fn bridge_vertices(points: &[Point], threshold_px: f64) -> Vec<Point> {
    let mut current = points.to_vec();
    if threshold_px <= 0.0 || current.len() < MIN_POINTS {
        return current;
    }

    for _ in 0..MAX_PASSES {
        match find_collapsible_pair(&current, threshold_px) {
            Some((i, j)) => current = collapse(&current, i, j),
            None => break,
        }
    }
    current
}

/// Find the first non-adjacent pair within `threshold_px` whose
/// collapse keeps the contour at or above the 3-point floor.
///
/// The pair `(0, len - 1)` is excluded: that edge already exists via
/// implicit closure.
fn find_collapsible_pair(points: &[Point], threshold_px: f64) -> Option<(usize, usize)> {
    let n = points.len();
    let threshold_sq = threshold_px * threshold_px;
    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            if points[i].distance_squared(points[j]) < threshold_sq
                && collapsed_len(n, i, j) >= MIN_POINTS
            {
                return Some((i, j));
            }
        }
    }
    None
}

/// Point count remaining after collapsing the pair `(i, j)`.
fn collapsed_len(n: usize, i: usize, j: usize) -> usize {
    let inner = j - i - 1;
    let outer = n - (j - i + 1);
    if inner <= outer { n - inner } else { n - outer }
}

/// Remove the shorter arc between `i` and `j` (ties remove the internal
/// span), keeping both endpoints.
fn collapse(points: &[Point], i: usize, j: usize) -> Vec<Point> {
    let n = points.len();
    let inner = j - i - 1;
    let outer = n - (j - i + 1);
    if inner <= outer {
        // Drop the internal span (i+1 .. j-1).
        let mut out = Vec::with_capacity(n - inner);
        out.extend_from_slice(&points[..=i]);
        out.extend_from_slice(&points[j..]);
        out
    } else {
        // Drop everything outside i ..= j.
        points[i..=j].to_vec()
    }
}
