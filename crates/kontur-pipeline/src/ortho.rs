//! Orthogonal bias: pull almost-horizontal and almost-vertical contour
//! segments onto the axes.
//!
//! Architectural drawings are dominated by axis-aligned walls, but
//! traced contours wobble a degree or two off axis. Each segment whose
//! angle is within the tolerance of horizontal gets its endpoint's y
//! aligned to its start; within tolerance of vertical, the x. Segments
//! are processed in order around the ring, so an adjusted endpoint is
//! the start of the next segment's check and corrections accumulate
//! along a run of jittery segments.
//!
//! Alignment can leave neighboring points nearly coincident, so a
//! cleanup pass drops consecutive points closer than
//! [`CLEANUP_TOLERANCE`] on both axes (plus a trailing point that
//! closes onto the first). If cleanup leaves fewer than 3 points the
//! original contour is returned unchanged.

use crate::types::Point;

/// Points closer than this on both axes after alignment are merged.
pub const CLEANUP_TOLERANCE: f64 = 0.5;

/// Segments shorter than this on both axes are skipped entirely.
const ZERO_TOLERANCE: f64 = 1e-6;

/// Align near-axis segments of a closed contour.
///
/// `angle_tolerance_deg` is the maximum deviation from horizontal or
/// vertical, in degrees. A tolerance of zero (or below) and inputs
/// with fewer than 2 points are returned unchanged.
#[must_use = "returns the orthogonalized point sequence"]
pub fn orthogonalize(points: &[Point], angle_tolerance_deg: f64) -> Vec<Point> {
    if angle_tolerance_deg <= 0.0 || points.len() < 2 {
        return points.to_vec();
    }

    let mut adjusted = points.to_vec();
    let n = adjusted.len();
    let mut changed = false;

    for i in 0..n {
        let start = adjusted[i];
        let end = adjusted[(i + 1) % n];
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        if dx.abs() < ZERO_TOLERANCE && dy.abs() < ZERO_TOLERANCE {
            continue;
        }

        let abs_angle = dy.atan2(dx).to_degrees().abs();
        if abs_angle.min((abs_angle - 180.0).abs()) <= angle_tolerance_deg {
            // Near horizontal (0 or 180 degrees).
            if dy.abs() > ZERO_TOLERANCE {
                adjusted[(i + 1) % n].y = start.y;
                changed = true;
            }
        } else if (abs_angle - 90.0).abs() <= angle_tolerance_deg && dx.abs() > ZERO_TOLERANCE {
            adjusted[(i + 1) % n].x = start.x;
            changed = true;
        }
    }

    if !changed {
        return adjusted;
    }

    let cleaned = drop_coincident(&adjusted);
    if cleaned.len() >= 3 {
        cleaned
    } else {
        points.to_vec()
    }
}

/// Drop consecutive points within [`CLEANUP_TOLERANCE`] of each other,
/// and a trailing point that closes onto the first.
fn drop_coincident(points: &[Point]) -> Vec<Point> {
    let nearby = |a: &Point, b: &Point| {
        (a.x - b.x).abs() <= CLEANUP_TOLERANCE && (a.y - b.y).abs() <= CLEANUP_TOLERANCE
    };

    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        match out.last() {
            Some(last) if nearby(last, p) => {}
            _ => out.push(*p),
        }
    }
    if out.len() > 1 {
        let last = out[out.len() - 1];
        if nearby(&out[0], &last) {
            out.pop();
        }
    }
    out
}
