//! Final acceptance filter: bounding-box bounds and solidity.
//!
//! Solidity is the ratio of the polygon's absolute area (shoelace
//! formula) to its bounding-box area. A perfectly axis-aligned
//! rectangle scores 1.0; thin, ragged, or L-shaped outlines score
//! lower, so the ratio works as a straightness/convexity proxy.

use crate::types::{BoundingBox, PipelineConfig, Point, RejectionCause};

/// Signed polygon area via the shoelace formula.
///
/// The wraparound edge is included. Positive for counter-clockwise
/// winding in a y-down coordinate system; callers that only care about
/// magnitude take the absolute value.
#[must_use]
pub fn signed_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let n = points.len();
    let mut twice_area = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        twice_area += a.x.mul_add(b.y, -(b.x * a.y));
    }
    twice_area / 2.0
}

/// Solidity: `|area| / bounding-box area`, in `[0, 1]`.
///
/// Returns 0 when the bounding box is degenerate (zero width or
/// height) or the point set is empty.
#[must_use]
pub fn solidity(points: &[Point]) -> f64 {
    let Some(bbox) = BoundingBox::from_points(points) else {
        return 0.0;
    };
    let box_area = bbox.area();
    if box_area == 0.0 {
        return 0.0;
    }
    signed_area(points).abs() / box_area
}

/// Check a simplified polygon against the final size and solidity
/// bounds.
///
/// # Errors
///
/// Returns [`RejectionCause::Size`] when the bounding box falls outside
/// `[min, max]` on either axis, and [`RejectionCause::Solidity`] when
/// the solidity ratio is below `straightness_threshold`.
pub fn check(points: &[Point], config: &PipelineConfig) -> Result<(), RejectionCause> {
    let bbox = BoundingBox::from_points(points).ok_or(RejectionCause::Size)?;
    let (w, h) = (bbox.width(), bbox.height());
    if w < config.min_width_px
        || w > config.max_width_px
        || h < config.min_height_px
        || h > config.max_height_px
    {
        return Err(RejectionCause::Size);
    }

    if solidity(points) < config.straightness_threshold {
        return Err(RejectionCause::Solidity);
    }
    Ok(())
}
