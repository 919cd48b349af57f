//! Detection stage: filter raw contours by point count and bounding-box
//! size.
//!
//! A pure filter over the extractor's output. Contours with fewer than
//! 3 points cannot form a closed shape and are dropped outright;
//! remaining contours are dropped when their axis-aligned bounding box
//! is narrower than `min_width_px` or shorter than `min_height_px`.
//! Surviving contours then pass through two optional passes: orthogonal
//! bias ([`crate::ortho`], when the angle tolerance is positive) and
//! nested-island unification ([`crate::island`], when enabled). Order
//! is preserved. An empty input yields an empty output -- that is the
//! "no elements found" informational condition, not an error.

use web_time::Instant;

use crate::diagnostics::DetectionSummary;
use crate::types::{Contour, PipelineConfig};
use crate::{island, ortho};

/// Filter raw contours by size, preserving order.
///
/// Returns the surviving contours and a [`DetectionSummary`] with
/// kept/rejected counts. Running the filter twice with the same
/// parameters yields identical output (it is a pure function of its
/// inputs).
#[must_use = "returns the surviving contours and the stage summary"]
pub fn filter_contours(
    raw: &[Contour],
    config: &PipelineConfig,
) -> (Vec<Contour>, DetectionSummary) {
    let started = Instant::now();

    let mut kept = Vec::new();
    let mut too_few_points = 0;
    let mut undersized = 0;
    let mut orthogonalized = 0;

    for contour in raw {
        if contour.len() < 3 {
            too_few_points += 1;
            continue;
        }
        // len >= 3 guarantees the bounding box exists.
        let Some(bbox) = contour.bounding_box() else {
            too_few_points += 1;
            continue;
        };
        if bbox.width() < config.min_width_px || bbox.height() < config.min_height_px {
            undersized += 1;
            continue;
        }

        if config.ortho_angle_tolerance_deg > 0.0 {
            let aligned = ortho::orthogonalize(contour.points(), config.ortho_angle_tolerance_deg);
            if aligned.as_slice() != contour.points() {
                orthogonalized += 1;
            }
            kept.push(Contour::new(aligned));
        } else {
            kept.push(contour.clone());
        }
    }

    let (kept, nested) = if config.unify_nested {
        island::unify_nested(&kept)
    } else {
        (kept, 0)
    };

    let summary = DetectionSummary {
        input_contours: raw.len(),
        kept: kept.len(),
        too_few_points,
        undersized,
        orthogonalized,
        nested,
        duration: started.elapsed(),
    };
    (kept, summary)
}
