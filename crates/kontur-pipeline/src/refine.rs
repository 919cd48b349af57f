//! Refinement stage: turn detected contours into clean polygons.
//!
//! Each surviving raw contour passes through an ordered chain of
//! transformations -- vertex bridging, corner closing, grid snapping,
//! closed-polyline simplification -- followed by the size/solidity
//! acceptance check. Every step takes the previous step's points by
//! reference and returns a fresh owned sequence; nothing is spliced in
//! place.
//!
//! Per-contour failures are recovered locally: the contour is skipped
//! and counted by cause, and the batch continues. Output order matches
//! input order.

use web_time::Instant;

use crate::diagnostics::{RefinementSummary, RejectionCounts, StageDurations};
use crate::types::{Contour, PipelineConfig, Polygon, RejectionCause};
use crate::{bridge, corner, simplify, snap, solidity};

/// Refine a single contour into a polygon.
///
/// # Errors
///
/// Returns the [`RejectionCause`] when the contour collapses below 3
/// vertices, has a zero perimeter, or fails the final size/solidity
/// bounds. Rejections are expected per-contour outcomes, not batch
/// failures.
pub fn refine_contour(
    contour: &Contour,
    config: &PipelineConfig,
) -> Result<Polygon, RejectionCause> {
    let mut scratch = StageDurations::default();
    refine_timed(contour, config, &mut scratch)
}

/// Refine a batch of contours, skipping and counting rejections.
///
/// Returns the accepted polygons (in input order) and a
/// [`RefinementSummary`] with per-cause rejection counts and per-stage
/// timings summed over the batch.
#[must_use = "returns the accepted polygons and the stage summary"]
pub fn refine_contours(
    contours: &[Contour],
    config: &PipelineConfig,
) -> (Vec<Polygon>, RefinementSummary) {
    let started = Instant::now();

    let mut polygons = Vec::new();
    let mut summary = RefinementSummary {
        input_contours: contours.len(),
        kept: 0,
        rejections: RejectionCounts::default(),
        points_before: contours.iter().map(Contour::len).sum(),
        points_after: 0,
        stage_durations: StageDurations::default(),
        duration: std::time::Duration::ZERO,
    };

    for contour in contours {
        match refine_timed(contour, config, &mut summary.stage_durations) {
            Ok(polygon) => {
                summary.points_after += polygon.len();
                polygons.push(polygon);
            }
            Err(cause) => summary.rejections.record(cause),
        }
    }

    summary.kept = polygons.len();
    summary.duration = started.elapsed();
    (polygons, summary)
}

/// [`refine_contour`] with per-sub-stage timing accumulation.
fn refine_timed(
    contour: &Contour,
    config: &PipelineConfig,
    durations: &mut StageDurations,
) -> Result<Polygon, RejectionCause> {
    let t = Instant::now();
    let bridged = bridge::bridge_vertices(contour.points(), config.bridge_threshold_px);
    durations.bridge += t.elapsed();

    let t = Instant::now();
    let closed = corner::close_corners(&bridged, config.close_corners_threshold_px);
    durations.corners += t.elapsed();

    let t = Instant::now();
    let snapped = snap::snap_to_grid(&closed, config.snap_grid_px);
    durations.snap += t.elapsed();
    if snapped.len() < 3 {
        return Err(RejectionCause::TooFewVertices);
    }

    let t = Instant::now();
    let perimeter = simplify::closed_perimeter(&snapped);
    if perimeter == 0.0 {
        durations.simplify += t.elapsed();
        return Err(RejectionCause::Degenerate);
    }
    let simplified = simplify::simplify_closed(&snapped, config.epsilon_factor * perimeter);
    durations.simplify += t.elapsed();
    if simplified.len() < 3 {
        return Err(RejectionCause::TooFewVertices);
    }

    let t = Instant::now();
    let result = solidity::check(&simplified, config);
    durations.filter += t.elapsed();
    result?;

    Ok(Polygon::new(simplified))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Point;

    fn contour(coords: &[(f64, f64)]) -> Contour {
        Contour::new(coords.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    fn permissive_config() -> PipelineConfig {
        PipelineConfig {
            min_width_px: 10.0,
            min_height_px: 10.0,
            max_width_px: 1000.0,
            max_height_px: 1000.0,
            bridge_threshold_px: 0.0,
            close_corners_threshold_px: 0.0,
            snap_grid_px: 0.0,
            epsilon_factor: 0.01,
            straightness_threshold: 0.0,
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn clean_square_refines_to_four_vertices() {
        let square = contour(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)]);
        let polygon = refine_contour(&square, &permissive_config()).unwrap();
        assert_eq!(polygon.len(), 4);
        assert!((polygon.solidity() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_perimeter_contour_is_degenerate() {
        let collapsed = contour(&[(5.0, 5.0), (5.0, 5.0), (5.0, 5.0), (5.0, 5.0)]);
        assert_eq!(
            refine_contour(&collapsed, &permissive_config()),
            Err(RejectionCause::Degenerate),
        );
    }

    #[test]
    fn snapping_collapse_rejects_by_vertices() {
        let tiny = contour(&[(0.1, 0.1), (0.2, 0.3), (0.3, 0.1)]);
        let config = PipelineConfig {
            snap_grid_px: 10.0,
            min_width_px: 0.0,
            min_height_px: 0.0,
            straightness_threshold: 0.0,
            ..permissive_config()
        };
        assert_eq!(
            refine_contour(&tiny, &config),
            Err(RejectionCause::TooFewVertices),
        );
    }

    #[test]
    fn batch_skips_and_counts_rejections() {
        let contours = vec![
            contour(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)]),
            contour(&[(5.0, 5.0), (5.0, 5.0), (5.0, 5.0)]),
            contour(&[(0.0, 0.0), (100.0, 0.0), (100.0, 50.0), (50.0, 50.0), (50.0, 100.0), (0.0, 100.0)]),
        ];
        let config = PipelineConfig {
            straightness_threshold: 0.9,
            ..permissive_config()
        };
        let (polygons, summary) = refine_contours(&contours, &config);
        // Square accepted; coincident triangle degenerate; L-shape
        // (solidity 0.75) fails the straightness bound.
        assert_eq!(polygons.len(), 1);
        assert_eq!(summary.kept, 1);
        assert_eq!(summary.rejections.degenerate, 1);
        assert_eq!(summary.rejections.solidity, 1);
        assert_eq!(summary.rejections.total(), 2);
    }

    #[test]
    fn batch_preserves_input_order() {
        let a = contour(&[(0.0, 0.0), (50.0, 0.0), (50.0, 50.0), (0.0, 50.0)]);
        let b = contour(&[(200.0, 0.0), (300.0, 0.0), (300.0, 80.0), (200.0, 80.0)]);
        let (polygons, _) = refine_contours(&[a, b], &permissive_config());
        assert_eq!(polygons.len(), 2);
        assert!(polygons[0].points()[0].x < polygons[1].points()[0].x);
    }

    #[test]
    fn spike_is_bridged_into_near_square() {
        // Scenario: a square outline with a 2px spur on the right edge.
        let spiky = contour(&[
            (0.0, 0.0),
            (100.0, 0.0),
            (100.0, 50.0),
            (102.0, 50.0),
            (100.0, 52.0),
            (100.0, 100.0),
            (0.0, 100.0),
        ]);
        let config = PipelineConfig {
            bridge_threshold_px: 5.0,
            ..permissive_config()
        };
        let polygon = refine_contour(&spiky, &config).unwrap();
        assert!(
            (4..=5).contains(&polygon.len()),
            "expected 4-5 vertices, got {}",
            polygon.len(),
        );
        assert!(polygon.solidity() > 0.95);
    }

    #[test]
    fn refinement_is_idempotent_for_fixed_inputs() {
        let square = contour(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)]);
        let config = permissive_config();
        let (first, _) = refine_contours(std::slice::from_ref(&square), &config);
        let (second, _) = refine_contours(std::slice::from_ref(&square), &config);
        assert_eq!(first, second);
    }
}
