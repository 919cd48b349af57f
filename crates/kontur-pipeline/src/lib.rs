//! kontur-pipeline: contour-to-polygon refinement (sans-IO).
//!
//! Converts raw, noisy polylines from edge/contour detection into a
//! small set of clean, closed, CAD-usable polygons through two
//! explicitly invoked stages:
//!
//! 1. **Detection** -- filter raw contours by point count and
//!    bounding-box size, with optional orthogonal-bias alignment and
//!    nested-island unification.
//! 2. **Refinement** -- per contour: vertex bridging -> corner closing
//!    -> grid snapping -> closed-polyline simplification ->
//!    size/solidity filtering.
//!
//! Both stages are pure functions of their input contours and a
//! [`PipelineConfig`]; result collections are owned by a [`Pipeline`]
//! and replaced wholesale per invocation. This crate has **no I/O
//! dependencies** -- it operates on in-memory data and returns
//! structured results. The optional [`extract`] module provides the
//! Canny/border-following front-end that produces raw contours from
//! image bytes.

pub mod bridge;
pub mod corner;
pub mod detect;
pub mod diagnostics;
pub mod extract;
pub mod island;
pub mod ortho;
pub mod pipeline;
pub mod refine;
pub mod simplify;
pub mod snap;
pub mod solidity;
pub mod types;

pub use diagnostics::{DetectionSummary, RefinementSummary, RejectionCounts};
pub use pipeline::{Pipeline, ProcessResult, Stage};
pub use types::{
    BoundingBox, Contour, PipelineConfig, PipelineError, Point, Polygon, RejectionCause,
};

/// Run both stages over raw extractor output in one call.
///
/// Convenience wrapper for callers that do not need stage-by-stage
/// control; equivalent to [`Pipeline::detect`] followed by
/// [`Pipeline::refine`] with the same configuration.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] if the configuration fails
/// validation. Per-contour rejections never fail the call; they are
/// counted in the returned summaries.
pub fn process(raw: &[Contour], config: &PipelineConfig) -> Result<ProcessResult, PipelineError> {
    config.validate()?;

    let (kept, detection) = detect::filter_contours(raw, config);
    let (polygons, refinement) = refine::refine_contours(&kept, config);
    Ok(ProcessResult {
        polygons,
        detection,
        refinement,
    })
}
