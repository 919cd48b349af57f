//! Stage orchestration: explicit detection and refinement invocations
//! over owned result collections.
//!
//! The two stages are deliberately not chained: a caller can re-run
//! refinement against the same detection output with different
//! refinement parameters without re-running detection (the common
//! parameter-tuning loop). A [`Pipeline`] owns both result collections
//! and replaces them wholesale per invocation -- there is no ambient
//! module-level state.
//!
//! The observable states are [`Stage::Idle`], [`Stage::Detected`] and
//! [`Stage::Refined`]; the transient `Detecting`/`Refining` phases run
//! to completion inside the synchronous calls, so no reentrancy or
//! mid-stage cancellation is possible. Config validation happens
//! before any prior result is touched, so a rejected config leaves all
//! committed results intact.

use serde::{Deserialize, Serialize};

use crate::diagnostics::{DetectionSummary, RefinementSummary};
use crate::types::{Contour, PipelineConfig, PipelineError, Polygon};
use crate::{detect, refine};

/// Observable orchestration state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Stage {
    /// No results committed yet.
    #[default]
    Idle,
    /// Detection output committed; refinement not yet run.
    Detected,
    /// Both detection and refinement output committed.
    Refined,
}

/// Orchestrates detection and refinement over owned result collections.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    stage: Stage,
    contours: Vec<Contour>,
    polygons: Vec<Polygon>,
    detection: Option<DetectionSummary>,
    refinement: Option<RefinementSummary>,
}

impl Pipeline {
    /// Create an idle pipeline with no committed results.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current observable state.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Detection output (empty unless [`Stage::Detected`] or later).
    #[must_use]
    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    /// Refinement output (empty unless [`Stage::Refined`]).
    #[must_use]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Summary of the last committed detection run, if any.
    #[must_use]
    pub const fn detection_summary(&self) -> Option<&DetectionSummary> {
        self.detection.as_ref()
    }

    /// Summary of the last committed refinement run, if any.
    #[must_use]
    pub const fn refinement_summary(&self) -> Option<&RefinementSummary> {
        self.refinement.as_ref()
    }

    /// Run the detection stage over raw extractor output.
    ///
    /// Clears *all* prior results (detection and refinement) before
    /// committing the new detection output. An empty `raw` input is the
    /// informational "no elements found" condition: the call succeeds
    /// and commits an empty collection --
    /// [`DetectionSummary::is_empty_input`] reports it.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] without touching any
    /// committed result.
    pub fn detect(
        &mut self,
        raw: &[Contour],
        config: &PipelineConfig,
    ) -> Result<&DetectionSummary, PipelineError> {
        config.validate()?;

        let (kept, summary) = detect::filter_contours(raw, config);
        self.contours = kept;
        self.polygons = Vec::new();
        self.refinement = None;
        self.stage = Stage::Detected;
        Ok(self.detection.insert(summary))
    }

    /// Run the refinement stage over the committed detection output.
    ///
    /// Clears only prior refinement results; detection output is
    /// preserved as the stage's fixed input, so refinement can be
    /// re-run with different parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] without touching any
    /// committed result.
    pub fn refine(
        &mut self,
        config: &PipelineConfig,
    ) -> Result<&RefinementSummary, PipelineError> {
        config.validate()?;

        let (polygons, summary) = refine::refine_contours(&self.contours, config);
        self.polygons = polygons;
        self.stage = Stage::Refined;
        Ok(self.refinement.insert(summary))
    }
}

/// Result of running both stages in one call via [`crate::process`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResult {
    /// Accepted polygons, in original contour order.
    pub polygons: Vec<Polygon>,
    /// Detection stage summary.
    pub detection: DetectionSummary,
    /// Refinement stage summary.
    pub refinement: RefinementSummary,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Point;

    fn square(offset: f64, size: f64) -> Contour {
        Contour::new(vec![
            Point::new(offset, offset),
            Point::new(offset + size, offset),
            Point::new(offset + size, offset + size),
            Point::new(offset, offset + size),
        ])
    }

    fn config() -> PipelineConfig {
        PipelineConfig {
            min_width_px: 10.0,
            min_height_px: 10.0,
            max_width_px: 1000.0,
            max_height_px: 1000.0,
            bridge_threshold_px: 0.0,
            close_corners_threshold_px: 0.0,
            snap_grid_px: 0.0,
            epsilon_factor: 0.01,
            straightness_threshold: 0.9,
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn starts_idle_and_empty() {
        let pipeline = Pipeline::new();
        assert_eq!(pipeline.stage(), Stage::Idle);
        assert!(pipeline.contours().is_empty());
        assert!(pipeline.polygons().is_empty());
        assert!(pipeline.detection_summary().is_none());
    }

    #[test]
    fn detect_then_refine_reaches_refined() {
        let mut pipeline = Pipeline::new();
        pipeline.detect(&[square(0.0, 100.0)], &config()).unwrap();
        assert_eq!(pipeline.stage(), Stage::Detected);
        assert_eq!(pipeline.contours().len(), 1);
        assert!(pipeline.polygons().is_empty());

        pipeline.refine(&config()).unwrap();
        assert_eq!(pipeline.stage(), Stage::Refined);
        assert_eq!(pipeline.polygons().len(), 1);
    }

    #[test]
    fn empty_extractor_output_is_informational() {
        let mut pipeline = Pipeline::new();
        let summary = pipeline.detect(&[], &config()).unwrap();
        assert!(summary.is_empty_input());
        assert_eq!(pipeline.stage(), Stage::Detected);
        assert!(pipeline.contours().is_empty());
    }

    #[test]
    fn detect_clears_prior_refinement() {
        let mut pipeline = Pipeline::new();
        pipeline.detect(&[square(0.0, 100.0)], &config()).unwrap();
        pipeline.refine(&config()).unwrap();
        assert_eq!(pipeline.polygons().len(), 1);

        pipeline.detect(&[square(5.0, 50.0)], &config()).unwrap();
        assert_eq!(pipeline.stage(), Stage::Detected);
        assert!(pipeline.polygons().is_empty());
        assert!(pipeline.refinement_summary().is_none());
        assert_eq!(pipeline.contours().len(), 1);
    }

    #[test]
    fn refine_rerun_with_different_parameters() {
        let mut pipeline = Pipeline::new();
        // One solid square, one L-shape (solidity 0.75).
        let l_shape = Contour::new(vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 50.0),
            Point::new(50.0, 50.0),
            Point::new(50.0, 100.0),
            Point::new(0.0, 100.0),
        ]);
        pipeline
            .detect(&[square(0.0, 100.0), l_shape], &config())
            .unwrap();

        // Strict straightness: only the square survives.
        pipeline.refine(&config()).unwrap();
        assert_eq!(pipeline.polygons().len(), 1);

        // Relaxed straightness against the SAME detection output: both
        // survive, without re-running detection.
        let relaxed = PipelineConfig {
            straightness_threshold: 0.5,
            ..config()
        };
        pipeline.refine(&relaxed).unwrap();
        assert_eq!(pipeline.polygons().len(), 2);
        assert_eq!(pipeline.contours().len(), 2);
    }

    #[test]
    fn invalid_config_preserves_committed_results() {
        let mut pipeline = Pipeline::new();
        pipeline.detect(&[square(0.0, 100.0)], &config()).unwrap();
        pipeline.refine(&config()).unwrap();

        let bad = PipelineConfig {
            epsilon_factor: -1.0,
            ..config()
        };
        let before_polygons = pipeline.polygons().to_vec();

        assert!(matches!(
            pipeline.refine(&bad),
            Err(PipelineError::InvalidConfig(_)),
        ));
        assert_eq!(pipeline.polygons(), before_polygons);
        assert_eq!(pipeline.stage(), Stage::Refined);

        assert!(matches!(
            pipeline.detect(&[square(0.0, 30.0)], &bad),
            Err(PipelineError::InvalidConfig(_)),
        ));
        assert_eq!(pipeline.contours().len(), 1);
        assert_eq!(pipeline.polygons(), before_polygons);
    }

    #[test]
    fn refine_before_detect_commits_empty_output() {
        let mut pipeline = Pipeline::new();
        let summary = pipeline.refine(&config()).unwrap();
        assert_eq!(summary.input_contours, 0);
        assert_eq!(pipeline.stage(), Stage::Refined);
        assert!(pipeline.polygons().is_empty());
    }
}
