//! Pipeline diagnostics: timing and per-cause rejection counts for both
//! stages.
//!
//! These diagnostics are permanent instrumentation intended for
//! parameter tuning: the host surface reports kept vs. rejected counts
//! (broken down by rejection cause) after each stage completes.
//!
//! Duration measurements use [`std::time::Duration`]. Timestamps are
//! captured via the `web-time` crate, which uses `performance.now()` on
//! WASM and `std::time::Instant` on native.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::RejectionCause;

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Counts of refinement rejections, keyed by cause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionCounts {
    /// Snapping or simplification left fewer than 3 distinct vertices.
    pub too_few_vertices: usize,
    /// Zero-perimeter contours.
    pub degenerate: usize,
    /// Bounding box outside the configured bounds.
    pub size: usize,
    /// Solidity below the straightness threshold.
    pub solidity: usize,
}

impl RejectionCounts {
    /// Record one rejection.
    pub const fn record(&mut self, cause: RejectionCause) {
        match cause {
            RejectionCause::TooFewVertices => self.too_few_vertices += 1,
            RejectionCause::Degenerate => self.degenerate += 1,
            RejectionCause::Size => self.size += 1,
            RejectionCause::Solidity => self.solidity += 1,
        }
    }

    /// Total rejections across all causes.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.too_few_vertices + self.degenerate + self.size + self.solidity
    }
}

/// Summary of one detection stage run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionSummary {
    /// Raw contours received from the extractor.
    pub input_contours: usize,
    /// Contours that passed the size filter.
    pub kept: usize,
    /// Contours dropped for having fewer than 3 points.
    pub too_few_points: usize,
    /// Contours dropped for an undersized bounding box.
    pub undersized: usize,
    /// Contours changed by the orthogonal-bias pass.
    pub orthogonalized: usize,
    /// Contours absorbed by nested-island unification.
    pub nested: usize,
    /// Wall-clock duration of the stage (seconds when serialized).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

impl DetectionSummary {
    /// `true` when the extractor handed the stage nothing usable.
    ///
    /// This is the "no elements found" informational condition: it is
    /// not an error and commits an empty detection result.
    #[must_use]
    pub const fn is_empty_input(&self) -> bool {
        self.input_contours == 0
    }

    /// Format the summary as a human-readable one-stage report.
    #[must_use]
    pub fn report(&self) -> String {
        format!(
            "Detection: {} raw -> {} kept ({} <3 points, {} undersized, {} nested; {} orthogonalized) in {:.3}ms",
            self.input_contours,
            self.kept,
            self.too_few_points,
            self.undersized,
            self.nested,
            self.orthogonalized,
            duration_ms(self.duration),
        )
    }
}

/// Aggregate wall-clock time spent in each refinement sub-stage,
/// summed across all contours in the batch.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StageDurations {
    /// Vertex bridging.
    #[serde(with = "duration_serde")]
    pub bridge: Duration,
    /// Corner closing.
    #[serde(with = "duration_serde")]
    pub corners: Duration,
    /// Grid snapping.
    #[serde(with = "duration_serde")]
    pub snap: Duration,
    /// Closed-polyline simplification.
    #[serde(with = "duration_serde")]
    pub simplify: Duration,
    /// Size/solidity filtering.
    #[serde(with = "duration_serde")]
    pub filter: Duration,
}

/// Summary of one refinement stage run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinementSummary {
    /// Contours received from the detection stage.
    pub input_contours: usize,
    /// Polygons accepted into the output collection.
    pub kept: usize,
    /// Rejections by cause.
    pub rejections: RejectionCounts,
    /// Total input points across all contours.
    pub points_before: usize,
    /// Total output points across all accepted polygons.
    pub points_after: usize,
    /// Per-sub-stage durations, summed over the batch.
    pub stage_durations: StageDurations,
    /// Wall-clock duration of the whole stage (seconds when serialized).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

impl RefinementSummary {
    /// Format the summary as a human-readable multi-line report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!(
            "Refinement: {} contours -> {} polygons in {:.3}ms",
            self.input_contours,
            self.kept,
            duration_ms(self.duration),
        ));
        lines.push(format!(
            "  points: {} -> {}",
            self.points_before, self.points_after,
        ));
        lines.push(format!(
            "  rejected: {} ({} vertices, {} degenerate, {} size, {} solidity)",
            self.rejections.total(),
            self.rejections.too_few_vertices,
            self.rejections.degenerate,
            self.rejections.size,
            self.rejections.solidity,
        ));

        let stages = [
            ("bridge", self.stage_durations.bridge),
            ("corners", self.stage_durations.corners),
            ("snap", self.stage_durations.snap),
            ("simplify", self.stage_durations.simplify),
            ("filter", self.stage_durations.filter),
        ];
        let total_ms = duration_ms(self.duration);
        for (name, d) in stages {
            let ms = duration_ms(d);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!("  {name:<10} {ms:>8.3}ms {pct:>5.1}%"));
        }

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
