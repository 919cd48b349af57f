//! Shared types for the kontur refinement pipeline.

use serde::{Deserialize, Serialize};

/// Re-export `GrayImage` so downstream crates can reference the
/// extractor's raster input without depending on `image` directly.
pub use image::GrayImage;

/// A 2D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

/// A raw contour: an ordered point sequence as produced by the
/// edge/contour extractor, implicitly closed (the last point connects
/// back to the first).
///
/// Contours with fewer than 3 points are valid *inputs* -- the detection
/// filter discards them -- but never survive past detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contour(Vec<Point>);

impl Contour {
    /// Create a contour from a vector of points.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Create a contour from integer pixel coordinates, promoting them
    /// to floating point.
    ///
    /// This is the input contract with the extractor: edge tracing
    /// operates on the integer pixel grid, refinement in `f64`.
    #[must_use]
    pub fn from_pixels(pixels: &[(i32, i32)]) -> Self {
        Self(
            pixels
                .iter()
                .map(|&(x, y)| Point::new(f64::from(x), f64::from(y)))
                .collect(),
        )
    }

    /// Returns `true` if the contour has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of points in the contour.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns a slice of all points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Consumes the contour and returns the underlying vector of points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }

    /// Axis-aligned bounding box, or `None` for an empty contour.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.0)
    }
}

/// A refined polygon: the cleaned, simplified, implicitly closed output
/// of one raw contour. Always has at least 3 vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon(Vec<Point>);

impl Polygon {
    /// Create a polygon from a vector of points.
    ///
    /// The refinement pipeline only constructs polygons with 3 or more
    /// vertices; this constructor does not re-check.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Returns the number of vertices.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the polygon has no vertices.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a slice of all vertices.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Consumes the polygon and returns the underlying vector of points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }

    /// Signed area via the shoelace formula (positive for
    /// counter-clockwise winding in a y-down coordinate system).
    #[must_use]
    pub fn area(&self) -> f64 {
        crate::solidity::signed_area(&self.0)
    }

    /// Ratio of `|area|` to bounding-box area, in `[0, 1]`.
    #[must_use]
    pub fn solidity(&self) -> f64 {
        crate::solidity::solidity(&self.0)
    }

    /// Axis-aligned bounding box, or `None` for an empty polygon.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.0)
    }
}

/// Axis-aligned bounding box of a point set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Smallest x coordinate.
    pub min_x: f64,
    /// Smallest y coordinate.
    pub min_y: f64,
    /// Largest x coordinate.
    pub max_x: f64,
    /// Largest y coordinate.
    pub max_y: f64,
}

impl BoundingBox {
    /// Compute the bounding box of a point set.
    ///
    /// Returns `None` for an empty slice.
    #[must_use]
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut bbox = Self {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in &points[1..] {
            bbox.min_x = bbox.min_x.min(p.x);
            bbox.min_y = bbox.min_y.min(p.y);
            bbox.max_x = bbox.max_x.max(p.x);
            bbox.max_y = bbox.max_y.max(p.y);
        }
        Some(bbox)
    }

    /// Box width (always `>= 0`).
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Box height (always `>= 0`).
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Box area (`width * height`).
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

/// Configuration for both pipeline stages.
///
/// All length fields are in pixels. Configs authored in millimeters are
/// converted with [`scaled_to_pixels`](Self::scaled_to_pixels) before
/// use. Parameter validation happens once per stage invocation via
/// [`validate`](Self::validate); invalid values fail fast with
/// [`PipelineError::InvalidConfig`] rather than being silently clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Canny edge detector low threshold. Consumed only by the
    /// extractor, not by the refinement stages.
    pub canny_low: f32,

    /// Canny edge detector high threshold. Consumed only by the
    /// extractor, not by the refinement stages.
    pub canny_high: f32,

    /// Minimum bounding-box width for a raw contour to pass detection.
    pub min_width_px: f64,

    /// Minimum bounding-box height for a raw contour to pass detection.
    pub min_height_px: f64,

    /// Maximum deviation from horizontal/vertical, in degrees, for a
    /// contour segment to be pulled onto the axis during detection.
    /// `0` disables orthogonalization.
    pub ortho_angle_tolerance_deg: f64,

    /// Absorb contours fully contained inside a larger one during
    /// detection.
    pub unify_nested: bool,

    /// Distance below which two non-adjacent vertices are bridged
    /// (the shorter connecting arc is collapsed). `0` disables bridging.
    pub bridge_threshold_px: f64,

    /// Maximum edge length around a near-perpendicular corner for the
    /// corner to be squared to its axis-aligned intersection. `0`
    /// disables corner closing.
    pub close_corners_threshold_px: f64,

    /// Grid cell size for coordinate snapping. `0` disables snapping.
    pub snap_grid_px: f64,

    /// Simplification aggressiveness: the Douglas-Peucker tolerance is
    /// `epsilon_factor * perimeter`. Dimensionless, must be positive.
    pub epsilon_factor: f64,

    /// Minimum solidity (|area| / bounding-box area) for a refined
    /// polygon to be accepted. In `[0, 1]`; `0` accepts everything.
    pub straightness_threshold: f64,

    /// Maximum bounding-box width for a refined polygon.
    pub max_width_px: f64,

    /// Maximum bounding-box height for a refined polygon.
    pub max_height_px: f64,
}

impl PipelineConfig {
    /// Default Canny low threshold.
    pub const DEFAULT_CANNY_LOW: f32 = 50.0;
    /// Default Canny high threshold.
    pub const DEFAULT_CANNY_HIGH: f32 = 150.0;
    /// Default detection minimum width in pixels.
    pub const DEFAULT_MIN_WIDTH: f64 = 10.0;
    /// Default detection minimum height in pixels.
    pub const DEFAULT_MIN_HEIGHT: f64 = 10.0;
    /// Default orthogonalization angle tolerance in degrees (disabled).
    pub const DEFAULT_ORTHO_ANGLE_TOLERANCE: f64 = 0.0;
    /// Default vertex bridging threshold in pixels.
    pub const DEFAULT_BRIDGE_THRESHOLD: f64 = 5.0;
    /// Default corner closing threshold in pixels.
    pub const DEFAULT_CLOSE_CORNERS_THRESHOLD: f64 = 5.0;
    /// Default snap grid size in pixels (disabled).
    pub const DEFAULT_SNAP_GRID: f64 = 0.0;
    /// Default simplification epsilon factor.
    pub const DEFAULT_EPSILON_FACTOR: f64 = 0.01;
    /// Default straightness threshold (solidity filter disabled).
    pub const DEFAULT_STRAIGHTNESS_THRESHOLD: f64 = 0.0;
    /// Default maximum polygon width in pixels.
    pub const DEFAULT_MAX_WIDTH: f64 = 10_000.0;
    /// Default maximum polygon height in pixels.
    pub const DEFAULT_MAX_HEIGHT: f64 = 10_000.0;

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if any threshold is
    /// negative or non-finite, `epsilon_factor` is not strictly
    /// positive, `straightness_threshold` lies outside `[0, 1]`, or
    /// `ortho_angle_tolerance_deg` lies outside `[0, 180]`.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let lengths = [
            ("min_width_px", self.min_width_px),
            ("min_height_px", self.min_height_px),
            ("bridge_threshold_px", self.bridge_threshold_px),
            ("close_corners_threshold_px", self.close_corners_threshold_px),
            ("snap_grid_px", self.snap_grid_px),
            ("max_width_px", self.max_width_px),
            ("max_height_px", self.max_height_px),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(PipelineError::InvalidConfig(format!(
                    "{name} must be finite and >= 0, got {value}",
                )));
            }
        }
        if !self.epsilon_factor.is_finite() || self.epsilon_factor <= 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "epsilon_factor must be > 0, got {}",
                self.epsilon_factor,
            )));
        }
        if !self.straightness_threshold.is_finite()
            || !(0.0..=1.0).contains(&self.straightness_threshold)
        {
            return Err(PipelineError::InvalidConfig(format!(
                "straightness_threshold must be within [0, 1], got {}",
                self.straightness_threshold,
            )));
        }
        if !self.ortho_angle_tolerance_deg.is_finite()
            || !(0.0..=180.0).contains(&self.ortho_angle_tolerance_deg)
        {
            return Err(PipelineError::InvalidConfig(format!(
                "ortho_angle_tolerance_deg must be within [0, 180], got {}",
                self.ortho_angle_tolerance_deg,
            )));
        }
        Ok(())
    }

    /// Convert a configuration whose length fields are in millimeters
    /// into pixel space.
    ///
    /// Multiplies every length-denominated field by `pixels_per_mm` (the
    /// host's unit-conversion context). Dimensionless fields
    /// (`epsilon_factor`, `straightness_threshold`,
    /// `ortho_angle_tolerance_deg`, `unify_nested`) and the Canny
    /// thresholds are unchanged. A non-positive scale produces a config
    /// that [`validate`](Self::validate) rejects.
    #[must_use]
    pub fn scaled_to_pixels(&self, pixels_per_mm: f64) -> Self {
        Self {
            min_width_px: self.min_width_px * pixels_per_mm,
            min_height_px: self.min_height_px * pixels_per_mm,
            bridge_threshold_px: self.bridge_threshold_px * pixels_per_mm,
            close_corners_threshold_px: self.close_corners_threshold_px * pixels_per_mm,
            snap_grid_px: self.snap_grid_px * pixels_per_mm,
            max_width_px: self.max_width_px * pixels_per_mm,
            max_height_px: self.max_height_px * pixels_per_mm,
            ..self.clone()
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            canny_low: Self::DEFAULT_CANNY_LOW,
            canny_high: Self::DEFAULT_CANNY_HIGH,
            min_width_px: Self::DEFAULT_MIN_WIDTH,
            min_height_px: Self::DEFAULT_MIN_HEIGHT,
            ortho_angle_tolerance_deg: Self::DEFAULT_ORTHO_ANGLE_TOLERANCE,
            unify_nested: false,
            bridge_threshold_px: Self::DEFAULT_BRIDGE_THRESHOLD,
            close_corners_threshold_px: Self::DEFAULT_CLOSE_CORNERS_THRESHOLD,
            snap_grid_px: Self::DEFAULT_SNAP_GRID,
            epsilon_factor: Self::DEFAULT_EPSILON_FACTOR,
            straightness_threshold: Self::DEFAULT_STRAIGHTNESS_THRESHOLD,
            max_width_px: Self::DEFAULT_MAX_WIDTH,
            max_height_px: Self::DEFAULT_MAX_HEIGHT,
        }
    }
}

/// Why a contour was rejected during refinement.
///
/// Per-contour rejections never abort the batch; the orchestrator
/// counts them by cause for diagnostic reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionCause {
    /// Snapping or simplification left fewer than 3 distinct vertices.
    TooFewVertices,
    /// The closed perimeter was zero (all points coincident).
    Degenerate,
    /// Bounding box outside the configured `[min, max]` bounds.
    Size,
    /// Solidity below the straightness threshold.
    Solidity,
}

/// Errors that can occur during pipeline processing.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to decode the extractor's input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The extractor's input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Pipeline configuration is invalid.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),
}
