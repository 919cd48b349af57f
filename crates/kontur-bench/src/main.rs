//! kontur-bench: CLI tool for refinement parameter experimentation and
//! diagnostics.
//!
//! Runs the extraction front-end plus both pipeline stages on a given
//! image file with configurable parameters, printing per-stage
//! diagnostics. Useful for:
//!
//! - Tuning Canny thresholds and the detection size minimums
//! - Watching how bridging/corner/snap/epsilon settings change
//!   vertex counts and rejection causes
//! - Measuring per-sub-stage durations on real inputs
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin kontur-bench -- [OPTIONS] <IMAGE_PATH>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use kontur_pipeline::{extract, Pipeline, PipelineConfig};

/// Refinement parameter experimentation and diagnostics for kontur.
///
/// Extracts raw contours from an image, then runs the detection and
/// refinement stages, printing kept/rejected counts and timings.
#[derive(Parser)]
#[command(name = "kontur-bench", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP).
    image_path: PathBuf,

    /// Canny low threshold.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_CANNY_LOW)]
    canny_low: f32,

    /// Canny high threshold.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_CANNY_HIGH)]
    canny_high: f32,

    /// Minimum bounding-box width (detection and final filter).
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_MIN_WIDTH)]
    min_width: f64,

    /// Minimum bounding-box height (detection and final filter).
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_MIN_HEIGHT)]
    min_height: f64,

    /// Orthogonal-bias angle tolerance in degrees (0 disables).
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_ORTHO_ANGLE_TOLERANCE)]
    ortho_tolerance: f64,

    /// Absorb contours fully contained inside a larger one.
    #[arg(long)]
    unify_nested: bool,

    /// Maximum bounding-box width for accepted polygons.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_MAX_WIDTH)]
    max_width: f64,

    /// Maximum bounding-box height for accepted polygons.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_MAX_HEIGHT)]
    max_height: f64,

    /// Vertex bridging threshold in pixels (0 disables).
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_BRIDGE_THRESHOLD)]
    bridge: f64,

    /// Corner closing threshold in pixels (0 disables).
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_CLOSE_CORNERS_THRESHOLD)]
    close_corners: f64,

    /// Snap grid size in pixels (0 disables).
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_SNAP_GRID)]
    snap_grid: f64,

    /// Simplification epsilon factor (multiplies contour perimeter).
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_EPSILON_FACTOR)]
    epsilon_factor: f64,

    /// Minimum solidity for accepted polygons (0.0-1.0).
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_STRAIGHTNESS_THRESHOLD)]
    straightness: f64,

    /// Interpret all length parameters as millimeters and convert with
    /// this pixels-per-millimeter scale before running.
    #[arg(long)]
    pixels_per_mm: Option<f64>,

    /// Write accepted polygons to this file as JSON.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Output stage summaries as JSON instead of a human-readable report.
    #[arg(long)]
    json: bool,

    /// Full pipeline config as a JSON string.
    ///
    /// When provided, all other pipeline parameter flags are ignored
    /// (except --pixels-per-mm, which still applies).
    #[arg(long)]
    config_json: Option<String>,
}

/// Build a [`PipelineConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual parameter flags are ignored. Otherwise, a config is
/// assembled from the individual flags. `--pixels-per-mm` is applied
/// last in both cases.
fn config_from_cli(cli: &Cli) -> Result<PipelineConfig, String> {
    let config = if let Some(ref json) = cli.config_json {
        serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"))?
    } else {
        PipelineConfig {
            canny_low: cli.canny_low,
            canny_high: cli.canny_high,
            min_width_px: cli.min_width,
            min_height_px: cli.min_height,
            ortho_angle_tolerance_deg: cli.ortho_tolerance,
            unify_nested: cli.unify_nested,
            max_width_px: cli.max_width,
            max_height_px: cli.max_height,
            bridge_threshold_px: cli.bridge,
            close_corners_threshold_px: cli.close_corners,
            snap_grid_px: cli.snap_grid,
            epsilon_factor: cli.epsilon_factor,
            straightness_threshold: cli.straightness,
        }
    };

    Ok(match cli.pixels_per_mm {
        Some(scale) => config.scaled_to_pixels(scale),
        None => config,
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let image_bytes = match std::fs::read(&cli.image_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.image_path.display());
            return ExitCode::FAILURE;
        }
    };

    eprintln!(
        "Image: {} ({} bytes)",
        cli.image_path.display(),
        image_bytes.len(),
    );
    eprintln!("Config: {config:#?}");
    eprintln!();

    let raw = match extract::extract(&image_bytes, &config) {
        Ok(contours) => contours,
        Err(e) => {
            eprintln!("Extraction error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if raw.is_empty() {
        eprintln!("No contours found in the image");
    } else {
        eprintln!("Extracted {} raw contours", raw.len());
    }

    let mut pipeline = Pipeline::new();
    if let Err(e) = pipeline.detect(&raw, &config) {
        eprintln!("Detection error: {e}");
        return ExitCode::FAILURE;
    }
    if let Err(e) = pipeline.refine(&config) {
        eprintln!("Refinement error: {e}");
        return ExitCode::FAILURE;
    }

    let (Some(detection), Some(refinement)) =
        (pipeline.detection_summary(), pipeline.refinement_summary())
    else {
        eprintln!("Internal error: stage summaries missing after a successful run");
        return ExitCode::FAILURE;
    };

    if cli.json {
        let summaries = serde_json::json!({
            "detection": detection,
            "refinement": refinement,
        });
        match serde_json::to_string_pretty(&summaries) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing summaries: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", detection.report());
        println!("{}", refinement.report());
    }

    if let Some(ref path) = cli.output {
        let json = match serde_json::to_string_pretty(pipeline.polygons()) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("Error serializing polygons: {e}");
                return ExitCode::FAILURE;
            }
        };
        match std::fs::write(path, &json) {
            Ok(()) => {
                eprintln!(
                    "Polygons written to {} ({} bytes)",
                    path.display(),
                    json.len(),
                );
            }
            Err(e) => {
                eprintln!("Error writing polygons to {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
