//! Edge/contour extraction: raw image bytes in, raw contours out.
//!
//! This is the front-end the detection stage consumes. Decoding and
//! grayscale conversion use the `image` crate; edge detection wraps
//! [`imageproc::edges::canny`], followed by a morphological close that
//! seals hairline breaks in the edge map; contour tracing uses
//! Suzuki-Abe border following via
//! [`imageproc::contours::find_contours`]. Traced integer grid points
//! are promoted to `f64` [`Point`]s.

use image::GrayImage;
use imageproc::distance_transform::Norm;

use crate::types::{Contour, PipelineConfig, PipelineError, Point};

/// Minimum allowed Canny threshold.
///
/// A low threshold of zero treats every pixel with any gradient as a
/// potential edge, producing a dense edge map that overwhelms the
/// downstream refinement stages.
pub const MIN_THRESHOLD: f32 = 1.0;
const _: () = assert!(MIN_THRESHOLD > 0.0);

/// Decode raw image bytes and convert to grayscale.
///
/// Supports PNG, JPEG, BMP, and WebP formats (whatever the `image`
/// crate can decode). The standard luminance formula is used for
/// RGB-to-gray conversion.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
pub fn decode_and_grayscale(bytes: &[u8]) -> Result<GrayImage, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    Ok(img.to_luma8())
}

/// Detect edges using the Canny algorithm.
///
/// Returns a binary image: 255 for edge pixels, 0 for non-edge. Both
/// thresholds are clamped to a minimum of [`MIN_THRESHOLD`] and
/// `low_threshold` is clamped to be at most `high_threshold`, so a
/// degenerate edge map cannot hang the downstream stages.
#[must_use = "returns the binary edge map"]
pub fn canny(image: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    let high = high_threshold.max(MIN_THRESHOLD);
    let low = low_threshold.max(MIN_THRESHOLD).min(high);
    imageproc::edges::canny(image, low, high)
}

/// Seal small gaps in a binary edge map.
///
/// Morphological close (dilate then erode) with a 3x3 square
/// structuring element. Without it, single-pixel breaks in an otherwise
/// continuous edge split one border into many fragments that the
/// detection filter then rejects as undersized.
#[must_use = "returns the closed edge map"]
pub fn close_gaps(edges: &GrayImage) -> GrayImage {
    imageproc::morphology::close(edges, Norm::LInf, 1)
}

/// Trace contours in a binary edge map.
///
/// Wraps Suzuki-Abe border following. Every traced border becomes one
/// [`Contour`]; degenerate ones (including those below 3 points) are
/// kept here and left for the detection filter to discard, so the
/// filter's rejection counters see them.
#[must_use = "returns the traced contours"]
pub fn trace(edges: &GrayImage) -> Vec<Contour> {
    let contours: Vec<imageproc::contours::Contour<u32>> =
        imageproc::contours::find_contours(edges);

    contours
        .into_iter()
        .map(|c| {
            Contour::new(
                c.points
                    .into_iter()
                    .map(|p| Point::new(f64::from(p.x), f64::from(p.y)))
                    .collect(),
            )
        })
        .collect()
}

/// Run the full extraction front-end: decode, grayscale, Canny,
/// morphological close, trace.
///
/// An edge map with no traceable borders yields an empty vector, not an
/// error; "no elements found" is an informational outcome reported by
/// the detection summary downstream.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] or
/// [`PipelineError::ImageDecode`] for bad input bytes.
pub fn extract(bytes: &[u8], config: &PipelineConfig) -> Result<Vec<Contour>, PipelineError> {
    let gray = decode_and_grayscale(bytes)?;
    let edges = canny(&gray, config.canny_low, config.canny_high);
    Ok(trace(&close_gaps(&edges)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// 20x20 image with a sharp vertical boundary at x = 10.
    fn sharp_edge_image() -> GrayImage {
        GrayImage::from_fn(20, 20, |x, _y| {
            if x < 10 {
                image::Luma([0])
            } else {
                image::Luma([255])
            }
        })
    }

    fn encode_png(img: &image::RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
        buf
    }

    #[test]
    fn empty_input_returns_error() {
        let result = decode_and_grayscale(&[]);
        assert!(matches!(result, Err(PipelineError::EmptyInput)));
    }

    #[test]
    fn corrupt_bytes_return_decode_error() {
        let result = decode_and_grayscale(&[0xFF, 0xFE, 0x00, 0x01]);
        assert!(matches!(result, Err(PipelineError::ImageDecode(_))));
    }

    #[test]
    fn blank_image_produces_no_edges() {
        let img = GrayImage::from_fn(20, 20, |_, _| image::Luma([128]));
        let edges = canny(&img, 50.0, 150.0);
        let edge_count: u32 = edges.pixels().map(|p| u32::from(p.0[0] > 0)).sum();
        assert_eq!(edge_count, 0, "expected no edges in uniform image");
    }

    #[test]
    fn sharp_boundary_produces_edges() {
        let edges = canny(&sharp_edge_image(), 50.0, 150.0);
        let edge_count: u32 = edges.pixels().map(|p| u32::from(p.0[0] > 0)).sum();
        assert!(edge_count > 0, "expected edges along the boundary");
    }

    #[test]
    fn zero_thresholds_are_clamped() {
        // Clamping means this must not produce an all-edge map.
        let edges = canny(&sharp_edge_image(), 0.0, 0.0);
        let edge_count: u32 = edges.pixels().map(|p| u32::from(p.0[0] > 0)).sum();
        assert!(edge_count < 20 * 20);
    }

    #[test]
    fn close_gaps_bridges_single_pixel_breaks() {
        // Two edge pixels with a one-pixel gap at (6, 5): after the
        // close, the gap pixel is filled.
        let mut img = GrayImage::new(20, 20);
        img.put_pixel(5, 5, image::Luma([255]));
        img.put_pixel(7, 5, image::Luma([255]));
        let closed = close_gaps(&img);
        assert!(closed.get_pixel(6, 5).0[0] > 0, "gap pixel not filled");
        assert!(closed.get_pixel(5, 5).0[0] > 0, "original pixel lost");
    }

    #[test]
    fn empty_edge_map_traces_no_contours() {
        let img = GrayImage::new(10, 10); // all black
        assert!(trace(&img).is_empty());
    }

    #[test]
    fn rectangle_traces_contours() {
        let mut img = GrayImage::new(20, 20);
        for y in 5..15 {
            for x in 5..15 {
                img.put_pixel(x, y, image::Luma([255]));
            }
        }
        let contours = trace(&img);
        assert!(!contours.is_empty(), "expected contours around rectangle");
    }

    #[test]
    fn extract_uniform_image_yields_no_contours() {
        // No edges anywhere is a valid, empty result, not an error.
        let img = image::RgbaImage::from_fn(20, 20, |_, _| image::Rgba([128, 128, 128, 255]));
        let contours = extract(&encode_png(&img), &PipelineConfig::default()).unwrap();
        assert!(contours.is_empty());
    }

    #[test]
    fn extract_sharp_edge_produces_contours() {
        let img = image::RgbaImage::from_fn(40, 40, |x, _| {
            if x < 20 {
                image::Rgba([0, 0, 0, 255])
            } else {
                image::Rgba([255, 255, 255, 255])
            }
        });
        let contours = extract(&encode_png(&img), &PipelineConfig::default()).unwrap();
        assert!(!contours.is_empty());
    }
}
