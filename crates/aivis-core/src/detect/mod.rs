//! Face detection behind a single-method capability.
//!
//! This module provides:
//! - The [`FaceDetector`] trait every backend implements
//! - [`FixedDetector`], which replays a preset list of boxes
//! - [`RustfaceDetector`] (feature `rustface`), a SeetaFace frontal cascade
//! - Post-processing shared by all backends: clamping, size floor, and
//!   suppression of duplicate boxes
//!
//! Backends return raw boxes; [`detect_faces`] is what the pipeline calls and
//! is the only place the deduplication guarantee is enforced.

mod fixed;
#[cfg(feature = "rustface")]
mod seeta;

pub use fixed::FixedDetector;
#[cfg(feature = "rustface")]
pub use seeta::{RustfaceDetector, RustfaceSettings};

use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::decode::{downscale_to_fit, DecodedImage};
use crate::geometry::BoundingBox;

/// Pluggable face detection backend.
///
/// Implementations are loaded once and shared read-only between requests.
pub trait FaceDetector: Send + Sync {
    /// Detect faces in an RGB image. Boxes may be unsorted, overlapping, or
    /// partly outside the image.
    fn detect(&self, image: &DecodedImage) -> Vec<BoundingBox>;
}

impl<D: FaceDetector + ?Sized> FaceDetector for Box<D> {
    fn detect(&self, image: &DecodedImage) -> Vec<BoundingBox> {
        (**self).detect(image)
    }
}

/// Run `detector` and normalize its output with the settings in `config`.
///
/// When `config.detection_max_dimension` is set and the image is larger, the
/// detector sees a downscaled copy and boxes are mapped back to full size.
pub fn detect_faces(
    detector: &dyn FaceDetector,
    image: &DecodedImage,
    config: &PipelineConfig,
) -> Vec<BoundingBox> {
    let raw = match config.detection_max_dimension {
        Some(max_edge) if image.width.max(image.height) > max_edge => {
            detect_downscaled(detector, image, max_edge)
        }
        _ => detector.detect(image),
    };

    let raw_count = raw.len();
    let faces = normalize_detections(
        raw,
        image.width,
        image.height,
        config.min_face_size,
        config.overlap_threshold,
    );
    debug!(raw = raw_count, kept = faces.len(), "Face detection finished");
    faces
}

fn detect_downscaled(
    detector: &dyn FaceDetector,
    image: &DecodedImage,
    max_edge: u32,
) -> Vec<BoundingBox> {
    let small = match downscale_to_fit(image, max_edge) {
        Ok(small) => small,
        Err(err) => {
            warn!(%err, "Detection downscale failed, detecting at full size");
            return detector.detect(image);
        }
    };

    debug!(
        from_width = image.width,
        to_width = small.image.width,
        factor = small.factor,
        "Detecting on downscaled copy"
    );

    detector
        .detect(&small.image)
        .iter()
        .map(|b| b.scale(small.factor))
        .collect()
}

/// Clamp boxes to the image, drop small ones, and suppress duplicates.
///
/// Suppression is greedy: boxes are visited largest first and a box is kept
/// only if its IoU with every kept box is at most `overlap_threshold`. The
/// result is ordered by descending area.
pub fn normalize_detections(
    boxes: Vec<BoundingBox>,
    image_width: u32,
    image_height: u32,
    min_size: u32,
    overlap_threshold: f32,
) -> Vec<BoundingBox> {
    let mut candidates: Vec<BoundingBox> = boxes
        .into_iter()
        .filter_map(|b| b.clamp_to(image_width, image_height))
        .filter(|b| b.width >= min_size && b.height >= min_size)
        .collect();

    candidates.sort_by(|a, b| b.area().cmp(&a.area()));

    let mut kept: Vec<BoundingBox> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if kept.iter().all(|k| k.iou(&candidate) <= overlap_threshold) {
            kept.push(candidate);
        }
    }
    kept
}
