use std::io::Cursor;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ConfigError;
use crate::decode::DecodedImage;
use crate::geometry::BoundingBox;
use crate::luminance::luma_plane;

use super::FaceDetector;

/// Tuning knobs of the SeetaFace cascade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RustfaceSettings {
    /// Smallest face side the cascade searches for, in pixels.
    pub min_face_size: u32,
    /// Classifier score a window needs to count as a face.
    pub score_threshold: f64,
    /// Scale step between pyramid levels (0.0 to 1.0).
    pub pyramid_scale_factor: f32,
    /// Sliding window step in pixels, both axes.
    pub slide_window_step: u32,
}

impl Default for RustfaceSettings {
    fn default() -> Self {
        Self {
            min_face_size: 20,
            score_threshold: 2.0,
            pyramid_scale_factor: 0.8,
            slide_window_step: 4,
        }
    }
}

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// The model is parsed once at construction. Each call clones it into a
/// fresh cascade, so one detector can serve concurrent requests.
pub struct RustfaceDetector {
    model: rustface::Model,
    settings: RustfaceSettings,
}

impl RustfaceDetector {
    /// Load a SeetaFace model (`seeta_fd_frontal_v1.0.bin`) from memory.
    pub fn from_bytes(model_data: &[u8]) -> Result<Self, ConfigError> {
        let model = rustface::read_model(Cursor::new(model_data))
            .map_err(|e| ConfigError::ModelLoad(e.to_string()))?;
        debug!(bytes = model_data.len(), "Loaded SeetaFace model");
        Ok(Self {
            model,
            settings: RustfaceSettings::default(),
        })
    }

    /// Load a SeetaFace model from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| ConfigError::ModelLoad(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(&data)
    }

    pub fn with_settings(mut self, settings: RustfaceSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &RustfaceSettings {
        &self.settings
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(&self, image: &DecodedImage) -> Vec<BoundingBox> {
        if image.is_empty() || !image.is_consistent() {
            return Vec::new();
        }

        let gray = luma_plane(image);

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(self.settings.min_face_size);
        detector.set_score_thresh(self.settings.score_threshold);
        detector.set_pyramid_scale_factor(self.settings.pyramid_scale_factor);
        detector.set_slide_window_step(
            self.settings.slide_window_step,
            self.settings.slide_window_step,
        );

        let faces = detector.detect(&rustface::ImageData::new(&gray, image.width, image.height));

        faces
            .iter()
            .filter_map(|face| {
                let bbox = face.bbox();
                to_bounding_box(bbox.x(), bbox.y(), bbox.width(), bbox.height())
            })
            .collect()
    }
}

/// Convert a cascade box, which may start at negative coordinates, by
/// trimming the part left of or above the origin.
fn to_bounding_box(x: i32, y: i32, width: u32, height: u32) -> Option<BoundingBox> {
    let trim_x = x.min(0).unsigned_abs();
    let trim_y = y.min(0).unsigned_abs();
    let width = width.checked_sub(trim_x)?;
    let height = height.checked_sub(trim_y)?;
    if width == 0 || height == 0 {
        return None;
    }
    Some(BoundingBox::new(x.max(0) as u32, y.max(0) as u32, width, height))
}
