//! Request orchestration: decode, detect, perturb, encode.
//!
//! A request moves through `decoded -> detecting -> per-face loop -> encoded`.
//! Zero faces ends `process` with [`ProcessError::NoFacesDetected`] but is a
//! normal outcome for `analyze`. A zone that fails to transform is logged and
//! skipped; the rest of the request continues.

use serde::Serialize;
use tracing::{debug, info, span, warn, Level};

use crate::config::{ConfigError, PipelineConfig};
use crate::decode::{decode_image, DecodeError, DecodedImage};
use crate::detect::{detect_faces, FaceDetector};
use crate::encode::{encode_image, OutputFormat};
use crate::error::ProcessError;
use crate::geometry::{estimate_zones, BoundingBox};
use crate::mode::{ModeRegistry, ModeSettings, ProcessingMode};
use crate::transform::transform_zone;

/// Counters from running the per-face loop on one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ProcessStats {
    pub faces_detected: usize,
    pub zones_modified: usize,
    /// Zones that were estimated but failed to transform.
    pub zones_skipped: usize,
}

/// Output of a successful `process` call.
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    pub faces_detected: usize,
    pub zones_modified: usize,
    /// Canonical identifier of the mode that ran, e.g. `genai_safe`.
    pub mode_applied: String,
    pub mode_label: &'static str,
    pub settings: ModeSettings,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    /// Encoded image bytes.
    pub output_image: Vec<u8>,
}

/// Everything in a [`ProcessingResult`] except the image bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingMetadata {
    pub faces_detected: usize,
    pub zones_modified: usize,
    pub mode_applied: String,
    pub mode_label: &'static str,
    pub settings: ModeSettings,
    pub width: u32,
    pub height: u32,
    pub content_type: &'static str,
}

impl ProcessingResult {
    pub fn metadata(&self) -> ProcessingMetadata {
        ProcessingMetadata {
            faces_detected: self.faces_detected,
            zones_modified: self.zones_modified,
            mode_applied: self.mode_applied.clone(),
            mode_label: self.mode_label,
            settings: self.settings,
            width: self.width,
            height: self.height,
            content_type: self.format.mime_type(),
        }
    }
}

/// Output of `analyze`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub faces_detected: usize,
    /// Whether `process` would find at least one face.
    pub processable: bool,
    pub width: u32,
    pub height: u32,
}

/// A loaded detector plus the configuration it runs with.
///
/// Built once and shared read-only; every method takes `&self`.
pub struct Pipeline {
    detector: Box<dyn FaceDetector>,
    config: PipelineConfig,
}

impl Pipeline {
    /// Pipeline with the default configuration.
    pub fn new(detector: impl FaceDetector + 'static) -> Self {
        Self {
            detector: Box::new(detector),
            config: PipelineConfig::default(),
        }
    }

    /// Pipeline with a custom configuration, validated up front.
    pub fn with_config(
        detector: impl FaceDetector + 'static,
        config: PipelineConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            detector: Box::new(detector),
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn modes(&self) -> &ModeRegistry {
        &self.config.modes
    }

    /// Perturb every detected face in `image_bytes` with the named mode.
    ///
    /// The mode is resolved before any decoding or detection happens.
    pub fn process(
        &self,
        image_bytes: &[u8],
        mode_name: &str,
    ) -> Result<ProcessingResult, ProcessError> {
        let span = span!(
            Level::DEBUG,
            "process",
            mode = mode_name,
            bytes = image_bytes.len()
        );
        let _guard = span.enter();

        let mode = self.config.modes.resolve(mode_name)?;
        let mut image = decode_image(image_bytes)?;
        let stats = self.process_image(&mut image, &mode)?;
        let output_image = encode_image(&image, self.config.output)?;

        info!(
            faces = stats.faces_detected,
            zones = stats.zones_modified,
            mode = mode.name(),
            output_bytes = output_image.len(),
            "Processed image"
        );

        Ok(ProcessingResult {
            faces_detected: stats.faces_detected,
            zones_modified: stats.zones_modified,
            mode_applied: mode.name().to_string(),
            mode_label: mode.label(),
            settings: mode.settings,
            width: image.width,
            height: image.height,
            format: self.config.output,
            output_image,
        })
    }

    /// Run detection and the per-face loop on an already decoded image.
    pub fn process_image(
        &self,
        image: &mut DecodedImage,
        mode: &ProcessingMode,
    ) -> Result<ProcessStats, ProcessError> {
        if image.is_empty() {
            return Err(ProcessError::InvalidFormat(DecodeError::ZeroDimensions));
        }
        if !image.is_consistent() {
            return Err(ProcessError::InternalProcessingError(format!(
                "pixel buffer holds {} bytes for a {}x{} image",
                image.pixels.len(),
                image.width,
                image.height
            )));
        }

        let faces = self.detect_faces(image);
        if faces.is_empty() {
            debug!("No faces detected");
            return Err(ProcessError::NoFacesDetected);
        }

        let mut stats = ProcessStats {
            faces_detected: faces.len(),
            ..Default::default()
        };

        for face in &faces {
            let zones = estimate_zones(face, image.width, image.height);
            debug!(?face, zones = zones.len(), "Processing face");

            for zone in zones.iter() {
                match transform_zone(image, &zone, &mode.settings, self.config.noise_seed) {
                    Ok(()) => stats.zones_modified += 1,
                    Err(err) => {
                        warn!(zone = zone.kind.as_str(), rect = ?zone.rect, %err, "Skipping zone");
                        stats.zones_skipped += 1;
                    }
                }
            }
        }

        Ok(stats)
    }

    /// Decode and detect only; never transforms anything.
    pub fn analyze(&self, image_bytes: &[u8]) -> Result<AnalysisReport, ProcessError> {
        let span = span!(Level::DEBUG, "analyze", bytes = image_bytes.len());
        let _guard = span.enter();

        let image = decode_image(image_bytes)?;
        let faces = self.detect_faces(&image);

        Ok(AnalysisReport {
            faces_detected: faces.len(),
            processable: !faces.is_empty(),
            width: image.width,
            height: image.height,
        })
    }

    /// Deduplicated face boxes inside `image`.
    pub fn detect_faces(&self, image: &DecodedImage) -> Vec<BoundingBox> {
        detect_faces(self.detector.as_ref(), image, &self.config)
    }
}
