//! Pipeline configuration, fixed when the pipeline is built.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encode::OutputFormat;
use crate::mode::ModeRegistry;

/// Default seed for the lightness noise generator.
pub const DEFAULT_NOISE_SEED: u64 = 0x5EED_FACE;

/// Smallest face side length kept after detection.
pub const DEFAULT_MIN_FACE_SIZE: u32 = 30;

/// IoU above which two detections are treated as the same face.
pub const DEFAULT_OVERLAP_THRESHOLD: f32 = 0.3;

/// Errors raised while validating configuration or loading a detector.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Mode {mode}: blur radius must be an odd value between 1 and 31, got {value}")]
    InvalidBlurRadius { mode: String, value: u32 },

    #[error("Mode {mode}: noise strength must be within 0.0..=1.0, got {value}")]
    InvalidNoiseStrength { mode: String, value: f32 },

    #[error("Mode {mode}: asymmetry shift must be at most 16 pixels, got {value}")]
    InvalidAsymmetryShift { mode: String, value: u32 },

    #[error("JPEG quality must be within 1..=100, got {0}")]
    InvalidJpegQuality(u8),

    #[error("Overlap threshold must be within 0.0..=1.0, got {0}")]
    InvalidOverlapThreshold(f32),

    #[error("Detection max dimension must be at least 64 pixels, got {0}")]
    InvalidDetectionMaxDimension(u32),

    /// The detector model could not be read or parsed.
    #[error("Failed to load detector model: {0}")]
    ModelLoad(String),
}

/// Everything the pipeline needs besides the detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Container format of processed output.
    pub output: OutputFormat,
    /// Base seed for lightness noise; output is reproducible for a given seed.
    pub noise_seed: u64,
    /// Detections smaller than this on either side are discarded.
    pub min_face_size: u32,
    /// IoU threshold for suppressing duplicate detections.
    pub overlap_threshold: f32,
    /// Downscale images whose longest side exceeds this before detecting.
    pub detection_max_dimension: Option<u32>,
    pub modes: ModeRegistry,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output: OutputFormat::default(),
            noise_seed: DEFAULT_NOISE_SEED,
            min_face_size: DEFAULT_MIN_FACE_SIZE,
            overlap_threshold: DEFAULT_OVERLAP_THRESHOLD,
            detection_max_dimension: None,
            modes: ModeRegistry::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let OutputFormat::Jpeg { quality } = self.output {
            if !(1..=100).contains(&quality) {
                return Err(ConfigError::InvalidJpegQuality(quality));
            }
        }
        if !self.overlap_threshold.is_finite() || !(0.0..=1.0).contains(&self.overlap_threshold) {
            return Err(ConfigError::InvalidOverlapThreshold(self.overlap_threshold));
        }
        if let Some(max) = self.detection_max_dimension {
            if max < 64 {
                return Err(ConfigError::InvalidDetectionMaxDimension(max));
            }
        }
        self.modes.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::ModeSettings;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.output, OutputFormat::Jpeg { quality: 95 });
        assert_eq!(config.min_face_size, 30);
        assert_eq!(config.detection_max_dimension, None);
    }

    #[test]
    fn test_invalid_quality() {
        let mut config = PipelineConfig::default();
        config.output = OutputFormat::Jpeg { quality: 0 };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidJpegQuality(0))));
    }

    #[test]
    fn test_invalid_overlap_threshold() {
        let mut config = PipelineConfig::default();
        config.overlap_threshold = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidOverlapThreshold(_))
        ));
    }

    #[test]
    fn test_invalid_detection_dimension() {
        let mut config = PipelineConfig::default();
        config.detection_max_dimension = Some(10);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDetectionMaxDimension(10))
        ));
    }

    #[test]
    fn test_mode_errors_propagate() {
        let mut config = PipelineConfig::default();
        config.modes.max_privacy = ModeSettings::new(8, 0.08, 3);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_privacy"));
    }
}
