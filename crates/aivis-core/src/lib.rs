//! AI Visibility Control core - face-zone perturbation library
//!
//! This crate takes a photo, finds the faces in it, and perturbs the eye band
//! and nose bridge of each face just enough to destabilize automated face
//! embeddings while the photo still looks normal to a person.
//!
//! The entry point is [`Pipeline`]: build it once with a [`FaceDetector`] and
//! a [`PipelineConfig`], then call [`Pipeline::process`] or
//! [`Pipeline::analyze`] per request.
//!
//! ```ignore
//! use aivis_core::{Pipeline, RustfaceDetector};
//!
//! let detector = RustfaceDetector::from_path("seeta_fd_frontal_v1.0.bin")?;
//! let pipeline = Pipeline::new(detector);
//! let result = pipeline.process(&upload, "genai_safe")?;
//! ```

pub mod color;
pub mod config;
pub mod decode;
pub mod detect;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod luminance;
pub mod metrics;
pub mod mode;
pub mod pipeline;
pub mod transform;

pub use config::{ConfigError, PipelineConfig};
pub use decode::{decode_image, DecodeError, DecodedImage};
pub use detect::{normalize_detections, FaceDetector, FixedDetector};
#[cfg(feature = "rustface")]
pub use detect::{RustfaceDetector, RustfaceSettings};
pub use encode::{encode_image, EncodeError, OutputFormat};
pub use error::ProcessError;
pub use geometry::{estimate_zones, BoundingBox, FaceZones, Zone, ZoneKind};
pub use mode::{ModeId, ModeRegistry, ModeSettings, ProcessingMode};
pub use pipeline::{AnalysisReport, Pipeline, ProcessStats, ProcessingMetadata, ProcessingResult};
pub use transform::{transform_zone, ZoneError};

/// Service name reported by health checks.
pub const SERVICE_NAME: &str = "ai-visibility-control";

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
