//! Output encoding for processed photos.
//!
//! This module provides:
//! - JPEG encoding at a fixed high quality (the default output)
//! - Lossless PNG encoding, for callers that need byte-exact pixels outside
//!   the perturbed zones
//!
//! All operations are synchronous and allocate a fresh output buffer.

mod jpeg;
mod png;

pub use jpeg::encode_jpeg;
pub use png::encode_png;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::DecodedImage;

/// JPEG quality used when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Container format of the processed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum OutputFormat {
    /// Lossy JPEG at the given quality (1-100).
    Jpeg { quality: u8 },
    /// Lossless PNG.
    Png,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl OutputFormat {
    /// MIME type of the encoded bytes.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg { .. } => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }

    /// Conventional file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg { .. } => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

/// Encode a decoded image in the requested output format.
pub fn encode_image(image: &DecodedImage, format: OutputFormat) -> Result<Vec<u8>, EncodeError> {
    match format {
        OutputFormat::Jpeg { quality } => {
            encode_jpeg(&image.pixels, image.width, image.height, quality)
        }
        OutputFormat::Png => encode_png(&image.pixels, image.width, image.height),
    }
}

/// Validate that `pixels` is a non-empty RGB buffer of `width` x `height`.
fn check_buffer(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    Ok(())
}
