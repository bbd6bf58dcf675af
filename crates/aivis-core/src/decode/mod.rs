//! Photo decoding for the perturbation pipeline.
//!
//! This module provides:
//! - Decoding uploaded JPEG/PNG bytes into a 3-channel RGB buffer
//! - EXIF orientation correction so faces are upright before detection
//! - Downscaling for detection on very large photos
//!
//! The decoded buffer is the single mutable image a request works on; it is
//! dropped once the result has been encoded.

mod reader;
mod resize;
mod types;

pub use reader::decode_image;
#[cfg(test)]
pub(crate) use reader::with_exif_orientation;
pub use resize::{downscale_to_fit, Downscaled};
pub use types::{DecodeError, DecodedImage, Orientation};
