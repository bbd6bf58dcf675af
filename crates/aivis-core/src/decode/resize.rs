//! Downscaling used to bound the cost of face detection.
//!
//! Detectors scan every position at every pyramid level, so a 24 megapixel
//! upload is shrunk first and the boxes found on the small copy are mapped
//! back with [`Downscaled::factor`]. The input is never modified.

use image::imageops::{self, FilterType};

use super::{DecodeError, DecodedImage};

/// A reduced copy of an image and the factor that maps it back.
#[derive(Debug, Clone)]
pub struct Downscaled {
    pub image: DecodedImage,
    /// Full-resolution longest edge divided by `max_edge` (1.0 when untouched).
    ///
    /// Taken from the longest edge because the other side is rounded.
    pub factor: f64,
}

/// Shrink `image` so its longest edge is at most `max_edge`.
///
/// Images that already fit are returned as a copy with factor 1.0; nothing is
/// ever upscaled.
pub fn downscale_to_fit(image: &DecodedImage, max_edge: u32) -> Result<Downscaled, DecodeError> {
    if max_edge == 0 || image.is_empty() {
        return Err(DecodeError::ZeroDimensions);
    }

    if image.width <= max_edge && image.height <= max_edge {
        return Ok(Downscaled {
            image: image.clone(),
            factor: 1.0,
        });
    }

    let (width, height) = fit_dimensions(image.width, image.height, max_edge);
    let rgb = image
        .to_rgb_image()
        .ok_or_else(|| DecodeError::CorruptedFile("pixel buffer does not match dimensions".to_string()))?;

    // Triangle is bilinear; detection does not benefit from sharper kernels
    let small = imageops::resize(&rgb, width, height, FilterType::Triangle);

    Ok(Downscaled {
        factor: image.width.max(image.height) as f64 / max_edge as f64,
        image: DecodedImage::from_rgb_image(small),
    })
}

/// Dimensions with the longest edge equal to `max_edge`, aspect preserved.
fn fit_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width >= height {
        let h = (height as f64 * max_edge as f64 / width as f64).round() as u32;
        (max_edge, h.max(1))
    } else {
        let w = (width as f64 * max_edge as f64 / height as f64).round() as u32;
        (w.max(1), max_edge)
    }
}
