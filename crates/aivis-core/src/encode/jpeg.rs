//! JPEG encoding for processed photos.
//!
//! Uses the `image` crate's baseline JPEG encoder. The pipeline encodes at a
//! fixed high quality so the perturbation, not the compression, dominates the
//! difference from the upload.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::{check_buffer, EncodeError};

/// Encode a row-major RGB buffer as baseline JPEG.
///
/// Quality is clamped to 1-100. The pipeline default is 95, high enough that
/// block artifacts stay below the perturbation itself.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    check_buffer(pixels, width, height)?;

    let quality = quality.clamp(1, 100);

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: usize, height: usize) -> Vec<u8> {
        let mut pixels = Vec::with_capacity(width * height * 3);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x * 255 / width) as u8, (y * 255 / height) as u8, 128]);
            }
        }
        pixels
    }

    #[test]
    fn test_encode_jpeg_markers() {
        let jpeg_bytes = encode_jpeg(&gradient(64, 48), 64, 48, 95).unwrap();

        // SOI and EOI markers
        assert_eq!(&jpeg_bytes[0..2], &[0xFF, 0xD8]);
        let len = jpeg_bytes.len();
        assert_eq!(&jpeg_bytes[len - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_jpeg_decodes_to_same_dimensions() {
        let jpeg_bytes = encode_jpeg(&gradient(40, 30), 40, 30, 95).unwrap();
        let decoded = image::load_from_memory(&jpeg_bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 30));
    }

    #[test]
    fn test_encode_jpeg_quality_clamping() {
        let pixels = vec![128u8; 10 * 10 * 3];
        assert!(encode_jpeg(&pixels, 10, 10, 0).is_ok());
        assert!(encode_jpeg(&pixels, 10, 10, 255).is_ok());
    }

    #[test]
    fn test_encode_jpeg_high_quality_is_larger() {
        let pixels = gradient(100, 100);
        let low_q = encode_jpeg(&pixels, 100, 100, 20).unwrap();
        let high_q = encode_jpeg(&pixels, 100, 100, 95).unwrap();
        assert!(high_q.len() > low_q.len());
    }

    #[test]
    fn test_encode_jpeg_invalid_pixel_data() {
        let pixels = vec![128u8; 99 * 100 * 3]; // One row short
        let result = encode_jpeg(&pixels, 100, 100, 90);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }

    #[test]
    fn test_encode_jpeg_zero_dimensions() {
        let result = encode_jpeg(&[], 0, 100, 90);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: any correctly sized buffer encodes to a well-formed JPEG.
        #[test]
        fn prop_valid_input_produces_valid_jpeg(
            (width, height) in (1u32..=40, 1u32..=40),
            quality in 1u8..=100,
            fill in any::<u8>(),
        ) {
            let pixels = vec![fill; (width as usize) * (height as usize) * 3];
            let jpeg_bytes = encode_jpeg(&pixels, width, height, quality).unwrap();

            prop_assert_eq!(&jpeg_bytes[0..2], &[0xFF, 0xD8]);
            let len = jpeg_bytes.len();
            prop_assert_eq!(&jpeg_bytes[len - 2..], &[0xFF, 0xD9]);
        }
    }
}
