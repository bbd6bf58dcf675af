//! Lossless PNG encoding.

use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;

use super::{check_buffer, EncodeError};

/// Encode RGB pixel data to PNG bytes.
///
/// Every pixel survives the round trip, so pixels the pipeline did not touch
/// stay byte-identical to the decoded upload.
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    check_buffer(pixels, width, height)?;

    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_png_roundtrip_is_exact() {
        let pixels: Vec<u8> = (0..6 * 5 * 3).map(|i| (i * 7 % 256) as u8).collect();
        let png = encode_png(&pixels, 6, 5).unwrap();

        let decoded = image::load_from_memory(&png).unwrap().into_rgb8();
        assert_eq!(decoded.dimensions(), (6, 5));
        assert_eq!(decoded.into_raw(), pixels);
    }

    #[test]
    fn test_encode_png_rejects_short_buffer() {
        let result = encode_png(&[0u8; 10], 2, 2);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }
}
