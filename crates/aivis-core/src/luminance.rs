//! Luminance utilities using ITU-R BT.709 coefficients.
//!
//! The face detector runs on a single 8-bit gray plane; this module builds
//! that plane from the RGB working buffer.

use crate::decode::DecodedImage;

/// ITU-R BT.709 coefficient for red channel in luminance calculation.
pub const LUMINANCE_R: f32 = 0.2126;

/// ITU-R BT.709 coefficient for green channel in luminance calculation.
pub const LUMINANCE_G: f32 = 0.7152;

/// ITU-R BT.709 coefficient for blue channel in luminance calculation.
pub const LUMINANCE_B: f32 = 0.0722;

/// Calculate luminance from u8 RGB values (0 to 255).
#[inline]
pub fn calculate_luminance_u8(r: u8, g: u8, b: u8) -> u8 {
    let lum = LUMINANCE_R * r as f32 + LUMINANCE_G * g as f32 + LUMINANCE_B * b as f32;
    lum.clamp(0.0, 255.0).round() as u8
}

/// Row-major gray plane of an RGB image, one byte per pixel.
pub fn luma_plane(image: &DecodedImage) -> Vec<u8> {
    image
        .pixels
        .chunks_exact(3)
        .map(|px| calculate_luminance_u8(px[0], px[1], px[2]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficients_sum_to_one() {
        let sum = LUMINANCE_R + LUMINANCE_G + LUMINANCE_B;
        assert!((sum - 1.0).abs() < 1e-6, "Coefficients should sum to 1.0");
    }

    #[test]
    fn test_luminance_extremes() {
        assert_eq!(calculate_luminance_u8(255, 255, 255), 255);
        assert_eq!(calculate_luminance_u8(0, 0, 0), 0);
    }

    #[test]
    fn test_luminance_gray_preserves_value() {
        for v in [0u8, 64, 128, 192, 255] {
            let lum = calculate_luminance_u8(v, v, v);
            assert!(
                (lum as i32 - v as i32).abs() <= 1,
                "Gray {} should produce luminance ~{}, got {}",
                v,
                v,
                lum
            );
        }
    }

    #[test]
    fn test_luminance_primaries() {
        // 0.2126 * 255 ≈ 54.21
        assert!((calculate_luminance_u8(255, 0, 0) as i32 - 54).abs() <= 1);
        // 0.7152 * 255 ≈ 182.38
        assert!((calculate_luminance_u8(0, 255, 0) as i32 - 182).abs() <= 1);
        // 0.0722 * 255 ≈ 18.41
        assert!((calculate_luminance_u8(0, 0, 255) as i32 - 18).abs() <= 1);
    }

    #[test]
    fn test_luma_plane_layout() {
        let image = DecodedImage::new(
            3,
            1,
            vec![255, 255, 255, 0, 0, 0, 0, 255, 0],
        );
        let plane = luma_plane(&image);
        assert_eq!(plane.len(), 3);
        assert_eq!(plane[0], 255);
        assert_eq!(plane[1], 0);
        assert!((plane[2] as i32 - 182).abs() <= 1);
    }
}
