//! Per-zone perturbation.
//!
//! # Stage Order
//!
//! Every zone goes through the same fixed sequence on its own sub-buffer:
//! 1. Bilateral smoothing (`blur_radius`)
//! 2. Lightness noise in Lab space (`noise_strength`)
//! 3. Asymmetric warp (`asymmetry_shift`)
//! 4. Feathered blend back into the full image
//!
//! Smoothing runs before noise so the noise is not smeared, and the warp runs
//! before the blend so the feather mask is applied to the warped content.
//! Running a zone twice compounds the effect.
//!
//! # Coordinate System
//!
//! - Zone rectangles are in full-image pixel coordinates
//! - Stage functions work on a zone-sized buffer with its own origin

mod bilateral;
mod feather;
mod noise;
mod warp;

pub use bilateral::{bilateral_filter, SIGMA_COLOR, SIGMA_SPACE};
pub use feather::{feather_alpha, feather_blend, feather_width, smootherstep, FEATHER_FRACTION};
pub use noise::inject_luminance_noise;
pub use warp::{asymmetric_warp, displacement};

use thiserror::Error;
use tracing::trace;

use crate::decode::DecodedImage;
use crate::geometry::{BoundingBox, Zone, ZoneKind, MIN_ZONE_SIZE};
use crate::mode::ModeSettings;

/// Reasons a single zone could not be transformed.
///
/// These never abort a request: the zone is skipped and not counted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ZoneError {
    #[error("Zone is too small to transform: {width}x{height}")]
    Degenerate { width: u32, height: u32 },

    #[error("Zone {zone:?} lies outside the {image_width}x{image_height} image")]
    OutOfBounds {
        zone: BoundingBox,
        image_width: u32,
        image_height: u32,
    },

    #[error("Zone buffer is {actual:?}, expected {expected:?}")]
    BufferMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Image buffer holds {actual} bytes, expected {expected}")]
    InconsistentImage { expected: usize, actual: usize },
}

/// Run all four stages on `zone` and write the result into `image`.
///
/// `seed` drives the noise stage; the same image, zone, settings and seed
/// always produce the same pixels. On error `image` is left unmodified.
pub fn transform_zone(
    image: &mut DecodedImage,
    zone: &Zone,
    settings: &ModeSettings,
    seed: u64,
) -> Result<(), ZoneError> {
    let rect = zone.rect;
    if rect.width < MIN_ZONE_SIZE || rect.height < MIN_ZONE_SIZE {
        return Err(ZoneError::Degenerate {
            width: rect.width,
            height: rect.height,
        });
    }
    if !image.is_consistent() {
        return Err(ZoneError::InconsistentImage {
            expected: image.pixel_count() * 3,
            actual: image.pixels.len(),
        });
    }

    let original = image.extract(&rect).ok_or(ZoneError::OutOfBounds {
        zone: rect,
        image_width: image.width,
        image_height: image.height,
    })?;

    let mut work = bilateral_filter(&original, settings.blur_radius);
    inject_luminance_noise(&mut work, settings.noise_strength, zone_seed(seed, zone));
    let work = asymmetric_warp(&work, zone.kind, settings.asymmetry_shift);

    trace!(zone = zone.kind.as_str(), ?rect, "Blending transformed zone");
    feather_blend(image, &rect, &work)
}

/// Derive a per-zone noise seed so neighboring zones get independent noise.
pub fn zone_seed(base: u64, zone: &Zone) -> u64 {
    let r = zone.rect;
    let kind = match zone.kind {
        ZoneKind::Eyes => 1,
        ZoneKind::NoseBridge => 2,
    };
    [r.x, r.y, r.width, r.height, kind]
        .into_iter()
        .fold(base, |acc, v| splitmix64(acc ^ v as u64))
}

#[inline]
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::mean_abs_difference;

    fn textured(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = 120.0 + 45.0 * (x as f64 * 0.6).sin() * (y as f64 * 0.4).cos();
                let v = v as u8;
                pixels.extend_from_slice(&[v, v.saturating_sub(30), v / 2 + 60]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    fn eyes(rect: BoundingBox) -> Zone {
        Zone {
            kind: ZoneKind::Eyes,
            rect,
        }
    }

    fn zone_difference(settings: ModeSettings) -> f64 {
        let original = textured(80, 60);
        let zone = eyes(BoundingBox::new(10, 15, 60, 24));
        let mut image = original.clone();
        transform_zone(&mut image, &zone, &settings, 11).unwrap();
        mean_abs_difference(&original, &image, &zone.rect).unwrap()
    }

    #[test]
    fn test_identity_settings_leave_image_unchanged() {
        let original = textured(40, 30);
        let mut image = original.clone();
        let zone = eyes(BoundingBox::new(5, 5, 30, 10));

        transform_zone(&mut image, &zone, &ModeSettings::IDENTITY, 1).unwrap();
        assert_eq!(image, original);
    }

    #[test]
    fn test_pixels_outside_zone_untouched() {
        let original = textured(50, 40);
        let mut image = original.clone();
        let zone = eyes(BoundingBox::new(10, 10, 30, 12));

        transform_zone(&mut image, &zone, &ModeSettings::new(7, 0.08, 3), 3).unwrap();

        let mut changed_inside = 0;
        for y in 0..40 {
            for x in 0..50 {
                if zone.rect.contains_point(x, y) {
                    changed_inside += (image.pixel(x, y) != original.pixel(x, y)) as usize;
                } else {
                    assert_eq!(image.pixel(x, y), original.pixel(x, y), "({}, {})", x, y);
                }
            }
        }
        assert!(changed_inside > 0);
    }

    #[test]
    fn test_each_parameter_increases_difference() {
        let base = ModeSettings::new(3, 0.02, 1);
        let d_base = zone_difference(base);

        assert!(zone_difference(ModeSettings { blur_radius: 7, ..base }) > d_base);
        assert!(zone_difference(ModeSettings { noise_strength: 0.08, ..base }) > d_base);
        assert!(zone_difference(ModeSettings { asymmetry_shift: 3, ..base }) > d_base);
    }

    #[test]
    fn test_single_parameter_from_identity() {
        let identity = ModeSettings::IDENTITY;
        assert_eq!(zone_difference(identity), 0.0);
        assert!(zone_difference(ModeSettings { blur_radius: 3, ..identity }) > 0.0);
        assert!(zone_difference(ModeSettings { noise_strength: 0.02, ..identity }) > 0.0);
        assert!(zone_difference(ModeSettings { asymmetry_shift: 1, ..identity }) > 0.0);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let zone = eyes(BoundingBox::new(10, 10, 30, 12));
        let settings = ModeSettings::new(5, 0.04, 2);

        let mut a = textured(50, 40);
        let mut b = a.clone();
        transform_zone(&mut a, &zone, &settings, 77).unwrap();
        transform_zone(&mut b, &zone, &settings, 77).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_degenerate_zone_rejected() {
        let mut image = textured(20, 20);
        let before = image.clone();
        let zone = eyes(BoundingBox::new(0, 0, 3, 10));

        let err = transform_zone(&mut image, &zone, &ModeSettings::new(5, 0.04, 2), 0);
        assert_eq!(err, Err(ZoneError::Degenerate { width: 3, height: 10 }));
        assert_eq!(image, before);
    }

    #[test]
    fn test_out_of_bounds_zone_rejected() {
        let mut image = textured(20, 20);
        let zone = eyes(BoundingBox::new(15, 0, 10, 10));
        let err = transform_zone(&mut image, &zone, &ModeSettings::new(5, 0.04, 2), 0);
        assert!(matches!(err, Err(ZoneError::OutOfBounds { .. })));
    }

    #[test]
    fn test_inconsistent_image_rejected() {
        let mut image = DecodedImage {
            width: 20,
            height: 20,
            pixels: vec![0u8; 20 * 19 * 3],
        };
        let zone = eyes(BoundingBox::new(0, 0, 10, 10));
        let err = transform_zone(&mut image, &zone, &ModeSettings::new(5, 0.04, 2), 0);
        assert_eq!(
            err,
            Err(ZoneError::InconsistentImage {
                expected: 1200,
                actual: 1140
            })
        );
    }

    #[test]
    fn test_zone_seed_varies_by_zone() {
        let a = eyes(BoundingBox::new(10, 10, 30, 12));
        let b = Zone {
            kind: ZoneKind::NoseBridge,
            ..a
        };
        let c = eyes(BoundingBox::new(11, 10, 30, 12));

        assert_eq!(zone_seed(1, &a), zone_seed(1, &a));
        assert_ne!(zone_seed(1, &a), zone_seed(1, &b));
        assert_ne!(zone_seed(1, &a), zone_seed(1, &c));
        assert_ne!(zone_seed(1, &a), zone_seed(2, &a));
    }
}
