//! Feathered recomposition of a transformed zone.
//!
//! The alpha mask is 1.0 in the zone interior and falls to 0.0 at the zone
//! border over a margin of 20% of the zone's shorter side. The ramp uses
//! smootherstep so there is no visible seam or banding.

use crate::decode::DecodedImage;
use crate::geometry::BoundingBox;

use super::ZoneError;

/// Feather margin as a fraction of the zone's shorter side.
pub const FEATHER_FRACTION: f32 = 0.2;

/// Smootherstep interpolation function.
///
/// Formula: `6t^5 - 15t^4 + 10t^3`, with `t` clamped to 0.0-1.0.
#[inline]
pub fn smootherstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Feather margin in pixels for a zone of `width` x `height`.
pub fn feather_width(width: u32, height: u32) -> f32 {
    (width.min(height) as f32 * FEATHER_FRACTION).max(1.0)
}

/// Blend weight of the transformed zone at local pixel `(x, y)`.
pub fn feather_alpha(x: u32, y: u32, width: u32, height: u32) -> f32 {
    let fw = feather_width(width, height);
    let edge = |i: u32, n: u32| {
        let center = i as f32 + 0.5;
        center.min(n as f32 - center)
    };
    smootherstep(edge(x, width) / fw) * smootherstep(edge(y, height) / fw)
}

/// Blend `transformed` into `image` over `rect`.
///
/// `transformed` must have the size of `rect`. Only pixels inside `rect` are
/// written: `out = original * (1 - alpha) + transformed * alpha`.
pub fn feather_blend(
    image: &mut DecodedImage,
    rect: &BoundingBox,
    transformed: &DecodedImage,
) -> Result<(), ZoneError> {
    if transformed.width != rect.width || transformed.height != rect.height {
        return Err(ZoneError::BufferMismatch {
            expected: (rect.width, rect.height),
            actual: (transformed.width, transformed.height),
        });
    }
    if !image.bounds().contains(rect) {
        return Err(ZoneError::OutOfBounds {
            zone: *rect,
            image_width: image.width,
            image_height: image.height,
        });
    }

    for ly in 0..rect.height {
        for lx in 0..rect.width {
            let alpha = feather_alpha(lx, ly, rect.width, rect.height);
            if alpha <= 0.0 {
                continue;
            }

            let (gx, gy) = (rect.x + lx, rect.y + ly);
            let original = image.pixel(gx, gy);
            let warped = transformed.pixel(lx, ly);

            let mut blended = [0u8; 3];
            for c in 0..3 {
                let v = original[c] as f32 * (1.0 - alpha) + warped[c] as f32 * alpha;
                blended[c] = v.clamp(0.0, 255.0).round() as u8;
            }
            image.set_pixel(gx, gy, blended);
        }
    }

    Ok(())
}
