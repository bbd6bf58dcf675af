//! Asymmetric displacement warp.
//!
//! # Algorithm
//!
//! With normalized zone coordinates `u, v` in `[0, 1]`, `bump(t) = sin(πt)`
//! and peak shift `s`:
//!
//! ```text
//! eyes:        dx = s * bump(v) * (0.25 + 0.75u)    dy = 0.25s * bump(u) * bump(v)
//! nose bridge: dy = s * bump(u) * (0.25 + 0.75v)    dx = 0.25s * bump(u) * bump(v)
//! ```
//!
//! The field is smooth, vanishes along the zone border rows (eyes) or
//! columns (nose bridge), and grows toward one side, so it is never a uniform
//! translation. Output pixels use inverse mapping: each destination pixel
//! samples the source at `(x - dx, y - dy)` with bilinear interpolation.

use std::f64::consts::PI;

use crate::decode::DecodedImage;
use crate::geometry::ZoneKind;

#[inline]
fn bump(t: f64) -> f64 {
    (PI * t).sin()
}

/// Displacement at destination pixel `(x, y)` of a `width` x `height` zone.
pub fn displacement(kind: ZoneKind, x: u32, y: u32, width: u32, height: u32, shift: f64) -> (f64, f64) {
    let u = (x as f64 + 0.5) / width as f64;
    let v = (y as f64 + 0.5) / height as f64;
    let cross = 0.25 * shift * bump(u) * bump(v);

    match kind {
        ZoneKind::Eyes => (shift * bump(v) * (0.25 + 0.75 * u), cross),
        ZoneKind::NoseBridge => (cross, shift * bump(u) * (0.25 + 0.75 * v)),
    }
}

/// Warp a zone buffer by up to `shift` pixels.
///
/// A shift of zero returns an exact copy.
pub fn asymmetric_warp(image: &DecodedImage, kind: ZoneKind, shift: u32) -> DecodedImage {
    if shift == 0 || image.is_empty() {
        return image.clone();
    }

    let shift = shift as f64;
    let mut output = vec![0u8; image.pixels.len()];

    for y in 0..image.height {
        for x in 0..image.width {
            let (dx, dy) = displacement(kind, x, y, image.width, image.height, shift);
            let pixel = sample_bilinear(image, x as f64 - dx, y as f64 - dy);

            let idx = image.offset(x, y);
            output[idx..idx + 3].copy_from_slice(&pixel);
        }
    }

    DecodedImage::new(image.width, image.height, output)
}

/// Sample a pixel using bilinear interpolation.
///
/// Coordinates outside the buffer are clamped to the nearest edge pixel, so
/// the warp never pulls in content from outside the zone.
fn sample_bilinear(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    let max_x = (image.width - 1) as f64;
    let max_y = (image.height - 1) as f64;
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(image.width - 1);
    let y1 = (y0 + 1).min(image.height - 1);

    // Fractional distances
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = image.pixel(x0, y0).map(f64::from);
    let p10 = image.pixel(x1, y0).map(f64::from);
    let p01 = image.pixel(x0, y1).map(f64::from);
    let p11 = image.pixel(x1, y1).map(f64::from);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}
