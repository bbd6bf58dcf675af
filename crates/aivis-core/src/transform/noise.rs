//! Lightness-only noise injection.
//!
//! Each pixel is converted to Lab, its lightness receives a Gaussian sample
//! with standard deviation `strength * 100` (the full L range), and the pixel
//! is converted back. Chroma is never modified. Samples come from a seeded
//! generator, so the same seed always yields the same output.

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::color::{lab_to_rgb, rgb_to_lab, Lab};
use crate::decode::DecodedImage;

/// Full range of the Lab lightness channel.
const L_RANGE: f64 = 100.0;

/// Add seeded Gaussian lightness noise in place.
///
/// A `strength` of zero (or below) leaves the buffer untouched.
pub fn inject_luminance_noise(image: &mut DecodedImage, strength: f32, seed: u64) {
    if strength <= 0.0 || !strength.is_finite() {
        return;
    }

    let sigma = strength as f64 * L_RANGE;
    let mut rng = StdRng::seed_from_u64(seed);

    for px in image.pixels.chunks_exact_mut(3) {
        let lab = rgb_to_lab([px[0], px[1], px[2]]);
        let l = (lab.l as f64 + sigma * standard_normal(&mut rng)).clamp(0.0, L_RANGE);
        let rgb = lab_to_rgb(Lab { l: l as f32, ..lab });
        px.copy_from_slice(&rgb);
    }
}

/// One standard normal sample (Box-Muller).
fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    // 1 - u keeps the log argument in (0, 1]
    let u1 = 1.0 - rng.random::<f64>();
    let u2 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}
