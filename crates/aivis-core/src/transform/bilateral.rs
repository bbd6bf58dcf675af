//! Edge-preserving smoothing.
//!
//! Each output pixel is a weighted mean over a circular window whose weights
//! combine spatial distance and color similarity, so fine texture is flattened
//! while strong edges (eyelids, brows, the nose outline) survive.

use crate::decode::DecodedImage;

/// Spatial falloff, in pixels.
pub const SIGMA_SPACE: f32 = 75.0;

/// Color similarity falloff, in 8-bit channel units.
pub const SIGMA_COLOR: f32 = 75.0;

/// Bilateral filter with a window of `diameter` pixels.
///
/// A diameter of 1 (or 0) returns an exact copy. Windows are truncated at the
/// buffer edges, so no pixels outside `image` are ever read.
pub fn bilateral_filter(image: &DecodedImage, diameter: u32) -> DecodedImage {
    let radius = (diameter / 2) as i32;
    if radius == 0 || image.is_empty() {
        return image.clone();
    }

    let kernel = spatial_kernel(radius);
    let color_coeff = -1.0 / (2.0 * SIGMA_COLOR * SIGMA_COLOR);

    let (w, h) = (image.width as i32, image.height as i32);
    let mut output = vec![0u8; image.pixels.len()];

    for y in 0..h {
        for x in 0..w {
            let center = image.pixel(x as u32, y as u32);
            let (cr, cg, cb) = (center[0] as f32, center[1] as f32, center[2] as f32);

            let mut sum = [0.0f32; 3];
            let mut weight_sum = 0.0f32;

            for &(dx, dy, spatial) in &kernel {
                let (nx, ny) = (x + dx, y + dy);
                if nx < 0 || ny < 0 || nx >= w || ny >= h {
                    continue;
                }

                let n = image.pixel(nx as u32, ny as u32);
                let (nr, ng, nb) = (n[0] as f32, n[1] as f32, n[2] as f32);

                let dist_sq = (nr - cr).powi(2) + (ng - cg).powi(2) + (nb - cb).powi(2);
                let weight = spatial * (dist_sq * color_coeff).exp();

                sum[0] += nr * weight;
                sum[1] += ng * weight;
                sum[2] += nb * weight;
                weight_sum += weight;
            }

            let idx = image.offset(x as u32, y as u32);
            if weight_sum > 0.0 {
                for c in 0..3 {
                    output[idx + c] = (sum[c] / weight_sum).round().clamp(0.0, 255.0) as u8;
                }
            } else {
                output[idx..idx + 3].copy_from_slice(&center);
            }
        }
    }

    DecodedImage::new(image.width, image.height, output)
}

/// Offsets inside the circle of `radius` with their spatial weights.
fn spatial_kernel(radius: i32) -> Vec<(i32, i32, f32)> {
    let space_coeff = -1.0 / (2.0 * SIGMA_SPACE * SIGMA_SPACE);
    let r_sq = radius * radius;

    let mut kernel = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let d_sq = dx * dx + dy * dy;
            if d_sq <= r_sq {
                kernel.push((dx, dy, (d_sq as f32 * space_coeff).exp()));
            }
        }
    }
    kernel
}
