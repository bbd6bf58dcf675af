//! Pixel difference measurements between an original and a processed image.

use crate::decode::DecodedImage;
use crate::geometry::BoundingBox;

/// Mean absolute per-channel difference over `region`, in 8-bit levels.
///
/// Returns `None` if the images differ in size, either buffer is
/// inconsistent, or `region` is empty or not inside the images.
pub fn mean_abs_difference(a: &DecodedImage, b: &DecodedImage, region: &BoundingBox) -> Option<f64> {
    if !comparable(a, b, region) {
        return None;
    }

    let row_bytes = region.width as usize * 3;
    let mut total: u64 = 0;
    for y in region.y..region.bottom() {
        let start = a.offset(region.x, y);
        let row_a = &a.pixels[start..start + row_bytes];
        let row_b = &b.pixels[start..start + row_bytes];
        total += row_a
            .iter()
            .zip(row_b)
            .map(|(&p, &q)| p.abs_diff(q) as u64)
            .sum::<u64>();
    }

    Some(total as f64 / (region.area() as f64 * 3.0))
}

/// Number of pixels inside `region` whose RGB value differs.
pub fn changed_pixels(a: &DecodedImage, b: &DecodedImage, region: &BoundingBox) -> Option<usize> {
    if !comparable(a, b, region) {
        return None;
    }

    let mut count = 0;
    for y in region.y..region.bottom() {
        for x in region.x..region.right() {
            if a.pixel(x, y) != b.pixel(x, y) {
                count += 1;
            }
        }
    }
    Some(count)
}

fn comparable(a: &DecodedImage, b: &DecodedImage, region: &BoundingBox) -> bool {
    a.width == b.width
        && a.height == b.height
        && a.is_consistent()
        && b.is_consistent()
        && !region.is_empty()
        && a.bounds().contains(region)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_images() {
        let img = DecodedImage::new(4, 4, vec![77u8; 48]);
        let rect = img.bounds();
        assert_eq!(mean_abs_difference(&img, &img, &rect), Some(0.0));
        assert_eq!(changed_pixels(&img, &img, &rect), Some(0));
    }

    #[test]
    fn test_region_restricts_measurement() {
        let a = DecodedImage::new(4, 4, vec![0u8; 48]);
        let mut b = a.clone();
        b.set_pixel(3, 3, [30, 60, 90]);

        let corner = BoundingBox::new(2, 2, 2, 2);
        // (30 + 60 + 90) / (4 pixels * 3 channels)
        assert_eq!(mean_abs_difference(&a, &b, &corner), Some(15.0));
        assert_eq!(changed_pixels(&a, &b, &corner), Some(1));

        let elsewhere = BoundingBox::new(0, 0, 2, 2);
        assert_eq!(mean_abs_difference(&a, &b, &elsewhere), Some(0.0));
    }

    #[test]
    fn test_incomparable_inputs() {
        let a = DecodedImage::new(4, 4, vec![0u8; 48]);
        let b = DecodedImage::new(2, 2, vec![0u8; 12]);
        assert_eq!(mean_abs_difference(&a, &b, &b.bounds()), None);
        assert_eq!(mean_abs_difference(&a, &a, &BoundingBox::new(3, 3, 2, 2)), None);
        assert_eq!(changed_pixels(&a, &a, &BoundingBox::new(0, 0, 0, 2)), None);
    }
}
