//! Face boxes and the sub-zones derived from them.
//!
//! Zone placement is purely proportional: a frontal face is assumed and no
//! landmarks are located. The eye band and the nose bridge are the regions
//! recognition models weight most heavily, so those are the two zones the
//! transformer perturbs.
//!
//! ## Coordinate System
//!
//! - Integer pixel coordinates, origin at the top-left corner
//! - A rectangle covers columns `x..x + width` and rows `y..y + height`

use serde::{Deserialize, Serialize};

/// Zones narrower or shorter than this are dropped instead of transformed.
pub const MIN_ZONE_SIZE: u32 = 4;

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge (inclusive).
    pub x: u32,
    /// Top edge (inclusive).
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether `other` lies entirely inside this rectangle.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Whether pixel `(px, py)` lies inside this rectangle.
    pub fn contains_point(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Overlapping region of two rectangles, `None` if they do not overlap.
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());

        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(BoundingBox::new(x0, y0, x1 - x0, y1 - y0))
    }

    /// Intersection over union, 0.0 for disjoint or empty rectangles.
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let Some(overlap) = self.intersection(other) else {
            return 0.0;
        };
        let inter = overlap.area() as f64;
        let union = self.area() as f64 + other.area() as f64 - inter;
        if union <= 0.0 {
            return 0.0;
        }
        (inter / union) as f32
    }

    /// Clip to an image of `width` x `height`; `None` if nothing remains.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<BoundingBox> {
        self.intersection(&BoundingBox::new(0, 0, width, height))
    }

    /// Scale all coordinates by `factor`, rounding to the nearest pixel.
    pub fn scale(&self, factor: f64) -> BoundingBox {
        let x0 = (self.x as f64 * factor).round();
        let y0 = (self.y as f64 * factor).round();
        let x1 = (self.right() as f64 * factor).round();
        let y1 = (self.bottom() as f64 * factor).round();
        BoundingBox::new(
            x0 as u32,
            y0 as u32,
            (x1 - x0).max(0.0) as u32,
            (y1 - y0).max(0.0) as u32,
        )
    }
}

/// The facial region a zone targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    /// Horizontal band across both eyes.
    Eyes,
    /// Narrow band between the eyes and down the upper nose.
    NoseBridge,
}

impl ZoneKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ZoneKind::Eyes => "eyes",
            ZoneKind::NoseBridge => "nose_bridge",
        }
    }

    /// Placement of this zone as fractions of the face box.
    fn proportions(self) -> ZoneProportions {
        match self {
            ZoneKind::Eyes => EYES,
            ZoneKind::NoseBridge => NOSE_BRIDGE,
        }
    }
}

/// A named sub-rectangle of a face, already clamped to the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub kind: ZoneKind,
    pub rect: BoundingBox,
}

/// Offsets and extents relative to the face box (0.0 to 1.0).
#[derive(Debug, Clone, Copy)]
struct ZoneProportions {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

/// Central 80% of the width, rows 20%..38% of the height.
const EYES: ZoneProportions = ZoneProportions {
    left: 0.10,
    top: 0.20,
    width: 0.80,
    height: 0.18,
};

/// Centered 30% of the width, rows 35%..55% of the height.
const NOSE_BRIDGE: ZoneProportions = ZoneProportions {
    left: 0.35,
    top: 0.35,
    width: 0.30,
    height: 0.20,
};

/// Zones estimated for one face. A zone is `None` when it was too small.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaceZones {
    pub eyes: Option<Zone>,
    pub nose_bridge: Option<Zone>,
}

impl FaceZones {
    /// Zones in processing order: eyes first, then nose bridge.
    pub fn iter(&self) -> impl Iterator<Item = Zone> {
        self.eyes.into_iter().chain(self.nose_bridge)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.eyes.is_none() && self.nose_bridge.is_none()
    }
}

/// Derive the eye and nose-bridge zones of a face.
///
/// Each zone is placed with fixed proportions, clipped to the face box and
/// then to the `image_width` x `image_height` image. Zones that end up below
/// [`MIN_ZONE_SIZE`] in either dimension are dropped.
pub fn estimate_zones(face: &BoundingBox, image_width: u32, image_height: u32) -> FaceZones {
    FaceZones {
        eyes: place_zone(ZoneKind::Eyes, face, image_width, image_height),
        nose_bridge: place_zone(ZoneKind::NoseBridge, face, image_width, image_height),
    }
}

fn place_zone(
    kind: ZoneKind,
    face: &BoundingBox,
    image_width: u32,
    image_height: u32,
) -> Option<Zone> {
    let p = kind.proportions();
    let (fw, fh) = (face.width as f64, face.height as f64);

    let raw = BoundingBox::new(
        face.x + (fw * p.left).round() as u32,
        face.y + (fh * p.top).round() as u32,
        (fw * p.width).round() as u32,
        (fh * p.height).round() as u32,
    );

    let rect = raw
        .intersection(face)?
        .clamp_to(image_width, image_height)?;

    if rect.width < MIN_ZONE_SIZE || rect.height < MIN_ZONE_SIZE {
        return None;
    }

    Some(Zone { kind, rect })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_face_zones() {
        let face = BoundingBox::new(800, 400, 300, 300);
        let zones = estimate_zones(&face, 1920, 1080);

        let eyes = zones.eyes.unwrap();
        assert_eq!(eyes.kind, ZoneKind::Eyes);
        assert_eq!(eyes.rect, BoundingBox::new(830, 460, 240, 54));

        let nose = zones.nose_bridge.unwrap();
        assert_eq!(nose.kind, ZoneKind::NoseBridge);
        assert_eq!(nose.rect, BoundingBox::new(905, 505, 90, 60));

        assert_eq!(zones.len(), 2);
    }

    #[test]
    fn test_zones_clamped_at_image_edge() {
        // Face hangs off the right edge of a 1000px wide image
        let face = BoundingBox::new(900, 100, 200, 200);
        let zones = estimate_zones(&face, 1000, 600);

        let eyes = zones.eyes.unwrap();
        assert_eq!(eyes.rect.x, 920);
        assert_eq!(eyes.rect.right(), 1000);

        // Nose bridge starts at 970 and is clipped to 30px wide
        let nose = zones.nose_bridge.unwrap();
        assert_eq!(nose.rect, BoundingBox::new(970, 170, 30, 40));
    }

    #[test]
    fn test_zone_fully_outside_image_is_dropped() {
        let face = BoundingBox::new(900, 100, 200, 200);
        let zones = estimate_zones(&face, 960, 600);

        // Eyes start at 920 and keep 40px, the nose bridge starts past the edge
        assert!(zones.eyes.is_some());
        assert!(zones.nose_bridge.is_none());
        assert_eq!(zones.len(), 1);
    }

    #[test]
    fn test_tiny_face_drops_degenerate_zones() {
        // 20px face: eyes band is 16x4, nose bridge is 6x4
        let zones = estimate_zones(&BoundingBox::new(0, 0, 20, 20), 100, 100);
        assert_eq!(zones.eyes.unwrap().rect, BoundingBox::new(2, 4, 16, 4));
        assert_eq!(zones.nose_bridge.unwrap().rect.width, 6);

        // 10px face: every zone is below the floor
        let zones = estimate_zones(&BoundingBox::new(0, 0, 10, 10), 100, 100);
        assert!(zones.is_empty());
        assert_eq!(zones.iter().count(), 0);
    }

    #[test]
    fn test_intersection_and_iou() {
        let a = BoundingBox::new(0, 0, 10, 10);
        let b = BoundingBox::new(5, 5, 10, 10);

        assert_eq!(a.intersection(&b), Some(BoundingBox::new(5, 5, 5, 5)));
        assert!((a.iou(&b) - 25.0 / 175.0).abs() < 1e-6);
        assert!((a.iou(&a) - 1.0).abs() < f32::EPSILON);

        let far = BoundingBox::new(20, 20, 5, 5);
        assert_eq!(a.intersection(&far), None);
        assert_eq!(a.iou(&far), 0.0);

        // Touching edges do not overlap
        assert_eq!(a.intersection(&BoundingBox::new(10, 0, 5, 5)), None);
    }

    #[test]
    fn test_clamp_and_contains() {
        let image = BoundingBox::new(0, 0, 100, 50);
        let clipped = BoundingBox::new(90, 40, 20, 20).clamp_to(100, 50).unwrap();
        assert_eq!(clipped, BoundingBox::new(90, 40, 10, 10));
        assert!(image.contains(&clipped));
        assert!(clipped.contains_point(99, 49));
        assert!(!clipped.contains_point(100, 49));
        assert_eq!(BoundingBox::new(120, 0, 5, 5).clamp_to(100, 50), None);
    }

    #[test]
    fn test_scale() {
        let b = BoundingBox::new(10, 20, 30, 40).scale(1.5);
        assert_eq!(b, BoundingBox::new(15, 30, 45, 60));
    }

    #[test]
    fn test_zone_kind_names() {
        assert_eq!(ZoneKind::Eyes.as_str(), "eyes");
        assert_eq!(ZoneKind::NoseBridge.as_str(), "nose_bridge");
    }
}
