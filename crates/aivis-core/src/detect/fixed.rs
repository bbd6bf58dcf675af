use crate::decode::DecodedImage;
use crate::geometry::BoundingBox;

use super::FaceDetector;

/// Detector that reports the same boxes for every image.
///
/// Useful for replaying detections made elsewhere, and as a deterministic
/// stand-in for a model in tests.
#[derive(Debug, Clone, Default)]
pub struct FixedDetector {
    faces: Vec<BoundingBox>,
}

impl FixedDetector {
    pub fn new(faces: Vec<BoundingBox>) -> Self {
        Self { faces }
    }

    /// A detector that never finds a face.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl FaceDetector for FixedDetector {
    fn detect(&self, _image: &DecodedImage) -> Vec<BoundingBox> {
        self.faces.clone()
    }
}
