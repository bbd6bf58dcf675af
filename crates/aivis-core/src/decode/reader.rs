//! Photo decoding with EXIF orientation handling.
//!
//! Accepts any container the `image` crate was built with (JPEG and PNG in
//! this workspace). Phone cameras store portraits sideways and record the
//! rotation in EXIF, so the orientation is applied before any face geometry
//! is computed.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;
use image::ImageReader;
use tracing::debug;

use super::{DecodeError, DecodedImage, Orientation};

/// Decode photo bytes into an RGB buffer in display orientation.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the container format cannot be
/// recognized, `DecodeError::CorruptedFile` if decoding fails part way, and
/// `DecodeError::ZeroDimensions` for an image without pixels.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let orientation = extract_orientation(bytes);

    let img = decode_raw(bytes)?;
    let oriented_img = apply_orientation(img, orientation);
    let rgb_img = oriented_img.into_rgb8();

    if rgb_img.width() == 0 || rgb_img.height() == 0 {
        return Err(DecodeError::ZeroDimensions);
    }

    debug!(
        width = rgb_img.width(),
        height = rgb_img.height(),
        ?orientation,
        "decoded image"
    );
    Ok(DecodedImage::from_rgb_image(rgb_img))
}

fn decode_raw(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

/// Extract EXIF orientation from the container.
///
/// Returns `Orientation::Normal` when there is no EXIF block or the tag is
/// missing.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

/// Insert an APP1 Exif segment carrying `orientation` right after SOI.
#[cfg(test)]
pub(crate) fn with_exif_orientation(jpeg: &[u8], orientation: u16) -> Vec<u8> {
    let mut tiff = Vec::with_capacity(26);
    tiff.extend_from_slice(b"MM\x00\x2A");
    tiff.extend_from_slice(&8u32.to_be_bytes());
    // One IFD entry: Orientation, SHORT, count 1
    tiff.extend_from_slice(&1u16.to_be_bytes());
    tiff.extend_from_slice(&0x0112u16.to_be_bytes());
    tiff.extend_from_slice(&3u16.to_be_bytes());
    tiff.extend_from_slice(&1u32.to_be_bytes());
    tiff.extend_from_slice(&orientation.to_be_bytes());
    tiff.extend_from_slice(&[0, 0]);
    tiff.extend_from_slice(&0u32.to_be_bytes());

    let segment_len = (2 + 6 + tiff.len()) as u16;
    let mut out = Vec::with_capacity(jpeg.len() + segment_len as usize + 2);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\x00\x00");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&jpeg[2..]);
    out
}
