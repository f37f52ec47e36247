//! Bitmap decoding for the file-input boundary.
//!
//! The widget receives raw file bytes from the platform file picker and
//! hands the core a decoded RGB bitmap. Format is sniffed from the
//! bytes (PNG and JPEG in practice for `image/*` uploads) and EXIF
//! orientation is corrected on decode so phone photos come out upright.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;
use image::ImageReader;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during image decoding.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// I/O error while reading the byte stream.
    #[error("I/O error: {0}")]
    IoError(String),
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            1 => Orientation::Normal,
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// A decoded image with RGB pixel data.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length should be width * height * 3.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Create a new DecodedImage with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width * height * 3) as usize,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a DecodedImage from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// The RGB triple at pixel coordinates, or None when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        Some([self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]])
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

/// Decode an image from bytes, applying EXIF orientation correction.
///
/// Sniffs the format from the byte stream (PNG, JPEG) rather than
/// trusting a file extension.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are not a
/// recognized image format and `DecodeError::CorruptedFile` if decoding
/// fails partway through.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    // Extract EXIF orientation before decoding; absent EXIF means Normal.
    let orientation = extract_orientation(bytes);

    let cursor = Cursor::new(bytes);
    let reader = ImageReader::new(cursor)
        .with_guessed_format()
        .map_err(|e| DecodeError::IoError(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let oriented_img = apply_orientation(img, orientation);
    let rgb_img = oriented_img.into_rgb8();
    Ok(DecodedImage::from_rgb_image(rgb_img))
}

/// Extract EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined (PNG uploads typically carry none).
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let exif_reader = Reader::new();
    let mut cursor = Cursor::new(bytes);

    match exif_reader.read_from_container(&mut cursor) {
        Ok(exif) => {
            if let Some(field) = exif.get_field(Tag::Orientation, In::PRIMARY) {
                if let Some(value) = field.value.get_uint(0) {
                    return Orientation::from(value);
                }
            }
            Orientation::Normal
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::png::PngEncoder;
    use image::{ExtendedColorType, ImageEncoder};

    /// Encode a solid-color PNG for decode tests.
    fn png_bytes(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        let pixels: Vec<u8> = rgb
            .iter()
            .copied()
            .cycle()
            .take((width * height * 3) as usize)
            .collect();
        let mut buffer = Cursor::new(Vec::new());
        PngEncoder::new(&mut buffer)
            .write_image(&pixels, width, height, ExtendedColorType::Rgb8)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let bytes = png_bytes(8, 6, [10, 20, 30]);
        let img = decode_image(&bytes).unwrap();

        assert_eq!(img.width, 8);
        assert_eq!(img.height, 6);
        assert_eq!(img.pixels.len(), 8 * 6 * 3);
        assert_eq!(img.pixel(0, 0), Some([10, 20, 30]));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = decode_image(&[0u8; 64]);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_truncated_png_fails() {
        let mut bytes = png_bytes(8, 8, [1, 2, 3]);
        bytes.truncate(bytes.len() / 2);

        let result = decode_image(&bytes);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_decode_empty_input_fails() {
        assert!(decode_image(&[]).is_err());
    }

    #[test]
    fn test_orientation_from_u32() {
        assert_eq!(Orientation::from(1), Orientation::Normal);
        assert_eq!(Orientation::from(6), Orientation::Rotate90CW);
        assert_eq!(Orientation::from(99), Orientation::Normal); // Invalid defaults to Normal
    }

    #[test]
    fn test_pixel_access() {
        let img = DecodedImage::new(2, 2, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
        assert_eq!(img.pixel(1, 0), Some([3, 4, 5]));
        assert_eq!(img.pixel(0, 1), Some([6, 7, 8]));
        assert_eq!(img.pixel(2, 0), None);
        assert_eq!(img.pixel(0, 2), None);
    }

    #[test]
    fn test_is_empty() {
        let img = DecodedImage::new(2, 2, vec![0u8; 12]);
        assert!(!img.is_empty());

        let empty = DecodedImage {
            width: 0,
            height: 0,
            pixels: Vec::new(),
        };
        assert!(empty.is_empty());
    }
}
