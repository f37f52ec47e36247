//! WASM-compatible wrapper types for image data.

use avatarcrop_core::DecodedImage;
use wasm_bindgen::prelude::*;

/// A decoded image wrapper for JavaScript.
///
/// Wraps the core `DecodedImage` and exposes dimensions and pixel data
/// to JavaScript. The pixel buffer lives in WASM memory; `pixels()`
/// copies it out as a `Uint8Array`.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Create a new JsDecodedImage from dimensions and pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        JsDecodedImage {
            width,
            height,
            pixels,
        }
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 3 for RGB)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// Optional - wasm-bindgen's finalizer handles cleanup automatically.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsDecodedImage {
    /// Create a JsDecodedImage from a core DecodedImage.
    pub(crate) fn from_decoded(img: DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Convert back to a core DecodedImage.
    ///
    /// Note: This clones the pixel data.
    pub(crate) fn to_decoded(&self) -> DecodedImage {
        DecodedImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_decoded_image_creation() {
        let img = JsDecodedImage::new(100, 50, vec![0u8; 100 * 50 * 3]);
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 15000);
    }

    #[test]
    fn test_js_decoded_image_pixels() {
        let pixels = vec![255u8, 128, 64, 32, 16, 8]; // 2 RGB pixels
        let img = JsDecodedImage::new(2, 1, pixels.clone());
        assert_eq!(img.pixels(), pixels);
    }

    #[test]
    fn test_round_trip() {
        let decoded = DecodedImage::new(20, 10, vec![7u8; 20 * 10 * 3]);
        let js_img = JsDecodedImage::from_decoded(decoded);
        let back = js_img.to_decoded();
        assert_eq!(back.width, 20);
        assert_eq!(back.height, 10);
        assert_eq!(back.pixels.len(), 600);
    }
}
