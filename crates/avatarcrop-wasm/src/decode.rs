//! Image decoding WASM bindings.
//!
//! Exposes the core decode path (format sniffing + EXIF orientation
//! correction) to the file-input boundary. A malformed upload surfaces
//! as a JavaScript error instead of a silently dropped callback.

use crate::types::JsDecodedImage;
use avatarcrop_core::decode;
use wasm_bindgen::prelude::*;

/// Decode an image from bytes (PNG or JPEG).
///
/// EXIF orientation is applied automatically so phone photos come out
/// upright.
///
/// # Arguments
///
/// * `bytes` - The raw file bytes as a `Uint8Array`
///
/// # Errors
///
/// Returns an error if the bytes are not a recognized image format or
/// the file is corrupted/truncated.
///
/// # Example
///
/// ```typescript
/// const bytes = new Uint8Array(await file.arrayBuffer());
/// const image = decode_image(bytes);
/// console.log(`Decoded ${image.width}x${image.height}`);
/// ```
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
