//! Avatarcrop WASM - WebAssembly bindings for the crop widget core
//!
//! This crate exposes the avatarcrop-core session, constraint, and
//! export logic to JavaScript/TypeScript. The browser side owns the
//! canvas, pointer events, and the download trigger; everything
//! geometric goes through [`CropSession`].
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Image decoding bindings (PNG/JPEG with EXIF orientation)
//! - `session` - The `CropSession` class: load protocol, crop
//!   mutation, state machine, masked PNG export
//!
//! # Usage
//!
//! ```typescript
//! import init, { CropSession, decode_image } from '@avatarcrop/wasm';
//!
//! await init();
//!
//! const session = new CropSession(0, canvas.width, canvas.height);
//! const ticket = session.begin_load();
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! session.finish_load(ticket, decode_image(bytes));
//!
//! const png = session.export_png(window.devicePixelRatio);
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod session;
mod types;

// Re-export public types
pub use decode::decode_image;
pub use session::{CropSession, JsLoadTicket};
pub use types::JsDecodedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
