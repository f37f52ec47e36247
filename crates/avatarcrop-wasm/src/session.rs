//! WASM bindings for the widget session.
//!
//! [`CropSession`] wraps the core `Session` one-to-one: the JavaScript
//! side feeds it pointer/resize/file events and reads back geometry,
//! state, and export bytes. Mode is passed as a small integer to keep
//! the constructor signature plain across the boundary.

use avatarcrop_core::session::{LoadTicket, Mode, Session, WidgetState};
use avatarcrop_core::{Viewport, EXPORT_FILE_NAME};
use wasm_bindgen::prelude::*;

use crate::types::JsDecodedImage;

/// Convert a u8 mode value to the core Mode enum.
///
/// Values:
/// - 0 = SingleMask (whole-canvas circular mask)
/// - 1 = CropWindow (movable rectangular crop window)
///
/// Any other value defaults to SingleMask.
fn mode_from_u8(value: u8) -> Mode {
    match value {
        1 => Mode::CropWindow,
        _ => Mode::SingleMask,
    }
}

fn state_to_u8(state: WidgetState) -> u8 {
    match state {
        WidgetState::Empty => 0,
        WidgetState::ImageLoaded => 1,
        WidgetState::Editing => 2,
    }
}

/// Helper struct for serializing render-relevant widget state to JS
/// via serde.
#[derive(serde::Serialize)]
struct WidgetSnapshotJs {
    state: u8,
    can_export: bool,
    crop_window_visible: bool,
    image_opacity: f64,
}

fn snapshot_of(session: &Session) -> WidgetSnapshotJs {
    WidgetSnapshotJs {
        state: state_to_u8(session.state()),
        can_export: session.can_export(),
        crop_window_visible: session.crop_window_visible(),
        image_opacity: session.image_opacity(),
    }
}

/// Handle for one in-flight image load.
///
/// Returned by `begin_load`; pass it back to `finish_load` once the
/// file's bytes are decoded. Tickets from superseded loads are
/// rejected, so a slow decode can never clobber a newer selection.
#[wasm_bindgen]
pub struct JsLoadTicket {
    inner: LoadTicket,
}

#[wasm_bindgen]
impl JsLoadTicket {
    /// Monotonic load generation this ticket belongs to.
    #[wasm_bindgen(getter)]
    pub fn generation(&self) -> u64 {
        self.inner.generation()
    }
}

/// A crop-widget session for JavaScript.
///
/// # Example
///
/// ```typescript
/// const session = new CropSession(1, el.clientWidth, el.clientHeight);
///
/// const ticket = session.begin_load();
/// const image = decode_image(new Uint8Array(await file.arrayBuffer()));
/// if (session.finish_load(ticket, image)) {
///   render();
/// }
///
/// // On drag:
/// session.move_crop(pointer.x, pointer.y);
///
/// // On export click:
/// const png = session.export_png(window.devicePixelRatio);
/// download(png, CropSession.export_file_name());
/// ```
#[wasm_bindgen]
pub struct CropSession {
    inner: Session,
}

#[wasm_bindgen]
impl CropSession {
    /// Create a session.
    ///
    /// # Arguments
    /// * `mode` - 0 = single circular mask, 1 = movable crop window
    /// * `width`/`height` - hosting viewport dimensions in CSS pixels
    #[wasm_bindgen(constructor)]
    pub fn new(mode: u8, width: f64, height: f64) -> CropSession {
        CropSession {
            inner: Session::new(mode_from_u8(mode), Viewport::new(width, height)),
        }
    }

    /// The viewport reported new dimensions (layout/resize listener).
    pub fn resize(&mut self, width: f64, height: f64) {
        self.inner.resize(Viewport::new(width, height));
    }

    /// Start a new image load, superseding any in-flight one.
    pub fn begin_load(&mut self) -> JsLoadTicket {
        JsLoadTicket {
            inner: self.inner.begin_load(),
        }
    }

    /// Install a decoded image for the given ticket.
    ///
    /// Returns `false` when the ticket was superseded by a newer load;
    /// the stale bitmap is dropped.
    pub fn finish_load(&mut self, ticket: &JsLoadTicket, image: &JsDecodedImage) -> bool {
        let accepted = self.inner.finish_load(ticket.inner, image.to_decoded());
        if !accepted {
            web_sys::console::warn_1(&JsValue::from_str(
                "avatarcrop: discarding stale image load result",
            ));
        }
        accepted
    }

    /// Move the crop region's center; the constraint clamp runs
    /// immediately.
    pub fn move_crop(&mut self, left: f64, top: f64) {
        self.inner.move_crop(left, top);
    }

    /// Rescale the crop region; scales above 1 are capped.
    pub fn scale_crop(&mut self, scale_x: f64, scale_y: f64) {
        self.inner.scale_crop(scale_x, scale_y);
    }

    /// Select the crop window (crop-window mode only).
    pub fn select_crop(&mut self) {
        self.inner.select_crop();
    }

    /// Deselect the crop window.
    pub fn deselect_crop(&mut self) {
        self.inner.deselect_crop();
    }

    /// Widget state: 0 = empty, 1 = image loaded, 2 = editing.
    pub fn state(&self) -> u8 {
        state_to_u8(self.inner.state())
    }

    /// Whether the export button should be enabled.
    pub fn can_export(&self) -> bool {
        self.inner.can_export()
    }

    /// Whether the crop window should be drawn.
    pub fn crop_window_visible(&self) -> bool {
        self.inner.crop_window_visible()
    }

    /// Opacity the image should render at (crop preview dimming).
    pub fn image_opacity(&self) -> f64 {
        self.inner.image_opacity()
    }

    /// One-call view of the render-relevant widget state. Returns
    /// `{ state, can_export, crop_window_visible, image_opacity }`.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&snapshot_of(&self.inner))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Crop region center and effective size, for drawing the window.
    /// Returns `{ left, top, width, height }` (top-left anchored).
    pub fn crop_frame(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.crop().export_frame())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// The region an export would rasterize at the given device pixel
    /// ratio, or `null` while nothing is loaded. Returns
    /// `{ format, multiplier, left, top, width, height }`.
    pub fn export_region(&self, device_pixel_ratio: f64) -> Result<JsValue, JsValue> {
        match self.inner.export_region(device_pixel_ratio) {
            Some(region) => serde_wasm_bindgen::to_value(&region)
                .map_err(|e| JsValue::from_str(&e.to_string())),
            None => Ok(JsValue::NULL),
        }
    }

    /// Export the masked region as PNG bytes at the given device pixel
    /// ratio.
    ///
    /// # Errors
    ///
    /// Returns an error if no image is loaded or the device pixel ratio
    /// is not a positive finite number.
    pub fn export_png(&self, device_pixel_ratio: f64) -> Result<js_sys::Uint8Array, JsValue> {
        self.inner
            .export_png(device_pixel_ratio)
            .map(|bytes| js_sys::Uint8Array::from(bytes.as_slice()))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// File name the exported PNG should be downloaded under.
    pub fn export_file_name() -> String {
        EXPORT_FILE_NAME.to_string()
    }
}
