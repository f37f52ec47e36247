//! Widget session state: mode, state machine, and the image-load
//! protocol.
//!
//! All mutable widget state lives in one struct owned by the
//! controller; the constraint and export functions receive it
//! explicitly instead of reaching into ambient references. Image loads
//! are ticketed so a decode that finishes after a newer file selection
//! is discarded instead of clobbering it.

use serde::{Deserialize, Serialize};

use crate::decode::DecodedImage;
use crate::export::{export_masked, ExportError, ExportRegion, RenderSurface};
use crate::geometry::{CropRegion, DisplayedImage};
use crate::mask::{MaskShape, Viewport};
use crate::raster::SoftwareSurface;

/// Image opacity while the crop window is deselected, previewing the
/// final crop against the dimmed surroundings.
pub const DIMMED_OPACITY: f64 = 0.5;

/// Which product variant the widget runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Whole-canvas circular mask; the user moves the image under it.
    SingleMask,
    /// Movable rectangular crop window over a fixed image.
    CropWindow,
}

/// Widget lifecycle states.
///
/// `Editing` is only reachable in [`Mode::CropWindow`], while the crop
/// window is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidgetState {
    Empty,
    ImageLoaded,
    Editing,
}

/// Handle for one in-flight image load.
///
/// Issued by [`Session::begin_load`]; a ticket is superseded as soon as
/// a newer one is issued, and [`Session::finish_load`] rejects
/// superseded tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// All state for one widget instance.
#[derive(Debug, Clone)]
pub struct Session {
    mode: Mode,
    viewport: Viewport,
    state: WidgetState,
    image: Option<DecodedImage>,
    placement: Option<DisplayedImage>,
    crop: CropRegion,
    latest_ticket: u64,
}

impl Session {
    /// Create an empty session.
    ///
    /// The crop region is created once here and persists for the whole
    /// session: its template is the mask's bounding square, centered on
    /// the mask. Interaction only repositions and shrinks it.
    pub fn new(mode: Mode, viewport: Viewport) -> Self {
        let diameter = viewport.mask_diameter();
        let crop = CropRegion::new(viewport.mask_center(), diameter, diameter);
        Self {
            mode,
            viewport,
            state: WidgetState::Empty,
            image: None,
            placement: None,
            crop,
            latest_ticket: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn crop(&self) -> &CropRegion {
        &self.crop
    }

    /// The loaded bitmap's placement, if an image is loaded.
    pub fn placement(&self) -> Option<&DisplayedImage> {
        self.placement.as_ref()
    }

    /// The loaded bitmap, if any.
    pub fn image(&self) -> Option<&DecodedImage> {
        self.image.as_ref()
    }

    /// The viewport reported new dimensions; mask center and radius
    /// follow from them alone.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.reclamp_crop();
    }

    /// Start a new image load, superseding any in-flight one.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_ticket += 1;
        LoadTicket {
            generation: self.latest_ticket,
        }
    }

    /// Whether a ticket is still the newest one issued.
    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.latest_ticket
    }

    /// Install a decoded image for the given ticket.
    ///
    /// Returns `false` (and drops the bitmap) when a newer load was
    /// started since the ticket was issued. On success the previous
    /// bitmap is released, the image is placed per the mode's policy,
    /// and the state moves to [`WidgetState::ImageLoaded`].
    pub fn finish_load(&mut self, ticket: LoadTicket, image: DecodedImage) -> bool {
        if !self.is_current(&ticket) {
            return false;
        }

        let placement = self.place_image(&image);
        self.image = Some(image);
        self.placement = Some(placement);
        self.state = WidgetState::ImageLoaded;
        self.reclamp_crop();
        true
    }

    /// Placement policy for a freshly loaded bitmap, centered on the
    /// mask center.
    ///
    /// SingleMask scales the smaller image edge to the mask diameter so
    /// the circle is always fully covered; CropWindow scales the image
    /// down to fit the viewport (never up).
    fn place_image(&self, image: &DecodedImage) -> DisplayedImage {
        let width = f64::from(image.width.max(1));
        let height = f64::from(image.height.max(1));
        let scale = match self.mode {
            Mode::SingleMask => self.viewport.mask_diameter() / width.min(height),
            Mode::CropWindow => (self.viewport.width / width)
                .min(self.viewport.height / height)
                .min(1.0),
        };
        let scale = scale.max(f64::MIN_POSITIVE);
        DisplayedImage::new(self.viewport.mask_center(), scale, width, height)
    }

    /// Select the crop window, entering editing.
    ///
    /// No-op outside CropWindow mode or before an image is loaded.
    pub fn select_crop(&mut self) {
        if self.mode == Mode::CropWindow && self.state == WidgetState::ImageLoaded {
            self.state = WidgetState::Editing;
        }
    }

    /// Deselect the crop window, back to the loaded preview.
    pub fn deselect_crop(&mut self) {
        if self.state == WidgetState::Editing {
            self.state = WidgetState::ImageLoaded;
        }
    }

    /// Opacity the image should render at, previewing the final crop.
    pub fn image_opacity(&self) -> f64 {
        match (self.mode, self.state) {
            (Mode::CropWindow, WidgetState::ImageLoaded) => DIMMED_OPACITY,
            _ => 1.0,
        }
    }

    /// Whether the crop window should be drawn.
    pub fn crop_window_visible(&self) -> bool {
        self.mode == Mode::CropWindow && self.state != WidgetState::Empty
    }

    /// Move the crop region's center. The constraint clamp runs
    /// immediately, before the next render.
    pub fn move_crop(&mut self, left: f64, top: f64) {
        self.crop.center.left = left;
        self.crop.center.top = top;
        self.reclamp_crop();
    }

    /// Rescale the crop region. Scales above 1 are capped by the clamp.
    pub fn scale_crop(&mut self, scale_x: f64, scale_y: f64) {
        self.crop.scale_x = scale_x;
        self.crop.scale_y = scale_y;
        self.reclamp_crop();
    }

    fn reclamp_crop(&mut self) {
        if let Some(placement) = &self.placement {
            self.crop = self.crop.clamped_to(placement);
        }
    }

    /// Export is available once an image is loaded.
    pub fn can_export(&self) -> bool {
        self.state != WidgetState::Empty
    }

    /// The mask for the current mode.
    pub fn mask(&self) -> MaskShape {
        match self.mode {
            Mode::SingleMask => self.viewport.circle_mask(),
            Mode::CropWindow => MaskShape::Window(self.crop.export_frame()),
        }
    }

    /// The region and multiplier an export would rasterize, or `None`
    /// while nothing is loaded.
    pub fn export_region(&self, device_pixel_ratio: f64) -> Option<ExportRegion> {
        if !self.can_export() {
            return None;
        }
        Some(self.mask().export_region(device_pixel_ratio))
    }

    /// Export the masked region as PNG bytes via the given surface.
    ///
    /// The surface receives the loaded bitmap before rasterization.
    pub fn export_with<S: RenderSurface>(
        &self,
        surface: &mut S,
        device_pixel_ratio: f64,
    ) -> Result<Vec<u8>, ExportError> {
        let (image, placement) = match (&self.image, &self.placement) {
            (Some(image), Some(placement)) if self.can_export() => (image, placement),
            _ => return Err(ExportError::NothingLoaded),
        };
        surface.draw_image(image, placement);
        export_masked(surface, &self.mask(), device_pixel_ratio)
    }

    /// Export through an in-memory software surface.
    pub fn export_png(&self, device_pixel_ratio: f64) -> Result<Vec<u8>, ExportError> {
        let mut surface = SoftwareSurface::new(self.viewport);
        self.export_with(&mut surface, device_pixel_ratio)
    }
}
