//! Masked export transform.
//!
//! Computes the canvas region and resolution multiplier for a masked
//! PNG export, then drives the rendering collaborator: the circular
//! variant hides the base layer while rasterizing so the output holds
//! only the image pixels under the mask, and restores it afterwards.
//! Pixel compositing and PNG encoding happen behind the
//! [`RenderSurface`] trait; a software implementation lives in the
//! `raster` module.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::DecodedImage;
use crate::geometry::DisplayedImage;
use crate::mask::MaskShape;

/// File name the exported PNG is delivered under.
pub const EXPORT_FILE_NAME: &str = "cropped-image.png";

/// Errors that can occur while exporting the masked region.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The export region has a zero or negative dimension.
    #[error("Degenerate export region: {width} x {height}")]
    DegenerateRegion { width: f64, height: f64 },

    /// The device pixel ratio is not a positive finite number.
    #[error("Invalid device pixel ratio: {0}")]
    InvalidMultiplier(f64),

    /// No image has been loaded, so there is nothing to export.
    #[error("No image loaded")]
    NothingLoaded,

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Output encoding for exports. PNG is the only supported format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExportFormat {
    #[default]
    Png,
}

/// The region of the canvas to rasterize and the resolution multiplier.
///
/// The output raster measures `width * multiplier` by
/// `height * multiplier` device pixels; `multiplier` is the device
/// pixel ratio so exports stay crisp on high-DPI displays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportRegion {
    pub format: ExportFormat,
    pub multiplier: f64,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl MaskShape {
    /// Compute the export region for this mask at the given device
    /// pixel ratio.
    ///
    /// For a circular mask the region is the circle's square bounding
    /// box; for a crop window it is the window's effective bounds.
    pub fn export_region(&self, device_pixel_ratio: f64) -> ExportRegion {
        match *self {
            MaskShape::Circle { center, radius } => ExportRegion {
                format: ExportFormat::Png,
                multiplier: device_pixel_ratio,
                left: center.left - radius,
                top: center.top - radius,
                width: radius * 2.0,
                height: radius * 2.0,
            },
            MaskShape::Window(frame) => ExportRegion {
                format: ExportFormat::Png,
                multiplier: device_pixel_ratio,
                left: frame.left,
                top: frame.top,
                width: frame.width,
                height: frame.height,
            },
        }
    }
}

/// The external 2D-rendering collaborator consumed by the export path.
///
/// Implementations composite pixels; the export transform only decides
/// *what* to rasterize. The widget's preview surface and the software
/// surface used for export and tests both implement this.
pub trait RenderSurface {
    /// Place a bitmap on the surface at the given center and scale,
    /// replacing any previously drawn bitmap.
    fn draw_image(&mut self, image: &DecodedImage, placement: &DisplayedImage);

    /// Set or clear the clip mask applied to subsequent rasterization.
    fn set_clip(&mut self, mask: Option<MaskShape>);

    /// Show or hide the base (background) layer beneath the mask.
    fn set_base_layer_visible(&mut self, visible: bool);

    /// Rasterize the given region to PNG bytes at
    /// `multiplier x` resolution.
    fn rasterize_png(&mut self, region: &ExportRegion) -> Result<Vec<u8>, ExportError>;
}

/// Export the masked region of a surface as PNG bytes.
///
/// Validates the region, then rasterizes. For circular masks the base
/// layer is hidden for the duration of the rasterization and restored
/// afterwards, including on the error path, so the exported pixels
/// contain only the image under the mask and not the mask fill.
pub fn export_masked<S: RenderSurface>(
    surface: &mut S,
    mask: &MaskShape,
    device_pixel_ratio: f64,
) -> Result<Vec<u8>, ExportError> {
    if !device_pixel_ratio.is_finite() || device_pixel_ratio <= 0.0 {
        return Err(ExportError::InvalidMultiplier(device_pixel_ratio));
    }

    let region = mask.export_region(device_pixel_ratio);
    if region.width <= 0.0 || region.height <= 0.0 {
        return Err(ExportError::DegenerateRegion {
            width: region.width,
            height: region.height,
        });
    }

    surface.set_clip(Some(*mask));
    let hide_base = matches!(mask, MaskShape::Circle { .. });
    if hide_base {
        surface.set_base_layer_visible(false);
    }
    let result = surface.rasterize_png(&region);
    if hide_base {
        surface.set_base_layer_visible(true);
    }
    result
}
