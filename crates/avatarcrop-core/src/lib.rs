//! Avatarcrop Core - Profile-picture crop engine
//!
//! This crate provides the geometry and pixel logic behind a
//! browser-based crop widget: the crop-region constraint clamp, mask
//! derivation from the viewport, the masked export transform, the
//! widget session state machine, and image decode/PNG encode. Platform
//! glue (DOM events, file pickers, download triggering) stays outside;
//! rendering is consumed through the [`export::RenderSurface`] seam.

pub mod decode;
pub mod export;
pub mod geometry;
pub mod mask;
pub mod raster;
pub mod session;

pub use decode::{decode_image, DecodeError, DecodedImage, Orientation};
pub use export::{
    export_masked, ExportError, ExportFormat, ExportRegion, RenderSurface, EXPORT_FILE_NAME,
};
pub use geometry::{CropRegion, DisplayedImage, ExportFrame, Point};
pub use mask::{MaskShape, Viewport};
pub use raster::SoftwareSurface;
pub use session::{LoadTicket, Mode, Session, WidgetState, DIMMED_OPACITY};
