//! Crop geometry: placed images, crop regions, and the constraint clamp.
//!
//! All objects live in canvas coordinates (origin top-left, y down) and
//! are positioned by their *center* point, matching the canvas library
//! the widget renders with. Sizes are in CSS pixels; device-pixel
//! scaling only enters at export time (see the `export` module).

use serde::{Deserialize, Serialize};

/// A point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate (x).
    pub left: f64,
    /// Vertical coordinate (y).
    pub top: f64,
}

impl Point {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

/// A decoded bitmap placed on the canvas at a uniform scale.
///
/// `width`/`height` are the bitmap's intrinsic pixel dimensions; the
/// on-canvas footprint is `scale * width` by `scale * height`, centered
/// at `center`. Invariant: `scale > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayedImage {
    /// Center of the image on the canvas.
    pub center: Point,
    /// Uniform display scale factor (> 0).
    pub scale: f64,
    /// Intrinsic bitmap width in pixels.
    pub width: f64,
    /// Intrinsic bitmap height in pixels.
    pub height: f64,
}

impl DisplayedImage {
    pub fn new(center: Point, scale: f64, width: f64, height: f64) -> Self {
        debug_assert!(scale > 0.0, "image scale must be positive");
        Self {
            center,
            scale,
            width,
            height,
        }
    }

    /// On-canvas width after scaling.
    pub fn effective_width(&self) -> f64 {
        self.scale * self.width
    }

    /// On-canvas height after scaling.
    pub fn effective_height(&self) -> f64 {
        self.scale * self.height
    }
}

/// A movable, scalable crop rectangle.
///
/// Purely geometric; owns no pixel data. `width`/`height` are the crop
/// template's declared dimensions, and `scale_x`/`scale_y` shrink the
/// effective footprint within (0, 1] — the region can never be enlarged
/// past its template size (the clamp caps scale at 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRegion {
    /// Center of the crop region on the canvas.
    pub center: Point,
    /// Declared template width.
    pub width: f64,
    /// Declared template height.
    pub height: f64,
    /// Horizontal scale factor, clamped to (0, 1].
    pub scale_x: f64,
    /// Vertical scale factor, clamped to (0, 1].
    pub scale_y: f64,
}

impl CropRegion {
    /// Create a crop region at full template scale.
    pub fn new(center: Point, width: f64, height: f64) -> Self {
        Self {
            center,
            width,
            height,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Effective (scaled) width.
    pub fn effective_width(&self) -> f64 {
        self.width * self.scale_x
    }

    /// Effective (scaled) height.
    pub fn effective_height(&self) -> f64 {
        self.height * self.scale_y
    }

    /// The region's effective bounds as a top-left anchored rectangle.
    ///
    /// Derived on demand for export; never stored.
    pub fn export_frame(&self) -> ExportFrame {
        let width = self.effective_width();
        let height = self.effective_height();
        ExportFrame {
            left: self.center.left - width / 2.0,
            top: self.center.top - height / 2.0,
            width,
            height,
        }
    }

    /// Constrain this crop region to the displayed image's footprint.
    ///
    /// Scale is capped at 1.0 first, then the center is clamped per axis
    /// so the scaled crop rectangle stays inside the scaled image. Both
    /// rectangles are centered-origin, so the admissible center offset
    /// from the image's center is half the slack between the two extents:
    ///
    /// ```text
    /// min = image.center - (image_extent - crop_extent) / 2
    /// max = image.center + (image_extent - crop_extent) / 2
    /// ```
    ///
    /// Axes are corrected independently; there is no diagonal clamping.
    /// When the crop's effective extent exceeds the image's along an
    /// axis (inverted bounds), the crop is centered on the image along
    /// that axis — a deterministic, finite result rather than the
    /// order-dependent pinning of naive min/max application.
    ///
    /// Idempotent: `c.clamped_to(img).clamped_to(img) == c.clamped_to(img)`.
    /// Called after every position/scale mutation, before the next render.
    #[must_use]
    pub fn clamped_to(&self, image: &DisplayedImage) -> CropRegion {
        let mut crop = *self;
        crop.scale_x = crop.scale_x.min(1.0);
        crop.scale_y = crop.scale_y.min(1.0);

        crop.center.left = clamp_axis(
            crop.center.left,
            image.center.left,
            image.effective_width(),
            crop.effective_width(),
        );
        crop.center.top = clamp_axis(
            crop.center.top,
            image.center.top,
            image.effective_height(),
            crop.effective_height(),
        );
        crop
    }
}

/// Clamp a center coordinate so a crop extent stays inside an image
/// extent, both centered at their respective origins.
fn clamp_axis(pos: f64, image_center: f64, image_extent: f64, crop_extent: f64) -> f64 {
    let half_slack = (image_extent - crop_extent) / 2.0;
    if half_slack < 0.0 {
        // Crop larger than image on this axis: center it.
        return image_center;
    }
    pos.clamp(image_center - half_slack, image_center + half_slack)
}

/// A top-left anchored rectangle used at export time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportFrame {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}


// ============================================================================
// Property-Based Tests
// ============================================================================
