//! Software implementation of the rendering collaborator.
//!
//! Composites the placed bitmap, circle/window clip, and base layer in
//! memory and encodes the requested region as an RGBA PNG. This backs
//! the wasm export path (the browser preview canvas never has to hand
//! pixels back) and gives the export pipeline something to test
//! against.
//!
//! Sampling is nearest-neighbor: each output device pixel is mapped
//! through the region offset and multiplier back to one source pixel.

use std::io::Cursor;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::decode::DecodedImage;
use crate::export::{ExportError, ExportRegion, RenderSurface};
use crate::geometry::DisplayedImage;
use crate::mask::{MaskShape, Viewport};

/// Base-layer fill under the circular mask (dark slate, matching the
/// widget's mask color).
pub const BASE_LAYER_FILL: [u8; 3] = [0x31, 0x34, 0x3a];

/// In-memory [`RenderSurface`] for export and tests.
#[derive(Debug, Clone)]
pub struct SoftwareSurface {
    background: [u8; 3],
    base_visible: bool,
    clip: Option<MaskShape>,
    content: Option<(DecodedImage, DisplayedImage)>,
}

impl SoftwareSurface {
    /// Create an empty surface sized to the viewport.
    ///
    /// The viewport itself does not bound rasterization — the export
    /// region does — but keeping it makes the surface a drop-in for a
    /// real canvas of the same dimensions.
    pub fn new(_viewport: Viewport) -> Self {
        Self {
            background: BASE_LAYER_FILL,
            base_visible: true,
            clip: None,
            content: None,
        }
    }

    /// Override the base-layer fill color.
    pub fn with_background(mut self, rgb: [u8; 3]) -> Self {
        self.background = rgb;
        self
    }

    /// Whether the base layer is currently visible.
    pub fn base_layer_visible(&self) -> bool {
        self.base_visible
    }

    /// Sample the composited canvas at a point: the placed bitmap where
    /// it covers the point, the base layer where visible, transparent
    /// otherwise. Clip is applied first.
    fn sample(&self, left: f64, top: f64) -> [u8; 4] {
        const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

        if let Some(clip) = &self.clip {
            if !clip.contains(left, top) {
                return TRANSPARENT;
            }
        }

        if let Some((image, placement)) = &self.content {
            let sx = (left - placement.center.left) / placement.scale + placement.width / 2.0;
            let sy = (top - placement.center.top) / placement.scale + placement.height / 2.0;
            if sx >= 0.0 && sy >= 0.0 {
                if let Some([r, g, b]) = image.pixel(sx as u32, sy as u32) {
                    return [r, g, b, 255];
                }
            }
        }

        if self.base_visible {
            let [r, g, b] = self.background;
            return [r, g, b, 255];
        }
        TRANSPARENT
    }
}

impl RenderSurface for SoftwareSurface {
    fn draw_image(&mut self, image: &DecodedImage, placement: &DisplayedImage) {
        self.content = Some((image.clone(), *placement));
    }

    fn set_clip(&mut self, mask: Option<MaskShape>) {
        self.clip = mask;
    }

    fn set_base_layer_visible(&mut self, visible: bool) {
        self.base_visible = visible;
    }

    fn rasterize_png(&mut self, region: &ExportRegion) -> Result<Vec<u8>, ExportError> {
        if !region.multiplier.is_finite() || region.multiplier <= 0.0 {
            return Err(ExportError::InvalidMultiplier(region.multiplier));
        }
        if region.width <= 0.0 || region.height <= 0.0 {
            return Err(ExportError::DegenerateRegion {
                width: region.width,
                height: region.height,
            });
        }

        let out_width = ((region.width * region.multiplier).round() as u32).max(1);
        let out_height = ((region.height * region.multiplier).round() as u32).max(1);

        let mut pixels = Vec::with_capacity(out_width as usize * out_height as usize * 4);
        for y in 0..out_height {
            // Sample at device-pixel centers mapped back to canvas space.
            let canvas_top = region.top + (y as f64 + 0.5) / region.multiplier;
            for x in 0..out_width {
                let canvas_left = region.left + (x as f64 + 0.5) / region.multiplier;
                pixels.extend_from_slice(&self.sample(canvas_left, canvas_top));
            }
        }

        let mut buffer = Cursor::new(Vec::new());
        PngEncoder::new(&mut buffer)
            .write_image(&pixels, out_width, out_height, ExtendedColorType::Rgba8)
            .map_err(|e| ExportError::EncodingFailed(e.to_string()))?;
        Ok(buffer.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{export_masked, ExportFormat};
    use crate::geometry::{ExportFrame, Point};

    const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47];

    /// Decode PNG bytes back to RGBA for pixel assertions.
    fn decode_rgba(bytes: &[u8]) -> (u32, u32, Vec<u8>) {
        let img = image::load_from_memory(bytes).unwrap().into_rgba8();
        let (w, h) = img.dimensions();
        (w, h, img.into_raw())
    }

    /// A solid-color test bitmap.
    fn solid_image(width: u32, height: u32, rgb: [u8; 3]) -> DecodedImage {
        let pixels = rgb
            .iter()
            .copied()
            .cycle()
            .take((width * height * 3) as usize)
            .collect();
        DecodedImage::new(width, height, pixels)
    }

    fn rgba_at(pixels: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * width + x) * 4) as usize;
        [
            pixels[idx],
            pixels[idx + 1],
            pixels[idx + 2],
            pixels[idx + 3],
        ]
    }

    #[test]
    fn test_rasterize_produces_png_at_device_resolution() {
        let viewport = Viewport::new(600.0, 400.0);
        let mut surface = SoftwareSurface::new(viewport);
        let region = ExportRegion {
            format: ExportFormat::Png,
            multiplier: 2.0,
            left: 0.0,
            top: 0.0,
            width: 50.0,
            height: 30.0,
        };

        let bytes = surface.rasterize_png(&region).unwrap();
        assert_eq!(&bytes[0..4], PNG_MAGIC);

        let (w, h, _) = decode_rgba(&bytes);
        assert_eq!(w, 100);
        assert_eq!(h, 60);
    }

    #[test]
    fn test_circle_clip_zeroes_alpha_outside() {
        let viewport = Viewport::new(400.0, 400.0);
        let mut surface = SoftwareSurface::new(viewport);
        let mask = viewport.circle_mask(); // radius 100 at (200, 200)

        let image = solid_image(100, 100, [200, 50, 50]);
        let placement = DisplayedImage::new(Point::new(200.0, 200.0), 4.0, 100.0, 100.0);
        surface.draw_image(&image, &placement);

        let bytes = export_masked(&mut surface, &mask, 1.0).unwrap();
        let (w, h, pixels) = decode_rgba(&bytes);
        assert_eq!(w, 200);
        assert_eq!(h, 200);

        // Center of the export is inside the circle and covered by the image.
        assert_eq!(rgba_at(&pixels, w, 100, 100), [200, 50, 50, 255]);
        // Corners of the bounding box are outside the circle.
        assert_eq!(rgba_at(&pixels, w, 0, 0)[3], 0);
        assert_eq!(rgba_at(&pixels, w, w - 1, h - 1)[3], 0);
    }

    #[test]
    fn test_hidden_base_layer_is_transparent() {
        let viewport = Viewport::new(400.0, 400.0);
        let mut surface = SoftwareSurface::new(viewport);
        let mask = viewport.circle_mask();

        // No image drawn: with the base layer hidden during circular
        // export, even in-circle pixels must be transparent.
        let bytes = export_masked(&mut surface, &mask, 1.0).unwrap();
        let (w, _, pixels) = decode_rgba(&bytes);
        assert_eq!(rgba_at(&pixels, w, 100, 100)[3], 0);

        // Visibility restored after export.
        assert!(surface.base_layer_visible());
    }

    #[test]
    fn test_window_export_keeps_base_layer() {
        let viewport = Viewport::new(400.0, 400.0);
        let mut surface = SoftwareSurface::new(viewport).with_background([9, 9, 9]);
        let mask = MaskShape::Window(ExportFrame {
            left: 10.0,
            top: 10.0,
            width: 20.0,
            height: 20.0,
        });

        let bytes = export_masked(&mut surface, &mask, 1.0).unwrap();
        let (w, _, pixels) = decode_rgba(&bytes);
        // Rectangular exports keep the base layer visible.
        assert_eq!(rgba_at(&pixels, w, 5, 5), [9, 9, 9, 255]);
    }

    #[test]
    fn test_image_sampling_maps_region_offset() {
        // 2x2 source scaled 10x, centered at (10, 10): covers canvas
        // [0, 20) x [0, 20) with one source pixel per 10x10 block.
        let image = DecodedImage::new(
            2,
            2,
            vec![
                255, 0, 0, // (0,0) red
                0, 255, 0, // (1,0) green
                0, 0, 255, // (0,1) blue
                255, 255, 0, // (1,1) yellow
            ],
        );
        let placement = DisplayedImage::new(Point::new(10.0, 10.0), 10.0, 2.0, 2.0);

        let viewport = Viewport::new(20.0, 20.0);
        let mut surface = SoftwareSurface::new(viewport);
        surface.draw_image(&image, &placement);

        let region = ExportRegion {
            format: ExportFormat::Png,
            multiplier: 1.0,
            left: 0.0,
            top: 0.0,
            width: 20.0,
            height: 20.0,
        };
        let bytes = surface.rasterize_png(&region).unwrap();
        let (w, _, pixels) = decode_rgba(&bytes);

        assert_eq!(rgba_at(&pixels, w, 2, 2), [255, 0, 0, 255]);
        assert_eq!(rgba_at(&pixels, w, 15, 2), [0, 255, 0, 255]);
        assert_eq!(rgba_at(&pixels, w, 2, 15), [0, 0, 255, 255]);
        assert_eq!(rgba_at(&pixels, w, 15, 15), [255, 255, 0, 255]);
    }

    #[test]
    fn test_rasterize_rejects_bad_region() {
        let mut surface = SoftwareSurface::new(Viewport::new(100.0, 100.0));

        let degenerate = ExportRegion {
            format: ExportFormat::Png,
            multiplier: 1.0,
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 10.0,
        };
        assert!(matches!(
            surface.rasterize_png(&degenerate),
            Err(ExportError::DegenerateRegion { .. })
        ));

        let bad_multiplier = ExportRegion {
            multiplier: -1.0,
            width: 10.0,
            height: 10.0,
            ..degenerate
        };
        assert!(matches!(
            surface.rasterize_png(&bad_multiplier),
            Err(ExportError::InvalidMultiplier(_))
        ));
    }

    #[test]
    fn test_redraw_replaces_previous_bitmap() {
        let viewport = Viewport::new(40.0, 40.0);
        let mut surface = SoftwareSurface::new(viewport);
        let placement = DisplayedImage::new(Point::new(20.0, 20.0), 1.0, 40.0, 40.0);

        surface.draw_image(&solid_image(40, 40, [1, 1, 1]), &placement);
        surface.draw_image(&solid_image(40, 40, [7, 7, 7]), &placement);

        let region = ExportRegion {
            format: ExportFormat::Png,
            multiplier: 1.0,
            left: 0.0,
            top: 0.0,
            width: 40.0,
            height: 40.0,
        };
        let bytes = surface.rasterize_png(&region).unwrap();
        let (w, _, pixels) = decode_rgba(&bytes);
        assert_eq!(rgba_at(&pixels, w, 20, 20), [7, 7, 7, 255]);
    }
}
