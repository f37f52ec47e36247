//! Mask shapes and their derivation from the hosting viewport.
//!
//! The circular profile-picture mask is computed purely from the
//! viewport dimensions: the mask diameter is half the smaller edge
//! (`radius = min(width, height) / 4`) and the mask sits at the
//! viewport center. The rectangular variant wraps a crop region's
//! effective bounds instead.

use serde::{Deserialize, Serialize};

use crate::geometry::{ExportFrame, Point};

/// Dimensions reported by the hosting viewport on layout changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Radius of the derived circular mask.
    pub fn mask_radius(&self) -> f64 {
        self.width.min(self.height) / 4.0
    }

    /// Diameter of the derived circular mask.
    pub fn mask_diameter(&self) -> f64 {
        self.mask_radius() * 2.0
    }

    /// Center of the derived mask (the viewport center).
    pub fn mask_center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// The circular mask derived from this viewport.
    pub fn circle_mask(&self) -> MaskShape {
        MaskShape::Circle {
            center: self.mask_center(),
            radius: self.mask_radius(),
        }
    }
}

/// The shape delimiting which pixels an export keeps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MaskShape {
    /// Whole-canvas circular clip (profile-picture mode).
    Circle { center: Point, radius: f64 },
    /// A movable crop window's effective bounds.
    Window(ExportFrame),
}

impl MaskShape {
    /// Whether a canvas point falls inside the mask.
    pub fn contains(&self, left: f64, top: f64) -> bool {
        match self {
            MaskShape::Circle { center, radius } => {
                let dx = left - center.left;
                let dy = top - center.top;
                dx * dx + dy * dy <= radius * radius
            }
            MaskShape::Window(frame) => {
                left >= frame.left
                    && left < frame.left + frame.width
                    && top >= frame.top
                    && top < frame.top + frame.height
            }
        }
    }
}
