use tiny_skia::Transform;

use crate::types::SurfaceSize;

/// Placement of an image scaled to cover an area while keeping its aspect
/// ratio; overflow is cropped evenly on both sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverFit {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl CoverFit {
    /// Returns `None` when either the area or the image has a zero dimension.
    pub fn compute(area: SurfaceSize, image: SurfaceSize) -> Option<Self> {
        if area.is_empty() || image.is_empty() {
            return None;
        }
        let (aw, ah) = (f64::from(area.width), f64::from(area.height));
        let (iw, ih) = (f64::from(image.width), f64::from(image.height));
        let scale = (aw / iw).max(ah / ih);
        Some(Self {
            scale,
            offset_x: (aw - iw * scale) / 2.0,
            offset_y: (ah - ih * scale) / 2.0,
        })
    }

    /// Translate-then-scale transform mapping image pixels onto the area.
    pub fn transform(&self) -> Transform {
        Transform::from_row(
            self.scale as f32,
            0.0,
            0.0,
            self.scale as f32,
            self.offset_x as f32,
            self.offset_y as f32,
        )
    }

    /// Bounds `(left, top, right, bottom)` of the scaled image in area space.
    pub fn painted_bounds(&self, image: SurfaceSize) -> (f64, f64, f64, f64) {
        (
            self.offset_x,
            self.offset_y,
            self.offset_x + f64::from(image.width) * self.scale,
            self.offset_y + f64::from(image.height) * self.scale,
        )
    }
}

/// Measured size of a shaped line of text.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtents {
    pub width: f32,
    pub height: f32,
}

/// Top-left corner that centers `extents` in `area`, raised by `lift` pixels.
pub fn centered_origin(area: SurfaceSize, extents: TextExtents, lift: f32) -> (f32, f32) {
    let x = (area.width as f32 - extents.width) / 2.0;
    let y = (area.height as f32 - extents.height) / 2.0 - lift;
    (x, y)
}
