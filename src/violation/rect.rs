use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Tracker bounding box in TLBR pixel coordinates.
///
/// Boxes arrive as-is from the upstream tracker, so nothing here rejects
/// them at construction. Callers check [`BBox::is_valid`] before using one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    /// Top-left x coordinate
    pub x1: f32,
    /// Top-left y coordinate
    pub y1: f32,
    /// Bottom-right x coordinate
    pub x2: f32,
    /// Bottom-right y coordinate
    pub y2: f32,
}

impl BBox {
    /// Create a box from TLBR format (top-left x, top-left y, bottom-right x, bottom-right y).
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a box from TLWH format (top-left x, top-left y, width, height).
    #[inline]
    pub fn from_tlwh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// All coordinates finite and corners not inverted. Zero-area boxes are valid.
    pub fn is_valid(&self) -> bool {
        self.to_tlbr().iter().all(|v| v.is_finite()) && self.x2 >= self.x1 && self.y2 >= self.y1
    }

    /// Integer pixel center of the box.
    ///
    /// Uses floor division on the corner sums, so `(0, 0, 5, 5)` has its
    /// center at `(2, 2)`.
    pub fn center(&self) -> Point2<f64> {
        let cx = ((self.x1 as f64 + self.x2 as f64) / 2.0).floor();
        let cy = ((self.y1 as f64 + self.y2 as f64) / 2.0).floor();
        Point2::new(cx, cy)
    }

    /// Crop region of this box inside a `width` x `height` frame.
    ///
    /// Returns `None` when the clipped region is empty, which is the case the
    /// evidence writer must skip instead of saving a zero-sized image.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<BBox> {
        if !self.is_valid() {
            return None;
        }
        let x1 = self.x1.floor().clamp(0.0, width as f32);
        let y1 = self.y1.floor().clamp(0.0, height as f32);
        let x2 = self.x2.floor().clamp(0.0, width as f32);
        let y2 = self.y2.floor().clamp(0.0, height as f32);

        if x2 > x1 && y2 > y1 {
            Some(BBox::from_tlbr(x1, y1, x2, y2))
        } else {
            None
        }
    }
}
