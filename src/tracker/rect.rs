use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in image pixel coordinates.
///
/// Stored in TLBR form (x1, y1, x2, y2). Nothing enforces `x2 >= x1` or
/// `y2 >= y1`: an inverted or degenerate box simply has zero area and
/// overlaps nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x1: f64,
    /// Top edge
    pub y1: f64,
    /// Right edge
    pub x2: f64,
    /// Bottom edge
    pub y2: f64,
}

impl Rect {
    /// Create a Rect from TLBR format (top-left x, top-left y, bottom-right x, bottom-right y).
    #[inline]
    pub fn from_tlbr(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a Rect from TLWH format (top-left x, top-left y, width, height).
    #[inline]
    pub fn from_tlwh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    /// Create a Rect from XYWH format (center x, center y, width, height).
    #[inline]
    pub fn from_xywh(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self {
            x1: cx - width / 2.0,
            y1: cy - height / 2.0,
            x2: cx + width / 2.0,
            y2: cy + height / 2.0,
        }
    }

    /// Width, clamped to zero for inverted boxes.
    #[inline]
    pub fn width(&self) -> f64 {
        (self.x2 - self.x1).max(0.0)
    }

    /// Height, clamped to zero for inverted boxes.
    #[inline]
    pub fn height(&self) -> f64 {
        (self.y2 - self.y1).max(0.0)
    }

    /// Get the area of the bounding box. Never negative.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Calculate Intersection over Union (IoU) with another bounding box.
    ///
    /// Always in `[0, 1]`. Disjoint, touching and degenerate boxes give 0.
    pub fn iou(&self, other: &Rect) -> f64 {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);

        let inter_width = (x2 - x1).max(0.0);
        let inter_height = (y2 - y1).max(0.0);
        let inter_area = inter_width * inter_height;
        if inter_area <= 0.0 {
            return 0.0;
        }

        let union_area = self.area() + other.area() - inter_area;

        if union_area > 0.0 {
            inter_area / union_area
        } else {
            0.0
        }
    }
}

use ndarray::Array2;

/// Calculate IoU matrix between two sets of bounding boxes.
///
/// Returns a matrix of shape (M, N) where M is the length of `boxes_a`
/// and N is the length of `boxes_b`.
pub fn iou_batch(boxes_a: &[Rect], boxes_b: &[Rect]) -> Array2<f64> {
    let mut ious = Array2::zeros((boxes_a.len(), boxes_b.len()));
    for (i, a) in boxes_a.iter().enumerate() {
        for (j, b) in boxes_b.iter().enumerate() {
            ious[[i, j]] = a.iou(b);
        }
    }
    ious
}
