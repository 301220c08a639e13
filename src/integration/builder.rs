//! Builder for creating Detection objects from various input formats.

use crate::tracker::{Detection, Rect};

/// Builder for creating `Detection` objects from various input formats.
#[derive(Debug, Clone)]
pub struct DetectionBuilder {
    bbox: Rect,
    score: f64,
    prompt_id: i64,
    class_id: i64,
}

impl Default for DetectionBuilder {
    fn default() -> Self {
        Self {
            bbox: Rect::from_tlbr(0.0, 0.0, 0.0, 0.0),
            score: 0.0,
            prompt_id: -1,
            class_id: 0,
        }
    }
}

impl DetectionBuilder {
    /// Create a new detection builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        self.bbox = Rect::from_tlbr(x1, y1, x2, y2);
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f64, cy: f64, w: f64, h: f64) -> Self {
        self.bbox = Rect::from_xywh(cx, cy, w, h);
        self
    }

    /// Set bounding box in TLWH format (left, top, width, height).
    pub fn tlwh(mut self, x: f64, y: f64, w: f64, h: f64) -> Self {
        self.bbox = Rect::from_tlwh(x, y, w, h);
        self
    }

    /// Set the confidence score.
    pub fn score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    /// Set the index of the text prompt that produced the box.
    pub fn prompt_id(mut self, prompt_id: i64) -> Self {
        self.prompt_id = prompt_id;
        self
    }

    pub fn class_id(mut self, class_id: i64) -> Self {
        self.class_id = class_id;
        self
    }

    /// Build the final `Detection`.
    pub fn build(self) -> Detection {
        Detection::from_rect(self.bbox, self.score)
            .with_prompt_id(self.prompt_id)
            .with_class_id(self.class_id)
    }
}
