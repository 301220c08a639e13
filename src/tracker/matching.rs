//! Matching utilities for frame-to-frame association.

use crate::tracker::rect::Rect;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

fn default_prompt_id() -> i64 {
    -1
}

/// Detection input for the tracker.
///
/// Deserializes from the flat detector record
/// `{x1, y1, x2, y2, score, prompt_id, class_id}`. The coordinates are
/// required; `score` defaults to 0.0, `prompt_id` to -1 and `class_id` to 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Bounding box in TLBR format (x1, y1, x2, y2)
    #[serde(flatten)]
    pub bbox: Rect,
    /// Detection confidence score, not clamped
    #[serde(default)]
    pub score: f64,
    /// Index into the detector's prompt list, -1 when unknown
    #[serde(default = "default_prompt_id")]
    pub prompt_id: i64,
    #[serde(default)]
    pub class_id: i64,
}

impl Detection {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64, score: f64) -> Self {
        Self::from_rect(Rect::from_tlbr(x1, y1, x2, y2), score)
    }

    pub fn from_rect(bbox: Rect, score: f64) -> Self {
        Self {
            bbox,
            score,
            prompt_id: default_prompt_id(),
            class_id: 0,
        }
    }

    pub fn with_prompt_id(mut self, prompt_id: i64) -> Self {
        self.prompt_id = prompt_id;
        self
    }

    pub fn with_class_id(mut self, class_id: i64) -> Self {
        self.class_id = class_id;
        self
    }
}

/// A (track row, detection column) pair whose overlap passed the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub iou: f64,
    pub track: usize,
    pub detection: usize,
}

/// Collect every pair of the IoU matrix at or above `iou_threshold`.
///
/// The result is ordered by IoU descending, then by row, then by column,
/// so the greedy pass is reproducible regardless of sort stability.
pub fn candidates(ious: &Array2<f64>, iou_threshold: f64) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = ious
        .indexed_iter()
        .filter(|&(_, &iou)| iou >= iou_threshold)
        .map(|((track, detection), &iou)| Candidate {
            iou,
            track,
            detection,
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.iou
            .total_cmp(&a.iou)
            .then(a.track.cmp(&b.track))
            .then(a.detection.cmp(&b.detection))
    });
    candidates
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentResult {
    pub matches: Vec<(usize, usize)>,
    pub unmatched_detections: Vec<usize>,
}

/// Greedily claim candidates in order; each row and column is claimed at most once.
///
/// Unmatched columns are reported in ascending order.
pub fn greedy_assignment(
    candidates: &[Candidate],
    num_tracks: usize,
    num_detections: usize,
) -> AssignmentResult {
    let mut track_claimed = vec![false; num_tracks];
    let mut detection_claimed = vec![false; num_detections];
    let mut matches = Vec::new();

    for c in candidates {
        if track_claimed[c.track] || detection_claimed[c.detection] {
            continue;
        }
        track_claimed[c.track] = true;
        detection_claimed[c.detection] = true;
        matches.push((c.track, c.detection));
    }

    let unmatched_detections = detection_claimed
        .iter()
        .enumerate()
        .filter_map(|(i, &c)| if c { None } else { Some(i) })
        .collect();

    AssignmentResult {
        matches,
        unmatched_detections,
    }
}
