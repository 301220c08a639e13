//! Single object track built by the association pass.

use crate::tracker::matching::Detection;
use crate::tracker::track_state::TrackState;

/// Temporally ordered detections believed to depict one object.
///
/// `frame_keys` and `detections` are index-aligned and strictly increasing in
/// frame index. A track is created with one detection, so it is never empty.
#[derive(Debug, Clone)]
pub struct Track {
    /// Unique within one tracking run, assigned in creation order
    pub track_id: u64,
    /// Current track state
    pub state: TrackState,
    frame_keys: Vec<String>,
    detections: Vec<Detection>,
    last_frame_index: usize,
}

impl Track {
    /// Start a new track from its first detection.
    pub fn new(track_id: u64, frame_key: &str, detection: Detection, frame_index: usize) -> Self {
        Self {
            track_id,
            state: TrackState::Tracked,
            frame_keys: vec![frame_key.to_owned()],
            detections: vec![detection],
            last_frame_index: frame_index,
        }
    }

    /// Append a detection from a later frame.
    pub fn add(&mut self, frame_key: &str, detection: Detection, frame_index: usize) {
        debug_assert!(
            frame_index > self.last_frame_index,
            "track {} already has frame index {}",
            self.track_id,
            self.last_frame_index
        );
        self.frame_keys.push(frame_key.to_owned());
        self.detections.push(detection);
        self.last_frame_index = frame_index;
    }

    pub fn mark_lost(&mut self) {
        self.state = TrackState::Lost;
    }

    pub fn frame_keys(&self) -> &[String] {
        &self.frame_keys
    }

    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }

    /// Position of the most recent frame in the sorted frame list.
    pub fn last_frame_index(&self) -> usize {
        self.last_frame_index
    }

    /// The detection new candidates are compared against.
    pub fn last_detection(&self) -> &Detection {
        &self.detections[self.detections.len() - 1]
    }

    pub fn start_frame(&self) -> &str {
        &self.frame_keys[0]
    }

    pub fn end_frame(&self) -> &str {
        &self.frame_keys[self.frame_keys.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    /// Iterate `(frame_key, detection)` pairs in frame order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Detection)> {
        self.frame_keys
            .iter()
            .map(String::as_str)
            .zip(self.detections.iter())
    }
}
