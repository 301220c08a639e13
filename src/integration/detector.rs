//! Trait for object detection backends.

use crate::tracker::Detection;

/// Source of per-frame detections.
///
/// Implement this trait to feed any detector (or a replay of its saved
/// output) into a [`TrackerPipeline`](super::TrackerPipeline).
///
/// # Example
///
/// ```ignore
/// use iou_track_rs::{Detection, DetectionSource};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl DetectionSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, frame_key: &str) -> Result<Vec<Detection>, Self::Error> {
///         // Load the frame, run inference and return detections
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error;

    /// Return the detections for one frame.
    ///
    /// # Arguments
    /// * `frame_key` - Sortable frame identifier, usually a relative image path
    fn detect(&mut self, frame_key: &str) -> Result<Vec<Detection>, Self::Error>;
}

