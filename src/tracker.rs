mod iou_tracker;
mod matching;
mod rect;
mod track;
mod track_state;

pub use iou_tracker::{FrameDetections, IouTracker, TrackerConfig};
pub use matching::{AssignmentResult, Candidate, Detection, candidates, greedy_assignment};
pub use rect::{Rect, iou_batch};
pub use track::Track;
pub use track_state::TrackState;
