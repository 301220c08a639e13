//! Temporal IoU tracking of per-frame object detections.
//!
//! Detections keyed by frame are associated greedily by box overlap into
//! tracks ([`IouTracker`]), and each track is reduced to a summary with an
//! aggregated score and a representative box ([`summarize_tracks`]).

pub mod error;
pub mod integration;
pub mod payload;
pub mod summary;
pub mod tracker;

pub use error::{Result, TrackError};
pub use integration::{DetectionBuilder, DetectionSource, TrackerPipeline};
pub use payload::{DetectionsPayload, TracksPayload};
pub use summary::{Aggregation, SummaryConfig, TrackSummary, summarize_track, summarize_tracks};
pub use tracker::{Detection, FrameDetections, IouTracker, Rect, Track, TrackerConfig};
