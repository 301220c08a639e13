//! TrackerPipeline for combining detection with tracking.

use crate::summary::{SummaryConfig, TrackSummary, summarize_tracks};
use crate::tracker::{FrameDetections, IouTracker, TrackerConfig};

use super::DetectionSource;

/// Runs a detector over a frame sequence, then tracks and summarizes.
///
/// Detection happens frame by frame, but association only starts once every
/// frame has been seen, so the whole sequence is processed in one pass.
pub struct TrackerPipeline<D: DetectionSource> {
    detector: D,
    tracker: IouTracker,
    summary: SummaryConfig,
}

impl<D: DetectionSource> TrackerPipeline<D> {
    /// Create a new tracking pipeline with the given detector and configs.
    pub fn new(detector: D, tracker_config: TrackerConfig, summary_config: SummaryConfig) -> Self {
        Self {
            detector,
            tracker: IouTracker::new(tracker_config),
            summary: summary_config,
        }
    }

    /// Create a new tracking pipeline with default configuration.
    pub fn with_default_config(detector: D) -> Self {
        Self::new(detector, TrackerConfig::default(), SummaryConfig::default())
    }

    /// Query the detector once per distinct frame key.
    pub fn collect_detections<I, S>(&mut self, frame_keys: I) -> Result<FrameDetections, D::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut frames = FrameDetections::new();
        for key in frame_keys {
            let key = key.as_ref();
            if frames.contains_key(key) {
                continue;
            }
            let detections = self.detector.detect(key)?;
            frames.insert(key.to_owned(), detections);
        }
        Ok(frames)
    }

    /// Detect, track and summarize a whole sequence.
    ///
    /// Frame keys may be given in any order; they are processed sorted.
    pub fn run<I, S>(&mut self, frame_keys: I) -> Result<Vec<TrackSummary>, D::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let frames = self.collect_detections(frame_keys)?;
        let tracks = self.tracker.build_tracks(&frames);
        Ok(summarize_tracks(&tracks, &self.summary))
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &IouTracker {
        &self.tracker
    }

    pub fn summary_config(&self) -> &SummaryConfig {
        &self.summary
    }
}
