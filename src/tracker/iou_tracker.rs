//! Greedy IoU association of detections across an ordered frame sequence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackError};
use crate::tracker::matching::{self, AssignmentResult, Detection};
use crate::tracker::rect::{Rect, iou_batch};
use crate::tracker::track::Track;

/// Detections keyed by frame. Iteration order is the processing order.
pub type FrameDetections = BTreeMap<String, Vec<Detection>>;

/// Configuration for the IouTracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Minimum overlap for a track/detection pair to be a match candidate
    pub iou_threshold: f64,
    /// Detections scoring below this are dropped before matching
    pub score_threshold: f64,
    /// Frame-index steps a track may go unmatched and still be matched
    pub max_gap: usize,
    /// Tracks with fewer detections are left out of the result
    pub min_track_len: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            iou_threshold: 0.3,
            score_threshold: 0.0,
            max_gap: 1,
            min_track_len: 1,
        }
    }
}

impl TrackerConfig {
    /// Reject NaN thresholds, which would silently disable matching or filtering.
    pub fn validate(&self) -> Result<()> {
        if self.iou_threshold.is_nan() {
            return Err(TrackError::config("iou_threshold must not be NaN"));
        }
        if self.score_threshold.is_nan() {
            return Err(TrackError::config("score_threshold must not be NaN"));
        }
        Ok(())
    }
}

/// Builds tracks from a complete frame sequence in one pass.
///
/// Holds only configuration, so one tracker can run any number of
/// independent sequences.
#[derive(Debug, Clone, Default)]
pub struct IouTracker {
    config: TrackerConfig,
}

impl IouTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Associate detections across frames in ascending frame-key order.
    ///
    /// Returned tracks are ordered by `track_id`.
    pub fn build_tracks(&self, detections_by_frame: &FrameDetections) -> Vec<Track> {
        let mut pass = AssociationPass::new(&self.config);
        for (frame_index, (frame_key, detections)) in detections_by_frame.iter().enumerate() {
            pass.step(frame_index, frame_key, detections);
        }
        pass.finish()
    }
}

/// Working state of one association run.
///
/// Tracks live in `tracks` (the arena) and are addressed by slot; `active`
/// holds the slots still eligible for matching, in creation order, so its
/// row order is also `track_id` order.
struct AssociationPass<'a> {
    config: &'a TrackerConfig,
    tracks: Vec<Track>,
    active: Vec<usize>,
    next_track_id: u64,
}

impl<'a> AssociationPass<'a> {
    fn new(config: &'a TrackerConfig) -> Self {
        Self {
            config,
            tracks: Vec::new(),
            active: Vec::new(),
            next_track_id: 0,
        }
    }

    fn step(&mut self, frame_index: usize, frame_key: &str, detections: &[Detection]) {
        // Step 1: Score filter
        let current: Vec<&Detection> = detections
            .iter()
            .filter(|d| d.score >= self.config.score_threshold)
            .collect();

        // Step 2: Drop tracks that have been unmatched for too long
        let max_gap = self.config.max_gap;
        let tracks = &mut self.tracks;
        let before = self.active.len();
        self.active.retain(|&slot| {
            let track = &mut tracks[slot];
            let keep = frame_index - track.last_frame_index() <= max_gap;
            if !keep {
                track.mark_lost();
            }
            keep
        });
        let pruned = before - self.active.len();

        // Step 3: Greedy association against each track's latest box
        let track_rects: Vec<Rect> = self
            .active
            .iter()
            .map(|&slot| self.tracks[slot].last_detection().bbox)
            .collect();
        let det_rects: Vec<Rect> = current.iter().map(|d| d.bbox).collect();
        let ious = iou_batch(&track_rects, &det_rects);
        let candidates = matching::candidates(&ious, self.config.iou_threshold);

        let AssignmentResult {
            matches,
            unmatched_detections,
        } = matching::greedy_assignment(&candidates, track_rects.len(), det_rects.len());

        for &(row, col) in &matches {
            let slot = self.active[row];
            self.tracks[slot].add(frame_key, *current[col], frame_index);
        }

        // Step 4: Init new tracks
        for &col in &unmatched_detections {
            let track = Track::new(self.next_track_id, frame_key, *current[col], frame_index);
            self.next_track_id += 1;
            self.active.push(self.tracks.len());
            self.tracks.push(track);
        }

        log::debug!(
            "frame {} ({}): {} detections, {} matched, {} new tracks, {} pruned, {} active",
            frame_index,
            frame_key,
            current.len(),
            matches.len(),
            unmatched_detections.len(),
            pruned,
            self.active.len()
        );
    }

    fn finish(self) -> Vec<Track> {
        let total = self.tracks.len();
        let min_track_len = self.config.min_track_len;
        let tracks: Vec<Track> = self
            .tracks
            .into_iter()
            .filter(|t| t.len() >= min_track_len)
            .collect();

        log::info!(
            "association finished: {} tracks kept of {} (min_track_len {})",
            tracks.len(),
            total,
            min_track_len
        );
        tracks
    }
}
