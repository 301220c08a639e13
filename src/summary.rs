//! Reduction of finished tracks to serializable summaries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TrackError;
use crate::tracker::{Detection, Rect, Track};

/// How per-detection scores collapse into one track score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    #[default]
    Max,
    Mean,
}

impl Aggregation {
    /// Aggregate a slice of scores. An empty slice gives 0.0.
    pub fn apply(&self, scores: &[f64]) -> f64 {
        if scores.is_empty() {
            return 0.0;
        }
        match self {
            Self::Max => scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Self::Mean => scores.iter().sum::<f64>() / scores.len().max(1) as f64,
        }
    }
}

impl FromStr for Aggregation {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "max" => Ok(Self::Max),
            "mean" => Ok(Self::Mean),
            other => Err(TrackError::UnknownAggregation(other.to_owned())),
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Max => f.write_str("max"),
            Self::Mean => f.write_str("mean"),
        }
    }
}

/// Configuration for the summarizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub agg: Aggregation,
    /// Number of most recent detections feeding `score_agg`; 0 means all
    pub window: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            agg: Aggregation::Max,
            window: 5,
        }
    }
}

/// One detection of a summarized track, tagged with its frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    pub frame: String,
    #[serde(flatten)]
    pub detection: Detection,
}

/// Compact projection of a finished track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub track_id: u64,
    pub length: usize,
    pub start_frame: String,
    pub end_frame: String,
    pub score_agg: f64,
    /// Box of the highest-scoring detection in the whole track
    pub bbox: Rect,
    /// Class of that same detection
    pub class_id: i64,
    pub detections: Vec<DetectionRecord>,
}

/// Summarize one track.
pub fn summarize_track(track: &Track, config: &SummaryConfig) -> TrackSummary {
    let detections = track.detections();

    let window_start = if config.window > 0 {
        detections.len().saturating_sub(config.window)
    } else {
        0
    };
    let scores: Vec<f64> = detections[window_start..].iter().map(|d| d.score).collect();
    let score_agg = config.agg.apply(&scores);

    // First detection wins on equal scores.
    let best = detections
        .iter()
        .skip(1)
        .fold(&detections[0], |best, d| if d.score > best.score { d } else { best });

    TrackSummary {
        track_id: track.track_id,
        length: track.len(),
        start_frame: track.start_frame().to_owned(),
        end_frame: track.end_frame().to_owned(),
        score_agg,
        bbox: best.bbox,
        class_id: best.class_id,
        detections: track
            .iter()
            .map(|(frame, det)| DetectionRecord {
                frame: frame.to_owned(),
                detection: *det,
            })
            .collect(),
    }
}

/// Summarize every track, preserving input order.
pub fn summarize_tracks(tracks: &[Track], config: &SummaryConfig) -> Vec<TrackSummary> {
    log::debug!(
        "summarizing {} tracks (agg {}, window {})",
        tracks.len(),
        config.agg,
        config.window
    );
    tracks.iter().map(|t| summarize_track(t, config)).collect()
}
