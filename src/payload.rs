//! JSON documents exchanged with the detector and the downstream consumers.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::summary::{SummaryConfig, TrackSummary};
use crate::tracker::{Detection, FrameDetections, TrackerConfig};

/// Detector output: the frame map, either bare or under a `detections` key.
///
/// A top-level `detections` key selects the wrapped form and is parsed in
/// place, so errors inside it keep their line and column. Other top-level
/// keys of a wrapped document (such as `meta`) are ignored.
#[derive(Debug, Clone)]
pub enum DetectionsPayload {
    Wrapped { detections: FrameDetections },
    Bare(FrameDetections),
}

impl<'de> Deserialize<'de> for DetectionsPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(PayloadVisitor)
    }
}

struct PayloadVisitor;

impl<'de> Visitor<'de> for PayloadVisitor {
    type Value = DetectionsPayload;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of frame keys to detections, optionally under `detections`")
    }

    fn visit_map<A: MapAccess<'de>>(
        self,
        mut map: A,
    ) -> std::result::Result<Self::Value, A::Error> {
        let mut wrapped: Option<FrameDetections> = None;
        let mut others: Vec<(String, serde_json::Value)> = Vec::new();

        while let Some(key) = map.next_key::<String>()? {
            if key == "detections" {
                if wrapped.is_some() {
                    return Err(de::Error::duplicate_field("detections"));
                }
                wrapped = Some(map.next_value()?);
            } else {
                others.push((key, map.next_value()?));
            }
        }

        if let Some(detections) = wrapped {
            return Ok(DetectionsPayload::Wrapped { detections });
        }

        let mut frames = FrameDetections::new();
        for (key, value) in others {
            let detections = Vec::<Detection>::deserialize(value)
                .map_err(|e| de::Error::custom(format!("frame {key:?}: {e}")))?;
            frames.insert(key, detections);
        }
        Ok(DetectionsPayload::Bare(frames))
    }
}

impl DetectionsPayload {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn into_frames(self) -> FrameDetections {
        match self {
            Self::Wrapped { detections } => detections,
            Self::Bare(detections) => detections,
        }
    }
}

/// Run parameters echoed next to the tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracksMeta {
    pub source_dets_json: String,
    #[serde(flatten)]
    pub tracker: TrackerConfig,
    #[serde(flatten)]
    pub summary: SummaryConfig,
    pub num_tracks: usize,
}

/// Output document: `{"meta": {...}, "tracks": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracksPayload {
    pub meta: TracksMeta,
    pub tracks: Vec<TrackSummary>,
}

impl TracksPayload {
    pub fn new(
        source_dets_json: impl Into<String>,
        tracker: TrackerConfig,
        summary: SummaryConfig,
        tracks: Vec<TrackSummary>,
    ) -> Self {
        Self {
            meta: TracksMeta {
                source_dets_json: source_dets_json.into(),
                tracker,
                summary,
                num_tracks: tracks.len(),
            },
            tracks,
        }
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Write pretty JSON, creating parent directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
