//! Integration module for connecting an object detector with the tracker.
//!
//! The detector itself lives outside this crate. This module provides the
//! trait it implements and a pipeline that drives a whole frame sequence
//! through detection, association and summarization.

mod builder;
mod detector;
mod pipeline;

pub use builder::DetectionBuilder;
pub use detector::DetectionSource;
pub use pipeline::TrackerPipeline;
