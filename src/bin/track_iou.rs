use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use iou_track_rs::{
    Aggregation, DetectionsPayload, IouTracker, SummaryConfig, TrackerConfig, TracksPayload,
    summarize_tracks,
};

/// Run IoU temporal tracking on saved detector output.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Detections JSON, either a frame map or `{"detections": {...}}`
    #[arg(long, default_value = "outputs/owlvit/dets_top1.json")]
    dets_json: PathBuf,

    /// Where to write the tracks JSON
    #[arg(long, default_value = "outputs/owlvit/tracks.json")]
    output_json: PathBuf,

    #[arg(long, default_value_t = 0.3)]
    iou_threshold: f64,

    #[arg(long, default_value_t = 0.0)]
    score_threshold: f64,

    /// Frames a track may go unmatched before it is closed
    #[arg(long, default_value_t = 1)]
    max_gap: usize,

    #[arg(long, default_value_t = 1)]
    min_track_len: usize,

    /// Score aggregation: max or mean
    #[arg(long, default_value = "max")]
    agg: Aggregation,

    /// Most recent detections used for the score; 0 uses all
    #[arg(long, default_value_t = 5)]
    window: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let tracker_config = TrackerConfig {
        iou_threshold: args.iou_threshold,
        score_threshold: args.score_threshold,
        max_gap: args.max_gap,
        min_track_len: args.min_track_len,
    };
    tracker_config.validate()?;
    let summary_config = SummaryConfig {
        agg: args.agg,
        window: args.window,
    };

    let frames = DetectionsPayload::load(&args.dets_json)
        .with_context(|| format!("failed to read detections from {}", args.dets_json.display()))?
        .into_frames();
    log::info!(
        "loaded {} frames, {} detections",
        frames.len(),
        frames.values().map(Vec::len).sum::<usize>()
    );

    let tracks = IouTracker::new(tracker_config.clone()).build_tracks(&frames);
    let summaries = summarize_tracks(&tracks, &summary_config);

    let payload = TracksPayload::new(
        args.dets_json.display().to_string(),
        tracker_config,
        summary_config,
        summaries,
    );
    payload
        .save(&args.output_json)
        .with_context(|| format!("failed to write tracks to {}", args.output_json.display()))?;

    println!("Wrote tracks to: {}", args.output_json.display());
    println!("Tracks: {}", payload.meta.num_tracks);
    Ok(())
}
