use std::collections::HashSet;

use approx::assert_abs_diff_eq;
use iou_track_rs::{
    Aggregation, Detection, DetectionsPayload, FrameDetections, IouTracker, Rect, SummaryConfig,
    TrackerConfig, summarize_tracks,
};
use serde_json::json;

fn frames(entries: Vec<(&str, Vec<Detection>)>) -> FrameDetections {
    entries
        .into_iter()
        .map(|(k, dets)| (k.to_string(), dets))
        .collect()
}

/// A few objects drifting through a short clip, with a missed frame and clutter.
fn busy_sequence() -> FrameDetections {
    frames(vec![
        (
            "clip/00000.jpg",
            vec![
                Detection::new(10.0, 10.0, 50.0, 50.0, 0.9),
                Detection::new(200.0, 200.0, 260.0, 260.0, 0.4),
            ],
        ),
        (
            "clip/00001.jpg",
            vec![
                Detection::new(14.0, 12.0, 54.0, 52.0, 0.8),
                Detection::new(205.0, 200.0, 265.0, 260.0, 0.5),
                Detection::new(12.0, 10.0, 52.0, 50.0, 0.3),
            ],
        ),
        ("clip/00002.jpg", vec![]),
        (
            "clip/00003.jpg",
            vec![
                Detection::new(20.0, 14.0, 60.0, 54.0, 0.7),
                Detection::new(400.0, 10.0, 420.0, 30.0, 0.1),
            ],
        ),
        (
            "clip/00004.jpg",
            vec![
                Detection::new(22.0, 16.0, 62.0, 56.0, 0.6),
                Detection::new(212.0, 200.0, 272.0, 260.0, 0.6),
            ],
        ),
    ])
}

#[test]
fn test_basic_tracking() {
    // Frame 1 and frame 2 overlap at IoU 0.5.
    let input = frames(vec![
        ("f0", vec![Detection::new(0.0, 0.0, 10.0, 10.0, 0.9)]),
        ("f1", vec![Detection::new(0.0, 0.0, 10.0, 5.0, 0.8)]),
    ]);

    let loose = IouTracker::default().build_tracks(&input);
    assert_eq!(loose.len(), 1);
    assert_eq!(loose[0].len(), 2);

    let strict = IouTracker::new(TrackerConfig {
        iou_threshold: 0.6,
        ..Default::default()
    })
    .build_tracks(&input);
    assert_eq!(strict.len(), 2);
    assert!(strict.iter().all(|t| t.len() == 1));
}

#[test]
fn test_gap_tolerance() {
    // No entry at all for f1: f2 is the very next frame index.
    let same = Detection::new(0.0, 0.0, 10.0, 10.0, 0.9);
    let input = frames(vec![("f0", vec![same]), ("f2", vec![same])]);

    let tolerant = IouTracker::default().build_tracks(&input);
    assert_eq!(tolerant.len(), 1);
    assert_eq!(tolerant[0].frame_keys(), &["f0", "f2"]);

    let strict = IouTracker::new(TrackerConfig {
        max_gap: 0,
        ..Default::default()
    })
    .build_tracks(&input);
    assert_eq!(strict.len(), 2);
    assert!(strict.iter().all(|t| t.len() == 1));
}

#[test]
fn test_empty_frame_counts_as_a_step() {
    // An empty f1 still occupies a frame index, so f2 is two steps away.
    let same = Detection::new(0.0, 0.0, 10.0, 10.0, 0.9);
    let input = frames(vec![("f0", vec![same]), ("f1", vec![]), ("f2", vec![same])]);

    let tracks = IouTracker::default().build_tracks(&input);
    assert_eq!(tracks.len(), 2);

    let bridged = IouTracker::new(TrackerConfig {
        max_gap: 2,
        ..Default::default()
    })
    .build_tracks(&input);
    assert_eq!(bridged.len(), 1);
    assert_eq!(bridged[0].len(), 2);
}

#[test]
fn test_tracks_are_ordered_and_disjoint() {
    let input = busy_sequence();
    let keys: Vec<&String> = input.keys().collect();
    let tracks = IouTracker::default().build_tracks(&input);

    let mut used = HashSet::new();
    for track in &tracks {
        assert_eq!(track.frame_keys().len(), track.detections().len());

        let indices: Vec<usize> = track
            .frame_keys()
            .iter()
            .map(|k| keys.iter().position(|key| *key == k).unwrap())
            .collect();
        assert!(indices.windows(2).all(|w| w[0] < w[1]));

        for (frame, det) in track.iter() {
            let slot = input[frame].iter().position(|d| d == det).unwrap();
            assert!(used.insert((frame.to_string(), slot)), "detection reused");
        }
    }

    let total: usize = input.values().map(Vec::len).sum();
    assert_eq!(used.len(), total);
}

#[test]
fn test_busy_sequence_tracks() {
    let tracks = IouTracker::new(TrackerConfig {
        max_gap: 2,
        ..Default::default()
    })
    .build_tracks(&busy_sequence());
    let layout: Vec<(u64, Vec<&str>)> = tracks
        .iter()
        .map(|t| {
            (
                t.track_id,
                t.frame_keys().iter().map(|k| &k[5..10]).collect(),
            )
        })
        .collect();

    assert_eq!(
        layout,
        vec![
            // Takes the 0.3 box in frame 1: it overlaps more than the 0.8 one.
            (0, vec!["00000", "00001"]),
            // Closed before frame 4, so the box there starts a new track.
            (1, vec!["00000", "00001"]),
            // Bridges the empty frame 2.
            (2, vec!["00001", "00003", "00004"]),
            (3, vec!["00003"]),
            (4, vec!["00004"]),
        ]
    );
}

#[test]
fn test_min_track_len_above_longest_is_empty() {
    let input = busy_sequence();
    let tracks = IouTracker::default().build_tracks(&input);
    let longest = tracks.iter().map(|t| t.len()).max().unwrap();

    let filtered = IouTracker::new(TrackerConfig {
        min_track_len: longest + 1,
        ..Default::default()
    })
    .build_tracks(&input);
    assert!(filtered.is_empty());
}

#[test]
fn test_unreachable_threshold_gives_one_track_per_detection() {
    let input = busy_sequence();
    let tracks = IouTracker::new(TrackerConfig {
        iou_threshold: 1.01,
        ..Default::default()
    })
    .build_tracks(&input);

    let total: usize = input.values().map(Vec::len).sum();
    assert_eq!(tracks.len(), total);
}

#[test]
fn test_score_threshold_applies_before_matching() {
    let tracks = IouTracker::new(TrackerConfig {
        score_threshold: 0.35,
        ..Default::default()
    })
    .build_tracks(&busy_sequence());

    let total: usize = tracks.iter().map(|t| t.len()).sum();
    // 0.3 and 0.1 detections are dropped.
    assert_eq!(total, 7);
    assert!(tracks.iter().flat_map(|t| t.detections()).all(|d| d.score >= 0.35));
}

#[test]
fn test_score_threshold_compares_full_precision() {
    let doc = json!({"f0": [{"x1": 0, "y1": 0, "x2": 10, "y2": 10, "score": 0.29999999999}]});
    let frames = DetectionsPayload::from_reader(doc.to_string().as_bytes())
        .unwrap()
        .into_frames();
    let tracks = IouTracker::new(TrackerConfig {
        score_threshold: 0.3,
        ..Default::default()
    })
    .build_tracks(&frames);
    assert!(tracks.is_empty());
}

#[test]
fn test_summaries_from_json_input() {
    let doc = json!({
        "detections": {
            "v/002.jpg": [{"x1": 2, "y1": 0, "x2": 12, "y2": 10, "score": 0.9, "prompt_id": 1, "class_id": 3}],
            "v/000.jpg": [{"x1": 0, "y1": 0, "x2": 10, "y2": 10, "score": 0.2, "prompt_id": 0}],
            "v/001.jpg": [{"x1": 1, "y1": 0, "x2": 11, "y2": 10, "score": 0.5}]
        }
    });
    let frames = DetectionsPayload::from_reader(doc.to_string().as_bytes())
        .unwrap()
        .into_frames();
    let tracks = IouTracker::default().build_tracks(&frames);

    let mean = summarize_tracks(
        &tracks,
        &SummaryConfig {
            agg: Aggregation::Mean,
            window: 2,
        },
    );
    assert_eq!(mean.len(), 1);
    let summary = &mean[0];
    assert_abs_diff_eq!(summary.score_agg, 0.7, epsilon = 1e-6);
    assert_eq!(summary.length, 3);
    assert_eq!(summary.start_frame, "v/000.jpg");
    assert_eq!(summary.end_frame, "v/002.jpg");
    assert_eq!(summary.bbox, Rect::from_tlbr(2.0, 0.0, 12.0, 10.0));
    assert_eq!(summary.class_id, 3);
    let prompts: Vec<i64> = summary.detections.iter().map(|d| d.detection.prompt_id).collect();
    assert_eq!(prompts, vec![0, -1, 1]);

    let max = summarize_tracks(
        &tracks,
        &SummaryConfig {
            agg: Aggregation::Max,
            window: 0,
        },
    );
    assert_abs_diff_eq!(max[0].score_agg, 0.9, epsilon = 1e-6);
    assert_eq!(max[0].bbox, summary.bbox);
}
