// Unit tests for business rules

use std::collections::HashMap;

use crate::domain::model::*;
use crate::domain::rules::*;

const EPS: f64 = 1e-9;

fn obs(video: &str, audio: &str, container: &str) -> CodecObservation {
    CodecObservation::new(video, audio, container)
}

fn det(t: f64, label: &str, conf: f64) -> DetectionEvent {
    DetectionEvent::new(t, label, conf)
}

fn params(min_duration: f64, merge_gap: f64, padding: f64) -> MergeParams {
    MergeParams::new(min_duration, merge_gap, padding).unwrap()
}

// --- compatibility ---

#[test]
fn test_h264_aac_is_excellent() {
    let assessment = CompatibilityAssessor::assess(&obs("h264", "aac", "mov,mp4,m4a"));
    assert_eq!(assessment.tier, CompatibilityTier::Excellent);
    assert!(assessment.issues.is_empty());
    assert!(!assessment.needs_conversion());
}

#[test]
fn test_av1_aac_mp4_is_very_poor_with_one_issue() {
    let assessment = CompatibilityAssessor::assess(&obs("av1", "aac", "mp4"));
    assert_eq!(assessment.tier, CompatibilityTier::VeryPoor);
    assert_eq!(assessment.issues.len(), 1);
    assert!(assessment.issues[0].starts_with("AV1 video"));
    assert!(assessment.needs_conversion());
    assert!(assessment.video_needs_conversion());
    assert!(!assessment.audio_needs_conversion());
}

#[test]
fn test_vp9_is_poor() {
    let assessment = CompatibilityAssessor::assess(&obs("vp9", "aac", "mp4"));
    assert_eq!(assessment.tier, CompatibilityTier::Poor);
    assert!(assessment.issues[0].starts_with("VP9 video"));
}

#[test]
fn test_hevc_is_moderate() {
    let assessment = CompatibilityAssessor::assess(&obs("hevc", "aac", "mp4"));
    assert_eq!(assessment.tier, CompatibilityTier::Moderate);
    assert!(!assessment.video_needs_conversion());
}

#[test]
fn test_opus_depends_on_container() {
    let in_mp4 = CompatibilityAssessor::assess(&obs("h264", "opus", "mov,mp4,m4a,3gp,3g2,mj2"));
    assert_eq!(in_mp4.tier, CompatibilityTier::Poor);
    assert!(in_mp4.issues[0].contains("in MP4"));
    assert!(in_mp4.audio_needs_conversion());

    let in_webm = CompatibilityAssessor::assess(&obs("h264", "opus", "matroska,webm"));
    assert_eq!(in_webm.tier, CompatibilityTier::Moderate);
    assert_eq!(in_webm.issues, vec!["Opus audio: May have compatibility issues".to_string()]);
}

#[test]
fn test_vorbis_and_flac() {
    let vorbis = CompatibilityAssessor::assess(&obs("h264", "vorbis", "webm"));
    assert_eq!(vorbis.tier, CompatibilityTier::Moderate);

    let flac = CompatibilityAssessor::assess(&obs("h264", "flac", "matroska"));
    assert_eq!(flac.tier, CompatibilityTier::Good);
    assert_eq!(flac.issues.len(), 1);
}

#[test]
fn test_worse_rule_wins_and_issue_order() {
    // VP9 (poor) + FLAC (good) stays poor
    let assessment = CompatibilityAssessor::assess(&obs("vp9", "flac", "matroska"));
    assert_eq!(assessment.tier, CompatibilityTier::Poor);
    assert_eq!(assessment.issues.len(), 2);
    assert!(assessment.issues[0].starts_with("VP9"));
    assert!(assessment.issues[1].starts_with("FLAC"));

    // AV1 is never downgraded by a milder audio rule
    let assessment = CompatibilityAssessor::assess(&obs("av1", "opus", "mp4"));
    assert_eq!(assessment.tier, CompatibilityTier::VeryPoor);
    assert_eq!(assessment.issues.len(), 2);

    // HEVC + Opus in MP4 is raised to poor
    let assessment = CompatibilityAssessor::assess(&obs("hevc", "opus", "mp4"));
    assert_eq!(assessment.tier, CompatibilityTier::Poor);
}

#[test]
fn test_unknown_codecs_are_silent() {
    let assessment = CompatibilityAssessor::assess(&obs("", "", ""));
    assert_eq!(assessment.tier, CompatibilityTier::Excellent);
    assert!(assessment.issues.is_empty());
    assert_eq!(assessment.video_codec, VideoCodec::Unknown);
    assert_eq!(assessment.audio_codec, AudioCodec::Unknown);
}

#[test]
fn test_worse_audio_never_lowers_tier() {
    let audio_by_severity = ["aac", "flac", "vorbis", "opus"];
    for video in ["h264", "hevc", "vp9", "av1", "mystery"] {
        for container in ["mp4", "matroska,webm"] {
            let mut previous = CompatibilityTier::Excellent;
            for audio in audio_by_severity {
                let tier = CompatibilityAssessor::assess(&obs(video, audio, container)).tier;
                assert!(
                    tier >= previous,
                    "{} + {} in {} lowered tier",
                    video,
                    audio,
                    container
                );
                previous = tier;
            }
        }
    }
}

#[test]
fn test_summary_counts() {
    let media: Vec<AssessedMedia> = [
        ("a.mp4", "h264", "aac", "mp4"),
        ("b.webm", "vp9", "opus", "webm"),
        ("c.mp4", "av1", "aac", "mp4"),
        ("d.mkv", "hevc", "flac", "matroska"),
    ]
    .iter()
    .map(|(path, v, a, c)| {
        let observation = obs(v, a, c);
        AssessedMedia {
            path: path.to_string(),
            assessment: CompatibilityAssessor::assess(&observation),
            observation,
        }
    })
    .collect();

    let summary = CompatibilityAssessor::summarize(&media);
    assert_eq!(summary.total, 4);
    assert_eq!(summary.by_tier.len(), CompatibilityTier::ALL.len());
    assert_eq!(summary.by_tier[&CompatibilityTier::Excellent], 1);
    assert_eq!(summary.by_tier[&CompatibilityTier::Good], 0);
    assert_eq!(summary.by_tier[&CompatibilityTier::Moderate], 1);
    assert_eq!(summary.by_tier[&CompatibilityTier::Poor], 1);
    assert_eq!(summary.by_tier[&CompatibilityTier::VeryPoor], 1);
    assert_eq!(summary.by_video_codec["vp9"], 1);
    assert_eq!(summary.by_audio_codec["aac"], 2);
    assert_eq!(summary.needs_conversion, 2);
    assert_eq!(summary.files_needing_conversion, vec!["b.webm", "c.mp4"]);
}

#[test]
fn test_conversion_plan_args() {
    let assessment = CompatibilityAssessor::assess(&obs("h264", "opus", "mp4"));
    let plan = ConversionPlan::for_assessment(&assessment);
    assert!(!plan.convert_video);
    assert!(plan.convert_audio);
    assert!(!plan.is_noop());

    let args = plan.encoder_args("in.mp4", "out.mp4");
    assert_eq!(
        args,
        vec![
            "-y", "-i", "in.mp4", "-c:v", "copy", "-c:a", "aac", "-b:a", "192k", "-movflags",
            "+faststart", "out.mp4"
        ]
    );

    let assessment = CompatibilityAssessor::assess(&obs("vp9", "aac", "webm"));
    let args = ConversionPlan::for_assessment(&assessment).encoder_args("a", "b");
    assert_eq!(&args[3..9], &["-c:v", "libx264", "-crf", "23", "-preset", "medium"]);
    assert_eq!(&args[9..11], &["-c:a", "copy"]);

    let clean = CompatibilityAssessor::assess(&obs("h264", "aac", "mp4"));
    assert!(ConversionPlan::for_assessment(&clean).is_noop());
}

// --- merge ---

#[test]
fn test_merge_empty() {
    assert!(DetectionMerger::merge(&[], &MergeParams::default()).is_empty());
}

#[test]
fn test_merge_reference_example() {
    let detections = vec![det(10.0, "slap", 0.9), det(12.0, "slap", 0.5), det(50.0, "fall", 0.8)];
    let clips = DetectionMerger::merge(&detections, &params(5.0, 3.0, 2.0));

    assert_eq!(clips.len(), 2);
    assert_eq!(clips[0].start, 8.0);
    assert_eq!(clips[0].end, 14.0);
    assert_eq!(clips[0].primary_label, "slap");
    assert_eq!(clips[0].confidence, 0.9);
    assert_eq!(clips[0].detection_count, 2);

    // 4s padded span is stretched to the 5s minimum around t=50
    assert!((clips[1].start - 47.5).abs() < EPS);
    assert!((clips[1].end - 52.5).abs() < EPS);
    assert_eq!(clips[1].primary_label, "fall");
    assert_eq!(clips[1].confidence, 0.8);
}

#[test]
fn test_merge_sorts_unsorted_input() {
    let detections = vec![det(50.0, "fall", 0.8), det(12.0, "slap", 0.5), det(10.0, "slap", 0.9)];
    let clips = DetectionMerger::merge(&detections, &params(5.0, 3.0, 2.0));
    assert_eq!(clips.len(), 2);
    assert_eq!(clips[0].start, 8.0);
    assert_eq!(clips[0].detection_count, 2);
}

#[test]
fn test_merge_gap_boundary_is_inclusive() {
    let p = params(5.0, 3.0, 2.0);
    let clips = DetectionMerger::merge(&[det(0.0, "a", 0.5), det(3.0, "a", 0.5)], &p);
    assert_eq!(clips.len(), 1);

    let clips = DetectionMerger::merge(&[det(0.0, "a", 0.5), det(3.001, "a", 0.5)], &p);
    assert_eq!(clips.len(), 2);
}

#[test]
fn test_merge_chains_through_intermediate_events() {
    // Gaps of 2.5s each chain into one 10s run
    let detections: Vec<_> = (0..5).map(|i| det(20.0 + 2.5 * i as f64, "x", 0.3)).collect();
    let clips = DetectionMerger::merge(&detections, &params(5.0, 3.0, 1.0));
    assert_eq!(clips.len(), 1);
    assert_eq!(clips[0].start, 19.0);
    assert_eq!(clips[0].end, 31.0);
    assert_eq!(clips[0].detection_count, 5);
}

#[test]
fn test_merge_single_event_meets_min_duration() {
    let clips = DetectionMerger::merge(&[det(30.0, "kick", 0.4)], &params(6.0, 3.0, 0.0));
    assert_eq!(clips.len(), 1);
    assert!((clips[0].duration() - 6.0).abs() < EPS);
    assert!((clips[0].start - 27.0).abs() < EPS);
}

#[test]
fn test_merge_clamps_start_and_keeps_min_duration() {
    let clips = DetectionMerger::merge(&[det(1.0, "trip", 0.6)], &params(5.0, 3.0, 2.0));
    assert_eq!(clips[0].start, 0.0);
    assert!((clips[0].end - 5.0).abs() < EPS);

    let clips = DetectionMerger::merge(&[det(0.0, "trip", 0.6)], &params(8.0, 3.0, 0.0));
    assert_eq!(clips[0].start, 0.0);
    assert!((clips[0].end - 8.0).abs() < EPS);
}

#[test]
fn test_min_duration_and_non_negative_start_hold_everywhere() {
    let timestamps = [0.0, 0.4, 1.7, 2.2, 9.9, 10.0, 13.5, 40.0, 41.0, 44.2, 120.0];
    for &(min_duration, merge_gap, padding) in &[
        (5.0, 3.0, 2.0),
        (0.5, 0.0, 0.0),
        (12.0, 1.0, 0.25),
        (3.0, 10.0, 4.0),
    ] {
        let detections: Vec<_> = timestamps.iter().map(|&t| det(t, "x", 0.5)).collect();
        for clip in DetectionMerger::merge(&detections, &params(min_duration, merge_gap, padding)) {
            assert!(clip.start >= 0.0);
            assert!(clip.end > clip.start);
            assert!(clip.duration() + EPS >= min_duration);
        }
    }
}

#[test]
fn test_primary_label_prefers_count_then_confidence() {
    let by_count = vec![det(1.0, "fall", 0.99), det(2.0, "slap", 0.3), det(3.0, "slap", 0.4)];
    let clips = DetectionMerger::merge(&by_count, &params(5.0, 3.0, 2.0));
    assert_eq!(clips[0].primary_label, "slap");
    assert_eq!(clips[0].confidence, 0.99);
    assert_eq!(clips[0].labels, vec!["fall".to_string(), "slap".to_string()]);

    let tied = vec![det(1.0, "fall", 0.6), det(2.0, "slap", 0.7)];
    let clips = DetectionMerger::merge(&tied, &params(5.0, 3.0, 2.0));
    assert_eq!(clips[0].primary_label, "slap");

    let fully_tied = vec![det(1.0, "fall", 0.7), det(2.0, "slap", 0.7)];
    let clips = DetectionMerger::merge(&fully_tied, &params(5.0, 3.0, 2.0));
    assert_eq!(clips[0].primary_label, "fall");
}

#[test]
fn test_remerging_clip_midpoints_keeps_overlap_pattern() {
    let p = params(5.0, 3.0, 2.0);
    let detections = vec![
        det(10.0, "slap", 0.9),
        det(12.0, "slap", 0.5),
        det(50.0, "fall", 0.8),
        det(80.0, "kick", 0.4),
        det(82.5, "kick", 0.6),
    ];
    let first = DetectionMerger::merge(&detections, &p);

    let midpoints: Vec<_> = first
        .iter()
        .map(|c| det(c.midpoint(), &c.primary_label, c.confidence))
        .collect();
    let second = DetectionMerger::merge(&midpoints, &p);

    assert_eq!(first.len(), second.len());
    for i in 0..first.len() {
        for j in 0..first.len() {
            if i != j {
                assert_eq!(first[i].overlaps(&first[j]), second[i].overlaps(&second[j]));
            }
        }
    }
}

#[test]
fn test_filter_by_keywords() {
    let detections = vec![
        det(1.0, "Slapping", 0.5),
        det(2.0, "faceplanting", 0.5),
        det(3.0, "laughing", 0.5),
        det(4.0, "kick", 0.5),
    ];

    let kept = DetectionMerger::filter_by_keywords(&detections, &["slap".to_string(), " FACE ".to_string()]);
    let labels: Vec<_> = kept.iter().map(|d| d.label.as_str()).collect();
    assert_eq!(labels, vec!["Slapping", "faceplanting"]);

    // keyword containing the label also matches
    let kept = DetectionMerger::filter_by_keywords(&detections, &["high kick".to_string()]);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].label, "kick");

    let kept = DetectionMerger::filter_by_keywords(&detections, &["  ".to_string()]);
    assert_eq!(kept.len(), 4);
    assert_eq!(DetectionMerger::filter_by_keywords(&detections, &[]).len(), 4);
}

// --- dedupe ---

fn thumbs(hashes: &[&str]) -> Vec<SceneThumbprint> {
    hashes
        .iter()
        .enumerate()
        .map(|(i, h)| SceneThumbprint::new(i as f64 * 5.0, (i + 1) as f64 * 5.0, *h))
        .collect()
}

#[test]
fn test_hamming_distance() {
    assert_eq!(hamming_distance("abcd", "abcd"), Some(0));
    assert_eq!(hamming_distance("abcd", "abce"), Some(1));
    assert_eq!(hamming_distance("0000", "ffff"), Some(4));
    assert_eq!(hamming_distance("abc", "abcd"), None);
}

#[test]
fn test_identical_hashes_all_point_at_first() {
    for threshold in [0, 3, 64] {
        let verdicts = SceneDeduplicator::deduplicate(&thumbs(&["a1b2", "a1b2", "a1b2", "a1b2"]), threshold);
        assert_eq!(verdicts[0], DuplicateVerdict::unique(0));
        for (i, verdict) in verdicts.iter().enumerate().skip(1) {
            assert_eq!(*verdict, DuplicateVerdict::duplicate(i, 0));
        }
    }
}

#[test]
fn test_threshold_is_inclusive() {
    // distance 2
    let scenes = thumbs(&["aaaa", "aabb"]);
    assert!(SceneDeduplicator::deduplicate(&scenes, 2)[1].is_duplicate);
    assert!(!SceneDeduplicator::deduplicate(&scenes, 1)[1].is_duplicate);
}

#[test]
fn test_first_match_wins_over_closest() {
    // scene 2 is distance 2 from scene 0 and distance 1 from scene 1
    let scenes = thumbs(&["0000", "0111", "0011"]);
    let verdicts = SceneDeduplicator::deduplicate(&scenes, 2);
    assert!(!verdicts[0].is_duplicate);
    assert!(!verdicts[1].is_duplicate);
    assert_eq!(verdicts[2], DuplicateVerdict::duplicate(2, 0));
}

#[test]
fn test_duplicates_are_not_registered_as_canonical() {
    // scene 1 duplicates 0; scene 2 is close to 1 but far from 0
    let scenes = thumbs(&["0000", "0001", "0011"]);
    let verdicts = SceneDeduplicator::deduplicate(&scenes, 1);
    assert_eq!(verdicts[1], DuplicateVerdict::duplicate(1, 0));
    assert!(!verdicts[2].is_duplicate);
}

#[test]
fn test_empty_and_mismatched_hashes_stay_unique() {
    let scenes = thumbs(&["", "", "abcd", "abc", "abcd"]);
    let verdicts = SceneDeduplicator::deduplicate(&scenes, 10);
    assert!(!verdicts[0].is_duplicate);
    assert!(!verdicts[1].is_duplicate);
    assert!(!verdicts[2].is_duplicate);
    assert!(!verdicts[3].is_duplicate);
    assert_eq!(verdicts[4], DuplicateVerdict::duplicate(4, 2));
    assert_eq!(SceneDeduplicator::unique_count(&verdicts), 4);
}

#[test]
fn test_build_candidates() {
    let scenes = vec![
        SceneThumbprint::new(0.0, 4.0, "aaaa"),
        SceneThumbprint::new(4.0, 9.0, "ffff"),
        SceneThumbprint::new(9.0, 15.0, "aaab"),
        SceneThumbprint::new(15.0, 75.0, "0000"),
        SceneThumbprint::new(75.0, 80.0, "1234"),
    ];
    let verdicts = SceneDeduplicator::deduplicate(&scenes, 1);
    assert!(verdicts[2].is_duplicate);

    let mut classifications = HashMap::new();
    classifications.insert(0, SceneClassification::new("slapping", 0.31));
    classifications.insert(1, SceneClassification::new("dialogue", 0.9));
    classifications.insert(3, SceneClassification::new("chase scene", 0.45));
    classifications.insert(4, SceneClassification::new("pratfall", 0.1));

    let candidates = SceneDeduplicator::build_candidates(
        &scenes,
        &verdicts,
        &classifications,
        &CandidateFilter::default(),
    );

    let ids: Vec<_> = candidates.iter().map(|c| c.scene_id).collect();
    assert_eq!(ids, vec![3, 0]);
    assert_eq!(candidates[0].label, "chase scene");
    assert_eq!(candidates[0].start_str, "00:15");
    assert_eq!(candidates[0].end_str, "01:15");
    assert_eq!(candidates[0].duration, 60.0);
    assert!(candidates.iter().all(|c| c.user_selected && !c.is_duplicate));
}
