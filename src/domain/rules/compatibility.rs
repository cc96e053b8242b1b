// Codec compatibility rules for mobile and media-server playback

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::model::*;

const AV1_ISSUE: &str = "AV1 video: Very limited device support, will not play on most mobiles/TVs";
const VP9_ISSUE: &str = "VP9 video: Limited hardware decoding on mobile devices";
const HEVC_ISSUE: &str = "HEVC/H.265 video: Some older devices may not support";
const OPUS_IN_MP4_ISSUE: &str = "Opus audio in MP4: Not supported on most mobile devices";
const OPUS_ISSUE: &str = "Opus audio: May have compatibility issues";
const VORBIS_ISSUE: &str = "Vorbis audio: Limited support outside WebM";
const FLAC_ISSUE: &str = "FLAC audio: Not all devices support in video containers";

/// Business rules for codec compatibility
pub struct CompatibilityAssessor;

impl CompatibilityAssessor {
    /// Assess an observation. Unknown codecs contribute no issue.
    pub fn assess(observation: &CodecObservation) -> CompatibilityAssessment {
        let video_codec = observation.video_family();
        let audio_codec = observation.audio_family();

        let mut tier = CompatibilityTier::Excellent;
        let mut issues = Vec::new();

        if let Some((issue, floor)) = Self::video_rule(video_codec) {
            issues.push(issue.to_string());
            tier = tier.at_least(floor);
        }

        if let Some((issue, floor)) = Self::audio_rule(audio_codec, observation.is_mp4_family()) {
            issues.push(issue.to_string());
            tier = tier.at_least(floor);
        }

        CompatibilityAssessment {
            tier,
            issues,
            video_codec,
            audio_codec,
        }
    }

    fn video_rule(codec: VideoCodec) -> Option<(&'static str, CompatibilityTier)> {
        match codec {
            VideoCodec::Av1 => Some((AV1_ISSUE, CompatibilityTier::VeryPoor)),
            VideoCodec::Vp9 => Some((VP9_ISSUE, CompatibilityTier::Poor)),
            VideoCodec::Hevc => Some((HEVC_ISSUE, CompatibilityTier::Moderate)),
            VideoCodec::H264 | VideoCodec::Unknown => None,
        }
    }

    fn audio_rule(
        codec: AudioCodec,
        mp4_family: bool,
    ) -> Option<(&'static str, CompatibilityTier)> {
        match codec {
            AudioCodec::Opus if mp4_family => Some((OPUS_IN_MP4_ISSUE, CompatibilityTier::Poor)),
            AudioCodec::Opus => Some((OPUS_ISSUE, CompatibilityTier::Moderate)),
            AudioCodec::Vorbis => Some((VORBIS_ISSUE, CompatibilityTier::Moderate)),
            AudioCodec::Flac => Some((FLAC_ISSUE, CompatibilityTier::Good)),
            _ => None,
        }
    }

    /// Aggregate counts over a batch of assessed files
    pub fn summarize(media: &[AssessedMedia]) -> CompatibilitySummary {
        let mut by_tier: BTreeMap<CompatibilityTier, usize> = CompatibilityTier::ALL
            .iter()
            .map(|tier| (*tier, 0))
            .collect();
        let mut by_video_codec = BTreeMap::new();
        let mut by_audio_codec = BTreeMap::new();
        let mut files_needing_conversion = Vec::new();

        for item in media {
            *by_tier.entry(item.assessment.tier).or_insert(0) += 1;
            *by_video_codec
                .entry(item.assessment.video_codec.as_str().to_string())
                .or_insert(0) += 1;
            *by_audio_codec
                .entry(item.assessment.audio_codec.as_str().to_string())
                .or_insert(0) += 1;

            if item.assessment.needs_conversion() {
                files_needing_conversion.push(item.path.clone());
            }
        }

        CompatibilitySummary {
            total: media.len(),
            by_tier,
            by_video_codec,
            by_audio_codec,
            needs_conversion: files_needing_conversion.len(),
            files_needing_conversion,
        }
    }
}

/// Counts by tier and codec over a batch of files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilitySummary {
    pub total: usize,
    pub by_tier: BTreeMap<CompatibilityTier, usize>,
    pub by_video_codec: BTreeMap<String, usize>,
    pub by_audio_codec: BTreeMap<String, usize>,
    pub needs_conversion: usize,
    pub files_needing_conversion: Vec<String>,
}

/// Encoder settings that would bring a file up to H.264/AAC
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionPlan {
    pub convert_video: bool,
    pub convert_audio: bool,
    pub video_encoder: String,
    pub audio_encoder: String,
    pub audio_bitrate: String,
    pub crf: u8,
}

impl Default for ConversionPlan {
    fn default() -> Self {
        Self {
            convert_video: false,
            convert_audio: true,
            video_encoder: "libx264".to_string(),
            audio_encoder: "aac".to_string(),
            audio_bitrate: "192k".to_string(),
            crf: 23,
        }
    }
}

impl ConversionPlan {
    /// Re-encode only the streams the assessment flags
    pub fn for_assessment(assessment: &CompatibilityAssessment) -> Self {
        Self {
            convert_video: assessment.video_needs_conversion(),
            convert_audio: assessment.audio_needs_conversion(),
            ..Self::default()
        }
    }

    /// Nothing to re-encode
    pub fn is_noop(&self) -> bool {
        !self.convert_video && !self.convert_audio
    }

    /// Arguments for the external encoder, excluding the program name
    pub fn encoder_args(&self, input: &str, output: &str) -> Vec<String> {
        let mut args: Vec<String> = vec!["-y".into(), "-i".into(), input.into()];

        if self.convert_video {
            args.extend([
                "-c:v".to_string(),
                self.video_encoder.clone(),
                "-crf".to_string(),
                self.crf.to_string(),
                "-preset".to_string(),
                "medium".to_string(),
            ]);
        } else {
            args.extend(["-c:v".to_string(), "copy".to_string()]);
        }

        if self.convert_audio {
            args.extend([
                "-c:a".to_string(),
                self.audio_encoder.clone(),
                "-b:a".to_string(),
                self.audio_bitrate.clone(),
            ]);
        } else {
            args.extend(["-c:a".to_string(), "copy".to_string()]);
        }

        args.extend([
            "-movflags".to_string(),
            "+faststart".to_string(),
            output.to_string(),
        ]);
        args
    }
}
