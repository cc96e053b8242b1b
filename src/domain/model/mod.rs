// Domain models - Core types and data structures

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::utils::time::format_timestamp;

/// Normalized video codec family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoCodec {
    H264,
    Hevc,
    Vp9,
    Av1,
    Unknown,
}

impl VideoCodec {
    /// Map a raw prober codec name onto a family. Never fails.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "h264" | "avc" | "avc1" => VideoCodec::H264,
            "hevc" | "h265" | "hev1" => VideoCodec::Hevc,
            "vp9" => VideoCodec::Vp9,
            "av1" => VideoCodec::Av1,
            _ => VideoCodec::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoCodec::H264 => "h264",
            VideoCodec::Hevc => "hevc",
            VideoCodec::Vp9 => "vp9",
            VideoCodec::Av1 => "av1",
            VideoCodec::Unknown => "unknown",
        }
    }
}

/// Normalized audio codec family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCodec {
    Aac,
    Mp3,
    Opus,
    Flac,
    Ac3,
    Vorbis,
    Unknown,
}

impl AudioCodec {
    /// Map a raw prober codec name onto a family. Never fails.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "aac" => AudioCodec::Aac,
            "mp3" => AudioCodec::Mp3,
            "opus" => AudioCodec::Opus,
            "flac" => AudioCodec::Flac,
            "ac3" | "eac3" => AudioCodec::Ac3,
            "vorbis" => AudioCodec::Vorbis,
            _ => AudioCodec::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioCodec::Aac => "aac",
            AudioCodec::Mp3 => "mp3",
            AudioCodec::Opus => "opus",
            AudioCodec::Flac => "flac",
            AudioCodec::Ac3 => "ac3",
            AudioCodec::Vorbis => "vorbis",
            AudioCodec::Unknown => "unknown",
        }
    }
}

/// Raw codec facts about one media file, as reported by the prober
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodecObservation {
    pub video_codec: String,
    pub audio_codec: String,
    pub container: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

impl CodecObservation {
    /// Create an observation from codec names and container string
    pub fn new(video_codec: &str, audio_codec: &str, container: &str) -> Self {
        Self {
            video_codec: video_codec.trim().to_lowercase(),
            audio_codec: audio_codec.trim().to_lowercase(),
            container: container.trim().to_string(),
            ..Self::default()
        }
    }

    pub fn video_family(&self) -> VideoCodec {
        VideoCodec::parse(&self.video_codec)
    }

    pub fn audio_family(&self) -> AudioCodec {
        AudioCodec::parse(&self.audio_codec)
    }

    /// True for MP4/MOV-family containers (ffprobe reports "mov,mp4,m4a,3gp,3g2,mj2")
    pub fn is_mp4_family(&self) -> bool {
        let container = self.container.to_lowercase();
        container.contains("mp4") || container.contains("mov")
    }

    /// Resolution as "WxH", or "Unknown"
    pub fn resolution(&self) -> String {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => format!("{}x{}", w, h),
            _ => "Unknown".to_string(),
        }
    }
}

/// Compatibility severity, ordered from best to worst
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityTier {
    #[default]
    Excellent,
    Good,
    Moderate,
    Poor,
    VeryPoor,
}

impl CompatibilityTier {
    pub const ALL: &'static [CompatibilityTier] = &[
        CompatibilityTier::Excellent,
        CompatibilityTier::Good,
        CompatibilityTier::Moderate,
        CompatibilityTier::Poor,
        CompatibilityTier::VeryPoor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompatibilityTier::Excellent => "excellent",
            CompatibilityTier::Good => "good",
            CompatibilityTier::Moderate => "moderate",
            CompatibilityTier::Poor => "poor",
            CompatibilityTier::VeryPoor => "very_poor",
        }
    }

    /// Raise to at least `floor`; never lowers the tier
    pub fn at_least(self, floor: CompatibilityTier) -> Self {
        self.max(floor)
    }
}

impl fmt::Display for CompatibilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of assessing one observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityAssessment {
    pub tier: CompatibilityTier,
    pub issues: Vec<String>,
    pub video_codec: VideoCodec,
    pub audio_codec: AudioCodec,
}

impl CompatibilityAssessment {
    /// Poor or worse playback support
    pub fn needs_conversion(&self) -> bool {
        self.tier >= CompatibilityTier::Poor
    }

    pub fn video_needs_conversion(&self) -> bool {
        matches!(self.video_codec, VideoCodec::Vp9 | VideoCodec::Av1)
    }

    pub fn audio_needs_conversion(&self) -> bool {
        self.audio_codec == AudioCodec::Opus
    }
}

/// An assessed file, as produced by batch runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessedMedia {
    pub path: String,
    pub observation: CodecObservation,
    pub assessment: CompatibilityAssessment,
}

/// One timestamped observation from an external inference process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionEvent {
    pub timestamp: f64,
    #[serde(alias = "action_class")]
    pub label: String,
    pub confidence: f64,
}

impl DetectionEvent {
    pub fn new(timestamp: f64, label: impl Into<String>, confidence: f64) -> Self {
        Self {
            timestamp,
            label: label.into(),
            confidence,
        }
    }
}

/// Parameters for grouping detections into clips
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMergeParams")]
pub struct MergeParams {
    pub min_duration: f64,
    pub merge_gap: f64,
    pub padding: f64,
}

impl MergeParams {
    /// Create merge parameters with validation
    pub fn new(min_duration: f64, merge_gap: f64, padding: f64) -> Result<Self, DomainError> {
        if !min_duration.is_finite() || min_duration <= 0.0 {
            return Err(DomainError::BadArgs(format!(
                "min_duration must be positive, got {}",
                min_duration
            )));
        }
        if !merge_gap.is_finite() || merge_gap < 0.0 {
            return Err(DomainError::BadArgs(format!(
                "merge_gap cannot be negative, got {}",
                merge_gap
            )));
        }
        if !padding.is_finite() || padding < 0.0 {
            return Err(DomainError::BadArgs(format!(
                "padding cannot be negative, got {}",
                padding
            )));
        }

        Ok(Self {
            min_duration,
            merge_gap,
            padding,
        })
    }
}

/// Unvalidated wire form of [`MergeParams`]
#[derive(Deserialize)]
struct RawMergeParams {
    min_duration: f64,
    merge_gap: f64,
    padding: f64,
}

impl TryFrom<RawMergeParams> for MergeParams {
    type Error = DomainError;

    fn try_from(raw: RawMergeParams) -> Result<Self, Self::Error> {
        MergeParams::new(raw.min_duration, raw.merge_gap, raw.padding)
    }
}

impl Default for MergeParams {
    fn default() -> Self {
        Self {
            min_duration: 5.0,
            merge_gap: 3.0,
            padding: 2.0,
        }
    }
}

/// A clip formed from one group of nearby detections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub start: f64,
    pub end: f64,
    /// Contributing labels, unique, in order of first appearance
    pub labels: Vec<String>,
    pub primary_label: String,
    pub confidence: f64,
    pub detection_count: usize,
}

impl Clip {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn start_str(&self) -> String {
        format_timestamp(self.start)
    }

    pub fn end_str(&self) -> String {
        format_timestamp(self.end)
    }

    /// Open-interval overlap; clips that only touch do not overlap
    pub fn overlaps(&self, other: &Clip) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A scene's time range plus its thumbnail's perceptual hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneThumbprint {
    pub start: f64,
    pub end: f64,
    /// Empty when hashing failed upstream
    #[serde(default)]
    pub hash: String,
}

impl SceneThumbprint {
    pub fn new(start: f64, end: f64, hash: impl Into<String>) -> Self {
        Self {
            start,
            end,
            hash: hash.into(),
        }
    }
}

/// Deduplication outcome for one scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateVerdict {
    pub index: usize,
    pub is_duplicate: bool,
    pub duplicate_of: Option<usize>,
}

impl DuplicateVerdict {
    pub fn unique(index: usize) -> Self {
        Self {
            index,
            is_duplicate: false,
            duplicate_of: None,
        }
    }

    pub fn duplicate(index: usize, of: usize) -> Self {
        Self {
            index,
            is_duplicate: true,
            duplicate_of: Some(of),
        }
    }
}

/// Label assigned to a scene thumbnail by an external classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneClassification {
    pub label: String,
    pub confidence: f64,
}

impl SceneClassification {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }

    pub fn unknown() -> Self {
        Self::new("unknown", 0.0)
    }
}

/// Which scenes are worth presenting to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateFilter {
    pub min_confidence: f64,
    pub exclude_labels: Vec<String>,
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self {
            min_confidence: 0.20,
            exclude_labels: ["dialogue", "scenery", "credits", "unknown", "error"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl CandidateFilter {
    pub fn excludes(&self, label: &str) -> bool {
        self.exclude_labels.iter().any(|l| l == label)
    }
}

/// A unique, classified scene offered to the user for saving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneCandidate {
    pub scene_id: usize,
    pub start: f64,
    pub end: f64,
    pub duration: f64,
    pub start_str: String,
    pub end_str: String,
    pub label: String,
    pub confidence: f64,
    pub hash: String,
    pub is_duplicate: bool,
    pub duplicate_of: Option<usize>,
    pub user_selected: bool,
}
