//! Command-line argument definitions

use clap::Args;

/// Arguments for the assess command
#[derive(Args, Debug)]
pub struct AssessArgs {
    /// Media file to probe with ffprobe
    #[arg(
        short,
        long,
        required_unless_present = "video_codec",
        conflicts_with_all = ["video_codec", "audio_codec", "container"]
    )]
    pub input: Option<String>,

    /// Video codec name, when assessing without a file (e.g. h264, vp9)
    #[arg(long)]
    pub video_codec: Option<String>,

    /// Audio codec name (e.g. aac, opus)
    #[arg(long, requires = "video_codec")]
    pub audio_codec: Option<String>,

    /// Container format name (e.g. mp4, webm)
    #[arg(long, requires = "video_codec")]
    pub container: Option<String>,

    /// Also print the ffmpeg command that writes a compatible copy here
    #[arg(long, value_name = "OUTPUT")]
    pub plan: Option<String>,

    /// Output format (text, json, yaml)
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Arguments for the batch command
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Folder to scan recursively
    #[arg(short, long)]
    pub dir: String,

    /// Comma separated extensions (default: mp4,mkv,mov,webm,avi,m4v)
    #[arg(long)]
    pub ext: Option<String>,

    /// Output format (text, json, yaml)
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Arguments for the merge command
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// JSON array of {timestamp, label, confidence}
    #[arg(short, long)]
    pub detections: String,

    /// Minimum clip length in seconds
    #[arg(long)]
    pub min_duration: Option<f64>,

    /// Largest gap in seconds that still joins two detections
    #[arg(long)]
    pub merge_gap: Option<f64>,

    /// Seconds added before the first and after the last detection
    #[arg(long)]
    pub padding: Option<f64>,

    /// Comma separated label keywords to keep
    #[arg(long)]
    pub keywords: Option<String>,

    /// Output format (text, json, yaml)
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Arguments for the dedupe command
#[derive(Args, Debug)]
pub struct DedupeArgs {
    /// JSON array of {start, end, hash}
    #[arg(short, long)]
    pub scenes: String,

    /// Largest Hamming distance counted as a duplicate
    #[arg(long)]
    pub threshold: Option<u32>,

    /// Output format (text, json, yaml)
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Arguments for the candidates command
#[derive(Args, Debug)]
pub struct CandidatesArgs {
    /// JSON array of {start, end, hash, label, confidence}
    #[arg(short, long)]
    pub scenes: String,

    /// Largest Hamming distance counted as a duplicate
    #[arg(long)]
    pub threshold: Option<u32>,

    /// Minimum classifier confidence
    #[arg(long)]
    pub min_confidence: Option<f64>,

    /// Comma separated labels to drop
    #[arg(long)]
    pub exclude: Option<String>,

    /// Output format (text, json, yaml)
    #[arg(long, default_value = "text")]
    pub format: String,
}
