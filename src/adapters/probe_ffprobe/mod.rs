//! FFprobe adapter for media file probing
//!
//! Runs `ffprobe -v quiet -print_format json -show_format -show_streams` and
//! reduces the output to a [`CodecObservation`]. Only the first video and the
//! first audio stream are considered.

use std::io::ErrorKind;
use std::process::Output;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    #[serde(default)]
    codec_type: String,
    #[serde(default)]
    codec_name: String,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    #[serde(default)]
    format_name: String,
    duration: Option<String>,
    size: Option<String>,
}

/// Parse ffprobe's JSON output
pub fn parse_ffprobe_json(json: &str) -> Result<CodecObservation, DomainError> {
    let output: FfprobeOutput = serde_json::from_str(json)
        .map_err(|e| DomainError::ParseFail(format!("Invalid ffprobe output: {}", e)))?;

    let mut observation = CodecObservation::default();

    if let Some(format) = &output.format {
        observation.container = format.format_name.clone();
        observation.duration = format.duration.as_deref().and_then(|d| d.parse().ok());
        observation.file_size = format.size.as_deref().and_then(|s| s.parse().ok());
    }

    if let Some(video) = output.streams.iter().find(|s| s.codec_type == "video") {
        observation.video_codec = video.codec_name.to_lowercase();
        observation.width = video.width;
        observation.height = video.height;
        observation.frame_rate = video.r_frame_rate.as_deref().and_then(parse_frame_rate);
    }

    if let Some(audio) = output.streams.iter().find(|s| s.codec_type == "audio") {
        observation.audio_codec = audio.codec_name.to_lowercase();
    }

    Ok(observation)
}

/// "30000/1001" -> 29.97; zero denominators yield None
fn parse_frame_rate(raw: &str) -> Option<f64> {
    match raw.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den > 0.0 {
                Some(num / den)
            } else {
                None
            }
        }
        None => raw.trim().parse().ok(),
    }
}

/// FFprobe-based probe adapter
pub struct FfprobeAdapter {
    program: String,
    timeout: Duration,
}

impl FfprobeAdapter {
    /// Create new FFprobe adapter
    pub fn new(program: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            program: program.into(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Run ffprobe to completion, killing it once the timeout elapses
    async fn run(&self, mut command: Command, what: &str) -> Result<Output, DomainError> {
        command.kill_on_drop(true);

        tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                DomainError::Timeout(format!(
                    "{} timed out after {}s {}",
                    self.program,
                    self.timeout.as_secs(),
                    what
                ))
            })?
            .map_err(|e| self.spawn_error(e))
    }

    fn spawn_error(&self, e: std::io::Error) -> DomainError {
        if e.kind() == ErrorKind::NotFound {
            DomainError::ToolMissing(format!(
                "{} not found. Please install FFmpeg or set probe.ffprobe_path",
                self.program
            ))
        } else {
            DomainError::ProbeFail(format!("Failed to run {}: {}", self.program, e))
        }
    }
}

impl Default for FfprobeAdapter {
    fn default() -> Self {
        Self::new("ffprobe", 30)
    }
}

#[async_trait]
impl ProbePort for FfprobeAdapter {
    async fn probe_codecs(&self, file_path: &str) -> Result<CodecObservation, DomainError> {
        debug!(program = %self.program, file = file_path, "Running ffprobe");

        let mut command = Command::new(&self.program);
        command
            .args(["-v", "quiet", "-print_format", "json", "-show_format", "-show_streams"])
            .arg(file_path);

        let output = self
            .run(command, &format!("analyzing: {}", file_path))
            .await?;

        if !output.status.success() {
            return Err(DomainError::ProbeFail(format!(
                "ffprobe exited with {} for {}",
                output.status, file_path
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_ffprobe_json(&stdout)
    }

    async fn is_available(&self) -> bool {
        let mut command = Command::new(&self.program);
        command.arg("-version");

        match self.run(command, "reporting its version").await {
            Ok(output) => output.status.success(),
            Err(e) => {
                debug!("ffprobe unavailable: {}", e);
                false
            }
        }
    }
}
