// Assess interactor - Orchestrates codec compatibility assessment

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::app::report::TextReport;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::{CompatibilityAssessor, CompatibilitySummary, ConversionPlan};
use crate::ports::*;
use crate::utils::logging::LogLevel;
use crate::utils::time::format_timestamp;
use crate::utils::Utils;

/// Interactor for single-file and batch compatibility assessment
pub struct AssessInteractor {
    probe_port: Arc<dyn ProbePort>,
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
}

impl AssessInteractor {
    /// Create new assess interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
    ) -> Self {
        Self {
            probe_port,
            fs_port,
            log_port,
        }
    }

    /// Probe a file and assess it
    pub async fn assess_file(&self, input: &str) -> Result<AssessResponse, DomainError> {
        self.log_port
            .info(&format!("Assessing compatibility of: {}", input))
            .await;

        if !self.fs_port.file_exists(input).await? {
            return Err(DomainError::FsFail(format!(
                "Input file does not exist: {}",
                input
            )));
        }

        let mut observation = self.probe_port.probe_codecs(input).await?;
        if observation.file_size.is_none() {
            observation.file_size = self.fs_port.get_file_size(input).await.ok();
        }

        Ok(self.assess_observation(input, observation).await)
    }

    /// Assess codec facts supplied directly
    pub async fn assess_observation(
        &self,
        source: &str,
        observation: CodecObservation,
    ) -> AssessResponse {
        let assessment = CompatibilityAssessor::assess(&observation);
        let plan = ConversionPlan::for_assessment(&assessment);

        self.log_port
            .log_event(
                &LogEvent::new(LogLevel::Debug, "Compatibility assessed")
                    .with("source", source)
                    .with("tier", assessment.tier)
                    .with("issues", assessment.issues.len()),
            )
            .await;

        AssessResponse {
            source: source.to_string(),
            observation,
            assessment,
            plan,
            conversion_command: None,
            analyzed_at: Utc::now(),
        }
    }

    /// Assess every media file under a directory; files that fail to probe are skipped
    pub async fn assess_directory(
        &self,
        dir: &str,
        extensions: &[String],
    ) -> Result<BatchResponse, DomainError> {
        if !self.fs_port.directory_exists(dir).await? {
            return Err(DomainError::FsFail(format!(
                "Directory does not exist: {}",
                dir
            )));
        }

        // Fail fast when the prober cannot be launched
        if !self.probe_port.is_available().await {
            return Err(DomainError::ToolMissing(
                "ffprobe is not available. Please install FFmpeg or set probe.ffprobe_path"
                    .to_string(),
            ));
        }

        let files = self.fs_port.list_files(dir, extensions).await?;
        self.log_port
            .info(&format!("Found {} media files in {}", files.len(), dir))
            .await;

        let mut assessed = Vec::with_capacity(files.len());
        let mut skipped = Vec::new();

        for path in files {
            match self.probe_port.probe_codecs(&path).await {
                Ok(observation) => {
                    let assessment = CompatibilityAssessor::assess(&observation);
                    assessed.push(AssessedMedia {
                        path,
                        observation,
                        assessment,
                    });
                }
                Err(e) => {
                    self.log_port
                        .warn(&format!("Skipping {}: {}", path, e))
                        .await;
                    skipped.push(SkippedFile {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let summary = CompatibilityAssessor::summarize(&assessed);
        self.log_port
            .info(&format!(
                "Assessed {} files, {} need conversion, {} skipped",
                summary.total,
                summary.needs_conversion,
                skipped.len()
            ))
            .await;

        Ok(BatchResponse {
            directory: dir.to_string(),
            summary,
            files: assessed,
            skipped,
            analyzed_at: Utc::now(),
        })
    }
}

/// Response from a single assessment
#[derive(Debug, Clone, Serialize)]
pub struct AssessResponse {
    pub source: String,
    pub observation: CodecObservation,
    pub assessment: CompatibilityAssessment,
    pub plan: ConversionPlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion_command: Option<String>,
    pub analyzed_at: DateTime<Utc>,
}

impl AssessResponse {
    /// Fill in the encoder command line that writes a compatible copy to `output`.
    /// Stays empty when nothing needs re-encoding.
    pub fn plan_conversion(&mut self, output: &str) {
        self.conversion_command = if self.plan.is_noop() {
            None
        } else {
            let args = self.plan.encoder_args(&self.source, output);
            Some(format!("ffmpeg {}", args.join(" ")))
        };
    }
}

impl TextReport for AssessResponse {
    fn to_text(&self) -> String {
        let obs = &self.observation;
        let mut output = String::new();

        output.push_str("Compatibility Assessment:\n");
        output.push_str(&format!("  Source: {}\n", self.source));
        output.push_str(&format!("  Tier: {}\n", self.assessment.tier));
        output.push_str(&format!(
            "  Video: {} ({})\n",
            display_codec(&obs.video_codec),
            self.assessment.video_codec.as_str()
        ));
        output.push_str(&format!(
            "  Audio: {} ({})\n",
            display_codec(&obs.audio_codec),
            self.assessment.audio_codec.as_str()
        ));
        output.push_str(&format!("  Container: {}\n", display_codec(&obs.container)));

        if obs.width.is_some() || obs.frame_rate.is_some() {
            output.push_str(&format!(
                "  Resolution: {} @ {}\n",
                obs.resolution(),
                Utils::format_fps(obs.frame_rate)
            ));
        }
        if let Some(duration) = obs.duration {
            output.push_str(&format!("  Duration: {}\n", format_timestamp(duration)));
        }
        if let Some(size) = obs.file_size {
            output.push_str(&format!("  File Size: {}\n", Utils::format_file_size(size)));
        }

        if self.assessment.issues.is_empty() {
            output.push_str("\nNo compatibility issues found\n");
        } else {
            output.push_str(&format!("\nIssues ({}):\n", self.assessment.issues.len()));
            for issue in &self.assessment.issues {
                output.push_str(&format!("  - {}\n", issue));
            }
        }

        if self.plan.is_noop() {
            output.push_str("Conversion: not needed\n");
        } else {
            let mut streams = Vec::new();
            if self.plan.convert_video {
                streams.push(format!("video -> {}", self.plan.video_encoder));
            }
            if self.plan.convert_audio {
                streams.push(format!(
                    "audio -> {} {}",
                    self.plan.audio_encoder, self.plan.audio_bitrate
                ));
            }
            output.push_str(&format!("Conversion: {}\n", streams.join(", ")));
        }

        if let Some(command) = &self.conversion_command {
            output.push_str(&format!("Command: {}\n", command));
        }

        output
    }
}

fn display_codec(raw: &str) -> &str {
    if raw.is_empty() {
        "none"
    } else {
        raw
    }
}

/// A file the batch run could not probe
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// Response from a batch assessment
#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    pub directory: String,
    pub summary: CompatibilitySummary,
    pub files: Vec<AssessedMedia>,
    pub skipped: Vec<SkippedFile>,
    pub analyzed_at: DateTime<Utc>,
}

impl TextReport for BatchResponse {
    fn to_text(&self) -> String {
        let summary = &self.summary;
        let mut output = String::new();

        output.push_str(&format!("Compatibility Summary for {}:\n", self.directory));
        output.push_str(&format!("  Files assessed: {}\n", summary.total));
        for (tier, count) in &summary.by_tier {
            output.push_str(&format!("    {:<10} {}\n", tier.as_str(), count));
        }

        output.push_str("\nVideo codecs:\n");
        for (codec, count) in &summary.by_video_codec {
            output.push_str(&format!("    {:<10} {}\n", codec, count));
        }
        output.push_str("Audio codecs:\n");
        for (codec, count) in &summary.by_audio_codec {
            output.push_str(&format!("    {:<10} {}\n", codec, count));
        }

        output.push_str(&format!(
            "\nNeeds conversion: {}\n",
            summary.needs_conversion
        ));
        for path in &summary.files_needing_conversion {
            output.push_str(&format!("  - {}\n", path));
        }

        if !self.skipped.is_empty() {
            output.push_str(&format!("\nSkipped ({}):\n", self.skipped.len()));
            for skipped in &self.skipped {
                output.push_str(&format!("  - {}: {}\n", skipped.path, skipped.reason));
            }
        }

        output
    }
}
