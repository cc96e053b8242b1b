// Merge interactor - Turns a detection stream into clips

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::app::report::TextReport;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::DetectionMerger;
use crate::ports::*;

/// Interactor for the impact-merge use case
pub struct MergeInteractor {
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
}

impl MergeInteractor {
    /// Create new merge interactor with injected ports
    pub fn new(fs_port: Arc<dyn FsPort>, log_port: Arc<dyn LogPort>) -> Self {
        Self { fs_port, log_port }
    }

    /// Read detections from a JSON file and merge them
    pub async fn execute(&self, request: MergeRequest) -> Result<MergeResponse, DomainError> {
        let path = &request.detections_path;
        if !self.fs_port.file_exists(path).await? {
            return Err(DomainError::FsFail(format!(
                "Detections file does not exist: {}",
                path
            )));
        }

        let content = self.fs_port.read_to_string(path).await?;
        let detections = parse_detections(&content)?;
        self.log_port
            .info(&format!("Loaded {} detections from {}", detections.len(), path))
            .await;

        Ok(self.merge_detections(path, &detections, &request).await)
    }

    /// Merge already-loaded detections
    pub async fn merge_detections(
        &self,
        source: &str,
        detections: &[DetectionEvent],
        request: &MergeRequest,
    ) -> MergeResponse {
        let kept = DetectionMerger::filter_by_keywords(detections, &request.keywords);
        if kept.len() < detections.len() {
            self.log_port
                .debug(&format!(
                    "Keyword filter kept {} of {} detections",
                    kept.len(),
                    detections.len()
                ))
                .await;
        }

        let clips = DetectionMerger::merge(&kept, &request.params);
        self.log_port
            .info(&format!("Merged into {} clips", clips.len()))
            .await;

        MergeResponse {
            source: source.to_string(),
            detection_count: detections.len(),
            kept_count: kept.len(),
            params: request.params,
            keywords: request.keywords.clone(),
            clips,
            analyzed_at: Utc::now(),
        }
    }
}

/// Parse a JSON array of detections
pub fn parse_detections(content: &str) -> Result<Vec<DetectionEvent>, DomainError> {
    serde_json::from_str(content)
        .map_err(|e| DomainError::ParseFail(format!("Invalid detections JSON: {}", e)))
}

/// Request for the merge use case
#[derive(Debug, Clone)]
pub struct MergeRequest {
    pub detections_path: String,
    pub params: MergeParams,
    pub keywords: Vec<String>,
}

impl MergeRequest {
    pub fn new(detections_path: impl Into<String>, params: MergeParams) -> Self {
        Self {
            detections_path: detections_path.into(),
            params,
            keywords: Vec::new(),
        }
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }
}

/// Response from the merge use case
#[derive(Debug, Clone, Serialize)]
pub struct MergeResponse {
    pub source: String,
    pub detection_count: usize,
    pub kept_count: usize,
    pub params: MergeParams,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    pub clips: Vec<Clip>,
    pub analyzed_at: DateTime<Utc>,
}

impl TextReport for MergeResponse {
    fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} clips from {} detections ({} kept)\n",
            self.clips.len(),
            self.detection_count,
            self.kept_count
        ));
        output.push_str(&format!(
            "  min_duration={}s merge_gap={}s padding={}s\n",
            self.params.min_duration, self.params.merge_gap, self.params.padding
        ));

        for (i, clip) in self.clips.iter().enumerate() {
            output.push_str(&format!(
                "  #{:<3} {} - {}  {:<12} {:.2}  ({} detections: {})\n",
                i + 1,
                clip.start_str(),
                clip.end_str(),
                clip.primary_label,
                clip.confidence,
                clip.detection_count,
                clip.labels.join(", ")
            ));
        }

        output
    }
}
