// Scene interactor - Perceptual deduplication and candidate selection

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::report::TextReport;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::SceneDeduplicator;
use crate::ports::*;
use crate::utils::path::clip_file_name;
use crate::utils::time::format_timestamp;

/// One scene as read from a scenes file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneRecord {
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl SceneRecord {
    pub fn thumbprint(&self) -> SceneThumbprint {
        SceneThumbprint::new(self.start, self.end, self.hash.clone())
    }

    pub fn classification(&self) -> Option<SceneClassification> {
        self.label
            .as_ref()
            .map(|label| SceneClassification::new(label.clone(), self.confidence.unwrap_or(0.0)))
    }
}

/// Parse a JSON array of scenes
pub fn parse_scenes(content: &str) -> Result<Vec<SceneRecord>, DomainError> {
    serde_json::from_str(content)
        .map_err(|e| DomainError::ParseFail(format!("Invalid scenes JSON: {}", e)))
}

/// Interactor for scene deduplication and candidate building
pub struct SceneInteractor {
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
}

impl SceneInteractor {
    /// Create new scene interactor with injected ports
    pub fn new(fs_port: Arc<dyn FsPort>, log_port: Arc<dyn LogPort>) -> Self {
        Self { fs_port, log_port }
    }

    /// Load a scenes file
    pub async fn load_scenes(&self, path: &str) -> Result<Vec<SceneRecord>, DomainError> {
        if !self.fs_port.file_exists(path).await? {
            return Err(DomainError::FsFail(format!(
                "Scenes file does not exist: {}",
                path
            )));
        }
        let content = self.fs_port.read_to_string(path).await?;
        let scenes = parse_scenes(&content)?;
        self.log_port
            .info(&format!("Loaded {} scenes from {}", scenes.len(), path))
            .await;
        Ok(scenes)
    }

    /// Flag near-duplicate scenes
    pub async fn dedupe(
        &self,
        source: &str,
        scenes: &[SceneRecord],
        similarity_threshold: u32,
    ) -> DedupeResponse {
        let thumbprints: Vec<SceneThumbprint> = scenes.iter().map(|s| s.thumbprint()).collect();
        let verdicts = SceneDeduplicator::deduplicate(&thumbprints, similarity_threshold);
        let unique_count = SceneDeduplicator::unique_count(&verdicts);

        self.log_port
            .info(&format!(
                "{} unique scenes out of {} (threshold {})",
                unique_count,
                scenes.len(),
                similarity_threshold
            ))
            .await;

        let scenes = thumbprints
            .iter()
            .zip(&verdicts)
            .map(|(thumb, verdict)| SceneVerdict {
                index: verdict.index,
                start: thumb.start,
                end: thumb.end,
                is_duplicate: verdict.is_duplicate,
                duplicate_of: verdict.duplicate_of,
            })
            .collect();

        DedupeResponse {
            source: source.to_string(),
            similarity_threshold,
            scene_count: thumbprints.len(),
            unique_count,
            scenes,
            analyzed_at: Utc::now(),
        }
    }

    /// Deduplicate, then keep the classified scenes worth saving, best first
    pub async fn candidates(
        &self,
        source: &str,
        scenes: &[SceneRecord],
        similarity_threshold: u32,
        filter: &CandidateFilter,
    ) -> CandidatesResponse {
        let thumbprints: Vec<SceneThumbprint> = scenes.iter().map(|s| s.thumbprint()).collect();
        let verdicts = SceneDeduplicator::deduplicate(&thumbprints, similarity_threshold);

        let classifications: HashMap<usize, SceneClassification> = scenes
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.classification().map(|c| (i, c)))
            .collect();

        let title = title_from_source(source);
        let candidates: Vec<CandidateEntry> =
            SceneDeduplicator::build_candidates(&thumbprints, &verdicts, &classifications, filter)
                .into_iter()
                .map(|candidate| CandidateEntry {
                    file_name: clip_file_name(&title, candidate.start, &candidate.label),
                    candidate,
                })
                .collect();

        self.log_port
            .info(&format!(
                "{} candidates from {} scenes",
                candidates.len(),
                scenes.len()
            ))
            .await;

        CandidatesResponse {
            source: source.to_string(),
            similarity_threshold,
            filter: filter.clone(),
            scene_count: scenes.len(),
            unique_count: SceneDeduplicator::unique_count(&verdicts),
            candidates,
            analyzed_at: Utc::now(),
        }
    }
}

/// File stem of the scenes file, used as the clip title
fn title_from_source(source: &str) -> String {
    Path::new(source)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "clip".to_string())
}

/// Deduplication outcome with the scene's time range
#[derive(Debug, Clone, Serialize)]
pub struct SceneVerdict {
    pub index: usize,
    pub start: f64,
    pub end: f64,
    pub is_duplicate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_of: Option<usize>,
}

/// Response from deduplication
#[derive(Debug, Clone, Serialize)]
pub struct DedupeResponse {
    pub source: String,
    pub similarity_threshold: u32,
    pub scene_count: usize,
    pub unique_count: usize,
    pub scenes: Vec<SceneVerdict>,
    pub analyzed_at: DateTime<Utc>,
}

impl TextReport for DedupeResponse {
    fn to_text(&self) -> String {
        let mut output = format!(
            "{} unique of {} scenes (threshold {})\n",
            self.unique_count, self.scene_count, self.similarity_threshold
        );
        for scene in &self.scenes {
            let status = match scene.duplicate_of {
                Some(of) => format!("duplicate of #{}", of),
                None => "unique".to_string(),
            };
            output.push_str(&format!(
                "  #{:<3} {} - {}  {}\n",
                scene.index,
                format_timestamp(scene.start),
                format_timestamp(scene.end),
                status
            ));
        }
        output
    }
}

/// A candidate with its suggested output file name
#[derive(Debug, Clone, Serialize)]
pub struct CandidateEntry {
    #[serde(flatten)]
    pub candidate: SceneCandidate,
    pub file_name: String,
}

/// Response from candidate building
#[derive(Debug, Clone, Serialize)]
pub struct CandidatesResponse {
    pub source: String,
    pub similarity_threshold: u32,
    pub filter: CandidateFilter,
    pub scene_count: usize,
    pub unique_count: usize,
    pub candidates: Vec<CandidateEntry>,
    pub analyzed_at: DateTime<Utc>,
}

impl TextReport for CandidatesResponse {
    fn to_text(&self) -> String {
        let mut output = format!(
            "{} candidates ({} unique of {} scenes)\n",
            self.candidates.len(),
            self.unique_count,
            self.scene_count
        );
        for entry in &self.candidates {
            let c = &entry.candidate;
            output.push_str(&format!(
                "  #{:<3} {} - {}  {:<12} {:.2}  {}\n",
                c.scene_id, c.start_str, c.end_str, c.label, c.confidence, entry.file_name
            ));
        }
        output
    }
}
