//! clipsift library
//!
//! Three heuristics for a video downloader's post-processing stage:
//!
//! - codec compatibility assessment ([`CompatibilityAssessor`])
//! - merging detector output into clips ([`DetectionMerger`])
//! - perceptual-hash scene deduplication ([`SceneDeduplicator`])
//!
//! The heuristics are pure and synchronous. Probing, file access,
//! configuration and logging sit behind the traits in [`ports`].

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{
    Clip, CodecObservation, CompatibilityAssessment, CompatibilityTier, DetectionEvent,
    DuplicateVerdict, MergeParams, SceneCandidate, SceneThumbprint,
};
pub use domain::rules::{
    hamming_distance, CompatibilityAssessor, ConversionPlan, DetectionMerger, SceneDeduplicator,
};
pub use error::{ClipsiftError, ClipsiftResult};

use std::path::Path;

use app::scene_interactor::SceneRecord;

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> ClipsiftResult<T> {
    if !path.is_file() {
        return Err(ClipsiftError::InputFileNotFound {
            path: path.display().to_string(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Read a JSON array of detections straight from disk
pub fn read_detections(path: impl AsRef<Path>) -> ClipsiftResult<Vec<DetectionEvent>> {
    read_json(path.as_ref())
}

/// Read a JSON array of scenes straight from disk
pub fn read_scenes(path: impl AsRef<Path>) -> ClipsiftResult<Vec<SceneRecord>> {
    read_json(path.as_ref())
}
