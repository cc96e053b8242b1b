// Ports - Interface definitions (contracts)

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::utils::logging::LogLevel;

/// Port for media probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Probe a media file and return its codec facts
    async fn probe_codecs(&self, file_path: &str) -> Result<CodecObservation, DomainError>;

    /// Check whether the prober can be launched at all
    async fn is_available(&self) -> bool;
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Check if file exists
    async fn file_exists(&self, file_path: &str) -> Result<bool, DomainError>;

    /// Check if directory exists
    async fn directory_exists(&self, dir_path: &str) -> Result<bool, DomainError>;

    /// Get file size
    async fn get_file_size(&self, file_path: &str) -> Result<u64, DomainError>;

    /// Read a whole text file
    async fn read_to_string(&self, file_path: &str) -> Result<String, DomainError>;

    /// Recursively list files under `dir_path` with one of `extensions`, sorted
    async fn list_files(
        &self,
        dir_path: &str,
        extensions: &[String],
    ) -> Result<Vec<String>, DomainError>;
}

/// Port for configuration management
#[async_trait]
pub trait ConfigPort: Send + Sync {
    /// Snapshot of the current configuration
    async fn analysis_config(&self) -> Result<AnalysisConfig, DomainError>;

    /// Set one value by dotted key, e.g. `merge.padding`
    async fn set_config(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Load configuration from file, layered over the current values
    async fn load_config(&self, file_path: &str) -> Result<(), DomainError>;

    /// Apply `CLIPSIFT_*` environment overrides; returns how many were applied
    async fn apply_env_overrides(&self) -> Result<usize, DomainError>;

    /// Validate configuration
    async fn validate_config(&self) -> Result<(), DomainError>;

    /// Path of the loaded configuration file, if any
    async fn get_config_file_path(&self) -> Result<Option<String>, DomainError>;
}

/// Port for logging and observability
#[async_trait]
pub trait LogPort: Send + Sync {
    /// Log info message
    async fn info(&self, message: &str);

    /// Log warning message
    async fn warn(&self, message: &str);

    /// Log error message
    async fn error(&self, message: &str);

    /// Log debug message
    async fn debug(&self, message: &str);

    /// Log structured event
    async fn log_event(&self, event: &LogEvent);
}

/// Log event with structured data
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
    pub context: HashMap<String, String>,
}

impl LogEvent {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            context: HashMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }
}

/// Complete analysis configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub merge: MergeSection,
    pub dedupe: DedupeSection,
    pub probe: ProbeSection,
    pub logging: LoggingSection,
}

/// `[merge]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeSection {
    pub min_duration: f64,
    pub merge_gap: f64,
    pub padding: f64,
}

impl Default for MergeSection {
    fn default() -> Self {
        let params = MergeParams::default();
        Self {
            min_duration: params.min_duration,
            merge_gap: params.merge_gap,
            padding: params.padding,
        }
    }
}

impl MergeSection {
    pub fn params(&self) -> Result<MergeParams, DomainError> {
        MergeParams::new(self.min_duration, self.merge_gap, self.padding)
    }
}

/// `[dedupe]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupeSection {
    pub similarity_threshold: u32,
    pub min_confidence: f64,
    pub exclude_labels: Vec<String>,
}

impl Default for DedupeSection {
    fn default() -> Self {
        let filter = CandidateFilter::default();
        Self {
            similarity_threshold: 10,
            min_confidence: filter.min_confidence,
            exclude_labels: filter.exclude_labels,
        }
    }
}

impl DedupeSection {
    pub fn candidate_filter(&self) -> CandidateFilter {
        CandidateFilter {
            min_confidence: self.min_confidence,
            exclude_labels: self.exclude_labels.clone(),
        }
    }
}

/// `[probe]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeSection {
    pub ffprobe_path: String,
    pub timeout_secs: u64,
}

impl Default for ProbeSection {
    fn default() -> Self {
        Self {
            ffprobe_path: "ffprobe".to_string(),
            timeout_secs: 30,
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
