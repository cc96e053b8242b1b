// TOML config adapter - Configuration management using TOML files

use crate::domain::errors::*;
use crate::ports::*;
use crate::utils::logging::LogLevel;
use crate::utils::path::split_list;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "clipsift.toml";

/// Environment variable to dotted config key
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("CLIPSIFT_LOG_LEVEL", "logging.level"),
    ("CLIPSIFT_MIN_DURATION", "merge.min_duration"),
    ("CLIPSIFT_MERGE_GAP", "merge.merge_gap"),
    ("CLIPSIFT_PADDING", "merge.padding"),
    ("CLIPSIFT_SIMILARITY_THRESHOLD", "dedupe.similarity_threshold"),
    ("CLIPSIFT_FFPROBE", "probe.ffprobe_path"),
];

/// TOML configuration adapter
pub struct TomlConfigAdapter {
    config: Arc<RwLock<AnalysisConfig>>,
    config_file_path: Arc<RwLock<Option<PathBuf>>>,
}

impl TomlConfigAdapter {
    /// Create new TOML config adapter holding the defaults
    pub fn new() -> Self {
        Self::with_config(AnalysisConfig::default())
    }

    pub fn with_config(config: AnalysisConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            config_file_path: Arc::new(RwLock::new(None)),
        }
    }

    fn read_config(&self) -> Result<AnalysisConfig, DomainError> {
        self.config
            .read()
            .map(|c| c.clone())
            .map_err(|_| DomainError::InternalError("Config lock poisoned".to_string()))
    }

    fn update<F>(&self, f: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut AnalysisConfig) -> Result<(), DomainError>,
    {
        let mut config = self
            .config
            .write()
            .map_err(|_| DomainError::InternalError("Config lock poisoned".to_string()))?;
        f(&mut config)
    }

    /// Apply every `[section] key = value` of a TOML document.
    /// All or nothing: on error the current config is left untouched.
    fn apply_toml(&self, toml_content: &str) -> Result<usize, DomainError> {
        let parsed: toml::Table = toml::from_str(toml_content)
            .map_err(|e| DomainError::ParseFail(format!("Failed to parse TOML config: {}", e)))?;

        let mut staged = self.read_config()?;
        let mut applied = 0;
        for (section, value) in &parsed {
            let table = value.as_table().ok_or_else(|| {
                DomainError::ParseFail(format!("Expected [{}] to be a table", section))
            })?;
            for (key, value) in table {
                let dotted = format!("{}.{}", section, key);
                set_key(&mut staged, &dotted, &toml_value_to_string(value))?;
                applied += 1;
            }
        }

        self.update(|config| {
            *config = staged;
            Ok(())
        })?;
        Ok(applied)
    }
}

impl Default for TomlConfigAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn toml_value_to_string(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Array(items) => items
            .iter()
            .map(toml_value_to_string)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, DomainError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| DomainError::BadArgs(format!("Invalid value for {}: {} ({})", key, value, e)))
}

/// Set one dotted key on a config
fn set_key(config: &mut AnalysisConfig, key: &str, value: &str) -> Result<(), DomainError> {
    match key {
        "merge.min_duration" => config.merge.min_duration = parse_value(key, value)?,
        "merge.merge_gap" => config.merge.merge_gap = parse_value(key, value)?,
        "merge.padding" => config.merge.padding = parse_value(key, value)?,
        "dedupe.similarity_threshold" => {
            config.dedupe.similarity_threshold = parse_value(key, value)?
        }
        "dedupe.min_confidence" => config.dedupe.min_confidence = parse_value(key, value)?,
        "dedupe.exclude_labels" => config.dedupe.exclude_labels = split_list(value),
        "probe.ffprobe_path" => config.probe.ffprobe_path = value.trim().to_string(),
        "probe.timeout_secs" => config.probe.timeout_secs = parse_value(key, value)?,
        "logging.level" => config.logging.level = value.trim().to_string(),
        _ => {
            return Err(DomainError::BadArgs(format!(
                "Unknown configuration key: {}",
                key
            )))
        }
    }
    Ok(())
}

#[async_trait]
impl ConfigPort for TomlConfigAdapter {
    async fn analysis_config(&self) -> Result<AnalysisConfig, DomainError> {
        self.read_config()
    }

    async fn set_config(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.update(|config| set_key(config, key, value))?;
        tracing::debug!("Set config {} = {}", key, value);
        Ok(())
    }

    async fn load_config(&self, file_path: &str) -> Result<(), DomainError> {
        let path = PathBuf::from(file_path);

        if !path.exists() {
            return Err(DomainError::FsFail(format!(
                "Config file does not exist: {}",
                file_path
            )));
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| DomainError::FsFail(format!("Failed to read config file: {}", e)))?;

        let applied = self.apply_toml(&content)?;
        tracing::debug!("Loaded {} settings from {}", applied, file_path);

        let mut config_path = self
            .config_file_path
            .write()
            .map_err(|_| DomainError::InternalError("Config lock poisoned".to_string()))?;
        *config_path = Some(path);

        Ok(())
    }

    async fn apply_env_overrides(&self) -> Result<usize, DomainError> {
        let mut applied = 0;
        for (var, key) in ENV_OVERRIDES {
            if let Ok(value) = std::env::var(var) {
                if value.trim().is_empty() {
                    continue;
                }
                self.update(|config| set_key(config, key, &value))
                    .map_err(|e| DomainError::BadArgs(format!("{}: {}", var, e)))?;
                tracing::debug!("Applied {} -> {}", var, key);
                applied += 1;
            }
        }
        Ok(applied)
    }

    async fn validate_config(&self) -> Result<(), DomainError> {
        let config = self.read_config()?;

        LogLevel::parse(&config.logging.level)?;
        config.merge.params()?;

        let min_confidence = config.dedupe.min_confidence;
        if !(0.0..=1.0).contains(&min_confidence) {
            return Err(DomainError::BadArgs(format!(
                "dedupe.min_confidence must be within [0, 1], got {}",
                min_confidence
            )));
        }

        if config.probe.ffprobe_path.trim().is_empty() {
            return Err(DomainError::BadArgs(
                "probe.ffprobe_path cannot be empty".to_string(),
            ));
        }

        if config.probe.timeout_secs == 0 {
            return Err(DomainError::BadArgs(
                "probe.timeout_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }

    async fn get_config_file_path(&self) -> Result<Option<String>, DomainError> {
        let config_path = self
            .config_file_path
            .read()
            .map_err(|_| DomainError::InternalError("Config lock poisoned".to_string()))?;
        Ok(config_path
            .as_ref()
            .map(|p| p.to_string_lossy().to_string()))
    }
}
