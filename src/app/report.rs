// Report rendering - text, JSON and YAML output for interactor responses

use serde::Serialize;

use crate::domain::errors::*;

/// Output format for reports written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl ReportFormat {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "yaml" | "yml" => Ok(ReportFormat::Yaml),
            other => Err(DomainError::BadArgs(format!(
                "Invalid output format: {}. Valid formats: text, json, yaml",
                other
            ))),
        }
    }
}

/// Human-readable rendering of a response
pub trait TextReport {
    fn to_text(&self) -> String;
}

/// Render a response in the requested format
pub fn render<T>(report: &T, format: ReportFormat) -> Result<String, DomainError>
where
    T: Serialize + TextReport,
{
    match format {
        ReportFormat::Text => Ok(report.to_text()),
        ReportFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| DomainError::InternalError(format!("JSON serialization failed: {}", e))),
        ReportFormat::Yaml => serde_yaml::to_string(report)
            .map_err(|e| DomainError::InternalError(format!("YAML serialization failed: {}", e))),
    }
}
