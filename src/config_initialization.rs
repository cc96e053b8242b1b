//! Configuration initialization and hierarchy management

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::adapters::toml_config::DEFAULT_CONFIG_FILE;
use crate::cli::{Cli, Commands};
use crate::ports::{AnalysisConfig, ConfigPort};

/// Resolved configuration and where its values came from
#[derive(Debug, Clone)]
pub struct ConfigurationOutcome {
    pub config: AnalysisConfig,
    pub config_file: Option<String>,
    pub env_overrides: usize,
    pub cli_overrides: usize,
}

impl ConfigurationOutcome {
    /// Report the configuration sources. Call once the subscriber is installed.
    pub fn log_summary(&self) {
        match &self.config_file {
            Some(path) => info!("Loaded configuration from {}", path),
            None => debug!("No configuration file found, using defaults"),
        }
        if self.env_overrides > 0 {
            info!(
                "Applied {} environment variable overrides",
                self.env_overrides
            );
        }
        if self.cli_overrides > 0 {
            debug!("Applied {} CLI configuration overrides", self.cli_overrides);
        }
    }
}

/// Initialize configuration hierarchy following precedence: CLI > Env > File > Defaults
pub async fn initialize_configuration_hierarchy(
    config_port: &dyn ConfigPort,
    cli: &Cli,
) -> Result<ConfigurationOutcome> {
    // Defaults are already held by the adapter
    load_config_file(config_port, cli.config.as_deref()).await?;

    let env_overrides = config_port
        .apply_env_overrides()
        .await
        .context("Invalid environment override")?;

    let cli_overrides = apply_cli_configuration_overrides(config_port, cli).await?;

    config_port
        .validate_config()
        .await
        .context("Invalid configuration")?;

    Ok(ConfigurationOutcome {
        config: config_port.analysis_config().await?,
        config_file: config_port.get_config_file_path().await?,
        env_overrides,
        cli_overrides,
    })
}

/// Load the explicit config file, or `clipsift.toml` when it exists
async fn load_config_file(config_port: &dyn ConfigPort, explicit: Option<&str>) -> Result<()> {
    match explicit {
        Some(path) => config_port
            .load_config(path)
            .await
            .with_context(|| format!("Failed to load configuration from {}", path)),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => config_port
            .load_config(DEFAULT_CONFIG_FILE)
            .await
            .with_context(|| format!("Failed to load configuration from {}", DEFAULT_CONFIG_FILE)),
        None => Ok(()),
    }
}

/// Dotted config keys set by flags on the command line
fn cli_overrides(cli: &Cli) -> Vec<(&'static str, String)> {
    let mut overrides = Vec::new();

    if let Some(level) = &cli.log_level {
        overrides.push(("logging.level", level.clone()));
    }

    match &cli.command {
        Commands::Merge(args) => {
            if let Some(v) = args.min_duration {
                overrides.push(("merge.min_duration", v.to_string()));
            }
            if let Some(v) = args.merge_gap {
                overrides.push(("merge.merge_gap", v.to_string()));
            }
            if let Some(v) = args.padding {
                overrides.push(("merge.padding", v.to_string()));
            }
        }
        Commands::Dedupe(args) => {
            if let Some(v) = args.threshold {
                overrides.push(("dedupe.similarity_threshold", v.to_string()));
            }
        }
        Commands::Candidates(args) => {
            if let Some(v) = args.threshold {
                overrides.push(("dedupe.similarity_threshold", v.to_string()));
            }
            if let Some(v) = args.min_confidence {
                overrides.push(("dedupe.min_confidence", v.to_string()));
            }
            if let Some(v) = &args.exclude {
                overrides.push(("dedupe.exclude_labels", v.clone()));
            }
        }
        Commands::Assess(_) | Commands::Batch(_) => {}
    }

    overrides
}

/// Apply CLI argument overrides to configuration
async fn apply_cli_configuration_overrides(
    config_port: &dyn ConfigPort,
    cli: &Cli,
) -> Result<usize> {
    let overrides = cli_overrides(cli);

    for (key, value) in &overrides {
        config_port
            .set_config(key, value)
            .await
            .with_context(|| format!("Invalid command line value for {}", key))?;
    }

    Ok(overrides.len())
}
