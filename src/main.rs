//! clipsift command-line entry point
//!
//! ```bash
//! clipsift assess --input "downloads/video.webm" --plan "video.mp4"
//! clipsift batch --dir downloads --format json
//! clipsift merge --detections detections.json --padding 1.5
//! clipsift candidates --scenes scenes.json --exclude credits,dialogue
//! ```

use anyhow::Result;
use clap::Parser;

use clipsift::adapters::TomlConfigAdapter;
use clipsift::app::DefaultAppContainer;
use clipsift::cli::{commands, Cli};
use clipsift::config_initialization::initialize_configuration_hierarchy;
use clipsift::utils::logging::{LogFormat, LogLevel, LoggingConfig, LoggingSystem};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configuration first so the log level can come from it
    let config_port = TomlConfigAdapter::new();
    let outcome = initialize_configuration_hierarchy(&config_port, &cli).await?;
    let config = outcome.config.clone();

    let logging = LoggingSystem::new(LoggingConfig {
        level: LogLevel::parse(&config.logging.level)?,
        format: LogFormat::parse(&cli.log_format)?,
        target: false,
    });
    logging.initialize();
    logging.log_system_info();
    outcome.log_summary();

    let container = DefaultAppContainer::new(&config);
    commands::run(&container, &config, cli.command).await
}
