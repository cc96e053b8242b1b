// Tracing log adapter - Structured logging using tracing crate

use crate::ports::*;
use crate::utils::logging::LogLevel;
use async_trait::async_trait;
use tracing::{debug, error, info, warn};

/// Tracing log adapter
///
/// Subscriber setup lives in `utils::logging`; this adapter only emits events.
pub struct TracingLogAdapter {
    min_level: LogLevel,
}

impl TracingLogAdapter {
    /// Create new tracing log adapter
    pub fn new() -> Self {
        Self::with_min_level(LogLevel::Trace)
    }

    pub fn with_min_level(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    /// Check if log level should be logged
    fn should_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn render_context(event: &LogEvent) -> String {
        let mut pairs: Vec<_> = event.context.iter().collect();
        pairs.sort();
        pairs
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for TracingLogAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LogPort for TracingLogAdapter {
    async fn info(&self, message: &str) {
        if self.should_log(LogLevel::Info) {
            info!("{}", message);
        }
    }

    async fn warn(&self, message: &str) {
        if self.should_log(LogLevel::Warn) {
            warn!("{}", message);
        }
    }

    async fn error(&self, message: &str) {
        if self.should_log(LogLevel::Error) {
            error!("{}", message);
        }
    }

    async fn debug(&self, message: &str) {
        if self.should_log(LogLevel::Debug) {
            debug!("{}", message);
        }
    }

    async fn log_event(&self, event: &LogEvent) {
        if !self.should_log(event.level) {
            return;
        }

        let context = Self::render_context(event);
        match event.level {
            LogLevel::Error => tracing::error!(context = %context, "{}", event.message),
            LogLevel::Warn => tracing::warn!(context = %context, "{}", event.message),
            LogLevel::Info => tracing::info!(context = %context, "{}", event.message),
            LogLevel::Debug => tracing::debug!(context = %context, "{}", event.message),
            LogLevel::Trace => tracing::trace!(context = %context, "{}", event.message),
        }
    }
}
