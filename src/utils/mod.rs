//! Common utilities and helpers

pub mod logging;
pub mod path;
pub mod time;

/// Display helpers shared by report renderers
pub struct Utils;

impl Utils {
    /// Format file size for display
    pub fn format_file_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Format a frame rate, or "Unknown"
    pub fn format_fps(frame_rate: Option<f64>) -> String {
        match frame_rate {
            Some(fps) if fps > 0.0 => format!("{:.2} fps", fps),
            _ => "Unknown".to_string(),
        }
    }
}
