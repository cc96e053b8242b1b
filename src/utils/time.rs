//! Time formatting utilities

/// Format seconds as `MM:SS`, or `HH:MM:SS` once past the hour.
/// Fractions are truncated; negative or non-finite input formats as zero.
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Timestamp safe for use in file names (`01-23` instead of `01:23`)
pub fn file_timestamp(seconds: f64) -> String {
    format_timestamp(seconds).replace(':', "-")
}
