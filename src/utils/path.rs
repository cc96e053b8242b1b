//! Path and file name helpers

use std::path::Path;

use crate::utils::time::file_timestamp;

/// Extensions scanned by batch assessment when none are given
pub const DEFAULT_MEDIA_EXTENSIONS: &[&str] = &["mp4", "mkv", "mov", "webm", "avi", "m4v"];

const MAX_TITLE_CHARS: usize = 30;

/// Keep the first 30 characters of a title, then drop anything that is not
/// alphanumeric, space, dash or underscore.
pub fn safe_title(title: &str) -> String {
    filter_file_chars(title.chars().take(MAX_TITLE_CHARS))
}

/// Label with the same character set as [`safe_title`], without the length cap
pub fn safe_label(label: &str) -> String {
    filter_file_chars(label.chars())
}

fn filter_file_chars(chars: impl Iterator<Item = char>) -> String {
    chars
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Output name for a saved clip: `<title>_<MM-SS>_<label>.mp4`
pub fn clip_file_name(title: &str, start_seconds: f64, label: &str) -> String {
    format!(
        "{}_{}_{}.mp4",
        safe_title(title),
        file_timestamp(start_seconds),
        safe_label(label)
    )
}

/// Case-insensitive extension check; `extensions` may include a leading dot
pub fn has_media_extension(path: &Path, extensions: &[String]) -> bool {
    let ext = match path.extension() {
        Some(ext) => ext.to_string_lossy().to_lowercase(),
        None => return false,
    };
    extensions
        .iter()
        .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(&ext))
}

/// Parse a comma separated list, dropping blanks
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
