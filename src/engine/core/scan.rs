use std::path::Path;

/// Input extensions ffmpeg reliably demuxes into something DNxHR can take
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "m4v"];

/// Check if a path has a supported input extension (case-insensitive)
pub fn is_supported_input(path: &Path) -> bool {
    if let Some(ext) = path.extension() {
        if let Some(ext_str) = ext.to_str() {
            return SUPPORTED_EXTENSIONS.contains(&ext_str.to_lowercase().as_str());
        }
    }
    false
}

/// Supported extensions formatted for messages: ".mp4, .mkv, ..."
pub fn supported_extensions_list() -> String {
    SUPPORTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(", ")
}
