use std::path::Path;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Guess the MIME type the control plane expects for `file_name`.
///
/// Video containers map to the `video/<ext>` names used by the category
/// allow-list rather than their IANA registrations.
pub fn guess_content_type(file_name: &str) -> &'static str {
    let Some(extension) = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
    else {
        return FALLBACK_CONTENT_TYPE;
    };

    match extension.as_str() {
        // Images
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        // Videos
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mkv" => "video/mkv",
        "avi" => "video/avi",
        "mov" => "video/mov",
        // Subtitles
        "srt" => "application/x-subrip",
        "vtt" => "text/vtt",
        "ass" | "ssa" => "text/x-ssa",
        _ => FALLBACK_CONTENT_TYPE,
    }
}
