//! MIME type detection for image inputs

use crate::defaults;

/// Guess MIME by inspecting bytes (magic numbers)
pub fn guess_mime_from_bytes(bytes: &[u8]) -> Option<String> {
    infer::get(bytes).map(|k| k.mime_type().to_string())
}

/// Guess MIME by file path (extension-based)
pub fn guess_mime_from_path(path: &str) -> Option<String> {
    mime_guess::from_path(path)
        .first_raw()
        .map(|s| s.to_string())
}

/// Combined guess: prefer bytes, fall back to extension.
pub fn guess_image_mime(bytes: Option<&[u8]>, path: Option<&str>) -> Option<String> {
    bytes
        .and_then(guess_mime_from_bytes)
        .or_else(|| path.and_then(guess_mime_from_path))
        .map(|m| normalize_mime(&m))
}

/// Lowercase, drop parameters and fold the `image/jpg` alias.
pub fn normalize_mime(mime: &str) -> String {
    let essence = mime.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    match essence.as_str() {
        "image/jpg" | "image/pjpeg" => "image/jpeg".to_string(),
        _ => essence,
    }
}

pub fn is_allowed_image_mime(mime: &str) -> bool {
    let mime = normalize_mime(mime);
    defaults::image::ALLOWED_MIME_TYPES.contains(&mime.as_str())
}
