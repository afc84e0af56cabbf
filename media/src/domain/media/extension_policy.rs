//! Allow-list decisions on file name suffixes.
//!
//! Every accepted extension is currently an image extension. Callers that need
//! to know whether a file can be inspected as an image should still ask
//! [`is_image_extension`], so that non-image types can be added to
//! [`ALLOWED_EXTENSIONS`] later without touching them.

use std::path::{Component, Path};

pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp"];

pub const ALLOWED_EXTENSIONS: &[&str] = IMAGE_EXTENSIONS;

/// Lowercase extension of `name` including the leading dot, or an empty
/// string when the name has none (`"noext"`, `"file."`, `".png"`).
pub fn extension_of(name: &str) -> String {
    if !is_plain_file_name(name) {
        return String::new();
    }
    match Path::new(name).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!(".{}", ext.to_ascii_lowercase()),
        _ => String::new(),
    }
}

pub fn is_acceptable_extension(name: &str) -> bool {
    let ext = extension_of(name);
    !ext.is_empty() && ALLOWED_EXTENSIONS.contains(&ext.as_str())
}

pub fn is_image_extension(name: &str) -> bool {
    let ext = extension_of(name);
    !ext.is_empty() && IMAGE_EXTENSIONS.contains(&ext.as_str())
}

/// Last segment of a client-supplied file name, split on either `/` or `\`.
/// Browsers and some clients send the directory they picked the file from.
pub fn base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// A single path segment with no separators, traversal or control characters.
pub fn is_plain_file_name(name: &str) -> bool {
    if name.is_empty() || name.contains(['/', '\\']) || name.chars().any(char::is_control) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
