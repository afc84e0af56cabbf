use std::path::Path;

use chrono::{DateTime, Utc};
use rand::distributions::{Alphanumeric, DistString};

/// `YYYYMMDDHHMMSSmmm`, digits only.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S%3f";
pub const TIMESTAMP_LEN: usize = 17;
const TOKEN_LEN: usize = 6;

/// Stored name for an upload: `<timestamp>_<stem><.ext>`.
///
/// Names are only practically unique; a collision must be detected at write
/// time and resolved with [`disambiguate`].
pub fn generate(original: &str) -> String {
    generate_at(original, Utc::now())
}

pub fn generate_at(original: &str, now: DateTime<Utc>) -> String {
    let (stem, ext) = split_name(original);
    if stem.is_empty() {
        return original.to_string();
    }
    let ts = now.format(TIMESTAMP_FORMAT);
    format!("{}_{}{}", ts, stem, ext)
}

/// Inserts `-<token>` between stem and extension.
pub fn disambiguate(candidate: &str, token: &str) -> String {
    let (stem, ext) = split_name(candidate);
    format!("{}-{}{}", stem, token, ext)
}

pub fn random_token() -> String {
    Alphanumeric
        .sample_string(&mut rand::thread_rng(), TOKEN_LEN)
        .to_ascii_lowercase()
}

/// Splits into (stem, ".ext"), keeping the extension as the client wrote it.
fn split_name(name: &str) -> (&str, &str) {
    let path = Path::new(name);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => (stem, &name[name.len() - ext.len() - 1..]),
        _ => (stem, ""),
    }
}
