use std::env;
use std::path::Path;

use crate::infrastructure::storage::without_cur_dir;

#[derive(Clone, Debug)]
pub struct Config {
    pub internal_port: u16,
    pub external_port: Option<u16>,
    pub public_path: String,
    pub upload_path: String,
    pub upload_max_bytes: usize,
    pub max_request_bytes: usize,
    pub metadata_read_limit: usize,
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse = |key: &str| var(key).and_then(|s| s.trim().parse::<usize>().ok());

        let internal_port = var("MEDIA_INTERNAL_PORT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(2001);
        let external_port = var("MEDIA_EXTERNAL_PORT").and_then(|s| s.trim().parse().ok());
        let public_path = var("MEDIA_PUBLIC_PATH")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "public".into());
        let upload_path = var("MEDIA_UPLOAD_PATH")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "public/uploads".into());
        let upload_max_bytes = parse("MEDIA_UPLOAD_MAX_SIZE").unwrap_or(10 * 1024 * 1024);
        let max_request_bytes = parse("MEDIA_MAX_REQUEST_SIZE").unwrap_or(100 * 1024 * 1024);
        let metadata_read_limit = parse("MEDIA_METADATA_READ_LIMIT").unwrap_or(1024 * 1024);
        let cors_origin = var("MEDIA_CORS_ORIGIN").and_then(|v| {
            let trimmed = v.trim();
            if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
                Some(trimmed.trim_end_matches('/').to_string())
            } else {
                None
            }
        });

        if upload_max_bytes == 0 {
            anyhow::bail!("MEDIA_UPLOAD_MAX_SIZE must be greater than zero");
        }
        if metadata_read_limit == 0 {
            anyhow::bail!("MEDIA_METADATA_READ_LIMIT must be greater than zero");
        }
        if !serves_uploads(&public_path, &upload_path) {
            tracing::warn!(
                %upload_path,
                %public_path,
                "upload path is outside the public path; uploads will not be served"
            );
        }

        Ok(Self {
            internal_port,
            external_port,
            public_path,
            upload_path,
            upload_max_bytes,
            max_request_bytes: max_request_bytes.max(upload_max_bytes),
            metadata_read_limit,
            cors_origin,
        })
    }
}

/// Whether files under `upload_path` are reachable through static serving of
/// `public_path`.
pub fn serves_uploads(public_path: &str, upload_path: &str) -> bool {
    without_cur_dir(Path::new(upload_path)).starts_with(without_cur_dir(Path::new(public_path)))
}
