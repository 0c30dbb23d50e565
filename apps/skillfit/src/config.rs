use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::matching::DEFAULT_SIMILARITY_THRESHOLD;

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Runtime configuration loaded from environment variables (and `.env` if present).
/// Nothing is required; every setting has a working default.
#[derive(Debug, Clone)]
pub struct Config {
    pub dedup_threshold: f32,
    /// OpenAI-compatible `/embeddings` URL. Unset → lexical similarity.
    pub embedding_api_url: Option<String>,
    pub embedding_api_key: Option<String>,
    pub embedding_model: String,
    /// JSON taxonomy asset. Unset → built-in tables.
    pub taxonomy_path: Option<PathBuf>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let dedup_threshold = match optional_env("DEDUP_THRESHOLD") {
            Some(raw) => raw
                .parse::<f32>()
                .context("DEDUP_THRESHOLD must be a number")?,
            None => DEFAULT_SIMILARITY_THRESHOLD,
        };
        if !(-1.0..=1.0).contains(&dedup_threshold) {
            bail!("DEDUP_THRESHOLD must be within [-1, 1], got {dedup_threshold}");
        }

        Ok(Config {
            dedup_threshold,
            embedding_api_url: optional_env("EMBEDDING_API_URL"),
            embedding_api_key: optional_env("EMBEDDING_API_KEY"),
            embedding_model: optional_env("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            taxonomy_path: optional_env("TAXONOMY_PATH").map(PathBuf::from),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Unset and blank values are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
