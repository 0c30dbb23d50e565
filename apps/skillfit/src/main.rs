//! `skillfit` binary: reads a résumé and a job description as plain text and
//! prints the match report as JSON.
//!
//! ```bash
//! skillfit --resume resume.txt --jd job.txt --pretty
//! skillfit --request request.json   # {"resume_text": "...", "jd_text": "..."}
//! ```
//!
//! Failures print `{"error": {"code", "message"}}` and exit with status 1.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use skillfit::config::Config;
use skillfit::embedding::{EmbeddingProvider, HttpEmbeddingProvider};
use skillfit::matching::WeightedFitScorer;
use skillfit::{MatchError, MatchReport, MatchRequest, Matcher, Taxonomy};

#[derive(Debug, Parser)]
#[command(name = "skillfit", version, about = "Score a résumé against a job description")]
struct Cli {
    /// Plain-text résumé
    #[arg(long, requires = "jd", conflicts_with = "request")]
    resume: Option<PathBuf>,

    /// Plain-text job description
    #[arg(long, requires = "resume", conflicts_with = "request")]
    jd: Option<PathBuf>,

    /// JSON request with `resume_text` and `jd_text`
    #[arg(long)]
    request: Option<PathBuf>,

    /// Pretty-print the report
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries only the JSON output.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting skillfit v{}", env!("CARGO_PKG_VERSION"));

    match run(&cli, &config).await {
        Ok(report) => {
            let output = if cli.pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{output}");
            Ok(())
        }
        Err(e) => {
            println!("{}", e.to_body());
            std::process::exit(1);
        }
    }
}

async fn run(cli: &Cli, config: &Config) -> Result<MatchReport, MatchError> {
    let (resume, jd) = read_inputs(cli)?;

    let taxonomy = match &config.taxonomy_path {
        Some(path) => Taxonomy::from_json_file(path)?,
        None => Taxonomy::builtin()?,
    };
    info!("Taxonomy ready ({} canonical skills)", taxonomy.len());

    let matcher = Matcher::new(
        Arc::new(taxonomy),
        Arc::new(WeightedFitScorer::default()),
        config.dedup_threshold,
    )?;

    let provider = match &config.embedding_api_url {
        Some(url) => {
            let provider = HttpEmbeddingProvider::new(
                url.clone(),
                config.embedding_api_key.clone(),
                config.embedding_model.clone(),
            )?;
            info!("Embedding provider initialized (model: {})", provider.model_name());
            Some(provider)
        }
        None => {
            info!("No EMBEDDING_API_URL set, using lexical similarity for dedup");
            None
        }
    };

    matcher
        .evaluate_with_provider(
            resume,
            jd,
            provider.as_ref().map(|p| p as &dyn EmbeddingProvider),
        )
        .await
}

fn read_inputs(cli: &Cli) -> Result<(String, String), MatchError> {
    if let Some(path) = &cli.request {
        let raw = std::fs::read_to_string(path)?;
        let request: MatchRequest = serde_json::from_str(&raw)
            .map_err(|e| MatchError::InvalidInput(format!("malformed request JSON: {e}")))?;
        return request.into_texts();
    }

    match (&cli.resume, &cli.jd) {
        (Some(resume), Some(jd)) => Ok((
            std::fs::read_to_string(resume)?,
            std::fs::read_to_string(jd)?,
        )),
        _ => Err(MatchError::InvalidInput(
            "pass --resume and --jd, or --request".to_string(),
        )),
    }
}
