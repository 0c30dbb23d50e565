use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::embedding::{checked_similarity, EmbeddingError, SimilarityOracle};
use crate::extraction::ProjectStatement;

/// Names more similar than this are treated as the same project.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.75;

/// How duplicates were detected for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupMode {
    /// Similarity oracle plus exact-name check.
    Semantic,
    /// The oracle failed; only exact (case-insensitive) name repeats were removed.
    ExactName,
}

#[derive(Debug, Clone)]
pub struct DedupOutcome {
    pub projects: Vec<ProjectStatement>,
    pub mode: DedupMode,
}

/// Greedy, order-sensitive deduplication: the first statement seen wins.
///
/// A candidate is kept when its lowercase-trimmed name has not been kept yet and
/// its similarity to every kept name is at most `threshold`. Kept items are
/// never merged or revisited. If the oracle errors or returns an out-of-range
/// value, the whole list is re-run with exact-name checks only.
pub fn dedupe(
    projects: Vec<ProjectStatement>,
    oracle: &dyn SimilarityOracle,
    threshold: f32,
) -> DedupOutcome {
    match dedupe_semantic(&projects, oracle, threshold) {
        Ok(kept) => DedupOutcome {
            projects: kept,
            mode: DedupMode::Semantic,
        },
        Err(e) => {
            warn!("Similarity oracle unavailable, falling back to exact-name dedup: {e}");
            DedupOutcome {
                projects: dedupe_exact(projects),
                mode: DedupMode::ExactName,
            }
        }
    }
}

fn dedupe_semantic(
    projects: &[ProjectStatement],
    oracle: &dyn SimilarityOracle,
    threshold: f32,
) -> Result<Vec<ProjectStatement>, EmbeddingError> {
    let mut kept: Vec<ProjectStatement> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    'candidates: for candidate in projects {
        if seen.contains(&candidate.dedup_key()) {
            continue;
        }
        for existing in &kept {
            let sim = checked_similarity(oracle.similarity(candidate.name(), existing.name())?)?;
            if sim > threshold {
                continue 'candidates;
            }
        }
        seen.insert(candidate.dedup_key());
        kept.push(candidate.clone());
    }

    Ok(kept)
}

/// Drops statements whose lowercase-trimmed name was already seen.
pub fn dedupe_exact(projects: Vec<ProjectStatement>) -> Vec<ProjectStatement> {
    let mut seen = HashSet::new();
    projects
        .into_iter()
        .filter(|p| seen.insert(p.dedup_key()))
        .collect()
}
