//! Résumé / job-description skill matching.
//!
//! Normalizes skill mentions through a synonym and related-skill taxonomy,
//! compares résumé skills against a job description, deduplicates project
//! statements by semantic similarity and combines it all into a 0–100 fit score.

pub mod config;
pub mod embedding;
pub mod errors;
pub mod extraction;
pub mod matching;
pub mod pipeline;
pub mod taxonomy;

pub use errors::MatchError;
pub use pipeline::{MatchReport, MatchRequest, Matcher};
pub use taxonomy::{CanonicalSkill, SkillSet, Taxonomy};
