//! Match pipeline: orchestrates extraction, deduplication, comparison and scoring.
//!
//! Flow: profile + signals → résumé skills → project detection → dedupe →
//!       merged résumé skills → JD skills → compare → score → feedback.
//!
//! `evaluate` is synchronous and pure apart from the injected similarity oracle.
//! `evaluate_with_provider` prepares embeddings asynchronously, then runs
//! `evaluate` on the blocking pool.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::embedding::{
    CachedSimilarity, EmbeddingProvider, EmbeddingTable, LexicalSimilarity, SimilarityOracle,
};
use crate::errors::MatchError;
use crate::extraction::{
    CandidateProfile, ProfileSignals, ProjectDetector, ProjectStatement, SkillExtractor,
};
use crate::matching::fit_scoring::{build_project_feedback, MAX_SCORE};
use crate::matching::{
    dedupe, ComparisonResult, DedupMode, FitScorer, ScoreBreakdown, ScoreInputs,
    SkillComparator, WeightedFitScorer, DEFAULT_SIMILARITY_THRESHOLD,
};
use crate::taxonomy::{CanonicalSkill, SkillSet, Taxonomy};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Request body accepted by the binary's `--request` mode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchRequest {
    pub resume_text: Option<String>,
    pub jd_text: Option<String>,
}

impl MatchRequest {
    /// Both texts, or `InvalidInput` naming the missing field. Empty strings are valid.
    pub fn into_texts(self) -> Result<(String, String), MatchError> {
        let resume = self
            .resume_text
            .ok_or_else(|| MatchError::InvalidInput("resume_text is missing".to_string()))?;
        let jd = self
            .jd_text
            .ok_or_else(|| MatchError::InvalidInput("jd_text is missing".to_string()))?;
        Ok((resume, jd))
    }
}

/// Full match report returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub candidate: CandidateProfile,
    pub signals: ProfileSignals,
    /// Résumé skills merged with every kept project's skills.
    pub canonical_resume_skills: Vec<CanonicalSkill>,
    pub canonical_jd_skills: Vec<CanonicalSkill>,
    pub comparison: ComparisonResult,
    pub projects: Vec<ProjectStatement>,
    pub score: u8,
    pub breakdown: ScoreBreakdown,
    pub feedback: Vec<String>,
    pub project_feedback: Vec<String>,
    pub dedup_mode: DedupMode,
    pub scorer_backend: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Matcher
// ────────────────────────────────────────────────────────────────────────────

/// Cheap to clone; the taxonomy and scorer are shared.
#[derive(Clone)]
pub struct Matcher {
    taxonomy: Arc<Taxonomy>,
    scorer: Arc<dyn FitScorer>,
    dedup_threshold: f32,
}

impl Matcher {
    pub fn new(
        taxonomy: Arc<Taxonomy>,
        scorer: Arc<dyn FitScorer>,
        dedup_threshold: f32,
    ) -> Result<Self, MatchError> {
        if !(-1.0..=1.0).contains(&dedup_threshold) {
            return Err(MatchError::InvalidInput(format!(
                "dedup threshold {dedup_threshold} is outside [-1, 1]"
            )));
        }
        Ok(Self {
            taxonomy,
            scorer,
            dedup_threshold,
        })
    }

    /// Built-in taxonomy, default weights, default threshold.
    pub fn with_defaults() -> Result<Self, MatchError> {
        Self::new(
            Arc::new(Taxonomy::builtin()?),
            Arc::new(WeightedFitScorer::default()),
            DEFAULT_SIMILARITY_THRESHOLD,
        )
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Project candidates before deduplication.
    pub fn detect_projects(&self, resume: &str) -> Vec<ProjectStatement> {
        ProjectDetector::new(&self.taxonomy).detect(resume)
    }

    /// Runs the whole pipeline on one résumé / JD pair.
    pub fn evaluate(
        &self,
        resume: &str,
        jd: &str,
        oracle: &dyn SimilarityOracle,
    ) -> Result<MatchReport, MatchError> {
        let candidates = self.detect_projects(resume);
        self.evaluate_candidates(resume, jd, candidates, oracle)
    }

    fn evaluate_candidates(
        &self,
        resume: &str,
        jd: &str,
        candidates: Vec<ProjectStatement>,
        oracle: &dyn SimilarityOracle,
    ) -> Result<MatchReport, MatchError> {
        let taxonomy = self.taxonomy.as_ref();
        let extractor = SkillExtractor::new(taxonomy);

        // Step 1: identity and keyword signals
        let candidate = CandidateProfile::extract(resume);
        let signals = ProfileSignals::detect(resume);

        // Step 2: projects
        let detected = candidates.len();
        let outcome = dedupe(candidates, oracle, self.dedup_threshold);
        info!(
            "Projects: {} detected, {} kept ({:?} dedup)",
            detected,
            outcome.projects.len(),
            outcome.mode
        );

        // Step 3: skills on both sides
        let mut resume_skills = extractor.extract(resume);
        for project in &outcome.projects {
            resume_skills.extend(project.skills().iter().cloned());
        }
        let jd_skills = extractor.extract_jd(jd);
        info!(
            "Skills: {} résumé (with projects), {} JD",
            resume_skills.len(),
            jd_skills.len()
        );

        // Step 4: compare
        let comparison = SkillComparator::new(taxonomy).compare(&resume_skills, &jd_skills);

        // Step 5: score
        let card = self.scorer.score(&ScoreInputs {
            comparison: &comparison,
            projects: &outcome.projects,
            has_experience_mention: signals.has_experience_mention,
            has_achievement_mention: signals.has_achievement_mention,
        })?;
        if u32::from(card.score) > MAX_SCORE {
            return Err(MatchError::Contract(format!(
                "scorer '{}' returned {} (max {MAX_SCORE})",
                self.scorer.backend(),
                card.score
            )));
        }
        info!(
            "Fit score: {}/100 ({} common, {} missing, {} related)",
            card.score,
            comparison.common().len(),
            comparison.missing().len(),
            comparison.related().len()
        );

        // Step 6: project verdicts against the expanded JD skills
        let jd_expanded: SkillSet = jd_skills
            .iter()
            .flat_map(|skill| taxonomy.expand(skill))
            .collect();
        let project_feedback = build_project_feedback(&outcome.projects, &jd_expanded);

        Ok(MatchReport {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            candidate,
            signals,
            canonical_resume_skills: resume_skills.into_iter().collect(),
            canonical_jd_skills: jd_skills.into_iter().collect(),
            comparison,
            projects: outcome.projects,
            score: card.score,
            breakdown: card.breakdown,
            feedback: card.feedback,
            project_feedback,
            dedup_mode: outcome.mode,
            scorer_backend: self.scorer.backend().to_string(),
        })
    }

    /// Async entry point used by the binary.
    ///
    /// With a provider, project names are embedded up front; if that fails the
    /// table stays empty and deduplication degrades to exact names. Without a
    /// provider, lexical cosine similarity stands in.
    pub async fn evaluate_with_provider(
        &self,
        resume: String,
        jd: String,
        provider: Option<&dyn EmbeddingProvider>,
    ) -> Result<MatchReport, MatchError> {
        let candidates = self.detect_projects(&resume);

        let oracle: Box<dyn SimilarityOracle> = match provider {
            Some(provider) => {
                let names: Vec<String> =
                    candidates.iter().map(|p| p.name().to_string()).collect();
                let table = match EmbeddingTable::build(provider, &names).await {
                    Ok(table) => table,
                    Err(e) => {
                        warn!(
                            "Embedding provider {} failed, dedup will use exact names: {e}",
                            provider.model_name()
                        );
                        EmbeddingTable::empty()
                    }
                };
                Box::new(table)
            }
            None => Box::new(CachedSimilarity::new(LexicalSimilarity)),
        };

        let matcher = self.clone();
        tokio::task::spawn_blocking(move || {
            matcher.evaluate_candidates(&resume, &jd, candidates, oracle.as_ref())
        })
        .await
        .map_err(|e| MatchError::Internal(anyhow::anyhow!("evaluate task failed: {e}")))?
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::EmbeddingError;
    use crate::matching::ScoreCard;
    use async_trait::async_trait;

    fn make_matcher() -> Matcher {
        Matcher::with_defaults().unwrap()
    }

    fn names(skills: &[CanonicalSkill]) -> Vec<&str> {
        skills.iter().map(CanonicalSkill::as_str).collect()
    }

    fn constant(value: f32) -> impl Fn(&str, &str) -> Result<f32, EmbeddingError> {
        move |_: &str, _: &str| Ok(value)
    }

    #[test]
    fn test_single_missing_skill() {
        let report = make_matcher()
            .evaluate("Skills: Python, SQL", "Skills: Python, React", &constant(0.0))
            .unwrap();
        assert_eq!(names(&report.canonical_resume_skills), vec!["python", "sql"]);
        assert_eq!(names(&report.canonical_jd_skills), vec!["python", "react"]);
        assert_eq!(
            report.comparison.common().iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            vec!["python"]
        );
        assert_eq!(
            report.comparison.missing().iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            vec!["react"]
        );
        assert!(report.projects.is_empty());
        // 60 base - 20 missing + 5 presentation
        assert_eq!(report.score, 45);
        assert_eq!(
            report.feedback.last().map(String::as_str),
            Some("You are missing these skills: react")
        );
    }

    #[test]
    fn test_empty_jd() {
        let report = make_matcher()
            .evaluate("Skills: Python\nBuilt a Flask API", "", &constant(0.0))
            .unwrap();
        assert!(report.canonical_jd_skills.is_empty());
        assert_eq!(report.comparison, ComparisonResult::default());
        assert_eq!(report.project_feedback.len(), 1);
        assert!(report.project_feedback[0].contains("does not directly match"));
    }

    #[test]
    fn test_empty_everything() {
        let report = make_matcher().evaluate("", "", &constant(0.0)).unwrap();
        assert!(report.canonical_resume_skills.is_empty());
        assert!(report.projects.is_empty());
        assert_eq!(report.candidate, CandidateProfile::default());
        assert_eq!(report.score, 65);
    }

    #[test]
    fn test_near_duplicate_projects_collapse() {
        let resume = "Built a chatbot using NLP\nBuilt a chat bot with NLP techniques";
        let report = make_matcher()
            .evaluate(resume, "Skills: NLP", &constant(0.9))
            .unwrap();
        assert_eq!(report.dedup_mode, DedupMode::Semantic);
        assert_eq!(report.projects.len(), 1);
        assert_eq!(report.projects[0].name(), "Built a chatbot using NLP");
        assert_eq!(
            report.project_feedback,
            vec!["The project 'Built a chatbot using NLP' uses skills relevant to the job description."]
        );
    }

    #[test]
    fn test_related_skill_not_missing() {
        let report = make_matcher()
            .evaluate("Skills: PyTorch", "Skills: Deep Learning", &constant(0.0))
            .unwrap();
        let related: Vec<&str> = report.comparison.related().iter().map(|s| s.as_str()).collect();
        assert_eq!(related, vec!["deep learning"]);
        assert!(report.comparison.missing().is_empty());
    }

    #[test]
    fn test_project_skills_merge_into_resume() {
        let resume = "Experience\nDeveloped a dashboard with Tableau";
        let report = make_matcher()
            .evaluate(resume, "Tools: Tableau", &constant(0.0))
            .unwrap();
        assert!(names(&report.canonical_resume_skills).contains(&"tableau"));
        // 60 + 20 (experience and a relevant project) + 5
        assert_eq!(report.score, 85);
        assert!(report.breakdown.has_relevant_project);
    }

    #[test]
    fn test_invalid_threshold() {
        let taxonomy = Arc::new(Taxonomy::builtin().unwrap());
        let scorer: Arc<dyn FitScorer> = Arc::new(WeightedFitScorer::default());
        assert!(Matcher::new(taxonomy.clone(), scorer.clone(), 1.5).is_err());
        assert!(Matcher::new(taxonomy, scorer, f32::NAN).is_err());
    }

    struct BrokenScorer;

    impl FitScorer for BrokenScorer {
        fn score(&self, _inputs: &ScoreInputs<'_>) -> Result<ScoreCard, MatchError> {
            Ok(ScoreCard {
                score: 120,
                feedback: vec![],
                breakdown: ScoreBreakdown::default(),
            })
        }

        fn backend(&self) -> &'static str {
            "broken"
        }
    }

    #[test]
    fn test_out_of_range_score_is_fatal() {
        let matcher = Matcher::new(
            Arc::new(Taxonomy::builtin().unwrap()),
            Arc::new(BrokenScorer),
            DEFAULT_SIMILARITY_THRESHOLD,
        )
        .unwrap();
        let err = matcher.evaluate("", "", &constant(0.0)).unwrap_err();
        assert!(matches!(err, MatchError::Contract(_)));
    }

    #[test]
    fn test_request_requires_both_texts() {
        let request = MatchRequest {
            resume_text: Some("Skills: Python".to_string()),
            jd_text: None,
        };
        let err = request.into_texts().unwrap_err();
        assert!(matches!(err, MatchError::InvalidInput(ref m) if m.contains("jd_text")));

        let ok = MatchRequest {
            resume_text: Some(String::new()),
            jd_text: Some(String::new()),
        };
        assert!(ok.into_texts().is_ok());
    }

    struct FailingProvider;

    #[async_trait]
    impl EmbeddingProvider for FailingProvider {
        async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Err(EmbeddingError::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
        }

        fn model_name(&self) -> &str {
            "failing"
        }
    }

    const DUPLICATE_PROJECTS: &str =
        "Built a chatbot using NLP\nbuilt a chatbot using NLP\nBuilt a chat bot with NLP techniques";

    #[tokio::test]
    async fn test_provider_failure_degrades_dedup() {
        let report = make_matcher()
            .evaluate_with_provider(
                DUPLICATE_PROJECTS.to_string(),
                "Skills: NLP".to_string(),
                Some(&FailingProvider),
            )
            .await
            .unwrap();
        assert_eq!(report.dedup_mode, DedupMode::ExactName);
        assert_eq!(report.projects.len(), 2);
    }

    #[tokio::test]
    async fn test_no_provider_uses_lexical_similarity() {
        let report = make_matcher()
            .evaluate_with_provider(
                DUPLICATE_PROJECTS.to_string(),
                "Skills: NLP".to_string(),
                None,
            )
            .await
            .unwrap();
        assert_eq!(report.dedup_mode, DedupMode::Semantic);
        // Exact repeat removed; the paraphrase shares too few words to collapse.
        assert_eq!(report.projects.len(), 2);
        assert_eq!(report.scorer_backend, "weighted");
    }
}
