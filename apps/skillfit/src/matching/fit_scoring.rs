//! Fit scoring: a pluggable, trait-based scorer over the comparison result,
//! the deduplicated projects and two keyword signals.
//!
//! Default: `WeightedFitScorer`, a fixed-order additive formula.
//! `Matcher` holds an `Arc<dyn FitScorer>`, swapped at construction.

use serde::{Deserialize, Serialize};

use crate::errors::MatchError;
use crate::extraction::ProjectStatement;
use crate::matching::comparator::ComparisonResult;
use crate::taxonomy::SkillSet;

pub const MAX_SCORE: u32 = 100;

/// Scores below this get the generic improvement message.
pub const IMPROVEMENT_THRESHOLD: u8 = 60;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Point values for each score component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skills_base: u32,
    /// Flat deduction when any JD skill is missing, regardless of how many.
    pub missing_penalty: u32,
    pub experience_and_projects: u32,
    pub experience_or_projects: u32,
    pub presentation: u32,
    pub achievements: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills_base: 60,
            missing_penalty: 20,
            experience_and_projects: 20,
            experience_or_projects: 10,
            presentation: 5,
            achievements: 5,
        }
    }
}

impl ScoringWeights {
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.missing_penalty > self.skills_base {
            return Err(MatchError::InvalidInput(format!(
                "missing_penalty ({}) exceeds skills_base ({})",
                self.missing_penalty, self.skills_base
            )));
        }
        if self.experience_or_projects > self.experience_and_projects {
            return Err(MatchError::InvalidInput(format!(
                "experience_or_projects ({}) exceeds experience_and_projects ({})",
                self.experience_or_projects, self.experience_and_projects
            )));
        }
        Ok(())
    }
}

/// Everything the scorer consumes, bundled once.
#[derive(Debug, Clone)]
pub struct ScoreInputs<'a> {
    pub comparison: &'a ComparisonResult,
    pub projects: &'a [ProjectStatement],
    pub has_experience_mention: bool,
    pub has_achievement_mention: bool,
}

/// Points awarded per component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub skills: u32,
    pub experience_and_projects: u32,
    pub presentation: u32,
    pub achievements: u32,
    pub has_relevant_project: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreCard {
    pub score: u8,
    pub feedback: Vec<String>,
    pub breakdown: ScoreBreakdown,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring policies without touching the pipeline.
pub trait FitScorer: Send + Sync {
    fn score(&self, inputs: &ScoreInputs<'_>) -> Result<ScoreCard, MatchError>;

    /// Short label reported alongside every score.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// WeightedFitScorer
// ────────────────────────────────────────────────────────────────────────────

/// Additive scorer. Components, in order:
/// 1. skills: `skills_base`, minus `missing_penalty` if anything is missing
/// 2. experience/projects: `experience_and_projects` if the résumé mentions
///    experience and has a relevant project, `experience_or_projects` for one
/// 3. `presentation`, always
/// 4. `achievements` when an achievement marker is present
///
/// A project is relevant when its skills intersect the JD skill set.
#[derive(Debug, Clone, Default)]
pub struct WeightedFitScorer {
    weights: ScoringWeights,
}

impl WeightedFitScorer {
    pub fn new(weights: ScoringWeights) -> Result<Self, MatchError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }
}

impl FitScorer for WeightedFitScorer {
    fn score(&self, inputs: &ScoreInputs<'_>) -> Result<ScoreCard, MatchError> {
        let w = &self.weights;
        let jd_skills = inputs.comparison.jd_skills();

        let skills = if inputs.comparison.missing().is_empty() {
            w.skills_base
        } else {
            w.skills_base.saturating_sub(w.missing_penalty)
        };

        let has_relevant_project = inputs
            .projects
            .iter()
            .any(|p| !p.skills().is_disjoint(&jd_skills));
        let experience_and_projects = match (inputs.has_experience_mention, has_relevant_project) {
            (true, true) => w.experience_and_projects,
            (true, false) | (false, true) => w.experience_or_projects,
            (false, false) => 0,
        };

        let achievements = if inputs.has_achievement_mention {
            w.achievements
        } else {
            0
        };

        let total = skills
            .saturating_add(experience_and_projects)
            .saturating_add(w.presentation)
            .saturating_add(achievements);
        let score = total.min(MAX_SCORE) as u8;

        let missing: Vec<&str> = inputs
            .comparison
            .missing()
            .iter()
            .map(|s| s.as_str())
            .collect();

        Ok(ScoreCard {
            score,
            feedback: build_feedback(score, &missing),
            breakdown: ScoreBreakdown {
                skills,
                experience_and_projects,
                presentation: w.presentation,
                achievements,
                has_relevant_project,
            },
        })
    }

    fn backend(&self) -> &'static str {
        "weighted"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Feedback
// ────────────────────────────────────────────────────────────────────────────

/// Feedback lines from the score and the missing skills (canonical names, in order).
pub fn build_feedback(score: u8, missing: &[&str]) -> Vec<String> {
    let mut feedback = Vec::new();
    if score < IMPROVEMENT_THRESHOLD {
        feedback
            .push("Your profile may need improvement to match the job description.".to_string());
    }
    if !missing.is_empty() {
        feedback.push(format!(
            "You are missing these skills: {}",
            missing.join(", ")
        ));
    }
    feedback
}

/// One verdict line per project: relevant when its skills intersect `jd_expanded`.
pub fn build_project_feedback(projects: &[ProjectStatement], jd_expanded: &SkillSet) -> Vec<String> {
    projects
        .iter()
        .map(|p| {
            if p.skills().is_disjoint(jd_expanded) {
                format!(
                    "The project '{}' does not directly match the job description.",
                    p.name()
                )
            } else {
                format!(
                    "The project '{}' uses skills relevant to the job description.",
                    p.name()
                )
            }
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::comparator::SkillComparator;
    use crate::taxonomy::Taxonomy;
    use proptest::prelude::*;

    fn make_skills(taxonomy: &Taxonomy, surfaces: &[&str]) -> SkillSet {
        surfaces
            .iter()
            .filter_map(|s| taxonomy.canonicalize(s))
            .collect()
    }

    fn make_project(taxonomy: &Taxonomy, name: &str, skills: &[&str]) -> ProjectStatement {
        ProjectStatement::from_statement(name, make_skills(taxonomy, skills)).unwrap()
    }

    fn make_comparison(taxonomy: &Taxonomy, resume: &[&str], jd: &[&str]) -> ComparisonResult {
        SkillComparator::new(taxonomy).compare(
            &make_skills(taxonomy, resume),
            &make_skills(taxonomy, jd),
        )
    }

    fn score(inputs: &ScoreInputs<'_>) -> ScoreCard {
        WeightedFitScorer::default().score(inputs).unwrap()
    }

    #[test]
    fn test_missing_skill_no_projects() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let comparison = make_comparison(&taxonomy, &["python", "sql"], &["python", "react"]);
        let card = score(&ScoreInputs {
            comparison: &comparison,
            projects: &[],
            has_experience_mention: false,
            has_achievement_mention: false,
        });
        assert_eq!(card.score, 45);
        assert_eq!(card.breakdown.skills, 40);
        assert_eq!(
            card.feedback,
            vec![
                "Your profile may need improvement to match the job description.".to_string(),
                "You are missing these skills: react".to_string(),
            ]
        );
    }

    #[test]
    fn test_full_marks() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let comparison = make_comparison(&taxonomy, &["python", "flask"], &["python", "flask"]);
        let projects = vec![make_project(&taxonomy, "Built an API", &["flask"])];
        let card = score(&ScoreInputs {
            comparison: &comparison,
            projects: &projects,
            has_experience_mention: true,
            has_achievement_mention: true,
        });
        assert_eq!(card.score, 90);
        assert!(card.breakdown.has_relevant_project);
        assert!(card.feedback.is_empty());
    }

    #[test]
    fn test_related_skill_counts_for_project_relevance() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let comparison = make_comparison(&taxonomy, &["pytorch"], &["deep learning"]);
        let projects = vec![make_project(&taxonomy, "Trained a CNN", &["deep learning"])];
        let card = score(&ScoreInputs {
            comparison: &comparison,
            projects: &projects,
            has_experience_mention: false,
            has_achievement_mention: false,
        });
        assert_eq!(card.breakdown.experience_and_projects, 10);
        assert_eq!(card.score, 75);
    }

    #[test]
    fn test_irrelevant_project_adds_nothing() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let comparison = make_comparison(&taxonomy, &["python"], &["python"]);
        let projects = vec![make_project(&taxonomy, "Built a game", &["unity"])];
        let card = score(&ScoreInputs {
            comparison: &comparison,
            projects: &projects,
            has_experience_mention: false,
            has_achievement_mention: false,
        });
        assert!(!card.breakdown.has_relevant_project);
        assert_eq!(card.score, 65);
    }

    #[test]
    fn test_weights_validation() {
        let bad = ScoringWeights {
            missing_penalty: 70,
            ..ScoringWeights::default()
        };
        assert!(WeightedFitScorer::new(bad).is_err());

        let bad = ScoringWeights {
            experience_or_projects: 30,
            ..ScoringWeights::default()
        };
        assert!(WeightedFitScorer::new(bad).is_err());
    }

    #[test]
    fn test_oversized_weights_clamp_to_max() {
        let scorer = WeightedFitScorer::new(ScoringWeights {
            skills_base: 90,
            presentation: 50,
            ..ScoringWeights::default()
        })
        .unwrap();
        let comparison = ComparisonResult::default();
        let card = scorer
            .score(&ScoreInputs {
                comparison: &comparison,
                projects: &[],
                has_experience_mention: false,
                has_achievement_mention: false,
            })
            .unwrap();
        assert_eq!(card.score, 100);
        assert_eq!(scorer.backend(), "weighted");
    }

    #[test]
    fn test_project_feedback() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let projects = vec![
            make_project(&taxonomy, "Chat app", &["node.js"]),
            make_project(&taxonomy, "Photo album", &["php"]),
        ];
        let jd = make_skills(&taxonomy, &["node.js"]);
        let lines = build_project_feedback(&projects, &jd);
        assert_eq!(
            lines,
            vec![
                "The project 'Chat app' uses skills relevant to the job description.".to_string(),
                "The project 'Photo album' does not directly match the job description."
                    .to_string(),
            ]
        );
    }

    proptest! {
        #[test]
        fn prop_score_is_bounded(
            missing in any::<bool>(),
            experience in any::<bool>(),
            achievement in any::<bool>(),
            relevant_projects in 0usize..4,
        ) {
            let taxonomy = Taxonomy::builtin().unwrap();
            let jd: &[&str] = if missing { &["python", "react"] } else { &["python"] };
            let comparison = make_comparison(&taxonomy, &["python"], jd);
            let projects: Vec<ProjectStatement> = (0..relevant_projects)
                .map(|i| make_project(&taxonomy, &format!("Project {i}"), &["python"]))
                .collect();
            let card = score(&ScoreInputs {
                comparison: &comparison,
                projects: &projects,
                has_experience_mention: experience,
                has_achievement_mention: achievement,
            });
            prop_assert!(card.score <= 100);
        }

        #[test]
        fn prop_relevant_project_never_lowers_score(
            missing in any::<bool>(),
            experience in any::<bool>(),
            achievement in any::<bool>(),
        ) {
            let taxonomy = Taxonomy::builtin().unwrap();
            let jd: &[&str] = if missing { &["python", "react"] } else { &["python"] };
            let comparison = make_comparison(&taxonomy, &["python"], jd);
            let base = ScoreInputs {
                comparison: &comparison,
                projects: &[],
                has_experience_mention: experience,
                has_achievement_mention: achievement,
            };
            let projects = vec![make_project(&taxonomy, "Built a service", &["python"])];
            let with_project = ScoreInputs { projects: &projects, ..base.clone() };
            prop_assert!(score(&with_project).score >= score(&base).score);
        }
    }
}
