use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use crate::extraction::skills::SkillExtractor;
use crate::taxonomy::{SkillSet, Taxonomy};

/// Max characters kept in a project name.
pub const MAX_PROJECT_NAME_CHARS: usize = 80;

/// Action words that mark a statement as project-like. A line carrying one is
/// a statement, never a heading.
const ACTION_KEYWORDS: &[&str] = &[
    "developed",
    "built",
    "created",
    "implemented",
    "designed",
    "engineered",
    "deployed",
    "contributed",
];

/// Ownership words that mark a statement as project-like.
const OWNERSHIP_KEYWORDS: &[&str] = &["project", "pipeline", "system"];

/// Statements from these sections are never projects.
const EXCLUDE_KEYWORDS: &[&str] = &["education", "mentor", "activities"];

const BULLETS: &[char] = &['-', '•'];

/// Max words in a line treated as a "Projects" heading.
const MAX_HEADING_WORDS: usize = 5;

static PROJECTS_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bprojects\b").expect("valid heading regex"));

/// `Skills:` / `Technical Skills -` / `Tools:` style lead-ins.
static SKILLS_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:[a-z ]{0,30}\s)?(?:skills|technologies|expertise|tools)\s*[:\-]")
        .expect("valid skills heading regex")
});

// ────────────────────────────────────────────────────────────────────────────
// Data model
// ────────────────────────────────────────────────────────────────────────────

/// One project-like statement and the skills found in it. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectStatement {
    name: String,
    skills: SkillSet,
}

impl ProjectStatement {
    /// Builds a statement whose name is `statement` cut at the first `:` and
    /// truncated to [`MAX_PROJECT_NAME_CHARS`] characters (no ellipsis).
    /// `None` when nothing nameable remains.
    pub fn from_statement(statement: &str, skills: SkillSet) -> Option<Self> {
        let head = statement.split(':').next().unwrap_or_default();
        let name: String = head.trim().chars().take(MAX_PROJECT_NAME_CHARS).collect();
        let name = name.trim_end().to_string();
        if name.is_empty() {
            return None;
        }
        Some(Self { name, skills })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn skills(&self) -> &SkillSet {
        &self.skills
    }

    /// Lowercase trimmed name, used for exact-duplicate detection.
    pub fn dedup_key(&self) -> String {
        self.name.trim().to_lowercase()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Detection
// ────────────────────────────────────────────────────────────────────────────

/// Finds project statements in résumé text.
pub struct ProjectDetector<'a> {
    extractor: SkillExtractor<'a>,
}

impl<'a> ProjectDetector<'a> {
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        Self {
            extractor: SkillExtractor::new(taxonomy),
        }
    }

    /// Project candidates in discovery order, before deduplication.
    ///
    /// Inside a "Projects" section every bullet line is a candidate. Elsewhere
    /// a sentence qualifies on keywords. Candidates with no skills are dropped.
    pub fn detect(&self, text: &str) -> Vec<ProjectStatement> {
        let mut projects = Vec::new();
        let mut in_section = false;

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                in_section = false;
                continue;
            }
            if is_projects_heading(trimmed) {
                in_section = true;
                continue;
            }
            if trimmed.ends_with(':') {
                in_section = false;
            }

            if in_section {
                if let Some(body) = trimmed.strip_prefix(BULLETS) {
                    self.push_candidate(body.trim(), &mut projects);
                    continue;
                }
            }

            for sentence in trimmed.unicode_sentences() {
                let sentence = sentence.trim();
                if is_keyword_statement(sentence) {
                    let body = sentence.trim_start_matches(BULLETS).trim();
                    self.push_candidate(body, &mut projects);
                }
            }
        }

        projects
    }

    fn push_candidate(&self, statement: &str, projects: &mut Vec<ProjectStatement>) {
        let skills = self.extractor.extract(statement);
        if skills.is_empty() {
            debug!("Dropping project candidate without skills: {statement:?}");
            return;
        }
        match ProjectStatement::from_statement(statement, skills) {
            Some(project) => projects.push(project),
            None => debug!("Dropping project candidate without a name: {statement:?}"),
        }
    }
}

/// "Projects", "Personal Projects:" and the like. "Built 3 projects with React"
/// is a statement, not a heading.
fn is_projects_heading(line: &str) -> bool {
    !line.starts_with(BULLETS)
        && line.split_whitespace().count() <= MAX_HEADING_WORDS
        && PROJECTS_HEADING_RE.is_match(line)
        && !contains_any(&line.to_lowercase(), ACTION_KEYWORDS)
}

fn is_keyword_statement(sentence: &str) -> bool {
    let lower = sentence.to_lowercase();
    (contains_any(&lower, ACTION_KEYWORDS) || contains_any(&lower, OWNERSHIP_KEYWORDS))
        && !contains_any(&lower, EXCLUDE_KEYWORDS)
        && !SKILLS_HEADING_RE.is_match(sentence)
}

fn contains_any(lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| lower.contains(kw))
}
