use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::extraction::chunker::noun_phrases;
use crate::taxonomy::{normalize_skill, SkillSet, Taxonomy};

/// `skills: a, b, c`-style lines. The label either starts the line or is
/// followed by `:` / `-`. The capture is the rest of the line.
static LABELED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)(?:^[ \t]*(?:skills|technologies|expertise|tools)\b[ \t]*[:\-]?|\b(?:skills|technologies|expertise|tools)[ \t]*(?::|-(?:[ \t]|$)))[ \t]*([^\n]*)",
    )
    .expect("valid labeled-section regex")
});

/// Bytes of a labeled line scanned at most.
const MAX_LABELED_LINE: usize = 512;

/// Generic words that show up in skill lists but are not skills.
const IGNORE_TERMS: &[&str] = &[
    "experience",
    "team",
    "project",
    "projects",
    "company",
    "working",
    "environment",
    "skills",
    "knowledge",
    "understanding",
    "etc",
    "tools",
    "technologies",
    "expertise",
];

/// Forms shorter than this are too ambiguous for the raw JD substring fallback.
const MIN_FALLBACK_FORM_LEN: usize = 3;

/// Turns raw text into canonical skills using the taxonomy.
pub struct SkillExtractor<'a> {
    taxonomy: &'a Taxonomy,
}

impl<'a> SkillExtractor<'a> {
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        Self { taxonomy }
    }

    /// Union of the labeled-section and noun-phrase sources.
    pub fn extract(&self, text: &str) -> SkillSet {
        let mut skills = self.extract_labeled(text);
        skills.extend(self.extract_phrases(text));
        skills
    }

    /// Skills listed after a `skills` / `technologies` / `expertise` / `tools`
    /// label. Unknown entries are kept as title-cased skills.
    pub fn extract_labeled(&self, text: &str) -> SkillSet {
        let mut skills = SkillSet::new();

        for caps in LABELED_RE.captures_iter(text) {
            let Some(rest) = caps.get(1) else { continue };
            let line = truncate_at_char_boundary(rest.as_str(), MAX_LABELED_LINE);

            for piece in line.split([',', ';']) {
                // "CI/CD" is one skill, "Python/Java" is two.
                if self.taxonomy.is_known(piece) {
                    self.push_labeled(piece, &mut skills);
                } else {
                    for part in piece.split('/') {
                        self.push_labeled(part, &mut skills);
                    }
                }
            }
        }

        skills
    }

    fn push_labeled(&self, token: &str, skills: &mut SkillSet) {
        let normalized = normalize_skill(token);
        if normalized.is_empty() || IGNORE_TERMS.contains(&normalized.as_str()) {
            return;
        }
        if let Some(skill) = self.taxonomy.canonicalize(&normalized) {
            skills.insert(skill);
        }
    }

    /// Known skills found inside noun phrases. Each phrase is scanned left to
    /// right, taking the longest known form at each position.
    pub fn extract_phrases(&self, text: &str) -> SkillSet {
        let mut skills = SkillSet::new();
        let max_window = self.taxonomy.max_form_words();

        for phrase in noun_phrases(text) {
            let mut start = 0;
            while start < phrase.len() {
                let longest = (phrase.len() - start).min(max_window);
                let hit = (1..=longest).rev().find_map(|width| {
                    let candidate = phrase[start..start + width].join(" ");
                    self.taxonomy
                        .resolve_known(&candidate)
                        .map(|skill| (skill, width))
                });
                match hit {
                    Some((skill, width)) => {
                        skills.insert(skill);
                        start += width;
                    }
                    None => start += 1,
                }
            }
        }

        skills
    }

    /// JD extraction: the regular union, falling back to a whole-word scan for
    /// every known form when the union comes up empty.
    pub fn extract_jd(&self, text: &str) -> SkillSet {
        let skills = self.extract(text);
        if !skills.is_empty() {
            return skills;
        }

        let haystack = format!(" {} ", normalize_skill(text));
        let fallback: SkillSet = self
            .taxonomy
            .known_forms()
            .filter(|(form, _)| form.len() >= MIN_FALLBACK_FORM_LEN)
            .filter(|(form, _)| haystack.contains(&format!(" {form} ")))
            .map(|(_, skill)| skill.clone())
            .collect();

        if !fallback.is_empty() {
            debug!("JD extraction fell back to form scan: {} skills", fallback.len());
        }
        fallback
    }
}

fn truncate_at_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
