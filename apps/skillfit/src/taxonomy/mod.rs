//! Skill taxonomy: canonical skill names, synonym lookup, and the related-skill graph.
//!
//! Built once at startup (from the built-in tables or a JSON file) and shared by
//! reference for the lifetime of the process. Nothing here mutates after construction.

pub mod tables;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::MatchError;

/// Empty set returned for skills with no related-skill edges.
static NO_RELATED: SkillSet = BTreeSet::new();

// ────────────────────────────────────────────────────────────────────────────
// Data model
// ────────────────────────────────────────────────────────────────────────────

/// A skill identity in canonical form.
///
/// Known skills carry the taxonomy's canonical name (`"machine learning"`);
/// unknown skills carry the title-cased normalized mention (`"Rust Async"`).
/// Only the taxonomy constructs these.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CanonicalSkill(String);

impl CanonicalSkill {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalSkill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalSkill {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A set of canonical skills. Ordered so reports and feedback are stable.
pub type SkillSet = BTreeSet<CanonicalSkill>;

/// One canonical skill and the surface forms that resolve to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynonymEntry {
    pub canonical: String,
    #[serde(default)]
    pub forms: Vec<String>,
}

/// One related-skill edge list: having `skill` implies partial competency in `implies`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedEntry {
    pub skill: String,
    #[serde(default)]
    pub implies: Vec<String>,
}

/// Serializable taxonomy asset. Entries are applied in order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxonomyDefinition {
    #[serde(default)]
    pub synonyms: Vec<SynonymEntry>,
    #[serde(default)]
    pub related: Vec<RelatedEntry>,
}

// ────────────────────────────────────────────────────────────────────────────
// Normalization
// ────────────────────────────────────────────────────────────────────────────

/// Normalizes a raw skill mention: lowercases, turns every character other than
/// alphanumerics and `.`, `+`, `#` into a space, collapses whitespace and drops
/// trailing dots (sentence punctuation).
///
/// `"  Node.JS, "` → `"node.js"`, `"CI/CD"` → `"ci cd"`, `"Python."` → `"python"`.
pub fn normalize_skill(surface: &str) -> String {
    let spaced: String = surface
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '+' | '#') {
                c
            } else {
                ' '
            }
        })
        .collect();
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches(|c: char| c == '.' || c == ' ')
        .to_string()
}

/// Upper-cases the first character of each word when that round-trips through
/// lowercase unchanged, so `normalize_skill(title_case(x)) == x` for normalized `x`.
fn title_case(normalized: &str) -> String {
    normalized
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let upper: Vec<char> = first.to_uppercase().collect();
                    let round_trips = upper.len() == 1
                        && upper[0].to_lowercase().eq(std::iter::once(first));
                    let head = if round_trips { upper[0] } else { first };
                    std::iter::once(head).chain(chars).collect::<String>()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ────────────────────────────────────────────────────────────────────────────
// Taxonomy
// ────────────────────────────────────────────────────────────────────────────

/// Immutable skill taxonomy.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    /// normalized surface form → canonical skill (a function, never a relation)
    lookup: HashMap<String, CanonicalSkill>,
    /// canonical skill → normalized surface forms that resolve to it (incl. its own name)
    forms: BTreeMap<CanonicalSkill, BTreeSet<String>>,
    related: BTreeMap<CanonicalSkill, SkillSet>,
    /// word count of the longest surface form; bounds phrase-window scans
    max_form_words: usize,
}

impl Taxonomy {
    /// The built-in hand-curated taxonomy.
    pub fn builtin() -> Result<Self, MatchError> {
        Self::from_definition(tables::builtin_definition())
    }

    /// Loads a taxonomy asset from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, MatchError> {
        let raw = std::fs::read_to_string(path)?;
        let definition: TaxonomyDefinition = serde_json::from_str(&raw).map_err(|e| {
            MatchError::Taxonomy(format!("invalid taxonomy file {}: {e}", path.display()))
        })?;
        let taxonomy = Self::from_definition(definition)?;
        info!(
            "Loaded taxonomy from {} ({} canonical skills)",
            path.display(),
            taxonomy.len()
        );
        Ok(taxonomy)
    }

    /// Builds a taxonomy, validating the canonical-name invariant.
    ///
    /// Collision policy: when two entries claim the same surface form, the entry
    /// registered last wins. A canonical name always resolves to itself, even if
    /// another entry lists it as a synonym.
    pub fn from_definition(definition: TaxonomyDefinition) -> Result<Self, MatchError> {
        let mut taxonomy = Taxonomy {
            lookup: HashMap::new(),
            forms: BTreeMap::new(),
            related: BTreeMap::new(),
            max_form_words: 1,
        };

        let mut canonicals = Vec::with_capacity(definition.synonyms.len());
        for entry in &definition.synonyms {
            let canonical = normalize_skill(&entry.canonical);
            if canonical.is_empty() || canonical != entry.canonical {
                return Err(MatchError::Taxonomy(format!(
                    "canonical name '{}' is not in normalized form (expected '{}')",
                    entry.canonical, canonical
                )));
            }
            let skill = CanonicalSkill(canonical);
            taxonomy.forms.entry(skill.clone()).or_default();
            canonicals.push(skill);
        }

        for (entry, skill) in definition.synonyms.iter().zip(&canonicals) {
            for form in &entry.forms {
                let normalized = normalize_skill(form);
                if normalized.is_empty() {
                    continue;
                }
                taxonomy.register(normalized, skill);
            }
        }
        // Self names last so each canonical name resolves to itself.
        for skill in &canonicals {
            taxonomy.register(skill.0.clone(), skill);
        }

        taxonomy.max_form_words = taxonomy
            .lookup
            .keys()
            .map(|form| form.split(' ').count())
            .max()
            .unwrap_or(1);

        for entry in &definition.related {
            let Some(source) = taxonomy.canonicalize(&entry.skill) else {
                continue;
            };
            let targets: SkillSet = entry
                .implies
                .iter()
                .filter_map(|target| taxonomy.canonicalize(target))
                .filter(|target| *target != source)
                .collect();
            taxonomy.related.entry(source).or_default().extend(targets);
        }

        debug!(
            "Taxonomy built: {} canonical skills, {} surface forms, {} related sources",
            taxonomy.forms.len(),
            taxonomy.lookup.len(),
            taxonomy.related.len()
        );

        Ok(taxonomy)
    }

    fn register(&mut self, form: String, skill: &CanonicalSkill) {
        if let Some(previous) = self.lookup.insert(form.clone(), skill.clone()) {
            if previous != *skill {
                debug!("Surface form '{form}' reassigned from '{previous}' to '{skill}'");
                if let Some(forms) = self.forms.get_mut(&previous) {
                    forms.remove(&form);
                }
            }
        }
        self.forms.entry(skill.clone()).or_default().insert(form);
    }

    /// Resolves a raw mention to its canonical skill.
    ///
    /// Unknown mentions are kept as their title-cased normalized form so they can
    /// still surface as missing skills. Returns `None` only when the mention has no
    /// alphanumeric content at all.
    pub fn canonicalize(&self, surface: &str) -> Option<CanonicalSkill> {
        let normalized = normalize_skill(surface);
        if normalized.is_empty() {
            return None;
        }
        Some(
            self.lookup
                .get(&normalized)
                .cloned()
                .unwrap_or_else(|| CanonicalSkill(title_case(&normalized))),
        )
    }

    /// Resolves a raw mention only if the taxonomy knows it.
    pub fn resolve_known(&self, surface: &str) -> Option<CanonicalSkill> {
        self.lookup.get(&normalize_skill(surface)).cloned()
    }

    pub fn is_known(&self, surface: &str) -> bool {
        self.lookup.contains_key(&normalize_skill(surface))
    }

    /// Normalized surface forms of a skill (synonym expansion). Unknown skills
    /// expand to their own normalized form only.
    pub fn surface_forms(&self, skill: &CanonicalSkill) -> BTreeSet<String> {
        match self.forms.get(skill) {
            Some(forms) if !forms.is_empty() => forms.clone(),
            _ => BTreeSet::from([normalize_skill(skill.as_str())]),
        }
    }

    /// Skills directly implied by `skill` in the related-skill graph.
    pub fn related(&self, skill: &CanonicalSkill) -> &SkillSet {
        self.related.get(skill).unwrap_or(&NO_RELATED)
    }

    /// `skill` plus everything it implies, in canonical space (synonyms collapse
    /// onto the skill itself).
    pub fn expand(&self, skill: &CanonicalSkill) -> SkillSet {
        let mut expanded = self.related(skill).clone();
        expanded.insert(skill.clone());
        expanded
    }

    /// Every known normalized surface form with its canonical skill.
    pub fn known_forms(&self) -> impl Iterator<Item = (&str, &CanonicalSkill)> {
        self.lookup.iter().map(|(form, skill)| (form.as_str(), skill))
    }

    pub fn max_form_words(&self) -> usize {
        self.max_form_words
    }

    /// Number of canonical skills.
    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
