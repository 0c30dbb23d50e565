use std::collections::BTreeSet;

use serde::Serialize;

use crate::taxonomy::{SkillSet, Taxonomy};

/// Partition of the JD skills against a résumé.
///
/// `common`, `missing` and `related` are pairwise disjoint and their union is
/// exactly the JD skill set. `related` holds JD skills the résumé lacks but
/// that one of its skills implies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    common: SkillSet,
    missing: SkillSet,
    related: SkillSet,
}

impl ComparisonResult {
    pub fn common(&self) -> &SkillSet {
        &self.common
    }

    pub fn missing(&self) -> &SkillSet {
        &self.missing
    }

    pub fn related(&self) -> &SkillSet {
        &self.related
    }

    /// The JD skills this result was computed from.
    pub fn jd_skills(&self) -> SkillSet {
        self.common
            .iter()
            .chain(&self.missing)
            .chain(&self.related)
            .cloned()
            .collect()
    }
}

pub struct SkillComparator<'a> {
    taxonomy: &'a Taxonomy,
}

impl<'a> SkillComparator<'a> {
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        Self { taxonomy }
    }

    /// Compares through synonym expansion first; the related-skill graph only
    /// moves skills from `missing` to `related`, never into `common`.
    pub fn compare(&self, resume: &SkillSet, jd: &SkillSet) -> ComparisonResult {
        let resume_forms: BTreeSet<String> = resume
            .iter()
            .flat_map(|skill| self.taxonomy.surface_forms(skill))
            .collect();

        let mut result = ComparisonResult::default();

        for skill in jd {
            let matched = self
                .taxonomy
                .surface_forms(skill)
                .iter()
                .any(|form| resume_forms.contains(form));
            if matched {
                result.common.insert(skill.clone());
                continue;
            }

            let implied = resume
                .iter()
                .any(|have| self.taxonomy.related(have).contains(skill));
            if implied {
                result.related.insert(skill.clone());
            } else {
                result.missing.insert(skill.clone());
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::CanonicalSkill;
    use proptest::prelude::*;

    fn make_set(taxonomy: &Taxonomy, surfaces: &[&str]) -> SkillSet {
        surfaces
            .iter()
            .filter_map(|s| taxonomy.canonicalize(s))
            .collect()
    }

    fn names(skills: &SkillSet) -> Vec<&str> {
        skills.iter().map(CanonicalSkill::as_str).collect()
    }

    #[test]
    fn test_common_and_missing() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let comparator = SkillComparator::new(&taxonomy);
        let result = comparator.compare(
            &make_set(&taxonomy, &["Python", "SQL"]),
            &make_set(&taxonomy, &["Python", "React"]),
        );
        assert_eq!(names(result.common()), vec!["python"]);
        assert_eq!(names(result.missing()), vec!["react"]);
        assert!(result.related().is_empty());
    }

    #[test]
    fn test_synonyms_match() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let comparator = SkillComparator::new(&taxonomy);
        let result = comparator.compare(
            &make_set(&taxonomy, &["JS", "k8s"]),
            &make_set(&taxonomy, &["JavaScript", "Kubernetes"]),
        );
        assert_eq!(names(result.common()), vec!["javascript", "kubernetes"]);
        assert!(result.missing().is_empty());
    }

    #[test]
    fn test_related_softens_missing() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let comparator = SkillComparator::new(&taxonomy);
        let result = comparator.compare(
            &make_set(&taxonomy, &["pytorch"]),
            &make_set(&taxonomy, &["deep learning"]),
        );
        assert!(result.common().is_empty());
        assert!(result.missing().is_empty());
        assert_eq!(names(result.related()), vec!["deep learning"]);
    }

    #[test]
    fn test_related_is_directed() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let comparator = SkillComparator::new(&taxonomy);
        // deep learning does not imply pytorch.
        let result = comparator.compare(
            &make_set(&taxonomy, &["deep learning"]),
            &make_set(&taxonomy, &["pytorch"]),
        );
        assert_eq!(names(result.missing()), vec!["pytorch"]);
    }

    #[test]
    fn test_unknown_skills_compare_by_name() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let comparator = SkillComparator::new(&taxonomy);
        let result = comparator.compare(
            &make_set(&taxonomy, &["quantum widgets"]),
            &make_set(&taxonomy, &["Quantum  Widgets", "Basket Weaving"]),
        );
        assert_eq!(names(result.common()), vec!["Quantum Widgets"]);
        assert_eq!(names(result.missing()), vec!["Basket Weaving"]);
    }

    #[test]
    fn test_empty_jd() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let comparator = SkillComparator::new(&taxonomy);
        let result = comparator.compare(&make_set(&taxonomy, &["python"]), &SkillSet::new());
        assert_eq!(result, ComparisonResult::default());
        assert!(result.jd_skills().is_empty());
    }

    proptest! {
        #[test]
        fn prop_partition_is_disjoint_and_complete(
            resume in prop::collection::vec(
                prop::sample::select(vec!["python", "pytorch", "js", "sql", "docker", "flask", "rust async", "react"]),
                0..6,
            ),
            jd in prop::collection::vec(
                prop::sample::select(vec!["python", "deep learning", "javascript", "mysql", "kubernetes", "api", "go lang", "react"]),
                0..6,
            ),
        ) {
            let taxonomy = Taxonomy::builtin().unwrap();
            let comparator = SkillComparator::new(&taxonomy);
            let jd_set = make_set(&taxonomy, &jd);
            let r = comparator.compare(&make_set(&taxonomy, &resume), &jd_set);

            prop_assert!(r.common().is_disjoint(r.missing()));
            prop_assert!(r.related().is_disjoint(r.common()));
            prop_assert!(r.related().is_disjoint(r.missing()));
            prop_assert_eq!(r.jd_skills(), jd_set);
        }
    }
}
