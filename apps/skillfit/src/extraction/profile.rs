use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}").expect("valid email regex")
});

/// Tried in order; the first pattern with a match wins.
static PHONE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(\+?\d{1,3})?[\s.\-]?\(?\d{3,4}\)?[\s.\-]?\d{3,4}[\s.\-]?\d{3,4}",
        r"\b\d{10}\b",
        r"\b\d{3}[\-.]\d{3}[\-.]\d{4}\b",
        r"\b\d{5}\s\d{5}\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid phone regex"))
    .collect()
});

/// Lines mentioning any of these are contact details, not a name.
const CONTACT_MARKERS: &[&str] = &["email", "@", "phone", "mobile", "linkedin"];

const NAME_SCAN_LINES: usize = 10;
const MAX_NAME_WORDS: usize = 4;

const ACHIEVEMENT_MARKERS: &[&str] = &[
    "internship",
    "leetcode",
    "kaggle",
    "codeforces",
    "hackerrank",
    "codechef",
];

/// Identity fields lifted from the top of a résumé.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CandidateProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl CandidateProfile {
    pub fn extract(text: &str) -> Self {
        Self {
            name: extract_name(text),
            email: EMAIL_RE.find(text).map(|m| m.as_str().to_string()),
            phone: extract_phone(text),
        }
    }
}

/// First short non-contact line among the leading non-blank lines.
fn extract_name(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(NAME_SCAN_LINES)
        .find(|line| {
            let lower = line.to_lowercase();
            let words = line.split_whitespace().count();
            !CONTACT_MARKERS.iter().any(|marker| lower.contains(marker))
                && (1..=MAX_NAME_WORDS).contains(&words)
                && line.chars().any(char::is_alphabetic)
        })
        .map(str::to_string)
}

fn extract_phone(text: &str) -> Option<String> {
    PHONE_RES
        .iter()
        .find_map(|re| re.find(text))
        .map(|m| m.as_str().trim().to_string())
}

/// Keyword signals the scorer consumes as plain booleans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProfileSignals {
    pub has_experience_mention: bool,
    pub has_achievement_mention: bool,
}

impl ProfileSignals {
    pub fn detect(text: &str) -> Self {
        let lower = text.to_lowercase();
        Self {
            has_experience_mention: lower.contains("experience"),
            has_achievement_mention: ACHIEVEMENT_MARKERS.iter().any(|m| lower.contains(m)),
        }
    }
}
