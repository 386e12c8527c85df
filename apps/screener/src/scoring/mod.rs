//! Keyword scorer: matches normalized resume text against reference course
//! and certification keyword lists.
//!
//! Algorithm:
//! 1. Denominator = number of course keywords (certifications don't count).
//! 2. Per course: sum of non-overlapping substring occurrences of each keyword.
//!    Any hit marks the course as matched and assigns a `ProficiencyLevel`.
//! 3. Per certification: matched when any keyword occurs at all.
//! 4. probability = round(hits / denominator, 2), clamped to [0, 1].
//!
//! Matching is plain substring search: "pythonic" counts as a hit for "python".

mod level;

use tracing::{debug, warn};

use crate::models::{KeywordCatalog, OrderedMap, ReferenceData};

pub use level::ProficiencyLevel;

/// Everything the scorer concluded about one resume.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreCard {
    /// Matched course names, in reference order.
    pub courses: Vec<String>,
    pub course_levels: OrderedMap<ProficiencyLevel>,
    /// Matched certification names, in reference order.
    pub certifications: Vec<String>,
    /// Total course keyword hits across all courses.
    pub matched_keywords: usize,
    pub probability: f64,
}

/// Scores resume text against reference data fixed at construction.
#[derive(Debug, Clone)]
pub struct Scorer {
    courses: KeywordCatalog,
    certifications: KeywordCatalog,
    total_keywords: usize,
}

impl Scorer {
    /// Keywords are lowercased once here; the text handed to `score` is
    /// expected to be lowercase already. Blank keywords are dropped because
    /// an empty pattern matches every position of every text.
    pub fn new(reference: ReferenceData) -> Self {
        let courses = prepare_catalog(&reference.courses, "course");
        let certifications = prepare_catalog(&reference.certifications, "certification");
        let total_keywords = courses.values().map(Vec::len).sum();

        Self {
            courses,
            certifications,
            total_keywords,
        }
    }

    pub fn total_keywords(&self) -> usize {
        self.total_keywords
    }

    pub fn score(&self, text: &str) -> ScoreCard {
        let mut card = ScoreCard::default();

        for (course, keywords) in self.courses.iter() {
            let count: usize = keywords.iter().map(|k| count_occurrences(text, k)).sum();
            card.matched_keywords += count;

            if let Some(level) = ProficiencyLevel::from_count(count) {
                debug!(course, count, %level, "course matched");
                card.courses.push(course.to_string());
                card.course_levels.insert(course, level);
            }
        }

        for (certification, keywords) in self.certifications.iter() {
            if keywords.iter().any(|k| text.contains(k.as_str())) {
                card.certifications.push(certification.to_string());
            }
        }

        card.probability = probability(card.matched_keywords, self.total_keywords);
        card
    }
}

fn prepare_catalog(catalog: &KeywordCatalog, kind: &str) -> KeywordCatalog {
    catalog
        .iter()
        .map(|(name, keywords)| {
            let cleaned: Vec<String> = keywords
                .iter()
                .filter(|k| {
                    let blank = k.trim().is_empty();
                    if blank {
                        warn!("Ignoring blank keyword for {kind} '{name}'");
                    }
                    !blank
                })
                .map(|k| k.to_lowercase())
                .collect();
            (name, cleaned)
        })
        .collect()
}

/// Non-overlapping occurrences of `keyword` in `text`.
fn count_occurrences(text: &str, keyword: &str) -> usize {
    text.matches(keyword).count()
}

/// Hit ratio rounded to two decimals. Raw hit counts can exceed the number
/// of reference keywords, so the ratio is clamped to 1.0.
///
/// Rounding goes through the decimal formatter, which works on the exact
/// binary value: 0.025 is stored slightly above 0.025 and rounds to 0.03.
/// Scaling by 100 first would land on 2.5 and round to 0.02.
fn probability(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let ratio = matched as f64 / total as f64;
    format!("{ratio:.2}")
        .parse::<f64>()
        .unwrap_or(0.0)
        .clamp(0.0, 1.0)
}
