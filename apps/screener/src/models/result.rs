use serde::{Deserialize, Serialize};

use crate::models::ordered_map::OrderedMap;
use crate::scoring::{ProficiencyLevel, ScoreCard};

/// Candidate file name → normalized resume text, in processing order.
pub type CandidateTexts = OrderedMap<String>;

/// One ranked row of the screening table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeResult {
    #[serde(rename = "Candidate")]
    pub candidate: String,
    #[serde(rename = "Courses")]
    pub courses: Vec<String>,
    #[serde(rename = "Course Levels")]
    pub course_levels: OrderedMap<ProficiencyLevel>,
    #[serde(rename = "Certifications")]
    pub certifications: Vec<String>,
    #[serde(rename = "Probability")]
    pub probability: f64,
}

impl ResumeResult {
    pub fn new(candidate: impl Into<String>, card: ScoreCard) -> Self {
        Self {
            candidate: candidate.into(),
            courses: card.courses,
            course_levels: card.course_levels,
            certifications: card.certifications,
            probability: card.probability,
        }
    }
}
