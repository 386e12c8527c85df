use std::fmt;

use serde::{Deserialize, Serialize};

/// How strongly a resume covers a course, from its raw keyword hit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProficiencyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ProficiencyLevel {
    /// Level for a course with `count` keyword hits, or `None` when the course
    /// was not matched at all.
    ///
    /// Thresholds are not monotonic: exactly 2 hits is Intermediate while
    /// exactly 3 falls back to Beginner. Keep it that way; existing rankings
    /// depend on it.
    pub fn from_count(count: usize) -> Option<Self> {
        match count {
            0 => None,
            c if c > 3 => Some(Self::Advanced),
            2 => Some(Self::Intermediate),
            _ => Some(Self::Beginner),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
