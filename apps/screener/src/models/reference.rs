use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ordered_map::OrderedMap;

/// Name → keyword list, in the order the names were declared.
pub type KeywordCatalog = OrderedMap<Vec<String>>;

const BUILTIN_COURSES: &[(&str, &[&str])] = &[
    ("Python", &["python", "data analysis", "pandas", "numpy"]),
    (
        "Machine Learning",
        &["machine learning", "tensorflow", "keras", "scikit-learn"],
    ),
    (
        "Digital Marketing",
        &["digital marketing", "seo", "google analytics"],
    ),
    (
        "Web Development",
        &["html", "css", "javascript", "react", "node"],
    ),
    ("Cloud Computing", &["aws", "azure", "gcp", "cloud"]),
];

const BUILTIN_CERTIFICATIONS: &[(&str, &[&str])] = &[
    (
        "AWS Certified Solutions Architect",
        &["aws certified solutions architect", "aws certification"],
    ),
    (
        "Google Data Analytics",
        &["google data analytics", "data analytics certificate"],
    ),
];

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("failed to read reference file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid reference file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Course and certification keyword lists the scorer matches against.
///
/// File schema:
/// `{ "courses": { name: [keyword, ...] }, "certifications": { name: [keyword, ...] } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub courses: KeywordCatalog,
    #[serde(default)]
    pub certifications: KeywordCatalog,
}

impl ReferenceData {
    /// The stock reference lists used when no reference file is configured.
    pub fn builtin() -> Self {
        Self {
            courses: catalog_from(BUILTIN_COURSES),
            certifications: catalog_from(BUILTIN_CERTIFICATIONS),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ReferenceError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ReferenceError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ReferenceError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

fn catalog_from(table: &[(&str, &[&str])]) -> KeywordCatalog {
    table
        .iter()
        .map(|(name, keywords)| {
            (
                *name,
                keywords.iter().map(|k| k.to_string()).collect::<Vec<_>>(),
            )
        })
        .collect()
}
