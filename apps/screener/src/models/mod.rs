pub mod ordered_map;
pub mod reference;
pub mod result;

pub use ordered_map::OrderedMap;
pub use reference::{KeywordCatalog, ReferenceData, ReferenceError};
pub use result::{CandidateTexts, ResumeResult};
