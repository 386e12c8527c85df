use crate::config::Config;
use crate::extraction::Extractor;
use crate::scoring::Scorer;

/// Everything a screening run needs, built once in `main` and passed down.
pub struct AppState {
    pub config: Config,
    pub extractor: Extractor,
    /// Holds the reference keyword lists for the whole run.
    pub scorer: Scorer,
}
