//! Screening run: list the resume folder, extract and score each file in
//! turn, then rank. Files are handled strictly one at a time.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::AppError;
use crate::extraction::{ExtractOutcome, Extractor};
use crate::models::{CandidateTexts, ResumeResult};
use crate::output;
use crate::scoring::Scorer;
use crate::state::AppState;

#[derive(Debug, Default)]
pub struct ScreeningReport {
    /// Candidate → normalized text, for every candidate with non-empty text.
    pub texts: CandidateTexts,
    /// Scored candidates, highest probability first.
    pub results: Vec<ResumeResult>,
    /// Candidates skipped for an unsupported file type.
    pub skipped: Vec<String>,
    /// Candidates whose extraction failed, with the reason.
    pub failed: Vec<(String, String)>,
}

/// Visible entries of `dir`, sorted by name. An empty or missing folder is
/// fatal for the run.
pub fn collect_resume_files(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NoResumes(dir.to_path_buf()))
        }
        Err(e) => return Err(AppError::Io(e)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        files.push(entry.path());
    }

    if files.is_empty() {
        return Err(AppError::NoResumes(dir.to_path_buf()));
    }
    files.sort();
    Ok(files)
}

pub async fn run(state: &AppState) -> Result<ScreeningReport, AppError> {
    let files = collect_resume_files(&state.config.resume_folder)?;
    info!(
        "Found {} file(s) in {}",
        files.len(),
        state.config.resume_folder.display()
    );
    Ok(screen_files(&files, &state.extractor, &state.scorer).await)
}

/// Runs the screening and writes every artifact. Nothing is written when
/// the run fails.
pub async fn run_and_save(state: &AppState) -> Result<ScreeningReport, AppError> {
    let report = run(state).await?;
    output::write_all(&state.config, &report)?;
    Ok(report)
}

pub async fn screen_files(
    files: &[PathBuf],
    extractor: &Extractor,
    scorer: &Scorer,
) -> ScreeningReport {
    let mut report = ScreeningReport::default();

    for path in files {
        let candidate = candidate_name(path);

        let text = match extractor.extract(path).await {
            ExtractOutcome::Extracted(text) => text,
            ExtractOutcome::Unsupported { extension } => {
                debug!("{candidate}: no extractor for extension '{extension}'");
                report.skipped.push(candidate);
                continue;
            }
            ExtractOutcome::Failed { reason } => {
                report.failed.push((candidate, reason));
                continue;
            }
        };
        info!("{candidate} extracted: {} chars", text.char_count());

        if text.is_empty() {
            continue;
        }

        let card = scorer.score(text.as_str());
        info!(
            "{candidate}: {} course(s), {} certification(s), probability {:.2}",
            card.courses.len(),
            card.certifications.len(),
            card.probability
        );
        report
            .results
            .push(ResumeResult::new(candidate.clone(), card));
        report.texts.insert(candidate, text.into_string());
    }

    rank(&mut report.results);
    report
}

/// Highest probability first; equal scores keep their processing order.
pub fn rank(results: &mut [ResumeResult]) {
    results.sort_by(|a, b| b.probability.total_cmp(&a.probability));
}

fn candidate_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::extraction::docx::tests::{paragraph, write_docx};
    use crate::extraction::ocr::OcrScope;
    use crate::extraction::pdf::tests::{FakeOcr, FakeRenderer};
    use crate::models::{OrderedMap, ReferenceData};
    use crate::scoring::ProficiencyLevel;
    use std::sync::Arc;

    fn extractor() -> Extractor {
        Extractor::new(
            Arc::new(FakeOcr),
            Arc::new(FakeRenderer::new(1)),
            OcrScope::Document,
        )
    }

    /// State whose input folder and output files all live under `root`.
    fn state_in(root: &Path) -> AppState {
        let path = |name: &str| root.join(name).to_string_lossy().into_owned();
        let env = [
            ("RESUME_FOLDER", path("resumes")),
            ("OUTPUT_JSON", path("texts.json")),
            ("OUTPUT_CSV", path("analysis.csv")),
            ("OUTPUT_XLSX", path("analysis.xlsx")),
        ];
        let config = Config::from_lookup(|key| {
            env.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
        })
        .unwrap();

        AppState {
            config,
            extractor: extractor(),
            scorer: Scorer::new(ReferenceData::builtin()),
        }
    }

    fn output_paths(state: &AppState) -> [PathBuf; 3] {
        [
            state.config.output_json.clone(),
            state.config.output_csv.clone(),
            state.config.output_xlsx.clone(),
        ]
    }

    fn result(candidate: &str, probability: f64) -> ResumeResult {
        ResumeResult {
            candidate: candidate.to_string(),
            courses: vec![],
            course_levels: OrderedMap::new(),
            certifications: vec![],
            probability,
        }
    }

    #[test]
    fn test_empty_folder_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_resume_files(dir.path()).unwrap_err();
        assert!(matches!(err, AppError::NoResumes(_)));
    }

    #[test]
    fn test_missing_folder_is_fatal() {
        let err = collect_resume_files(Path::new("/nonexistent/resumes")).unwrap_err();
        assert!(matches!(err, AppError::NoResumes(_)));
    }

    #[tokio::test]
    async fn test_empty_folder_aborts_before_writing_output() {
        let root = tempfile::tempdir().unwrap();
        let state = state_in(root.path());
        std::fs::create_dir(&state.config.resume_folder).unwrap();

        let err = run_and_save(&state).await.unwrap_err();
        assert!(matches!(err, AppError::NoResumes(_)));
        for path in output_paths(&state) {
            assert!(!path.exists(), "{} should not exist", path.display());
        }
    }

    #[tokio::test]
    async fn test_missing_folder_aborts_before_writing_output() {
        let root = tempfile::tempdir().unwrap();
        let state = state_in(root.path());

        let err = run_and_save(&state).await.unwrap_err();
        assert!(matches!(err, AppError::NoResumes(_)));
        for path in output_paths(&state) {
            assert!(!path.exists(), "{} should not exist", path.display());
        }
    }

    #[tokio::test]
    async fn test_run_and_save_writes_every_artifact() {
        let root = tempfile::tempdir().unwrap();
        let state = state_in(root.path());
        std::fs::create_dir(&state.config.resume_folder).unwrap();
        write_docx(
            &state.config.resume_folder.join("jane.docx"),
            &paragraph("React and Node developer"),
        );

        let report = run_and_save(&state).await.unwrap();
        assert_eq!(report.results.len(), 1);
        for path in output_paths(&state) {
            assert!(path.exists(), "{} should exist", path.display());
        }
    }

    #[test]
    fn test_hidden_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".DS_Store"), b"").unwrap();
        let err = collect_resume_files(dir.path()).unwrap_err();
        assert!(matches!(err, AppError::NoResumes(_)));

        std::fs::write(dir.path().join("b.pdf"), b"").unwrap();
        std::fs::write(dir.path().join("a.docx"), b"").unwrap();
        let files = collect_resume_files(dir.path()).unwrap();
        let names: Vec<String> = files.iter().map(|p| candidate_name(p)).collect();
        assert_eq!(names, vec!["a.docx", "b.pdf"]);
    }

    #[test]
    fn test_rank_is_descending_and_stable() {
        let mut results = vec![
            result("low.pdf", 0.1),
            result("tie-first.pdf", 0.5),
            result("high.pdf", 0.9),
            result("tie-second.pdf", 0.5),
        ];
        rank(&mut results);
        let order: Vec<&str> = results.iter().map(|r| r.candidate.as_str()).collect();
        assert_eq!(
            order,
            vec!["high.pdf", "tie-first.pdf", "tie-second.pdf", "low.pdf"]
        );
    }

    #[tokio::test]
    async fn test_batch_survives_bad_and_unsupported_files() {
        let dir = tempfile::tempdir().unwrap();
        let strong = dir.path().join("strong.docx");
        write_docx(
            &strong,
            &format!(
                "{}{}",
                paragraph("Python, pandas and numpy for data analysis"),
                paragraph("AWS certification")
            ),
        );
        let weak = dir.path().join("weak.docx");
        write_docx(&weak, &paragraph("Built a site with HTML"));
        let blank = dir.path().join("blank.docx");
        write_docx(&blank, &paragraph("   "));
        let broken = dir.path().join("broken.pdf");
        std::fs::write(&broken, b"not a pdf").unwrap();
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, "python").unwrap();

        let files = collect_resume_files(dir.path()).unwrap();
        let scorer = Scorer::new(ReferenceData::builtin());
        let report = screen_files(&files, &extractor(), &scorer).await;

        let order: Vec<&str> = report.results.iter().map(|r| r.candidate.as_str()).collect();
        assert_eq!(order, vec!["strong.docx", "weak.docx"]);
        assert_eq!(report.skipped, vec!["notes.txt"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "broken.pdf");

        // blank text is neither scored nor kept
        assert_eq!(report.texts.len(), 2);
        assert!(report.texts.get("blank.docx").is_none());
        assert_eq!(
            report.texts.get("weak.docx").map(String::as_str),
            Some("built a site with html")
        );

        let strong = &report.results[0];
        assert_eq!(
            strong.course_levels.get("Python"),
            Some(&ProficiencyLevel::Advanced)
        );
        assert_eq!(strong.certifications, vec!["AWS Certified Solutions Architect"]);
    }
}
