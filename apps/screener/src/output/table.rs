use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use crate::models::ResumeResult;
use crate::output::OutputError;

pub const COLUMNS: [&str; 5] = [
    "Candidate",
    "Courses",
    "Course Levels",
    "Certifications",
    "Probability",
];

/// Text cells for one row. List and mapping columns are JSON-encoded so they
/// can be parsed back; probability always keeps a decimal point.
fn row_cells(result: &ResumeResult) -> Result<[String; 5], OutputError> {
    Ok([
        result.candidate.clone(),
        serde_json::to_string(&result.courses)?,
        serde_json::to_string(&result.course_levels)?,
        serde_json::to_string(&result.certifications)?,
        format!("{:?}", result.probability),
    ])
}

pub fn write_csv(path: &Path, results: &[ResumeResult]) -> Result<(), OutputError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(COLUMNS)?;
    for result in results {
        writer.write_record(&row_cells(result)?)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_xlsx(path: &Path, results: &[ResumeResult]) -> Result<(), OutputError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let header = Format::new().set_bold();

    for (col, name) in COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header)?;
    }

    for (index, result) in results.iter().enumerate() {
        let row = (index + 1) as u32;
        let [candidate, courses, levels, certifications, _] = row_cells(result)?;
        worksheet.write_string(row, 0, candidate)?;
        worksheet.write_string(row, 1, courses)?;
        worksheet.write_string(row, 2, levels)?;
        worksheet.write_string(row, 3, certifications)?;
        worksheet.write_number(row, 4, result.probability)?;
    }

    worksheet.autofit();
    workbook.save(path)?;
    Ok(())
}
