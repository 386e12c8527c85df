use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::models::CandidateTexts;
use crate::output::OutputError;

/// Writes `{ "<file name>": "<text>", ... }` with 4-space indentation, in
/// processing order.
pub fn write_candidate_texts(path: &Path, texts: &CandidateTexts) -> Result<(), OutputError> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    texts.serialize(&mut serializer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
pub fn read_candidate_texts(path: &Path) -> Result<CandidateTexts, OutputError> {
    let reader = std::io::BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
