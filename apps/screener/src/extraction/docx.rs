use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::extraction::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Body paragraphs of a .docx, each followed by a newline.
pub(crate) async fn extract(path: &Path) -> Result<String, ExtractError> {
    let owned = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let xml = read_document_part(&owned)?;
        let text: String = body_paragraphs(&xml)?
            .into_iter()
            .map(|paragraph| paragraph + "\n")
            .collect();
        Ok::<_, ExtractError>(text)
    })
    .await?
}

fn read_document_part(path: &Path) -> Result<String, ExtractError> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))?;
    let mut part = archive.by_name(DOCUMENT_PART)?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    Ok(xml)
}

/// Text of every top-level body paragraph, in document order.
///
/// Paragraphs inside tables or content controls (`w:sdt`) are not part of the
/// body paragraph list, and paragraphs nested in a text box don't contribute
/// to their host paragraph. Within a paragraph, `w:t` runs are concatenated,
/// `w:tab` becomes a tab and `w:br`/`w:cr` a newline. Elements are matched on
/// their `w:` qualified name, so DrawingML text (`a:t`) is ignored.
pub(crate) fn body_paragraphs(xml: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut paragraph_depth = 0usize;
    // open w:tbl / w:sdt elements
    let mut excluded_depth = 0usize;
    let mut run_depth = 0usize;
    let mut in_text = false;

    loop {
        let collecting = paragraph_depth == 1 && excluded_depth == 0;
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tbl" | b"w:sdt" => excluded_depth += 1,
                b"w:p" => {
                    paragraph_depth += 1;
                    if paragraph_depth == 1 && excluded_depth == 0 {
                        current = Some(String::new());
                    }
                }
                b"w:r" => run_depth += 1,
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" if paragraph_depth == 0 && excluded_depth == 0 => {
                    paragraphs.push(String::new())
                }
                b"w:tab" if collecting && run_depth > 0 => push_char(&mut current, '\t'),
                b"w:br" | b"w:cr" if collecting && run_depth > 0 => {
                    push_char(&mut current, '\n')
                }
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:tbl" | b"w:sdt" => excluded_depth = excluded_depth.saturating_sub(1),
                b"w:p" => {
                    if paragraph_depth == 1 {
                        if let Some(paragraph) = current.take() {
                            paragraphs.push(paragraph);
                        }
                    }
                    paragraph_depth = paragraph_depth.saturating_sub(1);
                }
                b"w:r" => run_depth = run_depth.saturating_sub(1),
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Text(e) if in_text && collecting => {
                if let Some(paragraph) = current.as_mut() {
                    paragraph.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::GeneralRef(e) if in_text && collecting => {
                if let Some(c) = resolve_entity(&String::from_utf8_lossy(&e)) {
                    push_char(&mut current, c);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn push_char(current: &mut Option<String>, c: char) {
    if let Some(paragraph) = current.as_mut() {
        paragraph.push(c);
    }
}

/// Resolves `&name;` / `&#NN;` / `&#xHH;` references (name without `&`/`;`).
fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    /// Wraps paragraph XML snippets in a minimal WordprocessingML body.
    pub(crate) fn document_xml(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}<w:sectPr/></w:body></w:document>"#
        )
    }

    pub(crate) fn paragraph(text: &str) -> String {
        format!(r#"<w:p><w:r><w:t xml:space="preserve">{text}</w:t></w:r></w:p>"#)
    }

    /// Writes a .docx archive whose body is `body`.
    pub(crate) fn write_docx(path: &Path, body: &str) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#)
            .unwrap();
        zip.start_file(DOCUMENT_PART, options).unwrap();
        zip.write_all(document_xml(body).as_bytes()).unwrap();
        zip.finish().unwrap();
    }

    #[test]
    fn test_paragraphs_in_order() {
        let xml = document_xml(&format!(
            "{}{}",
            paragraph("AWS Certified Solutions Architect"),
            paragraph("built with React")
        ));
        let paragraphs = body_paragraphs(&xml).unwrap();
        assert_eq!(
            paragraphs,
            vec!["AWS Certified Solutions Architect", "built with React"]
        );
    }

    #[test]
    fn test_runs_are_concatenated_and_whitespace_kept() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t>Senior </w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">Rust  engineer</w:t></w:r></w:p>"#,
        );
        assert_eq!(body_paragraphs(&xml).unwrap(), vec!["Senior Rust  engineer"]);
    }

    #[test]
    fn test_empty_paragraphs_are_kept() {
        let xml = document_xml(&format!("{}<w:p/>{}", paragraph("a"), paragraph("b")));
        assert_eq!(body_paragraphs(&xml).unwrap(), vec!["a", "", "b"]);
    }

    #[test]
    fn test_tabs_breaks_and_entities() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t>R&amp;D</w:t><w:tab/><w:t>C&#43;&#x2B;</w:t><w:br/><w:t>&lt;html&gt;</w:t></w:r></w:p>"#,
        );
        assert_eq!(body_paragraphs(&xml).unwrap(), vec!["R&D\tC++\n<html>"]);
    }

    #[test]
    fn test_table_paragraphs_are_not_body_paragraphs() {
        let xml = document_xml(&format!(
            "{}<w:tbl><w:tr><w:tc>{}</w:tc></w:tr></w:tbl>{}",
            paragraph("before"),
            paragraph("in a cell"),
            paragraph("after")
        ));
        assert_eq!(body_paragraphs(&xml).unwrap(), vec!["before", "after"]);
    }

    #[test]
    fn test_text_box_does_not_leak_into_host_paragraph() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t>host</w:t></w:r><w:r><w:pict><w:txbxContent><w:p><w:r><w:t>boxed</w:t></w:r></w:p></w:txbxContent></w:pict></w:r></w:p>"#,
        );
        assert_eq!(body_paragraphs(&xml).unwrap(), vec!["host"]);
    }

    #[test]
    fn test_drawing_text_does_not_leak_into_paragraph() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t>logo</w:t></w:r><w:r><w:drawing><wp:inline><a:graphic><a:graphicData><wps:wsp><wps:txbx><a:p><a:r><a:t>shape caption</a:t></a:r></a:p></wps:txbx></wps:wsp></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"#,
        );
        assert_eq!(body_paragraphs(&xml).unwrap(), vec!["logo"]);
    }

    #[test]
    fn test_content_control_paragraphs_are_skipped() {
        let xml = document_xml(&format!(
            "{}<w:sdt><w:sdtPr/><w:sdtContent>{}</w:sdtContent></w:sdt>{}",
            paragraph("before"),
            paragraph("inside a control"),
            paragraph("after")
        ));
        assert_eq!(body_paragraphs(&xml).unwrap(), vec!["before", "after"]);
    }

    #[test]
    fn test_tab_stops_in_paragraph_properties_are_not_text() {
        let xml = document_xml(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>Skills</w:t><w:tab/><w:t>Rust</w:t></w:r></w:p>"#,
        );
        assert_eq!(body_paragraphs(&xml).unwrap(), vec!["Skills\tRust"]);
    }

    #[test]
    fn test_resolve_entity() {
        assert_eq!(resolve_entity("amp"), Some('&'));
        assert_eq!(resolve_entity("#65"), Some('A'));
        assert_eq!(resolve_entity("#x41"), Some('A'));
        assert_eq!(resolve_entity("nbsp"), None);
        assert_eq!(resolve_entity("#xZZ"), None);
    }

    #[tokio::test]
    async fn test_extract_reads_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.docx");
        write_docx(
            &path,
            &format!("{}{}", paragraph("First line"), paragraph("Second line")),
        );

        let text = extract(&path).await.unwrap();
        assert_eq!(text, "First line\nSecond line\n");
    }

    #[tokio::test]
    async fn test_not_a_zip_is_archive_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.docx");
        std::fs::write(&path, b"plain text pretending to be docx").unwrap();

        let err = extract(&path).await.unwrap_err();
        assert!(matches!(err, ExtractError::Archive(_)));
    }

    #[tokio::test]
    async fn test_archive_without_document_part_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.docx");
        let file = File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("readme.txt", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"hello").unwrap();
        zip.finish().unwrap();

        let err = extract(&path).await.unwrap_err();
        assert!(matches!(err, ExtractError::Archive(_)));
    }
}
