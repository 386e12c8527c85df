use std::path::Path;

use lopdf::Document;
use tracing::{debug, info};

use crate::extraction::ocr::{OcrEngine, OcrScope, PageRenderer};
use crate::extraction::ExtractError;

/// Text layer of one page as stored in the PDF.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PageText {
    pub number: u32,
    pub text: String,
}

/// Reads the text layer page by page, OCR'ing pages that have none.
///
/// Output is page text (or OCR text) joined with newlines, in page order.
pub(crate) async fn extract(
    path: &Path,
    ocr: &dyn OcrEngine,
    renderer: &dyn PageRenderer,
    scope: OcrScope,
) -> Result<String, ExtractError> {
    let owned = path.to_path_buf();
    let pages = tokio::task::spawn_blocking(move || read_text_layer(&owned)).await??;

    let mut text = String::new();
    let mut document_ocr: Option<String> = None;

    for page in &pages {
        if !page.text.trim().is_empty() {
            text.push_str(&page.text);
            text.push('\n');
            continue;
        }

        debug!(
            "{}: page {} has no text layer, falling back to OCR",
            path.display(),
            page.number
        );
        match scope {
            OcrScope::Document => {
                // Same render every time; recognize it once per file.
                if document_ocr.is_none() {
                    document_ocr = Some(recognize(path, None, ocr, renderer).await?);
                }
                text.push_str(document_ocr.as_deref().unwrap_or_default());
            }
            OcrScope::EmptyPages => {
                text.push_str(&recognize(path, Some(page.number), ocr, renderer).await?);
            }
        }
    }

    Ok(text)
}

/// Renders `page` (or every page) and concatenates the OCR output, one
/// newline after each image.
async fn recognize(
    path: &Path,
    page: Option<u32>,
    ocr: &dyn OcrEngine,
    renderer: &dyn PageRenderer,
) -> Result<String, ExtractError> {
    let rendered = renderer.render(path, page).await?;
    info!(
        "OCR on {} ({} page image(s))",
        path.display(),
        rendered.paths().len()
    );

    let mut text = String::new();
    for image in rendered.paths() {
        text.push_str(&ocr.image_to_string(image).await?);
        text.push('\n');
    }
    Ok(text)
}

/// Loads the document and pulls each page's text. A page whose text layer
/// can't be decoded is reported as empty so it goes through OCR instead.
pub(crate) fn read_text_layer(path: &Path) -> Result<Vec<PageText>, lopdf::Error> {
    let doc = Document::load(path)?;
    let pages = doc
        .get_pages()
        .into_keys()
        .map(|number| {
            let text = doc.extract_text(&[number]).unwrap_or_else(|e| {
                debug!(
                    "{}: no decodable text on page {number}: {e}",
                    path.display()
                );
                String::new()
            });
            PageText { number, text }
        })
        .collect();
    Ok(pages)
}
