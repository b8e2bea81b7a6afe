//! Text extraction from uploaded documents.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

/// Readers look for the header within the first 1024 bytes.
const PDF_HEADER_WINDOW: usize = 1024;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Document is empty")]
    Empty,

    #[error("Document is not a PDF")]
    NotPdf,

    #[error("Failed to parse PDF: {0}")]
    Malformed(String),

    #[error("PDF contains no extractable text")]
    NoText,
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, document: Bytes) -> Result<String, ExtractionError>;
}

/// PDF extractor backed by `pdf-extract`.
///
/// Parsing runs on the blocking pool; a parser panic on hostile input surfaces as
/// `ExtractionError::Malformed` instead of taking the request down.
pub struct PdfExtractor;

#[async_trait]
impl TextExtractor for PdfExtractor {
    async fn extract(&self, document: Bytes) -> Result<String, ExtractionError> {
        if document.is_empty() {
            return Err(ExtractionError::Empty);
        }
        if !has_pdf_header(&document) {
            return Err(ExtractionError::NotPdf);
        }

        let size = document.len();
        let text = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&document).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| ExtractionError::Malformed(format!("parser aborted: {e}")))?
        .map_err(ExtractionError::Malformed)?;

        let text = normalize_text(&text);
        if text.is_empty() {
            return Err(ExtractionError::NoText);
        }

        debug!("Extracted {} chars from {} byte PDF", text.len(), size);
        Ok(text)
    }
}

fn has_pdf_header(document: &[u8]) -> bool {
    let window = &document[..document.len().min(PDF_HEADER_WINDOW)];
    window.windows(5).any(|w| w == b"%PDF-")
}

/// Trims every line and collapses runs of blank lines left behind by the PDF layout.
fn normalize_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut blank_run = false;
    for line in raw.lines().map(str::trim) {
        if line.is_empty() {
            blank_run = true;
            continue;
        }
        if !out.is_empty() {
            out.push_str(if blank_run { "\n\n" } else { "\n" });
        }
        out.push_str(line);
        blank_run = false;
    }
    out
}
