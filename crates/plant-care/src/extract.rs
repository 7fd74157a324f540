use tracing::debug;

use crate::error::AppError;

/// Text pulled out of a PDF, pages concatenated in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub pages: usize,
}

/// Extract the text of every page and join them in order.
///
/// Glyph-to-text reconstruction is whatever `pdf-extract` produces. An empty buffer
/// is treated as an empty document rather than a malformed one.
pub fn extract_text(bytes: &[u8]) -> Result<ExtractedText, AppError> {
    if bytes.is_empty() {
        return Ok(ExtractedText {
            text: String::new(),
            pages: 0,
        });
    }

    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| AppError::Parse(e.to_string()))?;
    let text = pages.concat();
    debug!(pages = pages.len(), chars = text.chars().count(), "extracted PDF text");

    Ok(ExtractedText {
        text,
        pages: pages.len(),
    })
}

/// Runs [`extract_text`] on the blocking pool. A panic inside the PDF library
/// surfaces as `AppError::Unexpected` instead of tearing down the request.
pub async fn extract_text_blocking(bytes: Vec<u8>) -> Result<ExtractedText, AppError> {
    tokio::task::spawn_blocking(move || extract_text(&bytes))
        .await
        .map_err(|e| AppError::Unexpected(format!("text extraction aborted: {e}")))?
}
