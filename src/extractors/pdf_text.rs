// src/extractors/pdf_text.rs
use crate::utils::error::ExtractError;
use lopdf::Document;

/// Turns raw report bytes into the page-concatenated text the classifier reads.
pub trait TextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// Extracts text with `lopdf`, one `\n` appended after every page.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfExtractor;

impl LopdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for LopdfExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let doc = Document::load_mem(bytes)
            .map_err(|e| ExtractError::PdfLoad(e.to_string()))?;

        let mut text = String::new();
        // get_pages is keyed by page number, so iteration follows page order
        for page_num in doc.get_pages().into_keys() {
            let content = doc
                .extract_text(&[page_num])
                .map_err(|e| ExtractError::PageText { page: page_num, message: e.to_string() })?;
            // lopdf already closes each text object with a newline; keep exactly one per page
            text.push_str(content.strip_suffix('\n').unwrap_or(&content));
            text.push('\n');
        }

        tracing::trace!("Extracted {} chars of text", text.len());
        Ok(text)
    }
}
