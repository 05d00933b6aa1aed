//! services/api/src/adapters/pdf.rs
//!
//! This module contains the adapter for PDF text extraction.
//! It implements the `TextExtractionService` port from the `core` crate using `lopdf`.

use async_trait::async_trait;
use lopdf::Document;
use study_buddy_core::ports::{PortError, PortResult, TextExtractionService};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `TextExtractionService` port with pure-Rust `lopdf`.
#[derive(Clone, Default)]
pub struct LopdfExtractor;

impl LopdfExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parses the document and concatenates the text of every page, in page order.
    fn extract_blocking(pdf_bytes: &[u8]) -> PortResult<String> {
        let document =
            Document::load_mem(pdf_bytes).map_err(|e| PortError::Extraction(e.to_string()))?;

        // `get_pages` is keyed by 1-based page number, so iteration is in reading order.
        let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
        if page_numbers.is_empty() {
            return Err(PortError::Extraction("document has no pages".to_string()));
        }
        debug!(pages = page_numbers.len(), "Extracting PDF text");

        let mut pages = Vec::with_capacity(page_numbers.len());
        for page in page_numbers {
            let text = document
                .extract_text(&[page])
                .map_err(|e| PortError::Extraction(format!("page {}: {}", page, e)))?;
            pages.push(text);
        }

        // Page breaks are paragraph breaks.
        Ok(pages.join("\n\n"))
    }
}

//=========================================================================================
// `TextExtractionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TextExtractionService for LopdfExtractor {
    async fn extract_text(&self, pdf_bytes: &[u8]) -> PortResult<String> {
        let bytes = pdf_bytes.to_vec();
        // Parsing is CPU-bound; keep it off the async workers.
        tokio::task::spawn_blocking(move || Self::extract_blocking(&bytes))
            .await
            .map_err(|e| PortError::Unexpected(format!("extraction task failed: {}", e)))?
    }
}
