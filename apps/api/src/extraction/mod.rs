//! Plain-text extraction from uploaded CV documents.
//!
//! `pdf-extract` is synchronous and CPU-bound, so the parse runs inside
//! `tokio::task::spawn_blocking`.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("{0}")]
    Pdf(String),

    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Turns raw document bytes into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, document: Bytes) -> Result<String, ExtractionError>;
}

/// `TextExtractor` backed by the `pdf-extract` crate.
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract_text(&self, document: Bytes) -> Result<String, ExtractionError> {
        if !looks_like_pdf(&document) {
            return Err(ExtractionError::Pdf(
                "document does not start with a PDF header".to_string(),
            ));
        }

        let size = document.len();
        let text = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&document)
                .map_err(|e| ExtractionError::Pdf(e.to_string()))
        })
        .await??;

        debug!("Extracted {} chars from {} byte PDF", text.len(), size);
        Ok(text)
    }
}

/// True when the payload carries the `%PDF-` magic bytes, allowing leading whitespace.
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    bytes[start..].starts_with(b"%PDF-")
}

#[cfg(test)]
pub mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Returns a fixed extraction result and counts calls.
    pub struct StubExtractor {
        result: Result<String, String>,
        calls: AtomicUsize,
    }

    impl StubExtractor {
        pub fn returning(text: &str) -> Self {
            Self {
                result: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                result: Err(message.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextExtractor for StubExtractor {
        async fn extract_text(&self, _document: Bytes) -> Result<String, ExtractionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone().map_err(ExtractionError::Pdf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_pdf_accepts_magic_bytes() {
        assert!(looks_like_pdf(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3"));
    }

    #[test]
    fn test_looks_like_pdf_allows_leading_whitespace() {
        assert!(looks_like_pdf(b"\r\n %PDF-1.4"));
    }

    #[test]
    fn test_looks_like_pdf_rejects_other_content() {
        assert!(!looks_like_pdf(b"PK\x03\x04 docx archive"));
        assert!(!looks_like_pdf(b""));
    }

    #[tokio::test]
    async fn test_non_pdf_bytes_fail_without_parsing() {
        let err = PdfTextExtractor
            .extract_text(Bytes::from_static(b"plain text, not a pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Pdf(_)));
        assert_eq!(err.to_string(), "document does not start with a PDF header");
    }

    const SAMPLE_CV_PDF: &[u8] = include_bytes!("sample_cv.pdf");

    #[tokio::test]
    async fn test_extracts_text_from_single_page_pdf() {
        let text = PdfTextExtractor
            .extract_text(Bytes::from_static(SAMPLE_CV_PDF))
            .await
            .unwrap();
        assert!(text.contains("Jane Doe"), "got {text:?}");
        assert!(text.contains("5 years Go"), "got {text:?}");
    }

    #[tokio::test]
    async fn test_truncated_pdf_reports_error() {
        let err = PdfTextExtractor
            .extract_text(Bytes::from_static(b"%PDF-1.4\n1 0 obj\n<<"))
            .await;
        assert!(err.is_err());
    }
}
