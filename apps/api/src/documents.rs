//! Document text extraction — the only place PDF bytes are turned into text.

use thiserror::Error;
use tracing::info;

const PDF_MAGIC: &[u8] = b"%PDF";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("uploaded document is empty")]
    Empty,

    #[error("uploaded document is not a PDF")]
    NotPdf,

    #[error("could not read text from PDF: {0}")]
    Extraction(String),

    #[error("no text found in document")]
    NoText,
}

/// Extracts the concatenated page text of a PDF. Runs on the blocking pool.
pub async fn extract_pdf_text(bytes: bytes::Bytes) -> Result<String, DocumentError> {
    check_pdf(&bytes)?;

    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| DocumentError::Extraction(e.to_string()))?
        .map_err(|e| DocumentError::Extraction(e.to_string()))?;

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(DocumentError::NoText);
    }

    info!("Extracted {} characters of text from PDF", text.len());
    Ok(text)
}

fn check_pdf(bytes: &[u8]) -> Result<(), DocumentError> {
    if bytes.is_empty() {
        return Err(DocumentError::Empty);
    }
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(DocumentError::NotPdf);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_upload_rejected() {
        assert!(matches!(check_pdf(b""), Err(DocumentError::Empty)));
    }

    #[test]
    fn test_non_pdf_rejected() {
        assert!(matches!(
            check_pdf(b"PK\x03\x04 docx archive"),
            Err(DocumentError::NotPdf)
        ));
    }

    #[test]
    fn test_pdf_header_accepted() {
        assert!(check_pdf(b"%PDF-1.7\n...").is_ok());
    }

    #[tokio::test]
    async fn test_truncated_pdf_is_extraction_error() {
        let result = extract_pdf_text(bytes::Bytes::from_static(b"%PDF-1.4\n%truncated")).await;
        assert!(matches!(result, Err(DocumentError::Extraction(_))));
    }
}
