//! Page-by-page PDF text extraction.
//!
//! Each document is extracted independently: a corrupt PDF produces a
//! per-document error and the batch continues. Pages with no extractable
//! text layer (scanned images) are skipped silently. Non-empty page texts
//! are joined with a blank line, per document and across the batch.

use tracing::{debug, warn};

use crate::error::PipelineError;
use crate::models::DocumentInput;

/// Extract the text of one PDF, pages joined with a blank line.
/// Returns an empty string if every page is empty; that is not an error
/// at this level.
pub fn extract_document(doc: &DocumentInput) -> Result<String, PipelineError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(&doc.bytes).map_err(|e| {
        PipelineError::Extraction {
            document: doc.name.clone(),
            reason: e.to_string(),
        }
    })?;

    let non_empty: Vec<&str> = pages
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect();

    debug!(
        document = %doc.name,
        pages = pages.len(),
        non_empty = non_empty.len(),
        "extracted pdf"
    );

    Ok(non_empty.join("\n\n"))
}

/// Extract a whole batch. Extraction failures are collected as recoverable
/// warnings, not fatal errors. Returns the trimmed, blank-line-joined blob;
/// [`PipelineError::NoExtractableText`] if nothing survived.
pub fn extract_batch(
    docs: &[DocumentInput],
) -> Result<(String, Vec<PipelineError>), PipelineError> {
    let mut parts: Vec<String> = Vec::new();
    let mut warnings = Vec::new();

    for doc in docs {
        match extract_document(doc) {
            Ok(text) => {
                if !text.is_empty() {
                    parts.push(text);
                }
            }
            Err(err) => {
                warn!(document = %doc.name, "extraction failed: {err}");
                warnings.push(err);
            }
        }
    }

    let blob = parts.join("\n\n").trim().to_string();
    if blob.is_empty() {
        return Err(PipelineError::NoExtractableText);
    }

    Ok((blob, warnings))
}

/// Minimal valid single-page PDF containing `text`, with a correct xref
/// table so pdf-extract can parse it. Shared fixture for pipeline tests.
#[cfg(test)]
pub(crate) fn minimal_pdf(text: &str) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");
    let o1 = out.len();
    out.extend_from_slice(b"1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n");
    let o2 = out.len();
    out.extend_from_slice(b"2 0 obj << /Type /Pages /Kids [3 0 R] /Count 1 >> endobj\n");
    let o3 = out.len();
    out.extend_from_slice(b"3 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >> endobj\n");
    let stream = format!("BT /F1 12 Tf 100 700 Td ({}) Tj ET\n", text);
    let o4 = out.len();
    out.extend_from_slice(
        format!("4 0 obj << /Length {} >> stream\n", stream.len()).as_bytes(),
    );
    out.extend_from_slice(stream.as_bytes());
    out.extend_from_slice(b"endstream endobj\n");
    let o5 = out.len();
    out.extend_from_slice(
        b"5 0 obj << /Type /Font /Subtype /Type1 /BaseFont /Helvetica >> endobj\n",
    );
    let xref_start = out.len();
    out.extend_from_slice(b"xref\n0 6\n");
    out.extend_from_slice(format!("{:010} 65535 f \n", 0).as_bytes());
    for offset in [o1, o2, o3, o4, o5] {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(b"trailer << /Size 6 /Root 1 0 R >>\nstartxref\n");
    out.extend_from_slice(format!("{}\n", xref_start).as_bytes());
    out.extend_from_slice(b"%%EOF\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_pdf_is_a_per_document_error() {
        let doc = DocumentInput::new("bad.pdf", b"not a pdf".to_vec());
        let err = extract_document(&doc).unwrap_err();
        match err {
            PipelineError::Extraction { document, .. } => assert_eq!(document, "bad.pdf"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn valid_pdf_yields_its_text() {
        let doc = DocumentInput::new("ok.pdf", minimal_pdf("Hello world. This is page one."));
        let text = extract_document(&doc).unwrap();
        assert!(text.contains("Hello world. This is page one."));
    }

    #[test]
    fn batch_continues_past_a_corrupt_document() {
        let docs = vec![
            DocumentInput::new("ok.pdf", minimal_pdf("Hello world. This is page one.")),
            DocumentInput::new("bad.pdf", b"garbage".to_vec()),
        ];
        let (blob, warnings) = extract_batch(&docs).unwrap();
        assert!(blob.contains("Hello world. This is page one."));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].to_string().contains("bad.pdf"));
    }

    #[test]
    fn all_corrupt_batch_is_no_extractable_text() {
        let docs = vec![
            DocumentInput::new("a.pdf", b"x".to_vec()),
            DocumentInput::new("b.pdf", b"y".to_vec()),
        ];
        let err = extract_batch(&docs).unwrap_err();
        assert!(matches!(err, PipelineError::NoExtractableText));
    }

    #[test]
    fn empty_batch_is_no_extractable_text() {
        let err = extract_batch(&[]).unwrap_err();
        assert!(matches!(err, PipelineError::NoExtractableText));
    }
}
