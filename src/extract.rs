//! Document extraction - uploaded report bytes to plain text
//!
//! PDF pages are extracted in page order, each followed by one newline.
//! Everything else is treated as UTF-8 text.

use std::path::Path;

use log::debug;

use crate::error::ExtractionError;

pub const PDF_MIME: &str = "application/pdf";
pub const TEXT_MIME: &str = "text/plain";

/// Upload kinds accepted by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
}

impl DocumentKind {
    /// Infer the kind from a file extension (`.pdf`, `.txt`), case-insensitive
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "txt" => Some(DocumentKind::Text),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => PDF_MIME,
            DocumentKind::Text => TEXT_MIME,
        }
    }
}

/// Convert a document to plain text according to its declared MIME type
pub fn extract(bytes: &[u8], mime_type: &str) -> Result<String, ExtractionError> {
    if is_pdf_mime(mime_type) {
        extract_pdf(bytes)
    } else {
        Ok(String::from_utf8(bytes.to_vec())?)
    }
}

fn is_pdf_mime(mime_type: &str) -> bool {
    mime_type
        .split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case(PDF_MIME))
        .unwrap_or(false)
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    let doc = lopdf::Document::load_mem(bytes)
        .map_err(|e| ExtractionError::MalformedPdf(e.to_string()))?;

    if doc.is_encrypted() {
        return Err(ExtractionError::MalformedPdf(
            "document is encrypted".to_string(),
        ));
    }

    // get_pages() is keyed by 1-based page number, so iteration is page order
    let pages = doc.get_pages();
    let mut text = String::new();
    for page in pages.keys() {
        let page_text = doc
            .extract_text(&[*page])
            .map_err(|e| ExtractionError::PageText {
                page: *page,
                message: e.to_string(),
            })?;
        // Exactly one newline after each page
        text.push_str(page_text.strip_suffix('\n').unwrap_or(&page_text));
        text.push('\n');
    }

    debug!("extracted PDF text (pages={})", pages.len());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Build a minimal PDF with one Helvetica text line per page
    fn pdf_with_pages(lines: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for line in lines {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let media_box: Vec<Object> = vec![0.into(), 0.into(), 595.into(), 842.into()];
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => media_box,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_plain_text_is_decoded_as_utf8() {
        let text = extract("Hémoglobine: 13.5 g/dL".as_bytes(), TEXT_MIME).unwrap();
        assert_eq!(text, "Hémoglobine: 13.5 g/dL");
    }

    #[test]
    fn test_unknown_mime_falls_back_to_text() {
        let text = extract(b"plain notes", "application/octet-stream").unwrap();
        assert_eq!(text, "plain notes");
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let err = extract(&[0x66, 0x6f, 0xff, 0x6f], TEXT_MIME).unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidEncoding(_)));
    }

    #[test]
    fn test_malformed_pdf_is_an_error() {
        let err = extract(b"%PDF-1.4 not really a pdf", PDF_MIME).unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedPdf(_)));
    }

    #[test]
    fn test_pdf_pages_in_order() {
        let bytes = pdf_with_pages(&["Glucose elevated", "Follow up in two weeks"]);
        let text = extract(&bytes, "application/pdf; charset=binary").unwrap();

        let first = text.find("Glucose").expect("page 1 text");
        let second = text.find("Follow").expect("page 2 text");
        assert!(first < second);
    }

    #[test]
    fn test_pdf_pages_separated_by_single_newline() {
        let bytes = pdf_with_pages(&["AAA", "BBB"]);
        let text = extract(&bytes, PDF_MIME).unwrap();
        assert_eq!(text, "AAA\nBBB\n");
    }

    #[test]
    fn test_document_kind_from_path() {
        assert_eq!(
            DocumentKind::from_path(Path::new("labs/report.PDF")),
            Some(DocumentKind::Pdf)
        );
        let text_kind = DocumentKind::from_path(Path::new("notes.txt"));
        assert_eq!(text_kind.map(|k| k.mime_type()), Some(TEXT_MIME));
        assert_eq!(DocumentKind::from_path(Path::new("scan.png")), None);
        assert_eq!(DocumentKind::from_path(Path::new("README")), None);
    }
}
