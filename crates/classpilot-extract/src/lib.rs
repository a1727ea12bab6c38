//! ClassPilot Extract — plain-text extraction from uploaded documents.
//!
//! Callers supply bytes plus the declared MIME type; this crate returns UTF-8
//! text or an error. Extraction never panics: a corrupt or unsupported file is
//! an `Err` the upload handler reports to the user, and nothing downstream of
//! the upload ever sees a failed document.

use std::io::Read;

use classpilot_core::{Error, Result};

/// MIME type of PDF documents.
pub const MIME_PDF: &str = "application/pdf";
/// MIME type of Word-processor XML documents.
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
/// MIME type of plain text.
pub const MIME_TEXT: &str = "text/plain";

/// Maximum decompressed bytes read from the DOCX document part.
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

/// Extract plain text from an uploaded document.
pub fn extract_text(bytes: &[u8], content_type: &str) -> Result<String> {
    match content_type {
        MIME_PDF => extract_pdf(bytes),
        MIME_DOCX => extract_docx(bytes),
        MIME_TEXT => extract_plain_text(bytes),
        other => Err(Error::UnsupportedType(other.to_string())),
    }
}

/// Guess a MIME type from a filename extension, for uploads that arrive
/// without a usable content type.
pub fn content_type_for(filename: &str) -> Option<&'static str> {
    let ext = filename.rsplit('.').next()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some(MIME_PDF),
        "docx" => Some(MIME_DOCX),
        "txt" => Some(MIME_TEXT),
        _ => None,
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| Error::Extraction(format!("PDF extraction failed: {}", e)))
}

fn extract_plain_text(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| Error::Extraction("text file is not valid UTF-8".into()))
}

fn extract_docx(bytes: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))
        .map_err(|e| Error::Extraction(format!("DOCX archive unreadable: {}", e)))?;

    let mut doc_xml = Vec::new();
    {
        let entry = archive
            .by_name("word/document.xml")
            .map_err(|_| Error::Extraction("word/document.xml not found".into()))?;
        entry
            .take(MAX_XML_ENTRY_BYTES)
            .read_to_end(&mut doc_xml)
            .map_err(|e| Error::Extraction(format!("DOCX read failed: {}", e)))?;
        if doc_xml.len() as u64 >= MAX_XML_ENTRY_BYTES {
            return Err(Error::Extraction(
                "word/document.xml exceeds size limit".into(),
            ));
        }
    }

    extract_text_runs(&doc_xml)
}

/// Pull the `<w:t>` text runs out of a WordprocessingML body, one line per
/// paragraph.
fn extract_text_runs(xml: &[u8]) -> Result<String> {
    let mut reader = quick_xml::Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut out = String::new();
    let mut in_text_run = false;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text_run = true;
                }
            }
            Ok(quick_xml::events::Event::Text(t)) if in_text_run => {
                out.push_str(
                    t.unescape()
                        .map_err(|e| Error::Extraction(format!("DOCX text decode: {}", e)))?
                        .as_ref(),
                );
            }
            Ok(quick_xml::events::Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => {
                    if !out.is_empty() && !out.ends_with('\n') {
                        out.push('\n');
                    }
                }
                _ => {}
            },
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(Error::Extraction(format!("DOCX parse failed: {}", e))),
            _ => {}
        }
        buf.clear();
    }
    Ok(out.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn docx_bytes(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_plain_text() {
        let text = extract_text("Must include X.".as_bytes(), MIME_TEXT).unwrap();
        assert_eq!(text, "Must include X.");
    }

    #[test]
    fn test_plain_text_invalid_utf8() {
        let err = extract_text(&[0xff, 0xfe, 0x00], MIME_TEXT).unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn test_unsupported_type() {
        let err = extract_text(b"GIF89a", "image/gif").unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(ref t) if t == "image/gif"));
    }

    #[test]
    fn test_docx_paragraphs() {
        let xml = r#"<?xml version="1.0"?>
            <w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
              <w:body>
                <w:p><w:r><w:t>First paragraph.</w:t></w:r></w:p>
                <w:p><w:r><w:t>Second </w:t></w:r><w:r><w:t>paragraph.</w:t></w:r></w:p>
              </w:body>
            </w:document>"#;
        let text = extract_text(&docx_bytes(xml), MIME_DOCX).unwrap();
        assert_eq!(text, "First paragraph.\nSecond paragraph.");
    }

    #[test]
    fn test_docx_missing_document_part() {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("other.xml", options).unwrap();
        writer.write_all(b"<x/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = extract_text(&bytes, MIME_DOCX).unwrap_err();
        assert!(err.to_string().contains("word/document.xml"));
    }

    #[test]
    fn test_corrupt_pdf() {
        let err = extract_text(b"not a pdf", MIME_PDF).unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("standards.pdf"), Some(MIME_PDF));
        assert_eq!(content_type_for("Req.DOCX"), Some(MIME_DOCX));
        assert_eq!(content_type_for("notes.txt"), Some(MIME_TEXT));
        assert_eq!(content_type_for("photo.png"), None);
        assert_eq!(content_type_for("noext"), None);
    }
}
