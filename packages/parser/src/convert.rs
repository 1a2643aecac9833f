//! Turning source files into markup.
//!
//! Agendas are published as Word documents. Converting them to HTML happens
//! outside this crate; a [`DocumentConverter`] hands the parser the result.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use encoding_rs::{Encoding, BIG5, REPLACEMENT, UTF_16BE, UTF_16LE, UTF_8};
use regex::bytes::Regex;

use crate::error::{ParserError, Result};

/// Extensions of already converted documents.
const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

/// Bytes searched for a `<meta>` charset declaration.
const META_SNIFF_LIMIT: usize = 1024;

/// Charset declared by `<meta charset=..>` or `<meta http-equiv=.. content="..; charset=..">`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([A-Za-z0-9_\-:.]+)"#).expect("valid regex")
});

/// Produce markup for a source document.
pub trait DocumentConverter: Send + Sync {
    /// Convert the file at `path` to an HTML string.
    ///
    /// # Errors
    /// Returns `UnsupportedFormat` for files the converter cannot handle and
    /// `Io` when the file cannot be read.
    fn convert(&self, path: &Path) -> Result<String>;

    /// Check whether the converter handles the file at `path`.
    fn accepts(&self, path: &Path) -> bool;
}

/// Converter for documents that are already HTML.
///
/// Word files (`.doc`, `.docx`) are rejected; they need an external
/// converter.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlConverter;

impl DocumentConverter for HtmlConverter {
    fn convert(&self, path: &Path) -> Result<String> {
        if !self.accepts(path) {
            return Err(ParserError::UnsupportedFormat {
                path: path.display().to_string(),
                extension: extension(path),
            });
        }

        let bytes = fs::read(path)?;
        Ok(decode_document(&bytes, None, &path.display().to_string()))
    }

    fn accepts(&self, path: &Path) -> bool {
        extension(path).is_some_and(|ext| HTML_EXTENSIONS.contains(&ext.as_str()))
    }
}

/// Lowercase file extension.
fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Look up an encoding by its label, e.g. `big5-hkscs` or `utf-8`.
///
/// Government releases in Chinese are Big5 with the Hong Kong supplement;
/// the `big5` decoder covers HKSCS, so the bare `hkscs` label maps to it too.
///
/// # Errors
/// Returns `UnsupportedEncoding` for labels no decoder is known for.
///
/// # Examples
/// ```
/// use legcowatch_parser::convert::encoding_for_label;
///
/// assert_eq!(encoding_for_label("HKSCS").unwrap(), encoding_rs::BIG5);
/// assert!(encoding_for_label("klingon").is_err());
/// ```
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding> {
    let label = label.trim();
    if label.eq_ignore_ascii_case("hkscs") {
        return Ok(BIG5);
    }
    Encoding::for_label(label.as_bytes())
        .ok_or_else(|| ParserError::UnsupportedEncoding(label.to_string()))
}

/// Encoding declared in a `<meta>` tag at the start of the document.
fn sniff_meta_charset(bytes: &[u8], source: &str) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_SNIFF_LIMIT)];
    let label = META_CHARSET.captures(head)?.get(1)?.as_bytes();
    let label = String::from_utf8_lossy(label);

    match encoding_for_label(&label) {
        // A document that can declare its charset in ASCII is not UTF-16
        Ok(encoding) if encoding == UTF_16LE || encoding == UTF_16BE => Some(UTF_8),
        Ok(encoding) if encoding == REPLACEMENT => {
            tracing::warn!(
                source = %source,
                charset = %label,
                "Declared charset cannot be decoded, assuming UTF-8"
            );
            None
        }
        Ok(encoding) => Some(encoding),
        Err(_) => {
            tracing::warn!(
                source = %source,
                charset = %label,
                "Unknown charset in meta tag, assuming UTF-8"
            );
            None
        }
    }
}

/// Decode a document to a string.
///
/// A byte order mark wins, then the `encoding` given by the caller, then a
/// `<meta>` charset declaration. Anything else is read as UTF-8. Malformed
/// sequences are replaced with U+FFFD and logged as a warning.
#[must_use]
pub fn decode_document(bytes: &[u8], encoding: Option<&'static Encoding>, source: &str) -> String {
    let declared = encoding
        .or_else(|| sniff_meta_charset(bytes, source))
        .unwrap_or(UTF_8);
    let (text, used, had_errors) = declared.decode(bytes);

    if used != declared {
        tracing::debug!(
            source = %source,
            declared = declared.name(),
            used = used.name(),
            "Byte order mark overrides encoding"
        );
    }
    if had_errors {
        tracing::warn!(
            source = %source,
            encoding = used.name(),
            "Malformed byte sequences, replacing them"
        );
    }
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_convert_html_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("council_agenda-20131009-e.html");
        fs::write(&path, "<p>I. Questions</p>").unwrap();

        let markup = HtmlConverter.convert(&path).unwrap();
        assert_eq!(markup, "<p>I. Questions</p>");
    }

    #[test]
    fn test_convert_uppercase_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("agenda.HTM");
        fs::write(&path, "<p>x</p>").unwrap();
        assert!(HtmlConverter.convert(&path).is_ok());
    }

    #[test]
    fn test_word_documents_are_unsupported() {
        let err = HtmlConverter
            .convert(Path::new("council_agenda-20131009-e.docx"))
            .unwrap_err();
        assert!(matches!(
            err,
            ParserError::UnsupportedFormat { extension: Some(ref ext), .. } if ext == "docx"
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = HtmlConverter
            .convert(&dir.path().join("missing.html"))
            .unwrap_err();
        assert!(matches!(err, ParserError::Io(_)));
    }

    fn big5_document(charset: &str, text: &str) -> Vec<u8> {
        let (body, _, had_errors) = BIG5.encode(text);
        assert!(!had_errors);
        let mut bytes = format!(
            "<html><head><meta http-equiv=\"Content-Type\" content=\"text/html; charset={charset}\"></head><body><p>"
        )
        .into_bytes();
        bytes.extend_from_slice(&body);
        bytes.extend_from_slice(b"</p></body></html>");
        bytes
    }

    #[test]
    fn test_decode_utf8_by_default() {
        assert_eq!(decode_document(b"abc", None, "test"), "abc");
        assert_eq!(decode_document("問題".as_bytes(), None, "test"), "問題");
    }

    #[test]
    fn test_decode_replaces_malformed_utf8() {
        assert_eq!(decode_document(&[b'a', 0xff, b'b'], None, "test"), "a\u{fffd}b");
    }

    #[test]
    fn test_decode_meta_charset_big5_hkscs() {
        let bytes = big5_document("big5-hkscs", "問題:長者津貼");
        let text = decode_document(&bytes, None, "test");
        assert!(text.contains("<p>問題:長者津貼</p>"));
    }

    #[test]
    fn test_decode_meta_charset_short_form() {
        let (body, _, _) = BIG5.encode("答覆");
        let mut bytes = b"<meta charset='hkscs'><p>".to_vec();
        bytes.extend_from_slice(&body);
        assert!(decode_document(&bytes, None, "test").ends_with("<p>答覆"));
    }

    #[test]
    fn test_decode_explicit_encoding_overrides_meta() {
        let bytes = big5_document("utf-8", "主席");
        let text = decode_document(&bytes, Some(BIG5), "test");
        assert!(text.contains("<p>主席</p>"));
    }

    #[test]
    fn test_decode_bom_wins() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("完".as_bytes());
        assert_eq!(decode_document(&bytes, Some(BIG5), "test"), "完");
    }

    #[test]
    fn test_decode_unknown_meta_charset_falls_back_to_utf8() {
        let bytes = "<meta charset=\"klingon\"><p>完</p>".as_bytes();
        assert_eq!(
            decode_document(bytes, None, "test"),
            "<meta charset=\"klingon\"><p>完</p>"
        );
    }

    #[test]
    fn test_encoding_for_label() {
        assert_eq!(encoding_for_label("big5-hkscs").unwrap(), BIG5);
        assert_eq!(encoding_for_label(" hkscs ").unwrap(), BIG5);
        assert_eq!(encoding_for_label("UTF-8").unwrap(), UTF_8);
        assert!(matches!(
            encoding_for_label("klingon"),
            Err(ParserError::UnsupportedEncoding(ref label)) if label == "klingon"
        ));
    }

    #[test]
    fn test_convert_big5_html_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("question-20131009-5-c.htm");
        fs::write(&path, big5_document("big5", "立法會五題")).unwrap();

        let markup = HtmlConverter.convert(&path).unwrap();
        assert!(markup.contains("<p>立法會五題</p>"));
    }
}
