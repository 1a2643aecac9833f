//! Configuration constants, patterns and validation functions for the parser.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

use crate::error::{ParserError, Result};
use crate::types::Language;

/// Uid prefix of council agenda documents.
pub const AGENDA_UID_PREFIX: &str = "council_agenda";

/// Uid prefix of council question documents.
pub const QUESTION_UID_PREFIX: &str = "question";

/// Default output directory for YAML files.
pub const DEFAULT_OUTPUT_DIR: &str = "parsed";

/// Title cell of a subsidiary legislation table (English).
pub const LEGISLATION_E: &str = "Subsidiary Legislation";

/// Title cell of a subsidiary legislation table (Chinese).
pub const LEGISLATION_C: &str = "附屬法例";

/// Title cell of an other papers table (English).
pub const OTHER_PAPERS_E: &str = "Other Papers";

/// Title cell of an other papers table (Chinese).
pub const OTHER_PAPERS_C: &str = "其他文件";

/// Glyph prefixed to questions for written reply.
pub const WRITTEN_MARKER: char = '*';

/// Class the Word converter puts on elements simulating tab stops.
pub const TAB_ARTIFACT_CLASS: &str = "pydocx-tab";

/// Emphasis-only tags unwrapped after cleaning.
pub const UNWRAP_TAGS: &[&str] = &["strong"];

/// Elements removed together with their content during cleaning.
///
/// Scripting, styling and embedded content never carries agenda text.
pub const REMOVE_TAGS: &[&str] = &[
    "script", "noscript", "style", "link", "meta", "base", "title", "head", "object",
    "embed", "applet", "iframe", "frame", "frameset", "param", "form", "input", "button",
    "select", "textarea", "blink", "marquee",
];

/// Attributes removed from every element during cleaning.
pub const REMOVE_ATTRIBUTES: &[&str] = &["style"];

/// Section header: roman numeral prefix followed by a period.
///
/// The `A` accommodates the question section of the 18 June 2014 agenda,
/// which was numbered with a letter.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static HEADER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[IVA]+\.").expect("valid regex"));

/// Start of an agenda question (English): number, asker.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static QUESTION_PATTERN_E: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\*?([0-9]+)\..*?Hon\s(.*?)\sto ask:").expect("valid regex")
});

/// Start of an agenda question (Chinese): number, asker.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static QUESTION_PATTERN_C: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*?([0-9]+)\.\s*(.*?)議員問:").expect("valid regex"));

/// Responder line of an agenda question: everything after the colon.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static RESPONDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s?(.+)$").expect("valid regex"));

/// Legislation paper number such as `12/2013`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static PAPER_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+/\d+").expect("valid regex"));

/// Listing date such as `9.10.2013` (day.month.year).
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}\.\d{1,2}\.\d{4}$").expect("valid regex"));

/// Question start pattern for a language.
#[must_use]
pub fn question_pattern(language: Language) -> &'static Regex {
    match language {
        Language::English => &QUESTION_PATTERN_E,
        Language::Chinese => &QUESTION_PATTERN_C,
    }
}

/// Title of subsidiary legislation tables for a language.
#[must_use]
pub fn legislation_heading(language: Language) -> &'static str {
    match language {
        Language::English => LEGISLATION_E,
        Language::Chinese => LEGISLATION_C,
    }
}

/// Title of other papers tables for a language.
#[must_use]
pub fn other_papers_heading(language: Language) -> &'static str {
    match language {
        Language::English => OTHER_PAPERS_E,
        Language::Chinese => OTHER_PAPERS_C,
    }
}

/// Validate a document uid and return the language it encodes.
///
/// The final character selects the language: `e` for English, `c` for Chinese.
///
/// # Examples
/// ```
/// use legcowatch_parser::config::validate_uid;
/// use legcowatch_parser::Language;
///
/// assert_eq!(validate_uid("council_agenda-20140618-e").unwrap(), Language::English);
/// assert_eq!(validate_uid("council_agenda-20140618-c").unwrap(), Language::Chinese);
/// assert!(validate_uid("council_agenda-20140618").is_err());
/// ```
pub fn validate_uid(uid: &str) -> Result<Language> {
    match uid.chars().last() {
        Some('e') => Ok(Language::English),
        Some('c') => Ok(Language::Chinese),
        _ => Err(ParserError::InvalidUid(uid.to_string())),
    }
}

/// Validate a listing date in `d.m.yyyy` format and return it.
///
/// # Examples
/// ```
/// use legcowatch_parser::config::validate_date;
///
/// let date = validate_date("9.10.2013").unwrap();
/// assert_eq!(date.format("%Y%m%d").to_string(), "20131009");
/// assert!(validate_date("2013-10-09").is_err());
/// assert!(validate_date("31.2.2013").is_err()); // No such day
/// ```
pub fn validate_date(date_str: &str) -> Result<NaiveDate> {
    let trimmed = date_str.trim();
    if !DATE_PATTERN.is_match(trimmed) {
        return Err(ParserError::InvalidDate(date_str.to_string()));
    }

    NaiveDate::parse_from_str(trimmed, "%d.%m.%Y")
        .map_err(|_| ParserError::InvalidDate(date_str.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_uid_valid() {
        assert_eq!(
            validate_uid("council_agenda-20131009-e").unwrap(),
            Language::English
        );
        assert_eq!(
            validate_uid("question-20131009-u1-c").unwrap(),
            Language::Chinese
        );
    }

    #[test]
    fn test_validate_uid_invalid() {
        assert!(validate_uid("").is_err());
        assert!(validate_uid("council_agenda-20131009-E").is_err());
        assert!(validate_uid("council_agenda-20131009-x").is_err());
    }

    #[test]
    fn test_validate_date() {
        assert_eq!(
            validate_date("18.6.2014").unwrap(),
            NaiveDate::from_ymd_opt(2014, 6, 18).unwrap()
        );
        assert_eq!(
            validate_date(" 09.10.2013 ").unwrap(),
            NaiveDate::from_ymd_opt(2013, 10, 9).unwrap()
        );
        assert!(validate_date("").is_err());
        assert!(validate_date("9.10.13").is_err());
        assert!(validate_date("9.13.2013").is_err());
    }

    #[test]
    fn test_header_pattern() {
        assert!(HEADER_PATTERN.is_match("I. Tabling of Paper"));
        assert!(HEADER_PATTERN.is_match("IV. Bills"));
        assert!(HEADER_PATTERN.is_match("A. Questions"));
        assert!(!HEADER_PATTERN.is_match("1. Hon John Doe to ask:"));
        assert!(!HEADER_PATTERN.is_match("Introduction"));
        // Letters other than I, V and A are not headers
        assert!(!HEADER_PATTERN.is_match("X. Something"));
    }

    #[test]
    fn test_question_pattern_english() {
        let caps = QUESTION_PATTERN_E
            .captures("*12. Dr Hon Kwok Ka-ki to ask:")
            .unwrap();
        assert_eq!(&caps[1], "12");
        assert_eq!(&caps[2], "Kwok Ka-ki");
    }

    #[test]
    fn test_question_pattern_chinese() {
        let caps = QUESTION_PATTERN_C.captures("3. 梁國雄議員問:").unwrap();
        assert_eq!(&caps[1], "3");
        assert_eq!(&caps[2], "梁國雄");
    }

    #[test]
    fn test_responder_pattern() {
        let caps = RESPONDER_PATTERN
            .captures("Secretary for Security to reply: Mr Lai Tung-kwok")
            .unwrap();
        assert_eq!(&caps[1], "Mr Lai Tung-kwok");
        assert!(RESPONDER_PATTERN.captures("Public officer to reply:").is_none());
    }

    #[test]
    fn test_paper_number_pattern() {
        assert!(PAPER_NUMBER_PATTERN.is_match("12/2013"));
        assert!(PAPER_NUMBER_PATTERN.is_match("5/2014 (L.N.)"));
        assert!(!PAPER_NUMBER_PATTERN.is_match("No. 12"));
    }

    #[test]
    fn test_language_headings() {
        assert_eq!(legislation_heading(Language::English), LEGISLATION_E);
        assert_eq!(legislation_heading(Language::Chinese), LEGISLATION_C);
        assert_eq!(other_papers_heading(Language::English), OTHER_PAPERS_E);
        assert_eq!(other_papers_heading(Language::Chinese), OTHER_PAPERS_C);
    }
}
