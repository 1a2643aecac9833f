//! Core data types for the parser.
//!
//! These are the records handed to the population logic: agenda sections,
//! agenda-embedded questions and tabled papers. All of them are plain values,
//! created once during a parse and never mutated afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Language of a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English edition, uid suffix `e`.
    English,
    /// Chinese edition, uid suffix `c`.
    Chinese,
}

impl Language {
    /// Uid suffix for this language.
    #[must_use]
    pub fn suffix(&self) -> char {
        match self {
            Self::English => 'e',
            Self::Chinese => 'c',
        }
    }

    /// Parse a listing language code (`E`/`C`, any case).
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "e" | "en" => Some(Self::English),
            "c" | "cn" | "zh" => Some(Self::Chinese),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::English => f.write_str("english"),
            Self::Chinese => f.write_str("chinese"),
        }
    }
}

/// Canonical agenda section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    TabledPapers,
    MembersBills,
    MembersMotions,
    Questions,
    Bills,
    Motions,
    /// Header seen but not recognized; content is kept unparsed.
    Other,
}

impl SectionKey {
    /// Snake case name used in logs and output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TabledPapers => "tabled_papers",
            Self::MembersBills => "members_bills",
            Self::MembersMotions => "members_motions",
            Self::Questions => "questions",
            Self::Bills => "bills",
            Self::Motions => "motions",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Oral,
    Written,
    /// The question header could not be read.
    Unknown,
}

/// A question as listed in the agenda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Question number as printed (e.g., "1").
    pub number: Option<String>,

    /// Name of the member asking, without the honorific.
    pub asker: Option<String>,

    /// Oral or written reply.
    #[serde(rename = "type")]
    pub question_type: QuestionType,

    /// Public officer(s) designated to reply.
    pub replier: Option<String>,

    /// Question text as serialized markup.
    pub body: String,
}

/// A piece of subsidiary legislation laid on the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabledLegislation {
    /// Legal notice number (e.g., "12/2013").
    pub number: String,

    /// Citation title.
    pub title: String,
}

impl TabledLegislation {
    /// Create a new legislation record.
    #[must_use]
    pub fn new(number: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            title: title.into(),
        }
    }
}

/// Any other paper laid on the table, such as reports and accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherTabledPaper {
    /// Paper title, whitespace normalized.
    pub title: String,

    /// Public officer or member presenting the paper.
    pub presenter: Option<String>,
}

/// A tabled paper of either kind, in agenda order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TabledPaper {
    Legislation(TabledLegislation),
    Other(OtherTabledPaper),
}

impl TabledPaper {
    /// Title of the paper regardless of kind.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Legislation(l) => &l.title,
            Self::Other(o) => &o.title,
        }
    }
}

/// An agenda element kept without structural parsing.
///
/// Used for sections that have no parser yet and for unrecognized sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBlock {
    /// Tag name (`p` or `table`).
    pub tag: String,

    /// Trimmed text content.
    pub text: String,

    /// Serialized markup of the element.
    pub html: String,
}

/// A detected section header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionHeader {
    /// Section the header was filed under.
    pub section: SectionKey,

    /// Header text as it appears in the document.
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_suffix() {
        assert_eq!(Language::English.suffix(), 'e');
        assert_eq!(Language::Chinese.suffix(), 'c');
    }

    #[test]
    fn test_language_from_code() {
        assert_eq!(Language::from_code("E"), Some(Language::English));
        assert_eq!(Language::from_code("c"), Some(Language::Chinese));
        assert_eq!(Language::from_code("fr"), None);
    }

    #[test]
    fn test_section_key_as_str() {
        assert_eq!(SectionKey::TabledPapers.as_str(), "tabled_papers");
        assert_eq!(SectionKey::MembersMotions.as_str(), "members_motions");
        assert_eq!(SectionKey::Other.to_string(), "other");
    }

    #[test]
    fn test_tabled_paper_title() {
        let leg = TabledPaper::Legislation(TabledLegislation::new("5/2014", "Title Y"));
        assert_eq!(leg.title(), "Title Y");

        let other = TabledPaper::Other(OtherTabledPaper {
            title: "Annual Report".to_string(),
            presenter: None,
        });
        assert_eq!(other.title(), "Annual Report");
    }

    #[test]
    fn test_question_type_serialization() {
        assert_eq!(
            serde_json::to_string(&QuestionType::Written).unwrap(),
            "\"written\""
        );
    }

    #[test]
    fn test_tabled_paper_serialization() {
        let paper = TabledPaper::Legislation(TabledLegislation::new("12/2013", "Title X"));
        let json = serde_json::to_string(&paper).unwrap();
        assert!(json.contains("\"kind\":\"legislation\""));
        assert!(json.contains("\"number\":\"12/2013\""));
    }
}
