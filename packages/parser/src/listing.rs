//! Question listings and bilingual pairing.
//!
//! The council publishes a listing of questions per meeting, with a date, a
//! number/type string such as `Q. 5 (Oral)` and a language. The listing gives
//! question documents their uids and is checked against the agenda.

use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::{validate_date, AGENDA_UID_PREFIX, QUESTION_UID_PREFIX};
use crate::agenda::Agenda;
use crate::error::{ParserError, Result};
use crate::matcher::clean_member_name;
use crate::question::SingleQuestion;
use crate::types::{Language, Question, QuestionType};

/// Most common form, e.g. `Q. 5 (Oral)` or `UQ. 2 (Oral)`.
///
/// The type excludes digits so that `Q. 12` is not read as number 1 of type 2.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static NUMBER_AND_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Q\.\s?(?P<number>\d{1,2})\s?\(?(?P<qtype>[^\d\W]+)\)?").expect("valid regex")
});

/// Single urgent question without a number, e.g. `UQ(Oral)`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static URGENT_WITHOUT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"UQ\(?(?P<qtype>[^\d\W]+)\)?").expect("valid regex"));

/// Type omitted, e.g. `Q. 8`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static NUMBER_WITHOUT_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Q\.\s\(?(?P<number>\d+)\)?").expect("valid regex"));

/// Marker of oral questions in Chinese listings.
const ORAL_C: &str = "口頭";

/// A question as listed for a council meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionListing {
    /// Question number; 0 for a single urgent question.
    pub number: u32,
    pub date: NaiveDate,
    pub language: Language,
    pub is_urgent: bool,
    pub is_oral: bool,

    /// The listing string as published.
    pub number_and_type: String,
}

impl QuestionListing {
    /// Parse a listing from its number/type string, date and language code
    /// (`E` or `C` as published).
    ///
    /// # Errors
    /// Returns `UnrecognizedListing` if no number/type form matches,
    /// `InvalidDate` if the date is not `d.m.yyyy` and `InvalidLanguage` for
    /// an unknown language code.
    ///
    /// # Examples
    /// ```
    /// use legcowatch_parser::listing::QuestionListing;
    /// use legcowatch_parser::Language;
    ///
    /// let listing = QuestionListing::parse("UQ. 2 (Oral)", "9.10.2013", "E").unwrap();
    /// assert_eq!(listing.language, Language::English);
    /// assert_eq!(listing.uid(), "question-20131009-u2-e");
    /// assert_eq!(listing.agenda_uid(), "council_agenda-20131009-e");
    /// ```
    pub fn parse(number_and_type: &str, date: &str, language: &str) -> Result<Self> {
        let date = validate_date(date)?;
        let language = Language::from_code(language)
            .ok_or_else(|| ParserError::InvalidLanguage(language.to_string()))?;

        let number = if let Some(caps) = NUMBER_AND_TYPE.captures(number_and_type) {
            parse_number(caps.name("number").map(|m| m.as_str()), number_and_type)?
        } else if URGENT_WITHOUT_NUMBER.is_match(number_and_type) {
            0
        } else if let Some(caps) = NUMBER_WITHOUT_TYPE.captures(number_and_type) {
            tracing::debug!(listing = %number_and_type, "Question listing without type");
            parse_number(caps.name("number").map(|m| m.as_str()), number_and_type)?
        } else {
            return Err(ParserError::UnrecognizedListing(number_and_type.to_string()));
        };

        // Some urgent questions are listed with number 0 and no U
        let is_urgent = number_and_type.contains("UQ") || number == 0;
        let is_oral =
            number_and_type.to_lowercase().contains("oral") || number_and_type.contains(ORAL_C);

        Ok(Self {
            number,
            date,
            language,
            is_urgent,
            is_oral,
            number_and_type: number_and_type.to_string(),
        })
    }

    /// Uid of the question document.
    #[must_use]
    pub fn uid(&self) -> String {
        let urgent = if self.is_urgent { "u" } else { "" };
        format!(
            "{QUESTION_UID_PREFIX}-{}-{urgent}{}-{}",
            self.date.format("%Y%m%d"),
            self.number,
            self.language.suffix()
        )
    }

    /// Uid of the agenda of the meeting the question was asked at.
    #[must_use]
    pub fn agenda_uid(&self) -> String {
        format!(
            "{AGENDA_UID_PREFIX}-{}-{}",
            self.date.format("%Y%m%d"),
            self.language.suffix()
        )
    }

    /// Reply type as listed.
    #[must_use]
    pub fn question_type(&self) -> QuestionType {
        if self.is_oral {
            QuestionType::Oral
        } else {
            QuestionType::Written
        }
    }
}

fn parse_number(number: Option<&str>, number_and_type: &str) -> Result<u32> {
    number
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| ParserError::UnrecognizedListing(number_and_type.to_string()))
}

/// The English and Chinese documents of one question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPair {
    pub english: Option<SingleQuestion>,
    pub chinese: Option<SingleQuestion>,
}

impl QuestionPair {
    /// Put a document on the side of its language, replacing what was there.
    pub fn insert(&mut self, question: SingleQuestion) {
        match question.language {
            Language::English => self.english = Some(question),
            Language::Chinese => self.chinese = Some(question),
        }
    }

    /// Document in the given language.
    #[must_use]
    pub fn get(&self, language: Language) -> Option<&SingleQuestion> {
        match language {
            Language::English => self.english.as_ref(),
            Language::Chinese => self.chinese.as_ref(),
        }
    }

    /// Check whether both languages are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.english.is_some() && self.chinese.is_some()
    }
}

/// A difference between a listing and the agenda.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// The question numbers differ, or the agenda number is not a number.
    Number {
        listed: u32,
        agenda: Option<String>,
    },
    /// The listing says oral, the agenda does not.
    Type {
        listed: QuestionType,
        agenda: QuestionType,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number { listed, agenda } => write!(
                f,
                "Question numbers don't match: {listed} vs {}",
                agenda.as_deref().unwrap_or("none")
            ),
            Self::Type { listed, agenda } => {
                write!(f, "Question types don't match: {listed:?} vs {agenda:?}")
            }
        }
    }
}

/// Compare a listing against the matching agenda question.
///
/// Every mismatch is logged at warning level with the question uid.
#[must_use]
pub fn crosscheck(listing: &QuestionListing, agenda_question: &Question) -> Vec<Mismatch> {
    let mut mismatches = Vec::new();

    let agenda_number = agenda_question
        .number
        .as_deref()
        .and_then(|n| n.trim().parse::<u32>().ok());
    if agenda_number != Some(listing.number) {
        mismatches.push(Mismatch::Number {
            listed: listing.number,
            agenda: agenda_question.number.clone(),
        });
    }

    if listing.is_oral && agenda_question.question_type != QuestionType::Oral {
        mismatches.push(Mismatch::Type {
            listed: listing.question_type(),
            agenda: agenda_question.question_type,
        });
    }

    let uid = listing.uid();
    for mismatch in &mismatches {
        tracing::warn!(uid = %uid, "{mismatch}");
    }
    mismatches
}

/// Find the agenda question a listing refers to.
///
/// Questions sharing a number (usually urgent ones) are told apart by the
/// asker's name as printed in the listing.
#[must_use]
pub fn find_agenda_question<'a>(
    listing: &QuestionListing,
    agenda: &'a Agenda,
    listed_asker: Option<&str>,
) -> Option<&'a Question> {
    let map = agenda.question_map();
    let candidates = map.get(listing.number.to_string().as_str())?;
    match candidates.as_slice() {
        [single] => Some(*single),
        many => {
            let wanted = clean_member_name(listed_asker?);
            many.iter().copied().find(|q| {
                q.asker.as_deref().map(clean_member_name).as_deref() == Some(wanted.as_str())
            })
        }
    }
}
