//! Single council question documents.
//!
//! Each question asked in the council is also published on its own, as a
//! press release holding the question text and the reply. The release opens
//! with a title line (`LCQ5: ...` / `立法會五題:...`) and an introduction
//! naming the asker and the replying officers, followed by a `Question:` and a
//! `Reply:` part.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::validate_uid;
use crate::error::{ParserError, Result};
use crate::html::{normalize, text_lines};
use crate::matcher::clean_member_name;
use crate::types::Language;

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TITLE_E: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^LCQ\s*\d*\s*:\s*(.+)$").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TITLE_C: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^立法會(?:急切質詢|質詢|[一二三四五六七八九十]+題)\s*:\s*(.+)$").expect("valid regex")
});

/// Introduction: asker, written marker, repliers.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static INTRO_E: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)following is an? (?:urgent )?question by (?:the )?(.+?)\s+(?:under .+?\s+)?and an? (written )?reply by (?:the )?(.+?),?\s+in the Legislative Council",
    )
    .expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static INTRO_C: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"立法會會議上(.+?)的(?:急切)?(?:提問|質詢)和(.+?)的(書面)?答覆").expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static QUESTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:Question|問題)\s*:\s*(.*)$").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static REPLY_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:Reply|答覆)\s*:\s*(.*)$").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static END_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:Ends/|完$)").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static REPLIER_SEPARATOR_E: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",?\s+and\s+the\s+").expect("valid regex"));

/// Words an English officer title starts with.
const OFFICE_PREFIXES_E: &[&str] = &[
    "Secretary",
    "Under Secretary",
    "Permanent Secretary",
    "Chief Secretary",
    "Financial Secretary",
    "Director",
    "Commissioner",
    "Acting",
];

/// Suffixes of Chinese officer titles.
const OFFICE_SUFFIXES_C: &[&str] = &["局長", "司長", "處長", "署長", "專員", "主席"];

/// Listing data known about a question before its document is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionMeta {
    /// Question uid; the last character selects the language.
    pub uid: String,

    /// Council meeting date.
    pub date: NaiveDate,

    pub is_urgent: bool,
    pub is_oral: bool,

    /// Subject as given by the question listing.
    pub subject: Option<String>,

    /// Link to the published reply.
    pub reply_link: Option<String>,
}

/// A question parsed from its own document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleQuestion {
    pub uid: String,
    pub language: Language,
    pub date: NaiveDate,
    pub is_urgent: bool,
    pub is_oral: bool,

    /// Member asking, without honorifics.
    pub asker: Option<String>,

    /// Officers replying, each as "title, name" when both are given.
    pub repliers: Vec<String>,

    /// Subject of the question as listed, falling back to the document title.
    pub subject: String,

    /// Question text, one paragraph per line.
    pub body: String,

    /// Title of the published reply.
    pub reply_subject: String,

    /// Reply text, one paragraph per line.
    pub reply_body: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_link: Option<String>,

    /// Non-fatal problems found while parsing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl SingleQuestion {
    /// Parse a question document.
    ///
    /// # Errors
    /// - `InvalidUid` if the uid does not end in a language marker
    /// - `EmptyDocument` if the markup has no text
    /// - `MissingSection` if the question or reply part cannot be found
    /// - `MissingField` if neither the document nor the listing gives a subject
    pub fn parse(meta: &QuestionMeta, raw_markup: &str) -> Result<Self> {
        let language = validate_uid(&meta.uid)?;
        let doc = normalize(raw_markup);
        if doc.is_empty() {
            return Err(ParserError::EmptyDocument {
                uid: meta.uid.clone(),
            });
        }

        let lines = text_lines(doc.body());
        let mut warnings = Vec::new();
        let mut warn = |message: String| {
            tracing::warn!(uid = %meta.uid, "{message}");
            warnings.push(message);
        };

        let title_pattern = match language {
            Language::English => &TITLE_E,
            Language::Chinese => &TITLE_C,
        };
        let title = lines.iter().find_map(|line| {
            title_pattern
                .captures(line)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
        });

        let (reply_subject, subject) = match (title, meta.subject.as_deref()) {
            (Some(title), Some(hint)) => (title, hint.to_string()),
            (Some(title), None) => (title.clone(), title),
            (None, Some(hint)) => {
                warn("Could not find question title, using listed subject".to_string());
                (hint.to_string(), hint.to_string())
            }
            (None, None) => {
                return Err(ParserError::MissingField {
                    uid: meta.uid.clone(),
                    field: "subject".to_string(),
                })
            }
        };

        let intro = lines.iter().find_map(|line| parse_intro(line, language));
        let (asker, repliers) = match intro {
            Some(intro) => {
                if intro.written && meta.is_oral {
                    warn("Document has a written reply but the listing says oral".to_string());
                }
                (Some(intro.asker), intro.repliers)
            }
            None => {
                warn("Could not find asker and repliers in introduction".to_string());
                (None, Vec::new())
            }
        };

        let question_start = find_marker(&lines, &QUESTION_MARKER, 0).ok_or_else(|| {
            ParserError::MissingSection {
                uid: meta.uid.clone(),
                section: "question".to_string(),
            }
        })?;
        let reply_start =
            find_marker(&lines, &REPLY_MARKER, question_start.index + 1).ok_or_else(|| {
                ParserError::MissingSection {
                    uid: meta.uid.clone(),
                    section: "reply".to_string(),
                }
            })?;
        let reply_end = lines[reply_start.index + 1..]
            .iter()
            .position(|line| END_MARKER.is_match(line))
            .map_or(lines.len(), |offset| reply_start.index + 1 + offset);

        let body = join_part(
            question_start.rest,
            &lines[question_start.index + 1..reply_start.index],
        );
        let reply_body = join_part(reply_start.rest, &lines[reply_start.index + 1..reply_end]);

        tracing::debug!(
            uid = %meta.uid,
            asker = ?asker,
            repliers = repliers.len(),
            "Parsed question document"
        );

        Ok(Self {
            uid: meta.uid.clone(),
            language,
            date: meta.date,
            is_urgent: meta.is_urgent,
            is_oral: meta.is_oral,
            asker,
            repliers,
            subject,
            body,
            reply_subject,
            reply_body,
            reply_link: meta.reply_link.clone(),
            warnings,
        })
    }
}

/// Parse a question document.
///
/// # Errors
/// See [`SingleQuestion::parse`].
pub fn parse_question_document(
    uid: &str,
    date: NaiveDate,
    is_urgent: bool,
    is_oral: bool,
    raw_markup: &str,
    subject_hint: Option<&str>,
    reply_link: Option<&str>,
) -> Result<SingleQuestion> {
    let meta = QuestionMeta {
        uid: uid.to_string(),
        date,
        is_urgent,
        is_oral,
        subject: subject_hint.map(str::to_string),
        reply_link: reply_link.map(str::to_string),
    };
    SingleQuestion::parse(&meta, raw_markup)
}

/// Asker and repliers named in the introduction.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Intro {
    asker: String,
    repliers: Vec<String>,
    written: bool,
}

fn parse_intro(line: &str, language: Language) -> Option<Intro> {
    match language {
        Language::English => {
            let caps = INTRO_E.captures(line)?;
            Some(Intro {
                asker: clean_member_name(caps.get(1)?.as_str()),
                repliers: split_repliers_e(caps.get(3)?.as_str()),
                written: caps.get(2).is_some(),
            })
        }
        Language::Chinese => {
            let caps = INTRO_C.captures(line)?;
            Some(Intro {
                asker: clean_member_name(caps.get(1)?.as_str()),
                repliers: split_repliers_c(caps.get(2)?.as_str()),
                written: caps.get(3).is_some(),
            })
        }
    }
}

/// Split English repliers at "and the" where an officer title follows.
fn split_repliers_e(text: &str) -> Vec<String> {
    let mut repliers: Vec<String> = Vec::new();
    for piece in REPLIER_SEPARATOR_E.split(text) {
        let piece = piece.trim().trim_end_matches(',');
        let starts_office = OFFICE_PREFIXES_E.iter().any(|p| piece.starts_with(p));
        match repliers.last_mut() {
            // "Secretary for Financial Services and the Treasury" is one office
            Some(last) if !starts_office => {
                last.push_str(" and the ");
                last.push_str(piece);
            }
            _ => repliers.push(piece.to_string()),
        }
    }
    repliers.retain(|r| !r.is_empty());
    repliers
}

/// Split Chinese repliers at 和 where the preceding part ends an officer title.
fn split_repliers_c(text: &str) -> Vec<String> {
    let mut repliers: Vec<String> = Vec::new();
    let mut pending = String::new();
    for piece in text.split('和') {
        if !pending.is_empty() {
            pending.push('和');
        }
        pending.push_str(piece);
        if OFFICE_SUFFIXES_C.iter().any(|s| pending.contains(s)) {
            repliers.push(pending.trim().to_string());
            pending.clear();
        }
    }
    match repliers.last_mut() {
        Some(last) if !pending.is_empty() => {
            last.push('和');
            last.push_str(&pending);
        }
        None if !pending.trim().is_empty() => repliers.push(pending.trim().to_string()),
        _ => {}
    }
    repliers
}

/// Position of a part marker and any text following it on the same line.
struct Marker<'a> {
    index: usize,
    rest: &'a str,
}

fn find_marker<'a>(lines: &'a [String], pattern: &Regex, from: usize) -> Option<Marker<'a>> {
    lines
        .iter()
        .enumerate()
        .skip(from)
        .find_map(|(index, line)| {
            let caps = pattern.captures(line)?;
            let rest = caps.get(1).map_or("", |m| m.as_str()).trim();
            Some(Marker { index, rest })
        })
}

fn join_part(first: &str, lines: &[String]) -> String {
    std::iter::once(first)
        .chain(lines.iter().map(String::as_str))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
