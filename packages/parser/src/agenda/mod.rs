//! Council agenda parsing.
//!
//! An agenda is cut into sections at its roman-numeral headers, then each
//! section is handed to its own parser. Tabled papers and questions are parsed
//! into records; the other sections keep their blocks as they are.

mod context;
mod questions;
mod segment;
mod tabled;

use std::collections::BTreeMap;

use scraper::ElementRef;
use serde::{Deserialize, Serialize};

use crate::config::validate_uid;
use crate::error::{ParserError, Result};
use crate::html::{get_tag_name, get_text, normalize, outer_html};
use crate::types::{Language, Question, RawBlock, SectionHeader, SectionKey, TabledPaper};

pub use context::ParseContext;
pub use questions::parse_questions;
pub use segment::{identify_section, is_header, segment, Segments, SECTION_MAP};
pub use tabled::{
    classify_table, legislation_from_cells, parse_tabled_papers, TableClass, TableLayout,
};

/// A parsed council agenda.
///
/// Each section is `None` when the agenda has no header for it. Sections
/// without a structural parser keep their blocks as [`RawBlock`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agenda {
    /// Document uid, e.g. `council_agenda-20140618-e`.
    pub uid: String,

    /// Language encoded in the uid.
    pub language: Language,

    pub tabled_papers: Option<Vec<TabledPaper>>,
    pub members_bills: Option<Vec<RawBlock>>,
    pub members_motions: Option<Vec<RawBlock>>,
    pub questions: Option<Vec<Question>>,
    pub bills: Option<Vec<RawBlock>>,
    pub motions: Option<Vec<RawBlock>>,

    /// Blocks under headers that matched no known section.
    pub other: Option<Vec<RawBlock>>,

    /// Section headers in document order.
    pub headers: Vec<SectionHeader>,

    /// Non-fatal problems found while parsing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Agenda {
    /// Parse an agenda from converted markup.
    ///
    /// # Errors
    /// Returns `InvalidUid` if the uid does not end in a language marker, and
    /// `EmptyDocument` if the markup has no content after cleaning.
    pub fn parse(uid: &str, raw_markup: &str) -> Result<Self> {
        let language = validate_uid(uid)?;
        let doc = normalize(raw_markup);
        if doc.is_empty() {
            return Err(ParserError::EmptyDocument {
                uid: uid.to_string(),
            });
        }

        let mut ctx = ParseContext::new(uid, language);
        let segments = segment(&doc, &mut ctx);

        let tabled_papers = segments
            .get(SectionKey::TabledPapers)
            .map(|elements| parse_tabled_papers(elements, &mut ctx));
        let members_bills = segments.get(SectionKey::MembersBills).map(raw_blocks);
        let members_motions = segments.get(SectionKey::MembersMotions).map(raw_blocks);
        let questions = segments
            .get(SectionKey::Questions)
            .map(|elements| parse_questions(elements, &mut ctx));
        let bills = segments.get(SectionKey::Bills).map(raw_blocks);
        let motions = segments.get(SectionKey::Motions).map(raw_blocks);
        let other = segments.get(SectionKey::Other).map(raw_blocks);

        tracing::info!(
            uid = %uid,
            headers = segments.headers().len(),
            warnings = ctx.warnings().len(),
            "Parsed agenda"
        );

        Ok(Self {
            uid: uid.to_string(),
            language,
            tabled_papers,
            members_bills,
            members_motions,
            questions,
            bills,
            motions,
            other,
            headers: segments.into_headers(),
            warnings: ctx.into_warnings(),
        })
    }

    /// Section headers found in the document, in order.
    #[must_use]
    pub fn headers(&self) -> &[SectionHeader] {
        &self.headers
    }

    /// Check whether the agenda has a header for a section.
    #[must_use]
    pub fn has_section(&self, key: SectionKey) -> bool {
        match key {
            SectionKey::TabledPapers => self.tabled_papers.is_some(),
            SectionKey::MembersBills => self.members_bills.is_some(),
            SectionKey::MembersMotions => self.members_motions.is_some(),
            SectionKey::Questions => self.questions.is_some(),
            SectionKey::Bills => self.bills.is_some(),
            SectionKey::Motions => self.motions.is_some(),
            SectionKey::Other => self.other.is_some(),
        }
    }

    /// Questions keyed by number.
    ///
    /// Urgent questions can share a number with a regular one, so every key
    /// maps to all questions with that number in agenda order. Questions
    /// without a number are left out.
    #[must_use]
    pub fn question_map(&self) -> BTreeMap<&str, Vec<&Question>> {
        let mut map: BTreeMap<&str, Vec<&Question>> = BTreeMap::new();
        for question in self.questions.iter().flatten() {
            if let Some(number) = question.number.as_deref() {
                map.entry(number).or_default().push(question);
            }
        }
        map
    }
}

/// Parse an agenda from converted markup.
///
/// # Errors
/// See [`Agenda::parse`].
///
/// # Examples
/// ```
/// use legcowatch_parser::parse_agenda;
///
/// let agenda = parse_agenda(
///     "council_agenda-20140618-e",
///     "<p>I. Tabling of Paper</p><table><tr><td>Title Y</td><td>5/2014</td></tr></table>",
/// )
/// .unwrap();
/// assert_eq!(agenda.tabled_papers.unwrap()[0].title(), "Title Y");
/// assert!(agenda.questions.is_none());
/// ```
pub fn parse_agenda(uid: &str, raw_markup: &str) -> Result<Agenda> {
    Agenda::parse(uid, raw_markup)
}

/// Keep the elements of a section without structural parsing.
fn raw_blocks(elements: &[ElementRef<'_>]) -> Vec<RawBlock> {
    elements
        .iter()
        .map(|element| RawBlock {
            tag: get_tag_name(*element).to_string(),
            text: get_text(*element),
            html: outer_html(*element),
        })
        .collect()
}
