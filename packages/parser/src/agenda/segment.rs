//! Splitting an agenda into sections at its roman-numeral headers.

use std::collections::HashMap;

use scraper::ElementRef;

use super::context::ParseContext;
use crate::config::HEADER_PATTERN;
use crate::html::{get_text, NormalizedDocument};
use crate::types::{SectionHeader, SectionKey};

/// Header phrases for each section, checked in order.
///
/// Members' bills and motions come before the generic bills and motions,
/// since their headers contain the generic phrases too.
pub const SECTION_MAP: &[(SectionKey, &[&str])] = &[
    (SectionKey::TabledPapers, &["Tabling of Paper", "提交文件"]),
    (
        SectionKey::MembersBills,
        &["Members' Bill", "Member's Bill", "議員法案"],
    ),
    (
        SectionKey::MembersMotions,
        &["Members' Motion", "Member's Motion", "議員議案"],
    ),
    (SectionKey::Questions, &["Question", "質詢"]),
    (SectionKey::Bills, &["Bill", "法案"]),
    (SectionKey::Motions, &["Motion", "議案"]),
];

/// Identify the section a header introduces.
///
/// The first section with a phrase contained in the header wins.
///
/// # Examples
/// ```
/// use legcowatch_parser::agenda::identify_section;
/// use legcowatch_parser::types::SectionKey;
///
/// assert_eq!(identify_section("IV. Members' Bills"), Some(SectionKey::MembersBills));
/// assert_eq!(identify_section("II. 質詢"), Some(SectionKey::Questions));
/// assert_eq!(identify_section("V. Statements"), None);
/// ```
#[must_use]
pub fn identify_section(header: &str) -> Option<SectionKey> {
    SECTION_MAP
        .iter()
        .find(|(_, phrases)| phrases.iter().any(|phrase| header.contains(phrase)))
        .map(|(key, _)| *key)
}

/// Check whether the text of a block is a section header.
#[must_use]
pub fn is_header(text: &str) -> bool {
    HEADER_PATTERN.is_match(text)
}

/// Agenda elements bucketed by section.
#[derive(Debug, Default)]
pub struct Segments<'a> {
    buckets: HashMap<SectionKey, Vec<ElementRef<'a>>>,
    headers: Vec<SectionHeader>,
}

impl<'a> Segments<'a> {
    /// Elements of a section, or `None` when no header introduced it.
    #[must_use]
    pub fn get(&self, key: SectionKey) -> Option<&[ElementRef<'a>]> {
        self.buckets.get(&key).map(Vec::as_slice)
    }

    /// Headers in document order.
    #[must_use]
    pub fn headers(&self) -> &[SectionHeader] {
        &self.headers
    }

    /// Take ownership of the recorded headers.
    #[must_use]
    pub fn into_headers(self) -> Vec<SectionHeader> {
        self.headers
    }
}

/// Walk the paragraphs and tables of a document and bucket them by section.
///
/// Content before the first header is discarded. Unrecognized headers open
/// the `other` section.
pub fn segment<'a>(doc: &'a NormalizedDocument, ctx: &mut ParseContext) -> Segments<'a> {
    let mut segments = Segments::default();
    let mut current: Option<SectionKey> = None;

    for element in doc.blocks() {
        let text = get_text(element);
        if text.is_empty() {
            continue;
        }

        if is_header(&text) {
            let key = match identify_section(&text) {
                Some(key) => {
                    tracing::info!(uid = %ctx.uid, header = %text, section = %key, "Identified section header");
                    key
                }
                None => {
                    ctx.warn(format!("Could not identify section from header '{text}'"));
                    SectionKey::Other
                }
            };
            segments.buckets.entry(key).or_default();
            segments.headers.push(SectionHeader {
                section: key,
                text,
            });
            current = Some(key);
        } else if let Some(key) = current {
            segments.buckets.entry(key).or_default().push(element);
        } else {
            tracing::trace!(uid = %ctx.uid, text = %text, "Skipping content before first header");
        }
    }

    segments
}
