//! Questions listed in the agenda.

use scraper::ElementRef;

use super::context::ParseContext;
use crate::config::{question_pattern, RESPONDER_PATTERN, WRITTEN_MARKER};
use crate::html::{get_text, outer_html};
use crate::types::{Question, QuestionType};

/// Number of trailing elements searched for the responder line.
const RESPONDER_WINDOW: usize = 2;

/// Parse the questions section into questions.
///
/// A new question starts at every element matching the question pattern of
/// the document language. Elements up to the next start belong to the current
/// question; the last question takes everything up to the end of the section.
pub fn parse_questions(elements: &[ElementRef<'_>], ctx: &mut ParseContext) -> Vec<Question> {
    tracing::info!(uid = %ctx.uid, elements = elements.len(), "Parsing questions");

    let pattern = question_pattern(ctx.language);
    let mut questions = Vec::new();
    let mut parts: Vec<ElementRef<'_>> = Vec::new();

    for element in elements {
        let text = get_text(*element);
        if text.is_empty() {
            continue;
        }
        if pattern.is_match(&text) {
            if !parts.is_empty() {
                questions.push(build_question(&parts, ctx));
                parts.clear();
            }
            tracing::debug!(uid = %ctx.uid, text = %text, "Found question");
        }
        parts.push(*element);
    }

    if !parts.is_empty() {
        questions.push(build_question(&parts, ctx));
    }

    tracing::info!(uid = %ctx.uid, count = questions.len(), "Parsed questions");
    questions
}

/// Build a question from its elements: header, body, responder.
fn build_question(parts: &[ElementRef<'_>], ctx: &mut ParseContext) -> Question {
    let header = parts.first().map(|e| get_text(*e)).unwrap_or_default();

    let (number, asker, question_type) = match question_pattern(ctx.language).captures(&header) {
        Some(caps) => {
            let question_type = if header.starts_with(WRITTEN_MARKER) {
                QuestionType::Written
            } else {
                QuestionType::Oral
            };
            (
                caps.get(1).map(|m| m.as_str().to_string()),
                caps.get(2).map(|m| m.as_str().trim().to_string()),
                question_type,
            )
        }
        None => {
            ctx.warn(format!("Could not find asker of question in element: '{header}'"));
            (None, None, QuestionType::Unknown)
        }
    };

    // Officers may be listed over two elements, and the last question may be
    // followed by a note on written replies, so the earlier candidate wins.
    let window_start = parts.len().saturating_sub(RESPONDER_WINDOW).max(1);
    let responder = (window_start..parts.len()).find_map(|index| {
        let text = get_text(parts[index]);
        RESPONDER_PATTERN
            .captures(&text)
            .and_then(|caps| caps.get(1))
            .map(|m| (index, m.as_str().trim().to_string()))
    });

    let (replier, body_end) = match responder {
        Some((index, replier)) => (Some(replier), index),
        None => {
            let last = parts.last().map(|e| get_text(*e)).unwrap_or_default();
            ctx.warn(format!(
                "Could not find responder of question {} in element: '{last}'",
                number.as_deref().unwrap_or("?")
            ));
            (None, parts.len())
        }
    };

    let body = parts
        .get(1..body_end)
        .unwrap_or_default()
        .iter()
        .map(|e| outer_html(*e))
        .collect::<String>();

    Question {
        number,
        asker,
        question_type,
        replier,
        body,
    }
}
