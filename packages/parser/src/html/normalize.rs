//! Normalization of converted Word markup into a clean element tree.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::serialize::{inner_html, unify_punctuation};

/// Top-level block elements the agenda is made of.
#[allow(clippy::expect_used)] // Static selector that is guaranteed to be valid
static BLOCK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p, table").expect("valid selector"));

#[allow(clippy::expect_used)] // Static selector that is guaranteed to be valid
static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("valid selector"));

/// A cleaned document tree.
///
/// Produced by [`normalize`]. The tree only contains content that survived
/// cleaning, so navigation never has to skip scripts, comments or emphasis
/// wrappers.
pub struct NormalizedDocument {
    html: Html,
}

impl NormalizedDocument {
    /// The body element, or the root when the parser produced no body.
    #[must_use]
    pub fn body(&self) -> ElementRef<'_> {
        self.html
            .select(&BODY_SELECTOR)
            .next()
            .unwrap_or_else(|| self.html.root_element())
    }

    /// Paragraph and table elements at any depth, in document order.
    ///
    /// Paragraphs nested in table cells are yielded as well, after their table.
    pub fn blocks(&self) -> impl Iterator<Item = ElementRef<'_>> + '_ {
        self.html.select(&BLOCK_SELECTOR)
    }

    /// Check whether the document has no text at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body().text().all(|t| t.trim().is_empty())
    }

    /// Canonical markup of the body content.
    ///
    /// Normalizing this string again yields the same string.
    #[must_use]
    pub fn to_html(&self) -> String {
        inner_html(self.body())
    }
}

impl std::fmt::Debug for NormalizedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NormalizedDocument")
            .field("html", &self.to_html())
            .finish()
    }
}

/// Normalize raw markup into a clean document tree.
///
/// - Curly quotes and the full-width colon are replaced by ASCII forms
/// - Literal newlines and tabs are removed
/// - Scripts, styles, comments and embedded content are removed
/// - `<strong>` wrappers and `pydocx-tab` spans are unwrapped
///
/// The HTML parser is tolerant, so malformed markup never fails here; callers
/// decide what an empty result means for them.
///
/// # Examples
/// ```
/// use legcowatch_parser::html::normalize;
///
/// let doc = normalize("<p>I.\t<strong>Tabling of Paper</strong></p><script>x()</script>");
/// assert_eq!(doc.to_html(), "<p>I.Tabling of Paper</p>");
/// ```
#[must_use]
pub fn normalize(raw_markup: &str) -> NormalizedDocument {
    let unified = unify_punctuation(raw_markup);
    let parsed = Html::parse_document(&unified);

    let body = parsed
        .select(&BODY_SELECTOR)
        .next()
        .unwrap_or_else(|| parsed.root_element());
    let cleaned = inner_html(body);

    tracing::trace!(
        raw_len = raw_markup.len(),
        cleaned_len = cleaned.len(),
        "Normalized markup"
    );

    NormalizedDocument {
        html: Html::parse_document(&cleaned),
    }
}
