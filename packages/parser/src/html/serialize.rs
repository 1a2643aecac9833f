//! Markup serialization with cleaning rules applied on the way out.
//!
//! Writing the tree back out is where cleaning happens: removed elements are
//! skipped, wrapper elements are unwrapped and unsafe attributes dropped. The
//! same writer serializes agenda fragments (question bodies, raw blocks), so
//! every piece of markup leaving the parser is in one canonical form.

use ego_tree::NodeRef;
use scraper::node::Element;
use scraper::{ElementRef, Node};
use unicode_normalization::UnicodeNormalization;

use crate::config::{REMOVE_ATTRIBUTES, REMOVE_TAGS, TAB_ARTIFACT_CLASS, UNWRAP_TAGS};

/// Elements without content or closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Raw text elements whose content would not survive a re-parse.
const RAW_TEXT_ELEMENTS: &[&str] = &["xmp", "noembed", "noframes", "plaintext"];

/// Unify punctuation and drop literal line breaks and tabs.
///
/// Curly quotes become ASCII quotes and the full-width colon becomes `:`, so
/// the colon-anchored patterns work on both languages. The result is in NFC,
/// which folds CJK compatibility ideographs from Word fonts.
///
/// # Examples
/// ```
/// use legcowatch_parser::html::unify_punctuation;
///
/// assert_eq!(unify_punctuation("\u{201c}Hi\u{201d}\n"), "\"Hi\"");
/// assert_eq!(unify_punctuation("議員問\u{ff1a}"), "議員問:");
/// ```
pub fn unify_punctuation(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\u{201c}' | '\u{201d}' => Some('"'),
            '\u{2018}' | '\u{2019}' => Some('\''),
            '\u{ff1a}' => Some(':'),
            '\n' | '\t' => None,
            other => Some(other),
        })
        .nfc()
        .collect()
}

/// Serialize an element including its own tag.
pub fn outer_html(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    write_node(*element, &mut out);
    out
}

/// Serialize the children of an element.
pub fn inner_html(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for child in element.children() {
        write_node(child, &mut out);
    }
    out
}

/// Check whether an element is dropped together with its content.
pub(crate) fn is_removed(element: &Element) -> bool {
    let name = element.name();
    REMOVE_TAGS.contains(&name) || RAW_TEXT_ELEMENTS.contains(&name)
}

/// Check whether an element is replaced by its children.
pub(crate) fn is_unwrapped(element: &Element) -> bool {
    UNWRAP_TAGS.contains(&element.name()) || element.classes().any(|c| c == TAB_ARTIFACT_CLASS)
}

fn is_unsafe_attribute(name: &str, value: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    if lower.starts_with("on") || REMOVE_ATTRIBUTES.contains(&lower.as_str()) {
        return true;
    }
    value
        .trim_start()
        .get(..11)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("javascript:"))
}

fn write_node(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => escape_text(&unify_punctuation(text), out),
        Node::Element(element) => {
            if is_removed(element) {
                return;
            }
            if is_unwrapped(element) {
                for child in node.children() {
                    write_node(child, out);
                }
                return;
            }

            let name = element.name();
            out.push('<');
            out.push_str(name);
            for (attr, value) in element.attrs() {
                if is_unsafe_attribute(attr, value) {
                    continue;
                }
                out.push(' ');
                out.push_str(attr);
                out.push_str("=\"");
                escape_attribute(&unify_punctuation(value), out);
                out.push('"');
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&name) {
                return;
            }

            for child in node.children() {
                write_node(child, out);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        Node::Document | Node::Fragment => {
            for child in node.children() {
                write_node(child, out);
            }
        }
        // Comments, doctypes and processing instructions are dropped
        _ => {}
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first<'a>(html: &'a Html, selector: &str) -> ElementRef<'a> {
        let selector = Selector::parse(selector).unwrap();
        html.select(&selector).next().unwrap()
    }

    #[test]
    fn test_unify_punctuation() {
        assert_eq!(
            unify_punctuation("\u{2018}Members\u{2019} Bill\u{2019}"),
            "'Members' Bill'"
        );
        assert_eq!(unify_punctuation("a\tb\nc"), "abc");
    }

    #[test]
    fn test_unify_punctuation_composes() {
        assert_eq!(unify_punctuation("Cafe\u{301}"), "Caf\u{e9}");
        // CJK compatibility ideograph U+F900 folds to U+8C48
        assert_eq!(unify_punctuation("\u{f900}"), "\u{8c48}");
    }

    #[test]
    fn test_outer_html_unwraps_strong() {
        let html = Html::parse_document("<p>Hello <strong>world</strong>!</p>");
        assert_eq!(outer_html(first(&html, "p")), "<p>Hello world!</p>");
    }

    #[test]
    fn test_outer_html_unwraps_tab_artifacts() {
        let html = Html::parse_document(
            r#"<p>1.<span class="pydocx-tab"> </span>Hon <b>X</b> to ask:</p>"#,
        );
        assert_eq!(
            outer_html(first(&html, "p")),
            "<p>1. Hon <b>X</b> to ask:</p>"
        );
    }

    #[test]
    fn test_outer_html_drops_unsafe_content() {
        let html = Html::parse_document(
            r#"<div onclick="x()" style="color:red" class="c"><script>alert(1)</script><!-- note -->text</div>"#,
        );
        assert_eq!(outer_html(first(&html, "div")), r#"<div class="c">text</div>"#);
    }

    #[test]
    fn test_outer_html_drops_javascript_links() {
        let html = Html::parse_document(r#"<a href="javascript:void(0)">x</a>"#);
        assert_eq!(outer_html(first(&html, "a")), "<a>x</a>");
    }

    #[test]
    fn test_outer_html_escapes() {
        let html = Html::parse_document(r#"<p title="a&quot;b">1 &lt; 2 &amp; 3</p>"#);
        assert_eq!(
            outer_html(first(&html, "p")),
            r#"<p title="a&quot;b">1 &lt; 2 &amp; 3</p>"#
        );
    }

    #[test]
    fn test_void_elements_have_no_closing_tag() {
        let html = Html::parse_document("<p>a<br>b</p>");
        assert_eq!(outer_html(first(&html, "p")), "<p>a<br>b</p>");
    }

    #[test]
    fn test_inner_html() {
        let html = Html::parse_document("<p>a<i>b</i></p>");
        assert_eq!(inner_html(first(&html, "p")), "a<i>b</i>");
    }
}
