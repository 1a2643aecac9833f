//! HTML utility functions for navigating and extracting text from element trees.

use ego_tree::NodeRef;
use scraper::{ElementRef, Node};

/// Elements that start a new line of text.
const LINE_BREAKING_TAGS: &[&str] = &[
    "address", "blockquote", "br", "dd", "div", "dl", "dt", "h1", "h2", "h3", "h4", "h5", "h6",
    "hr", "li", "ol", "p", "pre", "table", "td", "th", "tr", "ul",
];

/// Get the lowercase tag name of an element.
///
/// # Examples
/// ```
/// use scraper::{Html, Selector};
/// use legcowatch_parser::html::get_tag_name;
///
/// let html = Html::parse_document("<table></table>");
/// let table = html.select(&Selector::parse("table").unwrap()).next().unwrap();
/// assert_eq!(get_tag_name(table), "table");
/// ```
pub fn get_tag_name<'a>(element: ElementRef<'a>) -> &'a str {
    element.value().name()
}

/// Get all element children of an element.
pub fn element_children<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

/// Find all child elements with one of the given tag names.
pub fn find_children<'a>(
    element: ElementRef<'a>,
    tags: &'a [&'a str],
) -> impl Iterator<Item = ElementRef<'a>> {
    element_children(element).filter(move |child| tags.contains(&get_tag_name(*child)))
}

/// Get the text content of an element, trimmed.
pub fn get_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Collapse runs of whitespace into single spaces and trim.
///
/// # Examples
/// ```
/// use legcowatch_parser::html::normalize_whitespace;
///
/// assert_eq!(normalize_whitespace("  Annual \u{a0} Report  "), "Annual Report");
/// ```
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Get the text content of an element with a word break after every
/// descendant element.
///
/// Converted documents split words with `<br>` and `<span>` boundaries that
/// plain text extraction would glue together.
///
/// # Examples
/// ```
/// use legcowatch_parser::html::{normalize, spaced_text};
///
/// let doc = normalize("<p>Annual<br>Report <span>2013</span>-14</p>");
/// let p = doc.blocks().next().unwrap();
/// assert_eq!(spaced_text(p), "Annual Report 2013 -14");
/// ```
pub fn spaced_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for child in element.children() {
        push_spaced(child, &mut out);
    }
    normalize_whitespace(&out)
}

fn push_spaced(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(text),
        Node::Element(_) => {
            for child in node.children() {
                push_spaced(child, out);
            }
            out.push(' ');
        }
        _ => {}
    }
}

/// Get the rows of a table in order, looking through row groups.
///
/// Rows of nested tables are not included.
pub fn table_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut rows = Vec::new();
    for child in element_children(table) {
        match get_tag_name(child) {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => {
                rows.extend(find_children(child, &["tr"]));
            }
            _ => {}
        }
    }
    rows
}

/// Get the cells of a table row in order.
pub fn row_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    find_children(row, &["td", "th"]).collect()
}

/// Split the text of an element into lines at `<br>` and block boundaries.
///
/// Lines are whitespace normalized; empty lines are dropped.
pub fn text_lines(element: ElementRef<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for child in element.children() {
        push_lines(child, &mut current, &mut lines);
    }
    flush_line(&mut current, &mut lines);
    lines
}

fn push_lines(node: NodeRef<'_, Node>, current: &mut String, lines: &mut Vec<String>) {
    match node.value() {
        Node::Text(text) => current.push_str(text),
        Node::Element(element) => {
            let breaks = LINE_BREAKING_TAGS.contains(&element.name());
            if breaks {
                flush_line(current, lines);
            }
            for child in node.children() {
                push_lines(child, current, lines);
            }
            if breaks {
                flush_line(current, lines);
            }
        }
        _ => {}
    }
}

fn flush_line(current: &mut String, lines: &mut Vec<String>) {
    let line = normalize_whitespace(current);
    if !line.is_empty() {
        lines.push(line);
    }
    current.clear();
}
