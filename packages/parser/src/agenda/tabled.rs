//! Tabled papers: subsidiary legislation and other papers tables.

use scraper::ElementRef;

use super::context::ParseContext;
use crate::config::{legislation_heading, other_papers_heading, PAPER_NUMBER_PATTERN};
use crate::grouper::grouper;
use crate::html::{get_tag_name, get_text, row_cells, spaced_text, table_rows};
use crate::types::{Language, OtherTabledPaper, TabledLegislation, TabledPaper};

/// Kind of a tabled papers table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableLayout {
    /// One piece of subsidiary legislation per row.
    Legislation,
    /// A title row followed by a presenter row, per paper.
    OtherPapers,
}

/// Result of classifying a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableClass {
    pub layout: TableLayout,
    /// The first row is a title row, not a paper.
    pub has_title_row: bool,
}

/// Classify a tabled papers table from its rows.
///
/// A title row naming the table decides the layout. Tables without a title
/// are legislation when the last cell of the first row is a paper number such
/// as `12/2013`, and other papers otherwise.
#[must_use]
pub fn classify_table(rows: &[ElementRef<'_>], language: Language) -> Option<TableClass> {
    let first = rows.first()?;
    let first_text = get_text(*first);

    if first_text.contains(legislation_heading(language)) {
        return Some(TableClass {
            layout: TableLayout::Legislation,
            has_title_row: true,
        });
    }
    if first_text.contains(other_papers_heading(language)) {
        return Some(TableClass {
            layout: TableLayout::OtherPapers,
            has_title_row: true,
        });
    }

    let last_cell = row_cells(*first).last().map(|cell| get_text(*cell));
    let layout = if last_cell.is_some_and(|text| PAPER_NUMBER_PATTERN.is_match(&text)) {
        TableLayout::Legislation
    } else {
        TableLayout::OtherPapers
    };
    Some(TableClass {
        layout,
        has_title_row: false,
    })
}

/// Parse the tabled papers section.
///
/// Only tables carry papers; paragraphs in the section (including the ones
/// nested in table cells) are ignored. Papers are returned in table order,
/// then row order.
pub fn parse_tabled_papers(elements: &[ElementRef<'_>], ctx: &mut ParseContext) -> Vec<TabledPaper> {
    let tables: Vec<_> = elements
        .iter()
        .copied()
        .filter(|e| get_tag_name(*e) == "table")
        .collect();
    tracing::info!(uid = %ctx.uid, tables = tables.len(), "Parsing tabled papers");

    let mut papers = Vec::new();
    for table in tables {
        let rows = table_rows(table);
        let Some(class) = classify_table(&rows, ctx.language) else {
            tracing::debug!(uid = %ctx.uid, "Skipping table without rows");
            continue;
        };

        let data_rows = if class.has_title_row {
            &rows[1..]
        } else {
            tracing::info!(uid = %ctx.uid, layout = ?class.layout, "Inferred table layout");
            &rows[..]
        };

        match class.layout {
            TableLayout::Legislation => papers.extend(parse_legislation_rows(data_rows, ctx)),
            TableLayout::OtherPapers => papers.extend(parse_other_papers(data_rows, ctx)),
        }
    }
    papers
}

fn parse_legislation_rows(rows: &[ElementRef<'_>], ctx: &mut ParseContext) -> Vec<TabledPaper> {
    let mut papers = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        let row_text = get_text(*row);
        if row_text.is_empty() {
            continue;
        }

        let cells: Vec<String> = row_cells(*row).into_iter().map(get_text).collect();
        match legislation_from_cells(&cells) {
            Some(legislation) => {
                tracing::debug!(uid = %ctx.uid, number = %legislation.number, title = %legislation.title, "Found legislation");
                papers.push(TabledPaper::Legislation(legislation));
            }
            None => ctx.warn(format!(
                "Could not parse tabled legislation from row {index} with {} cells: '{row_text}'",
                cells.len()
            )),
        }
    }
    papers
}

/// Build a legislation record from the cell texts of a row.
///
/// The number is in the last column and the title in the one before it.
/// Some tables have a blank spacer column before the number, in which case
/// the title is one further left. Returns `None` when the row is too short.
///
/// # Examples
/// ```
/// use legcowatch_parser::agenda::legislation_from_cells;
///
/// let cells = ["1", "", "Title X", "12/2013"].map(String::from);
/// let legislation = legislation_from_cells(&cells).unwrap();
/// assert_eq!(legislation.title, "Title X");
/// assert_eq!(legislation.number, "12/2013");
/// ```
#[must_use]
pub fn legislation_from_cells(cells: &[String]) -> Option<TabledLegislation> {
    let (number, rest) = cells.split_last()?;
    let (title, rest) = rest.split_last()?;
    let title = if title.is_empty() {
        rest.last()?
    } else {
        title
    };
    Some(TabledLegislation::new(number.as_str(), title.as_str()))
}

fn parse_other_papers(rows: &[ElementRef<'_>], ctx: &mut ParseContext) -> Vec<TabledPaper> {
    let pairs = grouper(rows, 2);
    if let Some(stray) = pairs.remainder().first() {
        ctx.warn(format!(
            "Dropping unpaired row in other papers table: '{}'",
            spaced_text(*stray)
        ));
    }

    pairs
        .map(|pair| {
            let title = spaced_text(pair[0]);
            let presenter = Some(get_text(pair[1])).filter(|p| !p.is_empty());
            tracing::debug!(uid = %ctx.uid, title = %title, "Found other paper");
            TabledPaper::Other(OtherTabledPaper { title, presenter })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::normalize;
    use pretty_assertions::assert_eq;

    fn ctx() -> ParseContext {
        ParseContext::new("council_agenda-20140618-e", Language::English)
    }

    fn parse(markup: &str) -> (Vec<TabledPaper>, Vec<String>) {
        let doc = normalize(markup);
        let elements: Vec<_> = doc.blocks().collect();
        let mut ctx = ctx();
        let papers = parse_tabled_papers(&elements, &mut ctx);
        (papers, ctx.into_warnings())
    }

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_legislation_from_cells() {
        assert_eq!(
            legislation_from_cells(&cells(&["", "Title Y", "5/2014"])),
            Some(TabledLegislation::new("5/2014", "Title Y"))
        );
        assert_eq!(
            legislation_from_cells(&cells(&["1", "", "Title X", "12/2013"])),
            Some(TabledLegislation::new("12/2013", "Title X"))
        );
    }

    #[test]
    fn test_legislation_from_short_cells() {
        assert_eq!(legislation_from_cells(&cells(&["12/2013"])), None);
        assert_eq!(legislation_from_cells(&cells(&["", "12/2013"])), None);
        assert_eq!(legislation_from_cells(&[]), None);
    }

    #[test]
    fn test_titled_legislation_table() {
        let (papers, warnings) = parse(
            "<table><tr><td>Subsidiary Legislation / Instruments</td><td>L.N. No.</td></tr>\
             <tr><td>1.</td><td>Title X</td><td>12/2013</td></tr>\
             <tr><td></td><td></td></tr>\
             <tr><td>2.</td><td>Title Y</td><td>13/2013</td></tr></table>",
        );
        assert_eq!(
            papers,
            vec![
                TabledPaper::Legislation(TabledLegislation::new("12/2013", "Title X")),
                TabledPaper::Legislation(TabledLegislation::new("13/2013", "Title Y")),
            ]
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_untitled_legislation_table_is_inferred() {
        let (papers, _) = parse("<table><tr><td>Title Z</td><td>100/2013</td></tr></table>");
        assert_eq!(
            papers,
            vec![TabledPaper::Legislation(TabledLegislation::new(
                "100/2013", "Title Z"
            ))]
        );
    }

    #[test]
    fn test_short_legislation_row_is_skipped() {
        let (papers, warnings) = parse(
            "<table><tr><td>Subsidiary Legislation</td></tr>\
             <tr><td>stray</td></tr>\
             <tr><td>Title X</td><td>12/2013</td></tr></table>",
        );
        assert_eq!(
            papers,
            vec![TabledPaper::Legislation(TabledLegislation::new(
                "12/2013", "Title X"
            ))]
        );
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("stray"));
    }

    #[test]
    fn test_titled_other_papers_table() {
        let (papers, warnings) = parse(
            "<table><tr><td>Other Papers</td></tr>\
             <tr><td>1.</td><td>Hong Kong Tourism Board<br>Annual Report 2012-13</td></tr>\
             <tr><td></td><td>(to be presented by the Secretary for Commerce)</td></tr>\
             <tr><td>2.</td><td>Report of the Panel</td></tr>\
             <tr><td></td><td></td></tr></table>",
        );
        assert_eq!(
            papers,
            vec![
                TabledPaper::Other(OtherTabledPaper {
                    title: "1. Hong Kong Tourism Board Annual Report 2012-13".to_string(),
                    presenter: Some("(to be presented by the Secretary for Commerce)".to_string()),
                }),
                TabledPaper::Other(OtherTabledPaper {
                    title: "2. Report of the Panel".to_string(),
                    presenter: None,
                }),
            ]
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_other_papers_odd_row_is_dropped() {
        let (papers, warnings) = parse(
            "<table><tr><td>Paper A</td></tr><tr><td>Presenter A</td></tr>\
             <tr><td>Paper B</td></tr></table>",
        );
        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0].title(), "Paper A");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Paper B"));
    }

    #[test]
    fn test_tables_concatenate_in_order() {
        let (papers, _) = parse(
            "<p>Intro paragraph</p>\
             <table><tr><td>Subsidiary Legislation</td></tr><tr><td>Title X</td><td>12/2013</td></tr></table>\
             <table><tr><td>Other Papers</td></tr><tr><td>Report</td></tr><tr><td>Officer</td></tr></table>",
        );
        let titles: Vec<_> = papers.iter().map(TabledPaper::title).collect();
        assert_eq!(titles, vec!["Title X", "Report"]);
    }

    #[test]
    fn test_chinese_headings() {
        let doc = normalize(
            "<table><tr><td>附屬法例</td></tr><tr><td>標題</td><td>12/2013</td></tr></table>",
        );
        let elements: Vec<_> = doc.blocks().collect();
        let mut ctx = ParseContext::new("council_agenda-20140618-c", Language::Chinese);
        let papers = parse_tabled_papers(&elements, &mut ctx);
        assert_eq!(
            papers,
            vec![TabledPaper::Legislation(TabledLegislation::new(
                "12/2013", "標題"
            ))]
        );
    }

    #[test]
    fn test_parsing_twice_is_stable() {
        let markup = "<table><tr><td>Paper A</td></tr><tr><td>Presenter A</td></tr></table>";
        assert_eq!(parse(markup), parse(markup));
    }

    #[test]
    fn test_empty_table_is_skipped() {
        let (papers, warnings) = parse("<table></table>");
        assert!(papers.is_empty());
        assert!(warnings.is_empty());
    }
}
