//! Table conversion rules.
//!
//! HTML tables are irregular (optional headers, row/col spans, nested
//! tables, multiple body sections); Markdown tables are a rigid grid with a
//! single heading row. Tables that cannot survive the flattening are kept as
//! verbatim HTML instead of being rendered as a broken grid.

use lowdown::{Filter, LowdownService, Rule};
use scraper::ElementRef;

/// Neutral separator token for columns without a recognized alignment
const NEUTRAL_MARKER: &str = "---";

fn element_children<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

/// All rows of a table, gathered across any thead/tbody/tfoot wrappers,
/// in document order.
fn table_rows<'a>(table: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let mut rows = Vec::new();
    for child in element_children(table) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => {
                rows.extend(element_children(child).filter(|c| c.value().name() == "tr"));
            }
            _ => {}
        }
    }
    rows
}

/// The nearest table ancestor, if any
fn parent_table<'a>(node: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    node.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "table")
}

/// True when the subtree below `table` contains another table
fn contains_nested_table(table: ElementRef) -> bool {
    table
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|e| e.value().name() == "table")
}

/// Whether a table must be left as raw HTML rather than converted.
///
/// Skipped: an absent table (e.g. a row whose ancestor lookup failed), a
/// table with no rows, a single-row table with at most one cell (a
/// formatting artifact, not a data grid), and any table containing a nested
/// table.
fn should_skip(table: Option<ElementRef>) -> bool {
    let Some(table) = table else {
        return true;
    };
    let rows = table_rows(table);
    if rows.is_empty() {
        return true;
    }
    if rows.len() == 1 && element_children(rows[0]).count() <= 1 {
        return true;
    }
    contains_nested_table(table)
}

/// The maximum cell count over all rows. Rows may be ragged; recomputed on
/// every use.
fn column_count(table: ElementRef) -> usize {
    table_rows(table)
        .iter()
        .map(|row| element_children(*row).count())
        .max()
        .unwrap_or(0)
}

/// A tr is a heading row if:
/// - the parent is a thead
/// - or it is the first child of the table or of the first tbody (possibly
///   following a blank thead), and every cell is a th
fn is_heading_row(row: ElementRef) -> bool {
    let Some(parent) = row.parent().and_then(ElementRef::wrap) else {
        return false;
    };
    if parent.value().name() == "thead" {
        return true;
    }

    let is_first_child = element_children(parent)
        .next()
        .map(|first| first.id() == row.id())
        .unwrap_or(false);

    is_first_child
        && (parent.value().name() == "table" || is_first_body_section(parent))
        && element_children(row).all(|cell| cell.value().name() == "th")
}

/// A tbody with no preceding section, or preceded only by a thead whose text
/// content is whitespace
fn is_first_body_section(element: ElementRef) -> bool {
    if element.value().name() != "tbody" {
        return false;
    }
    match element.prev_siblings().filter_map(ElementRef::wrap).next() {
        None => true,
        Some(prev) => {
            prev.value().name() == "thead" && prev.text().all(|t| t.trim().is_empty())
        }
    }
}

/// Position of a cell among its row's element children
fn cell_index(cell: ElementRef) -> usize {
    cell.prev_siblings().filter_map(ElementRef::wrap).count()
}

/// The colspan attribute, coerced to 1 when missing, malformed or < 1
fn colspan_of(cell: &ElementRef) -> usize {
    cell.value()
        .attr("colspan")
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n >= 1)
        .unwrap_or(1)
}

/// Render one cell's converted inline content as a padded, pipe-delimited
/// Markdown cell.
///
/// The column index comes from `index` when given (synthesized separator
/// cells have no node to derive a position from), else from the node's
/// position in its row. Line breaks collapse to `<br>`, content is padded to
/// at least three characters, and a colspan of N appends N-1 empty synthetic
/// cells so column counts stay aligned across rows.
fn format_cell(content: &str, node: Option<ElementRef>, index: Option<usize>) -> String {
    let index = index.or_else(|| node.map(cell_index)).unwrap_or(0);
    let prefix = if index == 0 { "| " } else { " " };

    let mut body = content.trim().replace("\r\n", "<br>").replace('\n', "<br>");
    while body.chars().count() < 3 {
        body.push(' ');
    }

    if let Some(node) = node {
        // Lossy: the spanned content is not replicated into the extra cells
        for _ in 1..colspan_of(&node) {
            body.push_str(" | ");
            body.push_str(&" ".repeat(3));
        }
    }

    format!("{}{} |", prefix, body)
}

/// Separator-row token for an alignment attribute value (lowercased)
fn alignment_marker(align: &str) -> Option<&'static str> {
    match align {
        "left" => Some(":--"),
        "right" => Some("--:"),
        "center" => Some(":-:"),
        _ => None,
    }
}

fn collapse_newline_runs(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_newline = false;
    for c in s.chars() {
        if c == '\n' {
            if !prev_was_newline {
                result.push(c);
            }
            prev_was_newline = true;
        } else {
            result.push(c);
            prev_was_newline = false;
        }
    }
    result
}

fn cell_rule() -> Rule {
    Rule::for_tags(&["th", "td"], |node, content, _| {
        if should_skip(parent_table(node)) {
            return content.to_string();
        }
        format_cell(content, Some(*node), None)
    })
}

fn row_rule() -> Rule {
    Rule::for_tag("tr", |node, content, _| {
        let Some(table) = parent_table(node) else {
            return content.to_string();
        };
        if should_skip(Some(table)) {
            return content.to_string();
        }

        let mut separator = String::new();
        if is_heading_row(*node) {
            let columns = column_count(table);
            let children: Vec<ElementRef> = element_children(*node).collect();
            for i in 0..columns {
                let child = children.get(i).copied();
                let marker = child
                    .and_then(|c| c.value().attr("align"))
                    .map(|a| a.to_lowercase())
                    .and_then(|a| alignment_marker(&a))
                    .unwrap_or(NEUTRAL_MARKER);
                // An absent child has no node to derive a position from
                separator.push_str(&format_cell(marker, child, child.is_none().then_some(i)));
            }
        }

        if separator.is_empty() {
            format!("\n{}", content)
        } else {
            format!("\n{}\n{}", content, separator)
        }
    })
}

fn table_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, _, _| tag == "table"),
        |node, content, _| {
            if should_skip(Some(*node)) {
                return content.to_string();
            }

            // A table whose first row is not a heading still needs a header
            // and separator to be a structurally valid Markdown table
            let columns = column_count(*node);
            let first_row_is_heading = table_rows(*node)
                .first()
                .map(|row| is_heading_row(*row))
                .unwrap_or(false);
            let empty_header = if columns > 0 && !first_row_is_heading {
                format!("|{}\n|{}", "     |".repeat(columns), " --- |".repeat(columns))
            } else {
                String::new()
            };

            let content = collapse_newline_runs(content);
            format!("\n\n{}{}\n\n", empty_header, content)
        },
    )
}

fn section_rule() -> Rule {
    // thead/tbody/tfoot contribute their children's content unmodified
    Rule::for_tags(&["thead", "tbody", "tfoot"], |_, content, _| {
        content.to_string()
    })
}

/// The table rule set as named descriptors, for callers that merge rules
/// into an engine configuration themselves.
pub fn table_rules() -> Vec<(&'static str, Rule)> {
    vec![
        ("table-cell", cell_rule()),
        ("table-row", row_rule()),
        ("table", table_rule()),
        ("table-section", section_rule()),
    ]
}

/// Install the table rules, plus the keep predicate that preserves
/// skip-eligible tables as their original markup.
pub fn tables(service: &mut LowdownService) {
    service.keep(Filter::predicate(|tag, node, _| {
        tag == "table" && should_skip(Some(*node))
    }));
    for (name, rule) in table_rules() {
        service.add_rule(name, rule);
    }
}
