//! End-to-end conversions through the engine with the GFM rules installed.

use lowdown::LowdownService;
use lowdown_gfm::gfm;

fn convert(html: &str) -> String {
    let mut service = LowdownService::new();
    service.use_plugin(gfm);
    service.convert(html).unwrap()
}

#[test]
fn basic_table_with_heading_row() {
    let result = convert(
        "<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>",
    );
    assert_eq!(result, "| A   | B   |\n| --- | --- |\n| 1   | 2   |");
}

#[test]
fn headerless_table_gets_synthesized_header() {
    let result = convert("<table><tr><td>1</td><td>2</td></tr><tr><td>3</td><td>4</td></tr></table>");
    let lines: Vec<&str> = result.lines().collect();
    assert_eq!(lines[0], "|     |     |");
    assert_eq!(lines[1], "| --- | --- |");
    assert_eq!(lines[2], "| 1   | 2   |");
    assert_eq!(lines[3], "| 3   | 4   |");
}

#[test]
fn explicit_thead_makes_heading_row() {
    let result = convert(
        "<table><thead><tr><td>Name</td><td>Qty</td></tr></thead><tbody><tr><td>Apple</td><td>3</td></tr></tbody></table>",
    );
    assert_eq!(
        result,
        "| Name | Qty |\n| --- | --- |\n| Apple | 3   |"
    );
}

#[test]
fn alignment_attributes_drive_separator_markers() {
    let result = convert(
        r#"<table><tr><th align="left">A</th><th align="CENTER">B</th><th align="bogus">C</th><th align="right">D</th></tr><tr><td>1</td><td>2</td><td>3</td><td>4</td></tr></table>"#,
    );
    let lines: Vec<&str> = result.lines().collect();
    assert_eq!(lines[1], "| :-- | :-: | --- | --: |");
}

#[test]
fn colspan_expands_into_empty_cells() {
    let result = convert(
        r#"<table><tr><th>A</th><th>B</th><th>C</th></tr><tr><td colspan="2">X</td><td>Y</td></tr></table>"#,
    );
    let lines: Vec<&str> = result.lines().collect();
    assert_eq!(lines[0], "| A   | B   | C   |");
    assert_eq!(lines[2], "| X   |     | Y   |");

    // Every non-separator row keeps the full column count
    for line in [lines[0], lines[2]] {
        assert_eq!(line.matches('|').count() - 1, 3);
    }
}

#[test]
fn header_shorter_than_column_count_gets_neutral_markers() {
    let result = convert(
        "<table><thead><tr><th>A</th></tr></thead><tbody><tr><td>1</td><td>2</td></tr></tbody></table>",
    );
    let lines: Vec<&str> = result.lines().collect();
    assert_eq!(lines[1], "| --- | --- |");
}

#[test]
fn single_cell_table_passes_through_as_html() {
    let result = convert("<table><tr><td>only</td></tr></table>");
    assert!(result.starts_with("<table>"));
    assert!(result.contains("<td>only</td>"));
    assert!(!result.contains('|'));
}

#[test]
fn empty_table_passes_through_as_html() {
    let result = convert("<table></table>");
    assert_eq!(result, "<table></table>");
}

#[test]
fn nested_table_passes_through_as_html() {
    let result = convert(
        "<table><tr><td><table><tr><td>a</td><td>b</td></tr></table></td><td>x</td></tr><tr><td>y</td><td>z</td></tr></table>",
    );
    assert!(result.starts_with("<table>"));
    assert_eq!(result.matches("<table>").count(), 2);
    assert!(!result.contains('|'));
}

#[test]
fn table_is_separated_from_surrounding_prose() {
    let result = convert(
        "<p>before</p><table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table><p>after</p>",
    );
    assert_eq!(
        result,
        "before\n\n| A   | B   |\n| --- | --- |\n| 1   | 2   |\n\nafter"
    );
}

#[test]
fn pretty_printed_table_converts_cleanly() {
    let result = convert(
        "<table>\n  <thead>\n    <tr><th>A</th><th>B</th></tr>\n  </thead>\n  <tbody>\n    <tr><td>1</td><td>2</td></tr>\n  </tbody>\n</table>",
    );
    assert_eq!(result, "| A   | B   |\n| --- | --- |\n| 1   | 2   |");
}

#[test]
fn cell_content_is_converted_inline() {
    let result = convert(
        "<table><tr><th>A</th><th>B</th></tr><tr><td><del>1</del></td><td><strong>2</strong></td></tr></table>",
    );
    assert!(result.contains("| ~1~ | **2** |"));
}

#[test]
fn strikethrough_via_aggregate() {
    assert_eq!(convert("<del>gone</del>"), "~gone~");
}

#[test]
fn task_list_marker_prefixes_list_item() {
    let result = convert(r#"<ul><li><input type="checkbox" checked>Ship it</li></ul>"#);
    assert!(result.contains("[x] Ship it"));
    assert!(result.trim_start().starts_with('*'));
}

#[test]
fn highlighted_code_block_via_aggregate() {
    let result = convert(r#"<div class="highlight-source-js"><pre>let x = 1;</pre></div>"#);
    assert_eq!(result, "```js\nlet x = 1;\n```");
}
