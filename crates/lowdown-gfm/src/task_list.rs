//! Task list item rule.

use lowdown::{Filter, LowdownService, Rule};
use scraper::ElementRef;

/// The task list item rule as a named descriptor.
///
/// Matches a checkbox input directly inside a list item and emits the GFM
/// task marker. The marker lands in front of the list item's own text via
/// the engine's normal list item rule.
pub fn task_list_item_rule() -> (&'static str, Rule) {
    (
        "task-list-item",
        Rule::new(
            Filter::predicate(|tag, node, _| {
                tag == "input"
                    && node
                        .value()
                        .attr("type")
                        .map(|t| t.eq_ignore_ascii_case("checkbox"))
                        .unwrap_or(false)
                    && node
                        .parent()
                        .and_then(ElementRef::wrap)
                        .map(|p| p.value().name() == "li")
                        .unwrap_or(false)
            }),
            |node, _, _| {
                if node.value().attr("checked").is_some() {
                    "[x] ".to_string()
                } else {
                    "[ ] ".to_string()
                }
            },
        ),
    )
}

/// Install the task list item rule
pub fn task_list_items(service: &mut LowdownService) {
    let (name, rule) = task_list_item_rule();
    service.add_rule(name, rule);
}
