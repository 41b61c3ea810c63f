//! Highlighted code block rule.

use lowdown::{Filter, LowdownService, Rule};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;

/// GitHub-style highlight container class, capturing the language tag
static HIGHLIGHT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"highlight-(?:text|source)-([a-z0-9]+)").unwrap());

fn first_element_child(element: ElementRef) -> Option<ElementRef> {
    element.children().find_map(ElementRef::wrap)
}

/// The highlighted code block rule as a named descriptor.
///
/// Matches a div whose class carries a `highlight-text-LANG` or
/// `highlight-source-LANG` marker and whose first child is a pre block. The
/// converted content is discarded; the pre's raw text goes into the fence
/// unescaped, because code must not be Markdown-escaped.
pub fn highlighted_code_block_rule() -> (&'static str, Rule) {
    (
        "highlighted-code-block",
        Rule::new(
            Filter::predicate(|tag, node, _| {
                tag == "div"
                    && node
                        .value()
                        .attr("class")
                        .map(|c| HIGHLIGHT_PATTERN.is_match(c))
                        .unwrap_or(false)
                    && first_element_child(*node)
                        .map(|c| c.value().name() == "pre")
                        .unwrap_or(false)
            }),
            |node, _, options| {
                let class = node.value().attr("class").unwrap_or("");
                let language = HIGHLIGHT_PATTERN
                    .captures(class)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str())
                    .unwrap_or("");

                let code: String = first_element_child(*node)
                    .map(|pre| pre.text().collect())
                    .unwrap_or_default();

                format!(
                    "\n\n{}{}\n{}\n{}\n\n",
                    options.fence, language, code, options.fence
                )
            },
        ),
    )
}

/// Install the highlighted code block rule
pub fn highlighted_code_block(service: &mut LowdownService) {
    let (name, rule) = highlighted_code_block_rule();
    service.add_rule(name, rule);
}

#[cfg(test)]
mod tests {
    use super::*;
    use lowdown::LowdownService;

    #[test]
    fn fences_raw_source_text() {
        let mut service = LowdownService::new();
        service.use_plugin(highlighted_code_block);
        let result = service
            .convert(r#"<div class="highlight highlight-source-js"><pre>let x = 1;</pre></div>"#)
            .unwrap();
        assert_eq!(result, "```js\nlet x = 1;\n```");
    }

    #[test]
    fn text_variant_and_unescaped_content() {
        let mut service = LowdownService::new();
        service.use_plugin(highlighted_code_block);
        let result = service
            .convert(r#"<div class="highlight-text-html"><pre>*not emphasis*</pre></div>"#)
            .unwrap();
        assert_eq!(result, "```html\n*not emphasis*\n```");
    }

    #[test]
    fn language_tag_from_capture_group() {
        assert_eq!(
            HIGHLIGHT_PATTERN
                .captures("highlight highlight-source-rust")
                .and_then(|c| c.get(1))
                .map(|m| m.as_str()),
            Some("rust")
        );
        assert!(HIGHLIGHT_PATTERN.captures("plain-old-div").is_none());
    }

    #[test]
    fn div_without_pre_is_not_matched() {
        let mut service = LowdownService::new();
        service.use_plugin(highlighted_code_block);
        let result = service
            .convert(r#"<div class="highlight-source-js"><p>prose</p></div>"#)
            .unwrap();
        assert!(!result.contains("```"));
    }
}
