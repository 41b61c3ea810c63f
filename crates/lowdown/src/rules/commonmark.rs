//! CommonMark rules for HTML to Markdown conversion.

use scraper::ElementRef;

use super::{Filter, Rule};
use crate::service::{CodeBlockStyle, HeadingStyle, LinkStyle};
use crate::utilities::{clean_attribute, repeat};

/// Create all CommonMark rules
pub fn commonmark_rules() -> Vec<Rule> {
    vec![
        paragraph_rule(),
        line_break_rule(),
        heading_rule(),
        blockquote_rule(),
        list_rule(),
        list_item_rule(),
        indented_code_block_rule(),
        fenced_code_block_rule(),
        horizontal_rule(),
        inline_link_rule(),
        reference_link_rule(),
        emphasis_rule(),
        strong_rule(),
        code_rule(),
        image_rule(),
    ]
}

fn parent_element<'a>(element: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.parent().and_then(ElementRef::wrap)
}

fn element_children<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

fn paragraph_rule() -> Rule {
    Rule::for_tag("p", |_, content, _| format!("\n\n{}\n\n", content.trim()))
}

fn line_break_rule() -> Rule {
    Rule::for_tag("br", |_, _, _| "  \n".to_string())
}

fn heading_rule() -> Rule {
    Rule::new(
        Filter::tags(&["h1", "h2", "h3", "h4", "h5", "h6"]),
        |node, content, options| {
            let tag = node.value().name();
            let level: usize = tag[1..].parse().unwrap_or(1);

            let content = content.trim();
            if content.is_empty() {
                return String::new();
            }

            match options.heading_style {
                HeadingStyle::Setext if level <= 2 => {
                    let underline = if level == 1 { "=" } else { "-" };
                    format!("\n\n{}\n{}\n\n", content, repeat(underline, content.len()))
                }
                _ => {
                    format!("\n\n{} {}\n\n", repeat("#", level), content)
                }
            }
        },
    )
}

fn blockquote_rule() -> Rule {
    Rule::for_tag("blockquote", |_, content, _| {
        let content = content.trim();
        if content.is_empty() {
            return String::new();
        }
        let quoted: Vec<String> = content.lines().map(|line| format!("> {}", line)).collect();
        format!("\n\n{}\n\n", quoted.join("\n"))
    })
}

fn list_rule() -> Rule {
    Rule::new(Filter::tags(&["ul", "ol"]), |node, content, _| {
        let content = content.trim();

        let is_nested = parent_element(node)
            .map(|p| p.value().name() == "li")
            .unwrap_or(false);

        if is_nested {
            // Nested lists don't get surrounding blank lines
            format!("\n{}", content)
        } else {
            format!("\n\n{}\n\n", content)
        }
    })
}

fn list_item_rule() -> Rule {
    Rule::for_tag("li", |node, content, options| {
        let content = content
            .trim()
            .replace("\n\n\n", "\n\n")
            .replace('\n', "\n    "); // Indent continuation lines

        let parent = parent_element(node);
        let is_ordered = parent
            .map(|p| p.value().name() == "ol")
            .unwrap_or(false);

        let prefix = if is_ordered {
            let start: usize = parent
                .and_then(|p| p.value().attr("start"))
                .and_then(|s| s.parse().ok())
                .unwrap_or(1);
            let position = node
                .prev_siblings()
                .filter_map(ElementRef::wrap)
                .filter(|e| e.value().name() == "li")
                .count();
            format!("{}.  ", start + position)
        } else {
            format!("{}   ", options.bullet_list_marker)
        };

        format!("{}{}\n", prefix, content)
    })
}

fn code_child<'a>(element: ElementRef<'a>) -> Option<ElementRef<'a>> {
    element_children(element).find(|c| c.value().name() == "code")
}

fn indented_code_block_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, options| {
            tag == "pre"
                && code_child(*node).is_some()
                && matches!(options.code_block_style, CodeBlockStyle::Indented)
        }),
        |node, _, _| {
            let code_content: String = code_child(*node)
                .map(|c| c.text().collect())
                .unwrap_or_default();

            let indented: Vec<String> = code_content
                .lines()
                .map(|line| format!("    {}", line))
                .collect();

            format!("\n\n{}\n\n", indented.join("\n"))
        },
    )
}

fn fenced_code_block_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, options| {
            tag == "pre"
                && code_child(*node).is_some()
                && matches!(options.code_block_style, CodeBlockStyle::Fenced)
        }),
        |node, _, options| {
            let code_node = match code_child(*node) {
                Some(c) => c,
                None => return String::new(),
            };

            let code_content: String = code_node.text().collect();

            // Extract language from class="language-xyz"
            let class = code_node.value().attr("class").unwrap_or("");
            let language = class
                .split_whitespace()
                .find(|c| c.starts_with("language-"))
                .map(|c| &c[9..])
                .unwrap_or("");

            let fence = &options.fence;
            format!(
                "\n\n{}{}\n{}\n{}\n\n",
                fence,
                language,
                code_content.trim_end(),
                fence
            )
        },
    )
}

fn horizontal_rule() -> Rule {
    Rule::for_tag("hr", |_, _, options| format!("\n\n{}\n\n", options.hr))
}

fn inline_link_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, options| {
            tag == "a"
                && node.value().attr("href").is_some()
                && matches!(options.link_style, LinkStyle::Inlined)
        }),
        |node, content, _| {
            let href = clean_attribute(node.value().attr("href"));
            let title = node.value().attr("title");

            if href.is_empty() && title.is_none() {
                return content.to_string();
            }

            let title_part = title.map(|t| format!(" \"{}\"", t)).unwrap_or_default();

            format!("[{}]({}{})", content, href, title_part)
        },
    )
}

fn reference_link_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, options| {
            tag == "a"
                && node.value().attr("href").is_some()
                && matches!(options.link_style, LinkStyle::Referenced)
        }),
        |node, content, _| {
            let href = clean_attribute(node.value().attr("href"));
            let title = node.value().attr("title");

            if href.is_empty() {
                return content.to_string();
            }

            let title_part = title.map(|t| format!(" \"{}\"", t)).unwrap_or_default();

            // Reference collection needs document-wide state; emit inline
            format!("[{}]({}{})", content, href, title_part)
        },
    )
}

fn emphasis_rule() -> Rule {
    Rule::new(Filter::tags(&["em", "i"]), |_, content, options| {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return String::new();
        }
        let delimiter = options.em_delimiter;
        format!("{}{}{}", delimiter, content, delimiter)
    })
}

fn strong_rule() -> Rule {
    Rule::new(Filter::tags(&["strong", "b"]), |_, content, options| {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return String::new();
        }
        let delimiter = &options.strong_delimiter;
        format!("{}{}{}", delimiter, content, delimiter)
    })
}

fn code_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, _| {
            // Match <code> that is NOT inside <pre>
            tag == "code"
                && parent_element(node)
                    .map(|p| p.value().name() != "pre")
                    .unwrap_or(true)
        }),
        |node, _, _| {
            let content: String = node.text().collect();
            if content.is_empty() {
                return String::new();
            }

            // Fence with one more backtick than the longest run inside
            let max_consecutive_backticks = content
                .chars()
                .fold((0, 0), |(max, current), c| {
                    if c == '`' {
                        (max.max(current + 1), current + 1)
                    } else {
                        (max, 0)
                    }
                })
                .0;

            let backticks = "`".repeat((max_consecutive_backticks + 1).max(1));

            let needs_space = content.starts_with('`')
                || content.ends_with('`')
                || content.starts_with(' ')
                || content.ends_with(' ');

            if needs_space && max_consecutive_backticks > 0 {
                format!("{} {} {}", backticks, content, backticks)
            } else {
                format!("{}{}{}", backticks, content, backticks)
            }
        },
    )
}

fn image_rule() -> Rule {
    Rule::for_tag("img", |node, _, _| {
        let alt = clean_attribute(node.value().attr("alt"));
        let src = clean_attribute(node.value().attr("src"));
        let title = node.value().attr("title");

        if src.is_empty() {
            return String::new();
        }

        let title_part = title.map(|t| format!(" \"{}\"", t)).unwrap_or_default();

        format!("![{}]({}{})", alt, src, title_part)
    })
}
