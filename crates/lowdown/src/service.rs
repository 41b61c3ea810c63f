//! LowdownService - the main entry point for HTML to Markdown conversion.

use scraper::{ElementRef, Html, Node};

use crate::rules::{Filter, Rule, Rules};
use crate::utilities::{
    collapse_whitespace, escape_markdown, is_block, is_meaningful_when_blank, is_structural,
    is_void,
};
use crate::Result;

/// Heading style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingStyle {
    /// Use setext-style headings (underlined with = or -)
    #[default]
    Setext,
    /// Use ATX-style headings (prefixed with #)
    Atx,
}

/// Code block style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeBlockStyle {
    /// Use indented code blocks (4 spaces)
    #[default]
    Indented,
    /// Use fenced code blocks (```)
    Fenced,
}

/// Link style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStyle {
    /// Use inline links [text](url)
    #[default]
    Inlined,
    /// Use reference links [text][ref]
    Referenced,
}

/// Options for LowdownService
#[derive(Debug, Clone)]
pub struct LowdownOptions {
    /// Heading style (setext or atx)
    pub heading_style: HeadingStyle,

    /// Horizontal rule string
    pub hr: String,

    /// Bullet list marker
    pub bullet_list_marker: char,

    /// Code block style
    pub code_block_style: CodeBlockStyle,

    /// Fence string for fenced code blocks
    pub fence: String,

    /// Emphasis delimiter
    pub em_delimiter: char,

    /// Strong delimiter
    pub strong_delimiter: String,

    /// Link style
    pub link_style: LinkStyle,
}

impl Default for LowdownOptions {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::Setext,
            hr: "* * *".to_string(),
            bullet_list_marker: '*',
            code_block_style: CodeBlockStyle::Indented,
            fence: "```".to_string(),
            em_delimiter: '_',
            strong_delimiter: "**".to_string(),
            link_style: LinkStyle::Inlined,
        }
    }
}

/// The main service for converting HTML to Markdown
pub struct LowdownService {
    options: LowdownOptions,
    rules: Rules,
}

impl LowdownService {
    /// Create a new LowdownService with default options
    pub fn new() -> Self {
        Self {
            options: LowdownOptions::default(),
            rules: Rules::new(),
        }
    }

    /// Create a LowdownService with custom options
    pub fn with_options(options: LowdownOptions) -> Self {
        Self {
            options,
            rules: Rules::new(),
        }
    }

    /// Convert HTML to Markdown
    pub fn convert(&self, html: &str) -> Result<String> {
        let document = Html::parse_fragment(html);

        let result = self.process_children(document.root_element());

        Ok(self.post_process(&result))
    }

    /// Add a custom rule. Registering twice under the same name overwrites.
    pub fn add_rule(&mut self, name: &str, rule: Rule) -> &mut Self {
        self.rules.add(name, rule);
        self
    }

    /// Keep elements matching the filter as verbatim HTML.
    ///
    /// Keep filters are consulted before rule dispatch; a kept element's
    /// subtree is not converted at all.
    pub fn keep(&mut self, filter: Filter) -> &mut Self {
        self.rules.keep(filter);
        self
    }

    /// Remove elements matching the filter entirely
    pub fn remove(&mut self, filter: Filter) -> &mut Self {
        self.rules.remove(filter);
        self
    }

    /// Apply a plugin
    pub fn use_plugin<F>(&mut self, plugin: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        plugin(self);
        self
    }

    /// Escape markdown special characters in a string
    pub fn escape(&self, text: &str) -> String {
        escape_markdown(text)
    }

    /// Get the current options
    pub fn options(&self) -> &LowdownOptions {
        &self.options
    }

    /// Get mutable access to options
    pub fn options_mut(&mut self) -> &mut LowdownOptions {
        &mut self.options
    }

    /// Process children of an element
    fn process_children(&self, element: ElementRef) -> String {
        let parent_tag = element.value().name();
        let mut result = String::new();

        for child in element.children() {
            match child.value() {
                Node::Text(text) => {
                    // Whitespace between rows, sections and list items is
                    // formatting, not content
                    if is_structural(parent_tag) && text.text.trim().is_empty() {
                        continue;
                    }
                    let collapsed = collapse_whitespace(&text.text);
                    result.push_str(&escape_markdown(&collapsed));
                }
                Node::Element(_) => {
                    if let Some(child_element) = ElementRef::wrap(child) {
                        result.push_str(&self.process_element(child_element));
                    }
                }
                _ => {}
            }
        }

        result
    }

    /// Process a single element
    fn process_element(&self, element: ElementRef) -> String {
        if self.rules.should_remove(&element, &self.options) {
            return String::new();
        }

        if self.rules.should_keep(&element, &self.options) {
            return self.rules.keep_replacement(&element);
        }

        if is_blank(&element) {
            return if is_block(element.value().name()) {
                "\n\n".to_string()
            } else {
                String::new()
            };
        }

        // Children are converted before their parent sees them
        let content = self.process_children(element);

        if let Some(rule) = self.rules.for_element(&element, &self.options) {
            return rule.replace(&element, &content, &self.options);
        }

        content
    }

    /// Post-process the result
    fn post_process(&self, output: &str) -> String {
        // Trim only leading/trailing newlines, not all whitespace
        // (indentation of code blocks must survive)
        let result = output.trim_matches('\n');

        // Replace multiple consecutive newlines with max 2
        let mut newline_count = 0;
        let mut processed = String::with_capacity(result.len());

        for c in result.chars() {
            if c == '\n' {
                newline_count += 1;
                if newline_count <= 2 {
                    processed.push(c);
                }
            } else {
                newline_count = 0;
                processed.push(c);
            }
        }

        processed
    }
}

impl Default for LowdownService {
    fn default() -> Self {
        Self::new()
    }
}

/// An element is blank when nothing about it would survive conversion:
/// not void, not meaningful-when-blank, whitespace-only text and no void or
/// meaningful descendants.
fn is_blank(element: &ElementRef) -> bool {
    let tag = element.value().name();
    !is_void(tag)
        && !is_meaningful_when_blank(tag)
        && element.text().all(|t| t.trim().is_empty())
        && !element
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .any(|e| {
                is_void(e.value().name()) || is_meaningful_when_blank(e.value().name())
            })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_paragraph() {
        let service = LowdownService::new();
        let result = service.convert("<p>Hello World</p>").unwrap();
        assert_eq!(result, "Hello World");
    }

    #[test]
    fn test_heading_setext() {
        let service = LowdownService::new();
        let result = service.convert("<h1>Title</h1>").unwrap();
        assert!(result.contains("Title"));
        assert!(result.contains("="));
    }

    #[test]
    fn test_heading_atx() {
        let options = LowdownOptions {
            heading_style: HeadingStyle::Atx,
            ..Default::default()
        };
        let service = LowdownService::with_options(options);
        let result = service.convert("<h1>Title</h1>").unwrap();
        assert!(result.contains("# Title"));
    }

    #[test]
    fn test_emphasis() {
        let service = LowdownService::new();
        let result = service.convert("<em>emphasized</em>").unwrap();
        assert_eq!(result, "_emphasized_");
    }

    #[test]
    fn test_strong() {
        let service = LowdownService::new();
        let result = service.convert("<strong>bold</strong>").unwrap();
        assert_eq!(result, "**bold**");
    }

    #[test]
    fn test_inline_link() {
        let service = LowdownService::new();
        let result = service
            .convert(r#"<a href="https://example.com">Link</a>"#)
            .unwrap();
        assert_eq!(result, "[Link](https://example.com)");
    }

    #[test]
    fn test_image() {
        let service = LowdownService::new();
        let result = service.convert(r#"<img src="test.png" alt="Alt">"#).unwrap();
        assert_eq!(result, "![Alt](test.png)");
    }

    #[test]
    fn test_inline_code() {
        let service = LowdownService::new();
        let result = service.convert("<code>code</code>").unwrap();
        assert_eq!(result, "`code`");
    }

    #[test]
    fn test_horizontal_rule() {
        let service = LowdownService::new();
        let result = service.convert("<hr>").unwrap();
        assert!(result.contains("* * *"));
    }

    #[test]
    fn test_blockquote() {
        let service = LowdownService::new();
        let result = service
            .convert("<blockquote><p>Quote</p></blockquote>")
            .unwrap();
        assert!(result.contains(">"));
    }

    #[test]
    fn test_indented_code_block() {
        let service = LowdownService::new();
        let result = service
            .convert("<pre><code>function() {}</code></pre>")
            .unwrap();
        assert_eq!(result, "    function() {}");
    }

    #[test]
    fn test_ordered_list() {
        let service = LowdownService::new();
        let result = service.convert("<ol><li>One</li><li>Two</li></ol>").unwrap();
        assert!(result.contains("1.  One"));
        assert!(result.contains("2.  Two"));
    }

    #[test]
    fn test_remove_filter() {
        let mut service = LowdownService::new();
        service.remove(Filter::tag("script"));
        let result = service
            .convert("<p>Hi<script>alert(1)</script></p>")
            .unwrap();
        assert_eq!(result, "Hi");
    }

    #[test]
    fn test_keep_filter() {
        let mut service = LowdownService::new();
        service.keep(Filter::tag("video"));
        let result = service
            .convert(r#"<video src="clip.mp4"></video>"#)
            .unwrap();
        assert_eq!(result, r#"<video src="clip.mp4"></video>"#);
    }

    #[test]
    fn test_blank_element() {
        let service = LowdownService::new();
        let result = service.convert("<p>before</p><p> </p><p>after</p>").unwrap();
        assert!(result.contains("before"));
        assert!(result.contains("after"));
    }
}
