//! Rule system for HTML to Markdown conversion.

mod commonmark;
mod rule;

pub use commonmark::commonmark_rules;
pub use rule::{Filter, ReplacementFn, Rule};

use indexmap::IndexMap;
use scraper::ElementRef;

use crate::service::LowdownOptions;

/// Collection of rules for conversion
pub struct Rules {
    /// Custom rules added by the user (checked first, in insertion order)
    custom_rules: IndexMap<String, Rule>,
    /// Keep filters (preserve matching elements as HTML)
    keep_filters: Vec<Filter>,
    /// Remove filters (drop matching elements entirely)
    remove_filters: Vec<Filter>,
    /// Built-in CommonMark rules
    commonmark_rules: Vec<Rule>,
}

impl Rules {
    /// Create a new Rules instance with CommonMark rules
    pub fn new() -> Self {
        Self {
            custom_rules: IndexMap::new(),
            keep_filters: Vec::new(),
            remove_filters: Vec::new(),
            commonmark_rules: commonmark_rules(),
        }
    }

    /// Add a custom rule. Re-adding under the same key overwrites in place.
    pub fn add(&mut self, key: &str, rule: Rule) {
        self.custom_rules.insert(key.to_string(), rule);
    }

    /// Add a keep filter
    pub fn keep(&mut self, filter: Filter) {
        self.keep_filters.push(filter);
    }

    /// Add a remove filter
    pub fn remove(&mut self, filter: Filter) {
        self.remove_filters.push(filter);
    }

    /// Find the appropriate rule for an element
    pub fn for_element<'a>(
        &'a self,
        element: &ElementRef,
        options: &LowdownOptions,
    ) -> Option<&'a Rule> {
        let tag = element.value().name();

        // Custom rules win over the built-in set
        for rule in self.custom_rules.values() {
            if rule.filter.matches(tag, element, options) {
                return Some(rule);
            }
        }

        for rule in &self.commonmark_rules {
            if rule.filter.matches(tag, element, options) {
                return Some(rule);
            }
        }

        None
    }

    /// Check if an element should be kept as HTML.
    ///
    /// Keep filters are consulted before rule dispatch, so a keep predicate
    /// can claim an element that a rule would otherwise match. Predicates are
    /// expected to be precise about what they preserve.
    pub fn should_keep(&self, element: &ElementRef, options: &LowdownOptions) -> bool {
        let tag = element.value().name();
        self.keep_filters
            .iter()
            .any(|filter| filter.matches(tag, element, options))
    }

    /// Check if an element should be removed
    pub fn should_remove(&self, element: &ElementRef, options: &LowdownOptions) -> bool {
        if self.should_keep(element, options) {
            return false;
        }

        let tag = element.value().name();
        self.remove_filters
            .iter()
            .any(|filter| filter.matches(tag, element, options))
    }

    /// Get the keep replacement for an element: its serialized source markup
    pub fn keep_replacement(&self, element: &ElementRef) -> String {
        element.html()
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new()
    }
}
