//! # lowdown
//!
//! Convert HTML to Markdown through a pluggable rule engine.
//!
//! The engine walks an HTML fragment bottom-up (children are converted
//! before their parents), dispatching each element to the first matching
//! [`Rule`]. Rules pair a [`Filter`] (tag names or a predicate) with a
//! replacement function that receives the element and its already-converted
//! content. Custom rules registered with [`LowdownService::add_rule`] take
//! precedence over the built-in CommonMark set; elements matched by a
//! [`LowdownService::keep`] filter are passed through as verbatim HTML.
//!
//! ## Example
//!
//! ```rust
//! use lowdown::LowdownService;
//!
//! let service = LowdownService::new();
//! let markdown = service.convert("<h1>Hello World</h1>").unwrap();
//! assert!(markdown.contains("Hello World"));
//! ```
//!
//! Plugins are plain functions over the service:
//!
//! ```rust
//! use lowdown::{LowdownService, Rule};
//!
//! let mut service = LowdownService::new();
//! service.use_plugin(|s: &mut LowdownService| {
//!     s.add_rule("mark", Rule::for_tag("mark", |_, content, _| {
//!         format!("=={}==", content)
//!     }));
//! });
//! ```

mod rules;
mod service;
mod utilities;

pub use rules::{commonmark_rules, Filter, ReplacementFn, Rule, Rules};
pub use service::{CodeBlockStyle, HeadingStyle, LinkStyle, LowdownOptions, LowdownService};
pub use utilities::*;

/// Error type for conversion operations
#[derive(Debug, thiserror::Error)]
pub enum LowdownError {
    #[error("conversion error: {0}")]
    Conversion(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, LowdownError>;
