//! # lowdown-gfm
//!
//! GitHub Flavored Markdown rules for the [`lowdown`] conversion engine:
//! tables, strikethrough, task list items and highlighted code blocks.
//!
//! Each rule set ships as an installer function usable with
//! [`LowdownService::use_plugin`](lowdown::LowdownService::use_plugin), plus
//! a pure descriptor form for callers that merge rules into an engine
//! configuration themselves. [`gfm`] applies all four.
//!
//! ```rust
//! use lowdown::LowdownService;
//! use lowdown_gfm::gfm;
//!
//! let mut service = LowdownService::new();
//! service.use_plugin(gfm);
//!
//! let markdown = service.convert("<del>old</del>").unwrap();
//! assert_eq!(markdown, "~old~");
//! ```

mod highlighted_code;
mod strikethrough;
mod tables;
mod task_list;

pub use highlighted_code::{highlighted_code_block, highlighted_code_block_rule};
pub use strikethrough::{strikethrough, strikethrough_rule};
pub use tables::{table_rules, tables};
pub use task_list::{task_list_item_rule, task_list_items};

use lowdown::LowdownService;

/// Install all GFM rule sets
pub fn gfm(service: &mut LowdownService) {
    service
        .use_plugin(highlighted_code_block)
        .use_plugin(strikethrough)
        .use_plugin(tables)
        .use_plugin(task_list_items);
}
