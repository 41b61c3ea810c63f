//! Strikethrough rule.

use lowdown::{LowdownService, Rule};

/// The strikethrough rule as a named descriptor
pub fn strikethrough_rule() -> (&'static str, Rule) {
    (
        "strikethrough",
        Rule::for_tags(&["del", "s", "strike"], |_, content, _| {
            format!("~{}~", content)
        }),
    )
}

/// Install the strikethrough rule
pub fn strikethrough(service: &mut LowdownService) {
    let (name, rule) = strikethrough_rule();
    service.add_rule(name, rule);
}

#[cfg(test)]
mod tests {
    use super::*;
    use lowdown::LowdownService;

    #[test]
    fn wraps_content_in_tildes() {
        let mut service = LowdownService::new();
        service.use_plugin(strikethrough);
        assert_eq!(service.convert("<del>gone</del>").unwrap(), "~gone~");
        assert_eq!(service.convert("<s>gone</s>").unwrap(), "~gone~");
        assert_eq!(service.convert("<strike>gone</strike>").unwrap(), "~gone~");
    }

    #[test]
    fn inner_markup_converts_first() {
        let mut service = LowdownService::new();
        service.use_plugin(strikethrough);
        assert_eq!(
            service.convert("<del><strong>gone</strong></del>").unwrap(),
            "~**gone**~"
        );
    }
}
