//! Rule system for node to Markdown conversion.

mod commonmark;
mod rule;

pub use commonmark::commonmark_rules;
pub use rule::{Filter, PredicateFn, ReplacementFn, Rule};

use indexmap::IndexMap;

use crate::node::NodeRef;
use crate::service::RenderOptions;

/// Collection of rules for conversion
pub struct Rules {
    /// Custom rules added by the user (checked first, in insertion order)
    custom_rules: IndexMap<String, Rule>,
    /// Keep rules (preserve as HTML)
    keep_rules: Vec<Filter>,
    /// Remove rules (remove entirely)
    remove_rules: Vec<Filter>,
    /// Built-in CommonMark rules
    commonmark_rules: Vec<Rule>,
}

impl Rules {
    /// Create a new Rules instance with CommonMark rules
    pub fn new() -> Self {
        Self {
            custom_rules: IndexMap::new(),
            keep_rules: Vec::new(),
            remove_rules: Vec::new(),
            commonmark_rules: commonmark_rules(),
        }
    }

    /// Add a custom rule. Re-adding a key replaces the rule in place.
    pub fn add(&mut self, key: &str, rule: Rule) {
        self.custom_rules.insert(key.to_string(), rule);
    }

    /// Add a keep filter
    pub fn keep(&mut self, filter: Filter) {
        self.keep_rules.push(filter);
    }

    /// Add a remove filter
    pub fn remove(&mut self, filter: Filter) {
        self.remove_rules.push(filter);
    }

    /// Names of the custom rules, in priority order
    pub fn custom_keys(&self) -> impl Iterator<Item = &str> {
        self.custom_rules.keys().map(String::as_str)
    }

    /// Find the first matching conversion rule: custom rules, then CommonMark
    pub fn for_node<'a>(&'a self, node: &NodeRef, options: &RenderOptions) -> Option<&'a Rule> {
        self.custom_rules
            .values()
            .chain(self.commonmark_rules.iter())
            .find(|rule| rule.filter.matches(node, options))
    }

    /// Check if a node should be kept as HTML
    pub fn should_keep(&self, node: &NodeRef, options: &RenderOptions) -> bool {
        self.for_node(node, options).is_none()
            && self.keep_rules.iter().any(|f| f.matches(node, options))
    }

    /// Check if a node should be removed
    pub fn should_remove(&self, node: &NodeRef, options: &RenderOptions) -> bool {
        self.for_node(node, options).is_none()
            && !self.keep_rules.iter().any(|f| f.matches(node, options))
            && self.remove_rules.iter().any(|f| f.matches(node, options))
    }

    /// Get the keep replacement for a node
    pub fn keep_replacement(&self, node: &NodeRef) -> String {
        node.outer_html()
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    #[test]
    fn test_custom_rules_win_over_commonmark() {
        let options = RenderOptions::default();
        let mut rules = Rules::new();
        rules.add("shout", Rule::for_tag("strong", |_, c, _| c.to_uppercase()));

        let strong = Node::element("strong");
        let node = NodeRef::new(&strong);
        let rule = rules.for_node(&node, &options).unwrap();
        assert_eq!(rule.replace(&node, "hi", &options), "HI");
    }

    #[test]
    fn test_custom_rules_keep_insertion_order() {
        let mut rules = Rules::new();
        rules.add("first", Rule::for_tag("pre", |_, _, _| "1".into()));
        rules.add("second", Rule::for_tag("pre", |_, _, _| "2".into()));
        rules.add("first", Rule::for_tag("pre", |_, _, _| "one".into()));

        assert_eq!(rules.custom_keys().collect::<Vec<_>>(), vec!["first", "second"]);

        let options = RenderOptions::default();
        let pre = Node::element("pre");
        let node = NodeRef::new(&pre);
        let rule = rules.for_node(&node, &options).unwrap();
        assert_eq!(rule.replace(&node, "", &options), "one");
    }

    #[test]
    fn test_keep_and_remove() {
        let options = RenderOptions::default();
        let mut rules = Rules::new();
        rules.keep(Filter::tag("iframe"));
        rules.remove(Filter::tags(&["iframe", "script"]));

        let iframe = Node::element("iframe");
        let script = Node::element("script");
        assert!(rules.should_keep(&NodeRef::new(&iframe), &options));
        assert!(!rules.should_remove(&NodeRef::new(&iframe), &options));
        assert!(rules.should_remove(&NodeRef::new(&script), &options));
    }
}
