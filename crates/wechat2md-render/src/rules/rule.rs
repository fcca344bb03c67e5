//! Rule and Filter types for node conversion.

use crate::node::NodeRef;
use crate::service::RenderOptions;

/// Type alias for replacement functions
pub type ReplacementFn = Box<dyn Fn(&NodeRef, &str, &RenderOptions) -> String + Send + Sync>;

/// Type alias for filter predicates
pub type PredicateFn = Box<dyn Fn(&str, &NodeRef, &RenderOptions) -> bool + Send + Sync>;

/// A filter determines which elements a rule applies to
pub enum Filter {
    /// Match a single tag name
    TagName(String),
    /// Match any of multiple tag names
    TagNames(Vec<String>),
    /// Match using a predicate function
    Predicate(PredicateFn),
}

impl Filter {
    /// Create a filter for a single tag
    pub fn tag(name: &str) -> Self {
        Filter::TagName(name.to_lowercase())
    }

    /// Create a filter for multiple tags
    pub fn tags(names: &[&str]) -> Self {
        Filter::TagNames(names.iter().map(|s| s.to_lowercase()).collect())
    }

    /// Create a filter with a predicate
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str, &NodeRef, &RenderOptions) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Box::new(f))
    }

    /// Check if this filter matches a node
    pub fn matches(&self, node: &NodeRef, options: &RenderOptions) -> bool {
        let tag = node.tag_name();
        match self {
            Filter::TagName(t) => tag == t,
            Filter::TagNames(tags) => tags.iter().any(|t| t == tag),
            Filter::Predicate(f) => f(tag, node, options),
        }
    }
}

/// A rule defines how to convert a matched element to Markdown
pub struct Rule {
    /// Filter to determine which elements this rule applies to
    pub filter: Filter,
    /// Replacement function that generates Markdown from the node and its
    /// already-rendered children
    pub replacement: ReplacementFn,
}

impl Rule {
    /// Create a new rule
    pub fn new<F>(filter: Filter, replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &RenderOptions) -> String + Send + Sync + 'static,
    {
        Self {
            filter,
            replacement: Box::new(replacement),
        }
    }

    /// Create a rule that matches a single tag
    pub fn for_tag<F>(tag: &str, replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &RenderOptions) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::tag(tag), replacement)
    }

    /// Create a rule that matches multiple tags
    pub fn for_tags<F>(tags: &[&str], replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &RenderOptions) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::tags(tags), replacement)
    }

    /// Apply this rule's replacement
    pub fn replace(&self, node: &NodeRef, content: &str, options: &RenderOptions) -> String {
        (self.replacement)(node, content, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    #[test]
    fn test_tag_filters() {
        let options = RenderOptions::default();
        let strong = Node::element("strong");
        let node = NodeRef::new(&strong);

        assert!(Filter::tag("STRONG").matches(&node, &options));
        assert!(Filter::tags(&["b", "strong"]).matches(&node, &options));
        assert!(!Filter::tag("em").matches(&node, &options));
    }

    #[test]
    fn test_predicate_filter_sees_parent() {
        let options = RenderOptions::default();
        let mut pre = Node::element("pre");
        pre.add_child(Node::element("code"));
        let code = NodeRef::with_parent(&pre.children[0], &pre);

        let in_pre = Filter::predicate(|tag, node, _| tag == "code" && node.parent_tag() == Some("pre"));
        assert!(in_pre.matches(&code, &options));
        assert!(!in_pre.matches(&NodeRef::new(&pre.children[0]), &options));
    }

    #[test]
    fn test_rule_replace() {
        let options = RenderOptions::default();
        let hr = Node::element("hr");
        let rule = Rule::for_tag("hr", |_, _, options| options.hr.clone());
        assert_eq!(rule.replace(&NodeRef::new(&hr), "", &options), "* * *");
    }
}
