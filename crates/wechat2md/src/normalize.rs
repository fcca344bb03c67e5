//! Tree normalization: repairs the editor's non-semantic markup in place.
//!
//! The editor expresses emphasis through inline CSS, quotes through a marker
//! class, and scatters layout attributes over every node. Each quirk is one
//! entry in a small rule table mapping a condition to a rewrite, so a new
//! quirk is one more entry.

use once_cell::sync::Lazy;
use regex::Regex;
use wechat2md_render::Node;

use crate::config::ConvertConfig;

static BOLD_WEIGHT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)font-weight\s*:\s*(bold|600|700|800|900)\b").expect("bold pattern is valid")
});

/// Whether an inline style declares a bold font weight
pub fn is_bold_style(style: &str) -> bool {
    BOLD_WEIGHT.is_match(style)
}

/// When a normalization rule fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Inline style declares a bold weight
    BoldStyle,
    /// Element carries the class token
    HasClass(String),
}

impl Condition {
    pub fn matches(&self, node: &Node) -> bool {
        match self {
            Condition::BoldStyle => node.attr("style").is_some_and(is_bold_style),
            Condition::HasClass(class) => node.has_class(class),
        }
    }
}

/// What replaces a matching element. The replacement is a fresh,
/// attribute-free element holding the original children unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rewrite {
    Strong,
    Blockquote,
}

impl Rewrite {
    pub fn tag(self) -> &'static str {
        match self {
            Rewrite::Strong => "strong",
            Rewrite::Blockquote => "blockquote",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeRule {
    pub name: &'static str,
    pub condition: Condition,
    pub rewrite: Rewrite,
}

/// Counts of what a pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub rewritten: usize,
    pub code_blocks: usize,
}

pub struct Normalizer {
    rules: Vec<NormalizeRule>,
    vendor_attributes: Vec<String>,
}

impl Normalizer {
    pub fn new(config: &ConvertConfig) -> Self {
        Self {
            rules: vec![
                NormalizeRule {
                    name: "digestBlockquote",
                    condition: Condition::HasClass(config.digest_class.clone()),
                    rewrite: Rewrite::Blockquote,
                },
                NormalizeRule {
                    name: "cssBold",
                    condition: Condition::BoldStyle,
                    rewrite: Rewrite::Strong,
                },
            ],
            vendor_attributes: config.vendor_attributes.clone(),
        }
    }

    /// The rule table, in priority order. At most one rule fires per element.
    pub fn rules(&self) -> &[NormalizeRule] {
        &self.rules
    }

    /// Normalize the content subtree. The container itself only loses its
    /// vendor attributes; every descendant element is also subject to the
    /// rule table, and `pre` blocks are canonicalized.
    ///
    /// Running this twice leaves the tree as one pass did.
    pub fn normalize(&self, root: &mut Node) -> NormalizeReport {
        let mut report = NormalizeReport::default();
        self.strip(root);
        self.normalize_children(root, &mut report);
        report
    }

    fn normalize_children(&self, node: &mut Node, report: &mut NormalizeReport) {
        for child in node.children_mut().iter_mut() {
            if !child.is_element() {
                continue;
            }

            // Decide before stripping: the style attribute is about to go
            let rewrite = self
                .rules
                .iter()
                .find(|rule| rule.condition.matches(child))
                .map(|rule| rule.rewrite);

            self.strip(child);

            if let Some(rewrite) = rewrite {
                let mut replacement = Node::element(rewrite.tag());
                replacement.children = child.take_children();
                *child = replacement;
                report.rewritten += 1;
            }

            self.normalize_children(child, report);

            if canonicalize_code_block(child) {
                report.code_blocks += 1;
            }
        }
    }

    fn strip(&self, node: &mut Node) {
        for name in &self.vendor_attributes {
            node.remove_attr(name);
        }
    }
}

/// Give a bare `pre` a `code` child holding its content. Class attributes
/// stay where they are, so language inference sees the same tokens.
fn canonicalize_code_block(node: &mut Node) -> bool {
    if !node.is_tag("pre") || node.element_children().any(|c| c.is_tag("code")) {
        return false;
    }

    let mut code = Node::element("code");
    code.children = node.take_children();
    node.add_child(code);
    true
}
