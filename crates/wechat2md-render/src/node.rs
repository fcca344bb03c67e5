//! Owned, mutable DOM tree used by the normalizer and the renderer.
//!
//! Parsers (scraper/html5ever here) convert their output into this structure
//! once; after that every stage works on plain owned data, so in-place
//! rewrites never fight a borrowed parser tree.

use indexmap::IndexMap;

use crate::utilities::{is_meaningful_when_blank, is_void};

/// Node types matching DOM nodeType values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Element node (nodeType = 1)
    Element = 1,
    /// Text node (nodeType = 3)
    Text = 3,
    /// Document fragment node (nodeType = 11)
    DocumentFragment = 11,
}

/// A DOM node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Node type
    pub node_type: NodeType,

    /// Lowercase tag name for elements, `#text` / `#document-fragment` otherwise
    pub node_name: String,

    /// Text content for text nodes
    pub node_value: Option<String>,

    /// Attributes in source order, keyed by lowercase name
    pub attributes: IndexMap<String, String>,

    /// Child nodes
    pub children: Vec<Node>,
}

impl Node {
    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Self {
            node_type: NodeType::Element,
            node_name: tag_name.to_lowercase(),
            node_value: None,
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Create a new element node with attributes
    pub fn element_with_attrs(tag_name: &str, attrs: Vec<(&str, &str)>) -> Self {
        let mut node = Self::element(tag_name);
        for (name, value) in attrs {
            node.set_attr(name, value);
        }
        node
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self {
            node_type: NodeType::Text,
            node_name: "#text".to_string(),
            node_value: Some(content.to_string()),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Create a document fragment node
    pub fn fragment() -> Self {
        Self {
            node_type: NodeType::DocumentFragment,
            node_name: "#document-fragment".to_string(),
            node_value: None,
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Check if this is an element node
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Check if this is a text node
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Tag name (lowercase). Non-elements return their `#` name.
    pub fn tag_name(&self) -> &str {
        &self.node_name
    }

    /// Check whether this is an element with the given tag name
    pub fn is_tag(&self, tag: &str) -> bool {
        self.is_element() && self.node_name.eq_ignore_ascii_case(tag)
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name.to_lowercase().as_str())
            .map(String::as_str)
    }

    /// Check if an attribute exists
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name.to_lowercase().as_str())
    }

    /// Set an attribute, keeping its position if it already exists
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes
            .insert(name.to_lowercase(), value.to_string());
    }

    /// Remove an attribute, returning its previous value
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name.to_lowercase().as_str())
    }

    /// Whitespace-separated class tokens
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    /// Check for a class token
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Get all child nodes
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter()
    }

    /// Mutable access to the child list
    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// Get only element children
    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children().filter(|n| n.is_element())
    }

    /// Add a child node
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Detach and return all children
    pub fn take_children(&mut self) -> Vec<Node> {
        std::mem::take(&mut self.children)
    }

    /// Get all text content from this node and descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        match self.node_type {
            NodeType::Text => out.push_str(self.node_value.as_deref().unwrap_or("")),
            _ => {
                for child in &self.children {
                    child.push_text(out);
                }
            }
        }
    }

    /// First node (self included) matching the predicate, depth-first pre-order
    pub fn find_first<F>(&self, predicate: F) -> Option<&Node>
    where
        F: Fn(&Node) -> bool + Copy,
    {
        if predicate(self) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_first(predicate))
    }

    /// An element with no text and nothing that renders on its own
    /// (images, line breaks, links, tables, ...).
    pub fn is_blank(&self) -> bool {
        if !self.is_element() {
            return self.is_text() && self.text_content().trim().is_empty();
        }
        if is_void(self.tag_name()) || is_meaningful_when_blank(self.tag_name()) {
            return false;
        }
        self.text_content().trim().is_empty()
            && self
                .find_first(|n| {
                    n.is_element()
                        && (is_void(n.tag_name()) || is_meaningful_when_blank(n.tag_name()))
                })
                .is_none()
    }

    /// Reconstruct outer HTML (for keep rules)
    pub fn outer_html(&self) -> String {
        match self.node_type {
            NodeType::Text => escape_html_text(self.node_value.as_deref().unwrap_or("")),
            NodeType::Element => {
                let tag = self.tag_name();
                let attrs = self.attributes_string();
                let open = if attrs.is_empty() {
                    format!("<{}>", tag)
                } else {
                    format!("<{} {}>", tag, attrs)
                };

                if is_void(tag) {
                    open
                } else {
                    format!("{}{}</{}>", open, self.inner_html(), tag)
                }
            }
            NodeType::DocumentFragment => self.inner_html(),
        }
    }

    /// Reconstruct inner HTML
    pub fn inner_html(&self) -> String {
        self.children().map(Node::outer_html).collect()
    }

    /// Get attributes as a string for HTML output
    fn attributes_string(&self) -> String {
        self.attributes
            .iter()
            .map(|(name, value)| {
                if value.is_empty() {
                    name.clone()
                } else {
                    format!("{}=\"{}\"", name, escape_html_attr(value))
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Escape HTML attribute value
fn escape_html_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_html_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// A reference to a node with its parent, so rules can look one level up
/// without the tree storing parent pointers.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    /// The node itself
    pub node: &'a Node,
    parent: Option<&'a Node>,
}

impl<'a> NodeRef<'a> {
    /// Create a new NodeRef without parent context
    pub fn new(node: &'a Node) -> Self {
        Self { node, parent: None }
    }

    /// Create a new NodeRef with its parent
    pub fn with_parent(node: &'a Node, parent: &'a Node) -> Self {
        Self {
            node,
            parent: Some(parent),
        }
    }

    /// The parent node, if known
    pub fn parent(&self) -> Option<&'a Node> {
        self.parent
    }

    /// The parent's tag name, if the parent is an element
    pub fn parent_tag(&self) -> Option<&'a str> {
        self.parent
            .filter(|p| p.is_element())
            .map(|p| p.tag_name())
    }

    /// Position among the parent's element children with the same tag
    pub fn index_in_parent(&self) -> Option<usize> {
        let parent = self.parent?;
        parent
            .element_children()
            .filter(|c| c.tag_name() == self.node.tag_name())
            .position(|c| std::ptr::eq(c, self.node))
    }

    pub fn is_element(&self) -> bool {
        self.node.is_element()
    }

    pub fn tag_name(&self) -> &'a str {
        self.node.tag_name()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.node.attr(name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.node.has_attr(name)
    }

    pub fn element_children(&self) -> impl Iterator<Item = &'a Node> {
        self.node.element_children()
    }

    pub fn text_content(&self) -> String {
        self.node.text_content()
    }

    pub fn outer_html(&self) -> String {
        self.node.outer_html()
    }
}
