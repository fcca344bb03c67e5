//! Renderer - the entry point for Node to Markdown conversion.

use crate::node::{Node, NodeRef, NodeType};
use crate::rules::{Filter, Rule, Rules};
use crate::utilities::{collapse_whitespace, escape_markdown, is_block};

/// Heading style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingStyle {
    /// Use setext-style headings (underlined with = or -)
    /// Only works for h1 and h2, falls back to ATX for h3-h6
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

/// Options for the Renderer
#[derive(Debug, Clone)]
pub struct RenderOptions {
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
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::Setext,
            hr: "* * *".to_string(),
            bullet_list_marker: '*',
            code_block_style: CodeBlockStyle::Indented,
            fence: "```".to_string(),
            em_delimiter: '_',
            strong_delimiter: "**".to_string(),
        }
    }
}

/// Converts a [`Node`] tree to Markdown.
///
/// Children are rendered first; the first rule whose filter matches the
/// element then turns the rendered children into the element's Markdown.
/// Custom rules are consulted before the CommonMark set, in the order they
/// were added.
pub struct Renderer {
    options: RenderOptions,
    rules: Rules,
}

impl Renderer {
    /// Create a new Renderer with default options
    pub fn new() -> Self {
        Self::with_options(RenderOptions::default())
    }

    /// Create a Renderer with custom options
    pub fn with_options(options: RenderOptions) -> Self {
        Self {
            options,
            rules: Rules::new(),
        }
    }

    /// Render a node tree to Markdown. An element root is rendered itself,
    /// other roots contribute only their children.
    pub fn render(&self, root: &Node) -> String {
        let output = if root.is_element() {
            self.process_element(NodeRef::new(root))
        } else {
            self.process_children(root)
        };

        post_process(&output)
    }

    /// Add a custom rule
    pub fn add_rule(&mut self, key: &str, rule: Rule) -> &mut Self {
        self.rules.add(key, rule);
        self
    }

    /// Keep elements matching the filter as HTML
    pub fn keep(&mut self, filter: Filter) -> &mut Self {
        self.rules.keep(filter);
        self
    }

    /// Remove elements matching the filter
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

    /// The installed rules
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Get the current options
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Get mutable access to options
    pub fn options_mut(&mut self) -> &mut RenderOptions {
        &mut self.options
    }

    fn process_children(&self, parent: &Node) -> String {
        let mut output = String::new();

        for (index, child) in parent.children.iter().enumerate() {
            let replacement = match child.node_type {
                NodeType::Text => self.process_text(parent, index),
                NodeType::Element => self.process_element(NodeRef::with_parent(child, parent)),
                NodeType::DocumentFragment => self.process_children(child),
            };
            join(&mut output, &replacement);
        }

        output
    }

    /// Whitespace is collapsed and trimmed where it touches a block boundary
    fn process_text(&self, parent: &Node, index: usize) -> String {
        let raw = parent.children[index].node_value.as_deref().unwrap_or("");
        let collapsed = collapse_whitespace(raw);

        let touches_block = |sibling: Option<&Node>| match sibling {
            None => is_block(parent.tag_name()),
            Some(node) => node.is_element() && is_block(node.tag_name()),
        };
        let prev_block = touches_block(index.checked_sub(1).map(|i| &parent.children[i]));
        let next_block = touches_block(parent.children.get(index + 1));

        let mut text = collapsed.as_str();
        if prev_block {
            text = text.trim_start();
        }
        if next_block {
            text = text.trim_end();
        }

        self.escape(text)
    }

    fn process_element(&self, node: NodeRef) -> String {
        let tag = node.tag_name();

        if node.node.is_blank() {
            return if is_block(tag) { "\n\n".to_string() } else { String::new() };
        }

        let content = self.process_children(node.node);

        if let Some(rule) = self.rules.for_node(&node, &self.options) {
            return rule.replace(&node, &content, &self.options);
        }

        if self.rules.should_keep(&node, &self.options) {
            return self.rules.keep_replacement(&node);
        }

        if self.rules.should_remove(&node, &self.options) {
            return String::new();
        }

        if is_block(tag) {
            format!("\n\n{}\n\n", content)
        } else {
            content
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Append a replacement, merging the newlines at the seam so that at most
/// one blank line separates two blocks.
fn join(output: &mut String, replacement: &str) {
    let trailing = output.len() - output.trim_end_matches('\n').len();
    let body = replacement.trim_start_matches('\n');
    let leading = replacement.len() - body.len();

    output.truncate(output.len() - trailing);
    output.push_str(&"\n".repeat(trailing.max(leading).min(2)));
    output.push_str(body);
}

/// Empty whitespace-only lines, allow at most one blank line in a row and
/// trim surrounding newlines. Lines inside a fenced code block are kept
/// verbatim.
fn post_process(output: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut fence: Option<(char, usize)> = None;

    for line in output.split('\n') {
        if let Some((marker, len)) = fence {
            if closes_fence(line, marker, len) {
                fence = None;
            }
            lines.push(line);
            continue;
        }

        if let Some(open) = opens_fence(line) {
            fence = Some(open);
            lines.push(line);
        } else if line.trim().is_empty() {
            if lines.last().is_some_and(|last| !last.is_empty()) {
                lines.push("");
            }
        } else {
            lines.push(line);
        }
    }

    lines.join("\n").trim_matches('\n').to_string()
}

/// Marker character and run length of a fence opening line
fn opens_fence(line: &str) -> Option<(char, usize)> {
    let trimmed = line.trim_start();
    let marker = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = trimmed.chars().take_while(|c| *c == marker).count();
    (len >= 3).then_some((marker, len))
}

fn closes_fence(line: &str, marker: char, len: usize) -> bool {
    let trimmed = line.trim();
    trimmed.chars().count() >= len && trimmed.chars().all(|c| c == marker)
}
