//! HTML parsing support.
//!
//! Converts scraper (html5ever) trees into the owned [`Node`] structure.

use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::node::Node;

/// Parse an HTML fragment into a Node tree.
///
/// The returned root is the fragment's synthetic `html` element.
///
/// # Example
///
/// ```rust
/// use wechat2md_render::{parse_html, Renderer};
///
/// let node = parse_html("<h1>Hello <em>World</em></h1>");
/// let markdown = Renderer::new().render(&node);
/// assert!(markdown.contains("_World_"));
/// ```
pub fn parse_html(html: &str) -> Node {
    let document = Html::parse_fragment(html);
    from_element(document.root_element())
}

/// Convert a scraper element and its descendants to an owned Node.
///
/// Comments, doctypes and processing instructions are dropped.
pub fn from_element(element: ElementRef) -> Node {
    let mut node = Node::element(element.value().name());
    for (name, value) in element.value().attrs() {
        node.set_attr(name, value);
    }

    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => {
                node.add_child(Node::text(&text.text));
            }
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    node.add_child(from_element(child_element));
                }
            }
            _ => {}
        }
    }

    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Renderer;

    #[test]
    fn test_parse_simple_html() {
        let node = parse_html("<p>Hello World</p>");
        assert!(node.is_element());
        assert_eq!(node.tag_name(), "html");
        assert_eq!(node.element_children().next().unwrap().tag_name(), "p");
    }

    #[test]
    fn test_parse_keeps_attributes_in_order() {
        let node = parse_html(r#"<img data-src="a.png" src="b.png" style="width:1px">"#);
        let img = node.find_first(|n| n.is_tag("img")).unwrap();
        let names: Vec<&str> = img.attributes.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["data-src", "src", "style"]);
    }

    #[test]
    fn test_parse_drops_comments() {
        let node = parse_html("<p>a<!-- hidden -->b</p>");
        assert_eq!(node.text_content(), "ab");
    }

    #[test]
    fn test_render_parsed_html() {
        let renderer = Renderer::new();
        let result = renderer.render(&parse_html("<p>Hello <strong>World</strong></p>"));
        assert_eq!(result, "Hello **World**");
    }
}
