//! Document loading: raw page bytes to a queryable tree.
//!
//! The parsed page stays a scraper [`Html`] for read-only lookups (metadata).
//! The content container is copied out as an owned [`Node`] tree, which the
//! later stages mutate in place.

use scraper::{Html, Selector};
use wechat2md_render::{from_element, Node};

use crate::config::Selectors;
use crate::error::{ConvertError, Result};

/// A parsed article page
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse raw page bytes.
    ///
    /// html5ever recovers from any malformed markup, so the only inputs
    /// refused here are ones that are not HTML at all: bytes that are not
    /// UTF-8, binary content, or text without a single tag.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let source = std::str::from_utf8(bytes).map_err(|e| ConvertError::Parse {
            reason: format!("input is not valid UTF-8 ({e})"),
        })?;
        Self::parse_str(source)
    }

    /// Parse page text
    pub fn parse_str(source: &str) -> Result<Self> {
        if source.contains('\0') {
            return Err(ConvertError::Parse {
                reason: "input contains NUL bytes".to_string(),
            });
        }
        if !source.contains('<') {
            return Err(ConvertError::Parse {
                reason: "input contains no markup".to_string(),
            });
        }

        Ok(Self {
            html: Html::parse_document(source),
        })
    }

    /// Trimmed text of the first element matching `selector`; `None` when
    /// there is no such element or it holds only whitespace
    pub fn select_text(&self, selector: &Selector) -> Option<String> {
        let element = self.html.select(selector).next()?;
        let text = element.text().collect::<String>();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    /// Owned copy of the first element matching `selector`
    pub fn content_node(&self, selector: &Selector) -> Option<Node> {
        self.html.select(selector).next().map(from_element)
    }
}

/// [`Selectors`] compiled once per converter
#[derive(Debug)]
pub struct PageSelectors {
    pub title: Selector,
    pub author: Selector,
    pub publish_time: Selector,
    pub content: Selector,
}

impl PageSelectors {
    pub fn compile(selectors: &Selectors) -> Result<Self> {
        Ok(Self {
            title: compile(&selectors.title)?,
            author: compile(&selectors.author)?,
            publish_time: compile(&selectors.publish_time)?,
            content: compile(&selectors.content)?,
        })
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ConvertError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selectors() -> PageSelectors {
        PageSelectors::compile(&Selectors::default()).unwrap()
    }

    #[test]
    fn test_rejects_non_utf8() {
        let err = Document::parse(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]).err().unwrap();
        assert!(matches!(err, ConvertError::Parse { .. }));
    }

    #[test]
    fn test_rejects_binary_and_markupless_input() {
        assert!(Document::parse(b"<p>\0\0\0</p>").is_err());
        assert!(Document::parse(b"just some words").is_err());
        assert!(Document::parse(b"").is_err());
    }

    #[test]
    fn test_accepts_broken_markup() {
        assert!(Document::parse(b"<div><p>unclosed <b>tags").is_ok());
    }

    #[test]
    fn test_select_text_trims_and_skips_empty() {
        let doc = Document::parse_str(
            r#"<h1 id="activity-name">
                 Title here
               </h1><span id="js_name">   </span>"#,
        )
        .unwrap();
        let s = selectors();
        assert_eq!(doc.select_text(&s.title), Some("Title here".to_string()));
        assert_eq!(doc.select_text(&s.author), None);
        assert_eq!(doc.select_text(&s.publish_time), None);
    }

    #[test]
    fn test_content_node_is_owned_copy() {
        let doc = Document::parse_str(r#"<div id="js_content"><p>Body</p></div>"#).unwrap();
        let node = doc.content_node(&selectors().content).unwrap();
        assert_eq!(node.tag_name(), "div");
        assert_eq!(node.text_content(), "Body");
    }

    #[test]
    fn test_invalid_selector() {
        let bad = Selectors {
            content: "div[".to_string(),
            ..Selectors::default()
        };
        let err = PageSelectors::compile(&bad).err().unwrap();
        assert!(matches!(err, ConvertError::InvalidSelector { ref selector, .. } if selector == "div["));
    }
}
