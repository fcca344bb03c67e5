//! # wechat2md-render
//!
//! Rule-based DOM to Markdown rendering, modelled on
//! [turndown](https://github.com/mixmark-io/turndown).
//!
//! ## Design
//!
//! HTML is parsed once (scraper/html5ever) into an owned [`Node`] tree.
//! Callers may rewrite that tree freely before handing it to a [`Renderer`],
//! which walks it bottom-up: each element's children are rendered first, then
//! the first matching [`Rule`] turns that text into the element's Markdown.
//!
//! - **Ordered rules**: custom rules are tried in insertion order before the
//!   built-in CommonMark set
//! - **Parent context**: rules see the node's parent through [`NodeRef`]
//! - **Keep/remove filters**: pass elements through as HTML or drop them
//!
//! ## Example
//!
//! ```rust
//! use wechat2md_render::{Node, Renderer};
//!
//! let renderer = Renderer::new();
//!
//! let mut h1 = Node::element("h1");
//! h1.add_child(Node::text("Hello World"));
//!
//! let markdown = renderer.render(&h1);
//! assert!(markdown.contains("Hello World"));
//! ```

pub mod html;
pub mod node;
mod rules;
mod service;
mod utilities;

pub use html::{from_element, parse_html};
pub use node::{Node, NodeRef, NodeType};
pub use rules::{Filter, PredicateFn, ReplacementFn, Rule, Rules};
pub use service::{CodeBlockStyle, HeadingStyle, RenderOptions, Renderer};
pub use utilities::*;
