//! # wechat2md
//!
//! Convert WeChat public-account article pages to Markdown, together with a
//! manifest of the images the Markdown refers to.
//!
//! ## Pipeline
//!
//! 1. **Load**: parse the page once ([`Document`])
//! 2. **Metadata**: title, author and publish time from fixed page elements
//! 3. **Normalize**: strip editor attributes, turn CSS bold into `strong`,
//!    digest sections into `blockquote`, bare `pre` into `pre > code`
//! 4. **Images**: give every sourced `img` a local filename and record it
//! 5. **Render**: Markdown via [`wechat2md_render`], with article rules for
//!    fenced code (language inference) and bold runs used as headings
//!
//! Only input that is not HTML at all fails; every other irregularity ends
//! in a default.
//!
//! ## Example
//!
//! ```rust
//! use wechat2md::{ConvertConfig, Converter};
//!
//! let html = r#"<html><body>
//!   <h1 id="activity-name">Hello</h1>
//!   <div id="js_content"><p>World</p></div>
//! </body></html>"#;
//!
//! let converter = Converter::new(ConvertConfig::default()).unwrap();
//! let result = converter.convert(html.as_bytes(), "https://mp.weixin.qq.com/s/x").unwrap();
//! assert_eq!(result.markdown, "# Hello\n\nWorld");
//! ```

pub mod config;
mod convert;
pub mod document;
mod error;
pub mod ids;
pub mod images;
pub mod metadata;
pub mod normalize;
pub mod rules;

pub use config::{ConvertConfig, ExtensionPolicy, Selectors};
pub use convert::{convert, ConversionResult, Converter};
pub use document::{Document, PageSelectors};
pub use error::{ConvertError, Result};
pub use ids::{IdSource, SequentialIds, UuidSource};
pub use images::{detect_extension, extract_images, ImageRef};
pub use metadata::{extract_metadata, Metadata};
pub use normalize::{NormalizeReport, Normalizer};
pub use rules::article_renderer;
