//! Conversion orchestration: one page in, one [`ConversionResult`] out.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use wechat2md_render::Renderer;

use crate::config::ConvertConfig;
use crate::document::{Document, PageSelectors};
use crate::error::Result;
use crate::ids::{IdSource, UuidSource};
use crate::images::{extract_images, ImageRef};
use crate::metadata::{extract_metadata, Metadata};
use crate::normalize::Normalizer;
use crate::rules::article_renderer;

/// The converted article. Serializes to the JSON shape the web front end
/// expects (`publishTime`, `originalUrl`, `images[].url/filename/index`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Identifier of this conversion
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(rename = "publishTime")]
    pub publish_time: String,
    /// `# <title>`, a blank line, then the rendered body
    pub markdown: String,
    /// Image manifest in document order
    pub images: Vec<ImageRef>,
    #[serde(rename = "originalUrl")]
    pub source_url: String,
}

/// Runs the pipeline: metadata, normalization, image extraction, rendering.
///
/// A converter holds only read-only state plus the shared [`IdSource`], so a
/// single instance can serve conversions on many threads at once. Each call
/// owns its document for the duration of the conversion.
pub struct Converter {
    config: ConvertConfig,
    selectors: PageSelectors,
    normalizer: Normalizer,
    renderer: Renderer,
    ids: Arc<dyn IdSource>,
}

impl Converter {
    /// Converter with random UUID identifiers
    pub fn new(config: ConvertConfig) -> Result<Self> {
        Self::with_id_source(config, Arc::new(UuidSource))
    }

    /// Converter drawing conversion ids and image filenames from `ids`.
    /// Fails only if a configured selector does not parse.
    pub fn with_id_source(config: ConvertConfig, ids: Arc<dyn IdSource>) -> Result<Self> {
        Ok(Self {
            selectors: PageSelectors::compile(&config.selectors)?,
            normalizer: Normalizer::new(&config),
            renderer: article_renderer(&config),
            config,
            ids,
        })
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Convert raw page bytes fetched from `source_url`
    pub fn convert(&self, html: &[u8], source_url: &str) -> Result<ConversionResult> {
        let doc = Document::parse(html)?;
        Ok(self.convert_document(&doc, source_url))
    }

    /// Convert page text fetched from `source_url`
    pub fn convert_str(&self, html: &str, source_url: &str) -> Result<ConversionResult> {
        let doc = Document::parse_str(html)?;
        Ok(self.convert_document(&doc, source_url))
    }

    /// Every stage after parsing is total
    pub fn convert_document(&self, doc: &Document, source_url: &str) -> ConversionResult {
        info!(source_url, "converting article");

        let metadata = extract_metadata(doc, &self.selectors, &self.config.default_title);

        let (body, images) = match doc.content_node(&self.selectors.content) {
            Some(mut content) => {
                let report = self.normalizer.normalize(&mut content);
                debug!(
                    rewritten = report.rewritten,
                    code_blocks = report.code_blocks,
                    "normalized content"
                );

                let images = extract_images(&mut content, self.ids.as_ref(), &self.config);
                debug!(images = images.len(), "extracted images");

                (self.renderer.render(&content), images)
            }
            None => {
                warn!(
                    selector = %self.config.selectors.content,
                    "content container not found, body left empty"
                );
                (String::new(), Vec::new())
            }
        };

        let markdown = assemble_markdown(&metadata, &body, source_url, self.config.metadata_header);

        let result = ConversionResult {
            id: self.ids.next_id(),
            title: metadata.title,
            author: metadata.author,
            publish_time: metadata.publish_time,
            markdown,
            images,
            source_url: source_url.to_string(),
        };
        info!(
            id = %result.id,
            images = result.images.len(),
            bytes = result.markdown.len(),
            "conversion finished"
        );
        result
    }
}

/// Convert a page with the default configuration
pub fn convert(html: &[u8], source_url: &str) -> Result<ConversionResult> {
    Converter::new(ConvertConfig::default())?.convert(html, source_url)
}

fn assemble_markdown(metadata: &Metadata, body: &str, source_url: &str, header: bool) -> String {
    let mut markdown = format!("# {}\n\n", metadata.title);

    if header {
        let quote: Vec<String> = [
            ("作者", metadata.author.as_str()),
            ("发布时间", metadata.publish_time.as_str()),
            ("原文链接", source_url),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| format!("> {}：{}", label, value))
        .collect();

        if !quote.is_empty() {
            markdown.push_str(&quote.join("\n>\n"));
            markdown.push_str("\n\n");
        }
    }

    markdown.push_str(body);
    markdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;
    use crate::ids::SequentialIds;

    fn converter(config: ConvertConfig) -> Converter {
        Converter::with_id_source(config, Arc::new(SequentialIds::new("id"))).unwrap()
    }

    const PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>ignored</title></head><body>
  <h1 class="rich_media_title" id="activity-name">
    Rust 所有权入门
  </h1>
  <a id="js_name">Ferris 周刊</a>
  <em id="publish_time">2024-05-20</em>
  <div class="rich_media_content" id="js_content" style="visibility: hidden;">
    <section style="font-size: 15px;" data-tools="135editor">
      <p><span style="font-weight: bold;">一、背景</span></p>
      <p>正文内容。</p>
      <p><img data-src="https://mmbiz.qpic.cn/a/640?wx_fmt=png" data-ratio="0.75"></p>
    </section>
  </div>
</body></html>"#;

    #[test]
    fn test_convert_page() {
        let result = converter(ConvertConfig::default())
            .convert_str(PAGE, "https://mp.weixin.qq.com/s/abc")
            .unwrap();

        assert_eq!(result.title, "Rust 所有权入门");
        assert_eq!(result.author, "Ferris 周刊");
        assert_eq!(result.publish_time, "2024-05-20");
        assert_eq!(result.source_url, "https://mp.weixin.qq.com/s/abc");
        assert_eq!(result.images.len(), 1);
        assert_eq!(result.images[0].local_filename, "id-1.jpg");
        // image ids are drawn first, the conversion id last
        assert_eq!(result.id, "id-2");
        assert_eq!(
            result.markdown,
            "# Rust 所有权入门\n\n**一、背景**\n\n正文内容。\n\n![](./images/id-1.jpg)"
        );
    }

    #[test]
    fn test_missing_content_yields_title_only() {
        let result = converter(ConvertConfig::default())
            .convert_str("<html><body><p>no container</p></body></html>", "")
            .unwrap();
        assert_eq!(result.markdown, "# Untitled WeChat Article\n\n");
        assert!(result.images.is_empty());
    }

    #[test]
    fn test_metadata_header() {
        let config = ConvertConfig {
            metadata_header: true,
            ..ConvertConfig::default()
        };
        let result = converter(config)
            .convert_str(PAGE, "https://mp.weixin.qq.com/s/abc")
            .unwrap();
        assert!(result.markdown.starts_with(
            "# Rust 所有权入门\n\n> 作者：Ferris 周刊\n>\n> 发布时间：2024-05-20\n>\n> 原文链接：https://mp.weixin.qq.com/s/abc\n\n**一、背景**"
        ));
    }

    #[test]
    fn test_metadata_header_skips_empty_fields() {
        let metadata = Metadata {
            title: "T".into(),
            author: String::new(),
            publish_time: String::new(),
        };
        assert_eq!(assemble_markdown(&metadata, "body", "", true), "# T\n\nbody");
        assert_eq!(
            assemble_markdown(&metadata, "body", "https://x", true),
            "# T\n\n> 原文链接：https://x\n\nbody"
        );
    }

    #[test]
    fn test_parse_failure_surfaces() {
        let err = converter(ConvertConfig::default())
            .convert(&[0xff, 0xfe, 0x00, 0x01], "")
            .err()
            .unwrap();
        assert!(matches!(err, ConvertError::Parse { .. }));
    }

    #[test]
    fn test_invalid_selector_fails_construction() {
        let mut config = ConvertConfig::default();
        config.selectors.title = ":::".to_string();
        assert!(matches!(
            Converter::new(config).err(),
            Some(ConvertError::InvalidSelector { .. })
        ));
    }
}
