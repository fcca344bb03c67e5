//! Conversion configuration.
//!
//! Everything the pipeline knows about the WeChat page dialect lives here:
//! the selectors it reads from, the vendor attributes and marker class it
//! rewrites, and the disguised-heading threshold.

/// Selector of the article title element
pub const TITLE_SELECTOR: &str = "#activity-name";
/// Selector of the account (author) name element
pub const AUTHOR_SELECTOR: &str = "#js_name";
/// Selector of the publish time element
pub const PUBLISH_TIME_SELECTOR: &str = "#publish_time";
/// Selector of the article body; only its descendants are normalized and rendered
pub const CONTENT_SELECTOR: &str = "#js_content";

/// Title used when the page has none
pub const DEFAULT_TITLE: &str = "Untitled WeChat Article";

/// A bold run longer than this share of its parent block's text is
/// rendered as a disguised heading. The comparison is strict.
pub const HEADING_RATIO: f64 = 0.6;

/// Layout and tooling attributes the editor sprinkles over every node
pub const VENDOR_ATTRIBUTES: &[&str] = &[
    "style",
    "data-tools",
    "data-brushtype",
    "data-ratio",
    "data-w",
    "data-default-width",
];

/// Marker class of the editor's "digest" quote block
pub const DIGEST_CLASS: &str = "js_blockquote_digest";

/// Lazy-load attribute carrying the real image URL
pub const LAZY_SRC_ATTRIBUTE: &str = "data-src";

/// Directory prefix written into rewritten image sources
pub const IMAGE_DIR: &str = "./images";

/// CSS selectors locating the parts of the page the pipeline reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selectors {
    pub title: String,
    pub author: String,
    pub publish_time: String,
    pub content: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            title: TITLE_SELECTOR.to_string(),
            author: AUTHOR_SELECTOR.to_string(),
            publish_time: PUBLISH_TIME_SELECTOR.to_string(),
            content: CONTENT_SELECTOR.to_string(),
        }
    }
}

/// How local image filenames get their extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtensionPolicy {
    /// Always `.jpg`, whatever the source URL says. Image download tooling
    /// downstream relies on this.
    #[default]
    ForceJpg,
    /// Use the extension detected from the source URL (falls back to `jpg`)
    Detected,
}

/// Options for a [`crate::Converter`]
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Where metadata and content are read from
    pub selectors: Selectors,

    /// Title used when the title element is missing or empty
    pub default_title: String,

    /// Disguised-heading threshold, see [`HEADING_RATIO`]
    pub heading_ratio: f64,

    /// Attributes stripped from every content node
    pub vendor_attributes: Vec<String>,

    /// Class marking a digest block to be turned into a blockquote
    pub digest_class: String,

    /// Attribute preferred over `src` when locating an image
    pub lazy_src_attribute: String,

    /// Prefix for rewritten image sources
    pub image_dir: String,

    /// Extension handling for local image filenames
    pub extension_policy: ExtensionPolicy,

    /// Emit author, publish time and source link as a quote under the title
    pub metadata_header: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            selectors: Selectors::default(),
            default_title: DEFAULT_TITLE.to_string(),
            heading_ratio: HEADING_RATIO,
            vendor_attributes: VENDOR_ATTRIBUTES.iter().map(|a| a.to_string()).collect(),
            digest_class: DIGEST_CLASS.to_string(),
            lazy_src_attribute: LAZY_SRC_ATTRIBUTE.to_string(),
            image_dir: IMAGE_DIR.to_string(),
            extension_policy: ExtensionPolicy::ForceJpg,
            metadata_header: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_page_dialect() {
        let config = ConvertConfig::default();
        assert_eq!(config.selectors.content, "#js_content");
        assert_eq!(config.default_title, "Untitled WeChat Article");
        assert_eq!(config.heading_ratio, 0.6);
        assert_eq!(config.extension_policy, ExtensionPolicy::ForceJpg);
        assert!(config.vendor_attributes.iter().any(|a| a == "style"));
        assert!(!config.vendor_attributes.iter().any(|a| a == "data-src"));
        assert!(!config.metadata_header);
    }
}
