//! Image discovery and the image manifest.
//!
//! Every `img` in the content gets a local filename; its `src` is rewritten
//! to point at the local copy and a manifest entry records where the
//! original lives. Downloading is left to the consumer of the manifest.

use serde::{Deserialize, Serialize};
use tracing::debug;
use wechat2md_render::Node;

use crate::config::{ConvertConfig, ExtensionPolicy};
use crate::ids::IdSource;

/// Extensions kept by [`detect_extension`]
pub const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Fallback extension
pub const DEFAULT_EXTENSION: &str = "jpg";

/// One discovered image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Where the image is fetched from
    #[serde(rename = "url")]
    pub source_url: String,

    /// Filename the image is stored under, unique within a conversion
    #[serde(rename = "filename")]
    pub local_filename: String,

    /// 1-based position among all `img` elements in the content, including
    /// ones skipped for lack of a source
    #[serde(rename = "index")]
    pub ordinal_index: usize,
}

/// Lowercased extension of the last path segment before any query string,
/// or [`DEFAULT_EXTENSION`] when it is not an accepted image type
pub fn detect_extension(source: &str) -> &'static str {
    let path = source.split('?').next().unwrap_or(source);
    let extension = path.rsplit('.').next().unwrap_or("").to_lowercase();

    ACCEPTED_EXTENSIONS
        .iter()
        .find(|accepted| **accepted == extension)
        .copied()
        .unwrap_or(DEFAULT_EXTENSION)
}

/// Rewrite every sourced image under `root` to a local path and return the
/// manifest in document order.
///
/// The lazy-load attribute wins over `src`; an image with neither (or only
/// empty values) keeps its `src` and produces no entry. The lazy-load
/// attribute is removed from every element in the subtree.
pub fn extract_images(root: &mut Node, ids: &dyn IdSource, config: &ConvertConfig) -> Vec<ImageRef> {
    let mut images = Vec::new();
    let mut seen = 0;

    visit_elements(root, &mut |node: &mut Node| {
        if node.is_tag("img") {
            seen += 1;
            if let Some(image) = localize_image(node, seen, ids, config) {
                images.push(image);
            }
        }
        node.remove_attr(&config.lazy_src_attribute);
    });

    images
}

fn localize_image(
    img: &mut Node,
    index: usize,
    ids: &dyn IdSource,
    config: &ConvertConfig,
) -> Option<ImageRef> {
    let source = [config.lazy_src_attribute.as_str(), "src"]
        .into_iter()
        .filter_map(|name| img.attr(name))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string);

    let Some(source) = source else {
        debug!(index, "image has no source, skipping");
        return None;
    };

    let detected = detect_extension(&source);
    let extension = match config.extension_policy {
        ExtensionPolicy::ForceJpg => DEFAULT_EXTENSION,
        ExtensionPolicy::Detected => detected,
    };
    if extension != detected {
        debug!(source = %source, detected, "image filename forced to .{}", extension);
    }

    let local_filename = format!("{}.{}", ids.next_id(), extension);
    img.set_attr(
        "src",
        &format!("{}/{}", config.image_dir.trim_end_matches('/'), local_filename),
    );

    Some(ImageRef {
        source_url: source,
        local_filename,
        ordinal_index: index,
    })
}

/// Pre-order walk over element nodes
fn visit_elements<F>(node: &mut Node, f: &mut F)
where
    F: FnMut(&mut Node),
{
    if node.is_element() {
        f(node);
    }
    for child in node.children_mut() {
        visit_elements(child, f);
    }
}
