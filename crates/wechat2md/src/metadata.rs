//! Article metadata (title, author, publish time).

use serde::{Deserialize, Serialize};

use crate::document::{Document, PageSelectors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub title: String,
    pub author: String,
    pub publish_time: String,
}

/// Read the metadata fields from their fixed page elements. A missing
/// element yields `default_title` for the title and `""` otherwise.
pub fn extract_metadata(doc: &Document, selectors: &PageSelectors, default_title: &str) -> Metadata {
    Metadata {
        title: doc
            .select_text(&selectors.title)
            .unwrap_or_else(|| default_title.to_string()),
        author: doc.select_text(&selectors.author).unwrap_or_default(),
        publish_time: doc.select_text(&selectors.publish_time).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Selectors, DEFAULT_TITLE};

    fn extract(html: &str) -> Metadata {
        let doc = Document::parse_str(html).unwrap();
        let selectors = PageSelectors::compile(&Selectors::default()).unwrap();
        extract_metadata(&doc, &selectors, DEFAULT_TITLE)
    }

    #[test]
    fn test_extracts_all_fields() {
        let meta = extract(
            r#"<h1 id="activity-name"> 深入理解 Rust </h1>
               <a id="js_name">技术周刊</a>
               <em id="publish_time">2024-03-01 08:00</em>
               <div id="js_content"><p>body</p></div>"#,
        );
        assert_eq!(
            meta,
            Metadata {
                title: "深入理解 Rust".to_string(),
                author: "技术周刊".to_string(),
                publish_time: "2024-03-01 08:00".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let meta = extract("<html><body><p>nothing here</p></body></html>");
        assert_eq!(meta.title, "Untitled WeChat Article");
        assert_eq!(meta.author, "");
        assert_eq!(meta.publish_time, "");
    }

    #[test]
    fn test_metadata_outside_content_is_read() {
        let meta = extract(r#"<div id="js_content"></div><h2 id="activity-name">Outside</h2>"#);
        assert_eq!(meta.title, "Outside");
    }
}
