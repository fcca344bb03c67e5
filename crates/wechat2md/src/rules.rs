//! WeChat-specific render rules, installed ahead of the CommonMark set.
//!
//! Priority: code block, then bold emphasis, then the renderer's defaults.

use once_cell::sync::Lazy;
use regex::Regex;
use wechat2md_render::{CodeBlockStyle, HeadingStyle, Node, NodeRef, RenderOptions, Renderer, Rule};

use crate::config::ConvertConfig;

static LANGUAGE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:lang-|language-)([A-Za-z0-9_]+)").expect("language pattern is valid")
});

/// Class substrings consulted, in order, when no `lang-X`/`language-X` token
/// is present. The editor's highlighter tags shell snippets as `ruby`.
pub const LANGUAGE_HINTS: &[(&str, &str)] = &[
    ("ruby", "bash"),
    ("python", "python"),
    ("javascript", "javascript"),
    ("cpp", "cpp"),
];

/// Parents under which a dominant bold run counts as a heading
pub const HEADING_PARENTS: &[&str] = &["p", "section", "div"];

/// Fence language for a `pre` block, from its class and the class of the
/// first `code` element inside it
pub fn infer_language(pre: &Node) -> Option<String> {
    let code_class = pre
        .children()
        .find_map(|c| c.find_first(|n| n.is_tag("code")))
        .and_then(|code| code.attr("class"))
        .unwrap_or("");
    let combined = format!("{} {}", pre.attr("class").unwrap_or(""), code_class);

    if let Some(captures) = LANGUAGE_TOKEN.captures(&combined) {
        return Some(captures[1].to_string());
    }

    LANGUAGE_HINTS
        .iter()
        .find(|(hint, _)| combined.contains(hint))
        .map(|(_, language)| language.to_string())
}

/// Plain text of a code block with every `br` turned into a newline
pub fn code_text(node: &Node) -> String {
    let mut out = String::new();
    push_code_text(node, &mut out);
    out
}

fn push_code_text(node: &Node, out: &mut String) {
    for child in node.children() {
        if child.is_text() {
            out.push_str(child.node_value.as_deref().unwrap_or(""));
        } else if child.is_tag("br") {
            out.push('\n');
        } else {
            push_code_text(child, out);
        }
    }
}

/// Any `pre` becomes a fenced block; visual line breaks survive
pub fn code_block_rule() -> Rule {
    Rule::for_tag("pre", |node, _, options| {
        let language = infer_language(node.node).unwrap_or_default();
        let fence = &options.fence;
        format!("\n{}{}\n{}\n{}\n\n", fence, language, code_text(node.node), fence)
    })
}

/// Whether a bold element makes up more than `ratio` of its parent block's
/// text. Only `p`, `section` and `div` parents qualify.
pub fn is_disguised_heading(node: &NodeRef, ratio: f64) -> bool {
    let Some(parent) = node
        .parent()
        .filter(|p| HEADING_PARENTS.iter().any(|tag| p.is_tag(tag)))
    else {
        return false;
    };

    let bold_len = node.text_content().trim().chars().count();
    let parent_len = parent.text_content().trim().chars().count();

    bold_len > 0 && parent_len > 0 && bold_len as f64 / parent_len as f64 > ratio
}

/// Bold text, trimmed inside its delimiters. A disguised heading is
/// followed by a paragraph break.
pub fn emphasis_rule(heading_ratio: f64) -> Rule {
    Rule::for_tags(&["strong", "b"], move |node, content, options| {
        let text = content.trim();
        if text.is_empty() {
            return String::new();
        }

        let delimiter = &options.strong_delimiter;
        if is_disguised_heading(node, heading_ratio) {
            format!("{}{}{}\n\n", delimiter, text, delimiter)
        } else {
            format!("{}{}{}", delimiter, text, delimiter)
        }
    })
}

/// Renderer options for article output: ATX headings, fenced code
pub fn render_options() -> RenderOptions {
    RenderOptions {
        heading_style: HeadingStyle::Atx,
        code_block_style: CodeBlockStyle::Fenced,
        ..RenderOptions::default()
    }
}

/// Install the article rules on a renderer
pub fn install(renderer: &mut Renderer, config: &ConvertConfig) {
    renderer
        .add_rule("codeBlocks", code_block_rule())
        .add_rule("emphasis", emphasis_rule(config.heading_ratio));
}

/// A renderer configured for article output
pub fn article_renderer(config: &ConvertConfig) -> Renderer {
    let mut renderer = Renderer::with_options(render_options());
    renderer.use_plugin(|r| install(r, config));
    renderer
}
