//! CommonMark rules for node to Markdown conversion.

use super::{Filter, Rule};
use crate::node::NodeRef;
use crate::service::{CodeBlockStyle, HeadingStyle};
use crate::utilities::{clean_attribute, repeat};

/// Create all CommonMark rules
pub fn commonmark_rules() -> Vec<Rule> {
    vec![
        paragraph_rule(),
        line_break_rule(),
        heading_rule(),
        blockquote_rule(),
        list_rule(),
        list_item_rule(),
        indented_code_block_rule(),
        fenced_code_block_rule(),
        horizontal_rule(),
        inline_link_rule(),
        emphasis_rule(),
        strong_rule(),
        code_rule(),
        image_rule(),
    ]
}

fn paragraph_rule() -> Rule {
    Rule::for_tag("p", |_, content, _| format!("\n\n{}\n\n", content.trim()))
}

fn line_break_rule() -> Rule {
    Rule::for_tag("br", |_, _, _| "  \n".to_string())
}

fn heading_rule() -> Rule {
    Rule::for_tags(&["h1", "h2", "h3", "h4", "h5", "h6"], |node, content, options| {
        let level: usize = node.tag_name()[1..].parse().unwrap_or(1);

        let content = content.trim();
        if content.is_empty() {
            return String::new();
        }

        match options.heading_style {
            HeadingStyle::Setext if level <= 2 => {
                let underline = if level == 1 { "=" } else { "-" };
                format!(
                    "\n\n{}\n{}\n\n",
                    content,
                    repeat(underline, content.chars().count())
                )
            }
            _ => format!("\n\n{} {}\n\n", repeat("#", level), content),
        }
    })
}

fn blockquote_rule() -> Rule {
    Rule::for_tag("blockquote", |_, content, _| {
        let content = content.trim_matches('\n');
        if content.trim().is_empty() {
            return String::new();
        }
        let quoted: Vec<String> = content
            .lines()
            .map(|line| {
                if line.trim().is_empty() {
                    ">".to_string()
                } else {
                    format!("> {}", line)
                }
            })
            .collect();
        format!("\n\n{}\n\n", quoted.join("\n"))
    })
}

fn list_rule() -> Rule {
    Rule::for_tags(&["ul", "ol"], |node, content, _| {
        let content = content.trim();

        if node.parent_tag() == Some("li") {
            // Nested lists hang off the parent item's line
            format!("\n{}", content)
        } else {
            format!("\n\n{}\n\n", content)
        }
    })
}

fn list_item_rule() -> Rule {
    Rule::for_tag("li", |node, content, options| {
        let content = content
            .trim()
            .replace("\n\n\n", "\n\n")
            .replace('\n', "\n    ");

        let prefix = match node.parent() {
            Some(parent) if parent.is_tag("ol") => {
                let start = parent
                    .attr("start")
                    .and_then(|s| s.trim().parse::<usize>().ok())
                    .unwrap_or(1);
                format!("{}.  ", start + node.index_in_parent().unwrap_or(0))
            }
            _ => format!("{}   ", options.bullet_list_marker),
        };

        format!("{}{}\n", prefix, content)
    })
}

fn code_child<'a>(node: &NodeRef<'a>) -> Option<&'a crate::node::Node> {
    node.element_children().find(|c| c.is_tag("code"))
}

fn indented_code_block_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, options| {
            tag == "pre"
                && code_child(node).is_some()
                && options.code_block_style == CodeBlockStyle::Indented
        }),
        |node, _, _| {
            let code_content = code_child(node).map(|c| c.text_content()).unwrap_or_default();
            let indented: Vec<String> = code_content
                .lines()
                .map(|line| format!("    {}", line))
                .collect();

            format!("\n\n{}\n\n", indented.join("\n"))
        },
    )
}

fn fenced_code_block_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, options| {
            tag == "pre"
                && code_child(node).is_some()
                && options.code_block_style == CodeBlockStyle::Fenced
        }),
        |node, _, options| {
            let Some(code_node) = code_child(node) else {
                return String::new();
            };

            let language = code_node
                .classes()
                .find_map(|c| c.strip_prefix("language-"))
                .unwrap_or("");

            let fence = &options.fence;
            format!(
                "\n\n{}{}\n{}\n{}\n\n",
                fence,
                language,
                code_node.text_content().trim_end(),
                fence
            )
        },
    )
}

fn horizontal_rule() -> Rule {
    Rule::for_tag("hr", |_, _, options| format!("\n\n{}\n\n", options.hr))
}

fn inline_link_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, _| tag == "a" && node.has_attr("href")),
        |node, content, _| {
            let href = clean_attribute(node.attr("href"));
            let title = node.attr("title").filter(|t| !t.trim().is_empty());

            if href.is_empty() && title.is_none() {
                return content.to_string();
            }

            let title_part = title
                .map(|t| format!(" \"{}\"", t.replace('"', "\\\"")))
                .unwrap_or_default();

            format!("[{}]({}{})", content, href, title_part)
        },
    )
}

fn emphasis_rule() -> Rule {
    Rule::for_tags(&["em", "i"], |_, content, options| {
        if content.trim().is_empty() {
            return String::new();
        }
        let delimiter = options.em_delimiter;
        format!("{}{}{}", delimiter, content, delimiter)
    })
}

fn strong_rule() -> Rule {
    Rule::for_tags(&["strong", "b"], |_, content, options| {
        if content.trim().is_empty() {
            return String::new();
        }
        let delimiter = &options.strong_delimiter;
        format!("{}{}{}", delimiter, content, delimiter)
    })
}

fn code_rule() -> Rule {
    Rule::new(
        // <code> inside <pre> belongs to the code block rules
        Filter::predicate(|tag, node, _| tag == "code" && node.parent_tag() != Some("pre")),
        |node, _, _| {
            let content = node.text_content();
            if content.is_empty() {
                return String::new();
            }

            let max_consecutive_backticks = content
                .chars()
                .fold((0, 0), |(max, current), c| {
                    if c == '`' {
                        (max.max(current + 1), current + 1)
                    } else {
                        (max, 0)
                    }
                })
                .0;

            let backticks = "`".repeat(max_consecutive_backticks + 1);

            let needs_space = content.starts_with('`')
                || content.ends_with('`')
                || content.starts_with(' ')
                || content.ends_with(' ');

            if needs_space && max_consecutive_backticks > 0 {
                format!("{} {} {}", backticks, content, backticks)
            } else {
                format!("{}{}{}", backticks, content, backticks)
            }
        },
    )
}

fn image_rule() -> Rule {
    Rule::for_tag("img", |node, _, _| {
        let alt = clean_attribute(node.attr("alt"));
        let src = clean_attribute(node.attr("src"));
        let title = node.attr("title").filter(|t| !t.trim().is_empty());

        if src.is_empty() {
            return String::new();
        }

        let title_part = title.map(|t| format!(" \"{}\"", t)).unwrap_or_default();

        format!("![{}]({}{})", alt, src, title_part)
    })
}

#[cfg(test)]
mod tests {
    use crate::node::Node;
    use crate::service::{CodeBlockStyle, HeadingStyle, RenderOptions, Renderer};

    fn li(text: &str) -> Node {
        let mut li = Node::element("li");
        li.add_child(Node::text(text));
        li
    }

    #[test]
    fn test_ordered_list_numbers_items() {
        let mut ol = Node::element_with_attrs("ol", vec![("start", "3")]);
        ol.add_child(li("One"));
        ol.add_child(li("Two"));

        let result = Renderer::new().render(&ol);
        assert_eq!(result, "3.  One\n4.  Two");
    }

    #[test]
    fn test_nested_list() {
        let mut inner = Node::element("ul");
        inner.add_child(li("Inner"));
        let mut outer_item = li("Outer");
        outer_item.add_child(inner);
        let mut outer = Node::element("ul");
        outer.add_child(outer_item);

        let result = Renderer::new().render(&outer);
        assert_eq!(result, "*   Outer\n    *   Inner");
    }

    #[test]
    fn test_atx_heading_levels() {
        let renderer = Renderer::with_options(RenderOptions {
            heading_style: HeadingStyle::Atx,
            ..Default::default()
        });
        let mut h3 = Node::element("h3");
        h3.add_child(Node::text("Third"));
        assert_eq!(renderer.render(&h3), "### Third");
    }

    #[test]
    fn test_setext_underline_counts_chars() {
        let mut h2 = Node::element("h2");
        h2.add_child(Node::text("标题"));
        assert_eq!(Renderer::new().render(&h2), "标题\n--");
    }

    #[test]
    fn test_fenced_code_block_language() {
        let renderer = Renderer::with_options(RenderOptions {
            code_block_style: CodeBlockStyle::Fenced,
            ..Default::default()
        });
        let mut pre = Node::element("pre");
        let mut code = Node::element_with_attrs("code", vec![("class", "language-rust")]);
        code.add_child(Node::text("fn main() {}\n"));
        pre.add_child(code);

        assert_eq!(renderer.render(&pre), "```rust\nfn main() {}\n```");
    }

    #[test]
    fn test_inline_code_with_backticks() {
        let mut code = Node::element("code");
        code.add_child(Node::text("a`b"));
        assert_eq!(Renderer::new().render(&code), "``a`b``");
    }

    #[test]
    fn test_blockquote_prefixes_every_line() {
        let mut quote = Node::element("blockquote");
        let mut p1 = Node::element("p");
        p1.add_child(Node::text("First"));
        let mut p2 = Node::element("p");
        p2.add_child(Node::text("Second"));
        quote.add_child(p1);
        quote.add_child(p2);

        assert_eq!(Renderer::new().render(&quote), "> First\n>\n> Second");
    }

    #[test]
    fn test_link_without_href_is_plain_text() {
        let mut a = Node::element("a");
        a.add_child(Node::text("anchor"));
        assert_eq!(Renderer::new().render(&a), "anchor");
    }

    #[test]
    fn test_image_without_src_renders_nothing() {
        let img = Node::element_with_attrs("img", vec![("alt", "x")]);
        assert_eq!(Renderer::new().render(&img), "");
    }
}
