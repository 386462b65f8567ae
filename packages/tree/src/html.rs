//! # HTML Rendering
//!
//! Renders a content tree to an HTML string for the read-only preview
//! collaborator. This is a one-way projection; nothing in the sync core
//! parses HTML back.

use crate::node::Node;

/// Render a tree to HTML.
pub fn render(node: &Node) -> String {
    let mut out = String::new();
    render_into(node, &mut out);
    out
}

fn render_into(node: &Node, out: &mut String) {
    match node {
        Node::Document { children } => render_all(children, out),
        Node::Heading { level, children } => {
            let level = (*level).clamp(1, 6);
            out.push_str(&format!("<h{}>", level));
            render_all(children, out);
            out.push_str(&format!("</h{}>", level));
        }
        Node::Paragraph { children } => {
            out.push_str("<p>");
            render_all(children, out);
            out.push_str("</p>");
        }
        Node::BlockQuote { children } => {
            out.push_str("<blockquote>");
            render_all(children, out);
            out.push_str("</blockquote>");
        }
        Node::List { ordered, items } => {
            out.push_str(if *ordered { "<ol>" } else { "<ul>" });
            render_all(items, out);
            out.push_str(if *ordered { "</ol>" } else { "</ul>" });
        }
        Node::ListItem { checked, children } => {
            out.push_str("<li>");
            if let Some(checked) = checked {
                out.push_str(if *checked {
                    "<input type=\"checkbox\" checked disabled>"
                } else {
                    "<input type=\"checkbox\" disabled>"
                });
            }
            render_all(children, out);
            out.push_str("</li>");
        }
        Node::CodeBlock { language, literal } => {
            match language {
                Some(language) => {
                    out.push_str("<pre><code class=\"language-");
                    out.push_str(&escape_attr(language));
                    out.push_str("\">");
                }
                None => out.push_str("<pre><code>"),
            }
            out.push_str(&escape_text(literal));
            out.push_str("</code></pre>");
        }
        Node::ThematicBreak => out.push_str("<hr>"),
        Node::Text { literal } => out.push_str(&escape_text(literal)),
        Node::Emphasis { children } => {
            out.push_str("<em>");
            render_all(children, out);
            out.push_str("</em>");
        }
        Node::Strong { children } => {
            out.push_str("<strong>");
            render_all(children, out);
            out.push_str("</strong>");
        }
        Node::Code { literal } => {
            out.push_str("<code>");
            out.push_str(&escape_text(literal));
            out.push_str("</code>");
        }
        Node::Link {
            url,
            title,
            children,
        } => {
            out.push_str("<a href=\"");
            out.push_str(&escape_attr(url));
            out.push('"');
            if let Some(title) = title {
                out.push_str(" title=\"");
                out.push_str(&escape_attr(title));
                out.push('"');
            }
            out.push('>');
            render_all(children, out);
            out.push_str("</a>");
        }
        Node::Image { url, title, alt } => {
            out.push_str("<img src=\"");
            out.push_str(&escape_attr(url));
            out.push_str("\" alt=\"");
            out.push_str(&escape_attr(alt));
            out.push('"');
            if let Some(title) = title {
                out.push_str(" title=\"");
                out.push_str(&escape_attr(title));
                out.push('"');
            }
            out.push('>');
        }
    }
}

fn render_all(nodes: &[Node], out: &mut String) {
    for node in nodes {
        render_into(node, out);
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_document() {
        let tree = Node::document(vec![
            Node::heading(2, vec![Node::text("Title")]),
            Node::paragraph(vec![
                Node::text("a "),
                Node::strong(vec![Node::text("b")]),
            ]),
        ]);

        assert_eq!(render(&tree), "<h2>Title</h2><p>a <strong>b</strong></p>");
    }

    #[test]
    fn test_render_escapes_text_and_attributes() {
        let tree = Node::paragraph(vec![
            Node::text("1 < 2 & 3"),
            Node::link("https://example.com?a=1&b=\"2\"", vec![Node::text("x")]),
        ]);

        let html = render(&tree);
        assert!(html.contains("1 &lt; 2 &amp; 3"));
        assert!(html.contains("href=\"https://example.com?a=1&amp;b=&quot;2&quot;\""));
    }

    #[test]
    fn test_render_task_list() {
        let tree = Node::list(
            false,
            vec![
                Node::task_item(true, vec![Node::text("done")]),
                Node::task_item(false, vec![Node::text("todo")]),
            ],
        );

        let html = render(&tree);
        assert!(html.starts_with("<ul><li><input type=\"checkbox\" checked disabled>done</li>"));
        assert!(html.contains("<li><input type=\"checkbox\" disabled>todo</li></ul>"));
    }

    #[test]
    fn test_render_code_block_with_language() {
        let tree = Node::code_block(Some("rust"), "fn main() {}");
        assert_eq!(
            render(&tree),
            "<pre><code class=\"language-rust\">fn main() {}</code></pre>"
        );
    }
}
