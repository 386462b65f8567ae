//! # Content Tree Nodes
//!
//! Tree-shaped document model. Blocks nest inline nodes; `Document` is the
//! root. Equality is structural, which is what the round-trip guarantees of
//! the converter are stated in terms of.

use serde::{Deserialize, Serialize};

/// A node in the content tree.
///
/// Block nodes: `Document`, `Heading`, `Paragraph`, `BlockQuote`, `List`,
/// `ListItem`, `CodeBlock`, `ThematicBreak`.
/// Inline nodes: `Text`, `Emphasis`, `Strong`, `Code`, `Link`, `Image`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    /// Document root
    Document { children: Vec<Node> },

    /// ATX heading, level 1..=6
    Heading { level: u8, children: Vec<Node> },

    /// Paragraph of inline content
    Paragraph { children: Vec<Node> },

    /// Block quote; children are blocks
    BlockQuote { children: Vec<Node> },

    /// Bullet or ordered list; items must be `ListItem`
    List { ordered: bool, items: Vec<Node> },

    /// List item. `checked` is `Some(..)` for task items.
    ListItem {
        #[serde(skip_serializing_if = "Option::is_none")]
        checked: Option<bool>,
        children: Vec<Node>,
    },

    /// Fenced code block
    CodeBlock {
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        literal: String,
    },

    /// Horizontal rule
    ThematicBreak,

    /// Plain text run
    Text { literal: String },

    /// Emphasized inline content
    Emphasis { children: Vec<Node> },

    /// Strongly emphasized inline content
    Strong { children: Vec<Node> },

    /// Inline code span
    Code { literal: String },

    /// Hyperlink; children are the link text
    Link {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        children: Vec<Node>,
    },

    /// Inline image
    Image {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        alt: String,
    },
}

impl Node {
    pub fn document(children: Vec<Node>) -> Self {
        Node::Document { children }
    }

    pub fn heading(level: u8, children: Vec<Node>) -> Self {
        Node::Heading { level, children }
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Node::Paragraph { children }
    }

    pub fn block_quote(children: Vec<Node>) -> Self {
        Node::BlockQuote { children }
    }

    pub fn list(ordered: bool, items: Vec<Node>) -> Self {
        Node::List { ordered, items }
    }

    pub fn list_item(children: Vec<Node>) -> Self {
        Node::ListItem {
            checked: None,
            children,
        }
    }

    pub fn task_item(checked: bool, children: Vec<Node>) -> Self {
        Node::ListItem {
            checked: Some(checked),
            children,
        }
    }

    pub fn code_block(language: Option<&str>, literal: impl Into<String>) -> Self {
        Node::CodeBlock {
            language: language.map(str::to_string),
            literal: literal.into(),
        }
    }

    pub fn text(literal: impl Into<String>) -> Self {
        Node::Text {
            literal: literal.into(),
        }
    }

    pub fn emphasis(children: Vec<Node>) -> Self {
        Node::Emphasis { children }
    }

    pub fn strong(children: Vec<Node>) -> Self {
        Node::Strong { children }
    }

    pub fn code(literal: impl Into<String>) -> Self {
        Node::Code {
            literal: literal.into(),
        }
    }

    pub fn link(url: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Link {
            url: url.into(),
            title: None,
            children,
        }
    }

    pub fn image(url: impl Into<String>, alt: impl Into<String>) -> Self {
        Node::Image {
            url: url.into(),
            title: None,
            alt: alt.into(),
        }
    }

    pub fn with_title(mut self, new_title: impl Into<String>) -> Self {
        match self {
            Node::Link { ref mut title, .. } | Node::Image { ref mut title, .. } => {
                *title = Some(new_title.into());
            }
            _ => {}
        }
        self
    }

    /// True for nodes that live at block position.
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            Node::Document { .. }
                | Node::Heading { .. }
                | Node::Paragraph { .. }
                | Node::BlockQuote { .. }
                | Node::List { .. }
                | Node::ListItem { .. }
                | Node::CodeBlock { .. }
                | Node::ThematicBreak
        )
    }

    /// Child nodes, if this node kind has any.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Document { children }
            | Node::Heading { children, .. }
            | Node::Paragraph { children }
            | Node::BlockQuote { children }
            | Node::ListItem { children, .. }
            | Node::Emphasis { children }
            | Node::Strong { children }
            | Node::Link { children, .. } => Some(children),
            Node::List { items, .. } => Some(items),
            _ => None,
        }
    }

    /// Short kind name, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Document { .. } => "document",
            Node::Heading { .. } => "heading",
            Node::Paragraph { .. } => "paragraph",
            Node::BlockQuote { .. } => "blockQuote",
            Node::List { .. } => "list",
            Node::ListItem { .. } => "listItem",
            Node::CodeBlock { .. } => "codeBlock",
            Node::ThematicBreak => "thematicBreak",
            Node::Text { .. } => "text",
            Node::Emphasis { .. } => "emphasis",
            Node::Strong { .. } => "strong",
            Node::Code { .. } => "code",
            Node::Link { .. } => "link",
            Node::Image { .. } => "image",
        }
    }

    /// Concatenated text content of this subtree, markup stripped.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text { literal } | Node::Code { literal } => out.push_str(literal),
            Node::CodeBlock { literal, .. } => out.push_str(literal),
            Node::Image { alt, .. } => out.push_str(alt),
            _ => {
                if let Some(children) = self.children() {
                    for child in children {
                        child.collect_text(out);
                    }
                }
            }
        }
    }
}

impl Default for Node {
    /// An empty document.
    fn default() -> Self {
        Node::Document { children: vec![] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_compose() {
        let tree = Node::document(vec![
            Node::heading(1, vec![Node::text("Title")]),
            Node::paragraph(vec![
                Node::text("Hello "),
                Node::strong(vec![Node::text("world")]),
            ]),
        ]);

        let children = tree.children().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].kind(), "heading");
        assert_eq!(tree.text_content(), "TitleHello world");
    }

    #[test]
    fn test_serde_round_trip() {
        let tree = Node::document(vec![Node::paragraph(vec![
            Node::link("https://example.com", vec![Node::text("ex")]).with_title("Example"),
        ])]);

        let json = serde_json::to_string(&tree).unwrap();
        assert!(json.contains("\"type\":\"Document\""));
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(tree, back);
    }

    #[test]
    fn test_default_is_empty_document() {
        assert_eq!(Node::default(), Node::document(vec![]));
    }

    #[test]
    fn test_block_classification() {
        assert!(Node::ThematicBreak.is_block());
        assert!(!Node::text("x").is_block());
    }
}
