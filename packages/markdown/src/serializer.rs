//! # Markup Serializer
//!
//! Serializes a content tree back to canonical markup. The output is one
//! normal form: `**strong**`, `_emphasis_`, `-` bullets, sequential `1.`
//! ordered markers, `>` quote prefixes, ` ``` ` fences and `---` rules, with
//! blocks separated by one blank line. `parse` applied to the output of
//! `serialize` reproduces the input tree.

use crate::error::{SerializeError, SerializeResult};
use marksync_tree::Node;

/// Serialize a tree to canonical markup.
pub fn serialize(tree: &Node) -> SerializeResult<String> {
    Serializer::new().serialize(tree)
}

/// Tree-to-markup serializer.
pub struct Serializer {
    _private: (),
}

impl Serializer {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Serialize a `Document` (or a single block) to markup.
    pub fn serialize(&mut self, tree: &Node) -> SerializeResult<String> {
        match tree {
            Node::Document { children } => self.blocks(children),
            other if other.is_block() => self.block(other),
            other => Err(SerializeError::InlineAtBlockPosition(
                other.kind().to_string(),
            )),
        }
    }

    fn blocks(&mut self, nodes: &[Node]) -> SerializeResult<String> {
        let mut parts = Vec::with_capacity(nodes.len());
        for node in nodes {
            parts.push(self.block(node)?);
        }
        Ok(parts.join("\n\n"))
    }

    fn block(&mut self, node: &Node) -> SerializeResult<String> {
        match node {
            Node::Heading { level, children } => {
                if !(1..=6).contains(level) {
                    return Err(SerializeError::InvalidHeadingLevel(*level));
                }
                Ok(format!(
                    "{} {}",
                    "#".repeat(*level as usize),
                    self.inline(children)?
                ))
            }
            Node::Paragraph { children } => self.inline(children),
            Node::BlockQuote { children } => {
                let inner = self.blocks(children)?;
                let quoted: Vec<String> = inner
                    .lines()
                    .map(|line| {
                        if line.is_empty() {
                            ">".to_string()
                        } else {
                            format!("> {}", line)
                        }
                    })
                    .collect();
                Ok(quoted.join("\n"))
            }
            Node::List { ordered, items } => {
                let mut lines = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let (checked, children) = match item {
                        Node::ListItem { checked, children } => (checked, children),
                        other => {
                            return Err(SerializeError::InvalidListChild(
                                other.kind().to_string(),
                            ))
                        }
                    };
                    let marker = if *ordered {
                        format!("{}. ", index + 1)
                    } else {
                        "- ".to_string()
                    };
                    let task = match checked {
                        Some(true) => "[x] ",
                        Some(false) => "[ ] ",
                        None => "",
                    };
                    lines.push(format!("{}{}{}", marker, task, self.inline(children)?));
                }
                Ok(lines.join("\n"))
            }
            Node::CodeBlock { language, literal } => {
                let mut out = String::from("```");
                if let Some(language) = language {
                    out.push_str(language);
                }
                out.push('\n');
                if !literal.is_empty() {
                    out.push_str(literal);
                    out.push('\n');
                }
                out.push_str("```");
                Ok(out)
            }
            Node::ThematicBreak => Ok("---".to_string()),
            Node::ListItem { .. } => Err(SerializeError::OrphanListItem),
            Node::Document { .. } => self.serialize(node),
            other => Err(SerializeError::InlineAtBlockPosition(
                other.kind().to_string(),
            )),
        }
    }

    fn inline(&self, nodes: &[Node]) -> SerializeResult<String> {
        let mut out = String::new();
        for node in nodes {
            match node {
                Node::Text { literal } => out.push_str(&escape(literal)),
                Node::Emphasis { children } => {
                    out.push('_');
                    out.push_str(&self.inline(children)?);
                    out.push('_');
                }
                Node::Strong { children } => {
                    out.push_str("**");
                    out.push_str(&self.inline(children)?);
                    out.push_str("**");
                }
                Node::Code { literal } => {
                    out.push('`');
                    out.push_str(literal);
                    out.push('`');
                }
                Node::Link {
                    url,
                    title,
                    children,
                } => {
                    out.push('[');
                    out.push_str(&self.inline(children)?);
                    out.push_str("](");
                    out.push_str(url);
                    if let Some(title) = title {
                        out.push_str(&format!(" \"{}\"", title));
                    }
                    out.push(')');
                }
                Node::Image { url, title, alt } => {
                    out.push_str("![");
                    out.push_str(&escape(alt));
                    out.push_str("](");
                    out.push_str(url);
                    if let Some(title) = title {
                        out.push_str(&format!(" \"{}\"", title));
                    }
                    out.push(')');
                }
                other => {
                    return Err(SerializeError::BlockAtInlinePosition(
                        other.kind().to_string(),
                    ))
                }
            }
        }
        Ok(out)
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Backslash-escape characters that would otherwise read as inline markup.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '*' | '_' | '`' | '[' | ']') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_canonical_block_layout() {
        let tree = Node::document(vec![
            Node::heading(1, vec![Node::text("Title")]),
            Node::paragraph(vec![
                Node::text("a "),
                Node::strong(vec![Node::text("b")]),
                Node::text(" "),
                Node::emphasis(vec![Node::text("c")]),
            ]),
            Node::ThematicBreak,
        ]);

        assert_eq!(serialize(&tree).unwrap(), "# Title\n\na **b** _c_\n\n---");
    }

    #[test]
    fn test_lists_and_tasks() {
        let tree = Node::document(vec![
            Node::list(
                true,
                vec![
                    Node::list_item(vec![Node::text("one")]),
                    Node::list_item(vec![Node::text("two")]),
                ],
            ),
            Node::list(
                false,
                vec![
                    Node::task_item(true, vec![Node::text("done")]),
                    Node::task_item(false, vec![Node::text("open")]),
                ],
            ),
        ]);

        assert_eq!(
            serialize(&tree).unwrap(),
            "1. one\n2. two\n\n- [x] done\n- [ ] open"
        );
    }

    #[test]
    fn test_block_quote_prefixes_every_line() {
        let tree = Node::block_quote(vec![
            Node::paragraph(vec![Node::text("a")]),
            Node::paragraph(vec![Node::text("b")]),
        ]);

        assert_eq!(serialize(&tree).unwrap(), "> a\n>\n> b");
    }

    #[test]
    fn test_markup_characters_in_text_are_escaped() {
        let tree = Node::paragraph(vec![Node::text("2 * 3 = 6, snake_case [sic]")]);
        let markup = serialize(&tree).unwrap();
        assert_eq!(markup, r"2 \* 3 = 6, snake\_case \[sic\]");
        // And the escape round-trips.
        assert_eq!(
            parse(&markup),
            Node::document(vec![Node::paragraph(vec![Node::text(
                "2 * 3 = 6, snake_case [sic]"
            )])])
        );
    }

    #[test]
    fn test_invalid_heading_level_is_rejected() {
        let tree = Node::heading(7, vec![Node::text("nope")]);
        assert_eq!(
            serialize(&tree),
            Err(SerializeError::InvalidHeadingLevel(7))
        );
        let tree = Node::heading(0, vec![Node::text("nope")]);
        assert_eq!(
            serialize(&tree),
            Err(SerializeError::InvalidHeadingLevel(0))
        );
    }

    #[test]
    fn test_orphan_list_item_is_rejected() {
        let tree = Node::document(vec![Node::list_item(vec![Node::text("x")])]);
        assert_eq!(serialize(&tree), Err(SerializeError::OrphanListItem));
    }

    #[test]
    fn test_list_with_non_item_child_is_rejected() {
        let tree = Node::list(false, vec![Node::paragraph(vec![Node::text("x")])]);
        assert_eq!(
            serialize(&tree),
            Err(SerializeError::InvalidListChild("paragraph".to_string()))
        );
    }

    #[test]
    fn test_inline_node_at_block_position_is_rejected() {
        let tree = Node::document(vec![Node::text("floating")]);
        assert_eq!(
            serialize(&tree),
            Err(SerializeError::InlineAtBlockPosition("text".to_string()))
        );
    }
}
