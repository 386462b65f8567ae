//! # Markup Parser
//!
//! Line-oriented block parser on top of the logos inline tokenizer.
//!
//! Parsing is total. The repair policy (documented in the crate docs) keeps
//! every character of the input somewhere in the tree:
//! - unmatched inline markers (`**`, `_`, `` ` ``, `[`) become literal text
//! - an unclosed code fence runs to the end of the input
//! - indented block markers are treated as if flush left, so nested lists are
//!   normalized to flat lists with their content intact
//! - a line break inside a paragraph is normalized to a space

use crate::tokenizer::{tokenize, Token};
use marksync_tree::Node;
use std::ops::Range;

/// Parse a markup document into a content tree.
pub fn parse(source: &str) -> Node {
    Parser::new(source).parse_document()
}

/// Parser over a markup source string.
pub struct Parser<'src> {
    lines: Vec<&'src str>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            lines: source.lines().collect(),
        }
    }

    /// Parse the whole source into a `Document` node.
    pub fn parse_document(&self) -> Node {
        Node::Document {
            children: parse_blocks(&self.lines),
        }
    }
}

fn parse_blocks(lines: &[&str]) -> Vec<Node> {
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim();

        if line.is_empty() {
            i += 1;
            continue;
        }

        if let Some((level, rest)) = heading_marker(line) {
            blocks.push(Node::Heading {
                level,
                children: parse_inline(rest),
            });
            i += 1;
            continue;
        }

        if is_thematic_break(line) {
            blocks.push(Node::ThematicBreak);
            i += 1;
            continue;
        }

        if let Some(language) = fence_marker(line) {
            let (block, next) = parse_code_block(lines, i + 1, language);
            blocks.push(block);
            i = next;
            continue;
        }

        if line.starts_with('>') {
            let mut inner: Vec<&str> = Vec::new();
            while i < lines.len() {
                match quote_content(lines[i].trim()) {
                    Some(rest) => {
                        inner.push(rest);
                        i += 1;
                    }
                    None => break,
                }
            }
            blocks.push(Node::BlockQuote {
                children: parse_blocks(&inner),
            });
            continue;
        }

        if bullet_marker(line).is_some() {
            let mut items = Vec::new();
            while i < lines.len() {
                match bullet_marker(lines[i].trim()) {
                    Some(rest) => {
                        items.push(parse_list_item(rest));
                        i += 1;
                    }
                    None => break,
                }
            }
            blocks.push(Node::List {
                ordered: false,
                items,
            });
            continue;
        }

        if ordered_marker(line).is_some() {
            let mut items = Vec::new();
            while i < lines.len() {
                match ordered_marker(lines[i].trim()) {
                    Some(rest) => {
                        items.push(parse_list_item(rest));
                        i += 1;
                    }
                    None => break,
                }
            }
            blocks.push(Node::List {
                ordered: true,
                items,
            });
            continue;
        }

        // Paragraph: consecutive plain lines, soft breaks normalized to spaces.
        let mut para = vec![line];
        i += 1;
        while i < lines.len() {
            let next = lines[i].trim();
            if next.is_empty() || starts_block(next) {
                break;
            }
            para.push(next);
            i += 1;
        }
        blocks.push(Node::Paragraph {
            children: parse_inline(&para.join(" ")),
        });
    }

    blocks
}

fn starts_block(line: &str) -> bool {
    heading_marker(line).is_some()
        || is_thematic_break(line)
        || fence_marker(line).is_some()
        || line.starts_with('>')
        || bullet_marker(line).is_some()
        || ordered_marker(line).is_some()
}

fn heading_marker(line: &str) -> Option<(u8, &str)> {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &line[hashes..];
    if rest.is_empty() {
        return Some((hashes as u8, rest));
    }
    rest.strip_prefix(' ').map(|rest| (hashes as u8, rest))
}

fn is_thematic_break(line: &str) -> bool {
    let mut marker = None;
    let mut count = 0;
    for ch in line.chars() {
        if ch.is_whitespace() {
            continue;
        }
        match marker {
            None if ch == '-' || ch == '*' || ch == '_' => marker = Some(ch),
            Some(m) if ch == m => {}
            _ => return false,
        }
        count += 1;
    }
    count >= 3
}

fn fence_marker(line: &str) -> Option<Option<String>> {
    let rest = line.strip_prefix("```")?;
    let language = rest.trim();
    if language.is_empty() {
        Some(None)
    } else {
        Some(Some(language.to_string()))
    }
}

fn parse_code_block(lines: &[&str], mut i: usize, language: Option<String>) -> (Node, usize) {
    let mut body: Vec<&str> = Vec::new();
    while i < lines.len() {
        if lines[i].trim() == "```" {
            i += 1;
            return (
                Node::CodeBlock {
                    language,
                    literal: body.join("\n"),
                },
                i,
            );
        }
        body.push(lines[i]);
        i += 1;
    }
    // Unclosed fence: the rest of the document is the code block.
    (
        Node::CodeBlock {
            language,
            literal: body.join("\n"),
        },
        i,
    )
}

fn quote_content(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('>')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

fn bullet_marker(line: &str) -> Option<&str> {
    for marker in ["- ", "* ", "+ "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return Some(rest);
        }
    }
    None
}

fn ordered_marker(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || digits > 9 {
        return None;
    }
    line[digits..].strip_prefix(". ")
}

fn parse_list_item(content: &str) -> Node {
    let (checked, content) = if let Some(rest) = content.strip_prefix("[ ] ") {
        (Some(false), rest)
    } else if let Some(rest) = content
        .strip_prefix("[x] ")
        .or_else(|| content.strip_prefix("[X] "))
    {
        (Some(true), rest)
    } else {
        (None, content)
    };

    Node::ListItem {
        checked,
        children: parse_inline(content),
    }
}

/// Parse inline markup into a list of inline nodes.
pub(crate) fn parse_inline(source: &str) -> Vec<Node> {
    let tokens = tokenize(source);
    inline_nodes(source, &tokens)
}

fn inline_nodes(source: &str, tokens: &[(Token, Range<usize>)]) -> Vec<Node> {
    let mut nodes: Vec<Node> = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let (token, span) = &tokens[i];
        match token {
            Token::Text => {
                push_text(&mut nodes, &source[span.clone()]);
                i += 1;
            }
            Token::Escaped => {
                push_text(&mut nodes, &source[span.start + 1..span.end]);
                i += 1;
            }
            Token::StrongStar | Token::StrongUnder => {
                match find_token(tokens, i + 1, *token) {
                    Some(close) => {
                        nodes.push(Node::Strong {
                            children: inline_nodes(source, &tokens[i + 1..close]),
                        });
                        i = close + 1;
                    }
                    None => {
                        push_text(&mut nodes, &source[span.clone()]);
                        i += 1;
                    }
                }
            }
            Token::EmStar | Token::EmUnder => match find_token(tokens, i + 1, *token) {
                Some(close) => {
                    nodes.push(Node::Emphasis {
                        children: inline_nodes(source, &tokens[i + 1..close]),
                    });
                    i = close + 1;
                }
                None => {
                    push_text(&mut nodes, &source[span.clone()]);
                    i += 1;
                }
            },
            Token::Backtick => match find_token(tokens, i + 1, Token::Backtick) {
                Some(close) => {
                    let literal = &source[span.end..tokens[close].1.start];
                    nodes.push(Node::Code {
                        literal: literal.to_string(),
                    });
                    i = close + 1;
                }
                None => {
                    push_text(&mut nodes, "`");
                    i += 1;
                }
            },
            Token::BracketOpen => match parse_span_tail(source, tokens, i) {
                Some((text_end, url, title, next)) => {
                    nodes.push(Node::Link {
                        url,
                        title,
                        children: inline_nodes(source, &tokens[i + 1..text_end]),
                    });
                    i = next;
                }
                None => {
                    push_text(&mut nodes, "[");
                    i += 1;
                }
            },
            Token::ImageOpen => match parse_span_tail(source, tokens, i) {
                Some((text_end, url, title, next)) => {
                    nodes.push(Node::Image {
                        url,
                        title,
                        alt: plain_text(source, &tokens[i + 1..text_end]),
                    });
                    i = next;
                }
                None => {
                    push_text(&mut nodes, "![");
                    i += 1;
                }
            },
            Token::BracketClose | Token::ParenOpen | Token::ParenClose => {
                push_text(&mut nodes, &source[span.clone()]);
                i += 1;
            }
        }
    }

    nodes
}

/// Parse the `text](dest)` tail shared by links and images, starting at the
/// opening token. Returns (index of `]`, url, title, index past `)`).
fn parse_span_tail(
    source: &str,
    tokens: &[(Token, Range<usize>)],
    open: usize,
) -> Option<(usize, String, Option<String>, usize)> {
    let text_end = find_token(tokens, open + 1, Token::BracketClose)?;
    if tokens.get(text_end + 1).map(|(t, _)| *t) != Some(Token::ParenOpen) {
        return None;
    }
    let dest_end = find_token(tokens, text_end + 2, Token::ParenClose)?;
    let dest = &source[tokens[text_end + 1].1.end..tokens[dest_end].1.start];
    let (url, title) = split_destination(dest);
    Some((text_end, url, title, dest_end + 1))
}

/// Split a link destination into url and optional quoted title,
/// e.g. `https://x "The title"`.
fn split_destination(dest: &str) -> (String, Option<String>) {
    let dest = dest.trim();
    if dest.ends_with('"') {
        if let Some(idx) = dest.find(" \"") {
            // The quote opening the title must not be the trailing quote
            // itself; a destination like `a "` is just a url.
            if idx + 3 <= dest.len() {
                let url = dest[..idx].trim().to_string();
                let title = dest[idx + 2..dest.len() - 1].to_string();
                return (url, Some(title));
            }
        }
    }
    (dest.to_string(), None)
}

/// Flatten a token slice back to plain text, resolving escapes. Used for
/// image alt text, which is a string rather than a node list.
fn plain_text(source: &str, tokens: &[(Token, Range<usize>)]) -> String {
    let mut out = String::new();
    for (token, span) in tokens {
        match token {
            Token::Escaped => out.push_str(&source[span.start + 1..span.end]),
            _ => out.push_str(&source[span.clone()]),
        }
    }
    out
}

fn find_token(tokens: &[(Token, Range<usize>)], from: usize, needle: Token) -> Option<usize> {
    tokens[from..]
        .iter()
        .position(|(t, _)| *t == needle)
        .map(|offset| from + offset)
}

fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text { literal }) = nodes.last_mut() {
        literal.push_str(text);
        return;
    }
    nodes.push(Node::Text {
        literal: text.to_string(),
    });
}
