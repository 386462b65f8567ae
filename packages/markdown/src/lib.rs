//! # Marksync Markdown
//!
//! Reference markup engine for the supported content subset: headings,
//! emphasis, links, images, lists, task items, blockquotes, thematic breaks
//! and code.
//!
//! The engine is the backing half of the editor's converter boundary:
//!
//! - [`parse`] turns a markup string into a [`marksync_tree::Node`] tree.
//!   Parsing is total: malformed inline markup (an unclosed `**`, a stray
//!   `]`) is repaired to literal text, and an unclosed code fence runs to the
//!   end of the input. Nothing is ever silently dropped.
//! - [`serialize`] turns a tree back into canonical markup (`**strong**`,
//!   `_emphasis_`, `-` bullets, `1.` ordered markers, `>` quotes, ` ``` `
//!   fences, `---` rules). Structurally invalid trees fail with
//!   [`SerializeError`].
//!
//! Repeated round trips are not byte-stable for arbitrary input (emphasis
//! markers, bullet styles and soft line breaks are normalized) but are
//! semantically lossless: for any tree already in canonical form,
//! `parse(serialize(tree))` reproduces the tree exactly.

pub mod error;
pub mod parser;
pub mod serializer;
pub mod tokenizer;

pub use error::{SerializeError, SerializeResult};
pub use parser::{parse, Parser};
pub use serializer::{serialize, Serializer};
pub use tokenizer::{tokenize, Token};
