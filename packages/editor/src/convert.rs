//! # Converter Boundary
//!
//! The single seam between the markup representation and the content tree.
//! The façade and the mode machine only ever talk to [`Converter`]; the
//! concrete markdown engine lives behind [`MarkdownConverter`].

use marksync_markdown as markdown;
use marksync_tree::{html, Node};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    /// Markup could not be turned into a tree.
    #[error("cannot parse markup: {0}")]
    Parse(String),

    /// The tree has a shape the markup grammar cannot express.
    #[error(transparent)]
    Serialize(#[from] markdown::SerializeError),
}

/// Bidirectional conversion between the two representations.
///
/// Implementations must be pure with respect to editor state: a converter
/// never touches widgets or the event hub, and a failed call must leave no
/// trace. Round-trip fidelity (`to_tree` then `to_markup` preserving
/// document structure) is the converter's responsibility; the mode machine
/// assumes it.
pub trait Converter {
    /// Parse markup into a content tree.
    fn to_tree(&self, markup: &str) -> Result<Node, ConvertError>;

    /// Serialize a content tree back to markup.
    fn to_markup(&self, tree: &Node) -> Result<String, ConvertError>;

    /// Render markup to preview HTML. Goes through the tree so the preview
    /// and the tree representation can never disagree.
    fn to_html(&self, markup: &str) -> Result<String, ConvertError> {
        let tree = self.to_tree(markup)?;
        Ok(html::render(&tree))
    }
}

/// Default converter backed by the `marksync-markdown` engine.
///
/// Parsing is total under the engine's repair policy, so `to_tree` cannot
/// fail here; the fallible signature belongs to the boundary, where stricter
/// grammars plug in.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownConverter;

impl Converter for MarkdownConverter {
    fn to_tree(&self, markup: &str) -> Result<Node, ConvertError> {
        Ok(markdown::parse(markup))
    }

    fn to_markup(&self, tree: &Node) -> Result<String, ConvertError> {
        Ok(markdown::serialize(tree)?)
    }
}
