use thiserror::Error;

pub type SerializeResult<T> = Result<T, SerializeError>;

/// Structural failures when serializing a tree back to markup.
///
/// Parsing has no error type: markup input is always repaired (see the crate
/// docs). Serialization is strict instead, so that a malformed tree pushed in
/// by an embedder surfaces before it can corrupt the markup representation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SerializeError {
    #[error("heading level {0} is outside 1..=6")]
    InvalidHeadingLevel(u8),

    #[error("list item found outside of a list")]
    OrphanListItem,

    #[error("list contains a non-item node: {0}")]
    InvalidListChild(String),

    #[error("inline node {0} found at block position")]
    InlineAtBlockPosition(String),

    #[error("block node {0} found at inline position")]
    BlockAtInlinePosition(String),
}
