//! # Marksync Tree
//!
//! The structured content-tree representation shared by the markup engine and
//! the editor core.
//!
//! A document is materialized either as a markup string or as a [`Node`] tree;
//! this package owns the tree side. The tree is deliberately small: it covers
//! the supported content subset (headings, emphasis, links, images, lists,
//! blockquotes, rules, task items, code) and nothing else. Anything richer is
//! the job of the embedding widget, not the sync core.

pub mod html;
pub mod node;

pub use node::Node;
