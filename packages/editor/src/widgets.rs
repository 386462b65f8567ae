//! Representation widgets.
//!
//! A widget holds one representation of the document. The core ships plain
//! in-memory buffers; embedders substitute their own implementations (a rope,
//! a DOM bridge) behind the same traits. The façade shares widgets through
//! `Rc<RefCell<..>>` so lifecycle listeners can observe them mid-transition.

use std::fmt::Debug;

use marksync_tree::Node;

/// Holds the markup-source representation.
pub trait MarkupWidget: Debug {
    fn value(&self) -> String;
    fn set_value(&mut self, markup: &str);

    /// Move input focus to this widget. No-op for headless widgets.
    fn focus(&mut self) {}

    /// Release embedder resources. No-op for headless widgets.
    fn remove(&mut self) {}
}

/// Holds the content-tree representation.
pub trait TreeWidget: Debug {
    fn value(&self) -> Node;
    fn set_value(&mut self, tree: Node);

    /// Move input focus to this widget. No-op for headless widgets.
    fn focus(&mut self) {}

    /// Release embedder resources. No-op for headless widgets.
    fn remove(&mut self) {}
}

/// Receives rendered preview HTML. The core's preview listener pushes into
/// this on every markup content change.
pub trait RenderSink: Debug {
    fn render(&mut self, html: &str);
}

/// In-memory markup buffer.
#[derive(Debug, Default)]
pub struct MarkupBuffer {
    content: String,
}

impl MarkupBuffer {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl MarkupWidget for MarkupBuffer {
    fn value(&self) -> String {
        self.content.clone()
    }

    fn set_value(&mut self, markup: &str) {
        self.content = markup.to_string();
    }
}

/// In-memory tree buffer. Starts as an empty document.
#[derive(Debug, Default)]
pub struct TreeBuffer {
    root: Node,
}

impl TreeBuffer {
    pub fn new(root: Node) -> Self {
        Self { root }
    }
}

impl TreeWidget for TreeBuffer {
    fn value(&self) -> Node {
        self.root.clone()
    }

    fn set_value(&mut self, tree: Node) {
        self.root = tree;
    }
}

/// In-memory preview sink that keeps the last rendered HTML.
#[derive(Debug, Default)]
pub struct HtmlPreview {
    html: String,
}

impl HtmlPreview {
    pub fn html(&self) -> &str {
        &self.html
    }
}

impl RenderSink for HtmlPreview {
    fn render(&mut self, html: &str) {
        self.html = html.to_string();
    }
}
