//! # Marksync Editor
//!
//! Synchronization core for a dual-mode document editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │ Editor façade: construction sequencing,         │
//! │ set/get value, command dispatch, teardown       │
//! └─────────────────────────────────────────────────┘
//!        │               │                │
//! ┌─────────────┐ ┌──────────────┐ ┌──────────────┐
//! │ EventHub    │ │ Command      │ │ ModeMachine  │
//! │ pub/sub     │ │ Registry     │ │ markup⇄tree  │
//! └─────────────┘ └──────────────┘ └──────────────┘
//!                                        │
//!                                 ┌──────────────┐
//!                                 │ Converter    │
//!                                 │ boundary     │
//!                                 └──────────────┘
//! ```
//!
//! ## Core principles
//!
//! 1. **One authoritative representation at a time**: the document lives in a
//!    markup string or a content tree; the other side is regenerated on mode
//!    switch, never mutated directly.
//! 2. **Atomic transitions**: a mode switch that fails to convert leaves the
//!    mode and both representations untouched.
//! 3. **Uniform dispatch**: commands are registered per target representation
//!    but executed against whichever one is active at call time.
//! 4. **No silent failures**: conversion, dispatch and listener errors all
//!    surface to the direct caller.
//!
//! Everything runs synchronously on the calling thread; there is no
//! background scheduling anywhere in the core.

pub mod commands;
pub mod convert;
pub mod editor;
pub mod errors;
pub mod events;
pub mod ext;
pub mod instances;
pub mod mode;
pub mod widgets;

pub use commands::{Command, CommandAction, CommandContext, CommandRegistry, CommandResult};
pub use convert::{ConvertError, Converter, MarkdownConverter};
pub use editor::{Editor, EditorConfig};
pub use errors::EditorError;
pub use events::{
    channels, EventError, EventHub, EventPayload, ListenerHandle, ListenerResult, MAX_EMIT_DEPTH,
};
pub use ext::define_extension;
pub use instances::{instance_count, instances, InstanceId};
pub use mode::{EditMode, ModeMachine};
pub use widgets::{HtmlPreview, MarkupBuffer, MarkupWidget, RenderSink, TreeBuffer, TreeWidget};

// Re-export the tree type for convenience
pub use marksync_tree::Node;
