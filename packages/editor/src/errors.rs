//! Error types for the editor core.

use crate::convert::ConvertError;
use crate::events::EventError;
use crate::mode::EditMode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    /// Conversion between representations failed. The triggering switch or
    /// content load was aborted with no partial state.
    #[error("conversion failed: {0}")]
    Conversion(#[from] ConvertError),

    /// Dispatch to a command name nobody registered.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// The command exists, but only for the representation that is not
    /// currently active. Caught before the command can touch any state.
    #[error("command `{name}` targets the {target} representation but {active} is active")]
    CommandTargetMismatch {
        name: String,
        active: EditMode,
        target: EditMode,
    },

    /// A command body failed.
    #[error("command `{name}` failed: {message}")]
    CommandFailed { name: String, message: String },

    /// A listener or emit failed; see [`EventError`].
    #[error(transparent)]
    Event(#[from] EventError),

    /// Construction referenced an extension nobody defined.
    #[error("unknown extension: {0}")]
    UnknownExtension(String),

    /// Invalid construction configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}
