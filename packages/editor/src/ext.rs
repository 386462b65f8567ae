//! Named extensions.
//!
//! An extension is a setup function registered process-wide under a name;
//! editor configs opt in by name and the function runs against the editor at
//! the end of construction, after structural wiring but before the initial
//! lifecycle events. Typical extensions register commands or listeners.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;

use crate::editor::Editor;
use crate::errors::EditorError;

type ExtensionFn = dyn Fn(&mut Editor) -> Result<(), EditorError> + Send + Sync;

static EXTENSIONS: Lazy<Mutex<HashMap<String, Arc<ExtensionFn>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Define (or redefine) the extension `name`.
pub fn define_extension<F>(name: impl Into<String>, setup: F)
where
    F: Fn(&mut Editor) -> Result<(), EditorError> + Send + Sync + 'static,
{
    let name = name.into();
    tracing::debug!(extension = %name, "extension defined");
    let mut table = EXTENSIONS.lock().unwrap_or_else(|poison| poison.into_inner());
    table.insert(name, Arc::new(setup));
}

/// Look up a defined extension by name.
pub(crate) fn lookup(name: &str) -> Option<Arc<ExtensionFn>> {
    let table = EXTENSIONS.lock().unwrap_or_else(|poison| poison.into_inner());
    table.get(name).cloned()
}
