//! # Mode State Machine
//!
//! Governs which representation is authoritative and performs the
//! re-conversion on transition.
//!
//! ## Transition semantics
//!
//! `switch_to(target)` on the already-active mode is a no-op: no conversion,
//! no events, content untouched. Otherwise the machine reads the outgoing
//! representation, converts, writes the incoming one, flips the mode field
//! and emits `changeMode.<target>` followed by `changeMode`. The ordering is
//! contractual: listeners on the specific channel observe the incoming
//! representation already populated, and listeners on the generic channel may
//! rely on the specific channel's side effects having completed.
//!
//! A conversion failure aborts the transition atomically: the mode field and
//! both representations are exactly as they were, and no lifecycle event
//! fires.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::convert::Converter;
use crate::errors::EditorError;
use crate::events::{channels, EventHub, EventPayload};
use crate::widgets::{MarkupWidget, TreeWidget};

/// Which representation is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    Markup,
    Tree,
}

impl EditMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditMode::Markup => "markup",
            EditMode::Tree => "tree",
        }
    }

    /// The other mode.
    pub fn other(&self) -> EditMode {
        match self {
            EditMode::Markup => EditMode::Tree,
            EditMode::Tree => EditMode::Markup,
        }
    }
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditMode {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "markup" => Ok(EditMode::Markup),
            "tree" => Ok(EditMode::Tree),
            other => Err(EditorError::Config(format!("unknown edit mode `{other}`"))),
        }
    }
}

/// Collaborators a transition needs, borrowed from the façade for the
/// duration of one `switch_to` call.
pub struct SwitchContext<'a> {
    pub converter: &'a dyn Converter,
    pub markup: &'a Rc<RefCell<dyn MarkupWidget>>,
    pub tree: &'a Rc<RefCell<dyn TreeWidget>>,
    pub hub: &'a EventHub,
}

/// The mode state machine. Owns the current-mode field; nothing else mutates
/// it.
#[derive(Debug)]
pub struct ModeMachine {
    current: EditMode,
}

impl ModeMachine {
    pub fn new(initial: EditMode) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> EditMode {
        self.current
    }

    pub fn is(&self, mode: EditMode) -> bool {
        self.current == mode
    }

    /// Transition to `target`. Returns `Ok(false)` for a no-op switch to the
    /// already-active mode, `Ok(true)` for a completed transition.
    ///
    /// Transitions are synchronous and atomic from the caller's perspective:
    /// on a conversion error nothing has changed and no event has fired.
    pub fn switch_to(
        &mut self,
        target: EditMode,
        ctx: SwitchContext<'_>,
    ) -> Result<bool, EditorError> {
        if target == self.current {
            return Ok(false);
        }

        match target {
            EditMode::Tree => {
                let markup = ctx.markup.borrow().value();
                let tree = ctx.converter.to_tree(&markup)?;
                ctx.tree.borrow_mut().set_value(tree);
            }
            EditMode::Markup => {
                let tree = ctx.tree.borrow().value();
                let markup = ctx.converter.to_markup(&tree)?;
                ctx.markup.borrow_mut().set_value(&markup);
            }
        }

        self.current = target;
        tracing::debug!(mode = %target, "mode switched");

        ctx.hub
            .emit(channels::change_mode_for(target), &EventPayload::None)?;
        ctx.hub.emit(
            channels::CHANGE_MODE,
            &EventPayload::Text(target.as_str().to_string()),
        )?;

        Ok(true)
    }
}
