//! # Event Hub
//!
//! Named-channel synchronous publish/subscribe.
//!
//! ## Contract
//!
//! - Channels are string names, created implicitly on first registration.
//!   Dot-separated namespaces (`changeMode.markup`) are a naming convention,
//!   not a hierarchy: emitting `changeMode` does not reach `changeMode.*`.
//! - Listeners run in registration order. Emitting on a channel with no
//!   listeners is not an error.
//! - A failing listener aborts the remaining fan-out for that emit and the
//!   error surfaces to the emitter unwrapped in source position. The hub
//!   performs no isolation and no retries.
//! - Emission is re-entrant: a listener may emit, including on the channel
//!   being dispatched. Nesting is bounded by [`MAX_EMIT_DEPTH`]; past it
//!   `emit` fails fast with [`EventError::CyclicEmit`] instead of overflowing
//!   the stack.
//!
//! Each emit dispatches over a snapshot of the channel's listener list taken
//! when it begins: listeners registered during a dispatch run on the next
//! emit, listeners unregistered during a dispatch no longer run, and a nested
//! emit on the same channel reaches every listener except the one whose
//! callback is already running further up the stack.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

use crate::mode::EditMode;

/// Upper bound on synchronous emit nesting.
pub const MAX_EMIT_DEPTH: usize = 16;

/// Error type listeners may return; surfaced unwrapped through `emit`.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

pub type ListenerResult = Result<(), ListenerError>;

type Callback = Box<dyn FnMut(&EventPayload) -> ListenerResult>;

/// Typed event payload. Channel names and payload shapes are part of the
/// compatibility surface for embedders binding hooks.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    /// No payload (mode lifecycle events carry the mode in the channel name).
    None,
    /// A text payload: the mode name on `changeMode`, the markup source on
    /// `contentChanged.*`.
    Text(String),
    /// Structured payload for embedder-defined channels.
    Value(serde_json::Value),
}

impl EventPayload {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            EventPayload::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Channel names produced and consumed by the core.
pub mod channels {
    use super::EditMode;

    pub const CHANGE_MODE: &str = "changeMode";
    pub const CHANGE_MODE_MARKUP: &str = "changeMode.markup";
    pub const CHANGE_MODE_TREE: &str = "changeMode.tree";
    pub const CONTENT_CHANGED_MARKUP: &str = "contentChanged.markup";
    pub const CONTENT_CHANGED_TREE: &str = "contentChanged.tree";

    /// Mode-specific lifecycle channel for a target mode.
    pub fn change_mode_for(mode: EditMode) -> &'static str {
        match mode {
            EditMode::Markup => CHANGE_MODE_MARKUP,
            EditMode::Tree => CHANGE_MODE_TREE,
        }
    }

    /// Content-changed channel for a source representation.
    pub fn content_changed_for(mode: EditMode) -> &'static str {
        match mode {
            EditMode::Markup => CONTENT_CHANGED_MARKUP,
            EditMode::Tree => CONTENT_CHANGED_TREE,
        }
    }
}

#[derive(Error, Debug)]
pub enum EventError {
    /// A listener returned an error; remaining listeners were not invoked.
    #[error("listener on channel `{channel}` failed: {source}")]
    Listener {
        channel: String,
        source: ListenerError,
    },

    /// Emit nesting exceeded [`MAX_EMIT_DEPTH`].
    #[error("emit depth {depth} exceeded on channel `{channel}`; listener cycle suspected")]
    CyclicEmit { channel: String, depth: usize },
}

/// Handle returned by [`EventHub::listen`], used to unsubscribe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerHandle {
    channel: String,
    id: u64,
}

impl ListenerHandle {
    pub fn channel(&self) -> &str {
        &self.channel
    }
}

struct Registration {
    id: u64,
    // Shared with in-flight dispatch snapshots; borrowed only while the
    // callback runs.
    callback: Rc<RefCell<Callback>>,
}

#[derive(Default)]
struct HubState {
    channels: HashMap<String, Vec<Registration>>,
    next_id: u64,
    depth: usize,
}

/// Synchronous publish/subscribe hub. Cheap to clone; clones share state.
#[derive(Clone, Default)]
pub struct EventHub {
    state: Rc<RefCell<HubState>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` on `channel`, appended after existing listeners.
    pub fn listen<F>(&self, channel: impl Into<String>, callback: F) -> ListenerHandle
    where
        F: FnMut(&EventPayload) -> ListenerResult + 'static,
    {
        let channel = channel.into();
        let callback: Callback = Box::new(callback);
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = state.next_id;
        state
            .channels
            .entry(channel.clone())
            .or_default()
            .push(Registration {
                id,
                callback: Rc::new(RefCell::new(callback)),
            });
        ListenerHandle { channel, id }
    }

    /// Remove a previously registered listener. Takes effect immediately,
    /// even mid-dispatch. Unsubscribing twice, or with a handle from another
    /// hub, is a no-op.
    pub fn unlisten(&self, handle: &ListenerHandle) {
        let mut state = self.state.borrow_mut();
        if let Some(list) = state.channels.get_mut(&handle.channel) {
            if let Some(pos) = list.iter().position(|r| r.id == handle.id) {
                list.remove(pos);
            }
        }
    }

    /// Invoke every listener registered on `channel`, in registration order,
    /// synchronously on the calling thread.
    pub fn emit(&self, channel: &str, payload: &EventPayload) -> Result<(), EventError> {
        let snapshot: Vec<(u64, Rc<RefCell<Callback>>)> = {
            let mut state = self.state.borrow_mut();
            if state.depth >= MAX_EMIT_DEPTH {
                return Err(EventError::CyclicEmit {
                    channel: channel.to_string(),
                    depth: state.depth,
                });
            }
            state.depth += 1;
            state
                .channels
                .get(channel)
                .map(|list| {
                    list.iter()
                        .map(|r| (r.id, r.callback.clone()))
                        .collect()
                })
                .unwrap_or_default()
        };

        let mut result = Ok(());
        for (id, callback) in snapshot {
            let still_registered = self
                .state
                .borrow()
                .channels
                .get(channel)
                .is_some_and(|list| list.iter().any(|r| r.id == id));
            if !still_registered {
                continue;
            }
            // A callback already running further up the stack (a same-channel
            // nested emit) is skipped; everyone else is reached.
            let outcome = match callback.try_borrow_mut() {
                Ok(mut callback) => callback(payload),
                Err(_) => continue,
            };
            if let Err(source) = outcome {
                result = Err(EventError::Listener {
                    channel: channel.to_string(),
                    source,
                });
                break;
            }
        }

        self.state.borrow_mut().depth -= 1;
        result
    }

    /// Number of listeners currently registered on `channel`.
    pub fn listener_count(&self, channel: &str) -> usize {
        self.state
            .borrow()
            .channels
            .get(channel)
            .map(|l| l.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&str) -> Callback) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log2 = log.clone();
        let make = move |tag: &str| -> Callback {
            let log = log2.clone();
            let tag = tag.to_string();
            Box::new(move |_payload: &EventPayload| -> ListenerResult {
                log.borrow_mut().push(tag.clone());
                Ok(())
            })
        };
        (log, make)
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let hub = EventHub::new();
        let (log, make) = recorder();
        hub.listen("ch", make("first"));
        hub.listen("ch", make("second"));
        hub.listen("other", make("elsewhere"));

        hub.emit("ch", &EventPayload::None).unwrap();
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_emit_on_unknown_channel_is_ok() {
        let hub = EventHub::new();
        assert!(hub.emit("nobody", &EventPayload::None).is_ok());
    }

    #[test]
    fn test_failing_listener_aborts_remaining_fanout() {
        let hub = EventHub::new();
        let (log, make) = recorder();
        hub.listen("ch", make("before"));
        hub.listen("ch", |_: &EventPayload| -> ListenerResult {
            Err("boom".into())
        });
        hub.listen("ch", make("after"));

        let err = hub.emit("ch", &EventPayload::None).unwrap_err();
        assert!(matches!(err, EventError::Listener { .. }));
        assert_eq!(*log.borrow(), vec!["before"]);

        // The hub is intact afterwards.
        hub.listen("ch2", make("ok"));
        hub.emit("ch2", &EventPayload::None).unwrap();
        assert_eq!(hub.listener_count("ch"), 3);
    }

    #[test]
    fn test_unlisten_removes_listener() {
        let hub = EventHub::new();
        let (log, make) = recorder();
        let handle = hub.listen("ch", make("gone"));
        hub.listen("ch", make("stays"));

        hub.unlisten(&handle);
        hub.emit("ch", &EventPayload::None).unwrap();
        assert_eq!(*log.borrow(), vec!["stays"]);

        // Idempotent: stale handles, however often replayed, change nothing.
        for _ in 0..8 {
            hub.unlisten(&handle);
        }
        assert_eq!(hub.listener_count("ch"), 1);
        hub.emit("ch", &EventPayload::None).unwrap();
        assert_eq!(*log.borrow(), vec!["stays", "stays"]);
    }

    #[test]
    fn test_listener_registered_during_emit_runs_next_time() {
        let hub = EventHub::new();
        let (log, make) = recorder();
        let inner = make("late");
        let hub2 = hub.clone();
        let inner = RefCell::new(Some(inner));
        hub.listen("ch", move |_| {
            if let Some(callback) = inner.borrow_mut().take() {
                hub2.listen("ch", callback);
            }
            Ok(())
        });
        hub.listen("ch", make("early"));

        hub.emit("ch", &EventPayload::None).unwrap();
        assert_eq!(*log.borrow(), vec!["early"]);

        hub.emit("ch", &EventPayload::None).unwrap();
        assert_eq!(*log.borrow(), vec!["early", "early", "late"]);
    }

    #[test]
    fn test_nested_emit_on_same_channel_reaches_other_listeners() {
        let hub = EventHub::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let hub2 = hub.clone();
        let first_log = log.clone();
        let reemitted = RefCell::new(false);
        hub.listen("ch", move |payload: &EventPayload| {
            first_log.borrow_mut().push("a");
            let first_pass = !*reemitted.borrow();
            if first_pass {
                *reemitted.borrow_mut() = true;
                hub2.emit("ch", payload)?;
            }
            Ok(())
        });
        let second_log = log.clone();
        hub.listen("ch", move |_| {
            second_log.borrow_mut().push("b");
            Ok(())
        });

        hub.emit("ch", &EventPayload::None).unwrap();
        // The nested emit skips "a" (its callback is on the stack) but still
        // reaches "b"; the outer dispatch then reaches "b" again.
        assert_eq!(*log.borrow(), vec!["a", "b", "b"]);
    }

    #[test]
    fn test_unlisten_during_emit_takes_effect_immediately() {
        let hub = EventHub::new();
        let (log, make) = recorder();
        let doomed: Rc<RefCell<Option<ListenerHandle>>> = Rc::new(RefCell::new(None));
        let hub2 = hub.clone();
        let doomed2 = doomed.clone();
        hub.listen("ch", move |_| {
            if let Some(handle) = doomed2.borrow_mut().take() {
                hub2.unlisten(&handle);
            }
            Ok(())
        });
        let handle = hub.listen("ch", make("never"));
        *doomed.borrow_mut() = Some(handle);

        hub.emit("ch", &EventPayload::None).unwrap();
        assert!(log.borrow().is_empty());
        assert_eq!(hub.listener_count("ch"), 1);
    }

    #[test]
    fn test_cyclic_chain_fails_fast_past_max_depth() {
        let hub = EventHub::new();
        // A chain longer than the depth bound; each channel forwards to the
        // next, so one emit nests linearly.
        for i in 0..MAX_EMIT_DEPTH + 4 {
            let hub2 = hub.clone();
            let next = format!("ch{}", i + 1);
            hub.listen(format!("ch{}", i), move |payload: &EventPayload| {
                hub2.emit(&next, payload)?;
                Ok(())
            });
        }

        let err = hub.emit("ch0", &EventPayload::None).unwrap_err();
        assert!(format!("{:?}", err).contains("CyclicEmit"));
    }

    #[test]
    fn test_payload_reaches_listeners() {
        let hub = EventHub::new();
        let seen = Rc::new(RefCell::new(None));
        let seen2 = seen.clone();
        hub.listen("ch", move |payload: &EventPayload| {
            *seen2.borrow_mut() = payload.as_text().map(str::to_string);
            Ok(())
        });

        hub.emit("ch", &EventPayload::Text("markup".into())).unwrap();
        assert_eq!(seen.borrow().as_deref(), Some("markup"));
    }
}
