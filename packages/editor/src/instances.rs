//! Process-wide instance registry.
//!
//! Editors are single-threaded objects, so the live set is tracked per
//! thread. The registry holds ids, not editors: it can never keep an editor
//! alive, and a dropped editor unregisters itself, so the set only ever
//! names editors that actually exist.

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static LIVE: RefCell<Vec<InstanceId>> = const { RefCell::new(Vec::new()) };
}

/// Opaque identity of a live editor on this thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

/// Allocate a fresh id. Does not touch the live set; registration is a
/// separate step so a failed construction never shows up in `instances()`.
pub(crate) fn allocate() -> InstanceId {
    InstanceId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
}

/// Add an id to the live set. Called by the editor façade only after
/// construction has fully succeeded.
pub(crate) fn insert(id: InstanceId) {
    LIVE.with(|live| live.borrow_mut().push(id));
}

/// Remove an id from the live set. Idempotent.
pub(crate) fn unregister(id: InstanceId) {
    LIVE.with(|live| live.borrow_mut().retain(|&other| other != id));
}

/// Ids of the editors currently alive on this thread, in creation order.
pub fn instances() -> Vec<InstanceId> {
    LIVE.with(|live| live.borrow().clone())
}

pub fn instance_count() -> usize {
    LIVE.with(|live| live.borrow().len())
}
