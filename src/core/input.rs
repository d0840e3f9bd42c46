// Author: Dustin Pilgrim
// License: MIT

use std::sync::{Arc, Mutex};

use crate::core::events::ActivityKind;
use crate::core::utils::lock;

/// Callback attached for one event kind.
pub type Listener = Arc<dyn Fn(ActivityKind) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Source of named interaction events.
///
/// Attaching and detaching is infallible; detaching an unknown id is a no-op.
pub trait InputSource: Send + Sync {
    fn add_listener(&self, kind: ActivityKind, listener: Listener) -> ListenerId;
    fn remove_listener(&self, id: ListenerId);
}

struct Entry {
    id: ListenerId,
    kind: ActivityKind,
    listener: Listener,
}

#[derive(Default)]
struct BusInner {
    next_id: u64,
    entries: Vec<Entry>,
}

/// In-process input source fed by the IPC `input` command.
#[derive(Default)]
pub struct InputBus {
    inner: Mutex<BusInner>,
}

impl InputBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch one event. Returns how many listeners saw it.
    pub fn emit(&self, kind: ActivityKind) -> usize {
        // Listeners run outside the lock so they may touch the bus themselves.
        let targets: Vec<Listener> = lock(&self.inner)
            .entries
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| Arc::clone(&e.listener))
            .collect();

        for l in &targets {
            l(kind);
        }

        targets.len()
    }

    #[cfg(test)]
    pub fn listener_count(&self) -> usize {
        lock(&self.inner).entries.len()
    }
}

impl InputSource for InputBus {
    fn add_listener(&self, kind: ActivityKind, listener: Listener) -> ListenerId {
        let mut inner = lock(&self.inner);
        inner.next_id = inner.next_id.wrapping_add(1);
        let id = ListenerId(inner.next_id);
        inner.entries.push(Entry { id, kind, listener });
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        lock(&self.inner).entries.retain(|e| e.id != id);
    }
}
