//! Copy-on-write listener registry.
//!
//! Readers load the current listener list without locking; a registration
//! publishes a new list containing the added listener. A dispatch pass that
//! already loaded a snapshot keeps iterating its own copy, so listeners
//! registered mid-pass only see later events.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::trace;

use crate::metrics::REGISTERED_LISTENERS;
use crate::ZooKeeperListener;

pub type ListenerRef = Arc<dyn ZooKeeperListener>;

/// Listeners visible to one dispatch pass
pub type ListenerSnapshot = Arc<Vec<ListenerRef>>;

pub struct ListenerRegistry {
    listeners: ArcSwap<Vec<ListenerRef>>,
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry").field("len", &self.len()).finish()
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self {
            listeners: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Add `listener` unless the same instance is already registered.
    ///
    /// Never blocks behind a running dispatch. Returns `false` when the
    /// listener was already present.
    pub fn register(
        &self,
        listener: ListenerRef,
    ) -> bool {
        let mut added = false;
        self.listeners.rcu(|current| {
            if current.iter().any(|l| Arc::ptr_eq(l, &listener)) {
                added = false;
                return Arc::clone(current);
            }
            added = true;
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            next.push(Arc::clone(&listener));
            Arc::new(next)
        });

        if added {
            REGISTERED_LISTENERS.inc();
            trace!(listeners = self.len(), "Listener registered");
        }
        added
    }

    /// Current listeners, isolated from later registrations
    pub fn snapshot(&self) -> ListenerSnapshot {
        self.listeners.load_full()
    }

    pub fn len(&self) -> usize {
        self.listeners.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
