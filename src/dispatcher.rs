//! Single entry point for coordination-service events.
//!
//! The transport calls [`Watcher::process`] on its delivery thread for every
//! event of the session. Connection status changes go to the
//! [`ConnectionStateMachine`]; znode changes fan out to a snapshot of the
//! [`ListenerRegistry`]. Fan-out is synchronous: the delivery thread is held
//! until every listener in the snapshot has returned.

use std::sync::Arc;

use tracing::debug;
use tracing::trace;

use crate::metrics::EVENTS_RECEIVED;
use crate::Abortable;
use crate::ConnectionAction;
use crate::ConnectionStateMachine;
use crate::EventType;
use crate::ListenerRef;
use crate::ListenerRegistry;
use crate::WatchedEvent;
use crate::Watcher;
use crate::ZooKeeperListener;

/// How a single event was routed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// Handled by the connection state machine
    Connection(ConnectionAction),
    /// Delivered to this many listeners
    Listeners(usize),
    /// Event kind not routed anywhere
    Ignored,
}

pub struct EventDispatcher {
    name: Arc<str>,
    listeners: ListenerRegistry,
    connection: ConnectionStateMachine,
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("name", &self.name)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl EventDispatcher {
    pub fn new(
        name: Arc<str>,
        abortable: Option<Arc<dyn Abortable>>,
    ) -> Self {
        Self {
            connection: ConnectionStateMachine::new(name.clone(), abortable),
            listeners: ListenerRegistry::new(),
            name,
        }
    }

    pub fn register_listener(
        &self,
        listener: ListenerRef,
    ) -> bool {
        self.listeners.register(listener)
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn dispatch(
        &self,
        event: &WatchedEvent,
    ) -> Dispatched {
        debug!(
            "<{}> Received ZooKeeper Event, type={}, state={}, path={}",
            self.name,
            event.event_type,
            event.state,
            event.path().unwrap_or("null")
        );
        EVENTS_RECEIVED.with_label_values(&[event.event_type.as_str()]).inc();

        let callback: fn(&dyn ZooKeeperListener, &str) = match event.event_type {
            EventType::None => {
                return Dispatched::Connection(self.connection.on_state(event.state));
            }
            EventType::NodeCreated => |l, p| l.node_created(p),
            EventType::NodeDeleted => |l, p| l.node_deleted(p),
            EventType::NodeDataChanged => |l, p| l.node_data_changed(p),
            EventType::NodeChildrenChanged => |l, p| l.node_children_changed(p),
            EventType::DataWatchRemoved | EventType::ChildWatchRemoved | EventType::PersistentWatchRemoved => {
                return Dispatched::Ignored;
            }
        };

        let Some(path) = event.path() else {
            debug!("<{}> {} event without a path, dropping", self.name, event.event_type);
            return Dispatched::Ignored;
        };

        let snapshot = self.listeners.snapshot();
        for listener in snapshot.iter() {
            callback(listener.as_ref(), path);
        }

        trace!(
            event_type = %event.event_type,
            path = path,
            listeners = snapshot.len(),
            "Event dispatched"
        );
        Dispatched::Listeners(snapshot.len())
    }
}

impl Watcher for EventDispatcher {
    fn process(
        &self,
        event: WatchedEvent,
    ) {
        self.dispatch(&event);
    }
}
