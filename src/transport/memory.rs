//! In-process coordination service.
//!
//! Keeps a flat map of znodes and delivers events to each open session on a
//! dedicated delivery thread, in the order they were produced. Every live
//! session sees every node change; there is no per-path watch bookkeeping.
//! Connection trouble is simulated explicitly through [`MemoryZooKeeper`].

use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use async_trait::async_trait;
use crossbeam_channel::unbounded;
use crossbeam_channel::Sender;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;
use tracing::trace;
use tracing::warn;

use super::Watcher;
use super::ZooKeeperConnection;
use super::ZooKeeperConnector;
use crate::constants::ZNODE_PATH_SEPARATOR;
use crate::ConnectionError;
use crate::Error;
use crate::EventType;
use crate::InterruptedError;
use crate::KeeperError;
use crate::KeeperErrorCode;
use crate::KeeperState;
use crate::Result;
use crate::WatchedEvent;

enum Delivery {
    Event(WatchedEvent),
    /// Acknowledged once everything queued before it was delivered
    Barrier(Sender<()>),
}

struct SessionLink {
    id: i64,
    queue: Sender<Delivery>,
    expired: Arc<AtomicBool>,
}

#[derive(Default)]
struct Inner {
    nodes: DashMap<String, Vec<u8>>,
    sessions: Mutex<Vec<SessionLink>>,
    next_session_id: AtomicI64,
    refuse_reason: Mutex<Option<String>>,
    create_failure: Mutex<Option<KeeperErrorCode>>,
    interrupt_close: AtomicBool,
}

impl Inner {
    fn broadcast(
        &self,
        event: WatchedEvent,
    ) {
        let sessions = self.sessions.lock();
        for session in sessions.iter().filter(|s| !s.expired.load(Ordering::SeqCst)) {
            if session.queue.send(Delivery::Event(event.clone())).is_err() {
                warn!(session_id = session.id, "Delivery thread gone, dropping event");
            }
        }
    }

    fn detach(
        &self,
        session_id: i64,
    ) {
        self.sessions.lock().retain(|s| s.id != session_id);
    }
}

/// Shared handle to an in-process ensemble
#[derive(Clone, Default)]
pub struct MemoryZooKeeper {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for MemoryZooKeeper {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("MemoryZooKeeper")
            .field("nodes", &self.inner.nodes.len())
            .field("sessions", &self.session_count())
            .finish()
    }
}

fn parent_of(path: &str) -> Option<&str> {
    match path.rfind(ZNODE_PATH_SEPARATOR) {
        Some(0) | None => None,
        Some(idx) => Some(&path[..idx]),
    }
}

impl MemoryZooKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `path` with `data`. The parent must exist.
    pub fn create(
        &self,
        path: &str,
        data: &[u8],
    ) -> std::result::Result<(), KeeperError> {
        if !path.starts_with(ZNODE_PATH_SEPARATOR) || path.len() < 2 || path.ends_with(ZNODE_PATH_SEPARATOR) {
            return Err(KeeperError::with_path(KeeperErrorCode::BadArguments, path));
        }
        if let Some(code) = *self.inner.create_failure.lock() {
            return Err(KeeperError::with_path(code, path));
        }
        let parent = parent_of(path);
        if let Some(parent) = parent {
            if !self.inner.nodes.contains_key(parent) {
                return Err(KeeperError::with_path(KeeperErrorCode::NoNode, parent));
            }
        }

        match self.inner.nodes.entry(path.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                return Err(KeeperError::with_path(KeeperErrorCode::NodeExists, path));
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(data.to_vec());
            }
        }

        self.inner.broadcast(WatchedEvent::node(EventType::NodeCreated, path));
        if let Some(parent) = parent {
            self.inner
                .broadcast(WatchedEvent::node(EventType::NodeChildrenChanged, parent));
        }
        Ok(())
    }

    pub fn set_data(
        &self,
        path: &str,
        data: &[u8],
    ) -> std::result::Result<(), KeeperError> {
        match self.inner.nodes.get_mut(path) {
            Some(mut node) => {
                *node = data.to_vec();
            }
            None => return Err(KeeperError::with_path(KeeperErrorCode::NoNode, path)),
        }
        self.inner.broadcast(WatchedEvent::node(EventType::NodeDataChanged, path));
        Ok(())
    }

    /// Delete a leaf node
    pub fn delete(
        &self,
        path: &str,
    ) -> std::result::Result<(), KeeperError> {
        if !self.children(path).is_empty() {
            return Err(KeeperError::with_path(KeeperErrorCode::NotEmpty, path));
        }
        if self.inner.nodes.remove(path).is_none() {
            return Err(KeeperError::with_path(KeeperErrorCode::NoNode, path));
        }

        self.inner.broadcast(WatchedEvent::node(EventType::NodeDeleted, path));
        if let Some(parent) = parent_of(path) {
            self.inner
                .broadcast(WatchedEvent::node(EventType::NodeChildrenChanged, parent));
        }
        Ok(())
    }

    pub fn exists(
        &self,
        path: &str,
    ) -> bool {
        self.inner.nodes.contains_key(path)
    }

    pub fn data(
        &self,
        path: &str,
    ) -> Option<Vec<u8>> {
        self.inner.nodes.get(path).map(|n| n.value().clone())
    }

    /// Names of the direct children of `path`, sorted
    pub fn children(
        &self,
        path: &str,
    ) -> Vec<String> {
        let mut children: Vec<String> = self
            .inner
            .nodes
            .iter()
            .filter(|entry| parent_of(entry.key()) == Some(path))
            .map(|entry| entry.key()[path.len() + 1..].to_string())
            .collect();
        children.sort();
        children
    }

    /// Every live session sees a transient connection loss
    pub fn disconnect(&self) {
        self.inner.broadcast(WatchedEvent::connection(KeeperState::Disconnected));
    }

    pub fn reconnect(&self) {
        self.inner
            .broadcast(WatchedEvent::connection(KeeperState::SyncConnected));
    }

    /// Expire every live session. Expired sessions receive no further events
    /// and fail all later calls with `SessionExpired`.
    pub fn expire_sessions(&self) {
        let sessions = self.inner.sessions.lock();
        for session in sessions.iter().filter(|s| !s.expired.swap(true, Ordering::SeqCst)) {
            let _ = session
                .queue
                .send(Delivery::Event(WatchedEvent::connection(KeeperState::Expired)));
        }
    }

    /// Refuse new connections with `reason`, or accept them again with `None`
    pub fn refuse_connections(
        &self,
        reason: Option<&str>,
    ) {
        *self.inner.refuse_reason.lock() = reason.map(str::to_string);
    }

    /// Fail every create with `code`, or succeed again with `None`
    pub fn fail_creates_with(
        &self,
        code: Option<KeeperErrorCode>,
    ) {
        *self.inner.create_failure.lock() = code;
    }

    /// Make session closes report an interruption
    pub fn interrupt_closes(
        &self,
        interrupt: bool,
    ) {
        self.inner.interrupt_close.store(interrupt, Ordering::SeqCst);
    }

    /// Sessions opened and neither closed nor expired
    pub fn session_count(&self) -> usize {
        self.inner
            .sessions
            .lock()
            .iter()
            .filter(|s| !s.expired.load(Ordering::SeqCst))
            .count()
    }

    /// Block until every event queued so far has been delivered.
    /// Must not be called from a delivery thread.
    pub fn sync(&self) {
        let waiters: Vec<_> = {
            let sessions = self.inner.sessions.lock();
            sessions
                .iter()
                .filter_map(|session| {
                    let (ack_tx, ack_rx) = crossbeam_channel::bounded(1);
                    session.queue.send(Delivery::Barrier(ack_tx)).ok().map(|_| ack_rx)
                })
                .collect()
        };
        for ack in waiters {
            let _ = ack.recv();
        }
    }
}

#[async_trait]
impl ZooKeeperConnector for MemoryZooKeeper {
    async fn connect(
        &self,
        quorum: &str,
        session_timeout: Duration,
        watcher: Arc<dyn Watcher>,
    ) -> std::result::Result<Arc<dyn ZooKeeperConnection>, ConnectionError> {
        if quorum.trim().is_empty() {
            return Err(ConnectionError::InvalidQuorum(quorum.to_string()));
        }
        if let Some(reason) = self.inner.refuse_reason.lock().clone() {
            return Err(ConnectionError::Refused {
                quorum: quorum.to_string(),
                reason,
            });
        }

        let id = self.inner.next_session_id.fetch_add(1, Ordering::Relaxed) + 1;
        let (queue, events) = unbounded::<Delivery>();
        let expired = Arc::new(AtomicBool::new(false));

        let handle = std::thread::Builder::new()
            .name(format!("zk-event-{id}"))
            .spawn(move || {
                debug!(session_id = id, "Event delivery thread started");
                for delivery in events.iter() {
                    match delivery {
                        Delivery::Event(event) => watcher.process(event),
                        Delivery::Barrier(ack) => {
                            let _ = ack.send(());
                        }
                    }
                }
                debug!(session_id = id, "Event delivery thread stopped");
            })
            .map_err(|e| ConnectionError::Refused {
                quorum: quorum.to_string(),
                reason: e.to_string(),
            })?;

        let _ = queue.send(Delivery::Event(WatchedEvent::connection(KeeperState::SyncConnected)));
        self.inner.sessions.lock().push(SessionLink {
            id,
            queue: queue.clone(),
            expired: expired.clone(),
        });

        trace!(session_id = id, quorum, ?session_timeout, "Session opened");

        Ok(Arc::new(MemorySession {
            id,
            store: self.clone(),
            expired,
            closed: AtomicBool::new(false),
            queue: Mutex::new(Some(queue)),
            delivery: Mutex::new(Some(handle)),
        }))
    }
}

/// Session opened by [`MemoryZooKeeper`]
pub struct MemorySession {
    id: i64,
    store: MemoryZooKeeper,
    expired: Arc<AtomicBool>,
    closed: AtomicBool,
    queue: Mutex<Option<Sender<Delivery>>>,
    delivery: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for MemorySession {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("MemorySession")
            .field("id", &self.id)
            .field("expired", &self.expired.load(Ordering::SeqCst))
            .field("closed", &self.closed.load(Ordering::SeqCst))
            .finish()
    }
}

impl Drop for MemorySession {
    fn drop(&mut self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.store.inner.detach(self.id);
        self.queue.lock().take();
        trace!(session_id = self.id, "Session dropped without close");
    }
}

impl MemorySession {
    fn check_live(
        &self,
        path: &str,
    ) -> std::result::Result<(), KeeperError> {
        if self.expired.load(Ordering::SeqCst) {
            return Err(KeeperError::with_path(KeeperErrorCode::SessionExpired, path));
        }
        if self.closed.load(Ordering::SeqCst) {
            return Err(KeeperError::with_path(KeeperErrorCode::ConnectionLoss, path));
        }
        Ok(())
    }
}

#[async_trait]
impl ZooKeeperConnection for MemorySession {
    async fn create_if_absent(
        &self,
        path: &str,
    ) -> std::result::Result<(), KeeperError> {
        self.check_live(path)?;
        match self.store.create(path, &[]) {
            Err(e) if e.code == KeeperErrorCode::NodeExists => Ok(()),
            other => other,
        }
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.store.inner.detach(self.id);
        // Dropping the last sender ends the delivery thread once it drains.
        self.queue.lock().take();

        let handle = self.delivery.lock().take();
        if self.store.inner.interrupt_close.load(Ordering::SeqCst) {
            return Err(Error::Interrupted(InterruptedError::new("closing session")));
        }
        if let Some(handle) = handle {
            if handle.thread().id() != std::thread::current().id() {
                let _ = tokio::task::spawn_blocking(move || handle.join()).await;
            }
        }
        Ok(())
    }

    fn session_id(&self) -> i64 {
        self.id
    }
}
