//! Process-wide watcher over the coordination-service session.
//!
//! One [`ZooKeeperWatcher`] exists per process. It owns the only session,
//! the only event sink handed to the transport and the cluster namespace.
//! Components interested in znode changes register as listeners instead of
//! attaching their own sinks.

use std::collections::HashSet;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;
use tracing::Level;

use crate::Abortable;
use crate::Error;
use crate::EventDispatcher;
use crate::InterruptedError;
use crate::KeeperError;
use crate::Result;
use crate::Watcher;
use crate::WatcherConfig;
use crate::ZNodePaths;
use crate::ZooKeeperConnection;
use crate::ZooKeeperConnector;
use crate::ZooKeeperListener;

/// Dropping the watcher drops its session handle. Call [`close`] first to
/// wait for the session to shut down and to surface shutdown in the logs.
///
/// [`close`]: ZooKeeperWatcher::close
pub struct ZooKeeperWatcher {
    /// For logging only
    name: Arc<str>,
    quorum: String,
    zookeeper: Arc<dyn ZooKeeperConnection>,
    dispatcher: Arc<EventDispatcher>,
    paths: ZNodePaths,
    /// Unassigned nodes already watched by collaborators
    unassigned_nodes: Mutex<HashSet<String>>,
    closed: AtomicBool,
}

impl std::fmt::Debug for ZooKeeperWatcher {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ZooKeeperWatcher")
            .field("name", &self.name)
            .field("quorum", &self.quorum)
            .field("zookeeper", &self.zookeeper)
            .field("paths", &self.paths)
            .finish_non_exhaustive()
    }
}

impl ZooKeeperWatcher {
    /// Connect to the configured quorum and create the base namespace.
    ///
    /// The base, assignment, region-server and table nodes are created if
    /// absent, in that order. Any failure closes the session again and no
    /// watcher is returned.
    ///
    /// # Errors
    /// - [`Error::Connection`] when the session cannot be opened
    /// - [`Error::Construction`] when a namespace node cannot be created
    pub async fn new(
        config: &WatcherConfig,
        name: &str,
        abortable: Option<Arc<dyn Abortable>>,
        connector: &dyn ZooKeeperConnector,
    ) -> Result<Self> {
        let name: Arc<str> = Arc::from(name);
        let quorum = config.zookeeper.quorum.quorum_string();
        let dispatcher = Arc::new(EventDispatcher::new(name.clone(), abortable));

        let zookeeper = connector
            .connect(
                &quorum,
                config.zookeeper.quorum.session_timeout(),
                dispatcher.clone(),
            )
            .await?;
        info!("<{}> Connected to ZooKeeper", name);

        let paths = ZNodePaths::new(&config.zookeeper.znode);
        for path in paths.bootstrap_nodes() {
            if let Err(e) = zookeeper.create_if_absent(path).await {
                error!(error = %e, "<{}> Unexpected KeeperException creating base node", name);
                error!("<{}> Message: {}", name, e);
                if let Err(close_err) = zookeeper.close().await {
                    debug!(error = %close_err, "<{}> Close after failed bootstrap did not complete", name);
                }
                return Err(Error::Construction {
                    path: path.to_string(),
                    source: e,
                });
            }
        }

        Ok(Self {
            name,
            quorum,
            zookeeper,
            dispatcher,
            paths,
            unassigned_nodes: Mutex::new(HashSet::new()),
            closed: AtomicBool::new(false),
        })
    }

    /// Register `listener` to receive znode events.
    ///
    /// Takes effect for every event dispatched after this call returns.
    /// Registering the same instance twice has no further effect.
    pub fn register_listener(
        &self,
        listener: Arc<dyn ZooKeeperListener>,
    ) {
        self.dispatcher.register_listener(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.dispatcher.listeners().len()
    }

    /// The live session, for collaborators issuing their own calls
    pub fn zookeeper(&self) -> &Arc<dyn ZooKeeperConnection> {
        &self.zookeeper
    }

    /// The sink the session reports to
    pub fn event_sink(&self) -> Arc<dyn Watcher> {
        self.dispatcher.clone()
    }

    /// Connect string of this session, e.g. `zk1:2181,zk2:2181`
    pub fn quorum(&self) -> &str {
        &self.quorum
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn paths(&self) -> &ZNodePaths {
        &self.paths
    }

    /// Set of unassigned nodes already being watched.
    ///
    /// Owned by the callers: the watcher neither reads nor fills it. Callers
    /// that share it agree among themselves on how it is maintained.
    pub fn unassigned_nodes(&self) -> &Mutex<HashSet<String>> {
        &self.unassigned_nodes
    }

    /// Log a coordination-service failure and hand it back unchanged.
    ///
    /// ```ignore
    /// zkw.zookeeper()
    ///     .create_if_absent(path)
    ///     .await
    ///     .or_else(|e| zkw.handle_keeper_error(e))?;
    /// ```
    pub fn handle_keeper_error<T>(
        &self,
        err: KeeperError,
    ) -> std::result::Result<T, KeeperError> {
        self.error_with("Received unexpected KeeperException, re-throwing exception", &err);
        Err(err)
    }

    /// Log an interruption and carry on. Does not restore any interrupt
    /// status for the caller.
    pub fn handle_interrupted(
        &self,
        err: InterruptedError,
    ) {
        self.debug_with("Received InterruptedException, doing nothing here", &err);
    }

    /// Close the session. Only the first call has an effect; failures are
    /// logged and never returned.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            self.debug("Close requested on an already closed watcher");
            return;
        }

        match self.zookeeper.close().await {
            Ok(()) => self.debug("Closed ZooKeeper session"),
            Err(Error::Interrupted(e)) => self.handle_interrupted(e),
            Err(e) => self.warn_with("Failed to close ZooKeeper session", &e),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    // Named logging, so every line carries this watcher's name.

    pub fn info(
        &self,
        msg: &str,
    ) {
        info!("<{}> {}", self.name, msg);
    }

    pub fn debug(
        &self,
        msg: &str,
    ) {
        debug!("<{}> {}", self.name, msg);
    }

    pub fn debug_with(
        &self,
        msg: &str,
        err: &dyn std::error::Error,
    ) {
        debug!(error = %err, "<{}> {}", self.name, msg);
    }

    pub fn warn(
        &self,
        msg: &str,
    ) {
        warn!("<{}> {}", self.name, msg);
    }

    pub fn warn_with(
        &self,
        msg: &str,
        err: &dyn std::error::Error,
    ) {
        warn!(error = %err, "<{}> {}", self.name, msg);
    }

    pub fn error(
        &self,
        msg: &str,
    ) {
        error!("<{}> {}", self.name, msg);
    }

    pub fn error_with(
        &self,
        msg: &str,
        err: &dyn std::error::Error,
    ) {
        error!(error = %err, "<{}> {}", self.name, msg);
    }

    pub fn is_debug_enabled(&self) -> bool {
        tracing::enabled!(Level::DEBUG)
    }
}
