//! Collaborator interface to the coordination service.
//!
//! The watcher only needs to open a session, create the namespace nodes and
//! close the session again. Everything else about the service client is
//! opaque to it.

mod memory;
pub use memory::*;

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::ConnectionError;
use crate::KeeperError;
use crate::Result;
use crate::WatchedEvent;

/// Sink for every event of a session
pub trait Watcher: Send + Sync {
    fn process(
        &self,
        event: WatchedEvent,
    );
}

/// An open session with the coordination service
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ZooKeeperConnection: Send + Sync + Debug {
    /// Create a persistent, empty node at `path` unless it already exists
    async fn create_if_absent(
        &self,
        path: &str,
    ) -> std::result::Result<(), KeeperError>;

    /// Release the session. May fail with [`crate::Error::Interrupted`].
    async fn close(&self) -> Result<()>;

    fn session_id(&self) -> i64;
}

/// Opens sessions against a quorum
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ZooKeeperConnector: Send + Sync {
    /// Connect to `quorum` and route every session event to `watcher`.
    async fn connect(
        &self,
        quorum: &str,
        session_timeout: Duration,
        watcher: Arc<dyn Watcher>,
    ) -> std::result::Result<Arc<dyn ZooKeeperConnection>, ConnectionError>;
}
