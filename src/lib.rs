//! Single-instance watcher over a coordination-service session.
//!
//! [`ZooKeeperWatcher`] owns the one session of the process and the one
//! event sink the transport reports to. Connection status changes are
//! handled internally; znode changes are fanned out to registered
//! [`ZooKeeperListener`]s. The canonical cluster paths live in
//! [`ZNodePaths`].

mod abortable;
mod config;
mod connection_state;
pub mod constants;
mod dispatcher;
mod errors;
mod event;
mod listener;
pub mod metrics;
mod namespace;
mod registry;
mod transport;
mod watcher;

pub use abortable::*;
pub use config::*;
pub use connection_state::*;
pub use dispatcher::*;
pub use errors::*;
pub use event::*;
pub use listener::*;
pub use namespace::*;
pub use registry::*;
pub use transport::*;
pub use watcher::*;


//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
