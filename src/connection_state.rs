use std::sync::Arc;

use tracing::debug;
use tracing::error;
use tracing::info;

use crate::constants::SESSION_EXPIRED_ABORT_REASON;
use crate::metrics::CONNECTION_STATE_CHANGES;
use crate::metrics::SESSION_ABORTS;
use crate::Abortable;
use crate::KeeperState;

/// What the state machine did with a connection event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionAction {
    /// Steady state or a state this watcher does not act on
    Ignored,
    /// Transient interruption, logged only
    Logged,
    /// Session lost; the abort callback was invoked
    Aborted,
    /// Session lost but no abort callback was supplied
    Unhandled,
}

/// Interprets connection status events.
///
/// `Disconnected` is left to the transport to recover. `Expired` is terminal
/// for this session and escalates to the abort callback.
pub struct ConnectionStateMachine {
    name: Arc<str>,
    abortable: Option<Arc<dyn Abortable>>,
}

impl std::fmt::Debug for ConnectionStateMachine {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ConnectionStateMachine")
            .field("name", &self.name)
            .field("abortable", &self.abortable.is_some())
            .finish()
    }
}

impl ConnectionStateMachine {
    pub fn new(
        name: Arc<str>,
        abortable: Option<Arc<dyn Abortable>>,
    ) -> Self {
        Self { name, abortable }
    }

    pub fn on_state(
        &self,
        state: KeeperState,
    ) -> ConnectionAction {
        CONNECTION_STATE_CHANGES.with_label_values(&[state.as_str()]).inc();

        match state {
            KeeperState::SyncConnected => ConnectionAction::Ignored,

            KeeperState::Disconnected => {
                info!("<{}> Received Disconnected from ZooKeeper, ignoring", self.name);
                ConnectionAction::Logged
            }

            KeeperState::Expired => {
                error!("<{}> {}", self.name, SESSION_EXPIRED_ABORT_REASON);
                match &self.abortable {
                    Some(abortable) => {
                        SESSION_ABORTS.inc();
                        abortable.abort(SESSION_EXPIRED_ABORT_REASON, None);
                        ConnectionAction::Aborted
                    }
                    None => ConnectionAction::Unhandled,
                }
            }

            other => {
                debug!("<{}> Ignoring connection state {}", self.name, other);
                ConnectionAction::Ignored
            }
        }
    }
}
