//! Events delivered by the coordination service.
//!
//! A [`WatchedEvent`] is either a connection status change (type `None`,
//! no path) or a change to a single znode.

use std::fmt;

/// Kind of change a [`WatchedEvent`] reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Connection status change; see [`KeeperState`]
    None,
    NodeCreated,
    NodeDeleted,
    NodeDataChanged,
    NodeChildrenChanged,
    DataWatchRemoved,
    ChildWatchRemoved,
    PersistentWatchRemoved,
}

impl EventType {
    pub fn code(&self) -> i32 {
        match self {
            EventType::None => -1,
            EventType::NodeCreated => 1,
            EventType::NodeDeleted => 2,
            EventType::NodeDataChanged => 3,
            EventType::NodeChildrenChanged => 4,
            EventType::DataWatchRemoved => 5,
            EventType::ChildWatchRemoved => 6,
            EventType::PersistentWatchRemoved => 7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::None => "None",
            EventType::NodeCreated => "NodeCreated",
            EventType::NodeDeleted => "NodeDeleted",
            EventType::NodeDataChanged => "NodeDataChanged",
            EventType::NodeChildrenChanged => "NodeChildrenChanged",
            EventType::DataWatchRemoved => "DataWatchRemoved",
            EventType::ChildWatchRemoved => "ChildWatchRemoved",
            EventType::PersistentWatchRemoved => "PersistentWatchRemoved",
        }
    }
}

impl TryFrom<i32> for EventType {
    type Error = UnknownCode;

    fn try_from(code: i32) -> std::result::Result<Self, Self::Error> {
        Ok(match code {
            -1 => EventType::None,
            1 => EventType::NodeCreated,
            2 => EventType::NodeDeleted,
            3 => EventType::NodeDataChanged,
            4 => EventType::NodeChildrenChanged,
            5 => EventType::DataWatchRemoved,
            6 => EventType::ChildWatchRemoved,
            7 => EventType::PersistentWatchRemoved,
            other => return Err(UnknownCode::EventType(other)),
        })
    }
}

impl fmt::Display for EventType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session state carried by every event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeeperState {
    Disconnected,
    SyncConnected,
    AuthFailed,
    ConnectedReadOnly,
    SaslAuthenticated,
    Expired,
    Closed,
}

impl KeeperState {
    pub fn code(&self) -> i32 {
        match self {
            KeeperState::Disconnected => 0,
            KeeperState::SyncConnected => 3,
            KeeperState::AuthFailed => 4,
            KeeperState::ConnectedReadOnly => 5,
            KeeperState::SaslAuthenticated => 6,
            KeeperState::Expired => -112,
            KeeperState::Closed => 7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            KeeperState::Disconnected => "Disconnected",
            KeeperState::SyncConnected => "SyncConnected",
            KeeperState::AuthFailed => "AuthFailed",
            KeeperState::ConnectedReadOnly => "ConnectedReadOnly",
            KeeperState::SaslAuthenticated => "SaslAuthenticated",
            KeeperState::Expired => "Expired",
            KeeperState::Closed => "Closed",
        }
    }
}

impl TryFrom<i32> for KeeperState {
    type Error = UnknownCode;

    fn try_from(code: i32) -> std::result::Result<Self, Self::Error> {
        Ok(match code {
            0 => KeeperState::Disconnected,
            3 => KeeperState::SyncConnected,
            4 => KeeperState::AuthFailed,
            5 => KeeperState::ConnectedReadOnly,
            6 => KeeperState::SaslAuthenticated,
            -112 => KeeperState::Expired,
            7 => KeeperState::Closed,
            other => return Err(UnknownCode::KeeperState(other)),
        })
    }
}

impl fmt::Display for KeeperState {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire code that maps to no known variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UnknownCode {
    #[error("Unknown event type code {0}")]
    EventType(i32),
    #[error("Unknown keeper state code {0}")]
    KeeperState(i32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedEvent {
    pub event_type: EventType,
    pub state: KeeperState,
    pub path: Option<String>,
}

impl WatchedEvent {
    pub fn new(
        event_type: EventType,
        state: KeeperState,
        path: Option<String>,
    ) -> Self {
        Self {
            event_type,
            state,
            path,
        }
    }

    /// Connection status change with no path
    pub fn connection(state: KeeperState) -> Self {
        Self::new(EventType::None, state, None)
    }

    /// Change to `path` observed while connected
    pub fn node(
        event_type: EventType,
        path: impl Into<String>,
    ) -> Self {
        Self::new(event_type, KeeperState::SyncConnected, Some(path.into()))
    }

    /// Decode an event from its wire codes
    pub fn from_codes(
        event_type: i32,
        state: i32,
        path: Option<String>,
    ) -> std::result::Result<Self, UnknownCode> {
        Ok(Self::new(
            EventType::try_from(event_type)?,
            KeeperState::try_from(state)?,
            path,
        ))
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}
