//! Watcher Error Hierarchy
//!
//! Separates failures by the phase in which they surface: loading
//! configuration, establishing the connection, bootstrapping the namespace
//! and later calls made against the coordination service.

use std::time::Duration;

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration could not be loaded or merged
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Configuration loaded but failed validation
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// The initial connection to the quorum could not be established
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Creating the base namespace failed; no watcher is returned
    #[error("Unexpected KeeperException creating base node {path}")]
    Construction {
        path: String,
        #[source]
        source: KeeperError,
    },

    /// Failure reported by the coordination service on a later call
    #[error(transparent)]
    Keeper(#[from] KeeperError),

    /// A blocking call was interrupted
    #[error(transparent)]
    Interrupted(#[from] InterruptedError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// Malformed quorum string
    #[error("Invalid quorum: {0}")]
    InvalidQuorum(String),

    /// The quorum rejected the session
    #[error("Connection to {quorum} refused: {reason}")]
    Refused { quorum: String, reason: String },

    /// No quorum member answered in time
    #[error("Connection to {quorum} timed out after {duration:?}")]
    Timeout { quorum: String, duration: Duration },
}

/// Result codes returned by the coordination service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeeperErrorCode {
    ConnectionLoss,
    SessionExpired,
    NoNode,
    NodeExists,
    NotEmpty,
    NoAuth,
    BadArguments,
    OperationTimeout,
    SystemError,
    Unimplemented,
}

impl std::fmt::Display for KeeperErrorCode {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let text = match self {
            KeeperErrorCode::ConnectionLoss => "ConnectionLoss",
            KeeperErrorCode::SessionExpired => "Session expired",
            KeeperErrorCode::NoNode => "NoNode",
            KeeperErrorCode::NodeExists => "NodeExists",
            KeeperErrorCode::NotEmpty => "Directory not empty",
            KeeperErrorCode::NoAuth => "NoAuth",
            KeeperErrorCode::BadArguments => "BadArguments",
            KeeperErrorCode::OperationTimeout => "OperationTimeout",
            KeeperErrorCode::SystemError => "SystemError",
            KeeperErrorCode::Unimplemented => "Unimplemented",
        };
        f.write_str(text)
    }
}

/// Error surfaced by the coordination service for a single call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("KeeperErrorCode = {code}{}", path_suffix(.path))]
pub struct KeeperError {
    pub code: KeeperErrorCode,
    pub path: Option<String>,
}

impl KeeperError {
    pub fn new(code: KeeperErrorCode) -> Self {
        Self { code, path: None }
    }

    pub fn with_path(
        code: KeeperErrorCode,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code,
            path: Some(path.into()),
        }
    }
}

fn path_suffix(path: &Option<String>) -> String {
    path.as_ref().map(|p| format!(" for {p}")).unwrap_or_default()
}

/// A blocking operation was interrupted before it completed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Interrupted while {operation}")]
pub struct InterruptedError {
    pub operation: &'static str,
}

impl InterruptedError {
    pub fn new(operation: &'static str) -> Self {
        Self { operation }
    }
}
