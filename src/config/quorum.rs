use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_CLIENT_PORT;
use crate::constants::DEFAULT_QUORUM_HOST;
use crate::constants::DEFAULT_SESSION_TIMEOUT_IN_MS;
use crate::Error;
use crate::Result;

/// Members of the coordination-service ensemble and session parameters
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QuorumConfig {
    /// Ensemble hosts, optionally with an explicit `:port`
    #[serde(default = "default_servers")]
    pub servers: Vec<String>,

    /// Port used for hosts that do not carry one
    #[serde(default = "default_client_port")]
    pub client_port: u16,

    #[serde(default = "default_session_timeout_in_ms")]
    pub session_timeout_in_ms: u64,
}

impl Default for QuorumConfig {
    fn default() -> Self {
        Self {
            servers: default_servers(),
            client_port: default_client_port(),
            session_timeout_in_ms: default_session_timeout_in_ms(),
        }
    }
}

impl QuorumConfig {
    /// Connect string handed to the transport, e.g. `zk1:2181,zk2:2181`
    pub fn quorum_string(&self) -> String {
        self.servers
            .iter()
            .map(|host| {
                let host = host.trim();
                if host.contains(':') {
                    host.to_string()
                } else {
                    format!("{}:{}", host, self.client_port)
                }
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn session_timeout(&self) -> Duration {
        Duration::from_millis(self.session_timeout_in_ms)
    }

    /// Validates quorum configuration
    /// # Errors
    /// Returns `Error::InvalidConfig` when:
    /// - No server is configured
    /// - A server entry is blank
    /// - The client port or session timeout is zero
    pub fn validate(&self) -> Result<()> {
        if self.servers.is_empty() {
            return Err(Error::InvalidConfig(
                "zookeeper.quorum.servers must contain at least one host".into(),
            ));
        }

        if let Some(pos) = self.servers.iter().position(|s| s.trim().is_empty()) {
            return Err(Error::InvalidConfig(format!(
                "zookeeper.quorum.servers entry {} is empty",
                pos
            )));
        }

        if self.client_port == 0 {
            return Err(Error::InvalidConfig("zookeeper.quorum.client_port cannot be 0".into()));
        }

        if self.session_timeout_in_ms == 0 {
            return Err(Error::InvalidConfig(
                "zookeeper.quorum.session_timeout_in_ms must be positive".into(),
            ));
        }

        Ok(())
    }
}

fn default_servers() -> Vec<String> {
    vec![DEFAULT_QUORUM_HOST.to_string()]
}

fn default_client_port() -> u16 {
    DEFAULT_CLIENT_PORT
}

fn default_session_timeout_in_ms() -> u64 {
    DEFAULT_SESSION_TIMEOUT_IN_MS
}
