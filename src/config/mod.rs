//! Configuration management for the coordination-service watcher.
//!
//! Provides hierarchical configuration loading and validation with:
//! - Default values as code base
//! - Configuration file support
//! - Environment variable overrides
mod quorum;
mod znode;
pub use quorum::*;
pub use znode::*;

use std::env;

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::ZNODE_TABLE_KEY;
use crate::Result;

/// Top level configuration of a watcher process
///
/// Sources are merged with later ones overriding earlier ones:
/// 1. Default values from code implementation
/// 2. Configuration file specified by `ZK_CONFIG_PATH`
/// 3. Environment variables prefixed `ZK__` (highest priority)
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct WatcherConfig {
    #[serde(default)]
    pub zookeeper: ZooKeeperConfig,
}

/// Everything under the `zookeeper.` key space
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ZooKeeperConfig {
    /// Quorum members and session parameters
    #[serde(default)]
    pub quorum: QuorumConfig,
    /// Names of the cluster znodes
    #[serde(default)]
    pub znode: ZNodeConfig,
}

impl WatcherConfig {
    /// Loads configuration from hierarchical sources without validation.
    ///
    /// # Note
    /// Validation is deferred so further overrides can be applied through
    /// `with_override_config()`. Call `validate()` before use.
    ///
    /// # Examples
    /// ```ignore
    /// std::env::set_var("ZK__ZOOKEEPER__ZNODE__PARENT", "/staging");
    /// let cfg = WatcherConfig::new()?.validate()?;
    /// ```
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var("ZK_CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(env_source());

        Self::resolve(builder.build()?)
    }

    /// Applies additional configuration overrides from file without validation.
    ///
    /// Merging order (later sources override earlier):
    /// 1. Current configuration values
    /// 2. New configuration file
    /// 3. Latest environment variables (highest priority)
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let config = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(env_source())
            .build()?;
        Self::resolve(config)
    }

    /// Deserializes the merged layers.
    ///
    /// `zookeeper.znode.tableEnableDisable` is the documented key for the
    /// table node and takes precedence over the `table_enable_disable`
    /// field name when a source sets it.
    fn resolve(config: Config) -> Result<Self> {
        let table = documented_key(&config, ZNODE_TABLE_KEY);
        let mut resolved: Self = config.try_deserialize()?;
        if let Some(table) = table {
            resolved.zookeeper.znode.table_enable_disable = table;
        }
        Ok(resolved)
    }

    /// Validates configuration and returns validated instance.
    pub fn validate(self) -> Result<Self> {
        self.zookeeper.quorum.validate()?;
        Ok(self)
    }
}

/// Sources may or may not fold keys to lower case.
fn documented_key(
    config: &Config,
    key: &str,
) -> Option<String> {
    config
        .get_string(key)
        .or_else(|_| config.get_string(&key.to_lowercase()))
        .ok()
}

fn env_source() -> Environment {
    Environment::with_prefix("ZK")
        .separator("__")
        .ignore_empty(true)
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("zookeeper.quorum.servers")
}
