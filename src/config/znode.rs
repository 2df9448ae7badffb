use serde::Deserialize;
use serde::Serialize;

use crate::constants::*;

/// Names of the cluster znodes.
///
/// `parent` is an absolute path; every other field is a single child
/// segment joined under it. Values are not validated.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ZNodeConfig {
    #[serde(default = "default_parent")]
    pub parent: String,

    #[serde(default = "default_rootserver")]
    pub rootserver: String,

    #[serde(default = "default_rs")]
    pub rs: String,

    #[serde(default = "default_master")]
    pub master: String,

    #[serde(default = "default_state")]
    pub state: String,

    #[serde(default = "default_unassigned")]
    pub unassigned: String,

    #[serde(default = "default_table_enable_disable")]
    pub table_enable_disable: String,
}

impl Default for ZNodeConfig {
    fn default() -> Self {
        Self {
            parent: default_parent(),
            rootserver: default_rootserver(),
            rs: default_rs(),
            master: default_master(),
            state: default_state(),
            unassigned: default_unassigned(),
            table_enable_disable: default_table_enable_disable(),
        }
    }
}

impl ZNodeConfig {
    /// Resolves each name through `lookup`, falling back to the default
    /// when the key is absent. Keys are the dotted `zookeeper.znode.*` names.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        Self {
            parent: get(ZNODE_PARENT_KEY, DEFAULT_ZNODE_PARENT),
            rootserver: get(ZNODE_ROOT_SERVER_KEY, DEFAULT_ZNODE_ROOT_SERVER),
            rs: get(ZNODE_RS_KEY, DEFAULT_ZNODE_RS),
            master: get(ZNODE_MASTER_KEY, DEFAULT_ZNODE_MASTER),
            state: get(ZNODE_STATE_KEY, DEFAULT_ZNODE_STATE),
            unassigned: get(ZNODE_UNASSIGNED_KEY, DEFAULT_ZNODE_UNASSIGNED),
            table_enable_disable: get(ZNODE_TABLE_KEY, DEFAULT_ZNODE_TABLE),
        }
    }
}

fn default_parent() -> String {
    DEFAULT_ZNODE_PARENT.to_string()
}
fn default_rootserver() -> String {
    DEFAULT_ZNODE_ROOT_SERVER.to_string()
}
fn default_rs() -> String {
    DEFAULT_ZNODE_RS.to_string()
}
fn default_master() -> String {
    DEFAULT_ZNODE_MASTER.to_string()
}
fn default_state() -> String {
    DEFAULT_ZNODE_STATE.to_string()
}
fn default_unassigned() -> String {
    DEFAULT_ZNODE_UNASSIGNED.to_string()
}
fn default_table_enable_disable() -> String {
    DEFAULT_ZNODE_TABLE.to_string()
}
