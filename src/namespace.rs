//! Canonical znode paths of the cluster.
//!
//! Computed once from [`ZNodeConfig`] when the watcher is built and shared
//! read-only afterwards. Every path other than `base` is `base` joined with
//! a configurable child segment.

use crate::constants::ZNODE_PATH_SEPARATOR;
use crate::ZNodeConfig;

/// Join a parent znode and a child name with the path separator.
pub fn join_znode(
    prefix: &str,
    suffix: &str,
) -> String {
    let mut path = String::with_capacity(prefix.len() + suffix.len() + 1);
    path.push_str(prefix);
    path.push(ZNODE_PATH_SEPARATOR);
    path.push_str(suffix);
    path
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZNodePaths {
    /// Base znode for this cluster
    pub base: String,
    /// Location of the server hosting the root region
    pub root_server: String,
    /// Parent of the ephemeral region server nodes
    pub rs: String,
    /// Address of the currently active master
    pub master_address: String,
    /// Current cluster state
    pub cluster_state: String,
    /// Region transitioning and assignment
    pub assignment: String,
    /// Table enabling and disabling
    pub table: String,
}

impl ZNodePaths {
    pub fn new(config: &ZNodeConfig) -> Self {
        let base = config.parent.clone();
        Self {
            root_server: join_znode(&base, &config.rootserver),
            rs: join_znode(&base, &config.rs),
            master_address: join_znode(&base, &config.master),
            cluster_state: join_znode(&base, &config.state),
            assignment: join_znode(&base, &config.unassigned),
            table: join_znode(&base, &config.table_enable_disable),
            base,
        }
    }

    /// Builds the namespace from a dotted-key lookup such as
    /// `zookeeper.znode.parent`. Missing keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::new(&ZNodeConfig::from_lookup(lookup))
    }

    /// Nodes created at construction, in creation order
    pub fn bootstrap_nodes(&self) -> [&str; 4] {
        [
            self.base.as_str(),
            self.assignment.as_str(),
            self.rs.as_str(),
            self.table.as_str(),
        ]
    }
}

impl Default for ZNodePaths {
    fn default() -> Self {
        Self::new(&ZNodeConfig::default())
    }
}
