// -
// Configuration keys of the znode namespace

pub const ZNODE_PARENT_KEY: &str = "zookeeper.znode.parent";
pub const ZNODE_ROOT_SERVER_KEY: &str = "zookeeper.znode.rootserver";
pub const ZNODE_RS_KEY: &str = "zookeeper.znode.rs";
pub const ZNODE_MASTER_KEY: &str = "zookeeper.znode.master";
pub const ZNODE_STATE_KEY: &str = "zookeeper.znode.state";
pub const ZNODE_UNASSIGNED_KEY: &str = "zookeeper.znode.unassigned";
pub const ZNODE_TABLE_KEY: &str = "zookeeper.znode.tableEnableDisable";

// -
// Default znode names

/// Base znode for the cluster
pub const DEFAULT_ZNODE_PARENT: &str = "/hbase-like-root";
pub const DEFAULT_ZNODE_ROOT_SERVER: &str = "root-region-server";
pub const DEFAULT_ZNODE_RS: &str = "rs";
pub const DEFAULT_ZNODE_MASTER: &str = "master";
pub const DEFAULT_ZNODE_STATE: &str = "shutdown";
pub const DEFAULT_ZNODE_UNASSIGNED: &str = "unassigned";
pub const DEFAULT_ZNODE_TABLE: &str = "table";

/// Separator between znode path segments
pub const ZNODE_PATH_SEPARATOR: char = '/';

// -
// Quorum

pub const DEFAULT_QUORUM_HOST: &str = "localhost";
pub const DEFAULT_CLIENT_PORT: u16 = 2181;
pub const DEFAULT_SESSION_TIMEOUT_IN_MS: u64 = 180_000;

/// Reason handed to the abort callback when the session expires
pub const SESSION_EXPIRED_ABORT_REASON: &str = "Received Expired from ZooKeeper, aborting server";
