#[cfg(test)]
use mockall::automock;

/// Consumer of znode change notifications.
///
/// Registered with the watcher and called on the event delivery thread. All
/// callbacks default to no-ops so implementors only override the kinds they
/// care about. A callback that blocks stalls delivery to every listener.
#[cfg_attr(test, automock)]
pub trait ZooKeeperListener: Send + Sync {
    fn node_created(
        &self,
        _path: &str,
    ) {
    }

    fn node_deleted(
        &self,
        _path: &str,
    ) {
    }

    fn node_data_changed(
        &self,
        _path: &str,
    ) {
    }

    fn node_children_changed(
        &self,
        _path: &str,
    ) {
    }
}
