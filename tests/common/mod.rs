use std::sync::Arc;

use parking_lot::Mutex;
use zk_watcher::Abortable;
use zk_watcher::Error;
use zk_watcher::MemoryZooKeeper;
use zk_watcher::WatcherConfig;
use zk_watcher::ZooKeeperListener;
use zk_watcher::ZooKeeperWatcher;

/// Every callback as `(kind, path)`, in delivery order
#[derive(Debug, Default)]
pub struct EventLog {
    entries: Mutex<Vec<(&'static str, String)>>,
}

impl EventLog {
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        self.entries.lock().clone()
    }

    pub fn paths_of(
        &self,
        kind: &str,
    ) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, p)| p.clone())
            .collect()
    }

    fn push(
        &self,
        kind: &'static str,
        path: &str,
    ) {
        self.entries.lock().push((kind, path.to_string()));
    }
}

impl ZooKeeperListener for EventLog {
    fn node_created(
        &self,
        path: &str,
    ) {
        self.push("created", path);
    }

    fn node_deleted(
        &self,
        path: &str,
    ) {
        self.push("deleted", path);
    }

    fn node_data_changed(
        &self,
        path: &str,
    ) {
        self.push("data_changed", path);
    }

    fn node_children_changed(
        &self,
        path: &str,
    ) {
        self.push("children_changed", path);
    }
}

/// Collects abort reasons instead of stopping the process
#[derive(Debug, Default)]
pub struct AbortLog {
    reasons: Mutex<Vec<(String, bool)>>,
}

impl AbortLog {
    pub fn reasons(&self) -> Vec<(String, bool)> {
        self.reasons.lock().clone()
    }
}

impl Abortable for AbortLog {
    fn abort(
        &self,
        why: &str,
        cause: Option<Error>,
    ) {
        self.reasons.lock().push((why.to_string(), cause.is_some()));
    }
}

pub async fn start_watcher(
    zk: &MemoryZooKeeper,
    name: &str,
    abortable: Option<Arc<dyn Abortable>>,
) -> ZooKeeperWatcher {
    ZooKeeperWatcher::new(&WatcherConfig::default(), name, abortable, zk)
        .await
        .expect("watcher should start against the in-memory ensemble")
}
