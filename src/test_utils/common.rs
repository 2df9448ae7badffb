use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use parking_lot::Mutex;

use crate::Abortable;
use crate::Error;
use crate::ZooKeeperListener;

/// Listener that remembers every path it was called with, per callback
#[derive(Debug, Default)]
pub struct RecordingListener {
    created: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
    data_changed: Mutex<Vec<String>>,
    children_changed: Mutex<Vec<String>>,
}

impl RecordingListener {
    pub fn created(&self) -> Vec<String> {
        self.created.lock().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().clone()
    }

    pub fn data_changed(&self) -> Vec<String> {
        self.data_changed.lock().clone()
    }

    pub fn children_changed(&self) -> Vec<String> {
        self.children_changed.lock().clone()
    }

    pub fn total(&self) -> usize {
        self.created.lock().len()
            + self.deleted.lock().len()
            + self.data_changed.lock().len()
            + self.children_changed.lock().len()
    }
}

impl ZooKeeperListener for RecordingListener {
    fn node_created(
        &self,
        path: &str,
    ) {
        self.created.lock().push(path.to_string());
    }

    fn node_deleted(
        &self,
        path: &str,
    ) {
        self.deleted.lock().push(path.to_string());
    }

    fn node_data_changed(
        &self,
        path: &str,
    ) {
        self.data_changed.lock().push(path.to_string());
    }

    fn node_children_changed(
        &self,
        path: &str,
    ) {
        self.children_changed.lock().push(path.to_string());
    }
}

/// Abort hook that records `(reason, had_cause)` for every call
#[derive(Debug, Default)]
pub struct RecordingAbortable {
    calls: Mutex<Vec<(String, bool)>>,
    hits: AtomicUsize,
}

impl RecordingAbortable {
    pub fn calls(&self) -> Vec<(String, bool)> {
        self.calls.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Abortable for RecordingAbortable {
    fn abort(
        &self,
        why: &str,
        cause: Option<Error>,
    ) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().push((why.to_string(), cause.is_some()));
    }
}
