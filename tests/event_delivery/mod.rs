use std::sync::Arc;

use zk_watcher::MemoryZooKeeper;
use zk_watcher::ZooKeeperListener;

use crate::common::start_watcher;
use crate::common::EventLog;

#[tokio::test(flavor = "multi_thread")]
async fn node_created_under_assignment_reaches_both_listeners() {
    let zk = MemoryZooKeeper::new();
    let zkw = start_watcher(&zk, "master", None).await;
    let first = Arc::new(EventLog::default());
    let second = Arc::new(EventLog::default());
    zkw.register_listener(first.clone());
    zkw.register_listener(second.clone());
    zk.sync();

    zk.create("/hbase-like-root/unassigned/region-5", b"opening").unwrap();
    zk.sync();

    for listener in [&first, &second] {
        assert_eq!(
            listener.paths_of("created"),
            vec!["/hbase-like-root/unassigned/region-5".to_string()]
        );
        assert_eq!(
            listener.paths_of("children_changed"),
            vec!["/hbase-like-root/unassigned".to_string()]
        );
    }

    zkw.close().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn events_arrive_in_transport_order() {
    let zk = MemoryZooKeeper::new();
    let zkw = start_watcher(&zk, "rs", None).await;
    let log = Arc::new(EventLog::default());
    zkw.register_listener(log.clone());
    zk.sync();

    zk.create("/hbase-like-root/rs/host1", b"").unwrap();
    zk.set_data("/hbase-like-root/rs/host1", b"load=3").unwrap();
    zk.delete("/hbase-like-root/rs/host1").unwrap();
    zk.sync();

    assert_eq!(
        log.entries(),
        vec![
            ("created", "/hbase-like-root/rs/host1".to_string()),
            ("children_changed", "/hbase-like-root/rs".to_string()),
            ("data_changed", "/hbase-like-root/rs/host1".to_string()),
            ("deleted", "/hbase-like-root/rs/host1".to_string()),
            ("children_changed", "/hbase-like-root/rs".to_string()),
        ]
    );

    zkw.close().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn listener_registered_later_misses_earlier_events() {
    let zk = MemoryZooKeeper::new();
    let zkw = start_watcher(&zk, "late", None).await;
    let early = Arc::new(EventLog::default());
    zkw.register_listener(early.clone());

    zk.create("/hbase-like-root/table/t1", b"").unwrap();
    zk.sync();
    let late = Arc::new(EventLog::default());
    zkw.register_listener(late.clone());
    zk.create("/hbase-like-root/table/t2", b"").unwrap();
    zk.sync();

    assert_eq!(early.paths_of("created").len(), 2);
    assert_eq!(late.paths_of("created"), vec!["/hbase-like-root/table/t2".to_string()]);

    zkw.close().await;
}

/// Only interested in deletions; everything else falls through to the
/// trait's no-op defaults.
#[derive(Default)]
struct DeletionCounter {
    deleted: std::sync::atomic::AtomicUsize,
}

impl ZooKeeperListener for DeletionCounter {
    fn node_deleted(
        &self,
        _path: &str,
    ) {
        self.deleted.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn partial_listener_only_sees_its_kind() {
    let zk = MemoryZooKeeper::new();
    let zkw = start_watcher(&zk, "partial", None).await;
    let counter = Arc::new(DeletionCounter::default());
    zkw.register_listener(counter.clone());

    zk.create("/hbase-like-root/master", b"host:port").unwrap();
    zk.delete("/hbase-like-root/master").unwrap();
    zk.sync();

    assert_eq!(counter.deleted.load(std::sync::atomic::Ordering::SeqCst), 1);

    zkw.close().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn registration_from_another_thread_during_delivery() {
    let zk = MemoryZooKeeper::new();
    let zkw = Arc::new(start_watcher(&zk, "busy", None).await);
    let steady = Arc::new(EventLog::default());
    zkw.register_listener(steady.clone());

    let registrar = {
        let zkw = zkw.clone();
        std::thread::spawn(move || {
            for _ in 0..100 {
                zkw.register_listener(Arc::new(EventLog::default()));
            }
        })
    };
    for i in 0..100 {
        zk.create(&format!("/hbase-like-root/unassigned/r{i}"), b"").unwrap();
    }
    registrar.join().unwrap();
    zk.sync();

    assert_eq!(steady.paths_of("created").len(), 100);
    assert_eq!(zkw.listener_count(), 101);

    zkw.close().await;
}
