use std::sync::Arc;

use zk_watcher::ConnectionError;
use zk_watcher::Error;
use zk_watcher::KeeperErrorCode;
use zk_watcher::MemoryZooKeeper;
use zk_watcher::WatcherConfig;
use zk_watcher::ZooKeeperWatcher;

use crate::common::start_watcher;
use crate::common::AbortLog;

#[tokio::test(flavor = "multi_thread")]
async fn construction_bootstraps_the_namespace() {
    let zk = MemoryZooKeeper::new();
    let zkw = start_watcher(&zk, "boot", None).await;

    for path in [
        "/hbase-like-root",
        "/hbase-like-root/unassigned",
        "/hbase-like-root/rs",
        "/hbase-like-root/table",
    ] {
        assert!(zk.exists(path), "{path} missing");
    }
    assert!(!zk.exists("/hbase-like-root/master"));
    assert_eq!(zkw.quorum(), "localhost:2181");
    assert_eq!(zkw.paths().cluster_state, "/hbase-like-root/shutdown");

    zkw.close().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn second_watcher_reuses_existing_namespace() {
    let zk = MemoryZooKeeper::new();
    let first = start_watcher(&zk, "one", None).await;
    let second = start_watcher(&zk, "two", None).await;

    assert_eq!(zk.session_count(), 2);

    first.close().await;
    second.close().await;
    assert_eq!(zk.session_count(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn custom_parent_is_honoured() {
    let zk = MemoryZooKeeper::new();
    let mut config = WatcherConfig::default();
    config.zookeeper.znode.parent = "/cluster-b".into();
    config.zookeeper.znode.unassigned = "transition".into();

    let zkw = ZooKeeperWatcher::new(&config, "custom", None, &zk).await.unwrap();

    assert!(zk.exists("/cluster-b/transition"));
    assert_eq!(zkw.paths().assignment, "/cluster-b/transition");

    zkw.close().await;
}

#[tokio::test]
async fn refused_connection_yields_connection_error() {
    let zk = MemoryZooKeeper::new();
    zk.refuse_connections(Some("no quorum"));

    let result = ZooKeeperWatcher::new(&WatcherConfig::default(), "refused", None, &zk).await;

    assert!(matches!(result, Err(Error::Connection(ConnectionError::Refused { .. }))));
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_bootstrap_leaves_no_session_behind() {
    let zk = MemoryZooKeeper::new();
    zk.fail_creates_with(Some(KeeperErrorCode::NoAuth));

    let result = ZooKeeperWatcher::new(&WatcherConfig::default(), "denied", None, &zk).await;

    match result {
        Err(Error::Construction { path, source }) => {
            assert_eq!(path, "/hbase-like-root");
            assert_eq!(source.code, KeeperErrorCode::NoAuth);
        }
        other => panic!("expected construction error, got {:?}", other.map(|_| ())),
    }
    assert_eq!(zk.session_count(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn disconnect_is_tolerated_and_expiry_aborts_once() {
    let zk = MemoryZooKeeper::new();
    let aborts = Arc::new(AbortLog::default());
    let zkw = start_watcher(&zk, "expiring", Some(aborts.clone())).await;

    zk.disconnect();
    zk.reconnect();
    zk.sync();
    assert!(aborts.reasons().is_empty());

    zk.expire_sessions();
    zk.sync();

    let reasons = aborts.reasons();
    assert_eq!(reasons.len(), 1);
    assert!(!reasons[0].0.is_empty());
    assert!(!reasons[0].1, "abort must carry no cause");

    let err = zkw
        .zookeeper()
        .create_if_absent("/hbase-like-root/master")
        .await
        .or_else(|e| zkw.handle_keeper_error(e))
        .unwrap_err();
    assert_eq!(err.code, KeeperErrorCode::SessionExpired);

    zkw.close().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn expiry_without_abort_callback_is_harmless() {
    let zk = MemoryZooKeeper::new();
    let zkw = start_watcher(&zk, "no-abort", None).await;

    zk.expire_sessions();
    zk.sync();

    zkw.close().await;
    assert!(zkw.is_closed());
}

#[tokio::test(flavor = "multi_thread")]
async fn interrupted_close_does_not_surface() {
    let zk = MemoryZooKeeper::new();
    let zkw = start_watcher(&zk, "interrupted", None).await;
    zk.interrupt_closes(true);

    zkw.close().await;
    zkw.close().await;

    assert!(zkw.is_closed());
}

#[tokio::test(flavor = "multi_thread")]
async fn dropping_a_watcher_without_close_releases_its_session() {
    let zk = MemoryZooKeeper::new();
    let dropped = start_watcher(&zk, "dropped", None).await;
    let kept = start_watcher(&zk, "kept", None).await;
    assert_eq!(zk.session_count(), 2);

    drop(dropped);

    assert_eq!(zk.session_count(), 1);
    zk.create("/hbase-like-root/master", b"host:port").unwrap();
    zk.sync();
    assert!(zk.exists("/hbase-like-root/master"));

    kept.close().await;
    assert_eq!(zk.session_count(), 0);
}
