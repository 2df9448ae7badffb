use lazy_static::lazy_static;
use prometheus::IntCounter;
use prometheus::IntCounterVec;
use prometheus::IntGauge;
use prometheus::Opts;
use prometheus::Registry;

lazy_static! {
    pub static ref EVENTS_RECEIVED: IntCounterVec = IntCounterVec::new(
        Opts::new("zk_watcher_events_total", "Events received from the coordination service"),
        &["event_type"]
    )
    .expect("metric can not be created");

    pub static ref CONNECTION_STATE_CHANGES: IntCounterVec = IntCounterVec::new(
        Opts::new("zk_watcher_connection_state_total", "Connection state events by state"),
        &["state"]
    )
    .expect("metric can not be created");

    pub static ref SESSION_ABORTS: IntCounter =
        IntCounter::new("zk_watcher_aborts_total", "Abort requests raised on session expiry")
            .expect("metric can not be created");

    pub static ref REGISTERED_LISTENERS: IntGauge =
        IntGauge::new(
            "zk_watcher_registered_listeners",
            "Listener registrations accepted by all watchers in this process"
        )
            .expect("metric can not be created");
}

/// Attach the watcher collectors to `registry`
pub fn register_custom_metrics(registry: &Registry) {
    registry
        .register(Box::new(EVENTS_RECEIVED.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(CONNECTION_STATE_CHANGES.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(SESSION_ABORTS.clone()))
        .expect("collector can be registered");
    registry
        .register(Box::new(REGISTERED_LISTENERS.clone()))
        .expect("collector can be registered");
}
