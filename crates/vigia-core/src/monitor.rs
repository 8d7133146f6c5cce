// ── Monitor abstraction ──
//
// Long-lived polling engine over the sensor API. Owns the HTTP client,
// the reactive DataStore, and three sibling poller tasks (stats,
// recent events, hourly chart), each on its own timer. UIs observe
// through watch channels and never poll the API themselves.

use std::sync::Arc;

use tokio::sync::{Mutex, Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use chrono::Utc;

use crate::config::MonitorConfig;
use crate::error::CoreError;
use crate::model::{DetectionLog, HourlySeries, MotionEvent, MotionStats};
use crate::store::DataStore;

use vigia_api::{HealthReport, Pagination, RegisterReceipt, SensorClient, TransportConfig};

// ── LinkState ────────────────────────────────────────────────────────

/// Health of the connection to the sensor API, observable by consumers.
///
/// Only the stats poller drives transitions: it runs on the tightest
/// cadence and its payload is the headline data. Events/chart poll
/// failures are logged but do not flip the link on their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// No poll has completed yet.
    Starting,
    /// The most recent stats poll succeeded.
    Online,
    /// The most recent stats poll failed. Previously published data
    /// stays available (stale but displayed).
    Degraded {
        message: String,
        /// Consecutive stats poll failures.
        failures: u32,
    },
}

impl LinkState {
    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

// ── Monitor ──────────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<MonitorInner>`. `start()` spawns the
/// poller tasks (each performs its first fetch immediately, without
/// waiting for a tick); `stop()` cancels and joins them.
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    config: MonitorConfig,
    client: SensorClient,
    store: Arc<DataStore>,
    link: watch::Sender<LinkState>,
    refresh: Notify,
    cancel: CancellationToken,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Monitor {
    /// Create a new Monitor from configuration. Builds the HTTP client
    /// but issues no requests -- call [`start()`](Self::start) to begin
    /// polling.
    pub fn new(config: MonitorConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
            ..TransportConfig::default()
        };
        let client = SensorClient::new(&config.api_url, &transport)?;

        let (link, _) = watch::channel(LinkState::Starting);

        Ok(Self {
            inner: Arc::new(MonitorInner {
                config,
                client,
                store: Arc::new(DataStore::new()),
                link,
                refresh: Notify::new(),
                cancel: CancellationToken::new(),
                tasks: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Access the monitor configuration.
    pub fn config(&self) -> &MonitorConfig {
        &self.inner.config
    }

    /// Access the underlying DataStore.
    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Spawn the three poller tasks.
    ///
    /// Each task polls once immediately, then on its own interval.
    /// Calling `start()` twice is a no-op.
    pub async fn start(&self) {
        let mut tasks = self.inner.tasks.lock().await;
        if !tasks.is_empty() {
            warn!("monitor already started");
            return;
        }

        tasks.push(tokio::spawn(stats_task(
            self.clone(),
            self.inner.cancel.clone(),
        )));
        tasks.push(tokio::spawn(events_task(
            self.clone(),
            self.inner.cancel.clone(),
        )));
        tasks.push(tokio::spawn(chart_task(
            self.clone(),
            self.inner.cancel.clone(),
        )));

        info!(url = %self.inner.config.api_url, "monitor started");
    }

    /// Cancel the poller tasks and wait for them to finish.
    ///
    /// A poller busy with a fetch completes it first, so `stop()` can
    /// take up to one request timeout; nothing is published after it
    /// returns.
    pub async fn stop(&self) {
        self.inner.cancel.cancel();

        let mut tasks = self.inner.tasks.lock().await;
        for handle in tasks.drain(..) {
            let _ = handle.await;
        }
        debug!("monitor stopped");
    }

    /// Ask all three pollers to poll now, without waiting for their
    /// next tick. Pacing still applies: a poller busy with an in-flight
    /// fetch simply continues it.
    pub fn refresh_now(&self) {
        debug!("manual refresh requested");
        self.inner.refresh.notify_waiters();
    }

    // ── State observation ────────────────────────────────────────────

    /// Subscribe to link state changes.
    pub fn link_state(&self) -> watch::Receiver<LinkState> {
        self.inner.link.subscribe()
    }

    /// The link state right now.
    pub fn current_link(&self) -> LinkState {
        self.inner.link.borrow().clone()
    }

    // ── One-shot queries ─────────────────────────────────────────────
    //
    // Fetch-and-convert calls that bypass the pollers and the store.
    // The CLI uses these for scripted lookups; the pollers never do.

    /// Fetch the aggregate counters once.
    pub async fn fetch_stats(&self) -> Result<MotionStats, CoreError> {
        let raw = self.inner.client.stats().await?;
        Ok(MotionStats::from(raw))
    }

    /// Fetch one page of events, newest-first, plus pagination metadata
    /// when the server sends it.
    pub async fn fetch_movements(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<MotionEvent>, Option<Pagination>), CoreError> {
        let fetched = self.inner.client.movements(page, limit).await?;
        let events = fetched.movements.into_iter().map(MotionEvent::from).collect();
        Ok((events, fetched.pagination))
    }

    /// Fetch a single event by id.
    pub async fn fetch_movement(&self, id: u64) -> Result<MotionEvent, CoreError> {
        let raw = self.inner.client.movement(id).await?;
        Ok(MotionEvent::from(raw))
    }

    /// Register a motion event upstream (the sensor-side write path).
    pub async fn register_motion(&self, description: &str) -> Result<RegisterReceipt, CoreError> {
        Ok(self.inner.client.register(description).await?)
    }

    /// Probe the upstream health endpoint.
    pub async fn check_health(&self) -> Result<HealthReport, CoreError> {
        Ok(self.inner.client.health().await?)
    }

    // ── Poll bodies (called from the tasks below) ────────────────────

    async fn poll_stats(&self) {
        match self.inner.client.stats().await {
            Ok(raw) => {
                let stats = MotionStats::from(raw);
                debug!(total = stats.total, today = stats.today, "stats refreshed");
                self.inner.store.publish_stats(Arc::new(stats));
                self.inner.store.mark_refreshed();
                self.link_online();
            }
            Err(e) => {
                warn!(error = %e, "stats poll failed");
                self.link_degraded(&e);
            }
        }
    }

    async fn poll_events(&self, log: &mut DetectionLog) {
        let limit = u32::try_from(self.inner.config.recent_capacity).unwrap_or(u32::MAX);
        match self.inner.client.movements(1, limit).await {
            Ok(page) => {
                let fresh = page.movements.into_iter().map(MotionEvent::from);
                let changed = log.merge(fresh);
                // Publish on change, and once after the first success so
                // consumers can tell "loading" from "no events yet".
                if changed || self.inner.store.log_snapshot().is_none() {
                    debug!(len = log.len(), "detection log updated");
                    self.inner.store.publish_log(Arc::new(log.clone()));
                }
                self.inner.store.mark_refreshed();
            }
            Err(e) => warn!(error = %e, "events poll failed"),
        }
    }

    async fn poll_chart(&self) {
        let limit = self.inner.config.chart_fetch_limit;
        match self.inner.client.movements(1, limit).await {
            Ok(page) => {
                let events: Vec<MotionEvent> =
                    page.movements.into_iter().map(MotionEvent::from).collect();
                let series = HourlySeries::from_events(&events, Utc::now());
                debug!(detections = series.total(), "hourly series recomputed");
                self.inner.store.publish_series(Arc::new(series));
                self.inner.store.mark_refreshed();
            }
            Err(e) => warn!(error = %e, "chart poll failed"),
        }
    }

    fn link_online(&self) {
        self.inner.link.send_if_modified(|state| {
            if state.is_online() {
                false
            } else {
                *state = LinkState::Online;
                true
            }
        });
    }

    fn link_degraded(&self, err: &vigia_api::Error) {
        self.inner.link.send_modify(|state| {
            let failures = match state {
                LinkState::Degraded { failures, .. } => *failures + 1,
                _ => 1,
            };
            *state = LinkState::Degraded {
                message: err.to_string(),
                failures,
            };
        });
    }
}

// ── Poller tasks ─────────────────────────────────────────────────────
//
// Each poller is a single task that awaits its own fetch inside the
// tick loop. With `MissedTickBehavior::Skip`, ticks that fire while a
// fetch is in flight coalesce into one -- the interval can never stack
// up concurrent requests. All pacing state lives here and dies with
// the task.

/// Poll aggregate counters.
async fn stats_task(monitor: Monitor, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(monitor.inner.config.stats_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => monitor.poll_stats().await,
            _ = monitor.inner.refresh.notified() => monitor.poll_stats().await,
        }
    }
}

/// Poll the first page of events and merge into the detection log.
/// The log lives here: the task is its single writer.
async fn events_task(monitor: Monitor, cancel: CancellationToken) {
    let mut log = DetectionLog::new(monitor.inner.config.recent_capacity);
    let mut interval = tokio::time::interval(monitor.inner.config.events_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => monitor.poll_events(&mut log).await,
            _ = monitor.inner.refresh.notified() => monitor.poll_events(&mut log).await,
        }
    }
}

/// Poll a wider page of events and recompute the hourly series.
async fn chart_task(monitor: Monitor, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(monitor.inner.config.chart_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => monitor.poll_chart().await,
            _ = monitor.inner.refresh.notified() => monitor.poll_chart().await,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::time::Duration;

    use serde_json::json;
    use tokio::time::{sleep, timeout};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LONG: Duration = Duration::from_secs(60);

    /// Monitor pointed at `server`, all pollers effectively parked
    /// after their immediate first poll unless `tweak` shortens them.
    fn test_monitor(server: &MockServer, tweak: impl FnOnce(&mut MonitorConfig)) -> Monitor {
        let mut config = MonitorConfig {
            api_url: server.uri(),
            timeout: Duration::from_secs(5),
            stats_interval: LONG,
            events_interval: LONG,
            chart_interval: LONG,
            ..MonitorConfig::default()
        };
        tweak(&mut config);
        Monitor::new(config).unwrap()
    }

    fn stats_body() -> serde_json::Value {
        json!({
            "success": true,
            "data": {
                "total": 42,
                "hoy": 5,
                "semana": 12,
                "ultimo_movimiento": "2025-08-26 11:58:00"
            }
        })
    }

    fn movement(id: u64, ts: &str) -> serde_json::Value {
        json!({"id": id, "descripcion": "Movimiento detectado", "fecha_hora": ts})
    }

    async fn mount_happy_mocks(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/estadisticas"))
            .respond_with(ResponseTemplate::new(200).set_body_json(stats_body()))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/movimientos"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([movement(1, "2025-08-26 11:58:00")])),
            )
            .mount(server)
            .await;
    }

    async fn requests_for(server: &MockServer, path: &str) -> usize {
        server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.url.path() == path)
            .count()
    }

    #[tokio::test]
    async fn first_poll_happens_immediately() {
        let server = MockServer::start().await;
        mount_happy_mocks(&server).await;

        let monitor = test_monitor(&server, |_| {});
        let mut stats_rx = monitor.store().subscribe_stats();
        let mut log_rx = monitor.store().subscribe_log();
        let mut series_rx = monitor.store().subscribe_series();

        monitor.start().await;

        // All three pollers fetch on start, long before any tick.
        timeout(Duration::from_secs(2), stats_rx.changed())
            .await
            .unwrap()
            .unwrap();
        timeout(Duration::from_secs(2), log_rx.changed())
            .await
            .unwrap()
            .unwrap();
        timeout(Duration::from_secs(2), series_rx.changed())
            .await
            .unwrap()
            .unwrap();

        let stats = monitor.store().stats_snapshot().unwrap();
        assert_eq!(stats.total, 42);
        assert_eq!(monitor.store().log_snapshot().unwrap().len(), 1);
        assert!(monitor.store().series_snapshot().is_some());
        assert!(monitor.store().last_refresh().is_some());
        assert!(monitor.current_link().is_online());

        // One stats fetch, one events fetch, one chart fetch.
        assert_eq!(requests_for(&server, "/api/estadisticas").await, 1);
        assert_eq!(requests_for(&server, "/api/movimientos").await, 2);

        monitor.stop().await;
    }

    #[tokio::test]
    async fn overlapping_ticks_coalesce_into_one_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/estadisticas"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(stats_body())
                    .set_delay(Duration::from_millis(80)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/movimientos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        // Ticks every 20ms against an 80ms response: without
        // coalescing this would fire a request per tick.
        let monitor = test_monitor(&server, |c| {
            c.stats_interval = Duration::from_millis(20);
        });
        monitor.start().await;
        sleep(Duration::from_millis(250)).await;
        monitor.stop().await;

        let n = requests_for(&server, "/api/estadisticas").await;
        assert!(
            (1..=5).contains(&n),
            "expected sequential coalesced polls, got {n} requests"
        );
    }

    #[tokio::test]
    async fn no_requests_or_publishes_after_stop() {
        let server = MockServer::start().await;
        mount_happy_mocks(&server).await;

        let monitor = test_monitor(&server, |c| {
            c.stats_interval = Duration::from_millis(20);
            c.events_interval = Duration::from_millis(20);
            c.chart_interval = Duration::from_millis(20);
        });
        let mut stats_rx = monitor.store().subscribe_stats();

        monitor.start().await;
        sleep(Duration::from_millis(80)).await;
        monitor.stop().await;

        let before = server.received_requests().await.unwrap().len();
        let _ = stats_rx.borrow_and_update();

        sleep(Duration::from_millis(150)).await;

        assert_eq!(server.received_requests().await.unwrap().len(), before);
        assert!(!stats_rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn stats_failure_degrades_link_then_recovers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/estadisticas"))
            .respond_with(ResponseTemplate::new(500).set_body_json(
                json!({"success": false, "message": "Error interno del servidor"}),
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/movimientos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let monitor = test_monitor(&server, |c| {
            c.stats_interval = Duration::from_millis(20);
        });
        let mut link_rx = monitor.link_state();

        monitor.start().await;

        let degraded = timeout(
            Duration::from_secs(2),
            link_rx.wait_for(LinkState::is_degraded),
        )
        .await
        .unwrap()
        .unwrap()
        .clone();
        match degraded {
            LinkState::Degraded { message, failures } => {
                assert!(failures >= 1);
                assert!(message.contains("Error interno"), "message: {message}");
            }
            other => panic!("expected degraded link, got {other:?}"),
        }

        // Upstream comes back; the link recovers on the next poll.
        server.reset().await;
        mount_happy_mocks(&server).await;

        timeout(
            Duration::from_secs(2),
            link_rx.wait_for(LinkState::is_online),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(monitor.store().stats_snapshot().unwrap().total, 42);

        monitor.stop().await;
    }

    #[tokio::test]
    async fn stale_stats_stay_published_while_degraded() {
        let server = MockServer::start().await;
        mount_happy_mocks(&server).await;

        let monitor = test_monitor(&server, |c| {
            c.stats_interval = Duration::from_millis(20);
        });
        let mut stats_rx = monitor.store().subscribe_stats();
        let mut link_rx = monitor.link_state();

        monitor.start().await;
        timeout(Duration::from_secs(2), stats_rx.changed())
            .await
            .unwrap()
            .unwrap();

        // Upstream starts failing; the old snapshot must remain.
        server.reset().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        timeout(
            Duration::from_secs(2),
            link_rx.wait_for(LinkState::is_degraded),
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(monitor.store().stats_snapshot().unwrap().total, 42);

        monitor.stop().await;
    }

    #[tokio::test]
    async fn manual_refresh_polls_all_three() {
        let server = MockServer::start().await;
        mount_happy_mocks(&server).await;

        let monitor = test_monitor(&server, |_| {});
        let mut stats_rx = monitor.store().subscribe_stats();
        let mut series_rx = monitor.store().subscribe_series();

        monitor.start().await;
        timeout(Duration::from_secs(2), stats_rx.changed())
            .await
            .unwrap()
            .unwrap();
        timeout(Duration::from_secs(2), series_rx.changed())
            .await
            .unwrap()
            .unwrap();

        // Let every task park on its select before notifying.
        sleep(Duration::from_millis(50)).await;
        let before = server.received_requests().await.unwrap().len();

        monitor.refresh_now();
        sleep(Duration::from_millis(200)).await;

        let after = server.received_requests().await.unwrap().len();
        assert_eq!(after, before + 3);

        monitor.stop().await;
    }

    #[tokio::test]
    async fn events_merge_and_dedup_across_polls() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/estadisticas"))
            .respond_with(ResponseTemplate::new(200).set_body_json(stats_body()))
            .mount(&server)
            .await;
        // Chart poller fetches with its own page size; keep it inert.
        Mock::given(method("GET"))
            .and(path("/api/movimientos"))
            .and(query_param("limit", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        // First events poll: ids {2, 1}. Later polls: ids {3, 2}.
        Mock::given(method("GET"))
            .and(path("/api/movimientos"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                movement(2, "2025-08-26 11:50:00"),
                movement(1, "2025-08-26 11:40:00"),
            ])))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/movimientos"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                movement(3, "2025-08-26 11:55:00"),
                movement(2, "2025-08-26 11:50:00"),
            ])))
            .mount(&server)
            .await;

        let monitor = test_monitor(&server, |c| {
            c.events_interval = Duration::from_millis(20);
        });
        let mut log_rx = monitor.store().subscribe_log();

        monitor.start().await;

        let log = timeout(
            Duration::from_secs(2),
            log_rx.wait_for(|log| log.as_ref().is_some_and(|l| l.len() == 3)),
        )
        .await
        .unwrap()
        .unwrap()
        .clone()
        .unwrap();

        let ids: Vec<u64> = log.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        monitor.stop().await;
    }

    #[tokio::test]
    async fn empty_first_page_publishes_an_empty_log() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/estadisticas"))
            .respond_with(ResponseTemplate::new(200).set_body_json(stats_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/movimientos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let monitor = test_monitor(&server, |c| {
            c.events_interval = Duration::from_millis(20);
        });
        let mut log_rx = monitor.store().subscribe_log();

        monitor.start().await;

        // "No events yet" is published; "still loading" never was.
        timeout(Duration::from_secs(2), log_rx.changed())
            .await
            .unwrap()
            .unwrap();
        let log = log_rx.borrow_and_update().clone().unwrap();
        assert!(log.is_empty());

        // Identical polls afterwards publish nothing.
        sleep(Duration::from_millis(100)).await;
        assert!(!log_rx.has_changed().unwrap());

        monitor.stop().await;
    }

    #[tokio::test]
    async fn one_shot_queries_bypass_the_store() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/movimiento/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": movement(7, "2025-08-26 11:58:00")
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/movimiento/99"))
            .respond_with(ResponseTemplate::new(404).set_body_json(
                json!({"success": false, "message": "Movimiento no encontrado"}),
            ))
            .mount(&server)
            .await;

        let monitor = test_monitor(&server, |_| {});

        let event = monitor.fetch_movement(7).await.unwrap();
        assert_eq!(event.id, 7);

        let err = monitor.fetch_movement(99).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));

        // Never started, so nothing was published.
        assert!(monitor.store().stats_snapshot().is_none());
        assert!(monitor.store().last_refresh().is_none());
    }

    #[tokio::test]
    async fn events_failures_do_not_flip_the_link() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/estadisticas"))
            .respond_with(ResponseTemplate::new(200).set_body_json(stats_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/movimientos"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let monitor = test_monitor(&server, |c| {
            c.stats_interval = Duration::from_millis(20);
            c.events_interval = Duration::from_millis(20);
        });
        let mut link_rx = monitor.link_state();

        monitor.start().await;
        timeout(
            Duration::from_secs(2),
            link_rx.wait_for(LinkState::is_online),
        )
        .await
        .unwrap()
        .unwrap();

        sleep(Duration::from_millis(100)).await;
        assert!(monitor.current_link().is_online());
        assert!(monitor.store().log_snapshot().is_none());

        monitor.stop().await;
    }
}
