//! Bridges the monitor's watch channels into the action stream.

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use vigia_core::Monitor;

use crate::action::Action;

/// Spawn the task that feeds store updates into the action channel.
///
/// Starts the monitor's pollers, replays any snapshots the store
/// already holds, then forwards every watch change until cancelled.
/// The monitor is stopped on the way out.
pub fn spawn(
    monitor: Monitor,
    action_tx: UnboundedSender<Action>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        monitor.start().await;
        forward(&monitor, &action_tx, &cancel).await;
        monitor.stop().await;
    })
}

async fn forward(
    monitor: &Monitor,
    action_tx: &UnboundedSender<Action>,
    cancel: &CancellationToken,
) {
    let store = monitor.store();
    let mut stats_rx = store.subscribe_stats();
    let mut log_rx = store.subscribe_log();
    let mut series_rx = store.subscribe_series();
    let mut refresh_rx = store.subscribe_last_refresh();
    let mut link_rx = monitor.link_state();

    // Replay state published before this task subscribed.
    if let Some(stats) = store.stats_snapshot() {
        let _ = action_tx.send(Action::StatsUpdated(stats));
    }
    if let Some(log) = store.log_snapshot() {
        let _ = action_tx.send(Action::LogUpdated(log));
    }
    if let Some(series) = store.series_snapshot() {
        let _ = action_tx.send(Action::SeriesUpdated(series));
    }
    if let Some(at) = store.last_refresh() {
        let _ = action_tx.send(Action::RefreshedAt(at));
    }
    let _ = action_tx.send(Action::LinkChanged(monitor.current_link()));

    loop {
        let action = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            Ok(()) = link_rx.changed() => {
                Some(Action::LinkChanged(link_rx.borrow_and_update().clone()))
            }
            Ok(()) = stats_rx.changed() => {
                stats_rx.borrow_and_update().clone().map(Action::StatsUpdated)
            }
            Ok(()) = log_rx.changed() => {
                log_rx.borrow_and_update().clone().map(Action::LogUpdated)
            }
            Ok(()) = series_rx.changed() => {
                series_rx.borrow_and_update().clone().map(Action::SeriesUpdated)
            }
            Ok(()) = refresh_rx.changed() => {
                (*refresh_rx.borrow_and_update()).map(Action::RefreshedAt)
            }
        };
        let Some(action) = action else { continue };
        if action_tx.send(action).is_err() {
            break;
        }
    }
}
