//! Terminal event reader: multiplexes crossterm input with tick and
//! render deadlines onto a single channel.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Application-level tick cadence (data age, relative timestamps).
const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Frame budget, roughly 30fps.
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

#[derive(Debug, Clone)]
pub enum Event {
    Tick,
    Render,
    Key(KeyEvent),
    Resize(u16, u16),
}

/// Spawned reader task feeding [`Event`]s to the application loop.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        tokio::spawn(async move {
            event_loop(&tx, &token).await;
        });
        Self { rx, cancel }
    }

    /// Next event, or `None` once the reader task has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

impl Default for EventReader {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn event_loop(tx: &mpsc::UnboundedSender<Event>, cancel: &CancellationToken) {
    let mut stream = EventStream::new();
    let mut tick = tokio::time::interval(TICK_INTERVAL);
    let mut render = tokio::time::interval(RENDER_INTERVAL);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    render.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let event = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            maybe = stream.next() => match maybe {
                Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                    Event::Key(key)
                }
                Some(Ok(CrosstermEvent::Resize(w, h))) => Event::Resize(w, h),
                Some(Ok(_)) => continue,
                Some(Err(err)) => {
                    tracing::error!(%err, "terminal event stream failed");
                    break;
                }
                None => break,
            },
            _ = tick.tick() => Event::Tick,
            _ = render.tick() => Event::Render,
        };
        if tx.send(event).is_err() {
            break;
        }
    }
}
