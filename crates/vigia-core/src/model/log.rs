// ── Bounded, deduplicated detection log ──
//
// The recent-events poller merges each page it fetches into one of
// these. The log is the single place where ordering, deduplication,
// and capacity are enforced, so the pollers stay trivial.

use super::event::MotionEvent;

/// A bounded, newest-first sequence of unique motion events.
///
/// Invariants: no two events share an `id`; `len() <= capacity()`;
/// events are ordered by `(occurred_at, id)` descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionLog {
    events: Vec<MotionEvent>,
    capacity: usize,
}

impl DetectionLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events, newest first.
    pub fn events(&self) -> &[MotionEvent] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MotionEvent> {
        self.events.iter()
    }

    /// The most recent event, if any.
    pub fn latest(&self) -> Option<&MotionEvent> {
        self.events.first()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.events.iter().any(|e| e.id == id)
    }

    /// Merge a freshly fetched batch into the log.
    ///
    /// Events whose `id` is already present are skipped, new events are
    /// inserted in order, and the oldest events are evicted once the
    /// log is over capacity. Returns `true` only when the visible
    /// content changed, so callers can publish exactly when needed.
    /// Merging the same batch twice is a no-op the second time.
    pub fn merge<I>(&mut self, batch: I) -> bool
    where
        I: IntoIterator<Item = MotionEvent>,
    {
        let mut changed = false;
        for event in batch {
            if self.contains(event.id) {
                continue;
            }
            let pos = self
                .events
                .partition_point(|e| e.sort_key() > event.sort_key());
            if pos >= self.capacity {
                // Older than everything in a full log: it would be
                // evicted immediately, so don't report a change.
                continue;
            }
            self.events.insert(pos, event);
            if self.events.len() > self.capacity {
                self.events.pop();
            }
            changed = true;
        }
        changed
    }
}

impl<'a> IntoIterator for &'a DetectionLog {
    type Item = &'a MotionEvent;
    type IntoIter = std::slice::Iter<'a, MotionEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 26, 12, 0, 0).unwrap()
    }

    /// Event `id` occurring `minutes` after the base instant.
    fn event(id: u64, minutes: i64) -> MotionEvent {
        MotionEvent {
            id,
            description: "Movimiento detectado".into(),
            occurred_at: base() + chrono::Duration::minutes(minutes),
        }
    }

    fn ids(log: &DetectionLog) -> Vec<u64> {
        log.iter().map(|e| e.id).collect()
    }

    #[test]
    fn merge_is_idempotent() {
        let mut log = DetectionLog::new(10);
        let batch = vec![event(3, 3), event(2, 2), event(1, 1)];

        assert!(log.merge(batch.clone()));
        let after_first = log.clone();

        assert!(!log.merge(batch));
        assert_eq!(log, after_first);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn duplicate_ids_appear_once() {
        let mut log = DetectionLog::new(10);
        log.merge(vec![event(5, 5)]);

        // Next poll returns the known event plus a newer one.
        assert!(log.merge(vec![event(6, 6), event(5, 5)]));
        assert_eq!(ids(&log), vec![6, 5]);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut log = DetectionLog::new(10);
        log.merge((1..=10).map(|i| event(i, i64::try_from(i).unwrap())));
        assert_eq!(log.len(), 10);

        assert!(log.merge(vec![event(11, 11)]));
        assert_eq!(log.len(), 10);
        assert!(log.contains(11));
        assert!(!log.contains(1));
        assert_eq!(log.latest().unwrap().id, 11);
    }

    #[test]
    fn events_stay_newest_first() {
        let mut log = DetectionLog::new(10);
        log.merge(vec![event(2, 2), event(4, 4), event(1, 1), event(3, 3)]);
        assert_eq!(ids(&log), vec![4, 3, 2, 1]);
    }

    #[test]
    fn equal_timestamps_order_by_id() {
        let mut log = DetectionLog::new(10);
        log.merge(vec![event(7, 1), event(9, 1), event(8, 1)]);
        assert_eq!(ids(&log), vec![9, 8, 7]);
    }

    #[test]
    fn stale_event_into_full_log_is_not_a_change() {
        let mut log = DetectionLog::new(3);
        log.merge(vec![event(3, 3), event(4, 4), event(5, 5)]);
        let before = log.clone();

        // Older than everything retained: merging must not publish.
        assert!(!log.merge(vec![event(1, 1)]));
        assert_eq!(log, before);
    }

    #[test]
    fn empty_batch_is_not_a_change() {
        let mut log = DetectionLog::new(10);
        assert!(!log.merge(Vec::new()));
        assert!(log.is_empty());
    }
}
