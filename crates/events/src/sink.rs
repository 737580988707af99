use std::collections::VecDeque;
use std::sync::RwLock;

use crate::event::SecurityEvent;

/// Bounded in-memory ring of recent security events.
///
/// Recording is the hot path: one structured log line plus a ring append
/// under a short write lock. The ring is a diagnostic window, not an audit
/// trail; once `capacity` is reached the oldest event is evicted.
pub struct EventSink {
    events: RwLock<VecDeque<SecurityEvent>>,
    capacity: usize,
}

impl EventSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn record(&self, event: SecurityEvent) {
        tracing::warn!(
            kind = event.kind.as_str(),
            identity = %event.identity,
            endpoint = %event.endpoint,
            detail = %event.detail,
            "security event"
        );

        let mut events = self.events.write().expect("event ring lock poisoned");
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    /// The most recent events, newest first.
    pub fn recent(&self, limit: usize) -> Vec<SecurityEvent> {
        let events = self.events.read().expect("event ring lock poisoned");
        events.iter().rev().take(limit).cloned().collect()
    }

    /// All retained events in arrival order.
    pub fn snapshot(&self) -> Vec<SecurityEvent> {
        let events = self.events.read().expect("event ring lock poisoned");
        events.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.read().expect("event ring lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
