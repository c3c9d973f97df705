//! Timer APIs
//!
//! setTimeout/clearTimeout on a virtual millisecond clock. Timers fire in
//! order of due time, ties broken by creation order.

use std::collections::BTreeMap;

/// Timer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u32);

/// Timer entry
#[derive(Debug)]
pub struct Timer<T> {
    pub id: TimerId,
    pub delay_ms: u64,
    pub scheduled_at: u64,
    pub callback: T,
}

impl<T> Timer<T> {
    pub fn due_at(&self) -> u64 {
        self.scheduled_at.saturating_add(self.delay_ms)
    }
}

/// Timer manager
#[derive(Debug)]
pub struct TimerManager<T> {
    timers: BTreeMap<(u64, TimerId), Timer<T>>,
    next_id: u32,
}

impl<T> Default for TimerManager<T> {
    fn default() -> Self {
        Self {
            timers: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> TimerManager<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a timeout scheduled at `now`
    pub fn set_timeout(&mut self, now: u64, delay_ms: u64, callback: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let timer = Timer {
            id,
            delay_ms,
            scheduled_at: now,
            callback,
        };
        self.timers.insert((timer.due_at(), id), timer);
        id
    }

    /// Clear a timer; returns whether it was pending
    pub fn clear(&mut self, id: TimerId) -> bool {
        let key = self.timers.keys().find(|(_, tid)| *tid == id).copied();
        key.and_then(|k| self.timers.remove(&k)).is_some()
    }

    /// Due time of the earliest timer
    pub fn next_due(&self) -> Option<u64> {
        self.timers.keys().next().map(|(due, _)| *due)
    }

    /// Remove and return the earliest timer if it is due at or before `until`
    pub fn pop_due(&mut self, until: u64) -> Option<Timer<T>> {
        let (&key, _) = self.timers.first_key_value()?;
        if key.0 <= until {
            self.timers.remove(&key)
        } else {
            None
        }
    }

    /// Check if there are pending timers
    pub fn has_pending(&self) -> bool {
        !self.timers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Time until next timer fires
    pub fn time_until_next(&self, now: u64) -> Option<u64> {
        self.next_due().map(|due| due.saturating_sub(now))
    }
}
