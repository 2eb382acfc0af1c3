//! Cancellable delayed tasks, one outstanding deadline per purpose
//!
//! Replaces the original timer-based debouncing: scheduling a purpose
//! that already has a pending deadline supersedes it, and a view cancels
//! its purposes on teardown. The event loop bounds its poll timeout with
//! [`TimerSet::poll_timeout`] so a due deadline wakes it promptly.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct TimerSet<K> {
    deadlines: HashMap<K, Instant>,
}

impl<K> Default for TimerSet<K> {
    fn default() -> Self {
        Self {
            deadlines: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Copy> TimerSet<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `purpose` to fire after `delay`, superseding any pending
    /// deadline for the same purpose.
    pub fn schedule(&mut self, purpose: K, delay: Duration) {
        self.schedule_at(purpose, Instant::now() + delay);
    }

    pub fn schedule_at(&mut self, purpose: K, deadline: Instant) {
        self.deadlines.insert(purpose, deadline);
    }

    pub fn cancel(&mut self, purpose: K) {
        self.deadlines.remove(&purpose);
    }

    pub fn cancel_all(&mut self) {
        self.deadlines.clear();
    }

    pub fn is_pending(&self, purpose: K) -> bool {
        self.deadlines.contains_key(&purpose)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.values().min().copied()
    }

    /// How long the event loop may block before a timer is due, capped
    pub fn poll_timeout(&self, cap: Duration) -> Duration {
        match self.next_deadline() {
            Some(deadline) => deadline
                .saturating_duration_since(Instant::now())
                .min(cap),
            None => cap,
        }
    }

    /// Remove and return every purpose whose deadline has passed
    pub fn fire(&mut self) -> Vec<K> {
        self.fire_at(Instant::now())
    }

    pub fn fire_at(&mut self, now: Instant) -> Vec<K> {
        let due: Vec<K> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(purpose, _)| *purpose)
            .collect();
        for purpose in &due {
            self.deadlines.remove(purpose);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Purpose {
        Autosave,
        Search,
    }

    #[test]
    fn test_fire_returns_due_purposes_once() {
        let mut timers = TimerSet::new();
        let now = Instant::now();
        timers.schedule_at(Purpose::Autosave, now);

        assert_eq!(timers.fire_at(now), vec![Purpose::Autosave]);
        assert!(timers.fire_at(now).is_empty());
    }

    #[test]
    fn test_reschedule_supersedes_pending_deadline() {
        let mut timers = TimerSet::new();
        let now = Instant::now();

        timers.schedule_at(Purpose::Autosave, now);
        timers.schedule_at(Purpose::Autosave, now + Duration::from_secs(10));

        // The earlier deadline was replaced, so nothing fires yet
        assert!(timers.fire_at(now).is_empty());
        assert!(timers.is_pending(Purpose::Autosave));
    }

    #[test]
    fn test_cancel_clears_one_purpose() {
        let mut timers = TimerSet::new();
        let now = Instant::now();

        timers.schedule_at(Purpose::Autosave, now);
        timers.schedule_at(Purpose::Search, now);
        timers.cancel(Purpose::Autosave);

        assert_eq!(timers.fire_at(now), vec![Purpose::Search]);
    }

    #[test]
    fn test_cancel_all_clears_everything() {
        let mut timers = TimerSet::new();
        timers.schedule(Purpose::Autosave, Duration::from_millis(1));
        timers.schedule(Purpose::Search, Duration::from_millis(1));

        timers.cancel_all();
        assert_eq!(timers.next_deadline(), None);
    }

    #[test]
    fn test_poll_timeout_is_capped() {
        let mut timers: TimerSet<Purpose> = TimerSet::new();
        let cap = Duration::from_millis(100);
        assert_eq!(timers.poll_timeout(cap), cap);

        timers.schedule(Purpose::Search, Duration::from_secs(60));
        assert_eq!(timers.poll_timeout(cap), cap);

        timers.schedule(Purpose::Search, Duration::from_millis(0));
        assert!(timers.poll_timeout(cap) <= cap);
    }
}
