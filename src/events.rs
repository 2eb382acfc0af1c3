//! Typed events between the library, author, and learn views
//!
//! The views never call each other directly; they publish onto the bus
//! and the router drains it once per loop iteration.

use std::collections::VecDeque;

use uuid::Uuid;

/// Cross-view event payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Open the learn view on a capsule
    OpenLearn(Uuid),
    /// Open the author view, editing an existing capsule or a blank one
    OpenAuthor(Option<Uuid>),
    /// A capsule record (and its index entry) was persisted
    CapsuleSaved(Uuid),
    /// The author view was dismissed without saving
    AuthorCancelled,
}

/// FIFO event queue shared by the views
#[derive(Debug, Default)]
pub struct EventBus {
    queue: VecDeque<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, event: AppEvent) {
        self.queue.push_back(event);
    }

    /// Take all pending events in publish order
    pub fn drain(&mut self) -> Vec<AppEvent> {
        self.queue.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_drain_in_publish_order() {
        let mut bus = EventBus::new();
        let id = Uuid::new_v4();

        bus.publish(AppEvent::CapsuleSaved(id));
        bus.publish(AppEvent::OpenLearn(id));

        assert_eq!(
            bus.drain(),
            vec![AppEvent::CapsuleSaved(id), AppEvent::OpenLearn(id)]
        );
        assert!(bus.is_empty());
    }

    #[test]
    fn test_drain_empties_the_queue() {
        let mut bus = EventBus::new();
        bus.publish(AppEvent::AuthorCancelled);
        bus.drain();
        assert!(bus.drain().is_empty());
    }
}
