//! Read-only access to the event store.

use chrono::NaiveDate;

use super::EventStore;
use crate::models::event::{events_for_day, Event, EventId};

impl EventStore {
    /// Current value of an event, if it exists.
    pub fn get(&self, id: EventId) -> Option<Event> {
        self.state().events.iter().find(|e| e.id == id).cloned()
    }

    /// Snapshot of every event in store order.
    pub fn events(&self) -> Vec<Event> {
        self.state().events.clone()
    }

    /// Events shown on `day`, in start order.
    pub fn events_on(&self, day: NaiveDate) -> Vec<Event> {
        let state = self.state();
        let mut events: Vec<Event> = events_for_day(&state.events, day)
            .into_iter()
            .cloned()
            .collect();
        events.sort_by_key(|e| e.start);
        events
    }

    pub fn len(&self) -> usize {
        self.state().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().events.is_empty()
    }

    pub(crate) fn next_id(&self) -> EventId {
        self.state()
            .events
            .iter()
            .map(|e| e.id)
            .max()
            .map_or(1, |max| max + 1)
    }
}
