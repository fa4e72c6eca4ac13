use std::collections::HashMap;

use super::{apply_change, EventStore, StoreError};
use crate::models::event::{DateChange, Event};

/// Event store backed by a map keyed by event id
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventStore {
    events: HashMap<String, Event>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: impl IntoIterator<Item = Event>) -> Self {
        let mut store = Self::new();
        for event in events {
            store.insert(event);
        }
        store
    }

    /// Insert or replace an event, returning the previous version
    pub fn insert(&mut self, event: Event) -> Option<Event> {
        self.events.insert(event.id.clone(), event)
    }

    pub fn remove(&mut self, id: &str) -> Option<Event> {
        self.events.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.get(id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventStore for InMemoryEventStore {
    fn list(&self) -> Result<Vec<Event>, StoreError> {
        let mut events: Vec<Event> = self.events.values().cloned().collect();
        events.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
        Ok(events)
    }

    fn update(&mut self, id: &str, change: DateChange) -> Result<Event, StoreError> {
        let current = self
            .events
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let updated = apply_change(current, &change)?;
        self.events.insert(id.to_string(), updated.clone());
        Ok(updated)
    }
}
