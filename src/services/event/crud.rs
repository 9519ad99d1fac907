//! Create, delete and recurrence lookups for the event store.

use chrono::Datelike;

use super::recurrence::summarize_rule;
use super::remote::{EventPayload, RemoteEvent};
use super::scope::{delete_recurring_scope, is_removed_locally, DeleteScope, ScopeRequest};
use super::sync::{SyncError, SyncOperation};
use super::EventStore;
use crate::models::event::{Event, EventId};
use crate::models::recurrence::RecurrenceRule;

impl EventStore {
    /// Add an event that already exists (loaded from disk or the remote).
    pub fn insert(&self, event: Event) -> Result<(), SyncError> {
        event.validate()?;
        {
            let mut state = self.state();
            if state.events.iter().any(|e| e.id == event.id) {
                return Err(SyncError::DuplicateId(event.id));
            }
            state.events.push(event.normalized());
        }
        self.notify();
        Ok(())
    }

    /// Replace the whole list with events fetched from the remote.
    ///
    /// Events the local model rejects (too short, end before start) are
    /// skipped with a warning. Returns how many were kept.
    pub fn load_remote(&self, remote_events: Vec<RemoteEvent>) -> usize {
        let mut events = Vec::with_capacity(remote_events.len());
        for (index, remote) in remote_events.into_iter().enumerate() {
            let remote_id = remote.id.clone();
            match remote.into_event(index as EventId + 1) {
                Ok(event) => events.push(event.normalized()),
                Err(err) => log::warn!("Skipping remote event {}: {}", remote_id, err),
            }
        }
        let kept = events.len();
        {
            let mut state = self.state();
            state.events = events;
            state.master_rules.clear();
        }
        self.notify();
        kept
    }

    /// Create on the remote first, then add the returned event locally.
    pub async fn create_event(&self, payload: EventPayload) -> Result<Event, SyncError> {
        let created = self
            .remote
            .create_event(&payload)
            .await
            .map_err(SyncError::remote(SyncOperation::Create))?;

        let event = created.into_event(self.next_id())?.normalized();
        self.state().events.push(event.clone());
        log::info!("Created event {} ({:?})", event.id, event.remote_id);
        self.notify();
        Ok(event)
    }

    /// Remove an event, restoring it at the same position if the remote
    /// delete fails. Returns false when no event has that id.
    pub async fn delete_event(&self, id: EventId) -> Result<bool, SyncError> {
        let removed = {
            let mut state = self.state();
            state
                .events
                .iter()
                .position(|e| e.id == id)
                .map(|index| (index, state.events.remove(index)))
        };
        let Some((index, event)) = removed else {
            return Ok(false);
        };
        self.notify();

        let Some(remote_id) = event.remote_id.clone() else {
            return Ok(true);
        };
        match self.remote.delete_event(&remote_id).await {
            Ok(()) => {
                log::info!("Deleted event {} ({})", id, remote_id);
                Ok(true)
            }
            Err(source) => {
                log::error!("Failed to delete remote event {}: {}", remote_id, source);
                self.reinsert(vec![(index, event)]);
                Err(SyncError::remote(SyncOperation::Delete)(source))
            }
        }
    }

    /// Delete a recurring event with the given scope.
    ///
    /// Non-recurring events fall back to [`EventStore::delete_event`].
    /// Returns how many local events were removed.
    pub async fn delete_recurring(&self, id: EventId, scope: DeleteScope) -> Result<usize, SyncError> {
        let Some(target) = self.get(id) else {
            return Ok(0);
        };
        if !target.is_recurring() {
            return self.delete_event(id).await.map(usize::from);
        }

        let removed: Vec<(usize, Event)> = {
            let mut state = self.state();
            let mut removed = Vec::new();
            let mut kept = Vec::with_capacity(state.events.len());
            for (index, event) in std::mem::take(&mut state.events).into_iter().enumerate() {
                if is_removed_locally(&target, scope, &event) {
                    removed.push((index, event));
                } else {
                    kept.push(event);
                }
            }
            state.events = kept;
            removed
        };
        self.notify();

        let Some(remote_id) = target.remote_id.clone() else {
            return Ok(removed.len());
        };
        let request = ScopeRequest::for_event(&target, remote_id, scope);
        match delete_recurring_scope(self.remote.as_ref(), &request).await {
            Ok(()) => {
                log::info!("Deleted {:?} of series for event {}", scope, id);
                if let Some(master) = &target.recurring_event_id {
                    self.state().master_rules.remove(master);
                }
                Ok(removed.len())
            }
            Err(source) => {
                log::error!("Failed to delete {:?} of event {}: {}", scope, id, source);
                self.reinsert(removed);
                Err(SyncError::remote(SyncOperation::Delete)(source))
            }
        }
    }

    /// Put removed events back at their former positions, lowest index first.
    fn reinsert(&self, mut removed: Vec<(usize, Event)>) {
        removed.sort_by_key(|(index, _)| *index);
        {
            let mut state = self.state();
            for (index, event) in removed {
                let index = index.min(state.events.len());
                state.events.insert(index, event);
            }
        }
        self.notify();
    }

    /// RRULE line governing `event`, if it recurs.
    ///
    /// Masters answer from their own rules. Instances look up their master
    /// once per series; if the master has no rule a weekly rule on the
    /// instance's weekday is assumed.
    pub async fn recurrence_rule_for(&self, event: &Event) -> Option<String> {
        if let Some(rule) = event.primary_rule() {
            return Some(rule.to_string());
        }
        let master_id = event.recurring_event_id.as_ref()?;

        let cached = self.state().master_rules.get(master_id).cloned();
        let rule = match cached {
            Some(rule) => rule,
            None => match self.remote.get_event(master_id).await {
                Ok(master) => {
                    let rule = master.recurrence.and_then(|rules| rules.into_iter().next());
                    self.state()
                        .master_rules
                        .insert(master_id.clone(), rule.clone());
                    rule
                }
                Err(err) => {
                    log::warn!("Could not fetch series {}: {}", master_id, err);
                    None
                }
            },
        };

        Some(rule.unwrap_or_else(|| {
            RecurrenceRule::weekly_on(event.start.weekday()).to_rrule_string()
        }))
    }

    /// Human-readable recurrence of `event`, e.g. "Repeat every week on Monday".
    pub async fn describe_recurrence(&self, event: &Event) -> Option<String> {
        let rule = self.recurrence_rule_for(event).await?;
        Some(summarize_rule(&rule, event.start.date()))
    }
}
