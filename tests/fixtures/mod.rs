// Test fixtures - reusable test data
// Provides consistent dates, events and a scriptable remote calendar across test files

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use calendar_grid::models::event::{Event, EventId};
use calendar_grid::services::event::{
    EventPatch, EventPayload, RemoteCalendar, RemoteError, RemoteEvent,
};

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Monday, March 10 2025
    pub fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    pub fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()
    }

    /// The Monday-to-Sunday week containing [`monday`]
    pub fn week() -> Vec<NaiveDate> {
        monday().iter_days().take(7).collect()
    }

    pub fn at(day: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
        day.and_hms_opt(hour, minute, 0).unwrap()
    }
}

/// Sample events for testing
pub mod events {
    use super::dates::{at, monday};
    use super::*;

    /// Local-only event on Monday
    pub fn local(id: EventId, start: (u32, u32), end: (u32, u32)) -> Event {
        Event::new(
            id,
            format!("Event {id}"),
            at(monday(), start.0, start.1),
            at(monday(), end.0, end.1),
        )
        .unwrap()
    }

    /// Event on Monday linked to remote id `remote-<id>`
    pub fn synced(id: EventId, start: (u32, u32), end: (u32, u32)) -> Event {
        Event::builder()
            .id(id)
            .remote_id(format!("remote-{id}"))
            .title(format!("Synced {id}"))
            .start(at(monday(), start.0, start.1))
            .end(at(monday(), end.0, end.1))
            .build()
            .unwrap()
    }

    pub fn remote_copy(event: &Event) -> RemoteEvent {
        RemoteEvent {
            id: event.remote_id.clone().unwrap_or_default(),
            summary: event.title.clone(),
            description: event.description.clone(),
            start: event.start,
            end: event.end,
            color_id: Some(event.color.color_id().to_string()),
            recurrence: event.recurrence.clone(),
            recurring_event_id: event.recurring_event_id.clone(),
            original_start_time: event.original_start_time,
        }
    }
}

/// In-memory remote calendar that records every call.
#[derive(Default)]
pub struct FakeRemote {
    pub calls: Mutex<Vec<String>>,
    pub patches: Mutex<Vec<(String, EventPatch)>>,
    pub masters: Mutex<HashMap<String, RemoteEvent>>,
    pub fail: AtomicBool,
}

impl FakeRemote {
    pub fn failing() -> Self {
        let remote = Self::default();
        remote.fail.store(true, Ordering::SeqCst);
        remote
    }

    pub fn with_master(self, master: RemoteEvent) -> Self {
        self.masters
            .lock()
            .unwrap()
            .insert(master.id.clone(), master);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(call);
        if self.fail.load(Ordering::SeqCst) {
            Err(RemoteError::Request("simulated outage".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RemoteCalendar for FakeRemote {
    async fn create_event(&self, payload: &EventPayload) -> Result<RemoteEvent, RemoteError> {
        self.record(format!("create {}", payload.summary))?;
        Ok(RemoteEvent {
            id: format!("created-{}", payload.summary.to_lowercase()),
            summary: payload.summary.clone(),
            description: payload.description.clone(),
            start: payload.start,
            end: payload.end,
            color_id: payload.color_id.clone(),
            recurrence: payload.recurrence.clone(),
            recurring_event_id: None,
            original_start_time: None,
        })
    }

    async fn update_event(
        &self,
        remote_id: &str,
        patch: &EventPatch,
    ) -> Result<RemoteEvent, RemoteError> {
        self.record(format!("update {remote_id}"))?;
        self.patches
            .lock()
            .unwrap()
            .push((remote_id.to_string(), patch.clone()));

        let mut masters = self.masters.lock().unwrap();
        match masters.get_mut(remote_id) {
            Some(master) => {
                if let Some(rules) = &patch.recurrence {
                    master.recurrence = Some(rules.clone());
                }
                Ok(master.clone())
            }
            None => {
                let (start, end) = patch
                    .start
                    .zip(patch.end)
                    .ok_or_else(|| RemoteError::Request("patch without times".into()))?;
                Ok(RemoteEvent {
                    id: remote_id.to_string(),
                    summary: patch.summary.clone().unwrap_or_default(),
                    description: patch.description.clone().unwrap_or_default(),
                    start,
                    end,
                    color_id: patch.color_id.clone(),
                    recurrence: patch.recurrence.clone(),
                    recurring_event_id: None,
                    original_start_time: None,
                })
            }
        }
    }

    async fn delete_event(&self, remote_id: &str) -> Result<(), RemoteError> {
        self.record(format!("delete {remote_id}"))
    }

    async fn get_event(&self, remote_id: &str) -> Result<RemoteEvent, RemoteError> {
        self.record(format!("get {remote_id}"))?;
        self.masters
            .lock()
            .unwrap()
            .get(remote_id)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(remote_id.to_string()))
    }
}
