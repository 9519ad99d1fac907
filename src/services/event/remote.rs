//! Boundary to the remote calendar the grid syncs against.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::event::{Event, EventColor, EventError, EventId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("Remote request failed: {0}")]
    Request(String),
    #[error("Remote event {0} not found")]
    NotFound(String),
    #[error("Not authorized to modify the remote calendar")]
    Unauthorized,
}

/// An event as the remote calendar reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEvent {
    pub id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub color_id: Option<String>,
    #[serde(default)]
    pub recurrence: Option<Vec<String>>,
    #[serde(default)]
    pub recurring_event_id: Option<String>,
    #[serde(default)]
    pub original_start_time: Option<NaiveDateTime>,
}

impl RemoteEvent {
    /// Convert into a local event with the given local id.
    pub fn into_event(self, id: EventId) -> Result<Event, EventError> {
        let title = if self.summary.trim().is_empty() {
            "(No title)".to_string()
        } else {
            self.summary
        };

        let mut builder = Event::builder()
            .id(id)
            .remote_id(self.id)
            .title(title)
            .description(self.description)
            .start(self.start)
            .end(self.end)
            .color(EventColor::from_color_id(self.color_id.as_deref()));
        for rule in self.recurrence.into_iter().flatten() {
            builder = builder.recurrence_rule(rule);
        }
        if let Some(master) = self.recurring_event_id {
            builder = builder.recurring_event_id(master);
        }
        if let Some(at) = self.original_start_time {
            builder = builder.original_start_time(at);
        }
        builder.build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderMethod {
    Email,
    Popup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderOverride {
    pub method: ReminderMethod,
    pub minutes: u32,
}

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub summary: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub color_id: Option<String>,
    pub recurrence: Option<Vec<String>>,
    pub reminders: Vec<ReminderOverride>,
}

impl EventPayload {
    pub fn new(summary: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            summary: summary.into(),
            description: String::new(),
            start,
            end,
            color_id: None,
            recurrence: None,
            reminders: Vec::new(),
        }
    }

    pub fn from_event(event: &Event) -> Self {
        Self {
            summary: event.title.clone(),
            description: event.description.clone(),
            start: event.start,
            end: event.end,
            color_id: Some(event.color.color_id().to_string()),
            recurrence: event.recurrence.clone(),
            reminders: Vec::new(),
        }
    }
}

/// Partial update. `None` fields are left untouched remotely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Vec<String>>,
}

impl EventPatch {
    /// Patch that turns `previous` into `next`. Times are always included;
    /// other fields only when they changed.
    pub fn between(previous: &Event, next: &Event) -> Self {
        Self {
            summary: (previous.title != next.title).then(|| next.title.clone()),
            description: (previous.description != next.description)
                .then(|| next.description.clone()),
            start: Some(next.start),
            end: Some(next.end),
            color_id: (previous.color != next.color).then(|| next.color.color_id().to_string()),
            recurrence: (previous.recurrence != next.recurrence)
                .then(|| next.recurrence.clone().unwrap_or_default()),
        }
    }

    /// Patch replacing only the recurrence rules.
    pub fn recurrence(rules: Vec<String>) -> Self {
        Self {
            recurrence: Some(rules),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Remote calendar operations used by the event store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteCalendar: Send + Sync {
    async fn create_event(&self, payload: &EventPayload) -> Result<RemoteEvent, RemoteError>;

    async fn update_event(
        &self,
        remote_id: &str,
        patch: &EventPatch,
    ) -> Result<RemoteEvent, RemoteError>;

    async fn delete_event(&self, remote_id: &str) -> Result<(), RemoteError>;

    async fn get_event(&self, remote_id: &str) -> Result<RemoteEvent, RemoteError>;
}
