// Event module
// Calendar event model shared by the grid layout, drag controller and event store

use chrono::{Duration, NaiveDate, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::date::start_of_day;

/// Shortest duration an event may have, in minutes.
pub const MIN_DURATION_MINUTES: i64 = 15;

/// Local identifier, unique within one event store.
pub type EventId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("Event title cannot be empty")]
    EmptyTitle,
    #[error("Event end time must be after start time")]
    EndBeforeStart,
    #[error("Event must last at least 15 minutes (got {0})")]
    TooShort(i64),
    #[error("Event {0} is required")]
    MissingField(&'static str),
}

/// Display color of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventColor {
    #[default]
    Blue,
    Green,
    Red,
    Yellow,
    Purple,
    Orange,
    Gray,
}

/// Remote calendar color ids. Id "7" is reserved upstream and deliberately unmapped.
const COLOR_IDS: [(EventColor, &str); 7] = [
    (EventColor::Blue, "1"),
    (EventColor::Green, "2"),
    (EventColor::Red, "3"),
    (EventColor::Yellow, "4"),
    (EventColor::Purple, "5"),
    (EventColor::Orange, "6"),
    (EventColor::Gray, "8"),
];

impl EventColor {
    pub const ALL: [EventColor; 7] = [
        EventColor::Blue,
        EventColor::Green,
        EventColor::Red,
        EventColor::Yellow,
        EventColor::Purple,
        EventColor::Orange,
        EventColor::Gray,
    ];

    /// Color id used by the remote calendar service.
    pub fn color_id(self) -> &'static str {
        COLOR_IDS
            .iter()
            .find(|(color, _)| *color == self)
            .map(|(_, id)| *id)
            .unwrap_or("1")
    }

    /// Map a remote color id back to a color. Missing or unknown ids fall back to blue.
    pub fn from_color_id(id: Option<&str>) -> Self {
        let id = id.unwrap_or("1");
        COLOR_IDS
            .iter()
            .find(|(_, known)| *known == id)
            .map(|(color, _)| *color)
            .unwrap_or_default()
    }
}

/// Calendar event as held by the event store.
///
/// An event carrying `recurrence` is a series master; one carrying only
/// `recurring_event_id` is a single occurrence of a master held remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
    #[serde(rename = "startDate")]
    pub start: NaiveDateTime,
    #[serde(rename = "endDate")]
    pub end: NaiveDateTime,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: EventColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_start_time: Option<NaiveDateTime>,
}

impl Event {
    /// Create a new event with required fields
    ///
    /// # Examples
    /// ```
    /// use calendar_grid::models::event::Event;
    /// use chrono::NaiveDate;
    ///
    /// let start = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap().and_hms_opt(9, 0, 0).unwrap();
    /// let end = start + chrono::Duration::hours(1);
    /// let event = Event::new(1, "Team Meeting", start, end).unwrap();
    /// assert_eq!(event.duration_minutes(), 60);
    /// ```
    pub fn new(
        id: EventId,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, EventError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(EventError::EmptyTitle);
        }

        let event = Self {
            id,
            remote_id: None,
            start,
            end,
            title,
            description: String::new(),
            color: EventColor::default(),
            recurrence: None,
            recurring_event_id: None,
            original_start_time: None,
        };
        event.validate()?;
        Ok(event)
    }

    /// Create a builder for constructing events with optional fields
    pub fn builder() -> EventBuilder {
        EventBuilder::default()
    }

    /// Check the time invariants: start before end and at least the minimum duration.
    pub fn validate(&self) -> Result<(), EventError> {
        if self.end <= self.start {
            return Err(EventError::EndBeforeStart);
        }
        let minutes = self.duration_minutes();
        if minutes < MIN_DURATION_MINUTES {
            return Err(EventError::TooShort(minutes));
        }
        Ok(())
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// First recurrence rule, when this event is a series master.
    pub fn primary_rule(&self) -> Option<&str> {
        self.recurrence
            .as_ref()
            .and_then(|rules| rules.first())
            .map(String::as_str)
    }

    pub fn is_master(&self) -> bool {
        self.primary_rule().is_some()
    }

    pub fn is_instance(&self) -> bool {
        !self.is_master() && self.recurring_event_id.is_some()
    }

    /// True for masters carrying an RRULE and for instances of a series.
    pub fn is_recurring(&self) -> bool {
        self.recurring_event_id.is_some()
            || self.recurrence.as_ref().is_some_and(|rules| {
                rules
                    .iter()
                    .any(|rule| rule.to_ascii_uppercase().starts_with("RRULE"))
            })
    }

    /// Whether the event starts or ends on `day`. An end exactly at
    /// midnight does not reach into that day.
    pub fn is_on(&self, day: NaiveDate) -> bool {
        self.start.date() == day || (self.end.date() == day && self.end > start_of_day(day))
    }

    /// Half-open interval overlap test on `[start, end)`.
    pub fn overlaps(&self, other: &Event) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Copy with timestamps truncated to millisecond precision.
    pub fn normalized(&self) -> Self {
        Self {
            start: self.start.trunc_subsecs(3),
            end: self.end.trunc_subsecs(3),
            original_start_time: self.original_start_time.map(|at| at.trunc_subsecs(3)),
            ..self.clone()
        }
    }

    /// Copy with new start/end, keeping every other field.
    pub fn with_times(&self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end,
            ..self.clone()
        }
    }
}

/// Builder for creating events with optional fields
#[derive(Default)]
pub struct EventBuilder {
    id: EventId,
    remote_id: Option<String>,
    title: Option<String>,
    description: String,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    color: EventColor,
    recurrence: Option<Vec<String>>,
    recurring_event_id: Option<String>,
    original_start_time: Option<NaiveDateTime>,
}

impl EventBuilder {
    pub fn id(mut self, id: EventId) -> Self {
        self.id = id;
        self
    }

    pub fn remote_id(mut self, remote_id: impl Into<String>) -> Self {
        self.remote_id = Some(remote_id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn start(mut self, start: NaiveDateTime) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self
    }

    pub fn color(mut self, color: EventColor) -> Self {
        self.color = color;
        self
    }

    /// Set the recurrence rule (RRULE format)
    pub fn recurrence_rule(mut self, rule: impl Into<String>) -> Self {
        self.recurrence.get_or_insert_with(Vec::new).push(rule.into());
        self
    }

    pub fn recurring_event_id(mut self, master_id: impl Into<String>) -> Self {
        self.recurring_event_id = Some(master_id.into());
        self
    }

    pub fn original_start_time(mut self, at: NaiveDateTime) -> Self {
        self.original_start_time = Some(at);
        self
    }

    pub fn build(self) -> Result<Event, EventError> {
        let title = self.title.ok_or(EventError::MissingField("title"))?;
        let start = self.start.ok_or(EventError::MissingField("start time"))?;
        let end = self.end.ok_or(EventError::MissingField("end time"))?;

        let event = Event {
            id: self.id,
            remote_id: self.remote_id,
            start,
            end,
            title,
            description: self.description,
            color: self.color,
            recurrence: self.recurrence,
            recurring_event_id: self.recurring_event_id,
            original_start_time: self.original_start_time,
        };

        event.validate()?;
        Ok(event)
    }
}

/// Events shown on `day`, in input order.
pub fn events_for_day(events: &[Event], day: NaiveDate) -> Vec<&Event> {
    events.iter().filter(|e| e.is_on(day)).collect()
}
