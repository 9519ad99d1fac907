//! Which hour rows the time grid shows for a set of events.

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::models::event::Event;
use crate::models::settings::WorkingHours;
use crate::utils::date::{at_hour, ceil_hour, HOURS_PER_DAY};

/// Hour bounds used for vertical positioning, `from..=to` in whole hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRange {
    pub from: u32,
    pub to: u32,
}

impl VisibleRange {
    pub fn new(from: u32, to: u32) -> Self {
        Self { from, to }
    }

    /// Hours covered by the range, never less than one so positions stay finite.
    pub fn span_hours(&self) -> u32 {
        self.to.saturating_sub(self.from).max(1)
    }

    pub fn span_minutes(&self) -> i64 {
        i64::from(self.span_hours()) * 60
    }

    /// Wall-clock bounds of the range on `day`.
    pub fn window_on(&self, day: NaiveDate) -> DayWindow {
        DayWindow {
            start: at_hour(day, self.from),
            end: at_hour(day, self.to),
        }
    }
}

impl From<WorkingHours> for VisibleRange {
    fn from(hours: WorkingHours) -> Self {
        Self::new(hours.from, hours.to)
    }
}

/// The visible portion of one day, used to clamp drags and resizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleHours {
    /// Every hour row to draw, inclusive of both bounds.
    pub hours: Vec<u32>,
    pub earliest_event_hour: u32,
    pub latest_event_hour: u32,
}

impl VisibleHours {
    /// Extend the working hours so that every event fits.
    ///
    /// An event contributes its start hour (floored) and its end hour
    /// (ceiled, measured from the start day's midnight). Events running past
    /// midnight extend the range up to hour 24.
    pub fn compute(working: WorkingHours, events: &[Event]) -> Self {
        let mut earliest = working.from.min(HOURS_PER_DAY);
        let mut latest = working.to.min(HOURS_PER_DAY);

        for event in events {
            let day = event.start.date();
            earliest = earliest.min(event.start.hour());
            latest = latest.max(ceil_hour(event.end, day));
        }

        let latest = latest.max(earliest);
        Self {
            hours: (earliest..=latest).collect(),
            earliest_event_hour: earliest,
            latest_event_hour: latest,
        }
    }

    pub fn range(&self) -> VisibleRange {
        VisibleRange::new(self.earliest_event_hour, self.latest_event_hour)
    }
}
