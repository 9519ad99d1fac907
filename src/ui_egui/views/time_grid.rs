//! Mapping between wall-clock times and vertical positions on the time grid.
//!
//! Forward mapping places event blocks (top as a percentage of the visible
//! range, height in pixels). Reverse mapping turns a pixel offset inside a day
//! column back into a snapped time of day.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use super::visible_hours::VisibleRange;
use crate::models::settings::GridSettings;
use crate::utils::date::{minutes_since_midnight, start_of_day, MINUTES_PER_HOUR};

/// Half-up rounding, matching how the grid has always rounded snapped values.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// A time of day after snapping. `hour` may be 24 when the carry lands on
/// midnight at the end of the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnappedTime {
    pub hour: u32,
    pub minute: u32,
}

impl SnappedTime {
    pub fn minutes_from_midnight(&self) -> i64 {
        i64::from(self.hour) * MINUTES_PER_HOUR + i64::from(self.minute)
    }

    pub fn on(&self, day: NaiveDate) -> NaiveDateTime {
        start_of_day(day) + Duration::minutes(self.minutes_from_midnight())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeGridMapper {
    hour_height_px: f32,
    event_gap_px: f32,
}

impl Default for TimeGridMapper {
    fn default() -> Self {
        Self::from_settings(&GridSettings::default())
    }
}

impl TimeGridMapper {
    pub fn new(hour_height_px: f32, event_gap_px: f32) -> Self {
        Self {
            hour_height_px,
            event_gap_px,
        }
    }

    pub fn from_settings(settings: &GridSettings) -> Self {
        Self::new(settings.hour_height_px, settings.event_gap_px)
    }

    pub fn hour_height_px(&self) -> f32 {
        self.hour_height_px
    }

    pub fn minute_height_px(&self) -> f64 {
        f64::from(self.hour_height_px) / MINUTES_PER_HOUR as f64
    }

    /// Total pixel height of the visible range.
    pub fn grid_height_px(&self, range: VisibleRange) -> f32 {
        range.span_hours() as f32 * self.hour_height_px
    }

    /// Top of a block as a percentage of the visible range.
    ///
    /// Starts before midnight of `day` are clamped to midnight so blocks that
    /// began on the previous day still anchor at the top of the column.
    pub fn top_percent(&self, start: NaiveDateTime, day: NaiveDate, range: VisibleRange) -> f32 {
        let start_minutes = minutes_since_midnight(start, day).max(0);
        let offset = start_minutes - i64::from(range.from) * MINUTES_PER_HOUR;
        (offset as f64 / range.span_minutes() as f64 * 100.0) as f32
    }

    /// Top of a block in pixels from the top of the visible range.
    pub fn top_px(&self, start: NaiveDateTime, day: NaiveDate, range: VisibleRange) -> f32 {
        self.top_percent(start, day, range) / 100.0 * self.grid_height_px(range)
    }

    /// Block height: proportional to duration, minus the gap between blocks.
    pub fn height_px(&self, duration_minutes: i64) -> f32 {
        (duration_minutes as f64 * self.minute_height_px()) as f32 - self.event_gap_px
    }

    /// Pixel offset of a minute-of-day inside the visible range.
    pub fn y_for_minutes(&self, minutes_from_midnight: i64, range: VisibleRange) -> f32 {
        let offset = minutes_from_midnight - i64::from(range.from) * MINUTES_PER_HOUR;
        (offset as f64 * self.minute_height_px()) as f32
    }

    /// Snap a pixel offset to the nearest `step` minutes.
    ///
    /// Rounding that reaches 60 carries into the next hour. Offsets above
    /// midnight snap to 00:00.
    pub fn snapped_time_at(&self, pixel_y: f32, range: VisibleRange, step: u32) -> SnappedTime {
        let step = f64::from(step.max(1));
        let minutes = (f64::from(pixel_y) / self.minute_height_px()
            + f64::from(range.from) * MINUTES_PER_HOUR as f64)
            .max(0.0);
        let hour = (minutes / MINUTES_PER_HOUR as f64).floor();
        let within = minutes - hour * MINUTES_PER_HOUR as f64;
        let snapped = round_half_up(within / step) * step;

        let mut hour = hour as u32;
        let mut minute = snapped as u32;
        if minute >= 60 {
            hour += 1;
            minute = 0;
        }
        SnappedTime { hour, minute }
    }

    /// Time slot a click at `pixel_y` lands on. The offset is clamped into
    /// the grid so clicks on the border still produce a slot inside it.
    pub fn slot_at(
        &self,
        day: NaiveDate,
        pixel_y: f32,
        range: VisibleRange,
        step: u32,
    ) -> NaiveDateTime {
        let max_y = (self.grid_height_px(range) - 1.0).max(0.0);
        let y = pixel_y.clamp(0.0, max_y);
        self.snapped_time_at(y, range, step).on(day)
    }

    /// Convert a vertical pointer delta into whole snapped minutes.
    pub fn snap_delta_minutes(&self, delta_px: f32, step: u32) -> i64 {
        let step = f64::from(step.max(1));
        let minutes = f64::from(delta_px) / self.minute_height_px();
        (round_half_up(minutes / step) * step) as i64
    }
}
