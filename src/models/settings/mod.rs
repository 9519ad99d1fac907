// Settings module
// Time grid configuration: working hours, grid metrics and gesture tuning

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configured working hours, as whole hours in `0..=24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub from: u32,
    pub to: u32,
}

impl WorkingHours {
    pub fn new(from: u32, to: u32) -> Self {
        Self { from, to }
    }

    /// Whether the hour slot starting at `hour` lies inside working hours.
    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.from && hour < self.to
    }
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self { from: 9, to: 17 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Height of one hour row in pixels
    pub hour_height_px: f32,
    /// Vertical padding subtracted from every event block
    pub event_gap_px: f32,
    pub drag_snap_minutes: u32,
    pub click_snap_minutes: u32,
    pub min_duration_minutes: u32,
    /// Pointer travel before a press on an event body becomes a move
    pub drag_threshold_px: f32,
    /// Height of the top/bottom resize strips
    pub handle_size_px: f32,
    /// How long the click following a drag is swallowed
    pub click_suppress_ms: u64,
    pub working_hours: WorkingHours,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            hour_height_px: 96.0,
            event_gap_px: 8.0,
            drag_snap_minutes: 15,
            click_snap_minutes: 30,
            min_duration_minutes: 15,
            drag_threshold_px: 4.0,
            handle_size_px: 8.0,
            click_suppress_ms: 250,
            working_hours: WorkingHours::default(),
        }
    }
}

/// Why a set of grid settings was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("Working hours must be within 0-24 (got {from}-{to})")]
    HoursOutOfRange { from: u32, to: u32 },
    #[error("Working hours must start before they end")]
    HoursInverted,
    #[error("Hour height must be positive")]
    NonPositiveHourHeight,
    #[error("Pixel sizes cannot be negative")]
    NegativePixelSize,
    #[error("{name} must divide an hour evenly (got {step})")]
    UnevenSnap { name: &'static str, step: u32 },
    #[error("Minimum duration must be at least one minute")]
    ZeroMinimumDuration,
}

impl GridSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        let hours = self.working_hours;
        if hours.from > 24 || hours.to > 24 {
            return Err(SettingsError::HoursOutOfRange {
                from: hours.from,
                to: hours.to,
            });
        }
        if hours.from >= hours.to {
            return Err(SettingsError::HoursInverted);
        }

        if !(self.hour_height_px > 0.0) {
            return Err(SettingsError::NonPositiveHourHeight);
        }
        if self.event_gap_px < 0.0 || self.drag_threshold_px < 0.0 || self.handle_size_px < 0.0 {
            return Err(SettingsError::NegativePixelSize);
        }

        for (name, step) in [
            ("Drag snap", self.drag_snap_minutes),
            ("Click snap", self.click_snap_minutes),
        ] {
            if step == 0 || 60 % step != 0 {
                return Err(SettingsError::UnevenSnap { name, step });
            }
        }

        if self.min_duration_minutes == 0 {
            return Err(SettingsError::ZeroMinimumDuration);
        }

        Ok(())
    }
}
