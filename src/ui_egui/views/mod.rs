//! Layout computations for the day and week time grids.

pub mod overlap;
pub mod time_grid;
pub mod visible_hours;

pub use overlap::{events_for_day, group_events, layout_day, EventBlock};
pub use time_grid::{SnappedTime, TimeGridMapper};
pub use visible_hours::{DayWindow, VisibleHours, VisibleRange};
