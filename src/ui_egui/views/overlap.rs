//! Side-by-side placement of overlapping events within a day column.
//!
//! Events are sorted by start (longer first on ties) and dropped into the
//! first column whose last event has already ended. An event that overlaps
//! nothing outside its own column takes the full width.

use chrono::NaiveDate;

use super::time_grid::TimeGridMapper;
use super::visible_hours::VisibleRange;
use crate::models::event::{Event, EventId};

pub use crate::models::event::events_for_day;

/// Geometry of one event block inside a day column.
#[derive(Debug, Clone, PartialEq)]
pub struct EventBlock {
    pub event_id: EventId,
    pub column: usize,
    pub columns: usize,
    pub top_percent: f32,
    pub height_px: f32,
    pub left_percent: f32,
    pub width_percent: f32,
}

/// Partition events into columns with no overlap inside a column.
pub fn group_events<'a, I>(events: I) -> Vec<Vec<&'a Event>>
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut sorted: Vec<&Event> = events.into_iter().collect();
    sorted.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| b.duration().cmp(&a.duration()))
    });

    let mut groups: Vec<Vec<&Event>> = Vec::new();
    for event in sorted {
        let slot = groups.iter_mut().find(|group| {
            group
                .last()
                .map_or(true, |last| last.end <= event.start)
        });
        match slot {
            Some(group) => group.push(event),
            None => groups.push(vec![event]),
        }
    }
    groups
}

fn overlaps_other_groups(event: &Event, own: usize, groups: &[Vec<&Event>]) -> bool {
    groups
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != own)
        .any(|(_, group)| group.iter().any(|other| other.overlaps(event)))
}

/// Lay out the events that start or end on `day`.
pub fn layout_day(
    events: &[Event],
    day: NaiveDate,
    range: VisibleRange,
    mapper: &TimeGridMapper,
) -> Vec<EventBlock> {
    let groups = group_events(events_for_day(events, day));
    let columns = groups.len();
    let column_width = if columns == 0 {
        100.0
    } else {
        100.0 / columns as f32
    };

    let mut blocks = Vec::new();
    for (column, group) in groups.iter().enumerate() {
        for event in group {
            let (left_percent, width_percent) = if overlaps_other_groups(event, column, &groups) {
                (column as f32 * column_width, column_width)
            } else {
                (0.0, 100.0)
            };

            blocks.push(EventBlock {
                event_id: event.id,
                column,
                columns,
                top_percent: mapper.top_percent(event.start, day, range),
                height_px: mapper.height_px(event.duration_minutes()),
                left_percent,
                width_percent,
            });
        }
    }
    blocks
}
