// Property-based tests for the time grid
// Layout, snapping and gesture invariants checked against random inputs

use chrono::{Duration, NaiveDate, NaiveDateTime};
use egui::{Pos2, Rect};
use proptest::prelude::*;

use calendar_grid::models::event::Event;
use calendar_grid::models::settings::GridSettings;
use calendar_grid::ui_egui::drag::{DragController, WeekColumns};
use calendar_grid::ui_egui::resize::resize_times;
use calendar_grid::ui_egui::views::{group_events, layout_day, TimeGridMapper, VisibleRange};
use calendar_grid::ui_egui::{GrabTarget, ResizeHandle};

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

fn at_minutes(day: NaiveDate, minutes: i64) -> NaiveDateTime {
    day.and_hms_opt(0, 0, 0).unwrap() + Duration::minutes(minutes)
}

/// Random same-day events as (start minute, duration) pairs on a 15 minute grid.
fn day_events() -> impl Strategy<Value = Vec<Event>> {
    prop::collection::vec((0i64..88, 1i64..16), 0..24).prop_map(|slots| {
        slots
            .into_iter()
            .enumerate()
            .map(|(index, (slot, length))| {
                let start = at_minutes(monday(), slot * 15);
                let end = start + Duration::minutes(length * 15);
                Event::new(index as i64 + 1, "Generated", start, end).unwrap()
            })
            .collect()
    })
}

proptest! {
    /// Property: no two events in the same column overlap
    #[test]
    fn prop_columns_never_overlap(events in day_events()) {
        let groups = group_events(&events);

        let placed: usize = groups.iter().map(Vec::len).sum();
        prop_assert_eq!(placed, events.len());
        for group in &groups {
            for (i, a) in group.iter().enumerate() {
                for b in group.iter().skip(i + 1) {
                    prop_assert!(!a.overlaps(b), "{} overlaps {}", a.id, b.id);
                }
            }
        }
    }

    /// Property: an event overlapping nothing else is laid out full width
    #[test]
    fn prop_isolated_events_are_full_width(events in day_events()) {
        let blocks = layout_day(&events, monday(), VisibleRange::new(0, 24), &TimeGridMapper::default());

        for block in &blocks {
            let event = events.iter().find(|e| e.id == block.event_id).unwrap();
            let isolated = events.iter().all(|other| other.id == event.id || !other.overlaps(event));
            if isolated {
                prop_assert_eq!(block.left_percent, 0.0);
                prop_assert_eq!(block.width_percent, 100.0);
            }
            prop_assert!(block.left_percent + block.width_percent <= 100.0 + 1e-3);
        }
    }

    /// Property: resizing never produces an event shorter than 15 minutes
    #[test]
    fn prop_resize_keeps_minimum_duration(
        start_slot in 36i64..64,
        length in 1i64..12,
        delta in -1440i64..1440,
        top in any::<bool>(),
    ) {
        let start = at_minutes(monday(), start_slot * 15);
        let end = start + Duration::minutes(length * 15);
        let handle = if top { ResizeHandle::Top } else { ResizeHandle::Bottom };
        let window = VisibleRange::new(9, 17).window_on(monday());

        let (new_start, new_end) = resize_times(
            handle,
            start,
            end,
            Duration::minutes(delta),
            window,
            Duration::minutes(15),
        );
        prop_assert!(new_end - new_start >= Duration::minutes(15));
        match handle {
            ResizeHandle::Top => prop_assert_eq!(new_end, end),
            ResizeHandle::Bottom => prop_assert_eq!(new_start, start),
        }
    }

    /// Property: a pixel offset on an exact step boundary maps back to that step
    #[test]
    fn prop_snap_is_exact_on_step_boundaries(
        from in 0u32..12,
        steps in 0i64..48,
        thirty in any::<bool>(),
    ) {
        let step: u32 = if thirty { 30 } else { 15 };
        let range = VisibleRange::new(from, 24);
        let mapper = TimeGridMapper::default();
        let minutes = i64::from(from) * 60 + steps * i64::from(step);
        prop_assume!(minutes < 24 * 60);

        let y = mapper.y_for_minutes(minutes, range);
        let snapped = mapper.snapped_time_at(y, range, step);
        prop_assert_eq!(snapped.minutes_from_midnight(), minutes);
    }

    /// Property: moving to another day keeps the duration
    #[test]
    fn prop_cross_day_move_preserves_duration(
        start_slot in 32i64..56,
        length in 1i64..12,
        delta_px in -200.0f32..200.0,
        column in 0usize..7,
    ) {
        let start = at_minutes(monday(), start_slot * 15);
        let event = Event::new(1, "Moving", start, start + Duration::minutes(length * 15)).unwrap();

        let days: Vec<NaiveDate> = monday().iter_days().take(7).collect();
        let columns = WeekColumns {
            rect: Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(700.0, 2304.0)),
            days: 7,
        };
        let mut drag = DragController::new(&GridSettings::default(), VisibleRange::new(0, 24))
            .with_day_columns(days.clone(), columns);

        drag.pointer_down(&event, monday(), GrabTarget::Body, Pos2::new(50.0, 1000.0));
        drag.pointer_move(Pos2::new(column as f32 * 100.0 + 50.0, 1000.0 + delta_px));

        if let Some(draft) = drag.draft() {
            prop_assert_eq!(draft.duration(), event.duration());
            prop_assert_eq!(draft.start.date(), days[column]);
            let shift = draft.start - at_minutes(days[column], 0) - (start - at_minutes(monday(), 0));
            prop_assert_eq!(shift.num_minutes() % 15, 0);
        }
    }
}
