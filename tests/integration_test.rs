// Integration tests for the time grid: layout, gestures and remote sync working together
mod fixtures;

use std::sync::{Arc, Mutex};
use std::time::{Duration as StdDuration, Instant};

use chrono::Duration;
use egui::{Pos2, Rect};
use pretty_assertions::assert_eq;

use calendar_grid::models::event::Event;
use calendar_grid::models::settings::{GridSettings, WorkingHours};
use calendar_grid::services::event::{
    DeleteScope, EventPayload, EventStore, SyncError, SyncOperation, UpdateOutcome,
};
use calendar_grid::services::event::recurrence::summarize_rule;
use calendar_grid::ui_egui::drag::{DragController, DragRelease, WeekColumns};
use calendar_grid::ui_egui::views::{layout_day, TimeGridMapper, VisibleHours, VisibleRange};
use calendar_grid::ui_egui::{GrabTarget, ResizeHandle};

use fixtures::dates::{at, monday, wednesday, week};
use fixtures::events::{local, remote_copy, synced};
use fixtures::FakeRemote;

fn store_with(remote: Arc<FakeRemote>, events: Vec<Event>) -> EventStore {
    let store = EventStore::new(remote);
    for event in events {
        store.insert(event).unwrap();
    }
    store
}

fn work_range() -> VisibleRange {
    VisibleRange::new(9, 17)
}

#[test]
fn test_overlapping_pair_splits_column() {
    let events = vec![local(1, (9, 0), (10, 0)), local(2, (9, 30), (10, 30))];
    let blocks = layout_day(&events, monday(), work_range(), &TimeGridMapper::default());

    assert_eq!(blocks.len(), 2);
    assert_eq!(
        (blocks[0].event_id, blocks[0].column, blocks[0].left_percent, blocks[0].width_percent),
        (1, 0, 0.0, 50.0)
    );
    assert_eq!(
        (blocks[1].event_id, blocks[1].column, blocks[1].left_percent, blocks[1].width_percent),
        (2, 1, 50.0, 50.0)
    );
}

#[test]
fn test_non_overlapping_events_are_full_width() {
    let events = vec![
        local(1, (9, 0), (10, 0)),
        local(2, (12, 0), (13, 0)),
        local(3, (15, 0), (16, 0)),
    ];
    let blocks = layout_day(&events, monday(), work_range(), &TimeGridMapper::default());

    assert_eq!(blocks.len(), 3);
    for block in blocks {
        assert_eq!((block.left_percent, block.width_percent), (0.0, 100.0));
    }
}

#[test]
fn test_visible_hours_extend_for_early_event() {
    let visible = VisibleHours::compute(WorkingHours::new(9, 17), &[local(1, (7, 0), (8, 0))]);
    assert_eq!(visible.earliest_event_hour, 7);
    assert_eq!(visible.latest_event_hour, 17);
    assert_eq!(visible.hours, (7..=17).collect::<Vec<u32>>());
}

#[test]
fn test_weekly_summary() {
    assert_eq!(
        summarize_rule("RRULE:FREQ=WEEKLY;BYDAY=MO,WE,FR", monday()),
        "Repeat every week on Monday, Wednesday, Friday"
    );
}

#[tokio::test]
async fn test_drag_down_120px_commits_75_minutes() {
    let remote = Arc::new(FakeRemote::default());
    let store = store_with(Arc::clone(&remote), vec![synced(1, (9, 0), (10, 0))]);
    let original = store.get(1).unwrap();

    let mut drag = DragController::new(&GridSettings::default(), work_range());
    assert!(drag.pointer_down(&original, monday(), GrabTarget::Body, Pos2::new(40.0, 10.0)));
    drag.pointer_move(Pos2::new(40.0, 130.0));

    let now = Instant::now();
    let outcome = drag.release(&store, now).await.unwrap();
    assert_eq!(outcome, Some(UpdateOutcome::Synced));

    let moved = store.get(1).unwrap();
    assert_eq!(moved.start, original.start + Duration::minutes(75));
    assert_eq!(moved.end, original.end + Duration::minutes(75));

    assert_eq!(remote.calls(), vec!["update remote-1".to_string()]);
    let patches = remote.patches.lock().unwrap();
    assert_eq!(patches[0].1.start, Some(at(monday(), 10, 15)));
    assert_eq!(patches[0].1.end, Some(at(monday(), 11, 15)));
    assert!(drag.should_suppress_click(now + StdDuration::from_millis(10)));
}

#[tokio::test]
async fn test_failed_drag_rolls_back_bit_for_bit() {
    let remote = Arc::new(FakeRemote::failing());
    let store = store_with(
        Arc::clone(&remote),
        vec![synced(1, (9, 0), (10, 0)), local(2, (11, 0), (12, 0))],
    );
    let before = store.events();

    let notifications = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&notifications);
    store.subscribe(move |_| *counter.lock().unwrap() += 1);

    let mut drag = DragController::new(&GridSettings::default(), work_range());
    drag.pointer_down(&before[0], monday(), GrabTarget::Body, Pos2::new(0.0, 0.0));
    drag.pointer_move(Pos2::new(0.0, 192.0));

    let err = drag.release(&store, Instant::now()).await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::Remote {
            operation: SyncOperation::Update,
            ..
        }
    ));
    assert_eq!(store.events(), before);
    // once for the optimistic change, once for the rollback
    assert_eq!(*notifications.lock().unwrap(), 2);
}

#[tokio::test]
async fn test_resize_bottom_above_start_keeps_fifteen_minutes() {
    let store = store_with(Arc::new(FakeRemote::default()), vec![local(1, (9, 0), (10, 0))]);
    let event = store.get(1).unwrap();

    let mut drag = DragController::new(&GridSettings::default(), work_range());
    drag.pointer_down(
        &event,
        monday(),
        GrabTarget::Handle(ResizeHandle::Bottom),
        Pos2::new(0.0, 88.0),
    );
    drag.pointer_move(Pos2::new(0.0, -300.0));

    let outcome = drag.release(&store, Instant::now()).await.unwrap();
    assert_eq!(outcome, Some(UpdateOutcome::LocalOnly));

    let resized = store.get(1).unwrap();
    assert_eq!(resized.start, at(monday(), 9, 0));
    assert_eq!(resized.end, at(monday(), 9, 15));
}

#[tokio::test]
async fn test_cross_day_move_preserves_duration() {
    let store = store_with(Arc::new(FakeRemote::default()), vec![local(1, (13, 0), (14, 30))]);
    let event = store.get(1).unwrap();

    let columns = WeekColumns {
        rect: Rect::from_min_max(Pos2::new(60.0, 0.0), Pos2::new(760.0, 800.0)),
        days: 7,
    };
    let mut drag =
        DragController::new(&GridSettings::default(), work_range()).with_day_columns(week(), columns);

    // Monday column spans x 60..160, Wednesday 260..360
    drag.press(
        &event,
        monday(),
        Rect::from_min_max(Pos2::new(60.0, 384.0), Pos2::new(160.0, 520.0)),
        Pos2::new(100.0, 450.0),
    );
    drag.pointer_move(Pos2::new(300.0, 426.0));

    let release = drag.pointer_up(Instant::now());
    let DragRelease::Commit(draft) = release else {
        panic!("expected a commit");
    };
    assert_eq!(draft.start, at(wednesday(), 12, 45));
    assert_eq!(draft.duration(), event.duration());

    store.update_event(draft).await.unwrap();
    assert!(store.events_on(monday()).is_empty());
    assert_eq!(store.events_on(wednesday()).len(), 1);
}

#[tokio::test]
async fn test_modal_mid_gesture_leaves_store_untouched() {
    let store = store_with(Arc::new(FakeRemote::default()), vec![local(1, (9, 0), (10, 0))]);
    let before = store.events();

    let modal = Arc::new(Mutex::new(false));
    let probe = {
        let modal = Arc::clone(&modal);
        move || *modal.lock().unwrap()
    };
    let mut drag =
        DragController::new(&GridSettings::default(), work_range()).with_modal_probe(probe);

    drag.pointer_down(&before[0], monday(), GrabTarget::Body, Pos2::new(0.0, 0.0));
    drag.pointer_move(Pos2::new(0.0, 96.0));
    *modal.lock().unwrap() = true;
    drag.pointer_move(Pos2::new(0.0, 192.0));

    assert_eq!(drag.release(&store, Instant::now()).await.unwrap(), None);
    assert_eq!(store.events(), before);
}

#[tokio::test]
async fn test_create_then_delete_round_trip() {
    let remote = Arc::new(FakeRemote::default());
    let store = store_with(Arc::clone(&remote), vec![]);

    let created = store
        .create_event(EventPayload::new("Retro", at(monday(), 15, 0), at(monday(), 16, 0)))
        .await
        .unwrap();
    assert_eq!(created.remote_id.as_deref(), Some("created-retro"));

    assert!(store.delete_event(created.id).await.unwrap());
    assert!(store.is_empty());
    assert_eq!(
        remote.calls(),
        vec!["create Retro".to_string(), "delete created-retro".to_string()]
    );
}

#[tokio::test]
async fn test_delete_following_truncates_master_rule() {
    let master = Event::builder()
        .id(100)
        .remote_id("series")
        .title("Weekly sync")
        .start(at(monday() - Duration::days(14), 9, 0))
        .end(at(monday() - Duration::days(14), 10, 0))
        .recurrence_rule("RRULE:FREQ=WEEKLY;BYDAY=MO;COUNT=20")
        .build()
        .unwrap();
    let remote = Arc::new(FakeRemote::default().with_master(remote_copy(&master)));

    let instances: Vec<Event> = (0..3)
        .map(|week| {
            let day = monday() + Duration::weeks(week);
            Event::builder()
                .id(week + 1)
                .remote_id(format!("series_{}", day.format("%Y%m%d")))
                .title("Weekly sync")
                .start(at(day, 9, 0))
                .end(at(day, 10, 0))
                .recurring_event_id("series")
                .original_start_time(at(day, 9, 0))
                .build()
                .unwrap()
        })
        .collect();
    let store = store_with(Arc::clone(&remote), instances);

    let removed = store
        .delete_recurring(2, DeleteScope::Following)
        .await
        .unwrap();
    assert_eq!(removed, 2);
    assert_eq!(store.len(), 1);

    let masters = remote.masters.lock().unwrap();
    assert_eq!(
        masters["series"].recurrence,
        Some(vec![
            "RRULE:FREQ=WEEKLY;INTERVAL=1;BYDAY=MO;UNTIL=20250317T085959Z".to_string()
        ])
    );
}

#[tokio::test]
async fn test_instance_summary_uses_master_rule() {
    let master = Event::builder()
        .id(100)
        .remote_id("series")
        .title("Standup")
        .start(at(monday(), 9, 0))
        .end(at(monday(), 9, 15))
        .recurrence_rule("RRULE:FREQ=DAILY;COUNT=5")
        .build()
        .unwrap();
    let remote = Arc::new(FakeRemote::default().with_master(remote_copy(&master)));
    let store = store_with(Arc::clone(&remote), vec![]);

    let instance = Event::builder()
        .id(1)
        .title("Standup")
        .start(at(wednesday(), 9, 0))
        .end(at(wednesday(), 9, 15))
        .recurring_event_id("series")
        .build()
        .unwrap();

    assert_eq!(
        store.describe_recurrence(&instance).await.as_deref(),
        Some("Repeat every day for 5 occurrences")
    );
    store.describe_recurrence(&instance).await;
    assert_eq!(remote.calls(), vec!["get series".to_string()]);
}
