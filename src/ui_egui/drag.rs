//! Pointer-driven move and resize of events on the time grid.
//!
//! A press on an event body starts a pending move that only becomes a real
//! move once the pointer travels past the drag threshold. A press on one of
//! the resize strips starts a resize immediately. While the gesture runs the
//! controller keeps a draft copy of the event; the stored event is untouched
//! until pointer-up commits the draft through the [`EventStore`].

use std::time::{Duration as StdDuration, Instant};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use egui::{Pos2, Rect};

use super::resize::{grab_target, resize_times, GrabTarget, ResizeHandle};
use super::views::{TimeGridMapper, VisibleRange};
use crate::models::event::Event;
use crate::models::settings::GridSettings;
use crate::services::event::{EventStore, SyncError, UpdateOutcome};
use crate::utils::date::start_of_day;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    /// Pressed on the body, threshold not yet crossed
    PendingMove,
    Move,
    Resize(ResizeHandle),
}

impl From<GrabTarget> for DragMode {
    fn from(target: GrabTarget) -> Self {
        match target {
            GrabTarget::Body => DragMode::PendingMove,
            GrabTarget::Handle(handle) => DragMode::Resize(handle),
        }
    }
}

/// Maps a horizontal pointer position to a day column index.
pub trait DayColumnLocator {
    fn day_index(&self, pointer_x: f32) -> Option<usize>;
}

impl<F> DayColumnLocator for F
where
    F: Fn(f32) -> Option<usize>,
{
    fn day_index(&self, pointer_x: f32) -> Option<usize> {
        self(pointer_x)
    }
}

/// Equal-width day columns laid out across `rect`.
#[derive(Clone, Debug, PartialEq)]
pub struct WeekColumns {
    pub rect: Rect,
    pub days: usize,
}

impl DayColumnLocator for WeekColumns {
    fn day_index(&self, pointer_x: f32) -> Option<usize> {
        if self.days == 0 || self.rect.width() <= 0.0 {
            return None;
        }
        let x = pointer_x.clamp(self.rect.left(), self.rect.right()) - self.rect.left();
        let column_width = self.rect.width() / self.days as f32;
        let index = (x / column_width).floor() as usize;
        Some(index.min(self.days - 1))
    }
}

/// Reports whether a modal dialog currently owns the pointer.
pub trait ModalProbe {
    fn is_modal_open(&self) -> bool;
}

impl<F> ModalProbe for F
where
    F: Fn() -> bool,
{
    fn is_modal_open(&self) -> bool {
        self()
    }
}

/// Gesture tuning taken from [`GridSettings`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSettings {
    pub snap_minutes: u32,
    pub min_duration: Duration,
    pub threshold_px: f32,
    pub handle_size_px: f32,
    pub click_suppress: StdDuration,
}

impl From<&GridSettings> for DragSettings {
    fn from(settings: &GridSettings) -> Self {
        Self {
            snap_minutes: settings.drag_snap_minutes,
            min_duration: Duration::minutes(i64::from(settings.min_duration_minutes)),
            threshold_px: settings.drag_threshold_px,
            handle_size_px: settings.handle_size_px,
            click_suppress: StdDuration::from_millis(settings.click_suppress_ms),
        }
    }
}

impl Default for DragSettings {
    fn default() -> Self {
        Self::from(&GridSettings::default())
    }
}

/// State of one gesture, from pointer-down to pointer-up.
#[derive(Clone, Debug)]
pub struct DragSession {
    original: Event,
    draft: Option<Event>,
    mode: DragMode,
    origin_day: NaiveDate,
    start_pointer: Pos2,
    target_day: Option<usize>,
}

impl DragSession {
    pub fn original(&self) -> &Event {
        &self.original
    }

    pub fn draft(&self) -> Option<&Event> {
        self.draft.as_ref()
    }

    /// The draft if the pointer has moved, otherwise the original.
    pub fn current(&self) -> &Event {
        self.draft.as_ref().unwrap_or(&self.original)
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    pub fn origin_day(&self) -> NaiveDate {
        self.origin_day
    }

    /// Column under the pointer during a cross-day move.
    pub fn target_day(&self) -> Option<usize> {
        self.target_day
    }
}

/// Result of feeding a pointer-move into the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragUpdate {
    /// No gesture in progress
    Idle,
    /// Pending move still below the threshold
    Pending,
    /// The draft was recomputed
    Preview,
    /// A modal opened mid-gesture and the gesture was dropped
    Aborted,
}

/// Result of pointer-up.
#[derive(Clone, Debug, PartialEq)]
pub enum DragRelease {
    Idle,
    /// A press that never turned into a gesture; the click goes through
    Click,
    /// Pointer moved but the draft matches the stored event
    Unchanged,
    Commit(Event),
}

/// Where to paint the ghost of a cross-day move.
#[derive(Clone, Debug, PartialEq)]
pub struct DragGhost<'a> {
    pub day_index: usize,
    pub top_px: f32,
    pub event: &'a Event,
}

struct DayColumns {
    days: Vec<NaiveDate>,
    locator: Box<dyn DayColumnLocator + Send>,
}

pub struct DragController {
    settings: DragSettings,
    mapper: TimeGridMapper,
    range: VisibleRange,
    columns: Option<DayColumns>,
    modal: Box<dyn ModalProbe + Send>,
    session: Option<DragSession>,
    suppress_until: Option<Instant>,
}

impl DragController {
    pub fn new(settings: &GridSettings, range: VisibleRange) -> Self {
        Self {
            settings: DragSettings::from(settings),
            mapper: TimeGridMapper::from_settings(settings),
            range,
            columns: None,
            modal: Box::new(|| false),
            session: None,
            suppress_until: None,
        }
    }

    /// Enable cross-day moves across the given day columns.
    pub fn with_day_columns(
        mut self,
        days: Vec<NaiveDate>,
        locator: impl DayColumnLocator + Send + 'static,
    ) -> Self {
        self.columns = Some(DayColumns {
            days,
            locator: Box::new(locator),
        });
        self
    }

    pub fn with_modal_probe(mut self, probe: impl ModalProbe + Send + 'static) -> Self {
        self.modal = Box::new(probe);
        self
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Draft of the event being dragged, once the pointer has moved.
    pub fn draft(&self) -> Option<&Event> {
        self.session.as_ref().and_then(DragSession::draft)
    }

    /// Start a gesture from a press inside an event's block rectangle.
    pub fn press(&mut self, event: &Event, day: NaiveDate, block: Rect, pointer: Pos2) -> bool {
        match grab_target(block, pointer, self.settings.handle_size_px) {
            Some(target) => self.pointer_down(event, day, target, pointer),
            None => false,
        }
    }

    /// Begin a gesture on `event`, shown in the column for `day`.
    ///
    /// Refused while a modal is open or another gesture is still running.
    pub fn pointer_down(
        &mut self,
        event: &Event,
        day: NaiveDate,
        target: GrabTarget,
        pointer: Pos2,
    ) -> bool {
        if self.modal.is_modal_open() {
            log::debug!("Ignoring press on event {}: modal open", event.id);
            return false;
        }
        if self.session.is_some() {
            return false;
        }

        let mode = DragMode::from(target);
        log::debug!("Gesture {:?} started on event {}", mode, event.id);
        self.session = Some(DragSession {
            original: event.clone(),
            draft: None,
            mode,
            origin_day: day,
            start_pointer: pointer,
            target_day: None,
        });
        true
    }

    pub fn pointer_move(&mut self, pointer: Pos2) -> DragUpdate {
        if self.session.is_none() {
            return DragUpdate::Idle;
        }
        if self.modal.is_modal_open() {
            self.abort();
            return DragUpdate::Aborted;
        }

        let settings = self.settings;
        let mapper = self.mapper;
        let range = self.range;
        let target_day = self.target_day_at(pointer.x);
        let Some(session) = self.session.as_mut() else {
            return DragUpdate::Idle;
        };

        let delta_y = pointer.y - session.start_pointer.y;
        if session.mode == DragMode::PendingMove {
            if delta_y.abs() < settings.threshold_px {
                return DragUpdate::Pending;
            }
            session.mode = DragMode::Move;
        }

        let delta = Duration::minutes(mapper.snap_delta_minutes(delta_y, settings.snap_minutes));
        let original = &session.original;
        let (start, end) = match session.mode {
            DragMode::Resize(handle) => resize_times(
                handle,
                original.start,
                original.end,
                delta,
                range.window_on(session.origin_day),
                settings.min_duration,
            ),
            _ => {
                let (day, index) = target_day.unwrap_or((session.origin_day, None));
                session.target_day = index;
                let vertical_start = original.start + delta;
                let start = start_of_day(day) + (vertical_start - start_of_day(session.origin_day));
                let duration = original.duration().max(settings.min_duration);
                clamp_move(start, duration, range, day)
            }
        };

        session.draft = Some(original.with_times(start, end));
        DragUpdate::Preview
    }

    /// Finish the gesture. The returned draft still has to be committed;
    /// see [`DragController::release`] for the version that does it.
    pub fn pointer_up(&mut self, now: Instant) -> DragRelease {
        let Some(session) = self.session.take() else {
            return DragRelease::Idle;
        };

        if matches!(session.mode, DragMode::Move | DragMode::Resize(_)) {
            self.suppress_until = Some(now + self.settings.click_suppress);
        }

        match (session.mode, session.draft) {
            (DragMode::PendingMove, _) | (_, None) => DragRelease::Click,
            (_, Some(draft)) if draft == session.original => DragRelease::Unchanged,
            (_, Some(draft)) => DragRelease::Commit(draft),
        }
    }

    /// Pointer-up followed by committing the draft to the store.
    pub async fn release(
        &mut self,
        store: &EventStore,
        now: Instant,
    ) -> Result<Option<UpdateOutcome>, SyncError> {
        match self.pointer_up(now) {
            DragRelease::Commit(draft) => {
                log::debug!(
                    "Committing event {} at {} - {}",
                    draft.id,
                    draft.start,
                    draft.end
                );
                store.update_event(draft).await.map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Drop the gesture without committing anything.
    pub fn abort(&mut self) {
        if let Some(session) = self.session.take() {
            log::debug!("Gesture on event {} aborted", session.original.id);
        }
    }

    /// True while the click that follows a move or resize should be ignored.
    pub fn should_suppress_click(&self, now: Instant) -> bool {
        self.suppress_until.map_or(false, |until| now < until)
    }

    /// Ghost placement while a move hovers a day column.
    pub fn ghost(&self) -> Option<DragGhost<'_>> {
        let session = self.session.as_ref()?;
        let event = session.draft.as_ref()?;
        let day_index = session.target_day?;
        Some(DragGhost {
            day_index,
            top_px: self.mapper.top_px(event.start, event.start.date(), self.range),
            event,
        })
    }

    fn target_day_at(&self, pointer_x: f32) -> Option<(NaiveDate, Option<usize>)> {
        let columns = self.columns.as_ref()?;
        let index = columns.locator.day_index(pointer_x)?;
        let day = *columns.days.get(index)?;
        Some((day, Some(index)))
    }
}

/// Keep a moved event inside the visible window of `day`.
///
/// Hitting the top edge pins the start and shortens the event only if the
/// window is smaller than the event. Hitting the bottom edge pins the end and
/// keeps the full duration.
pub fn clamp_move(
    start: NaiveDateTime,
    duration: Duration,
    range: VisibleRange,
    day: NaiveDate,
) -> (NaiveDateTime, NaiveDateTime) {
    let window = range.window_on(day);
    let end = start + duration;
    if start < window.start {
        let start = window.start;
        (start, start + duration.min(window.end - start))
    } else if end > window.end {
        (window.end - duration, window.end)
    } else {
        (start, end)
    }
}
