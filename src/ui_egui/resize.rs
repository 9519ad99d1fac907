// Event Resize System
//
// Resizing a timed event by dragging the strip along its top or bottom edge.
// - Top handle: adjusts the start time
// - Bottom handle: adjusts the end time

use chrono::{Duration, NaiveDateTime};
use egui::{Pos2, Rect, Vec2};

use super::views::DayWindow;

/// Which edge of the event is being resized
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeHandle {
    /// Top edge - adjusts start time
    Top,
    /// Bottom edge - adjusts end time
    Bottom,
}

/// Height of the resize strips at the top and bottom of a block
pub const HANDLE_SIZE: f32 = 8.0;

/// What a pointer-down on an event block grabbed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrabTarget {
    Body,
    Handle(ResizeHandle),
}

/// Hit areas for the two resize strips of a block
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandleRects {
    pub top: Rect,
    pub bottom: Rect,
}

impl HandleRects {
    /// Full-width strips of `handle_size` inside the block's top and bottom edges
    pub fn for_block(block: Rect, handle_size: f32) -> Self {
        let strip = handle_size.min(block.height()).max(0.0);
        Self {
            top: Rect::from_min_size(block.min, Vec2::new(block.width(), strip)),
            bottom: Rect::from_min_size(
                Pos2::new(block.left(), block.bottom() - strip),
                Vec2::new(block.width(), strip),
            ),
        }
    }

    /// Top wins when the strips overlap on very short blocks
    pub fn hit_test(&self, pos: Pos2) -> Option<ResizeHandle> {
        if self.top.contains(pos) {
            Some(ResizeHandle::Top)
        } else if self.bottom.contains(pos) {
            Some(ResizeHandle::Bottom)
        } else {
            None
        }
    }
}

/// Classify a press inside `block`. Returns `None` when the pointer is outside it.
pub fn grab_target(block: Rect, pointer: Pos2, handle_size: f32) -> Option<GrabTarget> {
    if !block.contains(pointer) {
        return None;
    }
    let target = match HandleRects::for_block(block, handle_size).hit_test(pointer) {
        Some(handle) => GrabTarget::Handle(handle),
        None => GrabTarget::Body,
    };
    Some(target)
}

/// New start/end after moving one edge by `delta` from the original times.
///
/// The moved edge is clamped into the visible window first. The minimum
/// duration is enforced afterwards and takes precedence, so the opposite edge
/// never moves.
pub fn resize_times(
    handle: ResizeHandle,
    original_start: NaiveDateTime,
    original_end: NaiveDateTime,
    delta: Duration,
    window: DayWindow,
    min_duration: Duration,
) -> (NaiveDateTime, NaiveDateTime) {
    match handle {
        ResizeHandle::Top => {
            let mut start = original_start + delta;
            if start < window.start {
                start = window.start;
            }
            if original_end - start < min_duration {
                start = original_end - min_duration;
            }
            (start, original_end)
        }
        ResizeHandle::Bottom => {
            let mut end = original_end + delta;
            if end > window.end {
                end = window.end;
            }
            if end - original_start < min_duration {
                end = original_start + min_duration;
            }
            (original_start, end)
        }
    }
}
