//! Time grid interaction: block layout, drag-to-move and drag-to-resize.
//!
//! Nothing here paints; the host UI feeds pointer positions and rectangles
//! in and draws what comes back.

pub mod drag;
pub mod resize;
pub mod views;

pub use drag::{DragController, DragMode, DragRelease, DragUpdate, WeekColumns};
pub use resize::{GrabTarget, ResizeHandle, HANDLE_SIZE};
