//! Recurrence rule handling: parsing RRULE lines into [`RecurrenceRule`]
//! values and describing them for display.
//!
//! [`RecurrenceRule`]: crate::models::recurrence::RecurrenceRule

pub mod parser;
pub mod summary;

pub use parser::{parse_rule, RecurrenceParseError};
pub use summary::{describe, summarize_rule, CUSTOM_RECURRENCE};
